use crate::error::SampQueryError;
use crate::packet::ResponsePacket;
use crate::parse::{get_i32, get_string, get_u16, get_u8};

/// A player as reported by the `c` query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicPlayer {
    pub nickname: String,
    pub score: i32,
}

/// A player as reported by the `d` query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailedPlayer {
    pub id: u8,
    pub nickname: String,
    pub score: i32,
    /// Milliseconds, never negative in practice
    pub ping: i32,
}

impl BasicPlayer {
    /// Parse a basic player list: a `u16` count, then per player a
    /// length-prefixed nickname and an `i32` score.
    pub fn parse_list(packet: &ResponsePacket) -> Result<Vec<BasicPlayer>, SampQueryError> {
        let data: &[u8] = packet.body();
        let mut offset: usize = 0;

        let count: u16 = get_u16(data, &mut offset)?;
        let mut players: Vec<BasicPlayer> = Vec::with_capacity((count as usize).min(data.len()));
        for _ in 0..count {
            let nickname: String = get_string(data, &mut offset)?;
            let score: i32 = get_i32(data, &mut offset)?;
            players.push(BasicPlayer { nickname, score });
        }

        Ok(players)
    }
}

impl DetailedPlayer {
    /// Parse a detailed player list: a `u16` count, then per player a `u8` id,
    /// a length-prefixed nickname, an `i32` score and an `i32` ping.
    pub fn parse_list(packet: &ResponsePacket) -> Result<Vec<DetailedPlayer>, SampQueryError> {
        let data: &[u8] = packet.body();
        let mut offset: usize = 0;

        let count: u16 = get_u16(data, &mut offset)?;
        let mut players: Vec<DetailedPlayer> = Vec::with_capacity((count as usize).min(data.len()));
        for _ in 0..count {
            let id: u8 = get_u8(data, &mut offset)?;
            let nickname: String = get_string(data, &mut offset)?;
            let score: i32 = get_i32(data, &mut offset)?;
            let ping: i32 = get_i32(data, &mut offset)?;
            players.push(DetailedPlayer {
                id,
                nickname,
                score,
                ping,
            });
        }

        Ok(players)
    }
}
