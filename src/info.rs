use crate::error::SampQueryError;
use crate::packet::ResponsePacket;
use crate::parse::{get_u16, get_u8};

/// Placeholder for the string fields of [ServerInfo] that are not decoded.
pub const UNKNOWN: &str = "UNKNOWN";

/// Server information as obtained by [SampQuery::info](crate::query::SampQuery::info).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerInfo {
    /// Is the server password protected?
    pub password: bool,
    /// Current players
    pub players: u16,
    /// Max players
    pub max_players: u16,
    /// Always [UNKNOWN]
    pub hostname: String,
    /// Always [UNKNOWN]
    pub gamemode: String,
    /// Always [UNKNOWN]
    pub mapname: String,
}

impl ServerInfo {
    /// Parse an info [ResponsePacket] into its' corresponding [ServerInfo].
    ///
    /// Only the password flag and the player counts are read. The hostname,
    /// gamemode and map name follow on the wire, but their length prefixes
    /// have not been checked against a real server, so they are left as [UNKNOWN].
    pub fn parse(packet: &ResponsePacket) -> Result<ServerInfo, SampQueryError> {
        let data: &[u8] = packet.body();
        let mut offset: usize = 0;

        let password: bool = get_u8(data, &mut offset)? != 0;
        let players: u16 = get_u16(data, &mut offset)?;
        let max_players: u16 = get_u16(data, &mut offset)?;

        Ok(ServerInfo {
            password,
            players,
            max_players,
            hostname: UNKNOWN.to_owned(),
            gamemode: UNKNOWN.to_owned(),
            mapname: UNKNOWN.to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(body: &[u8]) -> ResponsePacket {
        let mut raw = b"SAMP\x7f\x00\x00\x01\x63\x00i".to_vec();
        raw.extend_from_slice(body);
        ResponsePacket::unpack(&raw).unwrap()
    }

    #[test]
    fn parses_counts_and_leaves_strings_unknown() {
        let info = ServerInfo::parse(&response(&[0x00, 0x05, 0x00, 0x20, 0x00])).unwrap();
        assert_eq!(
            info,
            ServerInfo {
                password: false,
                players: 5,
                max_players: 32,
                hostname: "UNKNOWN".to_owned(),
                gamemode: "UNKNOWN".to_owned(),
                mapname: "UNKNOWN".to_owned(),
            }
        );
    }

    #[test]
    fn any_nonzero_flag_means_password() {
        let info = ServerInfo::parse(&response(&[0x02, 0x00, 0x00, 0xE8, 0x03])).unwrap();
        assert!(info.password);
        assert_eq!(info.players, 0);
        assert_eq!(info.max_players, 1000);
    }

    #[test]
    fn trailing_string_fields_are_ignored() {
        let info = ServerInfo::parse(&response(b"\x01\xff\xff\xff\xff\x04\x00\x00\x00host")).unwrap();
        assert_eq!(info.players, u16::MAX);
        assert_eq!(info.hostname, UNKNOWN);
    }

    #[test]
    fn missing_max_players_is_malformed() {
        let err = ServerInfo::parse(&response(&[0x00, 0x05, 0x00, 0x20])).unwrap_err();
        assert!(err.is_malformed());
    }
}
