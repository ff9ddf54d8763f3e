use std::net::{IpAddr, SocketAddr};

use byteorder::{ByteOrder, LittleEndian};

use crate::error::SampQueryError;

/// Every SA-MP query datagram starts with these 4 bytes, in both directions.
pub const PROTOCOL_TAG: &[u8; 4] = b"SAMP";

/// Tag + IPv4 octets + port + opcode, echoed back verbatim by the server.
pub const HEADER_LEN: usize = 11;

/// Token sent with [Opcode::Ping]; a live server echoes it back.
pub const PING_TOKEN: &[u8; 4] = b"4150";

/// The SA-MP server receives datagrams into a 4096 byte buffer,
/// so no response is larger than that.
pub const MAX_PACKET_SIZE: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    /// Liveness probe, answered with the request echoed back.
    Ping,
    /// Password flag, player counts, hostname, gamemode and map.
    Info,
    /// Nickname and score of every connected player.
    BasicPlayers,
    /// Id, nickname, score and ping of every connected player.
    DetailedPlayers,
    /// Server rules as name/value pairs.
    Rules,
}

impl Opcode {
    pub fn to_byte(&self) -> u8 {
        match self {
            Opcode::Ping => b'p',
            Opcode::Info => b'i',
            Opcode::BasicPlayers => b'c',
            Opcode::DetailedPlayers => b'd',
            Opcode::Rules => b'r',
        }
    }

    pub fn from_byte(byte: u8) -> Option<Opcode> {
        match byte {
            b'p' => Some(Opcode::Ping),
            b'i' => Some(Opcode::Info),
            b'c' => Some(Opcode::BasicPlayers),
            b'd' => Some(Opcode::DetailedPlayers),
            b'r' => Some(Opcode::Rules),
            _ => None,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct RequestPacket {
    endpoint: SocketAddr,
    opcode: Opcode,
    payload: Vec<u8>,
}

impl RequestPacket {
    pub fn new(endpoint: SocketAddr, opcode: Opcode) -> Self {
        let payload: Vec<u8> = match opcode {
            Opcode::Ping => PING_TOKEN.to_vec(),
            _ => Vec::new(),
        };
        RequestPacket {
            endpoint,
            opcode,
            payload,
        }
    }

    /// Serializes a request packet into an array of bytes.
    ///
    /// Fails with [SampQueryError::UnsupportedAddress] for IPv6 endpoints,
    /// the header only has room for 4 address octets.
    pub fn pack(&self) -> Result<Vec<u8>, SampQueryError> {
        let octets: [u8; 4] = match self.endpoint.ip() {
            IpAddr::V4(ip) => ip.octets(),
            ip => return Err(SampQueryError::UnsupportedAddress(ip)),
        };

        let mut port: [u8; 2] = [0; 2];
        LittleEndian::write_u16(&mut port, self.endpoint.port());

        // packet structure: tag, address, port, opcode, payload
        let mut packet: Vec<u8> = Vec::with_capacity(HEADER_LEN + self.payload.len());
        packet.extend_from_slice(PROTOCOL_TAG);
        packet.extend_from_slice(&octets);
        packet.extend_from_slice(&port);
        packet.push(self.opcode.to_byte());
        packet.extend_from_slice(&self.payload);

        Ok(packet)
    }

    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}

/// A received datagram. The header is kept but never checked against
/// the request that produced it.
#[derive(Debug, PartialEq, Eq)]
pub struct ResponsePacket {
    raw: Vec<u8>,
}

impl ResponsePacket {
    const OPCODE_OFFSET: usize = HEADER_LEN - 1;

    /// Wraps an incoming datagram, requiring at least a full header.
    pub fn unpack(incoming: &[u8]) -> Result<Self, SampQueryError> {
        if incoming.len() < HEADER_LEN {
            return Err(SampQueryError::UnexpectedEnd {
                offset: 0,
                wanted: HEADER_LEN,
                len: incoming.len(),
            });
        }
        Ok(ResponsePacket {
            raw: incoming.to_vec(),
        })
    }

    /// The echoed opcode, if it is one we know.
    pub fn opcode(&self) -> Option<Opcode> {
        Opcode::from_byte(self.raw[Self::OPCODE_OFFSET])
    }

    /// Everything after the echoed header.
    pub fn body(&self) -> &[u8] {
        &self.raw[HEADER_LEN..]
    }

    /// Does the datagram contain `token` anywhere, header included?
    pub fn contains(&self, token: &[u8]) -> bool {
        !token.is_empty() && self.raw.windows(token.len()).any(|w| w == token)
    }
}
