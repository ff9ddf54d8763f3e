use std::io;
use std::net::IpAddr;

use thiserror::Error;
use tokio::time::error::Elapsed;

#[derive(Debug, Error)]
pub enum SampQueryError {
    /// Host name lookup failed.
    #[error("failed to resolve host `{0}`: {1}")]
    Resolve(String, #[source] io::Error),
    #[error("host `{0}` did not resolve to any address")]
    NoAddress(String),
    #[error("failed to bind local port: {0}")]
    FailedPortBind(#[source] io::Error),
    #[error("failed to connect to host: {0}")]
    UnreachableHost(#[source] io::Error),

    /// No response within the bounded wait.
    #[error("timed out waiting for server")]
    Timeout(#[from] Elapsed),

    #[error("failed to send packet: {0}")]
    SendError(#[source] io::Error),
    #[error("failed to receive packet: {0}")]
    ReceiveError(#[source] io::Error),

    /// A declared count or length runs past the received datagram.
    #[error("malformed response: wanted {wanted} bytes at offset {offset}, datagram is {len} bytes")]
    UnexpectedEnd {
        offset: usize,
        wanted: usize,
        len: usize,
    },

    /// Only IPv4 endpoints can be framed into a request header.
    #[error("address {0} cannot be encoded in a SA-MP packet (IPv4 only)")]
    UnsupportedAddress(IpAddr),

    #[error("socket is closed")]
    SocketClosed,
}

impl SampQueryError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, SampQueryError::Timeout(_))
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, SampQueryError::UnexpectedEnd { .. })
    }
}
