use std::io::ErrorKind;
use std::net::SocketAddr;
use std::time::Duration;

use log::{debug, trace, warn};
use tokio::net::{lookup_host, UdpSocket};
use tokio::time::timeout;

use crate::error::SampQueryError;
use crate::info::ServerInfo;
use crate::packet::{Opcode, RequestPacket, ResponsePacket, MAX_PACKET_SIZE, PING_TOKEN};
use crate::players::{BasicPlayer, DetailedPlayer};
use crate::rules::{self, RuleSet};

/// Wait applied to each send and each receive when none is given.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// A query session against one SA-MP server.
///
/// The session owns a single UDP socket, so every query takes `&mut self`
/// and only one request can be in flight at a time. Share it between tasks
/// behind a `tokio::sync::Mutex` if needed.
///
/// Example usage:
/// ```no_run
/// # async fn run() -> Result<(), sampquery::error::SampQueryError> {
/// use sampquery::query::SampQuery;
///
/// let mut server = SampQuery::new("127.0.0.1", 7777, None).await?;
/// if server.is_online() {
///     let info = server.info().await?;
///     println!("{}/{} players", info.players, info.max_players);
/// }
/// server.close();
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SampQuery {
    endpoint: SocketAddr,
    timeout_dur: Duration,
    sock: Option<UdpSocket>,
    online: bool,
}

impl SampQuery {
    /// Resolve `host`, open a socket towards it and send a liveness probe.
    ///
    /// If `timeout_dur` is `Some(Duration)`, every send and receive uses it,
    /// otherwise [DEFAULT_TIMEOUT].
    ///
    /// Fails only if the host cannot be resolved or the socket cannot be set up.
    /// An unreachable server still yields a session, with [SampQuery::is_online]
    /// returning `false`.
    pub async fn new(host: &str, port: u16, timeout_dur: Option<Duration>) -> Result<SampQuery, SampQueryError> {
        let timeout_dur: Duration = timeout_dur.unwrap_or(DEFAULT_TIMEOUT);
        let endpoint: SocketAddr = resolve(host, port).await?;
        debug!("resolved {host}:{port} to {endpoint}");

        // any local port will do, matching the endpoint's address family
        let local: &str = if endpoint.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" };
        let sock: UdpSocket = UdpSocket::bind(local)
            .await
            .map_err(SampQueryError::FailedPortBind)?;

        sock.connect(endpoint)
            .await
            .map_err(SampQueryError::UnreachableHost)?;

        let mut session = SampQuery {
            endpoint,
            timeout_dur,
            sock: Some(sock),
            online: false,
        };
        session.online = session.probe().await;
        debug!("{endpoint} is {}", if session.online { "online" } else { "offline" });

        Ok(session)
    }

    /// Whether the server answered the probe sent when the session was created.
    pub fn is_online(&self) -> bool {
        self.online
    }

    pub fn endpoint(&self) -> SocketAddr {
        self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout_dur
    }

    pub fn is_closed(&self) -> bool {
        self.sock.is_none()
    }

    /// Query server information. Only the password flag and player counts
    /// are decoded, see [ServerInfo::parse].
    pub async fn info(&mut self) -> Result<ServerInfo, SampQueryError> {
        let packet: ResponsePacket = self.send_recv(Opcode::Info).await?;
        ServerInfo::parse(&packet)
    }

    pub async fn basic_players(&mut self) -> Result<Vec<BasicPlayer>, SampQueryError> {
        let packet: ResponsePacket = self.send_recv(Opcode::BasicPlayers).await?;
        BasicPlayer::parse_list(&packet)
    }

    pub async fn detailed_players(&mut self) -> Result<Vec<DetailedPlayer>, SampQueryError> {
        let packet: ResponsePacket = self.send_recv(Opcode::DetailedPlayers).await?;
        DetailedPlayer::parse_list(&packet)
    }

    pub async fn rules(&mut self) -> Result<RuleSet, SampQueryError> {
        let packet: ResponsePacket = self.send_recv(Opcode::Rules).await?;
        rules::parse(&packet)
    }

    /// Release the socket. Safe to call any number of times;
    /// queries made afterwards fail with [SampQueryError::SocketClosed].
    pub fn close(&mut self) {
        if self.sock.take().is_some() {
            debug!("closed socket to {}", self.endpoint);
        }
    }

    /// Every failure here means "offline", nothing is propagated.
    async fn probe(&mut self) -> bool {
        let mut echo: Vec<u8> = vec![Opcode::Ping.to_byte()];
        echo.extend_from_slice(PING_TOKEN);

        match self.send_recv(Opcode::Ping).await {
            Ok(packet) => packet.contains(&echo),
            Err(e) => {
                warn!("probe of {} failed: {e}", self.endpoint);
                false
            }
        }
    }

    async fn send_recv(&mut self, opcode: Opcode) -> Result<ResponsePacket, SampQueryError> {
        let req: RequestPacket = RequestPacket::new(self.endpoint, opcode);
        let raw: Vec<u8> = req.pack()?;
        let sock: &UdpSocket = self.sock.as_ref().ok_or(SampQueryError::SocketClosed)?;
        let mut resp_buf: [u8; MAX_PACKET_SIZE] = [0u8; MAX_PACKET_SIZE];

        // replies to earlier timed out queries would be read as ours
        discard_stale(sock, &mut resp_buf);

        // sending
        debug!("sending {:?} query to {}", req.opcode(), self.endpoint);
        timeout(self.timeout_dur, sock.send(&raw))
            .await?
            .map_err(SampQueryError::SendError)?;
        trace!("sent {} bytes ({} byte payload)", raw.len(), req.payload().len());

        // receiving packet
        let len: usize = timeout(self.timeout_dur, sock.recv(&mut resp_buf))
            .await?
            .map_err(SampQueryError::ReceiveError)?;
        trace!("received {len} bytes from {}", self.endpoint);

        let packet: ResponsePacket = ResponsePacket::unpack(&resp_buf[..len])?;
        if packet.opcode() != Some(opcode) {
            debug!("response echoed opcode {:?}, expected {:?}", packet.opcode(), opcode);
        }
        Ok(packet)
    }
}

/// Drop every datagram already queued on `sock` without waiting.
fn discard_stale(sock: &UdpSocket, buf: &mut [u8]) {
    loop {
        match sock.try_recv(buf) {
            Ok(len) => debug!("discarded stale {len} byte datagram"),
            Err(e) if e.kind() == ErrorKind::WouldBlock => break,
            // a pending ICMP error is cleared once read
            Err(e) => debug!("discarded stale socket error: {e}"),
        }
    }
}

/// Resolve `host` to a single address, preferring IPv4 since
/// only IPv4 endpoints can be queried.
async fn resolve(host: &str, port: u16) -> Result<SocketAddr, SampQueryError> {
    let addrs: Vec<SocketAddr> = lookup_host((host, port))
        .await
        .map_err(|e| SampQueryError::Resolve(host.to_owned(), e))?
        .collect();

    addrs
        .iter()
        .find(|addr| addr.is_ipv4())
        .or_else(|| addrs.first())
        .copied()
        .ok_or_else(|| SampQueryError::NoAddress(host.to_owned()))
}
