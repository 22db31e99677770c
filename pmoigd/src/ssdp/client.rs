//! SSDP client: sends the M-SEARCH and collects the answers

use std::io::ErrorKind;
use std::net::{Ipv4Addr, SocketAddr, ToSocketAddrs, UdpSocket};
use std::time::{Duration, Instant};

use socket2::{Domain, Protocol, Socket, Type};
use tracing::{debug, info, trace};

use super::{MAX_DATAGRAM_SIZE, RawResponse, SSDP_MULTICAST_ADDR, SSDP_PORT};
use crate::config::IgdConfig;
use crate::errors::IgdError;

/// M-SEARCH parameters, built once per discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub multicast_address: String,
    pub service_type: String,
    pub max_wait_seconds: u32,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            multicast_address: format!("{}:{}", SSDP_MULTICAST_ADDR, SSDP_PORT),
            service_type: "ssdp:all".to_string(),
            max_wait_seconds: 1,
        }
    }
}

impl SearchRequest {
    pub fn from_config(config: &IgdConfig) -> Self {
        Self {
            multicast_address: config.multicast_address.clone(),
            service_type: config.search_target.clone(),
            max_wait_seconds: config.mx,
        }
    }

    /// Renders the M-SEARCH datagram.
    pub fn to_datagram(&self) -> String {
        // MX must be >= 1
        let mx = self.max_wait_seconds.max(1);
        format!(
            "M-SEARCH * HTTP/1.1\r\n\
             HOST: {}\r\n\
             ST: {}\r\n\
             MAN: \"ssdp:discover\"\r\n\
             MX: {}\r\n\
             \r\n",
            self.multicast_address, self.service_type, mx
        )
    }
}

/// Sends one M-SEARCH and collects every answer received within `window`.
///
/// The window is a single deadline taken when the call starts; reaching it
/// is the normal way out and is not an error. Resolve, bind and send
/// failures abort immediately. The socket is closed before returning.
pub fn discover(request: &SearchRequest, window: Duration) -> Result<Vec<RawResponse>, IgdError> {
    let deadline = Instant::now() + window;

    let target = resolve(&request.multicast_address)?;
    let socket = open_socket()?;

    let payload = request.to_datagram();
    socket
        .send_to(payload.as_bytes(), target)
        .map_err(|source| IgdError::Send {
            addr: target.to_string(),
            source,
        })?;
    info!(
        "📤 M-SEARCH sent (ST={}, MX={}) to {}",
        request.service_type, request.max_wait_seconds, target
    );
    debug!("📨 M-SEARCH payload\n{}", payload);

    let mut responses = Vec::new();
    let mut buf = [0u8; MAX_DATAGRAM_SIZE];
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }
        socket
            .set_read_timeout(Some(remaining))
            .map_err(IgdError::Receive)?;

        match socket.recv_from(&mut buf) {
            Ok((n, from)) => {
                let text = String::from_utf8_lossy(&buf[..n]).into_owned();
                trace!("📥 SSDP datagram from {} ({} bytes)", from, n);
                responses.push(RawResponse::new(text, Some(from)));
            }
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                break;
            }
            Err(e) => return Err(IgdError::Receive(e)),
        }
    }

    info!(
        "SSDP search finished after {:?}: {} response(s)",
        window,
        responses.len()
    );
    Ok(responses)
}

fn resolve(addr: &str) -> Result<SocketAddr, IgdError> {
    let resolve_error = |source| IgdError::Resolve {
        addr: addr.to_string(),
        source,
    };

    addr.to_socket_addrs()
        .map_err(resolve_error)?
        .find(SocketAddr::is_ipv4)
        .ok_or_else(|| {
            resolve_error(std::io::Error::new(
                ErrorKind::AddrNotAvailable,
                "no IPv4 address",
            ))
        })
}

fn open_socket() -> Result<UdpSocket, IgdError> {
    let socket2 =
        Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP)).map_err(IgdError::Bind)?;
    socket2.set_reuse_address(true).map_err(IgdError::Bind)?;

    let bind_addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0));
    socket2.bind(&bind_addr.into()).map_err(IgdError::Bind)?;

    let socket: UdpSocket = socket2.into();
    socket.set_multicast_loop_v4(true).map_err(IgdError::Bind)?;
    Ok(socket)
}
