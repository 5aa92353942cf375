//! Fire-and-forget UDP sink.

use crate::LogRecord;
use log::LevelFilter;
use std::io;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

/// Sends one JSON datagram per record to `host:port`.
///
/// The destination is resolved once, in `connect`; sends never touch DNS,
/// never block, and never report failure. A datagram that cannot be encoded
/// or sent is dropped.
#[derive(Debug)]
pub struct DatagramSink {
    host: String,
    port: u16,
    level: LevelFilter,
    socket: UdpSocket,
    target: SocketAddr,
}

impl DatagramSink {
    /// Resolve `host:port` and bind a local ephemeral socket of the same
    /// address family.
    ///
    /// A host that does not resolve is an error here, not a silent drop of
    /// every later record.
    pub fn connect(host: &str, port: u16, level: LevelFilter) -> io::Result<Self> {
        let target = (host, port).to_socket_addrs()?.next().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no address found for {host}:{port}"),
            )
        })?;
        let bind_addr = match target {
            SocketAddr::V4(_) => "0.0.0.0:0",
            SocketAddr::V6(_) => "[::]:0",
        };
        let socket = UdpSocket::bind(bind_addr)?;
        socket.set_nonblocking(true)?;
        Ok(Self {
            host: host.to_string(),
            port,
            level,
            socket,
            target,
        })
    }

    pub fn level(&self) -> LevelFilter {
        self.level
    }

    /// Destination `host:port` as configured.
    pub fn destination(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Resolved destination address.
    pub fn target(&self) -> SocketAddr {
        self.target
    }

    /// Encode and send one record, discarding any failure.
    pub fn send(&self, record: &LogRecord) {
        let Ok(payload) = record.datagram_payload() else {
            return;
        };
        let _ = self.socket.send_to(&payload, self.target);
    }
}
