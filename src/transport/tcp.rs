//! TCP connector for the plug's setup socket.

use super::{Connector, TransportError};
use log::{debug, info, warn};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

/// Default connection timeout in seconds.
pub const CONNECT_TIMEOUT_SECS: u64 = 5;

/// Default read timeout in seconds.
pub const READ_TIMEOUT_SECS: u64 = 5;

/// Connects to devices over TCP.
#[derive(Debug, Clone)]
pub struct TcpConnector {
    read_timeout: Duration,
}

impl TcpConnector {
    /// Create a connector with a custom read timeout.
    pub fn new(read_timeout: Duration) -> Self {
        Self { read_timeout }
    }
}

impl Default for TcpConnector {
    fn default() -> Self {
        Self::new(Duration::from_secs(READ_TIMEOUT_SECS))
    }
}

impl Connector for TcpConnector {
    type Stream = TcpStream;

    fn connect(&self, address: &str, timeout: Duration) -> Result<TcpStream, TransportError> {
        info!("Connecting to device at {}", address);

        let addr = address
            .to_socket_addrs()
            .map_err(|e| {
                debug!("Address resolution failed for {}: {}", address, e);
                TransportError::Resolve(e)
            })?
            .next()
            .ok_or_else(|| {
                debug!("No addresses found for {}", address);
                TransportError::NoAddresses(address.to_string())
            })?;

        debug!("Resolved {} to {}", address, addr);

        let stream = TcpStream::connect_timeout(&addr, timeout).map_err(|e| {
            debug!("TCP connection failed to {}: {}", addr, e);
            TransportError::from_connect(e)
        })?;

        // Configure timeouts (log failures but continue - non-critical)
        if let Err(e) = stream.set_read_timeout(Some(self.read_timeout)) {
            warn!("Failed to set read timeout: {}", e);
        }
        if let Err(e) = stream.set_write_timeout(Some(timeout)) {
            warn!("Failed to set write timeout: {}", e);
        }
        if let Err(e) = stream.set_nodelay(true) {
            warn!("Failed to disable Nagle's algorithm: {}", e);
        }

        info!("Connected to device at {}", addr);
        Ok(stream)
    }

    fn close(&self, stream: TcpStream) {
        if let Err(e) = stream.shutdown(Shutdown::Both) {
            // Peer may already have closed its end
            debug!("Shutdown failed: {}", e);
        }
    }
}
