//! Device transport.
//!
//! The transmitter only needs "connect with a timeout", "write bytes" and
//! "close". [`Connector`] is that seam; [`TcpConnector`] is the real TCP
//! implementation and tests substitute a recording fake.
//!
//! # Example
//!
//! ```no_run
//! use dawon_provision::transport::{Connector, TcpConnector, CONNECT_TIMEOUT_SECS};
//! use std::io::Write;
//! use std::time::Duration;
//!
//! let connector = TcpConnector::default();
//! let mut stream = connector.connect(
//!     "192.168.43.1:5000",
//!     Duration::from_secs(CONNECT_TIMEOUT_SECS),
//! )?;
//! stream.write_all(b"{}\n")?;
//! connector.close(stream);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod tcp;

pub use tcp::{TcpConnector, CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};

use std::io;
use std::time::Duration;

/// Opens byte streams to a device.
pub trait Connector {
    /// Connected stream type.
    type Stream: io::Write;

    /// Connect to `address` (`host:port`), giving up after `timeout`.
    fn connect(&self, address: &str, timeout: Duration) -> Result<Self::Stream, TransportError>;

    /// Release a stream. Dropping it is enough unless the transport needs an
    /// explicit shutdown.
    fn close(&self, stream: Self::Stream) {
        drop(stream);
    }
}

/// Transport errors.
#[derive(Debug)]
pub enum TransportError {
    /// Address resolution failed.
    Resolve(io::Error),
    /// Address resolved to nothing.
    NoAddresses(String),
    /// TCP connection failed.
    Connection(io::Error),
    /// Connect or write did not finish in time.
    Timeout(io::Error),
    /// Writing the payload failed.
    Write(io::Error),
    /// The payload could not be encoded.
    Encode(serde_json::Error),
}

impl TransportError {
    /// Classify a connect failure, separating timeouts from other errors.
    pub fn from_connect(e: io::Error) -> Self {
        if is_timeout(&e) {
            Self::Timeout(e)
        } else {
            Self::Connection(e)
        }
    }

    /// Classify a write failure, separating timeouts from other errors.
    pub fn from_write(e: io::Error) -> Self {
        if is_timeout(&e) {
            Self::Timeout(e)
        } else {
            Self::Write(e)
        }
    }
}

fn is_timeout(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
    )
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Resolve(e) => write!(f, "address resolution failed: {}", e),
            Self::NoAddresses(addr) => write!(f, "no addresses found for {}", addr),
            Self::Connection(e) => write!(f, "connection failed: {}", e),
            Self::Timeout(e) => write!(f, "timed out: {}", e),
            Self::Write(e) => write!(f, "write failed: {}", e),
            Self::Encode(e) => write!(f, "payload encoding failed: {}", e),
        }
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Resolve(e) | Self::Connection(e) | Self::Timeout(e) | Self::Write(e) => Some(e),
            Self::Encode(e) => Some(e),
            Self::NoAddresses(_) => None,
        }
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(e: serde_json::Error) -> Self {
        Self::Encode(e)
    }
}
