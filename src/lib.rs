//! DAWONDNS smart plug provisioning.
//!
//! Collects WiFi and MQTT settings from an operator, asks for confirmation
//! and sends them to the plug's setup socket in the format its firmware
//! expects. Terminal and socket access go through [`console::LineSource`] and
//! [`transport::Connector`] so the whole flow can run against scripted input.

pub mod collector;
pub mod config;
pub mod confirm;
pub mod console;
pub mod payload;
pub mod session;
#[cfg(test)]
mod testing;
pub mod transmitter;
pub mod transport;

// Re-export commonly used items
pub use config::{ConfigError, DeviceModel, ProvisionConfig};
pub use console::{Console, LineSource};
pub use payload::{Payload, WireEncoding};
pub use session::{Outcome, Session, SessionError, State};
pub use transmitter::Transmitter;
pub use transport::{Connector, TcpConnector, TransportError};
