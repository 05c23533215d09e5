//! Payload transmitter.
//!
//! Connects to the device once, writes the payload as a single line and
//! closes the connection on every path. There is no retry.

use crate::config::ProvisionConfig;
use crate::payload::{is_well_formed, Payload, WireEncoding};
use crate::transport::{Connector, TransportError, CONNECT_TIMEOUT_SECS};
use log::{debug, info};
use std::io::{self, Write};
use std::time::Duration;
use zeroize::Zeroizing;

/// Sends a confirmed record to the device.
pub struct Transmitter<C> {
    connector: C,
    encoding: WireEncoding,
    connect_timeout: Duration,
}

impl<C: Connector> Transmitter<C> {
    /// Transmitter with the verbatim encoding and the default connect timeout.
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            encoding: WireEncoding::default(),
            connect_timeout: Duration::from_secs(CONNECT_TIMEOUT_SECS),
        }
    }

    /// Select the payload encoding.
    pub fn with_encoding(mut self, encoding: WireEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Underlying connector.
    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Encode and send `config`, reporting progress to `out`.
    ///
    /// Only a failure to write to `out` is returned as the outer error; the
    /// inner result is the outcome of the transmission itself.
    pub fn send<W: Write>(
        &self,
        config: &ProvisionConfig,
        out: &mut W,
    ) -> io::Result<Result<(), TransportError>> {
        let payload = Payload::from_config(config);
        // Carries both passwords
        let text = match payload.encode(self.encoding) {
            Ok(text) => Zeroizing::new(text),
            Err(e) => return Ok(Err(e.into())),
        };

        let unsafe_fields = payload.unsafe_fields();
        if self.encoding == WireEncoding::Verbatim && !unsafe_fields.is_empty() {
            // An injected `","key":"` still parses, so the field check decides
            let fields = unsafe_fields.join(", ");
            let problem = if is_well_formed(&text) {
                "payload fields will be misread by the device"
            } else {
                "payload is not valid JSON"
            };
            debug!("Verbatim payload has unescaped fields: {}", fields);
            writeln!(
                out,
                "[warning] - {}; these fields contain quote, backslash or control \
                 characters: {}",
                problem, fields
            )?;
        }

        let address = config.device_address();
        writeln!(out, "Connecting to {} ...", address)?;
        out.flush()?;

        let mut stream = match self.connector.connect(&address, self.connect_timeout) {
            Ok(stream) => stream,
            Err(e) => return Ok(Err(e)),
        };
        writeln!(out, "Connected.")?;
        writeln!(out, "Sending: {}", text.as_str())?;
        out.flush()?;

        let result = write_line(&mut stream, &text);
        self.connector.close(stream);

        if result.is_ok() {
            info!("Payload sent to {}", address);
        }
        Ok(result)
    }
}

/// Write `text` and its terminating newline with a single write call.
fn write_line<S: Write>(stream: &mut S, text: &str) -> Result<(), TransportError> {
    let mut line = Zeroizing::new(String::with_capacity(text.len() + 1));
    line.push_str(text);
    line.push('\n');
    stream
        .write_all(line.as_bytes())
        .and_then(|_| stream.flush())
        .map_err(TransportError::from_write)
}
