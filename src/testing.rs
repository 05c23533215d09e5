//! Test doubles shared by the unit tests.

use crate::transport::{Connector, TransportError};
use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;
use std::time::Duration;

#[derive(Debug, Default)]
struct Record {
    addresses: Vec<String>,
    sent: Vec<u8>,
    write_calls: usize,
    closed: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Accept,
    Refuse,
    FailWrites,
}

/// Connector that records every connect, write and close instead of touching
/// the network.
#[derive(Debug)]
pub struct RecordingConnector {
    record: Rc<RefCell<Record>>,
    mode: Mode,
}

impl RecordingConnector {
    /// Accepts connections and stores written bytes.
    pub fn new() -> Self {
        Self::with_mode(Mode::Accept)
    }

    /// Fails every connect with `ConnectionRefused`.
    pub fn refusing() -> Self {
        Self::with_mode(Mode::Refuse)
    }

    /// Connects, then fails every write with `BrokenPipe`.
    pub fn failing_writes() -> Self {
        Self::with_mode(Mode::FailWrites)
    }

    fn with_mode(mode: Mode) -> Self {
        Self {
            record: Rc::new(RefCell::new(Record::default())),
            mode,
        }
    }

    /// Addresses passed to `connect`, in order.
    pub fn addresses(&self) -> Vec<String> {
        self.record.borrow().addresses.clone()
    }

    /// Bytes written across all streams.
    pub fn sent(&self) -> Vec<u8> {
        self.record.borrow().sent.clone()
    }

    /// Number of `write` calls across all streams.
    pub fn write_calls(&self) -> usize {
        self.record.borrow().write_calls
    }

    /// Number of streams closed.
    pub fn closed(&self) -> usize {
        self.record.borrow().closed
    }
}

impl Connector for RecordingConnector {
    type Stream = RecordingStream;

    fn connect(&self, address: &str, _timeout: Duration) -> Result<RecordingStream, TransportError> {
        self.record.borrow_mut().addresses.push(address.to_string());
        if self.mode == Mode::Refuse {
            return Err(TransportError::from_connect(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "connection refused",
            )));
        }
        Ok(RecordingStream {
            record: Rc::clone(&self.record),
            fail: self.mode == Mode::FailWrites,
        })
    }

    fn close(&self, stream: RecordingStream) {
        self.record.borrow_mut().closed += 1;
        drop(stream);
    }
}

/// Stream handed out by [`RecordingConnector`].
#[derive(Debug)]
pub struct RecordingStream {
    record: Rc<RefCell<Record>>,
    fail: bool,
}

impl Write for RecordingStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut record = self.record.borrow_mut();
        record.write_calls += 1;
        if self.fail {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "broken pipe"));
        }
        record.sent.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
