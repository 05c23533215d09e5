//! Provisioning session.
//!
//! Drives the collector, the confirmation gate and the transmitter as an
//! explicit state machine:
//!
//! ```text
//! Collecting --invalid--> Collecting
//! Collecting --complete--> Confirming --no--> Collecting
//!                          Confirming --yes--> Transmitting --> Done
//! Collecting/Confirming --end of input--> Aborted
//! ```
//!
//! Each pass through `Collecting` builds a fresh record; nothing carries over
//! from a rejected or declined attempt. Exactly one transmission is made.

use crate::collector::{collect, Collected};
use crate::config::{DeviceModel, ProvisionConfig};
use crate::confirm::confirm;
use crate::console::{Console, LineSource};
use crate::transmitter::Transmitter;
use crate::transport::{Connector, TransportError};
use log::{debug, info};
use std::fmt;
use std::io::{self, Write};

/// Session state.
#[derive(Debug)]
pub enum State {
    /// Prompting for a new record.
    Collecting,
    /// Waiting for the operator to approve a record.
    Confirming(ProvisionConfig),
    /// Sending an approved record.
    Transmitting(ProvisionConfig),
    /// Transmission attempted.
    Done(Result<(), TransportError>),
    /// Input ended before a record was approved.
    Aborted,
}

impl State {
    fn name(&self) -> &'static str {
        match self {
            Self::Collecting => "collecting",
            Self::Confirming(_) => "confirming",
            Self::Transmitting(_) => "transmitting",
            Self::Done(_) => "done",
            Self::Aborted => "aborted",
        }
    }
}

/// How a session ended.
#[derive(Debug)]
pub enum Outcome {
    /// The payload was written to the device.
    Provisioned,
    /// The single transmission attempt failed.
    TransmitFailed(TransportError),
    /// The operator closed the input stream.
    Aborted,
}

/// Failures of the operator console itself.
#[derive(Debug)]
pub enum SessionError {
    /// Reading answers or printing prompts failed.
    Io(io::Error),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "console I/O error: {}", e),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
        }
    }
}

impl From<io::Error> for SessionError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

/// One provisioning run.
pub struct Session<L, W, C> {
    console: Console<L, W>,
    transmitter: Transmitter<C>,
    attempts: usize,
}

impl<L: LineSource, W: Write, C: Connector> Session<L, W, C> {
    /// Create a session.
    pub fn new(console: Console<L, W>, transmitter: Transmitter<C>) -> Self {
        Self {
            console,
            transmitter,
            attempts: 0,
        }
    }

    /// Number of collection attempts started so far.
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    /// Transmitter.
    pub fn transmitter(&self) -> &Transmitter<C> {
        &self.transmitter
    }

    /// Run until the record is transmitted or input ends.
    pub fn run(&mut self) -> Result<Outcome, SessionError> {
        self.print_banner()?;

        let mut state = State::Collecting;
        loop {
            state = match state {
                State::Done(result) => return self.finish(result),
                State::Aborted => {
                    info!("Input closed, nothing sent");
                    self.console.blank()?;
                    self.console.say("Input closed. Nothing was sent.")?;
                    self.console.flush()?;
                    return Ok(Outcome::Aborted);
                }
                other => {
                    let from = other.name();
                    let next = self.step(other)?;
                    debug!("State {} -> {}", from, next.name());
                    next
                }
            };
        }
    }

    /// Advance one non-terminal state.
    pub fn step(&mut self, state: State) -> Result<State, SessionError> {
        let next = match state {
            State::Collecting => {
                self.attempts += 1;
                debug!("Collection attempt {}", self.attempts);
                match collect(&mut self.console)? {
                    Collected::Complete(config) => {
                        self.console.blank()?;
                        State::Confirming(config)
                    }
                    Collected::Rejected(_) => State::Collecting,
                    Collected::EndOfInput => State::Aborted,
                }
            }
            State::Confirming(config) => match confirm(&mut self.console, &config)? {
                Some(true) => {
                    self.console.say("Settings confirmed.")?;
                    self.console.blank()?;
                    State::Transmitting(config)
                }
                Some(false) => {
                    self.console.blank()?;
                    State::Collecting
                }
                None => State::Aborted,
            },
            State::Transmitting(config) => {
                let result = self
                    .transmitter
                    .send(&config, self.console.output_mut())?;
                State::Done(result)
            }
            terminal => terminal,
        };
        Ok(next)
    }

    fn finish(&mut self, result: Result<(), TransportError>) -> Result<Outcome, SessionError> {
        let outcome = match result {
            Ok(()) => {
                self.console.say("#### Success ####")?;
                Outcome::Provisioned
            }
            Err(e) => {
                debug!("Transmission failed: {:?}", e);
                self.console.say(format!("[error] - {}", e))?;
                self.console.say("#### Failure ####")?;
                Outcome::TransmitFailed(e)
            }
        };
        self.console.flush()?;
        Ok(outcome)
    }

    fn print_banner(&mut self) -> io::Result<()> {
        self.console.say("###############################################")?;
        self.console.say("########## DAWONDNS Smart Plug Setup ##########")?;
        self.console.say("###############################################")?;
        self.console.say(format!(
            "## Supported models: {}",
            DeviceModel::supported_list()
        ))?;
        self.console.blank()
    }
}

impl<L, W, C> Session<L, W, C> {
    /// Consume the session and return its console.
    pub fn into_console(self) -> Console<L, W> {
        self.console
    }
}
