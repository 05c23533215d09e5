//! Operator console.
//!
//! The provisioning flow only needs two capabilities from the terminal: read
//! the next answer line and print text. [`LineSource`] covers the first and is
//! implemented for every [`BufRead`], so tests can script a session with a
//! `Cursor` while the binary uses locked stdin.

use std::fmt;
use std::io::{self, BufRead, Write};
use zeroize::Zeroize;

/// Something that yields one operator answer per call.
pub trait LineSource {
    /// Read the next answer with surrounding whitespace removed.
    ///
    /// Returns `Ok(None)` once the input stream is closed. A line that is not
    /// valid UTF-8 is consumed and reported as an error for which
    /// [`is_undecodable`] holds.
    fn next_line(&mut self) -> io::Result<Option<String>>;
}

impl<R: BufRead> LineSource for R {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        let mut buf = Vec::new();
        loop {
            match self.read_until(b'\n', &mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => break,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    buf.zeroize();
                    return Err(e);
                }
            }
        }

        // Answers may be passwords: wipe every intermediate buffer
        match String::from_utf8(buf) {
            Ok(mut line) => {
                let answer = line.trim().to_string();
                line.zeroize();
                Ok(Some(answer))
            }
            Err(e) => {
                e.into_bytes().zeroize();
                Err(io::Error::new(io::ErrorKind::InvalidData, UndecodableLine))
            }
        }
    }
}

/// An input line that is not valid UTF-8.
#[derive(Debug)]
pub struct UndecodableLine;

impl fmt::Display for UndecodableLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "input line is not valid UTF-8")
    }
}

impl std::error::Error for UndecodableLine {}

/// Whether `e` reports an undecodable answer line rather than a broken stream.
pub fn is_undecodable(e: &io::Error) -> bool {
    e.get_ref()
        .map(|inner| inner.is::<UndecodableLine>())
        .unwrap_or(false)
}

/// Prompted line I/O over an answer source and an output stream.
pub struct Console<L, W> {
    input: L,
    output: W,
}

impl<L: LineSource, W: Write> Console<L, W> {
    /// Wrap an answer source and an output stream.
    pub fn new(input: L, output: W) -> Self {
        Self { input, output }
    }

    /// Print `prompt` and wait for an answer.
    ///
    /// Returns `Ok(None)` if the input stream was closed instead.
    pub fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        writeln!(self.output, "{}", prompt)?;
        self.output.flush()?;
        self.input.next_line()
    }

    /// Read another answer without printing anything first.
    pub fn read_answer(&mut self) -> io::Result<Option<String>> {
        self.output.flush()?;
        self.input.next_line()
    }

    /// Print one line.
    pub fn say(&mut self, line: impl std::fmt::Display) -> io::Result<()> {
        writeln!(self.output, "{}", line)
    }

    /// Print an empty line.
    pub fn blank(&mut self) -> io::Result<()> {
        writeln!(self.output)
    }

    /// Print a section banner.
    pub fn section(&mut self, title: &str) -> io::Result<()> {
        writeln!(self.output, "######### [{}] #########", title)
    }

    /// Flush pending output.
    pub fn flush(&mut self) -> io::Result<()> {
        self.output.flush()
    }

    /// Mutable output stream, for components that print directly.
    pub fn output_mut(&mut self) -> &mut W {
        &mut self.output
    }

    /// Consume the console and return the output stream.
    pub fn into_output(self) -> W {
        self.output
    }
}
