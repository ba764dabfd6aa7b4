// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! Input and output ports, which connect a [Machine] to the outside world.
//!
//! The machine itself never does any I/O of its own. Each `IN` instruction asks its
//! [InputPort] for the next value, and each `OUT` instruction hands a value to its [OutputPort].
//!
//! # Example
//!
//! Two machines piped together through channels, each on its own thread:
//!
//! ```
//! use intcode::prelude::*;
//! use std::sync::mpsc::channel;
//!
//! // reads a number and outputs it plus one
//! const INCREMENT: [i64; 10] = [3, 9, 1001, 9, 1, 9, 4, 9, 99, 0];
//!
//! let (to_first, first_in) = channel::<i64>();
//! let (first_out, second_in) = channel::<i64>();
//! let (second_out, results) = channel::<i64>();
//! let mut first = Machine::new(INCREMENT, first_in, first_out);
//! let mut second = Machine::new(INCREMENT, second_in, second_out);
//!
//! to_first.send(40).unwrap();
//! std::thread::scope(|s| {
//!     s.spawn(|| first.run());
//!     s.spawn(|| second.run());
//! });
//! assert_eq!(results.recv(), Ok(42));
//! ```
//!
//! [Machine]: crate::Machine

use std::collections::VecDeque;
use std::error::Error;
use std::fmt::{self, Display};
use std::io::{self, BufRead, Write};
use std::sync::mpsc::{Receiver, Sender};

/// An error reported by a port
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum PortError {
    /// The other end of the port has gone away
    Disconnected,
    /// Text read by the port could not be parsed as an integer
    InvalidInput(String),
    /// An underlying I/O operation failed
    Io(io::ErrorKind),
}

impl Display for PortError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortError::Disconnected => write!(f, "port disconnected"),
            PortError::InvalidInput(s) => write!(f, "{s:?} is not a valid integer"),
            PortError::Io(kind) => write!(f, "an I/O error occurred: {kind}"),
        }
    }
}

impl Error for PortError {}

impl From<io::Error> for PortError {
    fn from(err: io::Error) -> Self {
        Self::Io(err.kind())
    }
}

/// A source of values for `IN` instructions
pub trait InputPort {
    /// Get the next input value.
    ///
    /// Returns `Ok(None)` if no value is available right now, in which case the machine stops in
    /// the [Awaiting] state and retries the same `IN` instruction on the next run.
    ///
    /// [Awaiting]: crate::State::Awaiting
    fn next_input(&mut self) -> Result<Option<i64>, PortError>;
}

/// A destination for the values of `OUT` instructions
pub trait OutputPort {
    /// Send `value` out of the machine
    fn emit(&mut self, value: i64) -> Result<(), PortError>;
}

impl<P: InputPort + ?Sized> InputPort for &mut P {
    fn next_input(&mut self) -> Result<Option<i64>, PortError> {
        (**self).next_input()
    }
}

impl<P: InputPort + ?Sized> InputPort for Box<P> {
    fn next_input(&mut self) -> Result<Option<i64>, PortError> {
        (**self).next_input()
    }
}

impl<P: OutputPort + ?Sized> OutputPort for &mut P {
    fn emit(&mut self, value: i64) -> Result<(), PortError> {
        (**self).emit(value)
    }
}

impl<P: OutputPort + ?Sized> OutputPort for Box<P> {
    fn emit(&mut self, value: i64) -> Result<(), PortError> {
        (**self).emit(value)
    }
}

impl InputPort for VecDeque<i64> {
    fn next_input(&mut self) -> Result<Option<i64>, PortError> {
        Ok(self.pop_front())
    }
}

impl OutputPort for Vec<i64> {
    fn emit(&mut self, value: i64) -> Result<(), PortError> {
        self.push(value);
        Ok(())
    }
}

/// Blocks until a value arrives. Once every sender is dropped, reports that no input is available.
impl InputPort for Receiver<i64> {
    fn next_input(&mut self) -> Result<Option<i64>, PortError> {
        Ok(self.recv().ok())
    }
}

impl OutputPort for Sender<i64> {
    fn emit(&mut self, value: i64) -> Result<(), PortError> {
        self.send(value).map_err(|_| PortError::Disconnected)
    }
}

/// An [InputPort] wrapping any iterator of ints
#[derive(Debug, Clone)]
pub struct Inputs<I>(pub I);

impl<I: Iterator<Item = i64>> InputPort for Inputs<I> {
    fn next_input(&mut self) -> Result<Option<i64>, PortError> {
        Ok(self.0.next())
    }
}

impl<I: Iterator<Item = i64>> From<I> for Inputs<I> {
    fn from(iter: I) -> Self {
        Self(iter)
    }
}

/// An [OutputPort] that drops everything sent to it
#[derive(Debug, Default, Clone, Copy)]
pub struct Discard;

impl OutputPort for Discard {
    fn emit(&mut self, _: i64) -> Result<(), PortError> {
        Ok(())
    }
}

/// Line-oriented terminal I/O: one decimal integer per line in each direction.
///
/// Blank lines are skipped. End of input means no more input is available.
#[derive(Debug)]
pub struct Console<R, W> {
    reader: R,
    writer: W,
    prompt: Option<&'static str>,
}

impl Console<io::StdinLock<'static>, io::Stdout> {
    /// A console reading from stdin and writing to stdout
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    /// Create a console from a reader and a writer
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            prompt: None,
        }
    }

    /// Write `prompt` before each line of input is read
    pub fn with_prompt(mut self, prompt: &'static str) -> Self {
        self.prompt = Some(prompt);
        self
    }

    /// Get back the reader and writer
    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }
}

impl<R: BufRead, W: Write> InputPort for Console<R, W> {
    fn next_input(&mut self) -> Result<Option<i64>, PortError> {
        let mut line = String::new();
        loop {
            if let Some(prompt) = self.prompt {
                write!(self.writer, "{prompt}")?;
                self.writer.flush()?;
            }
            line.clear();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                return trimmed
                    .parse()
                    .map(Some)
                    .map_err(|_| PortError::InvalidInput(trimmed.to_owned()));
            }
        }
    }
}

impl<R, W: Write> OutputPort for Console<R, W> {
    fn emit(&mut self, value: i64) -> Result<(), PortError> {
        writeln!(self.writer, "{value}")?;
        Ok(())
    }
}
