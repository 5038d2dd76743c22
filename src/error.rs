//! Error kinds shared by every component, per the error handling design.
//!
//! Only initialization-time operations fail; steady-state operations such
//! as `correlate` or a delay-table lookup assume a valid instance and do
//! not return `Result`. There is no retry policy anywhere; every kind here
//! except [`Error::ShortWrite`] is terminal at its call site.

use std::fmt;
use std::io;

#[derive(Debug)]
pub enum Error {
    /// File missing, unsupported WAV format, or mismatched sample rates.
    BadInput(String),
    /// Allocation or FFT plan creation failed.
    ResourceExhausted(String),
    /// Sample cursor has moved past the end of the stream.
    OutOfRange,
    /// A WAV write did not complete; the file may be left truncated.
    ShortWrite(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BadInput(msg) => write!(f, "bad input: {msg}"),
            Error::ResourceExhausted(msg) => write!(f, "resource exhausted: {msg}"),
            Error::OutOfRange => write!(f, "sample cursor out of range"),
            Error::ShortWrite(msg) => write!(f, "short write: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::BadInput(e.to_string())
    }
}
