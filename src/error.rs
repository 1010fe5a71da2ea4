use thiserror::Error;

use crate::bitchannel::Direction;


pub type Result<T> = std::result::Result<T, Error>;


#[derive(Debug, Error)]
pub enum Error {

    /// The underlying source or sink failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A bit operation was attempted on a channel opened the other way
    #[error("invalid direction: channel is open for {actual:?}, operation needs {expected:?}")]
    InvalidDirection { expected: Direction, actual: Direction },

    /// The underlying source has no more bits
    #[error("end of stream")]
    EndOfStream,

    #[error("corrupt header: {message}")]
    CorruptHeader { message: String },

    /// The payload ran out before the terminator was decoded
    #[error("truncated stream: no terminator after {bits_read} payload bits")]
    TruncatedStream { bits_read: u64 },

    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

}

impl Error {

    pub fn corrupt_header(message: impl Into<String>) -> Self {
        Error::CorruptHeader { message: message.into() }
    }

}
