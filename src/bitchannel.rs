use std::io::{self, Read, Write};

use crate::code::Code;
use crate::error::{Error, Result};


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {

    Read,
    Write

}


/// Writes out the zero-padded trailing byte, if any, then flushes the sink
type Finish<S> = fn(&mut S, Option<u8>) -> io::Result<()>;


/// Bit-granular reader or writer over a byte stream.
/// Bits are packed most significant bit first within each byte.
#[derive(Debug)]
pub struct BitChannel<S> {

    stream: S,
    direction: Direction,
    /// The byte currently being consumed or filled
    buffer: u8,
    /// Reading: bits of `buffer` not yet returned.
    /// Writing: bits of `buffer` already filled. The rest are zero
    pending: u8,
    /// How many bits went through the channel
    position: u64,
    /// Set by `writer`, where the stream is known to be a sink
    finish: Option<Finish<S>>

}

impl<S> BitChannel<S> {

    pub const fn direction(&self) -> Direction {
        self.direction
    }


    /// Bits read or written so far
    pub const fn position(&self) -> u64 {
        self.position
    }


    /// Whether the next bit falls on a byte boundary
    pub const fn is_aligned(&self) -> bool {
        self.pending == 0
    }


    /// Releases the underlying stream without flushing anything
    pub fn into_inner(self) -> S {
        self.stream
    }


    /// Hands the stream back. A write channel first emits its partially
    /// filled trailing byte, zero-padded, and flushes the sink.
    /// A read channel leaves its source untouched
    pub fn close(mut self) -> Result<S> {

        if let Some(finish) = self.finish {
            let tail = (self.pending != 0).then_some(self.buffer);
            finish(&mut self.stream, tail)?;
        }

        Ok(self.stream)
    }


    fn expect_direction(&self, expected: Direction) -> Result<()> {
        if self.direction == expected {
            Ok(())
        } else {
            Err(Error::InvalidDirection { expected, actual: self.direction })
        }
    }

}

impl<S> BitChannel<S>
where
    S: Read
{

    pub fn reader(stream: S) -> Self {
        Self {
            stream,
            direction: Direction::Read,
            buffer: 0,
            pending: 0,
            position: 0,
            finish: None
        }
    }


    pub fn read_bit(&mut self) -> Result<bool> {

        self.expect_direction(Direction::Read)?;

        if self.pending == 0 {
            self.buffer = self.pull_byte()?;
            self.pending = 8;
        }

        self.pending -= 1;
        self.position += 1;

        Ok(
            (self.buffer & (1_u8 << self.pending)) != 0
        )
    }


    pub fn read_byte(&mut self) -> Result<u8> {

        self.expect_direction(Direction::Read)?;

        if self.pending == 0 {
            // Aligned, take the byte as is
            let byte = self.pull_byte()?;
            self.position += 8;
            return Ok(byte);
        }

        let mut byte = 0_u8;
        for _ in 0..8 {
            byte = (byte << 1) | self.read_bit()? as u8;
        }

        Ok(byte)
    }


    fn pull_byte(&mut self) -> Result<u8> {

        let mut byte = [0_u8; 1];

        match self.stream.read_exact(&mut byte) {
            Ok(()) => Ok(byte[0]),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Err(Error::EndOfStream),
            Err(e) => Err(e.into())
        }
    }

}

impl<S> BitChannel<S>
where
    S: Write
{

    pub fn writer(stream: S) -> Self {
        Self {
            stream,
            direction: Direction::Write,
            buffer: 0,
            pending: 0,
            position: 0,
            finish: Some(finish_sink::<S>)
        }
    }


    pub fn write_bit(&mut self, bit: bool) -> Result<()> {

        self.expect_direction(Direction::Write)?;

        self.buffer |= (bit as u8) << (7 - self.pending);
        self.pending += 1;
        self.position += 1;

        if self.pending == 8 {
            self.emit()?;
        }

        Ok(())
    }


    pub fn write_byte(&mut self, byte: u8) -> Result<()> {

        self.expect_direction(Direction::Write)?;

        if self.pending == 0 {
            self.stream.write_all(&[byte])?;
            self.position += 8;
            return Ok(());
        }

        for i in (0..8).rev() {
            self.write_bit((byte & (1_u8 << i)) != 0)?;
        }

        Ok(())
    }


    pub fn write_code(&mut self, code: &Code) -> Result<()> {

        for bit in code.iter_bits() {
            self.write_bit(bit)?;
        }

        Ok(())
    }


    fn emit(&mut self) -> Result<()> {

        let byte = self.buffer;

        self.buffer = 0;
        self.pending = 0;

        self.stream.write_all(&[byte])?;

        Ok(())
    }

}


fn finish_sink<S>(stream: &mut S, tail: Option<u8>) -> io::Result<()>
where
    S: Write
{
    if let Some(byte) = tail {
        stream.write_all(&[byte])?;
    }
    stream.flush()
}


pub(crate) const fn least_bytes_repr_for_bits(bit_count: u64) -> u64 {
    bit_count / 8 + (bit_count % 8 != 0) as u64
}
