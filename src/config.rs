use crate::error::{Error, Result};


/// Where the terminator leaf ends up in a built tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TerminatorPlacement {

    /// Merged by weight like any other leaf. Having weight zero, it sinks to
    /// the bottom of the tree
    #[default]
    Merged,
    /// Paired with the most frequent byte before merging starts
    BesideMostFrequent

}


/// Tuning knobs of a [`HuffmanCodec`](crate::HuffmanCodec).
/// Only compression is affected: any well-formed stream decodes the same way
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecOptions {

    pub terminator_placement: TerminatorPlacement,
    /// Capacity of the buffers wrapping the input and output streams
    pub buffer_capacity: usize

}

impl CodecOptions {

    pub const DEFAULT_BUFFER_CAPACITY: usize = 64 * 1024;


    pub const fn new() -> Self {
        Self {
            terminator_placement: TerminatorPlacement::Merged,
            buffer_capacity: Self::DEFAULT_BUFFER_CAPACITY
        }
    }


    pub fn with_terminator_placement(mut self, placement: TerminatorPlacement) -> Self {
        self.terminator_placement = placement;
        self
    }


    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }


    pub fn validate(&self) -> Result<()> {

        if self.buffer_capacity == 0 {
            return Err(Error::InvalidConfig {
                message: "buffer capacity must be greater than zero".to_string()
            });
        }

        Ok(())
    }

}

impl Default for CodecOptions {
    fn default() -> Self {
        Self::new()
    }
}
