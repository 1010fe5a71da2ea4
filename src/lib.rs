//! Lossless byte-stream compression with a Huffman prefix code.
//!
//! The compressed stream carries its own tree, so decompression needs no
//! dictionary, and ends with a terminator code instead of a length field.
//!
//! ```
//! use huffman_tree_compression::{compress_bytes, decompress_bytes};
//!
//! let compressed = compress_bytes(b"abracadabra")?;
//! assert_eq!(decompress_bytes(&compressed)?, b"abracadabra");
//! # Ok::<(), huffman_tree_compression::Error>(())
//! ```

mod bitchannel;
mod code;
mod codec;
mod config;
mod error;
mod frequency;
mod header;
mod symbol;
mod tree;

pub use bitchannel::{BitChannel, Direction};
pub use code::{Code, CodeTable};
pub use codec::{
    compress, compress_bytes, compress_file, decompress, decompress_bytes, decompress_file,
    CompressionStats, DecompressionStats, HuffmanCodec,
};
pub use config::{CodecOptions, TerminatorPlacement};
pub use error::{Error, Result};
pub use frequency::FrequencyTable;
pub use header::{header_bits, read_tree, write_tree};
pub use symbol::{Symbol, SYMBOL_COUNT};
pub use tree::{HuffmanTree, Node};
