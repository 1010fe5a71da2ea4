//! Pre-order serialization of a [`HuffmanTree`].
//!
//! Every node starts with a flag bit:
//! - `0`: internal node, followed by its left then its right subtree
//! - `1`: leaf, followed by a marker bit. Marker `0` is followed by the
//!   8 bits of the leaf byte, marker `1` denotes the terminator
//!
//! Weights are not stored: the decoder only needs the shape.

use std::io::{Read, Write};

use crate::bitchannel::BitChannel;
use crate::code::Code;
use crate::error::{Error, Result};
use crate::symbol::{Symbol, SYMBOL_COUNT};
use crate::tree::{HuffmanTree, Node};


const LEAF_FLAG: bool = true;
const TERMINATOR_MARKER: bool = true;

/// A full binary tree over at most `SYMBOL_COUNT` leaves
const MAX_INTERNAL_NODES: usize = SYMBOL_COUNT - 1;

/// Deepest leaf a [`Code`] can address
const MAX_CODE_LEN: usize = Code::MAX_LEN;


pub fn write_tree<W>(tree: &HuffmanTree, channel: &mut BitChannel<W>) -> Result<()>
where
    W: Write
{
    write_node(tree.root(), channel)
}


fn write_node<W>(node: &Node, channel: &mut BitChannel<W>) -> Result<()>
where
    W: Write
{
    match node {

        Node::Internal { left, right, .. } => {
            channel.write_bit(!LEAF_FLAG)?;
            write_node(left, channel)?;
            write_node(right, channel)
        },

        Node::Leaf { symbol, .. } => {
            channel.write_bit(LEAF_FLAG)?;

            match symbol {
                Symbol::Byte(b) => {
                    channel.write_bit(!TERMINATOR_MARKER)?;
                    channel.write_byte(*b)
                },
                Symbol::Terminator => channel.write_bit(TERMINATOR_MARKER)
            }
        },
    }
}


/// Number of bits `write_tree` emits for `tree`
pub fn header_bits(tree: &HuffmanTree) -> u64 {

    fn node_bits(node: &Node) -> u64 {
        match node {
            Node::Internal { left, right, .. } => 1 + node_bits(left) + node_bits(right),
            Node::Leaf { symbol: Symbol::Byte(_), .. } => 10,
            Node::Leaf { symbol: Symbol::Terminator, .. } => 2
        }
    }

    node_bits(tree.root())
}


/// Reads a tree back. Fails with [`Error::CorruptHeader`] if the stream ends
/// before the tree is complete or the bits don't describe a valid tree.
/// Trees with a leaf deeper than [`Code::MAX_LEN`] are rejected too
pub fn read_tree<R>(channel: &mut BitChannel<R>) -> Result<HuffmanTree>
where
    R: Read
{
    let mut parser = TreeParser {
        seen: [false; SYMBOL_COUNT],
        internal_nodes: 0
    };

    let root = parser.read_node(channel, 0)
        .map_err(|e| match e {
            Error::EndOfStream => Error::corrupt_header(
                format!("stream ended after {} header bits", channel.position())
            ),
            e => e
        })?;

    if !parser.seen[Symbol::Terminator.index()] {
        return Err(Error::corrupt_header("no terminator leaf"));
    }

    Ok(HuffmanTree::from_root(root))
}


struct TreeParser {

    /// Symbols already placed in a leaf
    seen: [bool; SYMBOL_COUNT],
    internal_nodes: usize

}

impl TreeParser {

    /// `depth` is the length of the path to the node being read
    fn read_node<R>(&mut self, channel: &mut BitChannel<R>, depth: usize) -> Result<Node>
    where
        R: Read
    {
        if channel.read_bit()? == LEAF_FLAG {

            let symbol = if channel.read_bit()? == TERMINATOR_MARKER {
                Symbol::Terminator
            } else {
                Symbol::Byte(channel.read_byte()?)
            };

            if self.seen[symbol.index()] {
                return Err(Error::corrupt_header(format!("{symbol} labels two leaves")));
            }
            self.seen[symbol.index()] = true;

            return Ok(Node::leaf(symbol, 0));
        }

        // Also bounds the recursion depth on hostile input
        self.internal_nodes += 1;
        if self.internal_nodes > MAX_INTERNAL_NODES {
            return Err(Error::corrupt_header(
                format!("more than {MAX_INTERNAL_NODES} internal nodes")
            ));
        }

        if depth >= MAX_CODE_LEN {
            return Err(Error::corrupt_header(
                format!("leaves deeper than {MAX_CODE_LEN} levels")
            ));
        }

        let left = self.read_node(channel, depth + 1)?;
        let right = self.read_node(channel, depth + 1)?;

        Ok(Node::merge(left, right))
    }

}
