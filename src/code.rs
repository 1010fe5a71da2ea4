use std::fmt;

use log::trace;

use crate::symbol::{Symbol, SYMBOL_COUNT};
use crate::tree::{HuffmanTree, Node};


/// Path from the root to a leaf: 0 steps left, 1 steps right
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Code {

    /// The path, right-aligned, first step in the highest meaningful bit.
    /// Huffman depth grows with the Fibonacci sequence of weights, so 64-bit
    /// counts keep any built tree within `MAX_LEN`
    bits: u128,
    /// How many bits have meaning
    meaningful: u8

}

impl Code {

    /// Longest path a code can hold. One bit short of the width of `bits`
    /// so `is_prefix_of` never shifts by the full width
    pub const MAX_LEN: usize = u128::BITS as usize - 1;


    pub const fn new_zeroed() -> Self {
        Self {
            bits: 0,
            meaningful: 0
        }
    }


    pub const fn step_left(&self) -> Self {
        Self {
            bits: self.bits << 1,
            meaningful: self.meaningful + 1
        }
    }


    pub const fn step_right(&self) -> Self {
        Self {
            bits: (self.bits << 1) | 1,
            meaningful: self.meaningful + 1
        }
    }


    /// The code with its last step removed, `None` for the root
    pub const fn parent(&self) -> Option<Code> {
        if self.meaningful == 0 {
            return None;
        }
        Some(Self {
            bits: self.bits >> 1,
            meaningful: self.meaningful - 1
        })
    }


    pub const fn len(&self) -> usize {
        self.meaningful as usize
    }


    pub const fn is_empty(&self) -> bool {
        self.meaningful == 0
    }


    /// The raw path bits, last step in the lowest bit
    pub const fn bits(&self) -> u128 {
        self.bits
    }


    pub fn iter_bits(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.meaningful)
            .rev()
            .map(|i| (self.bits & (1_u128 << i)) != 0)
    }


    /// Whether `self` is a prefix of `other`. Every code is a prefix of itself
    pub const fn is_prefix_of(&self, other: &Code) -> bool {
        self.meaningful <= other.meaningful
            && (other.bits >> (other.meaningful - self.meaningful)) == self.bits
    }

}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.iter_bits() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}


/// Code of every leaf of a tree, indexed by symbol
#[derive(Debug, Clone)]
pub struct CodeTable {

    codes: [Option<Code>; SYMBOL_COUNT],
    len: usize

}

impl CodeTable {

    pub fn from_tree(tree: &HuffmanTree) -> Self {

        let mut table = Self {
            codes: [None; SYMBOL_COUNT],
            len: 0
        };

        table.assign(tree.root(), Code::new_zeroed());

        trace!("Derived {} codes, longest is {} bits", table.len, table.max_len());

        table
    }


    fn assign(&mut self, node: &Node, code: Code) {

        match node {

            Node::Internal { left, right, .. } => {
                self.assign(left, code.step_left());
                self.assign(right, code.step_right());
            },

            Node::Leaf { symbol, .. } => {
                self.codes[symbol.index()] = Some(code);
                self.len += 1;
            },
        }
    }


    pub fn get(&self, symbol: Symbol) -> Option<&Code> {
        self.codes[symbol.index()].as_ref()
    }


    pub const fn len(&self) -> usize {
        self.len
    }


    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }


    pub fn max_len(&self) -> usize {
        self.iter()
            .map(|(_, code)| code.len())
            .max()
            .unwrap_or(0)
    }


    /// Symbols with a code, in index order
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &Code)> + '_ {
        self.codes.iter()
            .enumerate()
            .filter_map(|(i, code)| Some((Symbol::from_index(i)?, code.as_ref()?)))
    }

}
