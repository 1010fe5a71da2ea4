use std::io::Read;

use crate::error::Result;
use crate::symbol::Symbol;


/// Occurrences of every byte value of an input.
/// The terminator is always part of the table, with a count of zero
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {

    counts: [u64; 256]

}

impl FrequencyTable {

    pub const fn new() -> Self {
        Self {
            counts: [0; 256]
        }
    }


    /// Counts every byte of `input` in a single pass
    pub fn build<R>(input: R) -> Result<Self>
    where
        R: Read
    {
        let mut table = Self::new();

        for byte in input.bytes() {
            table.add(byte?);
        }

        Ok(table)
    }


    pub fn from_bytes(data: &[u8]) -> Self {
        data.iter().copied().collect()
    }


    pub fn add(&mut self, byte: u8) {
        self.counts[byte as usize] += 1;
    }


    pub const fn count(&self, symbol: Symbol) -> u64 {
        match symbol {
            Symbol::Byte(b) => self.counts[b as usize],
            Symbol::Terminator => 0
        }
    }


    pub const fn contains(&self, symbol: Symbol) -> bool {
        match symbol {
            Symbol::Byte(b) => self.counts[b as usize] != 0,
            Symbol::Terminator => true
        }
    }


    /// Symbols of the table with their counts: the terminator first, then
    /// every byte that occurred, in ascending order
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, u64)> + '_ {

        let bytes = self.counts.iter()
            .enumerate()
            .filter(|&(_, &count)| count != 0)
            .map(|(b, &count)| (Symbol::Byte(b as u8), count));

        std::iter::once((Symbol::Terminator, 0)).chain(bytes)
    }


    /// Number of symbols in the table, terminator included
    pub fn distinct_symbols(&self) -> usize {
        1 + self.counts.iter().filter(|&&count| count != 0).count()
    }


    /// Number of bytes counted
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }


    /// The byte with the highest count, the lowest value on ties.
    /// `None` if no byte was counted
    pub fn most_frequent(&self) -> Option<u8> {

        let mut best: Option<(u8, u64)> = None;

        for (b, &count) in self.counts.iter().enumerate() {
            if count != 0 && best.map_or(true, |(_, best_count)| count > best_count) {
                best = Some((b as u8, count));
            }
        }

        best.map(|(b, _)| b)
    }

}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

impl Extend<u8> for FrequencyTable {
    fn extend<I: IntoIterator<Item = u8>>(&mut self, iter: I) {
        for byte in iter {
            self.add(byte);
        }
    }
}

impl FromIterator<u8> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        let mut table = Self::new();
        table.extend(iter);
        table
    }
}
