use std::fmt;


/// Number of distinct symbols: every byte value plus the terminator
pub const SYMBOL_COUNT: usize = 257;


/// One value of the compression alphabet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {

    Byte(u8),
    /// Marks the end of the payload. Never occurs in the input
    Terminator,

}

impl Symbol {

    /// Dense index in `0..SYMBOL_COUNT`, the terminator being last
    pub const fn index(self) -> usize {
        match self {
            Symbol::Byte(b) => b as usize,
            Symbol::Terminator => SYMBOL_COUNT - 1
        }
    }


    pub const fn from_index(index: usize) -> Option<Self> {
        if index < SYMBOL_COUNT - 1 {
            Some(Symbol::Byte(index as u8))
        } else if index == SYMBOL_COUNT - 1 {
            Some(Symbol::Terminator)
        } else {
            None
        }
    }


    pub const fn is_terminator(self) -> bool {
        matches!(self, Symbol::Terminator)
    }


    pub const fn as_byte(self) -> Option<u8> {
        match self {
            Symbol::Byte(b) => Some(b),
            Symbol::Terminator => None
        }
    }

}

impl From<u8> for Symbol {
    fn from(b: u8) -> Self {
        Symbol::Byte(b)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Byte(b) if b.is_ascii_graphic() => write!(f, "'{}'", *b as char),
            Symbol::Byte(b) => write!(f, "0x{:02x}", b),
            Symbol::Terminator => f.write_str("<EOS>")
        }
    }
}
