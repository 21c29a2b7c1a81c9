//! Owned NBT (Named Binary Tag) trees with a binary and a structured-text (SNBT) codec.

use thiserror::Error;

pub(crate) mod binary;
pub mod snbt;
pub(crate) mod tag;
pub(crate) mod value;

pub use binary::{from_bytes, from_bytes_with, to_bytes, to_bytes_with};
pub use snbt::SnbtError;
pub use tag::Tag;
pub use value::{ListTypeMismatch, NbtCompound, NbtList, NbtTag};

/// Maximum nesting of compounds and lists accepted by the readers and the binary writer.
pub const MAX_DEPTH: usize = 512;

/// Layout of the root entry in the binary format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NbtFlavor {
    /// The root tag is followed by a (usually empty) name, as in files and saved data.
    #[default]
    Named,
    /// The root tag has no name or name length, as sent over the network.
    Network,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NbtParseError {
    #[error("NBT data is empty")]
    Empty,
    #[error("invalid NBT tag {value} at position {pos}")]
    InvalidTag { value: u8, pos: usize },
    #[error("invalid NBT list type {tag:?}")]
    InvalidListType { tag: Tag },
    #[error("negative NBT length {len} at position {pos}")]
    NegativeLength { len: i32, pos: usize },
    #[error("unexpected NBT end tag at position {pos}")]
    UnexpectedEnd { pos: usize },
    #[error("sudden end of data at position {pos}, {needed} more bytes expected")]
    SuddenEnd { pos: usize, needed: usize },
    #[error("trailing data after the root tag at position {pos}")]
    TrailingBytes { pos: usize },
    #[error("NBT nesting deeper than {max} levels")]
    TooDeep { max: usize },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NbtWriteError {
    #[error("NBT string is {len} bytes long once encoded, must be at most {}", u16::MAX)]
    StringTooLong { len: usize },
    #[error("NBT {tag} has {len} elements, must be at most {}", i32::MAX)]
    TooManyElements { tag: Tag, len: usize },
    #[error("NBT nesting deeper than {max} levels")]
    TooDeep { max: usize },
}
