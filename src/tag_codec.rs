//! Tag tree to wire form and back, one pair of functions per encoding.
//!
//! Base64 and hex wrap the binary layout. Readers tolerate surrounding whitespace.

use base64::{engine::general_purpose::STANDARD, Engine};
use nbt::{NbtTag, NbtWriteError};

use crate::error::CodecParseError;

pub fn write_binary(tag: &NbtTag) -> Result<Vec<u8>, NbtWriteError> {
    nbt::to_bytes(tag)
}

pub fn read_binary(contents: &[u8]) -> Result<NbtTag, CodecParseError> {
    Ok(nbt::from_bytes(contents)?)
}

pub fn write_base64(tag: &NbtTag) -> Result<String, NbtWriteError> {
    Ok(STANDARD.encode(write_binary(tag)?))
}

pub fn read_base64(contents: &str) -> Result<NbtTag, CodecParseError> {
    read_binary(&STANDARD.decode(contents.trim())?)
}

/// Lowercase hexadecimal.
pub fn write_hex(tag: &NbtTag) -> Result<String, NbtWriteError> {
    Ok(hex::encode(write_binary(tag)?))
}

/// Accepts either case.
pub fn read_hex(contents: &str) -> Result<NbtTag, CodecParseError> {
    read_binary(&hex::decode(contents.trim())?)
}

pub fn write_snbt(tag: &NbtTag) -> Result<String, NbtWriteError> {
    nbt::snbt::to_string(tag)
}

pub fn read_snbt(contents: &str) -> Result<NbtTag, CodecParseError> {
    Ok(nbt::snbt::from_str(contents)?)
}

/// Views text contents as a string, for the readers above.
pub(crate) fn as_text(contents: &[u8]) -> Result<&str, CodecParseError> {
    Ok(std::str::from_utf8(contents)?)
}
