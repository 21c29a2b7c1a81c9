use nbt::{NbtParseError, NbtWriteError, SnbtError, Tag};
use thiserror::Error;

use crate::item::IdentifierError;

pub type Result<T> = std::result::Result<T, ItemSerializeError>;

#[derive(Debug, Error)]
pub enum ItemSerializeError {
    #[error("invalid tag type: expected {expected}, found {found}")]
    InvalidTagShape { expected: Tag, found: Tag },
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("malformed field `{field}`: {reason}")]
    MalformedField { field: &'static str, reason: String },
    #[error(transparent)]
    InvalidItemData(#[from] InvalidItemData),
    #[error(transparent)]
    CodecParse(#[from] CodecParseError),
    #[error("item cannot be encoded: {0}")]
    Encode(#[from] NbtWriteError),
}

/// The contents could not be read in the requested encoding at all.
#[derive(Debug, Error)]
pub enum CodecParseError {
    #[error("invalid binary NBT: {0}")]
    Nbt(#[from] NbtParseError),
    #[error("invalid SNBT: {0}")]
    Snbt(#[from] SnbtError),
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("text contents are not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("expected a JSON {expected}, found {found}")]
    JsonShape {
        expected: &'static str,
        found: &'static str,
    },
}

/// The tag is shaped correctly but does not describe a valid item.
#[derive(Debug, Error)]
pub enum InvalidItemData {
    #[error("missing item {0} tag")]
    Missing(&'static str),
    #[error("item {key} tag must be {expected}, found {found}")]
    WrongType {
        key: &'static str,
        expected: Tag,
        found: Tag,
    },
    #[error("invalid item name: {0}")]
    Name(#[from] IdentifierError),
    #[error("{0}")]
    Custom(String),
}

impl From<NbtParseError> for ItemSerializeError {
    fn from(value: NbtParseError) -> Self {
        ItemSerializeError::CodecParse(value.into())
    }
}

impl From<SnbtError> for ItemSerializeError {
    fn from(value: SnbtError) -> Self {
        ItemSerializeError::CodecParse(value.into())
    }
}

impl From<serde_json::Error> for ItemSerializeError {
    fn from(value: serde_json::Error) -> Self {
        ItemSerializeError::CodecParse(value.into())
    }
}
