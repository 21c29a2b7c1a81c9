//! Encoding selected per call, routed to the matching codec.

use std::fmt::Display;
use std::str::FromStr;

use derive_more::From;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::Result;
use crate::item::StackItem;
use crate::serializer::{
    Base64ItemSerializer, BinaryItemSerializer, HexItemSerializer, ItemSerializer,
    JsonItemSerializer, SnbtItemSerializer,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    Binary,
    Base64,
    Hex,
    Snbt,
    Json,
}

impl Encoding {
    pub const ALL: [Encoding; 5] = [
        Encoding::Binary,
        Encoding::Base64,
        Encoding::Hex,
        Encoding::Snbt,
        Encoding::Json,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Encoding::Binary => "binary",
            Encoding::Base64 => "base64",
            Encoding::Hex => "hex",
            Encoding::Snbt => "snbt",
            Encoding::Json => "json",
        }
    }

    /// Whether payloads in this encoding are UTF-8 text.
    pub fn is_text(self) -> bool {
        self != Encoding::Binary
    }
}

impl Display for Encoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown encoding {0}, must be one of binary, base64, hex, snbt, json")]
pub struct UnknownEncoding(String);

impl FromStr for Encoding {
    type Err = UnknownEncoding;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Encoding::ALL
            .into_iter()
            .find(|encoding| encoding.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownEncoding(s.to_string()))
    }
}

/// Output of the multiplexed API: text for every encoding except [`Encoding::Binary`].
#[derive(Debug, Clone, PartialEq, Eq, From)]
pub enum SerializedPayload {
    Text(String),
    Binary(Vec<u8>),
}

impl SerializedPayload {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            SerializedPayload::Text(text) => text.as_bytes(),
            SerializedPayload::Binary(bytes) => bytes,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            SerializedPayload::Text(text) => Some(text),
            SerializedPayload::Binary(_) => None,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            SerializedPayload::Text(text) => text.into_bytes(),
            SerializedPayload::Binary(bytes) => bytes,
        }
    }
}

impl AsRef<[u8]> for SerializedPayload {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

/// Runs `$body` with `$codec` bound to the codec type of `$encoding`.
macro_rules! with_codec {
    ($encoding:expr, $codec:ident => $body:expr) => {
        match $encoding {
            Encoding::Binary => {
                type $codec = BinaryItemSerializer;
                $body
            }
            Encoding::Base64 => {
                type $codec = Base64ItemSerializer;
                $body
            }
            Encoding::Hex => {
                type $codec = HexItemSerializer;
                $body
            }
            Encoding::Snbt => {
                type $codec = SnbtItemSerializer;
                $body
            }
            Encoding::Json => {
                type $codec = JsonItemSerializer;
                $body
            }
        }
    };
}

pub fn serialize<I: StackItem>(item: &I, encoding: Encoding) -> Result<SerializedPayload> {
    with_codec!(encoding, Codec => Ok(Codec::serialize(item)?.into()))
}

pub fn serialize_list<I: StackItem>(items: &[I], encoding: Encoding) -> Result<SerializedPayload> {
    with_codec!(encoding, Codec => Ok(Codec::serialize_list(items)?.into()))
}

pub fn deserialize<I: StackItem>(contents: impl AsRef<[u8]>, encoding: Encoding) -> Result<I> {
    with_codec!(encoding, Codec => Codec::deserialize(contents.as_ref()))
}

pub fn deserialize_list<I: StackItem>(
    contents: impl AsRef<[u8]>,
    encoding: Encoding,
) -> Result<Vec<I>> {
    with_codec!(encoding, Codec => Codec::deserialize_list(contents.as_ref()))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::ItemSerializeError;
    use crate::item::ItemStack;

    #[test]
    fn encoding_names() {
        for encoding in Encoding::ALL {
            assert_eq!(encoding.to_string().parse(), Ok(encoding));
            assert_eq!(
                serde_json::to_string(&encoding).unwrap(),
                format!("\"{encoding}\"")
            );
        }
        assert_eq!("SNBT".parse(), Ok(Encoding::Snbt));
        assert_eq!(
            "yaml".parse::<Encoding>(),
            Err(UnknownEncoding("yaml".to_string()))
        );
        assert_eq!(
            serde_json::from_str::<Encoding>("\"base64\"").unwrap(),
            Encoding::Base64
        );
    }

    #[test]
    fn payload_kind_follows_encoding() {
        let item = ItemStack::new("minecraft:bread".try_into().unwrap(), 7);
        for encoding in Encoding::ALL {
            let payload = serialize(&item, encoding).unwrap();
            assert_eq!(payload.as_text().is_some(), encoding.is_text(), "{encoding}");

            let restored: ItemStack = deserialize(&payload, encoding).unwrap();
            assert_eq!(restored, item);
        }
    }

    #[test]
    fn same_output_as_codecs() {
        let items = vec![
            ItemStack::new("minecraft:bread".try_into().unwrap(), 7),
            ItemStack::new("minecraft:bow".try_into().unwrap(), 1).with_damage(40),
        ];
        assert_eq!(
            serialize(&items[1], Encoding::Hex).unwrap(),
            SerializedPayload::Text(HexItemSerializer::serialize(&items[1]).unwrap())
        );
        assert_eq!(
            serialize_list(&items, Encoding::Binary).unwrap(),
            SerializedPayload::Binary(BinaryItemSerializer::serialize_list(&items).unwrap())
        );
        assert_eq!(
            serialize_list(&items, Encoding::Json).unwrap().into_bytes(),
            JsonItemSerializer::serialize_list(&items).unwrap().into_bytes()
        );
    }

    #[test]
    fn contents_in_the_wrong_encoding() {
        let payload = serialize(
            &ItemStack::new("minecraft:bread".try_into().unwrap(), 7),
            Encoding::Snbt,
        )
        .unwrap();
        assert!(matches!(
            deserialize::<ItemStack>(&payload, Encoding::Hex),
            Err(ItemSerializeError::CodecParse(_))
        ));
        assert!(matches!(
            deserialize_list::<ItemStack>(&payload, Encoding::Snbt),
            Err(ItemSerializeError::InvalidTagShape { .. })
        ));
    }
}
