//! One codec per encoding. Each implements the two tag-level primitives of [`ItemSerializer`]
//! and gets the item and item-list operations for free.

use nbt::{NbtList, NbtTag, Tag};

use crate::dispatch::{Encoding, SerializedPayload};
use crate::error::{ItemSerializeError, Result};
use crate::item::StackItem;
use crate::{mapper, tag_codec, utf8};

mod json;

pub use json::JsonItemSerializer;

/// What a codec hands back to its caller.
pub trait Payload: Into<SerializedPayload> {
    /// Wraps the raw output of [`ItemSerializer::serialize_tag`].
    fn from_buffer(buffer: Vec<u8>) -> Self;
}

impl Payload for String {
    fn from_buffer(buffer: Vec<u8>) -> Self {
        utf8::normalize(buffer)
    }
}

impl Payload for Vec<u8> {
    fn from_buffer(buffer: Vec<u8>) -> Self {
        buffer
    }
}

pub trait ItemSerializer {
    const ENCODING: Encoding;

    type Payload: Payload;

    /// Writes a whole tag tree in this encoding.
    fn serialize_tag(tag: &NbtTag) -> Result<Vec<u8>>;

    /// Reads a tag tree written by [`serialize_tag`](ItemSerializer::serialize_tag).
    fn deserialize_tag(contents: &[u8]) -> Result<NbtTag>;

    fn serialize<I: StackItem>(item: &I) -> Result<Self::Payload> {
        let tag = NbtTag::Compound(mapper::item_to_tag(item));
        let buffer = Self::serialize_tag(&tag)?;
        tracing::trace!("Serialized item to {} bytes of {}.", buffer.len(), Self::ENCODING);
        Ok(<Self::Payload as Payload>::from_buffer(buffer))
    }

    /// Serializes `items` as one list tag, in order.
    fn serialize_list<I: StackItem>(items: &[I]) -> Result<Self::Payload> {
        let list = NbtList::from_compounds(items.iter().map(mapper::item_to_tag));
        let buffer = Self::serialize_tag(&NbtTag::List(list))?;
        tracing::trace!(
            "Serialized {} items to {} bytes of {}.",
            items.len(),
            buffer.len(),
            Self::ENCODING
        );
        Ok(<Self::Payload as Payload>::from_buffer(buffer))
    }

    fn deserialize<I: StackItem>(contents: impl AsRef<[u8]>) -> Result<I> {
        let contents = contents.as_ref();
        tracing::trace!("Deserializing item from {} bytes of {}.", contents.len(), Self::ENCODING);
        mapper::item_from_tag(Self::deserialize_tag(contents)?)
    }

    /// Reads a list written by [`serialize_list`](ItemSerializer::serialize_list), stopping at the
    /// first element that is not a valid item.
    fn deserialize_list<I: StackItem>(contents: impl AsRef<[u8]>) -> Result<Vec<I>> {
        let contents = contents.as_ref();
        tracing::trace!("Deserializing items from {} bytes of {}.", contents.len(), Self::ENCODING);
        match Self::deserialize_tag(contents)? {
            NbtTag::List(list) => list.into_iter().map(mapper::item_from_tag).collect(),
            other => Err(ItemSerializeError::InvalidTagShape {
                expected: Tag::List,
                found: other.tag(),
            }),
        }
    }
}

/// Binary NBT with a named root.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryItemSerializer;

impl ItemSerializer for BinaryItemSerializer {
    const ENCODING: Encoding = Encoding::Binary;

    type Payload = Vec<u8>;

    fn serialize_tag(tag: &NbtTag) -> Result<Vec<u8>> {
        Ok(tag_codec::write_binary(tag)?)
    }

    fn deserialize_tag(contents: &[u8]) -> Result<NbtTag> {
        Ok(tag_codec::read_binary(contents)?)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Base64ItemSerializer;

impl ItemSerializer for Base64ItemSerializer {
    const ENCODING: Encoding = Encoding::Base64;

    type Payload = String;

    fn serialize_tag(tag: &NbtTag) -> Result<Vec<u8>> {
        Ok(tag_codec::write_base64(tag)?.into_bytes())
    }

    fn deserialize_tag(contents: &[u8]) -> Result<NbtTag> {
        Ok(tag_codec::read_base64(tag_codec::as_text(contents)?)?)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HexItemSerializer;

impl ItemSerializer for HexItemSerializer {
    const ENCODING: Encoding = Encoding::Hex;

    type Payload = String;

    fn serialize_tag(tag: &NbtTag) -> Result<Vec<u8>> {
        Ok(tag_codec::write_hex(tag)?.into_bytes())
    }

    fn deserialize_tag(contents: &[u8]) -> Result<NbtTag> {
        Ok(tag_codec::read_hex(tag_codec::as_text(contents)?)?)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SnbtItemSerializer;

impl ItemSerializer for SnbtItemSerializer {
    const ENCODING: Encoding = Encoding::Snbt;

    type Payload = String;

    fn serialize_tag(tag: &NbtTag) -> Result<Vec<u8>> {
        Ok(tag_codec::write_snbt(tag)?.into_bytes())
    }

    fn deserialize_tag(contents: &[u8]) -> Result<NbtTag> {
        Ok(tag_codec::read_snbt(tag_codec::as_text(contents)?)?)
    }
}

#[cfg(test)]
mod tests {
    use nbt::NbtCompound;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::CodecParseError;
    use crate::item::{ItemStack, TAG_WORLD_DATA_VERSION};

    fn apple(count: u8) -> ItemStack {
        ItemStack::new("minecraft:apple".try_into().unwrap(), count)
    }

    #[test]
    fn binary_payload_is_the_item_tag() {
        let bytes = BinaryItemSerializer::serialize(&apple(5)).unwrap();
        let NbtTag::Compound(tag) = nbt::from_bytes(&bytes).unwrap() else {
            panic!("expected a compound");
        };
        assert!(!tag.contains_key(TAG_WORLD_DATA_VERSION));
        assert_eq!(tag.byte("Count"), Some(5));
        assert_eq!(tag.string("Name"), Some("minecraft:apple"));
        assert_eq!(tag.short("Damage"), Some(0));
    }

    #[test]
    fn text_codecs_roundtrip() {
        let custom: NbtCompound = [("display", NbtTag::from("Golden ✓"))].into_iter().collect();
        let item = apple(64).with_damage(3).with_tag(custom);

        let base64 = Base64ItemSerializer::serialize(&item).unwrap();
        assert_eq!(Base64ItemSerializer::deserialize::<ItemStack>(&base64).unwrap(), item);

        let hex = HexItemSerializer::serialize(&item).unwrap();
        assert!(hex.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
        assert_eq!(HexItemSerializer::deserialize::<ItemStack>(&hex).unwrap(), item);

        let snbt = SnbtItemSerializer::serialize(&item).unwrap();
        assert_eq!(
            snbt,
            "{Count:64b,Damage:3s,Name:\"minecraft:apple\",tag:{display:\"Golden ✓\"}}"
        );
        assert_eq!(SnbtItemSerializer::deserialize::<ItemStack>(&snbt).unwrap(), item);
    }

    #[test]
    fn list_keeps_order() {
        let items = vec![apple(1), apple(2), apple(3)];
        let snbt = SnbtItemSerializer::serialize_list(&items).unwrap();
        let restored: Vec<ItemStack> = SnbtItemSerializer::deserialize_list(&snbt).unwrap();
        assert_eq!(restored, items);

        let empty = BinaryItemSerializer::serialize_list::<ItemStack>(&[]).unwrap();
        assert_eq!(
            BinaryItemSerializer::deserialize_list::<ItemStack>(&empty).unwrap(),
            Vec::new()
        );
    }

    #[test]
    fn shape_mismatches() {
        let single = SnbtItemSerializer::serialize(&apple(1)).unwrap();
        assert!(matches!(
            SnbtItemSerializer::deserialize_list::<ItemStack>(&single),
            Err(ItemSerializeError::InvalidTagShape {
                expected: Tag::List,
                found: Tag::Compound
            })
        ));

        let list = SnbtItemSerializer::serialize_list(&[apple(1)]).unwrap();
        assert!(matches!(
            SnbtItemSerializer::deserialize::<ItemStack>(&list),
            Err(ItemSerializeError::InvalidTagShape {
                expected: Tag::Compound,
                found: Tag::List
            })
        ));

        assert!(matches!(
            SnbtItemSerializer::deserialize_list::<ItemStack>("[1, 2]"),
            Err(ItemSerializeError::InvalidTagShape {
                expected: Tag::Compound,
                found: Tag::Int
            })
        ));
    }

    #[test]
    fn list_fails_on_first_bad_item() {
        let err = SnbtItemSerializer::deserialize_list::<ItemStack>(
            "[{Count:1b,Name:\"minecraft:apple\"},{Count:1b,Name:\"Bad Name\"}]",
        )
        .unwrap_err();
        assert!(matches!(err, ItemSerializeError::InvalidItemData(_)));
    }

    #[test]
    fn parse_errors() {
        assert!(matches!(
            HexItemSerializer::deserialize::<ItemStack>("0a0"),
            Err(ItemSerializeError::CodecParse(CodecParseError::Hex(_)))
        ));
        assert!(matches!(
            Base64ItemSerializer::deserialize::<ItemStack>([0xffu8, 0xfe]),
            Err(ItemSerializeError::CodecParse(CodecParseError::Utf8(_)))
        ));
        assert!(matches!(
            BinaryItemSerializer::deserialize::<ItemStack>(b""),
            Err(ItemSerializeError::CodecParse(CodecParseError::Nbt(_)))
        ));
    }

    #[test]
    fn oversized_string_is_an_encode_error() {
        let item = apple(1).with_extra("lore", "x".repeat(u16::MAX as usize + 1));
        assert!(matches!(
            BinaryItemSerializer::serialize(&item),
            Err(ItemSerializeError::Encode(_))
        ));
        assert!(SnbtItemSerializer::serialize(&item).is_ok());
    }

    #[test]
    fn overly_nested_data_is_an_encode_error() {
        let mut custom = NbtCompound::new();
        for _ in 0..nbt::MAX_DEPTH {
            custom = [("inner", NbtTag::Compound(custom))].into_iter().collect();
        }
        let item = apple(1).with_tag(custom);

        assert!(matches!(
            BinaryItemSerializer::serialize(&item),
            Err(ItemSerializeError::Encode(_))
        ));
        assert!(matches!(
            SnbtItemSerializer::serialize(&item),
            Err(ItemSerializeError::Encode(_))
        ));
        assert!(matches!(
            JsonItemSerializer::serialize(&item),
            Err(ItemSerializeError::Encode(_))
        ));
    }

    #[test]
    fn byte_root_is_not_an_item() {
        let byte_shape = |result: Result<ItemStack>| {
            matches!(
                result,
                Err(ItemSerializeError::InvalidTagShape {
                    expected: Tag::Compound,
                    found: Tag::Byte
                })
            )
        };
        assert!(byte_shape(SnbtItemSerializer::deserialize("1b")));
        assert!(byte_shape(BinaryItemSerializer::deserialize([0x01u8, 0x00, 0x00, 0x05])));
        assert!(byte_shape(HexItemSerializer::deserialize("01000005")));
        assert!(byte_shape(Base64ItemSerializer::deserialize("AQAABQ==")));
    }
}
