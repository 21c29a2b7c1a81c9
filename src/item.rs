//! The item contract and a reference item type.

use std::fmt::{Display, Write};

use getset::{CopyGetters, Getters};
use nbt::{NbtCompound, NbtTag, Tag};
use thiserror::Error;

use crate::error::InvalidItemData;

pub const TAG_COUNT: &str = "Count";
pub const TAG_NAME: &str = "Name";
pub const TAG_DAMAGE: &str = "Damage";
pub const TAG_BLOCK: &str = "Block";
/// Custom item data. Lower-case as the engine saves it; the JSON form names the same entry
/// [`JSON_TAG`](crate::mapper::JSON_TAG) (`Tag`).
pub const TAG_TAG: &str = "tag";
/// Legacy version stamp added by the engine to every saved item, never serialized.
pub const TAG_WORLD_DATA_VERSION: &str = "WorldDataVersion";

/// The version stamp [`ItemStack`] writes under [`TAG_WORLD_DATA_VERSION`].
pub const WORLD_DATA_VERSION: i32 = 1;

const IDENTIFIER_MAX_LEN: usize = 32767;

/// Something that can be saved to and restored from an NBT compound.
pub trait StackItem: Sized {
    fn to_tag(&self) -> NbtCompound;

    fn from_tag(tag: NbtCompound) -> Result<Self, InvalidItemData>;
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    namespace: Option<String>,
    value: String,
}

impl Identifier {
    pub fn from_string(string: impl Into<String>) -> Result<Self, IdentifierError> {
        let string = string.into();

        if string.len() > IDENTIFIER_MAX_LEN {
            return Err(IdentifierError::TooLong(string));
        }

        let mut colon_i = None;

        for (i, c) in string.char_indices() {
            match c {
                'a'..='z' | '0'..='9' | '.' | '-' | '_' => continue,
                ':' if colon_i.is_none() => colon_i = Some(i),
                '/' if colon_i.is_some() => continue,
                _ => return Err(IdentifierError::IllegalCharacter(string, i)),
            }
        }

        let (namespace, value) = match colon_i {
            Some(i) => (Some(string[..i].to_string()), string[i + 1..].to_string()),
            None => (None, string),
        };
        if value.is_empty() || namespace.as_deref() == Some("") {
            return Err(IdentifierError::Empty(namespace.unwrap_or_default() + ":" + &value));
        }

        Ok(Self { namespace, value })
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl TryFrom<String> for Identifier {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Identifier::from_string(value)
    }
}

impl TryFrom<&str> for Identifier {
    type Error = IdentifierError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Identifier::from_string(value)
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(namespace) = &self.namespace {
            namespace.fmt(f)?;
            f.write_char(':')?;
        }
        self.value.fmt(f)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentifierError {
    #[error(
        "identifier {0} is too long, must be at most {} characters",
        IDENTIFIER_MAX_LEN
    )]
    TooLong(String),
    #[error("identifier {0} has illegal character at position {1}, must be one of [a-z0-9.-_] in namespace or [a-z0-9.-_/] in value")]
    IllegalCharacter(String, usize),
    #[error("identifier {0} has an empty namespace or value")]
    Empty(String),
}

/// A stack of items as the engine saves it: identity, quantity, variant, and optional nested data.
///
/// Keys other than the known ones are kept in [`extra`](ItemStack::extra) and written back
/// unchanged, so a save/restore cycle keeps the whole tree (minus the world data version).
#[derive(Debug, Clone, PartialEq, Getters, CopyGetters)]
pub struct ItemStack {
    #[getset(get = "pub")]
    name: Identifier,
    #[getset(get_copy = "pub")]
    count: u8,
    #[getset(get_copy = "pub")]
    damage: i16,
    #[getset(get = "pub")]
    block: Option<NbtCompound>,
    #[getset(get = "pub")]
    tag: Option<NbtCompound>,
    #[getset(get = "pub")]
    extra: NbtCompound,
}

impl ItemStack {
    pub fn new(name: Identifier, count: u8) -> Self {
        Self {
            name,
            count,
            damage: 0,
            block: None,
            tag: None,
            extra: NbtCompound::new(),
        }
    }

    pub fn with_damage(mut self, damage: i16) -> Self {
        self.damage = damage;
        self
    }

    pub fn with_block(mut self, block: NbtCompound) -> Self {
        self.block = Some(block);
        self
    }

    pub fn with_tag(mut self, tag: NbtCompound) -> Self {
        self.tag = Some(tag);
        self
    }

    /// Adds an entry the item does not interpret itself.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<NbtTag>) -> Self {
        self.extra.insert(key, value);
        self
    }
}

impl StackItem for ItemStack {
    fn to_tag(&self) -> NbtCompound {
        let mut tag = self.extra.clone();
        tag.insert(TAG_NAME, self.name.to_string());
        // Stored as a signed byte, read back as unsigned.
        tag.insert(TAG_COUNT, self.count as i8);
        tag.insert(TAG_DAMAGE, self.damage);
        if let Some(block) = &self.block {
            tag.insert(TAG_BLOCK, block.clone());
        }
        if let Some(custom) = &self.tag {
            tag.insert(TAG_TAG, custom.clone());
        }
        tag.insert(TAG_WORLD_DATA_VERSION, WORLD_DATA_VERSION);
        tag
    }

    fn from_tag(mut tag: NbtCompound) -> Result<Self, InvalidItemData> {
        let name = match tag.remove(TAG_NAME) {
            Some(NbtTag::String(name)) => Identifier::from_string(name)?,
            Some(other) => return Err(wrong_type(TAG_NAME, Tag::String, &other)),
            None => return Err(InvalidItemData::Missing(TAG_NAME)),
        };
        let count = match tag.remove(TAG_COUNT) {
            Some(NbtTag::Byte(count)) => count as u8,
            Some(other) => return Err(wrong_type(TAG_COUNT, Tag::Byte, &other)),
            None => return Err(InvalidItemData::Missing(TAG_COUNT)),
        };
        let damage = match tag.remove(TAG_DAMAGE) {
            Some(NbtTag::Short(damage)) => damage,
            Some(other) => return Err(wrong_type(TAG_DAMAGE, Tag::Short, &other)),
            None => 0,
        };
        let block = take_compound(&mut tag, TAG_BLOCK)?;
        let custom = take_compound(&mut tag, TAG_TAG)?;
        tag.remove(TAG_WORLD_DATA_VERSION);

        Ok(Self {
            name,
            count,
            damage,
            block,
            tag: custom,
            extra: tag,
        })
    }
}

fn wrong_type(key: &'static str, expected: Tag, found: &NbtTag) -> InvalidItemData {
    InvalidItemData::WrongType {
        key,
        expected,
        found: found.tag(),
    }
}

fn take_compound(
    tag: &mut NbtCompound,
    key: &'static str,
) -> Result<Option<NbtCompound>, InvalidItemData> {
    match tag.remove(key) {
        Some(NbtTag::Compound(compound)) => Ok(Some(compound)),
        Some(other) => Err(wrong_type(key, Tag::Compound, &other)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn identifier() {
        let id = Identifier::from_string("minecraft:stone_bricks").unwrap();
        assert_eq!(id.namespace(), Some("minecraft"));
        assert_eq!(id.value(), "stone_bricks");
        assert_eq!(id.to_string(), "minecraft:stone_bricks");

        let id = Identifier::from_string("stone").unwrap();
        assert_eq!(id.namespace(), None);
        assert_eq!(id.to_string(), "stone");

        assert!(Identifier::from_string("custom:textures/item.png").is_ok());
        assert_eq!(
            Identifier::from_string("minecraft:Stone"),
            Err(IdentifierError::IllegalCharacter(
                "minecraft:Stone".to_string(),
                10
            ))
        );
        assert!(matches!(
            Identifier::from_string("no/namespace"),
            Err(IdentifierError::IllegalCharacter(_, 2))
        ));
        assert!(matches!(
            Identifier::from_string("a:b:c"),
            Err(IdentifierError::IllegalCharacter(_, 3))
        ));
        assert!(matches!(
            Identifier::from_string(":stone"),
            Err(IdentifierError::Empty(_))
        ));
        assert!(matches!(
            Identifier::from_string(""),
            Err(IdentifierError::Empty(_))
        ));
        assert!(matches!(
            Identifier::from_string("a".repeat(IDENTIFIER_MAX_LEN + 1)),
            Err(IdentifierError::TooLong(_))
        ));
    }

    #[test]
    fn tag_roundtrip_keeps_unknown_keys() {
        let block: NbtCompound = [("name", NbtTag::from("minecraft:chest"))]
            .into_iter()
            .collect();
        let item = ItemStack::new("minecraft:chest".try_into().unwrap(), 200)
            .with_damage(-3)
            .with_block(block)
            .with_tag(NbtCompound::new())
            .with_extra("CanDestroy", NbtTag::from("minecraft:dirt"));

        let tag = item.to_tag();
        assert!(tag.compound(TAG_TAG).is_some());
        assert!(!tag.contains_key("Tag"));
        assert_eq!(tag.byte(TAG_COUNT), Some(200u8 as i8));
        assert_eq!(tag.int(TAG_WORLD_DATA_VERSION), Some(WORLD_DATA_VERSION));
        assert_eq!(tag.string("CanDestroy"), Some("minecraft:dirt"));

        let restored = ItemStack::from_tag(tag).unwrap();
        assert_eq!(restored, item);
        assert_eq!(restored.count(), 200);
        assert!(!restored.extra().contains_key(TAG_WORLD_DATA_VERSION));
    }

    #[test]
    fn rejects_invalid_tags() {
        let valid = ItemStack::new("minecraft:apple".try_into().unwrap(), 1).to_tag();

        let mut tag = valid.clone();
        tag.remove(TAG_NAME);
        assert!(matches!(
            ItemStack::from_tag(tag),
            Err(InvalidItemData::Missing("Name"))
        ));

        let mut tag = valid.clone();
        tag.insert(TAG_NAME, 5i32);
        assert!(matches!(
            ItemStack::from_tag(tag),
            Err(InvalidItemData::WrongType {
                key: "Name",
                expected: Tag::String,
                found: Tag::Int
            })
        ));

        let mut tag = valid.clone();
        tag.insert(TAG_NAME, "Not An Id");
        assert!(matches!(
            ItemStack::from_tag(tag),
            Err(InvalidItemData::Name(_))
        ));

        let mut tag = valid.clone();
        tag.remove(TAG_COUNT);
        assert!(matches!(
            ItemStack::from_tag(tag),
            Err(InvalidItemData::Missing("Count"))
        ));

        let mut tag = valid.clone();
        tag.insert(TAG_BLOCK, "minecraft:stone");
        assert!(matches!(
            ItemStack::from_tag(tag),
            Err(InvalidItemData::WrongType { key: "Block", .. })
        ));

        let mut tag = valid;
        tag.remove(TAG_DAMAGE);
        assert_eq!(ItemStack::from_tag(tag).unwrap().damage(), 0);
    }
}
