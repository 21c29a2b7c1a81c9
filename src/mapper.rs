//! Item ⇄ tag tree, and the flattened JSON projection of an item.
//!
//! The JSON form keeps only `Count`, `Name` and `Damage` as plain values. `Block` and `Tag` are
//! embedded as SNBT strings, so the object shape stays the same whatever the nested data holds.

use nbt::{NbtCompound, NbtTag, Tag};
use serde_json::{Map, Value};

use crate::error::{InvalidItemData, ItemSerializeError, Result};
use crate::item::{
    StackItem, TAG_BLOCK, TAG_COUNT, TAG_DAMAGE, TAG_NAME, TAG_TAG, TAG_WORLD_DATA_VERSION,
};
use crate::tag_codec;

pub const JSON_COUNT: &str = "Count";
pub const JSON_NAME: &str = "Name";
pub const JSON_DAMAGE: &str = "Damage";
pub const JSON_BLOCK: &str = "Block";
pub const JSON_TAG: &str = "Tag";

/// Saves `item` to a compound, without the world data version.
pub fn item_to_tag<I: StackItem>(item: &I) -> NbtCompound {
    let mut tag = item.to_tag();
    tag.remove(TAG_WORLD_DATA_VERSION);
    tag
}

/// Restores an item from a decoded tag, which must be a compound.
pub fn item_from_tag<I: StackItem>(tag: NbtTag) -> Result<I> {
    match tag {
        NbtTag::Compound(mut compound) => {
            compound.remove(TAG_WORLD_DATA_VERSION);
            Ok(I::from_tag(compound)?)
        }
        other => Err(ItemSerializeError::InvalidTagShape {
            expected: Tag::Compound,
            found: other.tag(),
        }),
    }
}

pub fn item_to_json<I: StackItem>(item: &I) -> Result<Map<String, Value>> {
    compound_to_json(&item_to_tag(item))
}

pub fn item_from_json<I: StackItem>(json: &Map<String, Value>) -> Result<I> {
    Ok(I::from_tag(compound_from_json(json)?)?)
}

/// Flattens an item compound. Fails if the compound lacks the fields every item has.
pub fn compound_to_json(tag: &NbtCompound) -> Result<Map<String, Value>> {
    let count = match tag.get(TAG_COUNT) {
        Some(NbtTag::Byte(count)) => *count as u8,
        other => return Err(unexpected(TAG_COUNT, Tag::Byte, other)),
    };
    let name = match tag.get(TAG_NAME) {
        Some(NbtTag::String(name)) => name.clone(),
        other => return Err(unexpected(TAG_NAME, Tag::String, other)),
    };
    let damage = match tag.get(TAG_DAMAGE) {
        Some(NbtTag::Short(damage)) => *damage,
        other => return Err(unexpected(TAG_DAMAGE, Tag::Short, other)),
    };

    let mut json = Map::new();
    json.insert(JSON_COUNT.into(), count.into());
    json.insert(JSON_NAME.into(), name.into());
    json.insert(JSON_DAMAGE.into(), damage.into());
    for (key, json_key) in [(TAG_BLOCK, JSON_BLOCK), (TAG_TAG, JSON_TAG)] {
        match tag.get(key) {
            None => {}
            Some(compound @ NbtTag::Compound(_)) => {
                json.insert(json_key.into(), tag_codec::write_snbt(compound)?.into());
            }
            other => return Err(unexpected(key, Tag::Compound, other)),
        }
    }
    Ok(json)
}

/// Expands a flattened item back into a compound.
///
/// Fields are checked in the order `Count`, `Name`, `Damage`, `Block`, `Tag`; the first missing or
/// malformed one is reported.
pub fn compound_from_json(json: &Map<String, Value>) -> Result<NbtCompound> {
    let count = required(json, JSON_COUNT)?;
    let count = count
        .as_u64()
        .and_then(|count| u8::try_from(count).ok())
        .ok_or_else(|| malformed(JSON_COUNT, "an integer between 0 and 255", count))?;

    let name = required(json, JSON_NAME)?;
    let name = name
        .as_str()
        .ok_or_else(|| malformed(JSON_NAME, "a string", name))?;

    let damage = required(json, JSON_DAMAGE)?;
    let damage = damage
        .as_i64()
        .and_then(|damage| i16::try_from(damage).ok())
        .ok_or_else(|| malformed(JSON_DAMAGE, "an integer between -32768 and 32767", damage))?;

    let mut tag = NbtCompound::new();
    tag.insert(TAG_COUNT, count as i8);
    tag.insert(TAG_NAME, name);
    tag.insert(TAG_DAMAGE, damage);

    for (json_key, key) in [(JSON_BLOCK, TAG_BLOCK), (JSON_TAG, TAG_TAG)] {
        if let Some(compound) = optional_compound(json, json_key)? {
            tag.insert(key, compound);
        }
    }
    Ok(tag)
}

fn required<'a>(json: &'a Map<String, Value>, field: &'static str) -> Result<&'a Value> {
    json.get(field)
        .ok_or(ItemSerializeError::MissingField(field))
}

/// Reads an SNBT-encoded compound. `null` counts as absent.
fn optional_compound(
    json: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<NbtCompound>> {
    let snbt = match json.get(field) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(snbt)) => snbt,
        Some(other) => return Err(malformed(field, "an SNBT string", other)),
    };
    let reason = match tag_codec::read_snbt(snbt) {
        Ok(NbtTag::Compound(compound)) => return Ok(Some(compound)),
        Ok(other) => format!("expected SNBT of a Compound, found {}", other.tag()),
        Err(err) => err.to_string(),
    };
    Err(ItemSerializeError::MalformedField { field, reason })
}

fn malformed(field: &'static str, expected: &str, found: &Value) -> ItemSerializeError {
    ItemSerializeError::MalformedField {
        field,
        reason: format!("expected {expected}, found {found}"),
    }
}

fn unexpected(key: &'static str, expected: Tag, found: Option<&NbtTag>) -> ItemSerializeError {
    match found {
        None => InvalidItemData::Missing(key).into(),
        Some(found) => InvalidItemData::WrongType {
            key,
            expected,
            found: found.tag(),
        }
        .into(),
    }
}

/// Name of a JSON value's kind, for diagnostics.
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
