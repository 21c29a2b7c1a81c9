use nbt::{NbtList, NbtTag, Tag};
use serde_json::{Map, Value};

use super::{ItemSerializer, Payload};
use crate::dispatch::Encoding;
use crate::error::{CodecParseError, ItemSerializeError, Result};
use crate::item::StackItem;
use crate::mapper::{self, json_kind};

/// The flattened JSON projection: one object per item, an array for a list.
///
/// Only `Count`, `Name`, `Damage`, `Block` and `Tag` survive the trip. The tag-level primitives
/// apply the same projection to a compound or a list of compounds.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonItemSerializer;

impl ItemSerializer for JsonItemSerializer {
    const ENCODING: Encoding = Encoding::Json;

    type Payload = String;

    fn serialize_tag(tag: &NbtTag) -> Result<Vec<u8>> {
        let value = match tag {
            NbtTag::Compound(compound) => Value::Object(mapper::compound_to_json(compound)?),
            NbtTag::List(list) => Value::Array(
                list.iter()
                    .map(|item| match item {
                        NbtTag::Compound(compound) => {
                            mapper::compound_to_json(compound).map(Value::Object)
                        }
                        other => Err(not_compound(other)),
                    })
                    .collect::<Result<_>>()?,
            ),
            other => return Err(not_compound(other)),
        };
        Ok(serde_json::to_vec(&value)?)
    }

    fn deserialize_tag(contents: &[u8]) -> Result<NbtTag> {
        match serde_json::from_slice::<Value>(contents)? {
            Value::Object(object) => Ok(NbtTag::Compound(mapper::compound_from_json(&object)?)),
            Value::Array(values) => {
                let compounds = values
                    .iter()
                    .map(|value| mapper::compound_from_json(as_object(value)?))
                    .collect::<Result<Vec<_>>>()?;
                Ok(NbtTag::List(NbtList::from_compounds(compounds)))
            }
            other => Err(shape("object", &other)),
        }
    }

    fn serialize<I: StackItem>(item: &I) -> Result<String> {
        let object = mapper::item_to_json(item)?;
        tracing::trace!("Serialized item to a JSON object with {} fields.", object.len());
        Ok(String::from_buffer(serde_json::to_vec(&object)?))
    }

    fn serialize_list<I: StackItem>(items: &[I]) -> Result<String> {
        let objects = items
            .iter()
            .map(|item| mapper::item_to_json(item).map(Value::Object))
            .collect::<Result<Vec<_>>>()?;
        tracing::trace!("Serialized {} items to a JSON array.", objects.len());
        Ok(String::from_buffer(serde_json::to_vec(&objects)?))
    }

    fn deserialize<I: StackItem>(contents: impl AsRef<[u8]>) -> Result<I> {
        let value: Value = serde_json::from_slice(contents.as_ref())?;
        tracing::trace!("Deserializing item from a JSON {}.", json_kind(&value));
        mapper::item_from_json(as_object(&value)?)
    }

    fn deserialize_list<I: StackItem>(contents: impl AsRef<[u8]>) -> Result<Vec<I>> {
        let values = match serde_json::from_slice::<Value>(contents.as_ref())? {
            Value::Array(values) => values,
            other => return Err(shape("array", &other)),
        };
        tracing::trace!("Deserializing {} items from a JSON array.", values.len());
        values
            .iter()
            .map(|value| mapper::item_from_json(as_object(value)?))
            .collect()
    }
}

fn as_object(value: &Value) -> Result<&Map<String, Value>> {
    value.as_object().ok_or_else(|| shape("object", value))
}

fn shape(expected: &'static str, found: &Value) -> ItemSerializeError {
    CodecParseError::JsonShape {
        expected,
        found: json_kind(found),
    }
    .into()
}

fn not_compound(tag: &NbtTag) -> ItemSerializeError {
    ItemSerializeError::InvalidTagShape {
        expected: Tag::Compound,
        found: tag.tag(),
    }
}
