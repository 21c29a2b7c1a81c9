//! Serialization of item stacks to NBT, base64, hex, SNBT and a flat JSON form.
//!
//! Pick an encoding at runtime with [`serialize`] and [`deserialize`], or use one of the codec
//! types ([`BinaryItemSerializer`], [`JsonItemSerializer`], ...) directly. Both paths share the same
//! [`ItemSerializer`] implementations.

pub mod dispatch;
mod error;
pub mod item;
pub mod mapper;
pub mod serializer;
pub mod tag_codec;
pub mod utf8;

pub use dispatch::{
    deserialize, deserialize_list, serialize, serialize_list, Encoding, SerializedPayload,
    UnknownEncoding,
};
pub use error::{CodecParseError, InvalidItemData, ItemSerializeError, Result};
pub use item::{Identifier, IdentifierError, ItemStack, StackItem};
pub use nbt;
pub use serializer::{
    Base64ItemSerializer, BinaryItemSerializer, HexItemSerializer, ItemSerializer,
    JsonItemSerializer, Payload, SnbtItemSerializer,
};
