//! Owned NBT tree.

use std::collections::{btree_map, BTreeMap};

use thiserror::Error;

use crate::Tag;

/// An owned NBT value. Every variant except [`Tag::End`] has a counterpart here.
#[derive(Debug, Clone, PartialEq)]
pub enum NbtTag {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(String),
    List(NbtList),
    Compound(NbtCompound),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

impl NbtTag {
    /// The kind of this value.
    pub fn tag(&self) -> Tag {
        match self {
            NbtTag::Byte(_) => Tag::Byte,
            NbtTag::Short(_) => Tag::Short,
            NbtTag::Int(_) => Tag::Int,
            NbtTag::Long(_) => Tag::Long,
            NbtTag::Float(_) => Tag::Float,
            NbtTag::Double(_) => Tag::Double,
            NbtTag::ByteArray(_) => Tag::ByteArray,
            NbtTag::String(_) => Tag::String,
            NbtTag::List(_) => Tag::List,
            NbtTag::Compound(_) => Tag::Compound,
            NbtTag::IntArray(_) => Tag::IntArray,
            NbtTag::LongArray(_) => Tag::LongArray,
        }
    }
}

macro_rules! tag_from {
    ( $($ty:ty => $variant:ident,)* ) => {
        $(
            impl From<$ty> for NbtTag {
                #[inline]
                fn from(value: $ty) -> Self {
                    NbtTag::$variant(value)
                }
            }
        )*
    };
}

tag_from! {
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    Vec<i8> => ByteArray,
    String => String,
    NbtList => List,
    NbtCompound => Compound,
    Vec<i32> => IntArray,
    Vec<i64> => LongArray,
}

impl From<&str> for NbtTag {
    fn from(value: &str) -> Self {
        NbtTag::String(value.to_owned())
    }
}

/// A homogeneous, ordered sequence of NBT values.
///
/// The element kind is fixed by the first pushed value; an empty list always reports [`Tag::End`].
#[derive(Debug, Clone, PartialEq)]
pub struct NbtList {
    tag: Tag,
    items: Vec<NbtTag>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot push {found} into a list of {expected}")]
pub struct ListTypeMismatch {
    pub expected: Tag,
    pub found: Tag,
}

impl NbtList {
    pub fn new() -> Self {
        Self {
            tag: Tag::End,
            items: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tag: Tag::End,
            items: Vec::with_capacity(capacity),
        }
    }

    /// The kind shared by every element.
    pub fn element_tag(&self) -> Tag {
        self.tag
    }

    pub fn push(&mut self, value: impl Into<NbtTag>) -> Result<(), ListTypeMismatch> {
        let value = value.into();
        let found = value.tag();
        if self.items.is_empty() {
            self.tag = found;
        } else if found != self.tag {
            return Err(ListTypeMismatch {
                expected: self.tag,
                found,
            });
        }
        self.items.push(value);
        Ok(())
    }

    /// Builds a list out of `items`, failing on the first element whose kind differs from the first one.
    pub fn from_items(items: impl IntoIterator<Item = NbtTag>) -> Result<Self, ListTypeMismatch> {
        let mut list = NbtList::new();
        for item in items {
            list.push(item)?;
        }
        Ok(list)
    }

    /// A list of compounds. Cannot mismatch, so it does not fail.
    pub fn from_compounds(compounds: impl IntoIterator<Item = NbtCompound>) -> Self {
        let items: Vec<NbtTag> = compounds.into_iter().map(NbtTag::Compound).collect();
        let tag = if items.is_empty() {
            Tag::End
        } else {
            Tag::Compound
        };
        Self { tag, items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NbtTag> {
        self.items.iter()
    }
}

impl Default for NbtList {
    fn default() -> Self {
        Self::new()
    }
}

impl IntoIterator for NbtList {
    type Item = NbtTag;
    type IntoIter = std::vec::IntoIter<NbtTag>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a NbtList {
    type Item = &'a NbtTag;
    type IntoIter = std::slice::Iter<'a, NbtTag>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// A mapping from names to NBT values. Iteration is ordered by name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NbtCompound(BTreeMap<String, NbtTag>);

macro_rules! value_getter {
    ($name:ident, $variant:ident, $ret:ty) => {
        pub fn $name(&self, key: &str) -> Option<$ret> {
            match self.0.get(key) {
                Some(NbtTag::$variant(v)) => Some(*v),
                _ => None,
            }
        }
    };
}

macro_rules! ref_getter {
    ($name:ident, $variant:ident, $ret:ty) => {
        pub fn $name(&self, key: &str) -> Option<$ret> {
            match self.0.get(key) {
                Some(NbtTag::$variant(v)) => Some(v),
                _ => None,
            }
        }
    };
    ($name:ident, $variant:ident, $ret:ty, $view:ident) => {
        pub fn $name(&self, key: &str) -> Option<$ret> {
            match self.0.get(key) {
                Some(NbtTag::$variant(v)) => Some(v.$view()),
                _ => None,
            }
        }
    };
}

impl NbtCompound {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    value_getter!(byte, Byte, i8);
    value_getter!(short, Short, i16);
    value_getter!(int, Int, i32);
    value_getter!(long, Long, i64);
    value_getter!(float, Float, f32);
    value_getter!(double, Double, f64);
    ref_getter!(byte_array, ByteArray, &[i8], as_slice);
    ref_getter!(string, String, &str, as_str);
    ref_getter!(list, List, &NbtList);
    ref_getter!(compound, Compound, &NbtCompound);
    ref_getter!(int_array, IntArray, &[i32], as_slice);
    ref_getter!(long_array, LongArray, &[i64], as_slice);

    /// Inserts `value` under `key`, returning the previous value if there was one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<NbtTag>) -> Option<NbtTag> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<NbtTag> {
        self.0.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&NbtTag> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, NbtTag> {
        self.0.iter()
    }

    pub fn keys(&self) -> btree_map::Keys<'_, String, NbtTag> {
        self.0.keys()
    }
}

impl<K, V> FromIterator<(K, V)> for NbtCompound
where
    K: Into<String>,
    V: Into<NbtTag>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

impl Extend<(String, NbtTag)> for NbtCompound {
    fn extend<T: IntoIterator<Item = (String, NbtTag)>>(&mut self, iter: T) {
        self.0.extend(iter)
    }
}

impl IntoIterator for NbtCompound {
    type Item = (String, NbtTag);
    type IntoIter = btree_map::IntoIter<String, NbtTag>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a NbtCompound {
    type Item = (&'a String, &'a NbtTag);
    type IntoIter = btree_map::Iter<'a, String, NbtTag>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_rejects_mixed_kinds() {
        let mut list = NbtList::new();
        assert_eq!(list.element_tag(), Tag::End);
        list.push(1i8).unwrap();
        list.push(2i8).unwrap();
        assert_eq!(list.element_tag(), Tag::Byte);
        assert_eq!(
            list.push("three"),
            Err(ListTypeMismatch {
                expected: Tag::Byte,
                found: Tag::String
            })
        );
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn list_of_compounds() {
        assert_eq!(NbtList::from_compounds(Vec::<NbtCompound>::new()).element_tag(), Tag::End);

        let list = NbtList::from_compounds([NbtCompound::new(), NbtCompound::new()]);
        assert_eq!(list.element_tag(), Tag::Compound);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn typed_getters() {
        let compound: NbtCompound = [
            ("Count", NbtTag::Byte(3)),
            ("Name", NbtTag::from("minecraft:stone")),
            ("Damage", NbtTag::Short(7)),
        ]
        .into_iter()
        .collect();

        assert_eq!(compound.byte("Count"), Some(3));
        assert_eq!(compound.string("Name"), Some("minecraft:stone"));
        assert_eq!(compound.short("Damage"), Some(7));
        // Wrong kind is the same as absent.
        assert_eq!(compound.int("Damage"), None);
        assert_eq!(compound.compound("Block"), None);
    }

    #[test]
    fn compound_iterates_by_key() {
        let mut compound = NbtCompound::new();
        compound.insert("b", 1i32);
        compound.insert("a", 2i32);
        compound.insert("c", 3i32);
        let keys: Vec<_> = compound.keys().map(String::as_str).collect();
        assert_eq!(keys, ["a", "b", "c"]);
        assert_eq!(compound.remove("b"), Some(NbtTag::Int(1)));
        assert!(!compound.contains_key("b"));
    }
}
