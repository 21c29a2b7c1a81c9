//! The binary layout: big-endian numbers, u16-prefixed MUTF-8 strings, i32-prefixed lists and arrays.
//!
//! A document is a single root entry: `[tag id][name][payload]`. Compounds are a run of named entries
//! closed by an end tag; lists store their element tag and length once, followed by bare payloads.

use bytes::{Buf, BufMut};

use crate::*;

pub fn to_bytes(tag: &NbtTag) -> Result<Vec<u8>, NbtWriteError> {
    to_bytes_with(tag, NbtFlavor::Named)
}

pub fn to_bytes_with(tag: &NbtTag, flavor: NbtFlavor) -> Result<Vec<u8>, NbtWriteError> {
    let mut output = Vec::with_capacity(64);
    output.put_u8(tag.tag().into());
    if flavor == NbtFlavor::Named {
        put_string(&mut output, "")?;
    }
    put_payload(&mut output, tag, 0)?;
    Ok(output)
}

pub fn from_bytes(source: &[u8]) -> Result<NbtTag, NbtParseError> {
    from_bytes_with(source, NbtFlavor::Named)
}

pub fn from_bytes_with(source: &[u8], flavor: NbtFlavor) -> Result<NbtTag, NbtParseError> {
    if source.is_empty() {
        return Err(NbtParseError::Empty);
    }

    let mut reader = Reader::new(source);
    let tag = reader.tag()?;
    if tag == Tag::End {
        return Err(NbtParseError::UnexpectedEnd { pos: 0 });
    }
    if flavor == NbtFlavor::Named {
        // The root name carries no meaning.
        reader.string()?;
    }
    let value = reader.payload(tag, 0)?;

    if reader.source.has_remaining() {
        return Err(NbtParseError::TrailingBytes { pos: reader.pos() });
    }
    Ok(value)
}

fn put_string(output: &mut Vec<u8>, string: &str) -> Result<(), NbtWriteError> {
    let encoded = simd_cesu8::mutf8::encode(string);
    let len = u16::try_from(encoded.len()).map_err(|_| NbtWriteError::StringTooLong {
        len: encoded.len(),
    })?;
    output.put_u16(len);
    output.put_slice(&encoded);
    Ok(())
}

fn put_len(output: &mut Vec<u8>, tag: Tag, len: usize) -> Result<(), NbtWriteError> {
    let len = i32::try_from(len).map_err(|_| NbtWriteError::TooManyElements { tag, len })?;
    output.put_i32(len);
    Ok(())
}

fn put_payload(output: &mut Vec<u8>, tag: &NbtTag, depth: usize) -> Result<(), NbtWriteError> {
    match tag {
        NbtTag::Byte(v) => output.put_i8(*v),
        NbtTag::Short(v) => output.put_i16(*v),
        NbtTag::Int(v) => output.put_i32(*v),
        NbtTag::Long(v) => output.put_i64(*v),
        NbtTag::Float(v) => output.put_f32(*v),
        NbtTag::Double(v) => output.put_f64(*v),
        NbtTag::ByteArray(array) => {
            put_len(output, Tag::ByteArray, array.len())?;
            for v in array {
                output.put_i8(*v);
            }
        }
        NbtTag::String(string) => put_string(output, string)?,
        NbtTag::List(list) => {
            if depth >= MAX_DEPTH {
                return Err(NbtWriteError::TooDeep { max: MAX_DEPTH });
            }
            output.put_u8(list.element_tag().into());
            put_len(output, Tag::List, list.len())?;
            for item in list {
                put_payload(output, item, depth + 1)?;
            }
        }
        NbtTag::Compound(compound) => {
            if depth >= MAX_DEPTH {
                return Err(NbtWriteError::TooDeep { max: MAX_DEPTH });
            }
            for (name, value) in compound {
                output.put_u8(value.tag().into());
                put_string(output, name)?;
                put_payload(output, value, depth + 1)?;
            }
            output.put_u8(Tag::End.into());
        }
        NbtTag::IntArray(array) => {
            put_len(output, Tag::IntArray, array.len())?;
            for v in array {
                output.put_i32(*v);
            }
        }
        NbtTag::LongArray(array) => {
            put_len(output, Tag::LongArray, array.len())?;
            for v in array {
                output.put_i64(*v);
            }
        }
    }
    Ok(())
}

/// Cursor over the binary source.
///
/// The `&[u8]` is advanced by the `Buf` functions; every read is preceded by a length check
/// since `Buf` panics when it runs out of data.
struct Reader<'source> {
    source: &'source [u8],
    full_size: usize,
}

impl<'source> Reader<'source> {
    fn new(source: &'source [u8]) -> Self {
        Self {
            source,
            full_size: source.len(),
        }
    }

    #[inline]
    fn pos(&self) -> usize {
        self.full_size - self.source.remaining()
    }

    #[inline]
    fn need(&self, needed: usize) -> Result<(), NbtParseError> {
        let remaining = self.source.remaining();
        if remaining < needed {
            Err(NbtParseError::SuddenEnd {
                pos: self.pos(),
                needed: needed - remaining,
            })
        } else {
            Ok(())
        }
    }

    fn tag(&mut self) -> Result<Tag, NbtParseError> {
        let pos = self.pos();
        self.need(1)?;
        self.source
            .get_u8()
            .try_into()
            .map_err(|value| NbtParseError::InvalidTag { value, pos })
    }

    fn string(&mut self) -> Result<String, NbtParseError> {
        self.need(2)?;
        let len = self.source.get_u16() as usize;
        self.need(len)?;
        let string = simd_cesu8::mutf8::decode_lossy(&self.source[..len]).into_owned();
        self.source.advance(len);
        Ok(string)
    }

    /// Reads an array/list length and checks that at least `len * element_size` bytes follow.
    fn len(&mut self, element_size: usize) -> Result<usize, NbtParseError> {
        let pos = self.pos();
        self.need(4)?;
        let len = self.source.get_i32();
        let len = usize::try_from(len).map_err(|_| NbtParseError::NegativeLength { len, pos })?;
        self.need(len.saturating_mul(element_size))?;
        Ok(len)
    }

    fn payload(&mut self, tag: Tag, depth: usize) -> Result<NbtTag, NbtParseError> {
        Ok(match tag {
            Tag::End => return Err(NbtParseError::UnexpectedEnd { pos: self.pos() }),
            Tag::Byte => {
                self.need(1)?;
                NbtTag::Byte(self.source.get_i8())
            }
            Tag::Short => {
                self.need(2)?;
                NbtTag::Short(self.source.get_i16())
            }
            Tag::Int => {
                self.need(4)?;
                NbtTag::Int(self.source.get_i32())
            }
            Tag::Long => {
                self.need(8)?;
                NbtTag::Long(self.source.get_i64())
            }
            Tag::Float => {
                self.need(4)?;
                NbtTag::Float(self.source.get_f32())
            }
            Tag::Double => {
                self.need(8)?;
                NbtTag::Double(self.source.get_f64())
            }
            Tag::ByteArray => {
                let len = self.len(1)?;
                NbtTag::ByteArray((0..len).map(|_| self.source.get_i8()).collect())
            }
            Tag::String => NbtTag::String(self.string()?),
            Tag::List => {
                if depth >= MAX_DEPTH {
                    return Err(NbtParseError::TooDeep { max: MAX_DEPTH });
                }
                let element_tag = self.tag()?;
                // Every element payload takes at least one byte.
                let len = self.len(1)?;
                if len > 0 && element_tag == Tag::End {
                    return Err(NbtParseError::InvalidListType { tag: element_tag });
                }

                let mut list = NbtList::with_capacity(len);
                for _ in 0..len {
                    let item = self.payload(element_tag, depth + 1)?;
                    // All items come from the same element tag, so they always match.
                    list.push(item)
                        .map_err(|_| NbtParseError::InvalidListType { tag: element_tag })?;
                }
                NbtTag::List(list)
            }
            Tag::Compound => {
                if depth >= MAX_DEPTH {
                    return Err(NbtParseError::TooDeep { max: MAX_DEPTH });
                }
                let mut compound = NbtCompound::new();
                loop {
                    let tag = self.tag()?;
                    if tag == Tag::End {
                        break;
                    }
                    let name = self.string()?;
                    let value = self.payload(tag, depth + 1)?;
                    compound.insert(name, value);
                }
                NbtTag::Compound(compound)
            }
            Tag::IntArray => {
                let len = self.len(4)?;
                NbtTag::IntArray((0..len).map(|_| self.source.get_i32()).collect())
            }
            Tag::LongArray => {
                let len = self.len(8)?;
                NbtTag::LongArray((0..len).map(|_| self.source.get_i64()).collect())
            }
        })
    }
}
