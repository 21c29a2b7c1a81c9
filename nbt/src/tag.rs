use std::fmt::{Debug, Display};

/// The kind of an NBT value, as written in front of every named entry in the binary layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Tag {
    End = 0,
    Byte = 1,
    Short = 2,
    Int = 3,
    Long = 4,
    Float = 5,
    Double = 6,
    ByteArray = 7,
    String = 8,
    List = 9,
    Compound = 10,
    IntArray = 11,
    LongArray = 12,
}

impl Tag {
    #[inline]
    pub fn to_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Tag {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value < 13 {
            // SAFETY: Tag covers all u8s in 0..=12, and is a "fieldless" enum with #[repr(u8)], so transmuting from u8 is safe.
            // https://doc.rust-lang.org/nomicon/other-reprs.html#repru-repri
            Ok(unsafe { std::mem::transmute::<u8, Tag>(value) })
        } else {
            Err(value)
        }
    }
}

impl From<Tag> for u8 {
    #[inline]
    fn from(tag: Tag) -> u8 {
        tag.to_u8()
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        <Tag as Debug>::fmt(self, f)
    }
}
