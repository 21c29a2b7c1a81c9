//! Stringified NBT: a human-readable notation for NBT trees.
//!
//! ```text
//! {Count:1b,Damage:0s,Name:"minecraft:stone",tag:{display:{Lore:["a","b"]},ids:[I;1,2]}}
//! ```
//!
//! Numbers carry a type suffix (`b`, `s`, `L`, `f`, `d`; ints have none). Strings are written
//! double-quoted; the reader also accepts single quotes and bare words. `true`/`false` read as bytes.

use thiserror::Error;

use crate::{NbtCompound, NbtList, NbtTag, NbtWriteError, Tag, MAX_DEPTH};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnbtError {
    #[error("unexpected end of SNBT input at position {pos}")]
    UnexpectedEnd { pos: usize },
    #[error("expected {expected} at position {pos}, found {found:?}")]
    Expected {
        expected: &'static str,
        found: char,
        pos: usize,
    },
    #[error("invalid escape sequence \\{escape} at position {pos}")]
    InvalidEscape { escape: char, pos: usize },
    #[error("list of {expected} cannot contain {found} at position {pos}")]
    MixedList {
        expected: Tag,
        found: Tag,
        pos: usize,
    },
    #[error("{array} cannot contain {found} at position {pos}")]
    InvalidArrayElement { array: Tag, found: Tag, pos: usize },
    #[error("trailing data after SNBT value at position {pos}")]
    TrailingData { pos: usize },
    #[error("SNBT nesting deeper than {max} levels at position {pos}")]
    TooDeep { max: usize, pos: usize },
}

/// Writes `tag` as compact SNBT. Fails on trees nested deeper than the reader accepts.
pub fn to_string(tag: &NbtTag) -> Result<String, NbtWriteError> {
    let mut output = String::with_capacity(64);
    write_tag(&mut output, tag, 0)?;
    Ok(output)
}

/// Parses a single SNBT value; surrounding whitespace is allowed, anything else is not.
pub fn from_str(input: &str) -> Result<NbtTag, SnbtError> {
    let mut parser = Parser { input, pos: 0 };
    parser.skip_whitespace();
    let value = parser.value(0)?;
    parser.skip_whitespace();
    if parser.pos < input.len() {
        return Err(SnbtError::TrailingData { pos: parser.pos });
    }
    Ok(value)
}

fn write_tag(output: &mut String, tag: &NbtTag, depth: usize) -> Result<(), NbtWriteError> {
    match tag {
        NbtTag::Byte(v) => output.push_str(&format!("{v}b")),
        NbtTag::Short(v) => output.push_str(&format!("{v}s")),
        NbtTag::Int(v) => output.push_str(&v.to_string()),
        NbtTag::Long(v) => output.push_str(&format!("{v}L")),
        NbtTag::Float(v) => output.push_str(&format!("{v}f")),
        NbtTag::Double(v) => output.push_str(&format!("{v}d")),
        NbtTag::ByteArray(array) => {
            write_array(output, 'B', array.iter().map(|v| format!("{v}b")));
        }
        NbtTag::String(string) => write_quoted(output, string),
        NbtTag::List(list) => {
            if depth >= MAX_DEPTH {
                return Err(NbtWriteError::TooDeep { max: MAX_DEPTH });
            }
            output.push('[');
            for (i, item) in list.iter().enumerate() {
                if i > 0 {
                    output.push(',');
                }
                write_tag(output, item, depth + 1)?;
            }
            output.push(']');
        }
        NbtTag::Compound(compound) => {
            if depth >= MAX_DEPTH {
                return Err(NbtWriteError::TooDeep { max: MAX_DEPTH });
            }
            output.push('{');
            for (i, (key, value)) in compound.iter().enumerate() {
                if i > 0 {
                    output.push(',');
                }
                if !key.is_empty() && key.chars().all(is_bare_char) {
                    output.push_str(key);
                } else {
                    write_quoted(output, key);
                }
                output.push(':');
                write_tag(output, value, depth + 1)?;
            }
            output.push('}');
        }
        NbtTag::IntArray(array) => {
            write_array(output, 'I', array.iter().map(|v| v.to_string()));
        }
        NbtTag::LongArray(array) => {
            write_array(output, 'L', array.iter().map(|v| format!("{v}L")));
        }
    }
    Ok(())
}

fn write_array(output: &mut String, prefix: char, items: impl Iterator<Item = String>) {
    output.push('[');
    output.push(prefix);
    output.push(';');
    for (i, item) in items.enumerate() {
        if i > 0 {
            output.push(',');
        }
        output.push_str(&item);
    }
    output.push(']');
}

fn write_quoted(output: &mut String, string: &str) {
    output.push('"');
    for c in string.chars() {
        match c {
            '"' => output.push_str("\\\""),
            '\\' => output.push_str("\\\\"),
            '\n' => output.push_str("\\n"),
            '\r' => output.push_str("\\r"),
            '\t' => output.push_str("\\t"),
            c => output.push(c),
        }
    }
    output.push('"');
}

#[inline]
fn is_bare_char(c: char) -> bool {
    matches!(c, 'a'..='z' | 'A'..='Z' | '0'..='9' | '_' | '-' | '.' | '+')
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn next_char(&mut self) -> Result<char, SnbtError> {
        let c = self
            .peek()
            .ok_or(SnbtError::UnexpectedEnd { pos: self.pos })?;
        self.pos += c.len_utf8();
        Ok(c)
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn expect(&mut self, expected: char, description: &'static str) -> Result<(), SnbtError> {
        self.skip_whitespace();
        let pos = self.pos;
        match self.next_char()? {
            c if c == expected => Ok(()),
            found => Err(SnbtError::Expected {
                expected: description,
                found,
                pos,
            }),
        }
    }

    fn value(&mut self, depth: usize) -> Result<NbtTag, SnbtError> {
        self.skip_whitespace();
        match self.peek() {
            Some('{') => {
                self.enter(depth)?;
                self.compound(depth + 1).map(NbtTag::Compound)
            }
            Some('[') => {
                self.enter(depth)?;
                self.list_or_array(depth + 1)
            }
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                self.quoted(quote).map(NbtTag::String)
            }
            Some(_) => {
                let pos = self.pos;
                let word = self.bare_word();
                if word.is_empty() {
                    // `peek` returned a char, so this cannot fail.
                    let found = self.next_char()?;
                    return Err(SnbtError::Expected {
                        expected: "a value",
                        found,
                        pos,
                    });
                }
                Ok(classify(word))
            }
            None => Err(SnbtError::UnexpectedEnd { pos: self.pos }),
        }
    }

    fn enter(&self, depth: usize) -> Result<(), SnbtError> {
        if depth >= MAX_DEPTH {
            Err(SnbtError::TooDeep {
                max: MAX_DEPTH,
                pos: self.pos,
            })
        } else {
            Ok(())
        }
    }

    fn bare_word(&mut self) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !is_bare_char(c) {
                break;
            }
            self.pos += 1;
        }
        &self.input[start..self.pos]
    }

    /// Reads a quoted string, the opening quote already consumed.
    fn quoted(&mut self, quote: char) -> Result<String, SnbtError> {
        let mut string = String::new();
        loop {
            match self.next_char()? {
                '\\' => {
                    let pos = self.pos;
                    string.push(match self.next_char()? {
                        c @ ('\\' | '"' | '\'') => c,
                        'n' => '\n',
                        'r' => '\r',
                        't' => '\t',
                        escape => return Err(SnbtError::InvalidEscape { escape, pos }),
                    });
                }
                c if c == quote => return Ok(string),
                c => string.push(c),
            }
        }
    }

    fn key(&mut self) -> Result<String, SnbtError> {
        self.skip_whitespace();
        let pos = self.pos;
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                self.quoted(quote)
            }
            Some(_) => {
                let word = self.bare_word();
                if word.is_empty() {
                    let found = self.next_char()?;
                    Err(SnbtError::Expected {
                        expected: "a key",
                        found,
                        pos,
                    })
                } else {
                    Ok(word.to_owned())
                }
            }
            None => Err(SnbtError::UnexpectedEnd { pos }),
        }
    }

    /// Consumes `,` and returns `true`, or consumes `close` and returns `false`.
    fn separator(&mut self, close: char, description: &'static str) -> Result<bool, SnbtError> {
        self.skip_whitespace();
        let pos = self.pos;
        match self.next_char()? {
            ',' => Ok(true),
            c if c == close => Ok(false),
            found => Err(SnbtError::Expected {
                expected: description,
                found,
                pos,
            }),
        }
    }

    fn compound(&mut self, depth: usize) -> Result<NbtCompound, SnbtError> {
        self.expect('{', "'{'")?;
        let mut compound = NbtCompound::new();

        self.skip_whitespace();
        if self.peek() == Some('}') {
            self.pos += 1;
            return Ok(compound);
        }

        loop {
            let key = self.key()?;
            self.expect(':', "':'")?;
            let value = self.value(depth)?;
            compound.insert(key, value);
            if !self.separator('}', "',' or '}'")? {
                return Ok(compound);
            }
        }
    }

    fn list_or_array(&mut self, depth: usize) -> Result<NbtTag, SnbtError> {
        self.expect('[', "'['")?;

        let rest = &self.input[self.pos..];
        let array = match rest.as_bytes() {
            [b'B', b';', ..] => Some(Tag::ByteArray),
            [b'I', b';', ..] => Some(Tag::IntArray),
            [b'L', b';', ..] => Some(Tag::LongArray),
            _ => None,
        };
        if let Some(array) = array {
            self.pos += 2;
            return self.array(array, depth);
        }

        let mut list = NbtList::new();
        self.skip_whitespace();
        if self.peek() == Some(']') {
            self.pos += 1;
            return Ok(NbtTag::List(list));
        }

        loop {
            self.skip_whitespace();
            let pos = self.pos;
            let value = self.value(depth)?;
            list.push(value).map_err(|mismatch| SnbtError::MixedList {
                expected: mismatch.expected,
                found: mismatch.found,
                pos,
            })?;
            if !self.separator(']', "',' or ']'")? {
                return Ok(NbtTag::List(list));
            }
        }
    }

    fn array(&mut self, array: Tag, depth: usize) -> Result<NbtTag, SnbtError> {
        let mut bytes = Vec::new();
        let mut ints = Vec::new();
        let mut longs = Vec::new();

        self.skip_whitespace();
        if self.peek() == Some(']') {
            self.pos += 1;
        } else {
            loop {
                self.skip_whitespace();
                let pos = self.pos;
                match (array, self.value(depth)?) {
                    (Tag::ByteArray, NbtTag::Byte(v)) => bytes.push(v),
                    (Tag::IntArray, NbtTag::Int(v)) => ints.push(v),
                    (Tag::LongArray, NbtTag::Long(v)) => longs.push(v),
                    (_, value) => {
                        return Err(SnbtError::InvalidArrayElement {
                            array,
                            found: value.tag(),
                            pos,
                        })
                    }
                }
                if !self.separator(']', "',' or ']'")? {
                    break;
                }
            }
        }

        Ok(match array {
            Tag::ByteArray => NbtTag::ByteArray(bytes),
            Tag::IntArray => NbtTag::IntArray(ints),
            _ => NbtTag::LongArray(longs),
        })
    }
}

/// Gives a bare word its type: a suffixed or plain number, a boolean, or a string.
fn classify(word: &str) -> NbtTag {
    match word {
        "true" => return NbtTag::Byte(1),
        "false" => return NbtTag::Byte(0),
        _ => {}
    }
    if !looks_numeric(word) {
        return NbtTag::String(word.to_owned());
    }

    let (body, suffix) = word.split_at(word.len() - 1);
    let parsed = match suffix {
        "b" | "B" => body.parse().ok().map(NbtTag::Byte),
        "s" | "S" => body.parse().ok().map(NbtTag::Short),
        "l" | "L" => body.parse().ok().map(NbtTag::Long),
        "f" | "F" => body.parse().ok().map(NbtTag::Float),
        "d" | "D" => body.parse().ok().map(NbtTag::Double),
        _ => word.parse().ok().map(NbtTag::Int).or_else(|| {
            word.contains(['.', 'e', 'E'])
                .then(|| word.parse().ok().map(NbtTag::Double))
                .flatten()
        }),
    };
    parsed.unwrap_or_else(|| NbtTag::String(word.to_owned()))
}

/// Whether `word` starts like a number (`NaN` and `inf` included, as written for non-finite floats).
fn looks_numeric(word: &str) -> bool {
    let unsigned = word.strip_prefix(['-', '+']).unwrap_or(word);
    unsigned.starts_with(|c: char| c.is_ascii_digit() || c == '.')
        || unsigned.starts_with("NaN")
        || unsigned.starts_with("inf")
}
