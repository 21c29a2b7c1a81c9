//! Output normalization: every text payload leaves the crate as UTF-8.

/// Encodings [`normalize`] can recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceEncoding {
    Utf8,
    /// Java modified UTF-8 / CESU-8, the string encoding of binary NBT.
    Mutf8,
    /// ISO-8859-1. Every byte sequence is valid in it, so it is the last guess.
    Latin1,
}

/// Guesses the encoding of `buffer`.
pub fn detect(buffer: &[u8]) -> SourceEncoding {
    if std::str::from_utf8(buffer).is_ok() {
        SourceEncoding::Utf8
    } else if decode_mutf8(buffer).is_some() {
        SourceEncoding::Mutf8
    } else {
        SourceEncoding::Latin1
    }
}

/// Returns `buffer` as UTF-8 text, transcoding it from its detected encoding if needed.
/// Valid UTF-8 is returned as is, without copying.
pub fn normalize(buffer: Vec<u8>) -> String {
    let buffer = match String::from_utf8(buffer) {
        Ok(string) => return string,
        Err(err) => err.into_bytes(),
    };

    let (encoding, text) = match decode_mutf8(&buffer) {
        Some(text) => (SourceEncoding::Mutf8, text),
        None => (
            SourceEncoding::Latin1,
            buffer.iter().map(|&byte| char::from(byte)).collect(),
        ),
    };
    tracing::debug!(
        "Output is not UTF-8, transcoded {} bytes from {:?}.",
        buffer.len(),
        encoding
    );
    text
}

/// Decodes modified UTF-8, or `None` if `buffer` is not valid in it.
fn decode_mutf8(buffer: &[u8]) -> Option<String> {
    let text = simd_cesu8::mutf8::decode_lossy(buffer);
    (!text.contains(char::REPLACEMENT_CHARACTER)).then(|| text.into_owned())
}
