//! Byte-order-mark sniffing and decoding of input files.

use std::{fs::File, io::Read, path::Path};

use encoding_rs::{Encoding, UTF_8, UTF_16BE, UTF_16LE};
use encoding_rs_io::DecodeReaderBytesBuilder;

use crate::error::Error;

/// Text encodings recognized on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Utf16Be,
    Utf16Le,
}

impl TextEncoding {
    pub fn as_encoding(self) -> &'static Encoding {
        match self {
            TextEncoding::Utf8 => UTF_8,
            TextEncoding::Utf16Be => UTF_16BE,
            TextEncoding::Utf16Le => UTF_16LE,
        }
    }

    /// Detects the encoding from the leading bytes. Anything without a
    /// UTF-16 byte-order mark is treated as UTF-8.
    pub fn from_bom(bytes: &[u8]) -> Self {
        match bytes {
            [0xFE, 0xFF, ..] => TextEncoding::Utf16Be,
            [0xFF, 0xFE, ..] => TextEncoding::Utf16Le,
            _ => TextEncoding::Utf8,
        }
    }
}

/// Sniffs the byte-order mark of the file at `path`.
pub fn detect_encoding<P: AsRef<Path>>(path: P) -> Result<TextEncoding, Error> {
    let mut file = File::open(path)?;
    let mut head = [0u8; 2];
    let mut read = 0;
    while read < head.len() {
        match file.read(&mut head[read..])? {
            0 => break,
            n => read += n,
        }
    }
    Ok(TextEncoding::from_bom(&head[..read]))
}

/// Reads the file at `path` as text, decoding it with the detected encoding
/// and dropping any byte-order mark.
pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String, Error> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(Error::Path(format!("{} is not a file", path.display())));
    }
    let encoding = detect_encoding(path)?;

    let file = File::open(path)?;
    let mut decoder = DecodeReaderBytesBuilder::new()
        .encoding(Some(encoding.as_encoding()))
        .bom_override(true)
        .build(file);

    let mut decoded = String::new();
    decoder.read_to_string(&mut decoded)?;
    Ok(decoded)
}
