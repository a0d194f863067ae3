//! Traits for reading and writing the master file.

use std::{
    fs::File,
    io::{BufRead, BufWriter, Write},
    path::Path,
};

use crate::{encoding, error::Error};

/// A trait for parsing and writing a text document from/to one file.
///
/// # Example
///
/// ```rust,no_run
/// use twine::{TwineFile, traits::Parser};
/// let file = TwineFile::read_from("strings.txt")?;
/// file.write_to("strings_copy.txt")?;
/// Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait Parser {
    /// Parse already-decoded text. `source` names the origin in errors.
    fn parse_source(content: &str, source: &str) -> Result<Self, Error>
    where
        Self: Sized;

    /// Parse from any reader. The content must be UTF-8.
    fn from_reader<R: BufRead>(mut reader: R) -> Result<Self, Error>
    where
        Self: Sized,
    {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        Self::parse_source(&content, "<reader>")
    }

    /// Parse from file path, decoding UTF-8 or BOM-marked UTF-16.
    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error>
    where
        Self: Sized,
    {
        let path = path.as_ref();
        let content = encoding::read_to_string(path)?;
        Self::parse_source(&content, &path.display().to_string())
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, writer: W) -> Result<(), Error>;

    /// Write to file path as UTF-8.
    fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.to_writer(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Parse from a string.
    fn from_str(s: &str) -> Result<Self, Error>
    where
        Self: Sized,
    {
        Self::parse_source(s, "<string>")
    }

    /// Serialize into a string.
    fn write_to_string(&self) -> Result<String, Error> {
        let mut out = Vec::new();
        self.to_writer(&mut out)?;
        String::from_utf8(out)
            .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
    }
}
