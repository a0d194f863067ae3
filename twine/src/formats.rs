//! Platform resource formats twine can generate and consume.
//!
//! Each format implements [`Formatter`]. [`FormatType`] names them for
//! generic handling (command-line flags, extension and directory lookup).

pub mod android;
pub mod apple;
pub mod flash;
pub mod jquery;

use std::{
    fmt::{Display, Formatter as FmtFormatter},
    fs,
    path::Path,
    str::FromStr,
};

use lazy_static::lazy_static;
use regex::Regex;

pub use android::Format as AndroidFormat;
pub use apple::Format as AppleFormat;
pub use flash::Format as FlashFormat;
pub use jquery::Format as JQueryFormat;

use crate::{
    error::Error,
    types::{Definition, Section, TwineFile},
};

lazy_static! {
    static ref LANGUAGE_AND_REGION_REGEX: Regex =
        Regex::new(r"(?i)^[a-z]{2}(?:[-_][a-z]{2})?$").unwrap();
}

/// One key/value pair read from a platform file, with placeholders already
/// converted back to the master-file convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEntry {
    pub key: String,
    pub value: String,
    pub comment: Option<String>,
}

impl ParsedEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            comment: None,
        }
    }

    pub fn with_comment(mut self, comment: Option<String>) -> Self {
        self.comment = comment;
        self
    }
}

/// Serialization of a projected [`TwineFile`] into one platform's syntax,
/// and parsing of that syntax back into entries.
///
/// The text-based formats only fill in the `format_*` hooks; formats with
/// structured output override [`Formatter::format_file`] entirely.
pub trait Formatter {
    fn name(&self) -> &'static str;

    /// File extension, including the dot.
    fn extension(&self) -> &'static str;

    fn default_file_name(&self) -> &'static str;

    /// Whether `path` looks like an output directory of this format.
    fn can_handle_directory(&self, path: &Path) -> bool {
        directory_entries(path)
            .iter()
            .any(|name| name.ends_with(self.extension()))
    }

    /// Infers the language of a platform file from its path.
    fn determine_language_given_path(&self, path: &Path, file: &TwineFile) -> Option<String> {
        language_from_path(path, file)
    }

    /// Directory, relative to the output root, holding `lang`'s file.
    fn output_path_for_language(&self, lang: &str, _file: &TwineFile) -> String {
        lang.to_string()
    }

    fn format_header(&self, _lang: &str) -> Option<String> {
        None
    }

    fn format_section_header(&self, _name: &str) -> Option<String> {
        None
    }

    fn format_comment(&self, _comment: &str) -> Option<String> {
        None
    }

    fn format_key_value(&self, key: &str, value: &str) -> Result<String, Error>;

    /// Renders the definitions of one section that carry `lang`.
    fn format_section(&self, section: &Section, lang: &str) -> Result<Option<String>, Error> {
        let definitions = translated(section, lang);
        if definitions.is_empty() {
            return Ok(None);
        }

        let mut lines = Vec::new();
        if !section.name.is_empty() {
            if let Some(header) = self.format_section_header(&section.name) {
                lines.push(header);
            }
        }
        for (definition, value) in definitions {
            if let Some(comment) = definition.comment.as_deref().and_then(|c| self.format_comment(c))
            {
                lines.push(comment);
            }
            lines.push(self.format_key_value(&definition.key, value)?);
        }
        Ok(Some(lines.join("\n")))
    }

    /// Renders a projected file, or `None` when it holds no definitions.
    fn format_file(&self, file: &TwineFile, lang: &str) -> Result<Option<String>, Error> {
        if file.is_empty() {
            return Ok(None);
        }

        let mut blocks = Vec::new();
        if let Some(header) = self.format_header(lang) {
            blocks.push(header);
        }
        for section in &file.sections {
            if let Some(block) = self.format_section(section, lang)? {
                blocks.push(block);
            }
        }
        let mut out = blocks.join("\n\n");
        out.push('\n');
        Ok(Some(out))
    }

    /// Reads the entries of a platform file.
    fn parse(&self, content: &str) -> Result<Vec<ParsedEntry>, Error>;
}

/// Definitions of `section` that have a translation for `lang`, with it.
pub fn translated<'a>(section: &'a Section, lang: &str) -> Vec<(&'a Definition, &'a str)> {
    section
        .definitions
        .iter()
        .filter_map(|d| d.translations.get(lang).map(|v| (d, v.as_str())))
        .collect()
}

/// A file stem that looks like a language code or is a known one, or else
/// the closest directory named like a language code.
pub fn language_from_path(path: &Path, file: &TwineFile) -> Option<String> {
    let stem = path.file_stem().and_then(|s| s.to_str())?;
    if LANGUAGE_AND_REGION_REGEX.is_match(stem) || file.language_codes.iter().any(|c| c == stem) {
        return Some(stem.to_string());
    }
    path.components()
        .rev()
        .filter_map(|c| c.as_os_str().to_str())
        .find(|segment| LANGUAGE_AND_REGION_REGEX.is_match(segment))
        .map(str::to_string)
}

fn directory_entries(path: &Path) -> Vec<String> {
    fs::read_dir(path)
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

/// All supported formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatType {
    /// Android `strings.xml`.
    Android,
    /// Apple `.strings`.
    Apple,
    /// Flash `.properties` with `{N}` placeholders.
    Flash,
    /// jQuery localization `.json`.
    JQuery,
}

impl FormatType {
    pub const ALL: [FormatType; 4] = [
        FormatType::Android,
        FormatType::Apple,
        FormatType::Flash,
        FormatType::JQuery,
    ];

    pub fn formatter(self) -> &'static dyn Formatter {
        match self {
            FormatType::Android => &AndroidFormat,
            FormatType::Apple => &AppleFormat,
            FormatType::Flash => &FlashFormat,
            FormatType::JQuery => &JQueryFormat,
        }
    }

    /// Returns the typical file extension for this format, without the dot.
    pub fn extension(self) -> &'static str {
        self.formatter().extension().trim_start_matches('.')
    }

    /// Picks a format by the extension of `path`.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let extension = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        Self::ALL.into_iter().find(|f| f.extension() == extension)
    }

    /// Picks the first format recognizing the layout of `path`.
    pub fn from_directory<P: AsRef<Path>>(path: P) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.formatter().can_handle_directory(path.as_ref()))
    }
}

/// Looks up an adapter by format name or alias.
pub fn formatter_for_name(name: &str) -> Result<&'static dyn Formatter, Error> {
    name.parse::<FormatType>().map(FormatType::formatter)
}

/// Looks up an adapter by the extension of `path`.
pub fn formatter_for_path<P: AsRef<Path>>(path: P) -> Option<&'static dyn Formatter> {
    FormatType::from_path(path).map(FormatType::formatter)
}

/// Looks up the first adapter recognizing the layout of directory `path`.
pub fn formatter_for_directory<P: AsRef<Path>>(path: P) -> Option<&'static dyn Formatter> {
    FormatType::from_directory(path).map(FormatType::formatter)
}

impl Display for FormatType {
    fn fmt(&self, f: &mut FmtFormatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.formatter().name())
    }
}

/// Accepts the format names (`android`, `apple`, `flash`, `jquery`) and a
/// few aliases, case-insensitively.
impl FromStr for FormatType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        match s.as_str() {
            "android" | "xml" => Ok(FormatType::Android),
            "apple" | "ios" | "strings" => Ok(FormatType::Apple),
            "flash" | "properties" => Ok(FormatType::Flash),
            "jquery" | "json" => Ok(FormatType::JQuery),
            other => Err(Error::UnknownFormat(other.to_string())),
        }
    }
}
