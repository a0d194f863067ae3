//! All error types for the twine crate.
//!
//! These are returned from all fallible operations (reading the master file,
//! transcoding placeholders, generating and consuming resources, validation).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("unable to parse line {line} of {path}: {message}")]
    Format {
        path: String,
        line: usize,
        message: String,
    },

    #[error("the value \"{value}\" contains numbered and non-numbered placeholders")]
    Placeholder { value: String },

    #[error("invalid path: {0}")]
    Path(String),

    #[error("{0}")]
    Validation(String),

    #[error("unknown format `{0}`")]
    UnknownFormat(String),

    #[error("unable to determine language: {0}")]
    UnknownLanguage(String),

    #[error("nothing to generate: {0}")]
    NothingToGenerate(String),

    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Creates a new format error for a line of the master file.
    pub fn format_error(path: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Error::Format {
            path: path.into(),
            line,
            message: message.into(),
        }
    }

    /// Creates a new validation error
    pub fn validation_error(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(value: quick_xml::events::attributes::AttrError) -> Self {
        Error::XmlParse(quick_xml::Error::InvalidAttr(value))
    }
}
