//! CLI library for testing purposes

pub mod consume;
pub mod generate;
pub mod options;
pub mod validation;

pub use options::{ConsumeArgs, FilterArgs, parse_format};

use twine::TwineFile;

/// Reads a master file, mapping failures to a printable message.
/// `developer_language` restores index 0 of the language codes.
pub fn read_twine_file(path: &str, developer_language: Option<&str>) -> Result<TwineFile, String> {
    TwineFile::read_with_developer_language(path, developer_language)
        .map_err(|e| format!("Error reading {}: {}", path, e))
}
