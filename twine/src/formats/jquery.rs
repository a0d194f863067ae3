use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

use crate::{
    error::Error,
    formats::{Formatter, ParsedEntry, language_from_path, translated},
    types::TwineFile,
};

lazy_static! {
    static ref SUFFIXED_FILE_REGEX: Regex = Regex::new(r"^.{3,}-([^-]{2})\.json$").unwrap();
}

/// Flat JSON dictionaries as read by the jQuery localize plugin.
#[derive(Debug, Clone, Copy, Default)]
pub struct Format;

impl Formatter for Format {
    fn name(&self) -> &'static str {
        "jquery"
    }

    fn extension(&self) -> &'static str {
        ".json"
    }

    fn default_file_name(&self) -> &'static str {
        "localize.json"
    }

    fn determine_language_given_path(&self, path: &Path, file: &TwineFile) -> Option<String> {
        let suffixed = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| SUFFIXED_FILE_REGEX.captures(name))
            .map(|caps| caps[1].to_string());
        suffixed.or_else(|| language_from_path(path, file))
    }

    fn format_key_value(&self, key: &str, value: &str) -> Result<String, Error> {
        Ok(format!(
            "{}:{}",
            serde_json::to_string(key)?,
            serde_json::to_string(value)?
        ))
    }

    // Sections become blank-line separated runs inside one object.
    fn format_file(&self, file: &TwineFile, lang: &str) -> Result<Option<String>, Error> {
        if file.is_empty() {
            return Ok(None);
        }

        let mut blocks = Vec::new();
        for section in &file.sections {
            let lines = translated(section, lang)
                .into_iter()
                .map(|(definition, value)| self.format_key_value(&definition.key, value))
                .collect::<Result<Vec<_>, Error>>()?;
            if !lines.is_empty() {
                blocks.push(lines.join(",\n"));
            }
        }
        Ok(Some(format!("{{\n{}\n}}\n", blocks.join(",\n\n"))))
    }

    fn parse(&self, content: &str) -> Result<Vec<ParsedEntry>, Error> {
        let Value::Object(map) = serde_json::from_str::<Value>(content)? else {
            return Err(Error::validation_error(
                "jQuery localization file must contain a JSON object",
            ));
        };

        map.into_iter()
            .map(|(key, value)| match value {
                Value::String(value) => Ok(ParsedEntry::new(key, value)),
                other => Err(Error::validation_error(format!(
                    "value of '{}' is not a string: {}",
                    key, other
                ))),
            })
            .collect()
    }
}
