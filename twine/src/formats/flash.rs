//! Flash/Flex `.properties` bundles.
//!
//! Placeholders use the `{N}` convention, so numbering is positional and
//! the conversion characters are lost on the way back.

use crate::{
    error::Error,
    formats::{Formatter, ParsedEntry},
    placeholder::{flash_to_twine, twine_to_flash},
};

#[derive(Debug, Clone, Copy, Default)]
pub struct Format;

impl Formatter for Format {
    fn name(&self) -> &'static str {
        "flash"
    }

    fn extension(&self) -> &'static str {
        ".properties"
    }

    fn default_file_name(&self) -> &'static str {
        "resources.properties"
    }

    fn format_header(&self, lang: &str) -> Option<String> {
        Some(format!(
            "## Flash Strings File\n## Generated by Twine\n## Language: {}",
            lang
        ))
    }

    fn format_section_header(&self, name: &str) -> Option<String> {
        Some(format!("## Section: {} ##", name))
    }

    fn format_comment(&self, comment: &str) -> Option<String> {
        Some(format!("# {}", comment))
    }

    fn format_key_value(&self, key: &str, value: &str) -> Result<String, Error> {
        Ok(format!("{}={}", key, twine_to_flash(value)))
    }

    fn parse(&self, content: &str) -> Result<Vec<ParsedEntry>, Error> {
        let mut entries = Vec::new();
        let mut comment: Option<String> = None;

        for line in content.lines() {
            let trimmed = line.trim_start();
            if trimmed.is_empty() {
                continue;
            }
            if trimmed.starts_with("##") {
                comment = None;
            } else if let Some(rest) = trimmed
                .strip_prefix('#')
                .or_else(|| trimmed.strip_prefix('!'))
            {
                comment = Some(rest.trim().to_string());
            } else if let Some((key, value)) = trimmed.split_once('=') {
                entries.push(
                    ParsedEntry::new(key.trim_end(), flash_to_twine(value.trim_start()))
                        .with_comment(comment.take()),
                );
            }
        }

        Ok(entries)
    }
}
