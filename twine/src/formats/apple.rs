use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    error::Error,
    formats::{Formatter, ParsedEntry, directory_entries},
    types::TwineFile,
};

lazy_static! {
    static ref ENTRY_REGEX: Regex =
        Regex::new(r#"^\s*"((?:[^"\\]|\\.)+)"\s*=\s*"((?:[^"\\]|\\.)*)"\s*;"#).unwrap();
    static ref LINE_COMMENT_REGEX: Regex = Regex::new(r"^\s*/\*(.*)\*/\s*$").unwrap();
    static ref LPROJ_REGEX: Regex = Regex::new(r"^(.+)\.lproj$").unwrap();
}

/// Apple `.strings` files inside `<lang>.lproj` folders.
#[derive(Debug, Clone, Copy, Default)]
pub struct Format;

impl Formatter for Format {
    fn name(&self) -> &'static str {
        "apple"
    }

    fn extension(&self) -> &'static str {
        ".strings"
    }

    fn default_file_name(&self) -> &'static str {
        "Localizable.strings"
    }

    fn can_handle_directory(&self, path: &Path) -> bool {
        directory_entries(path)
            .iter()
            .any(|name| name.ends_with(".lproj"))
    }

    fn determine_language_given_path(&self, path: &Path, file: &TwineFile) -> Option<String> {
        path.components()
            .rev()
            .filter_map(|c| c.as_os_str().to_str())
            .find_map(|segment| LPROJ_REGEX.captures(segment))
            .and_then(|caps| match &caps[1] {
                "Base" => file.developer_language().map(str::to_string),
                lang => Some(lang.to_string()),
            })
    }

    fn output_path_for_language(&self, lang: &str, _file: &TwineFile) -> String {
        format!("{}.lproj", lang)
    }

    fn format_header(&self, lang: &str) -> Option<String> {
        Some(format!(
            "/**\n * Apple Strings File\n * Generated by Twine\n * Language: {}\n */",
            lang
        ))
    }

    fn format_section_header(&self, name: &str) -> Option<String> {
        Some(format!("/********** {} **********/\n", name))
    }

    fn format_comment(&self, comment: &str) -> Option<String> {
        Some(format!("/* {} */", comment.replace("*/", "* /")))
    }

    fn format_key_value(&self, key: &str, value: &str) -> Result<String, Error> {
        Ok(format!("\"{}\" = \"{}\";", escape_quotes(key), escape_quotes(value)))
    }

    fn parse(&self, content: &str) -> Result<Vec<ParsedEntry>, Error> {
        let mut entries = Vec::new();
        let mut comment: Option<String> = None;
        let mut in_block_comment = false;

        for line in content.lines() {
            let trimmed = line.trim();
            if in_block_comment {
                in_block_comment = !trimmed.contains("*/");
                continue;
            }

            if let Some(caps) = ENTRY_REGEX.captures(line) {
                entries.push(
                    ParsedEntry::new(unescape_quotes(&caps[1]), unescape_quotes(&caps[2]))
                        .with_comment(comment.take()),
                );
            } else if let Some(rest) = trimmed.strip_prefix("//") {
                comment = Some(rest.trim().to_string());
            } else if let Some(caps) = LINE_COMMENT_REGEX.captures(line) {
                // Section banners start with a run of asterisks.
                comment = (!caps[1].starts_with('*')).then(|| caps[1].trim().to_string());
            } else if trimmed.starts_with("/*") {
                in_block_comment = true;
                comment = None;
            }
        }

        Ok(entries)
    }
}

// A quote already preceded by a backslash is left alone.
fn escape_quotes(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    let mut previous = None;
    for c in value.chars() {
        if c == '"' && previous != Some('\\') {
            escaped.push('\\');
        }
        escaped.push(c);
        previous = Some(c);
    }
    escaped
}

fn unescape_quotes(value: &str) -> String {
    value.replace("\\\"", "\"")
}
