//! Reader and writer for the master file format.
//!
//! ```text
//! [[General]]
//! 	[greeting]
//! 		en = `  Hello `
//! 		tags = ui,onboarding
//! 		comment = shown on first launch
//! 	[farewell]
//! 		ref = greeting
//! 		fr = Au revoir
//! ```
//!
//! Values are trimmed on read; a value wrapped in backticks has them
//! removed, which is how boundary whitespace is preserved.

use std::{io::Write, path::Path};

use tracing::{debug, warn};

use crate::{
    error::Error,
    references::resolve_references,
    traits::Parser,
    types::{Definition, DefinitionId, Section, TwineFile},
};

const COMMENT: &str = "comment";
const TAGS: &str = "tags";
const REF: &str = "ref";

impl Parser for TwineFile {
    fn parse_source(content: &str, source: &str) -> Result<Self, Error> {
        let mut file = TwineFile::new();
        let mut current: Option<DefinitionId> = None;

        for (n, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            let line_number = n + 1;

            if line.starts_with("[[") {
                let name = section_name(line)
                    .ok_or_else(|| Error::format_error(source, line_number, line))?;
                file.push_section(Section::new(name));
                current = None;
            } else if line.starts_with('[') {
                let key = definition_key(line)
                    .ok_or_else(|| Error::format_error(source, line_number, line))?;
                current = Some(file.push_definition(Definition::new(key)));
            } else if let Some((attribute, value)) = line.split_once('=') {
                let definition = current
                    .and_then(|id| file.get_mut(id))
                    .ok_or_else(|| {
                        Error::format_error(
                            source,
                            line_number,
                            format!("attribute outside of a definition: {line}"),
                        )
                    })?;
                let attribute = attribute.trim();
                let value = unquote(value.trim());
                match attribute {
                    COMMENT => definition.comment = Some(value.to_string()),
                    TAGS => definition.tags = Some(split_tags(value)),
                    REF => definition.reference_key = Some(value.to_string()),
                    lang => {
                        definition
                            .translations
                            .insert(lang.to_string(), value.to_string());
                        file.add_language_code(lang);
                    }
                }
            } else {
                return Err(Error::format_error(source, line_number, line));
            }
        }

        for miss in resolve_references(&mut file) {
            warn!(
                "{} refers to undefined key '{}'",
                miss.key, miss.reference_key
            );
        }
        debug!(
            source,
            definitions = file.key_count(),
            languages = file.language_codes.len(),
            "read master file"
        );
        Ok(file)
    }

    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let developer_language = self.developer_language();

        for (i, section) in self.sections.iter().enumerate() {
            if i > 0 {
                writeln!(writer)?;
            }
            let implicit = i == 0 && section.name.is_empty() && !section.definitions.is_empty();
            if !implicit {
                writeln!(writer, "[[{}]]", section.name)?;
            }

            for definition in &section.definitions {
                writeln!(writer, "\t[{}]", definition.key)?;

                let has_developer_value = match developer_language {
                    Some(lang) => write_translation(&mut writer, definition, lang)?,
                    None => false,
                };
                if !has_developer_value && definition.reference_key.is_none() {
                    warn!(
                        "{} does not exist in developer language '{}'",
                        definition.key,
                        developer_language.unwrap_or_default()
                    );
                }

                if let Some(reference_key) = &definition.reference_key {
                    write_attribute(&mut writer, REF, reference_key)?;
                }
                if let Some(tags) = &definition.tags {
                    write_attribute(&mut writer, TAGS, &tags.join(","))?;
                }
                if let Some(comment) = &definition.comment {
                    write_attribute(&mut writer, COMMENT, comment)?;
                }
                for lang in self.language_codes.iter().skip(1) {
                    write_translation(&mut writer, definition, lang)?;
                }
            }
        }
        Ok(())
    }
}

impl TwineFile {
    /// Reads a master file and, when `developer_language` is given, moves it
    /// to the front of the language codes.
    ///
    /// The format has no header naming the developer language; the reader
    /// takes the first code it meets. A file whose first definition lacks a
    /// developer-language translation therefore reads back with another
    /// code at index 0 unless the caller restores it here.
    pub fn read_with_developer_language<P: AsRef<Path>>(
        path: P,
        developer_language: Option<&str>,
    ) -> Result<Self, Error> {
        let mut file = Self::read_from(path)?;
        if let Some(code) = developer_language {
            file.set_developer_language(code);
        }
        Ok(file)
    }
}

fn section_name(line: &str) -> Option<&str> {
    line.strip_prefix("[[")?.strip_suffix("]]")
}

fn definition_key(line: &str) -> Option<&str> {
    let key = line.strip_prefix('[')?.strip_suffix(']')?;
    (!key.is_empty() && !key.contains(']')).then_some(key)
}

// An empty value has no tags; trailing empty fields are dropped.
fn split_tags(value: &str) -> Vec<String> {
    let mut tags: Vec<String> = value.split(',').map(str::to_string).collect();
    while tags.last().is_some_and(|t| t.is_empty()) {
        tags.pop();
    }
    tags
}

fn write_translation<W: Write>(
    writer: &mut W,
    definition: &Definition,
    lang: &str,
) -> Result<bool, Error> {
    match definition.translations.get(lang) {
        Some(value) => {
            write_attribute(writer, lang, value)?;
            Ok(true)
        }
        None => Ok(false),
    }
}

fn write_attribute<W: Write>(writer: &mut W, name: &str, value: &str) -> Result<(), Error> {
    if value.is_empty() {
        writeln!(writer, "\t\t{} =", name)?;
    } else {
        writeln!(writer, "\t\t{} = {}", name, quote(value))?;
    }
    Ok(())
}

/// Wraps `value` in backticks when reading it back would otherwise alter it.
pub fn quote(value: &str) -> String {
    let needs_quotes = value.starts_with(char::is_whitespace)
        || value.ends_with(char::is_whitespace)
        || (value.starts_with('`') && value.ends_with('`'));
    if needs_quotes {
        format!("`{}`", value)
    } else {
        value.to_string()
    }
}

/// Strips one pair of enclosing backticks.
pub fn unquote(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('`') && value.ends_with('`') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    const SAMPLE: &str = indoc! {"
        [[General]]
        \t[greeting]
        \t\ten = `  Hello `
        \t\ttags = ui,onboarding
        \t\tcomment = shown on first launch
        \t[farewell]
        \t\tref = greeting
        \t\tfr = Au revoir
    "};

    #[test]
    fn test_parse_sample() {
        let file = TwineFile::from_str(SAMPLE).unwrap();
        assert_eq!(file.sections.len(), 1);
        assert_eq!(file.sections[0].name, "General");
        assert_eq!(file.language_codes, vec!["en", "fr"]);

        let greeting = file.definition("greeting").unwrap();
        assert_eq!(greeting.translations["en"], "  Hello ");
        assert_eq!(
            greeting.tags,
            Some(vec!["ui".to_string(), "onboarding".to_string()])
        );
        assert_eq!(greeting.comment.as_deref(), Some("shown on first launch"));

        let farewell = file.definition("farewell").unwrap();
        let reference = file.reference_of(farewell);
        assert_eq!(farewell.reference_key.as_deref(), Some("greeting"));
        assert_eq!(farewell.comment_with(reference), Some("shown on first launch"));
        assert_eq!(farewell.translation_for("en", reference), Some("  Hello "));
        assert_eq!(farewell.translation_for("fr", reference), Some("Au revoir"));
    }

    #[test]
    fn test_write_sample() {
        let file = TwineFile::from_str(SAMPLE).unwrap();
        let written = file.write_to_string().unwrap();
        assert_eq!(
            written,
            indoc! {"
                [[General]]
                \t[greeting]
                \t\ten = `  Hello `
                \t\ttags = ui,onboarding
                \t\tcomment = shown on first launch
                \t[farewell]
                \t\tref = greeting
                \t\tfr = Au revoir
            "}
        );
    }

    #[test]
    fn test_definitions_before_any_section_get_implicit_section() {
        let file = TwineFile::from_str("[a]\n  en = A\n[[Named]]\n[b]\n  en = B\n").unwrap();
        assert_eq!(file.sections.len(), 2);
        assert_eq!(file.sections[0].name, "");
        assert_eq!(file.sections[1].name, "Named");

        let written = file.write_to_string().unwrap();
        assert!(written.starts_with("\t[a]\n"));
        assert!(written.contains("\n\n[[Named]]\n"));
        assert_eq!(TwineFile::from_str(&written).unwrap(), file);
    }

    #[test]
    fn test_bad_line_reports_path_and_line() {
        let err = TwineFile::parse_source("[[S]]\n[k]\n  en = x\nnonsense\n", "strings.txt")
            .unwrap_err();
        match err {
            Error::Format { path, line, .. } => {
                assert_eq!(path, "strings.txt");
                assert_eq!(line, 4);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_attribute_without_definition_is_an_error() {
        assert!(TwineFile::from_str("[[S]]\nen = x\n").is_err());
        assert!(TwineFile::from_str("[[S\n").is_err());
        assert!(TwineFile::from_str("[]\n").is_err());
    }

    #[test]
    fn test_language_codes_sorted_behind_developer_language() {
        let file = TwineFile::from_str("[k]\n fr = a\n en = b\n de = c\n").unwrap();
        assert_eq!(file.language_codes, vec!["fr", "de", "en"]);
    }

    #[test]
    fn test_developer_language_drifts_without_leading_translation() {
        let mut file = TwineFile::new();
        file.push_section(Section::new("S"));
        let mut first = Definition::new("first");
        first.translations.insert("fr".to_string(), "Bonjour".to_string());
        file.push_definition(first);
        let mut second = Definition::new("second");
        second.translations.insert("en".to_string(), "Bye".to_string());
        second.translations.insert("fr".to_string(), "Salut".to_string());
        file.push_definition(second);
        file.set_developer_language("en");
        file.add_language_code("fr");
        assert_eq!(file.language_codes, vec!["en", "fr"]);

        let written = file.write_to_string().unwrap();
        let reread = TwineFile::from_str(&written).unwrap();
        assert_eq!(reread.language_codes, vec!["fr", "en"]);

        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("strings.txt");
        std::fs::write(&path, &written).unwrap();
        let restored = TwineFile::read_with_developer_language(&path, Some("en")).unwrap();
        assert_eq!(restored, file);
    }

    #[test]
    fn test_empty_tags_and_comment_survive_round_trip() {
        let file = TwineFile::from_str("[k]\n en = a\n tags =\n comment =\n").unwrap();
        let k = file.definition("k").unwrap();
        assert_eq!(k.tags, Some(Vec::new()));
        assert_eq!(k.comment.as_deref(), Some(""));
        let reread = TwineFile::from_str(&file.write_to_string().unwrap()).unwrap();
        assert_eq!(reread, file);
    }

    #[test]
    fn test_duplicate_keys_are_kept_in_sections() {
        let file = TwineFile::from_str("[k]\n en = first\n[k]\n en = second\n").unwrap();
        assert_eq!(file.sections[0].definitions.len(), 2);
        assert_eq!(file.definition("k").unwrap().translations["en"], "second");
    }

    #[test]
    fn test_quote_unquote() {
        for value in [" lead", "trail ", "`both`", "`", "``", "\tTab", "plain", "mid ` tick"] {
            assert_eq!(unquote(&quote(value)), value);
        }
        assert_eq!(quote("plain"), "plain");
        assert_eq!(quote(" x"), "` x`");
        assert_eq!(unquote("`x"), "`x");
    }

    #[test]
    fn test_split_tags() {
        assert_eq!(split_tags(""), Vec::<String>::new());
        assert_eq!(split_tags("a,,b,"), vec!["a", "", "b"]);
    }
}
