//! Support for Android `strings.xml` resources.
//!
//! Values are written with Android's escaping rules and placeholders are
//! converted with [`twine_to_android`]; parsing reverses both.

use std::{io::Cursor, path::Path};

use lazy_static::lazy_static;
use quick_xml::{
    Reader, Writer,
    escape::escape,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use regex::Regex;
use unic_langid::LanguageIdentifier;

use crate::{
    error::Error,
    formats::{Formatter, ParsedEntry, directory_entries, translated},
    placeholder::{android_to_twine, twine_to_android},
    types::TwineFile,
};

lazy_static! {
    static ref VALUES_REGEX: Regex =
        Regex::new(r"(?i)^values-([a-z]{2,3})(?:-r([a-z]{2}))?$").unwrap();
    static ref BCP47_VALUES_REGEX: Regex = Regex::new(r"^values-b\+([A-Za-z0-9+]+)$").unwrap();
    static ref RESOURCE_REFERENCE_REGEX: Regex =
        Regex::new(r"^@(?:[a-z.]+:)?[a-z+]+/[A-Za-z_]+").unwrap();
    static ref UNICODE_ESCAPE_REGEX: Regex = Regex::new(r"\\u([0-9A-Fa-f]{4})").unwrap();
}

/// Android qualifiers that do not map one-to-one onto language codes.
const LANGUAGE_MAPPINGS: &[(&str, &str)] = &[
    ("zh-rCN", "zh-Hans"),
    ("zh-rHK", "zh-Hant"),
    ("in", "id"),
    ("nb", "no"),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct Format;

impl Formatter for Format {
    fn name(&self) -> &'static str {
        "android"
    }

    fn extension(&self) -> &'static str {
        ".xml"
    }

    fn default_file_name(&self) -> &'static str {
        "strings.xml"
    }

    fn can_handle_directory(&self, path: &Path) -> bool {
        directory_entries(path)
            .iter()
            .any(|name| name.starts_with("values"))
    }

    fn determine_language_given_path(&self, path: &Path, file: &TwineFile) -> Option<String> {
        for segment in path.components().filter_map(|c| c.as_os_str().to_str()) {
            if segment == "values" {
                return file.developer_language().map(str::to_string);
            }
            if let Some(caps) = BCP47_VALUES_REGEX.captures(segment) {
                return Some(caps[1].replace('+', "-"));
            }
            if let Some(caps) = VALUES_REGEX.captures(segment) {
                let qualifier = match caps.get(2) {
                    Some(region) => format!("{}-r{}", &caps[1], region.as_str()),
                    None => caps[1].to_string(),
                };
                let lang = LANGUAGE_MAPPINGS
                    .iter()
                    .find(|(android, _)| *android == qualifier)
                    .map(|(_, lang)| lang.to_string())
                    .unwrap_or_else(|| qualifier.replacen("-r", "-", 1));
                return Some(lang);
            }
        }
        None
    }

    fn output_path_for_language(&self, lang: &str, file: &TwineFile) -> String {
        if file.developer_language() == Some(lang) {
            return "values".to_string();
        }
        if let Some((android, _)) = LANGUAGE_MAPPINGS.iter().find(|(_, l)| *l == lang) {
            return format!("values-{}", android);
        }
        match lang.parse::<LanguageIdentifier>() {
            Ok(id) if id.script.is_some() => {
                format!("values-b+{}", id.to_string().replace('-', "+"))
            }
            Ok(id) => match id.region {
                Some(region) => format!("values-{}-r{}", id.language, region),
                None => format!("values-{}", id.language),
            },
            Err(_) => format!("values-{}", lang),
        }
    }

    fn format_key_value(&self, key: &str, value: &str) -> Result<String, Error> {
        Ok(format!(
            "<string name=\"{}\">{}</string>",
            escape(key),
            format_value(value)?
        ))
    }

    fn format_file(&self, file: &TwineFile, lang: &str) -> Result<Option<String>, Error> {
        if file.is_empty() {
            return Ok(None);
        }

        let mut out = Vec::new();
        let mut xml_writer = Writer::new(Cursor::new(&mut out));

        xml_writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
        for line in [
            " Android Strings File ".to_string(),
            " Generated by Twine ".to_string(),
            format!(" Language: {} ", lang),
        ] {
            xml_writer.write_event(Event::Comment(BytesText::from_escaped(line)))?;
            xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
        }

        xml_writer.write_event(Event::Start(BytesStart::new("resources")))?;

        for section in &file.sections {
            let definitions = translated(section, lang);
            if definitions.is_empty() {
                continue;
            }
            if !section.name.is_empty() {
                xml_writer.write_event(Event::Text(BytesText::new("\n\t")))?;
                xml_writer.write_event(Event::Comment(BytesText::from_escaped(format!(
                    " SECTION: {} ",
                    comment_safe(&section.name)
                ))))?;
            }
            for (definition, value) in definitions {
                if let Some(comment) = &definition.comment {
                    xml_writer.write_event(Event::Text(BytesText::new("\n\t")))?;
                    xml_writer.write_event(Event::Comment(BytesText::from_escaped(format!(
                        " {} ",
                        comment_safe(comment)
                    ))))?;
                }
                xml_writer.write_event(Event::Text(BytesText::new("\n\t")))?;
                // The element is pre-rendered; its text is already escaped.
                xml_writer.write_event(Event::Text(BytesText::from_escaped(
                    self.format_key_value(&definition.key, value)?,
                )))?;
            }
            xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
        }

        xml_writer.write_event(Event::End(BytesEnd::new("resources")))?;
        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;

        String::from_utf8(out)
            .map(Some)
            .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
    }

    fn parse(&self, content: &str) -> Result<Vec<ParsedEntry>, Error> {
        let mut xml_reader = Reader::from_str(content);

        let mut entries = Vec::new();
        let mut comment: Option<String> = None;
        let mut in_resources = false;

        loop {
            match xml_reader.read_event()? {
                Event::Start(ref e) if e.name().as_ref() == b"resources" => in_resources = true,
                Event::Comment(e) if in_resources => {
                    let text = String::from_utf8_lossy(&e)
                        .split_whitespace()
                        .collect::<Vec<_>>()
                        .join(" ");
                    comment = (!text.is_empty() && !text.starts_with("SECTION:")).then_some(text);
                }
                Event::Start(ref e) if e.name().as_ref() == b"string" => {
                    let mut name = None;
                    for attr in e.attributes().with_checks(false) {
                        let attr = attr?;
                        if attr.key.as_ref() == b"name" {
                            name = Some(attr.unescape_value()?.to_string());
                        }
                    }
                    let name = name.ok_or_else(|| {
                        Error::validation_error("string tag missing 'name'".to_string())
                    })?;
                    let value = read_string_content(&mut xml_reader)?;
                    entries.push(
                        ParsedEntry::new(name, android_to_twine(&unescape_value(&value)))
                            .with_comment(comment.take()),
                    );
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(entries)
    }
}

// Collects text inside `<string>`, keeping inline markup as written.
fn read_string_content(xml_reader: &mut Reader<&[u8]>) -> Result<String, Error> {
    let mut value = String::new();
    let mut depth = 0usize;
    loop {
        match xml_reader.read_event()? {
            Event::Text(e) => value.push_str(&e.unescape()?),
            Event::CData(e) => value.push_str(&String::from_utf8_lossy(&e)),
            Event::Start(e) => {
                depth += 1;
                value.push('<');
                value.push_str(&String::from_utf8_lossy(&e));
                value.push('>');
            }
            Event::End(e) => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
                value.push_str("</");
                value.push_str(&String::from_utf8_lossy(e.name().as_ref()));
                value.push('>');
            }
            Event::Eof => {
                return Err(Error::validation_error("unexpected end of strings.xml"));
            }
            _ => {}
        }
    }
    Ok(value)
}

/// Escapes a master-file value for the text content of `<string>` and
/// converts its placeholders.
pub fn format_value(value: &str) -> Result<String, Error> {
    let converted = twine_to_android(value)?;

    let mut escaped = String::with_capacity(converted.len());
    let mut previous = None;
    for (i, c) in converted.char_indices() {
        let already_escaped = previous == Some('\\');
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\'' | '"' if !already_escaped => {
                escaped.push('\\');
                escaped.push(c);
            }
            '@' if !already_escaped && !RESOURCE_REFERENCE_REGEX.is_match(&converted[i..]) => {
                escaped.push_str("\\@")
            }
            '?' if i == 0 => escaped.push_str("\\?"),
            _ => escaped.push(c),
        }
        previous = Some(c);
    }

    Ok(encode_boundary_spaces(&escaped))
}

/// Reverses Android backslash escapes in an already XML-unescaped value.
pub fn unescape_value(value: &str) -> String {
    let value = UNICODE_ESCAPE_REGEX.replace_all(value, |caps: &regex::Captures| {
        u32::from_str_radix(&caps[1], 16)
            .ok()
            .and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_else(|| caps[0].to_string())
    });
    value
        .replace("\\'", "'")
        .replace("\\\"", "\"")
        .replace("\\@", "@")
        .replace("\\?", "?")
}

fn encode_boundary_spaces(value: &str) -> String {
    let trimmed_start = value.trim_start_matches(' ');
    let leading = value.len() - trimmed_start.len();
    let core = trimmed_start.trim_end_matches(' ');
    let trailing = trimmed_start.len() - core.len();
    format!(
        "{}{}{}",
        "\\u0020".repeat(leading),
        core,
        "\\u0020".repeat(trailing)
    )
}

fn comment_safe(text: &str) -> String {
    text.replace("--", "—")
}
