//! Consistency checks over a master file.
//!
//! Every problem found is collected and reported in one
//! [`Error::Validation`], grouped by kind, so a single run lists them all.

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::info;

use crate::{error::Error, types::TwineFile};

lazy_static! {
    static ref VALID_KEY_REGEX: Regex = Regex::new(r"^[A-Za-z0-9_]+$").unwrap();
}

// Keeps first-seen order and drops repeats.
#[derive(Default)]
struct KeySet {
    seen: HashSet<String>,
    keys: Vec<String>,
}

impl KeySet {
    fn add(&mut self, key: &str) {
        if self.seen.insert(key.to_string()) {
            self.keys.push(key.to_string());
        }
    }

    fn report(&self, title: &str) -> Option<String> {
        if self.keys.is_empty() {
            return None;
        }
        let listed: Vec<String> = self.keys.iter().map(|k| format!("  {}", k)).collect();
        Some(format!("{}:\n{}", title, listed.join("\n")))
    }
}

/// Checks `file` for duplicate keys and keys outside `[A-Za-z0-9_]+`.
///
/// With `pedantic`, definitions without any tag (own or inherited) and
/// references to undefined keys are reported too. Returns the number of
/// definitions checked.
pub fn validate(file: &TwineFile, pedantic: bool) -> Result<usize, Error> {
    let mut total = 0;
    let mut all_keys = HashSet::new();
    let mut duplicates = KeySet::default();
    let mut invalid = KeySet::default();
    let mut untagged = KeySet::default();
    let mut dangling = KeySet::default();

    for definition in file.definitions() {
        total += 1;
        if !all_keys.insert(definition.key.as_str()) {
            duplicates.add(&definition.key);
        }
        if !VALID_KEY_REGEX.is_match(&definition.key) {
            invalid.add(&definition.key);
        }

        let reference = file.reference_of(definition);
        if definition.tags_with(reference).is_none_or(|tags| tags.is_empty()) {
            untagged.add(&definition.key);
        }
        if definition.reference_key.is_some() && reference.is_none() {
            dangling.add(&definition.key);
        }
    }

    let mut errors: Vec<String> = Vec::new();
    errors.extend(duplicates.report("Found duplicate key(s)"));
    if pedantic {
        errors.extend(untagged.report("Found key(s) without tags"));
        errors.extend(dangling.report("Found key(s) referring to undefined keys"));
    }
    errors.extend(invalid.report("Found key(s) with invalid characters"));

    if !errors.is_empty() {
        return Err(Error::validation_error(errors.join("\n\n")));
    }

    info!(definitions = total, pedantic, "master file is valid");
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Parser;
    use indoc::indoc;

    #[test]
    fn test_valid_file() {
        let file = TwineFile::from_str(indoc! {"
            [[General]]
            \t[greeting]
            \t\ten = Hi
            \t\ttags = ui
            \t[farewell]
            \t\tref = greeting
            \t\ten = Bye
        "})
        .unwrap();
        assert_eq!(validate(&file, false).unwrap(), 2);
        assert_eq!(validate(&file, true).unwrap(), 2);
    }

    #[test]
    fn test_all_problems_reported_together() {
        let file = TwineFile::from_str(indoc! {"
            [[General]]
            \t[dup]
            \t\ten = a
            \t[dup]
            \t\ten = b
            \t[bad key]
            \t\ten = c
            \t[bad-key]
            \t\ten = d
        "})
        .unwrap();

        let message = validate(&file, false).unwrap_err().to_string();
        assert_eq!(
            message,
            "Found duplicate key(s):\n  dup\n\nFound key(s) with invalid characters:\n  bad key\n  bad-key"
        );
    }

    #[test]
    fn test_pedantic_checks() {
        let file = TwineFile::from_str(indoc! {"
            [[General]]
            \t[tagged]
            \t\ten = a
            \t\ttags = ui
            \t[empty_tags]
            \t\ten = b
            \t\ttags =
            \t[orphan]
            \t\tref = nowhere
            \t\ten = c
        "})
        .unwrap();

        assert!(validate(&file, false).is_ok());
        let message = validate(&file, true).unwrap_err().to_string();
        assert!(message.contains("without tags:\n  empty_tags\n  orphan"));
        assert!(message.contains("undefined keys:\n  orphan"));
        assert!(!message.contains("  tagged"));
    }
}
