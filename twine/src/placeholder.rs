//! Conversion of printf-style placeholders between the master file's
//! convention (`%@` for objects) and the ones used by each platform.
//!
//! A placeholder is `%`, an optional `N$` parameter index, an optional flag,
//! width, precision and length modifier, then a conversion character.
//!
//! Numbering injected by [`twine_to_android`] is one-directional:
//! [`android_to_twine`] keeps explicit indices as they are. Brace conversion
//! is lossy in both directions: [`twine_to_flash`] renumbers by order of
//! appearance and [`flash_to_twine`] drops the indices altogether.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::error::Error;

const PARAMETER: &str = r"(?:\d+\$)?";
const FLAGS_WIDTH_PRECISION_LENGTH: &str = r"[-+0#]?(?:\d+|\*)?(?:\.(?:\d+|\*))?(?:hh?|ll?|L|z|j|t)?";
const TYPES: &str = "[diufFeEgGxXoscpaAq]";

lazy_static! {
    static ref TWINE_OBJECT_REGEX: Regex =
        Regex::new(&format!("(%{PARAMETER}{FLAGS_WIDTH_PRECISION_LENGTH})@")).unwrap();
    static ref ANDROID_STRING_REGEX: Regex =
        Regex::new(&format!("(%{PARAMETER}{FLAGS_WIDTH_PRECISION_LENGTH})s")).unwrap();
    static ref PLACEHOLDER_REGEX: Regex =
        Regex::new(&format!("%{PARAMETER}{FLAGS_WIDTH_PRECISION_LENGTH}{TYPES}")).unwrap();
    static ref NON_NUMBERED_REGEX: Regex =
        Regex::new(&format!("%({FLAGS_WIDTH_PRECISION_LENGTH}{TYPES})")).unwrap();
    static ref PLACEHOLDER_TAIL_REGEX: Regex =
        Regex::new(&format!("^{PARAMETER}{FLAGS_WIDTH_PRECISION_LENGTH}{TYPES}")).unwrap();
    static ref BRACE_REGEX: Regex = Regex::new(r"\{\d+\}").unwrap();
}

/// `%@` -> `%s`, keeping index, flags, width, precision and length.
pub fn twine_object_to_string(input: &str) -> String {
    TWINE_OBJECT_REGEX.replace_all(input, "${1}s").into_owned()
}

/// Number of placeholders in `input` (escaped `%%` excluded).
pub fn placeholder_count(input: &str) -> usize {
    PLACEHOLDER_REGEX.find_iter(input).count()
}

/// Converts a master-file value to an Android format string.
///
/// Strings without placeholders pass through untouched, literal `%`
/// included. Once a placeholder is present every lone `%` becomes `%%`,
/// and two or more unnumbered placeholders get sequential `N$` indices.
/// A mix of numbered and unnumbered placeholders is rejected.
pub fn twine_to_android(input: &str) -> Result<String, Error> {
    let value = twine_object_to_string(input);

    let count = placeholder_count(&value);
    if count == 0 {
        return Ok(value);
    }

    let value = escape_lone_percents(&value);
    if count < 2 {
        return Ok(value);
    }

    let non_numbered = NON_NUMBERED_REGEX.find_iter(&value).count();
    if non_numbered == 0 {
        return Ok(value);
    }
    if non_numbered != count {
        return Err(Error::Placeholder {
            value: input.to_string(),
        });
    }

    let mut index = 0;
    let numbered = NON_NUMBERED_REGEX.replace_all(&value, |caps: &Captures| {
        index += 1;
        format!("%{}${}", index, &caps[1])
    });
    Ok(numbered.into_owned())
}

/// `%s` -> `%@`, keeping any explicit index.
pub fn android_to_twine(input: &str) -> String {
    ANDROID_STRING_REGEX.replace_all(input, "${1}@").into_owned()
}

/// Replaces placeholders with `{0}`, `{1}`, ... in order of appearance,
/// ignoring any explicit index.
pub fn twine_to_flash(input: &str) -> String {
    let value = twine_object_to_string(input);
    let mut index = 0;
    PLACEHOLDER_REGEX
        .replace_all(&value, |_: &Captures| {
            let brace = format!("{{{}}}", index);
            index += 1;
            brace
        })
        .into_owned()
}

/// `{N}` -> `%@`.
pub fn flash_to_twine(input: &str) -> String {
    BRACE_REGEX.replace_all(input, "%@").into_owned()
}

// A `%` is lone when it is neither half of `%%` nor the start of a placeholder,
// including at the very start of the string.
fn escape_lone_percents(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 4);
    let mut previous = None;
    for (i, c) in value.char_indices() {
        if c == '%' {
            let rest = &value[i + 1..];
            let lone = previous != Some('%')
                && !rest.starts_with('%')
                && !PLACEHOLDER_TAIL_REGEX.is_match(rest);
            out.push_str(if lone { "%%" } else { "%" });
        } else {
            out.push(c);
        }
        previous = Some(c);
    }
    out
}
