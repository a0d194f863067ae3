//! Projection of the master file onto a single language.
//!
//! The result is a fresh [`TwineFile`] with the same sections (in the same
//! order) holding only the definitions that pass the tag query and resolve
//! to a value, each with exactly one translation.

use std::{fmt::Display, str::FromStr};

use crate::{
    error::Error,
    tags::TagQuery,
    types::{Section, TwineFile},
};

/// Which definitions a projection keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IncludeMode {
    /// Translated definitions, plus untranslated ones through fallback.
    #[default]
    All,
    /// Only definitions translated into the target language.
    Translated,
    /// Only definitions missing the target language, filled by fallback.
    Untranslated,
}

impl Display for IncludeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IncludeMode::All => write!(f, "all"),
            IncludeMode::Translated => write!(f, "translated"),
            IncludeMode::Untranslated => write!(f, "untranslated"),
        }
    }
}

impl FromStr for IncludeMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(IncludeMode::All),
            "translated" => Ok(IncludeMode::Translated),
            "untranslated" => Ok(IncludeMode::Untranslated),
            other => Err(Error::validation_error(format!(
                "unknown include mode `{}`, expected all, translated or untranslated",
                other
            ))),
        }
    }
}

/// Options controlling a projection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OutputOptions {
    /// Target language. When unset, generation infers it from the output path.
    pub language: Option<String>,
    pub tags: TagQuery,
    pub include_untagged: bool,
    pub include: IncludeMode,
    /// Overrides `language_codes[0]` as the last fallback language.
    pub developer_language: Option<String>,
}

impl OutputOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_language(mut self, language: Option<String>) -> Self {
        self.language = language;
        self
    }

    pub fn with_tags(mut self, tags: TagQuery) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_untagged(mut self, include_untagged: bool) -> Self {
        self.include_untagged = include_untagged;
        self
    }

    pub fn with_include(mut self, include: IncludeMode) -> Self {
        self.include = include;
        self
    }

    pub fn with_developer_language(mut self, developer_language: Option<String>) -> Self {
        self.developer_language = developer_language;
        self
    }
}

/// Languages tried, in order, when `lang` has no translation.
pub fn fallback_languages(lang: &str, developer_language: &str) -> Vec<String> {
    let mut languages = Vec::with_capacity(2);
    if lang == "zh-TW" {
        languages.push("zh-Hant".to_string());
    }
    languages.push(developer_language.to_string());
    languages
}

/// Builds the single-language view of `file` for `lang`.
///
/// Inherited comment and tags are copied onto the projected definitions,
/// so the result does not depend on references into the source file.
pub fn project(file: &TwineFile, lang: &str, options: &OutputOptions) -> TwineFile {
    let developer_language = options
        .developer_language
        .as_deref()
        .or(file.developer_language())
        .unwrap_or(lang);
    let fallbacks = fallback_languages(lang, developer_language);

    let mut result = TwineFile::new();
    result.language_codes = file.language_codes.clone();

    for section in &file.sections {
        let mut projected = Section::new(section.name.clone());

        for definition in &section.definitions {
            let reference = file.reference_of(definition);
            if !options.tags.matches(
                definition.tags.as_deref(),
                reference.and_then(|r| r.tags.as_deref()),
                options.include_untagged,
            ) {
                continue;
            }

            let mut value = definition.translation_for(lang, reference);
            if value.is_some() && options.include == IncludeMode::Untranslated {
                continue;
            }
            if value.is_none() && options.include != IncludeMode::Translated {
                value = fallbacks
                    .iter()
                    .find_map(|fallback| definition.translation_for(fallback, reference));
            }
            let Some(value) = value else {
                continue;
            };

            let mut clone = definition.clone();
            clone.comment = definition.comment_with(reference).map(str::to_string);
            clone.tags = definition.tags_with(reference).map(<[String]>::to_vec);
            clone.reference = None;
            clone.translations.clear();
            clone.translations.insert(lang.to_string(), value.to_string());
            projected.definitions.push(clone);
        }

        result.push_section(projected);
    }

    result
}
