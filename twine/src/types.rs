//! The in-memory translation store: a master file made of sections, each
//! holding definitions with per-language translations.
//!
//! Readers decode into these types, the output projector derives new
//! [`TwineFile`] values from them and format adapters serialize them.

use std::collections::{BTreeMap, HashMap};

/// Position of a definition inside [`TwineFile::sections`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DefinitionId {
    pub section: usize,
    pub position: usize,
}

/// One translatable string and its metadata.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Definition {
    /// Unique identifier of the string.
    pub key: String,

    /// Note for translators. Falls back to the reference when absent.
    pub comment: Option<String>,

    /// Tags used for selection. `None` may inherit from the reference,
    /// `Some(vec![])` means explicitly untagged.
    pub tags: Option<Vec<String>>,

    /// Language code to translated text.
    pub translations: BTreeMap<String, String>,

    /// Key of the definition this one inherits from.
    pub reference_key: Option<String>,

    /// Resolved location of `reference_key`, set by the reference resolver.
    pub reference: Option<DefinitionId>,
}

impl Definition {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    /// The comment of this definition, or the reference's if absent.
    pub fn comment_with<'a>(&'a self, reference: Option<&'a Definition>) -> Option<&'a str> {
        self.comment
            .as_deref()
            .or_else(|| reference.and_then(|r| r.comment.as_deref()))
    }

    /// The tags of this definition, or the reference's if absent.
    pub fn tags_with<'a>(&'a self, reference: Option<&'a Definition>) -> Option<&'a [String]> {
        self.tags
            .as_deref()
            .or_else(|| reference.and_then(|r| r.tags.as_deref()))
    }

    /// Looks up `lang` locally, then on the reference. One hop only.
    pub fn translation_for<'a>(
        &'a self,
        lang: &str,
        reference: Option<&'a Definition>,
    ) -> Option<&'a str> {
        self.translations
            .get(lang)
            .or_else(|| reference.and_then(|r| r.translations.get(lang)))
            .map(String::as_str)
    }
}

/// A named, ordered group of definitions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Section {
    pub name: String,
    pub definitions: Vec<Definition>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            definitions: Vec::new(),
        }
    }
}

/// The master file. `language_codes[0]` is the developer language.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TwineFile {
    pub sections: Vec<Section>,
    pub language_codes: Vec<String>,
    index: HashMap<String, DefinitionId>,
}

impl TwineFile {
    /// Creates an empty file.
    pub fn new() -> Self {
        Self::default()
    }

    /// The developer (base) language, if any language is known yet.
    pub fn developer_language(&self) -> Option<&str> {
        self.language_codes.first().map(String::as_str)
    }

    /// Registers a language code. The first code becomes the developer
    /// language; later codes are kept sorted behind it.
    pub fn add_language_code(&mut self, code: &str) {
        if self.language_codes.iter().any(|c| c == code) {
            return;
        }
        self.language_codes.push(code.to_string());
        self.language_codes[1..].sort();
    }

    /// Moves `code` to the front, inserting it if unknown.
    pub fn set_developer_language(&mut self, code: &str) {
        self.language_codes.retain(|c| c != code);
        self.language_codes.insert(0, code.to_string());
    }

    /// Appends a definition to the last section, opening an unnamed section
    /// when there is none. A duplicate key replaces the index entry only.
    pub fn push_definition(&mut self, definition: Definition) -> DefinitionId {
        if self.sections.is_empty() {
            self.sections.push(Section::new(""));
        }
        let section = self.sections.len() - 1;
        let position = self.sections[section].definitions.len();
        let id = DefinitionId { section, position };
        self.index.insert(definition.key.clone(), id);
        self.sections[section].definitions.push(definition);
        id
    }

    /// Appends a definition to an existing section and indexes it.
    pub fn push_definition_into(
        &mut self,
        section: usize,
        definition: Definition,
    ) -> Option<DefinitionId> {
        let target = self.sections.get_mut(section)?;
        let id = DefinitionId {
            section,
            position: target.definitions.len(),
        };
        self.index.insert(definition.key.clone(), id);
        target.definitions.push(definition);
        Some(id)
    }

    /// Appends a section, indexing whatever definitions it already holds.
    pub fn push_section(&mut self, section: Section) {
        let s = self.sections.len();
        for (p, definition) in section.definitions.iter().enumerate() {
            self.index.insert(
                definition.key.clone(),
                DefinitionId {
                    section: s,
                    position: p,
                },
            );
        }
        self.sections.push(section);
    }

    /// Inserts a section and rebuilds the key index and references.
    pub fn insert_section(&mut self, at: usize, section: Section) {
        self.sections.insert(at, section);
        self.reindex();
    }

    /// Rebuilds the key index from the section lists (last occurrence
    /// wins) and re-resolves references against it.
    pub fn reindex(&mut self) {
        self.index.clear();
        for (s, section) in self.sections.iter().enumerate() {
            for (p, definition) in section.definitions.iter().enumerate() {
                self.index.insert(
                    definition.key.clone(),
                    DefinitionId {
                        section: s,
                        position: p,
                    },
                );
            }
        }
        crate::references::resolve_references(self);
    }

    pub fn id_of(&self, key: &str) -> Option<DefinitionId> {
        self.index.get(key).copied()
    }

    pub fn get(&self, id: DefinitionId) -> Option<&Definition> {
        self.sections
            .get(id.section)
            .and_then(|s| s.definitions.get(id.position))
    }

    pub fn get_mut(&mut self, id: DefinitionId) -> Option<&mut Definition> {
        self.sections
            .get_mut(id.section)
            .and_then(|s| s.definitions.get_mut(id.position))
    }

    /// Looks a definition up through the global key index.
    pub fn definition(&self, key: &str) -> Option<&Definition> {
        self.id_of(key).and_then(|id| self.get(id))
    }

    pub fn definition_mut(&mut self, key: &str) -> Option<&mut Definition> {
        let id = self.id_of(key)?;
        self.get_mut(id)
    }

    /// The definition `definition` refers to, if it was resolved.
    pub fn reference_of(&self, definition: &Definition) -> Option<&Definition> {
        definition.reference.and_then(|id| self.get(id))
    }

    /// All definitions in section order, duplicates included.
    pub fn definitions(&self) -> impl Iterator<Item = &Definition> {
        self.sections.iter().flat_map(|s| s.definitions.iter())
    }

    /// Number of distinct keys in the index.
    pub fn key_count(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
