//! Second pass over a parsed file linking `ref = key` declarations to the
//! definitions they name. Forward references are legal because the pass runs
//! after the whole file has been indexed.

use crate::types::TwineFile;

/// A `ref` that names a key the file never defines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedReference {
    pub key: String,
    pub reference_key: String,
}

/// Resolves every `reference_key` against the file's key index.
///
/// A missing target is not an error: the definition simply has no
/// reference. The misses are returned so callers can report them.
pub fn resolve_references(file: &mut TwineFile) -> Vec<UnresolvedReference> {
    let mut unresolved = Vec::new();
    let mut resolved = Vec::new();

    for (s, section) in file.sections.iter().enumerate() {
        for (p, definition) in section.definitions.iter().enumerate() {
            let target = definition.reference_key.as_ref().and_then(|reference_key| {
                let id = file.id_of(reference_key);
                if id.is_none() {
                    unresolved.push(UnresolvedReference {
                        key: definition.key.clone(),
                        reference_key: reference_key.clone(),
                    });
                }
                id
            });
            resolved.push((s, p, target));
        }
    }

    for (s, p, target) in resolved {
        file.sections[s].definitions[p].reference = target;
    }

    unresolved
}
