use proptest::prelude::*;
use std::collections::BTreeMap;
use twine::formats::FormatType;
use twine::tags;
use twine::traits::Parser;
use twine::twine_file::{quote, unquote};
use twine::{Definition, OutputOptions, Section, TwineFile, project};

const LANGUAGES: [&str; 3] = ["en", "fr", "de"];

fn key_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z][a-z0-9_]{0,15}").expect("valid key regex")
}

// Any printable ASCII, so quoting and `=` handling get exercised.
fn master_value_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[ -~]{0,24}").expect("valid value regex")
}

fn platform_value_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9][A-Za-z0-9 _\\-\\.,!\\?]{0,29}")
        .expect("valid value regex")
}

fn tags_strategy() -> impl Strategy<Value = Option<Vec<String>>> {
    prop::option::of(prop::collection::vec(
        proptest::string::string_regex("[a-z]{1,8}").expect("valid tag regex"),
        0..3,
    ))
}

#[derive(Debug, Clone)]
struct DefinitionSeed {
    translations: Vec<Option<String>>,
    en: Option<String>,
    comment: Option<String>,
    tags: Option<Vec<String>>,
}

fn definition_seed_strategy() -> impl Strategy<Value = DefinitionSeed> {
    (
        prop::option::weighted(0.8, master_value_strategy()),
        prop::collection::vec(prop::option::of(master_value_strategy()), 2),
        prop::option::of(master_value_strategy()),
        tags_strategy(),
    )
        .prop_map(|(en, translations, comment, tags)| DefinitionSeed {
            translations,
            en,
            comment,
            tags,
        })
}

fn sections_strategy() -> impl Strategy<Value = Vec<(String, BTreeMap<String, DefinitionSeed>)>> {
    prop::collection::vec(
        (
            proptest::string::string_regex("[A-Z][A-Za-z ]{0,10}[a-z]").expect("valid section regex"),
            prop::collection::btree_map(key_strategy(), definition_seed_strategy(), 0..5),
        ),
        1..4,
    )
}

fn build_file(sections: &[(String, BTreeMap<String, DefinitionSeed>)]) -> TwineFile {
    let mut file = TwineFile::new();
    let mut seen = std::collections::HashSet::new();

    for (name, definitions) in sections {
        file.push_section(Section::new(name.clone()));
        for (key, seed) in definitions {
            // Keys must stay unique across sections for the index to match.
            if !seen.insert(key.clone()) {
                continue;
            }
            let mut definition = Definition::new(key.clone());
            definition.comment = seed.comment.clone();
            definition.tags = seed.tags.clone();
            if let Some(en) = &seed.en {
                definition.translations.insert("en".to_string(), en.clone());
                file.add_language_code("en");
            }
            for (lang, value) in LANGUAGES[1..].iter().zip(&seed.translations) {
                if let Some(value) = value {
                    definition
                        .translations
                        .insert(lang.to_string(), value.clone());
                    file.add_language_code(lang);
                }
            }
            file.push_definition(definition);
        }
    }
    // `en` stays the developer language even when the first definition
    // lacks it.
    if file.language_codes.iter().any(|c| c == "en") {
        file.set_developer_language("en");
    }
    file
}

fn projected_values(file: &TwineFile, lang: &str) -> BTreeMap<String, String> {
    project(file, lang, &OutputOptions::new())
        .definitions()
        .map(|d| (d.key.clone(), d.translations[lang].clone()))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn master_file_write_then_read_is_identity(sections in sections_strategy()) {
        let file = build_file(&sections);
        let written = file
            .write_to_string()
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        let mut reread =
            TwineFile::from_str(&written).map_err(|e| TestCaseError::fail(e.to_string()))?;
        // The reader takes the first code it meets as developer language.
        let first_written = file
            .definitions()
            .find_map(|d| {
                file.language_codes
                    .iter()
                    .find(|c| d.translations.contains_key(c.as_str()))
            })
            .cloned();
        prop_assert_eq!(reread.language_codes.first().cloned(), first_written);
        if file.language_codes.iter().any(|c| c == "en") {
            reread.set_developer_language("en");
        }
        prop_assert_eq!(reread, file);
    }

    #[test]
    fn unquote_inverts_quote(value in "[ -~\\t]{0,24}") {
        let quoted = quote(&value);
        prop_assert_eq!(unquote(&quoted), value.as_str());
    }

    #[test]
    fn empty_query_matches_everything(
        definition_tags in tags_strategy(),
        reference_tags in tags_strategy(),
        include_untagged in any::<bool>(),
    ) {
        let query: Vec<Vec<String>> = Vec::new();
        prop_assert!(tags::matches(
            definition_tags.as_deref(),
            reference_tags.as_deref(),
            query.as_slice(),
            include_untagged,
        ));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn every_format_parses_what_it_formats(
        values in prop::collection::btree_map(key_strategy(), platform_value_strategy(), 1..8)
    ) {
        let mut file = TwineFile::new();
        file.push_section(Section::new("Main"));
        for (key, value) in &values {
            let mut definition = Definition::new(key.clone());
            definition.translations.insert("fr".to_string(), value.clone());
            file.push_definition(definition);
        }
        file.add_language_code("fr");

        for format in FormatType::ALL {
            let formatter = format.formatter();
            let projected = project(&file, "fr", &OutputOptions::new());
            let content = formatter
                .format_file(&projected, "fr")
                .map_err(|e| TestCaseError::fail(e.to_string()))?
                .ok_or_else(|| TestCaseError::fail("empty output"))?;
            let parsed: BTreeMap<String, String> = formatter
                .parse(&content)
                .map_err(|e| TestCaseError::fail(e.to_string()))?
                .into_iter()
                .map(|entry| (entry.key, entry.value))
                .collect();
            prop_assert_eq!(&parsed, &projected_values(&file, "fr"), "format {}", format);
        }
    }
}
