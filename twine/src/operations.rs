//! Batch operations over a master file, shared by the CLI and library users.
//!
//! Generation projects the master file per language and hands the result
//! to a format adapter; consumption parses a platform file and merges its
//! values back into the master file.

use std::{
    fs,
    path::{Path, PathBuf},
};

use ignore::WalkBuilder;
use tracing::{debug, info, warn};

use crate::{
    encoding,
    error::Error,
    formats::{FormatType, Formatter},
    output::{OutputOptions, project},
    types::{Definition, Section, TwineFile},
};

/// Section that receives keys added by `consume_all`.
pub const UNCATEGORIZED_SECTION: &str = "Uncategorized";

/// Options for [`generate_all_localization_files`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenerateAllOptions {
    pub output: OutputOptions,
    /// Format to write. Inferred from the output directory when unset.
    pub format: Option<FormatType>,
    /// Create one folder per language instead of filling existing ones.
    pub create_folders: bool,
    /// File name inside each language folder. Defaults to the format's.
    pub file_name: Option<String>,
}

impl GenerateAllOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output(mut self, output: OutputOptions) -> Self {
        self.output = output;
        self
    }

    pub fn with_format(mut self, format: Option<FormatType>) -> Self {
        self.format = format;
        self
    }

    pub fn with_create_folders(mut self, create_folders: bool) -> Self {
        self.create_folders = create_folders;
        self
    }

    pub fn with_file_name(mut self, file_name: Option<String>) -> Self {
        self.file_name = file_name;
        self
    }
}

/// Options for the consume operations.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConsumeOptions {
    /// Language of the consumed file. Inferred from its path when unset.
    pub language: Option<String>,
    /// Add keys missing from the master file instead of skipping them.
    pub consume_all: bool,
    /// Copy comments found in the consumed file onto definitions.
    pub consume_comments: bool,
    /// Tags given to definitions added by `consume_all`.
    pub tags: Vec<String>,
    pub developer_language: Option<String>,
}

impl ConsumeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_language(mut self, language: Option<String>) -> Self {
        self.language = language;
        self
    }

    pub fn with_consume_all(mut self, consume_all: bool) -> Self {
        self.consume_all = consume_all;
        self
    }

    pub fn with_consume_comments(mut self, consume_comments: bool) -> Self {
        self.consume_comments = consume_comments;
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_developer_language(mut self, developer_language: Option<String>) -> Self {
        self.developer_language = developer_language;
        self
    }
}

/// Counters for one consumed file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConsumeSummary {
    pub language: String,
    /// Existing definitions whose translation was set.
    pub updated: usize,
    /// Definitions created because of `consume_all`.
    pub added: usize,
    /// Values equal to the referenced definition's, left unset.
    pub inherited: usize,
    /// Keys missing from the master file and skipped.
    pub unknown: usize,
}

/// Outcome of [`consume_all_localization_files`].
#[derive(Debug, Default)]
pub struct ConsumeReport {
    pub consumed: Vec<(PathBuf, ConsumeSummary)>,
    pub failed: Vec<(PathBuf, Error)>,
}

enum Applied {
    Updated,
    Added,
    Inherited,
    Unknown,
}

fn formatter_for(
    format: Option<FormatType>,
    path: &Path,
) -> Result<&'static dyn Formatter, Error> {
    format
        .or_else(|| FormatType::from_path(path))
        .map(FormatType::formatter)
        .ok_or_else(|| Error::UnknownFormat(path.display().to_string()))
}

fn write_output(path: &Path, content: &str) -> Result<(), Error> {
    fs::write(path, content)?;
    Ok(())
}

/// Writes the projection of `file` for one language to `output_path`.
///
/// The language comes from `options.language` or, failing that, from the
/// output path. A projection without any definition is an error here.
pub fn generate_localization_file<P: AsRef<Path>>(
    file: &TwineFile,
    output_path: P,
    format: Option<FormatType>,
    options: &OutputOptions,
) -> Result<(), Error> {
    let output_path = output_path.as_ref();
    let formatter = formatter_for(format, output_path)?;
    let lang = options
        .language
        .clone()
        .or_else(|| formatter.determine_language_given_path(output_path, file))
        .ok_or_else(|| Error::UnknownLanguage(output_path.display().to_string()))?;

    let projected = project(file, &lang, options);
    let content = formatter
        .format_file(&projected, &lang)?
        .ok_or_else(|| Error::NothingToGenerate(output_path.display().to_string()))?;

    write_output(output_path, &content)?;
    info!(
        format = formatter.name(),
        lang = %lang,
        "wrote {}",
        output_path.display()
    );
    Ok(())
}

/// Writes one file per language below `output_dir` and returns the paths
/// written. Languages whose projection is empty are skipped.
pub fn generate_all_localization_files<P: AsRef<Path>>(
    file: &TwineFile,
    output_dir: P,
    options: &GenerateAllOptions,
) -> Result<Vec<PathBuf>, Error> {
    let output_dir = output_dir.as_ref();
    if options.create_folders {
        fs::create_dir_all(output_dir)?;
    } else if !output_dir.is_dir() {
        return Err(Error::Path(format!(
            "{} is not a directory",
            output_dir.display()
        )));
    }

    let formatter = options
        .format
        .or_else(|| FormatType::from_directory(output_dir))
        .map(FormatType::formatter)
        .ok_or_else(|| Error::UnknownFormat(output_dir.display().to_string()))?;
    let file_name = options
        .file_name
        .as_deref()
        .unwrap_or(formatter.default_file_name());

    let targets: Vec<(String, PathBuf)> = if options.create_folders {
        file.language_codes
            .iter()
            .map(|lang| {
                let folder = output_dir.join(formatter.output_path_for_language(lang, file));
                (lang.clone(), folder)
            })
            .collect()
    } else {
        let mut folders: Vec<PathBuf> = fs::read_dir(output_dir)?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .collect();
        folders.sort();

        let targets: Vec<(String, PathBuf)> = folders
            .into_iter()
            .filter_map(|folder| {
                match formatter.determine_language_given_path(&folder, file) {
                    Some(lang) => Some((lang, folder)),
                    None => {
                        debug!("skipping {}, no language detected", folder.display());
                        None
                    }
                }
            })
            .collect();
        if targets.is_empty() {
            return Err(Error::NothingToGenerate(format!(
                "no language folders found in {}",
                output_dir.display()
            )));
        }
        targets
    };

    let mut written = Vec::new();
    for (lang, folder) in targets {
        let mut output = options.output.clone();
        output.language = Some(lang.clone());
        let projected = project(file, &lang, &output);

        let Some(content) = formatter.format_file(&projected, &lang)? else {
            info!("skipping {}, no definitions for '{}'", folder.display(), lang);
            continue;
        };

        fs::create_dir_all(&folder)?;
        let path = folder.join(file_name);
        write_output(&path, &content)?;
        debug!(lang = %lang, "wrote {}", path.display());
        written.push(path);
    }

    info!(
        format = formatter.name(),
        files = written.len(),
        "generated localization files in {}",
        output_dir.display()
    );
    Ok(written)
}

/// Merges the values of one platform file into `file`.
pub fn consume_localization_file<P: AsRef<Path>>(
    file: &mut TwineFile,
    input_path: P,
    format: Option<FormatType>,
    options: &ConsumeOptions,
) -> Result<ConsumeSummary, Error> {
    let input_path = input_path.as_ref();
    let formatter = formatter_for(format, input_path)?;
    let lang = options
        .language
        .clone()
        .or_else(|| formatter.determine_language_given_path(input_path, file))
        .ok_or_else(|| Error::UnknownLanguage(input_path.display().to_string()))?;

    let content = encoding::read_to_string(input_path)?;
    let entries = formatter.parse(&content)?;

    if let Some(developer_language) = &options.developer_language {
        file.set_developer_language(developer_language);
    }
    file.add_language_code(&lang);

    let mut summary = ConsumeSummary {
        language: lang.clone(),
        ..Default::default()
    };
    for entry in entries {
        match set_translation_for_key(file, &entry.key, &lang, &entry.value, options) {
            Applied::Updated => summary.updated += 1,
            Applied::Added => summary.added += 1,
            Applied::Inherited => summary.inherited += 1,
            Applied::Unknown => summary.unknown += 1,
        }
        if options.consume_comments {
            if let Some(comment) = entry.comment {
                set_comment_for_key(file, &entry.key, comment);
            }
        }
    }
    file.reindex();

    info!(
        lang = %lang,
        updated = summary.updated,
        added = summary.added,
        unknown = summary.unknown,
        "consumed {}",
        input_path.display()
    );
    Ok(summary)
}

/// Consumes every file below `input_dir` that has a known extension.
///
/// A file that cannot be consumed is logged and recorded in the report;
/// it does not stop the walk. Only a missing directory is an error.
pub fn consume_all_localization_files<P: AsRef<Path>>(
    file: &mut TwineFile,
    input_dir: P,
    options: &ConsumeOptions,
) -> Result<ConsumeReport, Error> {
    let input_dir = input_dir.as_ref();
    if !input_dir.is_dir() {
        return Err(Error::Path(format!(
            "{} is not a directory",
            input_dir.display()
        )));
    }

    let walker = WalkBuilder::new(input_dir)
        .standard_filters(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    let mut report = ConsumeReport::default();
    for dent in walker {
        let dent = match dent {
            Ok(d) => d,
            Err(e) => {
                warn!("skipping unreadable entry: {}", e);
                continue;
            }
        };
        if !dent.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let path = dent.path();
        let Some(format) = FormatType::from_path(path) else {
            continue;
        };

        // The language differs per file, so only the explicit override is kept.
        match consume_localization_file(file, path, Some(format), options) {
            Ok(summary) => report.consumed.push((path.to_path_buf(), summary)),
            Err(e) => {
                warn!("failed to consume {}: {}", path.display(), e);
                report.failed.push((path.to_path_buf(), e));
            }
        }
    }

    Ok(report)
}

// Platform files cannot hold raw newlines in a master-file value.
fn escape_newlines(value: &str) -> String {
    value.replace('\n', "\\n")
}

fn set_translation_for_key(
    file: &mut TwineFile,
    key: &str,
    lang: &str,
    value: &str,
    options: &ConsumeOptions,
) -> Applied {
    let value = escape_newlines(value);

    if let Some(id) = file.id_of(key) {
        let inherited = file
            .get(id)
            .and_then(|d| d.reference_key.as_deref())
            .and_then(|reference_key| file.definition(reference_key))
            .and_then(|reference| reference.translations.get(lang))
            .is_some_and(|reference_value| *reference_value == value);
        if inherited {
            return Applied::Inherited;
        }
        if let Some(definition) = file.get_mut(id) {
            definition.translations.insert(lang.to_string(), value);
        }
        return Applied::Updated;
    }

    if !options.consume_all {
        warn!("'{}' not found in twine file", key);
        return Applied::Unknown;
    }

    info!("adding new definition '{}' to twine file", key);
    let section = match file
        .sections
        .iter()
        .position(|s| s.name == UNCATEGORIZED_SECTION)
    {
        Some(index) => index,
        None => {
            file.insert_section(0, Section::new(UNCATEGORIZED_SECTION));
            0
        }
    };

    let mut definition = Definition::new(key);
    if !options.tags.is_empty() {
        definition.tags = Some(options.tags.clone());
    }
    definition
        .translations
        .insert(lang.to_string(), value);
    file.push_definition_into(section, definition);
    Applied::Added
}

fn set_comment_for_key(file: &mut TwineFile, key: &str, comment: String) {
    let Some(id) = file.id_of(key) else {
        return;
    };
    let inherited = file
        .get(id)
        .and_then(|d| d.reference_key.as_deref())
        .and_then(|reference_key| file.definition(reference_key))
        .is_some_and(|reference| reference.comment.as_deref() == Some(comment.as_str()));
    if inherited {
        return;
    }
    if let Some(definition) = file.get_mut(id) {
        definition.comment = Some(comment);
    }
}
