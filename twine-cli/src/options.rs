//! Flags shared by several subcommands and their conversion into library
//! options.

use clap::Args;
use twine::{ConsumeOptions, FormatType, IncludeMode, OutputOptions, TagQuery};

use crate::validation::validate_language_code;

/// Selection of definitions for generate commands.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Only include definitions matching these tags. Each occurrence is one
    /// comma-separated OR group; all groups must match. Prefix a tag with
    /// `~` to exclude it.
    #[arg(short, long = "tags", value_name = "TAGS")]
    pub tags: Vec<String>,

    /// Also include definitions without any tag when filtering by tags
    #[arg(long)]
    pub untagged: bool,

    /// Which definitions to include: all, translated or untranslated
    #[arg(long, value_name = "MODE", default_value = "all")]
    pub include: String,

    /// Language to generate. Inferred from the output path when omitted
    #[arg(short, long)]
    pub lang: Option<String>,

    /// Language used as the last fallback instead of the file's first one
    #[arg(long)]
    pub developer_language: Option<String>,
}

impl FilterArgs {
    pub fn to_output_options(&self) -> Result<OutputOptions, String> {
        if let Some(lang) = &self.lang {
            validate_language_code(lang)?;
        }
        if let Some(lang) = &self.developer_language {
            validate_language_code(lang)?;
        }
        let include = self
            .include
            .parse::<IncludeMode>()
            .map_err(|e| e.to_string())?;

        Ok(OutputOptions::new()
            .with_language(self.lang.clone())
            .with_tags(TagQuery::from_args(self.tags.as_slice()))
            .with_untagged(self.untagged)
            .with_include(include)
            .with_developer_language(self.developer_language.clone()))
    }
}

/// Flags for consume commands.
#[derive(Args, Debug, Clone, Default)]
pub struct ConsumeArgs {
    /// Where to write the updated master file. Defaults to overwriting it
    #[arg(short, long)]
    pub output_path: Option<String>,

    /// Add keys missing from the master file to an "Uncategorized" section
    #[arg(short = 'a', long)]
    pub consume_all: bool,

    /// Copy comments from the consumed files onto definitions
    #[arg(short = 'c', long)]
    pub consume_comments: bool,

    /// Tags given to definitions added by --consume-all (comma-separated)
    #[arg(short, long = "tags", value_name = "TAGS")]
    pub tags: Vec<String>,

    /// Language of the consumed file. Inferred from its path when omitted
    #[arg(short, long)]
    pub lang: Option<String>,

    #[arg(long)]
    pub developer_language: Option<String>,
}

impl ConsumeArgs {
    pub fn to_consume_options(&self) -> Result<ConsumeOptions, String> {
        if let Some(lang) = &self.lang {
            validate_language_code(lang)?;
        }
        if let Some(lang) = &self.developer_language {
            validate_language_code(lang)?;
        }
        let tags = self
            .tags
            .iter()
            .flat_map(|arg| arg.split(','))
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect();

        Ok(ConsumeOptions::new()
            .with_language(self.lang.clone())
            .with_consume_all(self.consume_all)
            .with_consume_comments(self.consume_comments)
            .with_tags(tags)
            .with_developer_language(self.developer_language.clone()))
    }
}

/// Parses an optional `--format` value.
pub fn parse_format(format: Option<&str>) -> Result<Option<FormatType>, String> {
    format
        .map(|f| {
            f.parse::<FormatType>().map_err(|_| {
                format!(
                    "Unsupported format: {}. Supported formats: android, apple, flash, jquery",
                    f
                )
            })
        })
        .transpose()
}
