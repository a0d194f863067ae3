#![forbid(unsafe_code)]
//! Localization master-file toolkit for Rust.
//!
//! Every translatable string of a product lives in one plain-text master
//! file. This crate reads and writes that file, projects it onto a single
//! language (with tag filtering and fallback), converts printf-style
//! placeholders between platform conventions, and generates or consumes
//! Android, Apple, Flash and jQuery resource files.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use twine::{OutputOptions, TwineFile, generate_localization_file, traits::Parser};
//!
//! let file = TwineFile::read_from("strings.txt")?;
//! generate_localization_file(&file, "res/values-fr/strings.xml", None, &OutputOptions::new())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Supported Formats
//!
//! - **Android `strings.xml`**: `%1$s`-style placeholders, Android escaping
//! - **Apple `.strings`**: `"key" = "value";` pairs in `xx.lproj` folders
//! - **Flash `.properties`**: `{0}`-style placeholders
//! - **jQuery `.json`**: flat JSON dictionaries

pub mod encoding;
pub mod error;
pub mod formats;
pub mod operations;
pub mod output;
pub mod placeholder;
pub mod references;
pub mod tags;
pub mod traits;
pub mod twine_file;
pub mod types;
pub mod validation;

// Re-export most used types for easy consumption
pub use crate::{
    encoding::{TextEncoding, detect_encoding},
    error::Error,
    formats::{FormatType, Formatter, ParsedEntry},
    operations::{
        ConsumeOptions, ConsumeReport, ConsumeSummary, GenerateAllOptions,
        consume_all_localization_files, consume_localization_file,
        generate_all_localization_files, generate_localization_file,
    },
    output::{IncludeMode, OutputOptions, project},
    tags::TagQuery,
    types::{Definition, DefinitionId, Section, TwineFile},
    validation::validate,
};
