use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use twine_cli::{
    ConsumeArgs, FilterArgs,
    consume::{run_consume_all_localization_files, run_consume_localization_file},
    generate::{run_generate_all_localization_files, run_generate_localization_file},
    validation::run_validate_twine_file,
};

#[derive(Parser, Debug)]
#[command(name = "twine", author, version, about, long_about = None)]
struct Args {
    /// Print debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    commands: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate one localization file for a single language.
    GenerateLocalizationFile {
        /// The master file to read
        twine_file: String,
        /// The file to write; its path may determine language and format
        output_path: String,
        /// Output format (android, apple, flash, jquery)
        #[arg(short, long)]
        format: Option<String>,
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Generate localization files for every language below a directory.
    GenerateAllLocalizationFiles {
        /// The master file to read
        twine_file: String,
        /// The directory holding the per-language folders
        output_dir: String,
        /// Output format (android, apple, flash, jquery)
        #[arg(short, long)]
        format: Option<String>,
        /// Create a folder for every language instead of filling existing ones
        #[arg(long)]
        create_folders: bool,
        /// File name inside each language folder
        #[arg(long)]
        file_name: Option<String>,
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Merge the values of one localization file into the master file.
    ConsumeLocalizationFile {
        /// The master file to update
        twine_file: String,
        /// The localization file to read
        input_path: String,
        /// Input format (android, apple, flash, jquery)
        #[arg(short, long)]
        format: Option<String>,
        #[command(flatten)]
        consume: ConsumeArgs,
    },

    /// Merge every localization file below a directory into the master file.
    ConsumeAllLocalizationFiles {
        /// The master file to update
        twine_file: String,
        /// The directory to search
        input_dir: String,
        #[command(flatten)]
        consume: ConsumeArgs,
    },

    /// Check the master file for duplicate and malformed keys.
    ValidateTwineFile {
        /// The master file to check
        twine_file: String,
        /// Also report untagged definitions and dangling references
        #[arg(long)]
        pedantic: bool,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .init();
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);
    debug!(?args, "parsed arguments");

    let result = match args.commands {
        Commands::GenerateLocalizationFile {
            twine_file,
            output_path,
            format,
            filter,
        } => run_generate_localization_file(&twine_file, &output_path, format.as_deref(), &filter),
        Commands::GenerateAllLocalizationFiles {
            twine_file,
            output_dir,
            format,
            create_folders,
            file_name,
            filter,
        } => run_generate_all_localization_files(
            &twine_file,
            &output_dir,
            format.as_deref(),
            create_folders,
            file_name,
            &filter,
        ),
        Commands::ConsumeLocalizationFile {
            twine_file,
            input_path,
            format,
            consume,
        } => run_consume_localization_file(&twine_file, &input_path, format.as_deref(), &consume),
        Commands::ConsumeAllLocalizationFiles {
            twine_file,
            input_dir,
            consume,
        } => run_consume_all_localization_files(&twine_file, &input_dir, &consume),
        Commands::ValidateTwineFile {
            twine_file,
            pedantic,
        } => run_validate_twine_file(&twine_file, pedantic),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
