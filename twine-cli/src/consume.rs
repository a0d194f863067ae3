use twine::{
    TwineFile, consume_all_localization_files, consume_localization_file, traits::Parser,
};

use crate::{
    options::{ConsumeArgs, parse_format},
    read_twine_file,
    validation::{validate_directory_path, validate_file_path, validate_output_path},
};

fn write_master(file: &TwineFile, twine_file: &str, args: &ConsumeArgs) -> Result<String, String> {
    let output = args.output_path.as_deref().unwrap_or(twine_file);
    validate_output_path(output)?;
    file.write_to(output)
        .map_err(|e| format!("Error writing {}: {}", output, e))?;
    Ok(output.to_string())
}

/// Run `consume-localization-file`: merge one platform file into the
/// master file.
pub fn run_consume_localization_file(
    twine_file: &str,
    input_path: &str,
    format: Option<&str>,
    args: &ConsumeArgs,
) -> Result<(), String> {
    validate_file_path(twine_file)?;
    validate_file_path(input_path)?;
    let format = parse_format(format)?;
    let options = args.to_consume_options()?;

    let mut file = read_twine_file(twine_file, args.developer_language.as_deref())?;
    let summary = consume_localization_file(&mut file, input_path, format, &options)
        .map_err(|e| format!("Error consuming {}: {}", input_path, e))?;
    let output = write_master(&file, twine_file, args)?;

    println!(
        "✅ Consumed {} ({}): {} updated, {} added, {} unknown. Wrote {}",
        input_path, summary.language, summary.updated, summary.added, summary.unknown, output
    );
    Ok(())
}

/// Run `consume-all-localization-files`: merge every recognized file below
/// a directory. Files that fail are reported but do not stop the run.
pub fn run_consume_all_localization_files(
    twine_file: &str,
    input_dir: &str,
    args: &ConsumeArgs,
) -> Result<(), String> {
    validate_file_path(twine_file)?;
    validate_directory_path(input_dir)?;
    let options = args.to_consume_options()?;

    let mut file = read_twine_file(twine_file, args.developer_language.as_deref())?;
    let report = consume_all_localization_files(&mut file, input_dir, &options)
        .map_err(|e| format!("Error consuming {}: {}", input_dir, e))?;
    let output = write_master(&file, twine_file, args)?;

    for (path, summary) in &report.consumed {
        println!("  {} ({})", path.display(), summary.language);
    }
    for (path, error) in &report.failed {
        eprintln!("⚠️  Skipped {}: {}", path.display(), error);
    }
    println!(
        "✅ Consumed {} file(s), {} failed. Wrote {}",
        report.consumed.len(),
        report.failed.len(),
        output
    );
    Ok(())
}
