use twine::{GenerateAllOptions, generate_all_localization_files, generate_localization_file};

use crate::{
    options::{FilterArgs, parse_format},
    read_twine_file,
    validation::{validate_directory_path, validate_file_path, validate_output_path},
};

/// Run `generate-localization-file`: write one language to one file.
pub fn run_generate_localization_file(
    twine_file: &str,
    output_path: &str,
    format: Option<&str>,
    filter: &FilterArgs,
) -> Result<(), String> {
    validate_file_path(twine_file)?;
    validate_output_path(output_path)?;
    let format = parse_format(format)?;
    let options = filter.to_output_options()?;

    let file = read_twine_file(twine_file, filter.developer_language.as_deref())?;
    generate_localization_file(&file, output_path, format, &options)
        .map_err(|e| format!("Error generating {}: {}", output_path, e))?;

    println!("✅ Wrote {}", output_path);
    Ok(())
}

/// Run `generate-all-localization-files`: write every language below a
/// directory.
pub fn run_generate_all_localization_files(
    twine_file: &str,
    output_dir: &str,
    format: Option<&str>,
    create_folders: bool,
    file_name: Option<String>,
    filter: &FilterArgs,
) -> Result<(), String> {
    validate_file_path(twine_file)?;
    if !create_folders {
        validate_directory_path(output_dir)?;
    }
    let options = GenerateAllOptions::new()
        .with_output(filter.to_output_options()?)
        .with_format(parse_format(format)?)
        .with_create_folders(create_folders)
        .with_file_name(file_name);

    let file = read_twine_file(twine_file, filter.developer_language.as_deref())?;
    let written = generate_all_localization_files(&file, output_dir, &options)
        .map_err(|e| format!("Error generating files in {}: {}", output_dir, e))?;

    for path in &written {
        println!("  {}", path.display());
    }
    println!("✅ Wrote {} file(s) to {}", written.len(), output_dir);
    Ok(())
}
