use assert_cmd::Command;
use indoc::indoc;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const MASTER: &str = indoc! {"
    [[General]]
    \t[greeting]
    \t\ten = Hi %@
    \t\ttags = app
    \t[farewell]
    \t\tref = greeting
    \t\tfr = Au revoir
    [[Web]]
    \t[cookie_notice]
    \t\ten = We use cookies
    \t\ttags = web
"};

fn twine_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("twine"))
}

fn write_master(dir: &Path) -> String {
    let path = dir.join("strings.txt");
    fs::write(&path, MASTER).unwrap();
    path.to_string_lossy().to_string()
}

#[test]
fn test_generate_localization_file_for_android() {
    let dir = TempDir::new().unwrap();
    let master = write_master(dir.path());
    let output = dir.path().join("values-fr").join("strings.xml");

    twine_cmd()
        .args([
            "generate-localization-file",
            &master,
            output.to_str().unwrap(),
            "--tags",
            "app",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote"));

    let written = fs::read_to_string(&output).unwrap();
    assert!(written.contains("<string name=\"greeting\">Hi %s</string>"));
    assert!(written.contains("<string name=\"farewell\">Au revoir</string>"));
    assert!(!written.contains("cookie_notice"));
}

#[test]
fn test_generate_localization_file_with_explicit_format_and_lang() {
    let dir = TempDir::new().unwrap();
    let master = write_master(dir.path());
    let output = dir.path().join("out.txt");

    twine_cmd()
        .args([
            "generate-localization-file",
            &master,
            output.to_str().unwrap(),
            "-f",
            "flash",
            "-l",
            "fr",
            "--include",
            "translated",
        ])
        .assert()
        .success();

    let written = fs::read_to_string(&output).unwrap();
    assert!(written.contains("farewell=Au revoir"));
    assert!(!written.contains("greeting="));
}

#[test]
fn test_generate_localization_file_fails_when_nothing_matches() {
    let dir = TempDir::new().unwrap();
    let master = write_master(dir.path());
    let output = dir.path().join("fr.json");

    twine_cmd()
        .args([
            "generate-localization-file",
            &master,
            output.to_str().unwrap(),
            "-t",
            "missing",
        ])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("nothing to generate"));
    assert!(!output.exists());
}

#[test]
fn test_generate_localization_file_unknown_format() {
    let dir = TempDir::new().unwrap();
    let master = write_master(dir.path());

    twine_cmd()
        .args([
            "generate-localization-file",
            &master,
            dir.path().join("fr.po").to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format"));
}

#[test]
fn test_generate_all_localization_files_create_folders() {
    let dir = TempDir::new().unwrap();
    let master = write_master(dir.path());
    let out = dir.path().join("Resources");

    twine_cmd()
        .args([
            "generate-all-localization-files",
            &master,
            out.to_str().unwrap(),
            "--format",
            "apple",
            "--create-folders",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 2 file(s)"));

    let en = fs::read_to_string(out.join("en.lproj/Localizable.strings")).unwrap();
    assert!(en.contains("\"cookie_notice\" = \"We use cookies\";"));
    let fr = fs::read_to_string(out.join("fr.lproj/Localizable.strings")).unwrap();
    assert!(fr.contains("\"farewell\" = \"Au revoir\";"));
}

#[test]
fn test_generate_all_requires_existing_directory() {
    let dir = TempDir::new().unwrap();
    let master = write_master(dir.path());

    twine_cmd()
        .args([
            "generate-all-localization-files",
            &master,
            dir.path().join("missing").to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Directory does not exist"));
}

#[test]
fn test_consume_localization_file_writes_output_path() {
    let dir = TempDir::new().unwrap();
    let master = write_master(dir.path());
    let input = dir.path().join("de.json");
    fs::write(&input, r#"{"greeting": "Hallo %@", "brand_new": "Neu"}"#).unwrap();
    let output = dir.path().join("updated.txt");

    twine_cmd()
        .args([
            "consume-localization-file",
            &master,
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "-a",
            "-t",
            "imported",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 updated, 1 added"));

    let updated = fs::read_to_string(&output).unwrap();
    assert!(updated.starts_with("[[Uncategorized]]\n\t[brand_new]\n"));
    assert!(updated.contains("\t\tde = Neu\n"));
    assert!(updated.contains("\t\ttags = imported\n"));
    assert!(updated.contains("\t\tde = Hallo %@\n"));
    // The master file itself is left alone when -o is given.
    assert_eq!(fs::read_to_string(&master).unwrap(), MASTER);
}

#[test]
fn test_consume_localization_file_overwrites_master_by_default() {
    let dir = TempDir::new().unwrap();
    let master = write_master(dir.path());
    let input = dir.path().join("fr.properties");
    fs::write(&input, "# Salutation\ngreeting=Salut {0}\n").unwrap();

    twine_cmd()
        .args([
            "consume-localization-file",
            &master,
            input.to_str().unwrap(),
            "--consume-comments",
        ])
        .assert()
        .success();

    let updated = fs::read_to_string(&master).unwrap();
    assert!(updated.contains("\t\tcomment = Salutation\n"));
    assert!(updated.contains("\t\tfr = Salut %@\n"));
}

#[test]
fn test_consume_all_localization_files_reports_failures() {
    let dir = TempDir::new().unwrap();
    let master = write_master(dir.path());
    let input = dir.path().join("res");
    fs::create_dir_all(input.join("values-de")).unwrap();
    fs::write(
        input.join("values-de/strings.xml"),
        "<resources><string name=\"greeting\">Hallo %s</string></resources>",
    )
    .unwrap();
    fs::create_dir_all(input.join("values-es")).unwrap();
    fs::write(input.join("values-es/strings.xml"), "<resources><string>").unwrap();

    twine_cmd()
        .args([
            "consume-all-localization-files",
            &master,
            input.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Consumed 1 file(s), 1 failed"))
        .stderr(predicate::str::contains("Skipped"));

    let updated = fs::read_to_string(&master).unwrap();
    assert!(updated.contains("\t\tde = Hallo %@\n"));
}

#[test]
fn test_validate_twine_file() {
    let dir = TempDir::new().unwrap();
    let master = write_master(dir.path());

    twine_cmd()
        .args(["validate-twine-file", &master])
        .assert()
        .success()
        .stdout(predicate::str::contains("is valid"));

    // `farewell` inherits its tag, so pedantic mode passes as well.
    twine_cmd()
        .args(["validate-twine-file", &master, "--pedantic"])
        .assert()
        .success();
}

#[test]
fn test_validate_twine_file_reports_every_problem() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("strings.txt");
    fs::write(&path, "[[S]]\n[a]\n en = 1\n[a]\n en = 2\n[b c]\n en = 3\n").unwrap();

    twine_cmd()
        .args(["validate-twine-file", path.to_str().unwrap()])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Found duplicate key(s)"))
        .stderr(predicate::str::contains("Found key(s) with invalid characters"));
}

#[test]
fn test_malformed_master_file_reports_line() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("strings.txt");
    fs::write(&path, "[[S]]\n[a]\n en = 1\nthis is not valid\n").unwrap();

    twine_cmd()
        .args(["validate-twine-file", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 4"));
}

#[test]
fn test_developer_language_flag_restores_base_folder() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("strings.txt");
    fs::write(
        &path,
        "[[S]]\n\t[only_fr]\n\t\tfr = Bonjour\n\t[both]\n\t\ten = Bye\n\t\tfr = Salut\n",
    )
    .unwrap();
    let out = dir.path().join("res");

    twine_cmd()
        .args([
            "generate-all-localization-files",
            path.to_str().unwrap(),
            out.to_str().unwrap(),
            "-f",
            "android",
            "--create-folders",
            "--developer-language",
            "en",
        ])
        .assert()
        .success();

    let base = fs::read_to_string(out.join("values/strings.xml")).unwrap();
    assert!(base.contains("<string name=\"both\">Bye</string>"));
    assert!(!base.contains("only_fr"));
    let fr = fs::read_to_string(out.join("values-fr/strings.xml")).unwrap();
    assert!(fr.contains("<string name=\"only_fr\">Bonjour</string>"));
}
