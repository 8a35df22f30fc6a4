use clap::Parser;
use clone_spotter::cli::Cli;
use clone_spotter::error::ExitCode;
use clone_spotter::run_app;
use clone_spotter::scanner::ScanError;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn run(args: &[&str]) -> anyhow::Result<ExitCode> {
    let mut argv = vec!["clone-spotter", "--quiet", "--no-color"];
    argv.extend_from_slice(args);
    run_app(Cli::try_parse_from(argv).unwrap())
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_scan_writes_groups_file() {
    let root = tempdir().unwrap();
    let out = tempdir().unwrap();
    fs::write(root.path().join("a.txt"), "hello").unwrap();
    fs::write(root.path().join("b.txt"), "hello").unwrap();
    fs::write(root.path().join("c.txt"), "world").unwrap();

    let code = run(&[
        path_str(root.path()),
        "-o",
        path_str(out.path()),
        "-f",
        "result",
        "-w",
        "1",
    ])
    .unwrap();
    assert_eq!(code, ExitCode::Success);

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.path().join("result.json")).unwrap())
            .unwrap();
    let map = written.as_object().unwrap();
    assert_eq!(map.len(), 1);

    let a = root.path().join("a.txt");
    let b = root.path().join("b.txt");
    assert_eq!(map[path_str(&a)], serde_json::json!([path_str(&b)]));
}

#[test]
fn test_with_stats_format() {
    let root = tempdir().unwrap();
    let out = tempdir().unwrap();
    fs::write(root.path().join("x"), "1").unwrap();
    fs::write(root.path().join("y"), "1").unwrap();

    run(&[
        "-d",
        path_str(root.path()),
        "-o",
        path_str(out.path()),
        "--with-stats",
    ])
    .unwrap();

    let written: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(out.path().join("duplicates.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(written["statistics"]["totalDuplicates"], 1);
    assert_eq!(written["statistics"]["totalDuplicateFiles"], 2);
    assert!(written["duplicateGroups"].is_object());
    assert!(written["warnings"].as_array().unwrap().is_empty());
}

#[test]
fn test_no_duplicates_exit_code_and_empty_map() {
    let root = tempdir().unwrap();
    let out = tempdir().unwrap();
    fs::write(root.path().join("only.txt"), "alone").unwrap();

    let code = run(&[path_str(root.path()), "-o", path_str(out.path())]).unwrap();
    assert_eq!(code, ExitCode::NoDuplicates);

    let content = fs::read_to_string(out.path().join("duplicates.json")).unwrap();
    assert_eq!(content.trim(), "{}");
}

#[test]
fn test_nonexistent_root_writes_nothing() {
    let root = tempdir().unwrap();
    let out = tempdir().unwrap();
    let missing = root.path().join("missing");
    let out_dir = out.path().join("reports");

    let err = run(&[path_str(&missing), "-o", path_str(&out_dir)]).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ScanError>(),
        Some(ScanError::NotFound(_))
    ));
    assert!(!out_dir.exists());
}

#[test]
fn test_output_directory_is_created() {
    let root = tempdir().unwrap();
    let out = tempdir().unwrap();
    fs::write(root.path().join("a"), "z").unwrap();
    let nested = out.path().join("deep").join("er");

    run(&[path_str(root.path()), "-o", path_str(&nested)]).unwrap();
    assert!(nested.join("duplicates.json").is_file());
}

#[test]
fn test_default_exclusions_apply_to_app() {
    let root = tempdir().unwrap();
    let out = tempdir().unwrap();
    fs::create_dir_all(root.path().join("node_modules")).unwrap();
    fs::write(root.path().join("node_modules/a.js"), "same").unwrap();
    fs::write(root.path().join("b.js"), "same").unwrap();

    let code = run(&[path_str(root.path()), "-o", path_str(out.path())]).unwrap();
    assert_eq!(code, ExitCode::NoDuplicates);

    let code = run(&[
        path_str(root.path()),
        "-o",
        path_str(out.path()),
        "--no-default-excludes",
    ])
    .unwrap();
    assert_eq!(code, ExitCode::Success);
}

#[test]
fn test_version_subcommand_succeeds_without_scanning() {
    assert_eq!(run(&["version"]).unwrap(), ExitCode::Success);
}
