use clone_spotter::duplicates::{DuplicateFinder, FinderConfig};
use clone_spotter::error::ExitCode;
use clone_spotter::scanner::ScanWarning;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn test_missing_paths_become_hash_warnings() {
    let finder = DuplicateFinder::with_defaults();
    let report = finder.find_duplicates_in(vec![
        PathBuf::from("nonexistent_1.txt"),
        PathBuf::from("nonexistent_2.txt"),
    ]);

    assert!(report.pairs.is_empty());
    assert_eq!(report.hash_warning_count(), 2);
    assert_eq!(report.files_hashed, 0);
    for warning in &report.warnings {
        assert!(matches!(warning, ScanWarning::Hash { .. }));
        assert!(warning.message().contains("not found"));
    }
    assert_eq!(ExitCode::for_report(&report), ExitCode::PartialSuccess);
}

#[test]
fn test_failures_do_not_hide_other_duplicates() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.txt");
    let b = dir.path().join("b.txt");
    fs::write(&a, "hello").unwrap();
    fs::write(&b, "hello").unwrap();

    let report = DuplicateFinder::new(FinderConfig::default().with_workers(2)).find_duplicates_in(
        vec![a, dir.path().join("gone.txt"), b],
    );

    assert_eq!(report.pairs.len(), 1);
    assert_eq!(report.warning_count(), 1);
    assert_eq!(report.files_collected, 3);
    assert_eq!(report.files_hashed, 2);
}

#[cfg(unix)]
#[test]
fn test_directory_queued_as_file_becomes_hash_warning() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.txt");
    let b = dir.path().join("b.txt");
    let nested = dir.path().join("nested");
    fs::write(&a, "hello").unwrap();
    fs::write(&b, "hello").unwrap();
    fs::create_dir(&nested).unwrap();

    let report = DuplicateFinder::new(FinderConfig::default().with_workers(1))
        .find_duplicates_in(vec![a, nested.clone(), b]);

    assert_eq!(report.pairs.len(), 1);
    assert_eq!(report.hash_warning_count(), 1);
    assert_eq!(report.warnings[0].path(), nested.as_path());
    assert_eq!(ExitCode::for_report(&report), ExitCode::PartialSuccess);
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_is_skipped_with_warning() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "hello").unwrap();
    fs::write(dir.path().join("b.txt"), "hello").unwrap();
    let locked = dir.path().join("locked.txt");
    fs::write(&locked, "hello").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    if fs::read(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();
        eprintln!("skipping: file with mode 000 is still readable (privileged user)");
        return;
    }

    let report = DuplicateFinder::new(FinderConfig::default().with_workers(1))
        .find_duplicates(dir.path())
        .unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();

    assert_eq!(report.pairs.len(), 1);
    assert_eq!(report.hash_warning_count(), 1);
    assert_eq!(report.warnings[0].path(), locked.as_path());
    assert!(report
        .pairs
        .iter()
        .all(|p| p.original != locked && p.duplicate != locked));
    assert!(!report.interrupted);
}

#[cfg(unix)]
#[test]
fn test_unreadable_directory_is_skipped_with_warning() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "same").unwrap();
    fs::write(dir.path().join("b.txt"), "same").unwrap();
    let locked = dir.path().join("locked");
    fs::create_dir(&locked).unwrap();
    fs::write(locked.join("c.txt"), "same").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        eprintln!("skipping: directory with mode 000 is still listable (privileged user)");
        return;
    }

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    assert_eq!(report.pairs.len(), 1);
    assert_eq!(report.traversal_warning_count(), 1);
    assert_eq!(report.hash_warning_count(), 0);
}
