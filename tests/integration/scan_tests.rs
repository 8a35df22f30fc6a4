use clone_spotter::duplicates::{DuplicateFinder, DuplicatePair, FinderConfig, ScanPhase};
use clone_spotter::scanner::{HashAlgorithm, ScanError};
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn write(path: &Path, content: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    File::create(path).unwrap().write_all(content).unwrap();
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    let finder = DuplicateFinder::with_defaults();

    let report = finder.find_duplicates(dir.path()).unwrap();

    assert!(report.pairs.is_empty());
    assert!(report.groups.is_empty());
    assert_eq!(report.files_collected, 0);
    assert_eq!(report.statistics.total_duplicate_files, 0);
}

#[test]
fn test_scan_unique_files() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a.txt"), b"content a");
    write(&dir.path().join("b.txt"), b"content b");
    write(&dir.path().join("c.txt"), b"content c");

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert!(report.pairs.is_empty());
    assert_eq!(report.files_collected, 3);
    assert_eq!(report.files_hashed, 3);
}

#[test]
fn test_hello_world_single_pair() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a.txt"), b"hello");
    write(&dir.path().join("b.txt"), b"hello");
    write(&dir.path().join("c.txt"), b"world");

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(report.pairs.len(), 1);
    let pair = &report.pairs[0];
    let members: HashSet<PathBuf> = [pair.original.clone(), pair.duplicate.clone()].into();
    assert_eq!(
        members,
        [dir.path().join("a.txt"), dir.path().join("b.txt")].into()
    );

    let c = dir.path().join("c.txt");
    assert!(report
        .pairs
        .iter()
        .all(|p| p.original != c && p.duplicate != c));
}

#[test]
fn test_identical_set_has_one_original() {
    let dir = tempdir().unwrap();
    for i in 0..6 {
        write(&dir.path().join(format!("sub{i}/copy.bin")), b"same bytes");
    }
    write(&dir.path().join("other.bin"), b"different");

    let report = DuplicateFinder::new(FinderConfig::default().with_workers(4))
        .find_duplicates(dir.path())
        .unwrap();

    let originals: HashSet<_> = report.pairs.iter().map(|p| p.original.clone()).collect();
    assert_eq!(originals.len(), 1);
    assert_eq!(report.pairs.len(), 5);

    let original = originals.into_iter().next().unwrap();
    assert!(report.pairs.iter().all(|p| p.duplicate != original));
    assert_eq!(report.statistics.unique_originals, 1);
    assert_eq!(report.statistics.total_duplicate_files, 6);
}

#[test]
fn test_single_worker_is_deterministic() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("z/one.txt"), b"alpha");
    write(&dir.path().join("a/one.txt"), b"alpha");
    write(&dir.path().join("m/two.txt"), b"beta");
    write(&dir.path().join("b/two.txt"), b"beta");
    write(&dir.path().join("c/two.txt"), b"beta");

    let finder = DuplicateFinder::new(FinderConfig::default().with_workers(1));
    let first = finder.find_duplicates(dir.path()).unwrap();
    let second = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(first.pairs, second.pairs);
    assert_eq!(first.groups, second.groups);
    // Traversal order is a, b, c, m, z; pairs are recorded as duplicates arrive.
    assert_eq!(
        first.pairs,
        vec![
            DuplicatePair::new(dir.path().join("b/two.txt"), dir.path().join("c/two.txt")),
            DuplicatePair::new(dir.path().join("b/two.txt"), dir.path().join("m/two.txt")),
            DuplicatePair::new(dir.path().join("a/one.txt"), dir.path().join("z/one.txt")),
        ]
    );
}

#[test]
fn test_statistics_identity_holds() {
    let dir = tempdir().unwrap();
    for (name, body) in [
        ("a", "x"),
        ("b", "x"),
        ("c", "x"),
        ("d", "y"),
        ("e", "y"),
        ("f", "z"),
    ] {
        write(&dir.path().join(name), body.as_bytes());
    }

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();
    let stats = report.statistics;

    assert_eq!(stats.total_duplicates, 3);
    assert_eq!(stats.unique_originals, 2);
    assert_eq!(
        stats.total_duplicate_files,
        stats.total_duplicates + stats.unique_originals
    );
}

#[test]
fn test_empty_files_are_duplicates_of_each_other() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("empty1"), b"");
    write(&dir.path().join("empty2"), b"");

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();
    assert_eq!(report.pairs.len(), 1);
}

#[test]
fn test_every_algorithm_finds_same_sets() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a"), b"one");
    write(&dir.path().join("b"), b"one");
    write(&dir.path().join("c"), b"two");

    for algorithm in HashAlgorithm::ALL {
        let report = DuplicateFinder::new(FinderConfig::default().with_algorithm(algorithm))
            .find_duplicates(dir.path())
            .unwrap();
        assert_eq!(report.pairs.len(), 1, "algorithm {algorithm}");
    }
}

#[test]
fn test_nonexistent_root_is_fatal() {
    let dir = tempdir().unwrap();
    let finder = DuplicateFinder::with_defaults();

    let err = finder
        .find_duplicates(&dir.path().join("does-not-exist"))
        .unwrap_err();
    assert!(matches!(err, ScanError::NotFound(_)));
    assert_eq!(finder.phase(), ScanPhase::Failed);
}

#[test]
fn test_file_root_is_fatal() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("file.txt");
    write(&file, b"x");

    let err = DuplicateFinder::with_defaults()
        .find_duplicates(&file)
        .unwrap_err();
    assert!(matches!(err, ScanError::NotADirectory(_)));
}

#[test]
fn test_nested_duplicates_across_directories() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("photos/2023/img.jpg"), b"jpeg data");
    write(&dir.path().join("backup/photos/img.jpg"), b"jpeg data");
    write(&dir.path().join("docs/readme.md"), b"# readme");

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(report.groups.len(), 1);
    let group = report.groups.iter().next().unwrap();
    assert_eq!(group.file_count(), 2);
}
