use clone_spotter::duplicates::{DuplicateFinder, FinderConfig, ScanReport};
use clone_spotter::scanner::HashAlgorithm;
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

/// 40 content classes spread over nested directories, 200 files total.
fn populated_tree() -> TempDir {
    let dir = tempdir().unwrap();
    for i in 0..200 {
        let class = i % 40;
        let path = dir
            .path()
            .join(format!("d{}", i % 7))
            .join(format!("s{}", i % 3))
            .join(format!("f{i}.dat"));
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, format!("content class {class}").repeat(class + 1)).unwrap();
    }
    dir
}

/// Duplicate sets as sorted member lists, ignoring which member is the original.
fn member_sets(report: &ScanReport) -> BTreeSet<BTreeSet<PathBuf>> {
    let mut sets: HashMap<&Path, BTreeSet<PathBuf>> = HashMap::new();
    for pair in &report.pairs {
        let set = sets.entry(pair.original.as_path()).or_default();
        set.insert(pair.original.clone());
        set.insert(pair.duplicate.clone());
    }
    sets.into_values().collect()
}

fn scan(root: &Path, workers: usize) -> ScanReport {
    DuplicateFinder::new(
        FinderConfig::default()
            .with_workers(workers)
            .with_algorithm(HashAlgorithm::Sha256),
    )
    .find_duplicates(root)
    .unwrap()
}

#[test]
fn test_pair_sets_equal_across_worker_counts() {
    let dir = populated_tree();

    let one = scan(dir.path(), 1);
    let four = scan(dir.path(), 4);
    let sixteen = scan(dir.path(), 16);

    assert_eq!(one.pairs.len(), 160);
    assert_eq!(four.pairs.len(), 160);
    assert_eq!(sixteen.pairs.len(), 160);

    let expected = member_sets(&one);
    assert_eq!(expected.len(), 40);
    assert_eq!(member_sets(&four), expected);
    assert_eq!(member_sets(&sixteen), expected);
}

#[test]
fn test_every_file_processed_exactly_once() {
    let dir = populated_tree();

    for workers in [1, 3, 8, 32] {
        let report = scan(dir.path(), workers);
        assert_eq!(report.files_collected, 200);
        assert_eq!(report.files_hashed, 200);

        let mut seen = BTreeSet::new();
        for pair in &report.pairs {
            assert!(seen.insert(pair.duplicate.clone()), "duplicate reported twice");
        }
        let originals: BTreeSet<_> = report.pairs.iter().map(|p| p.original.clone()).collect();
        assert!(originals.is_disjoint(&seen));
    }
}

#[test]
fn test_more_workers_than_files() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), "same").unwrap();
    fs::write(dir.path().join("b"), "same").unwrap();

    let report = scan(dir.path(), 64);
    assert_eq!(report.pairs.len(), 1);
}
