use clone_spotter::config::Config;
use clone_spotter::duplicates::{DuplicateFinder, FinderConfig};
use clone_spotter::scanner::{Collector, PathFilter, DEFAULT_EXCLUDED_DIRS};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[test]
fn test_excluded_subdirectory_with_duplicates_never_reported() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("keep/a.txt"), "unique");
    write(&dir.path().join("node_modules/x/one.js"), "dup");
    write(&dir.path().join("node_modules/y/two.js"), "dup");

    let report = DuplicateFinder::new(FinderConfig::default().with_excluded(["node_modules"]))
        .find_duplicates(dir.path())
        .unwrap();

    assert!(report.pairs.is_empty());
    assert_eq!(report.files_collected, 1);
}

#[test]
fn test_excluded_copy_does_not_pair_with_included_original() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("src/lib.js"), "same");
    write(&dir.path().join("dist/lib.js"), "same");

    let report = DuplicateFinder::new(FinderConfig::default().with_excluded(["dist"]))
        .find_duplicates(dir.path())
        .unwrap();

    assert!(report.pairs.is_empty());
}

#[test]
fn test_substring_match_is_not_segment_match() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("my_build_notes/a.txt"), "same");
    write(&dir.path().join("other/a.txt"), "same");

    let collection = Collector::new(dir.path(), PathFilter::new(["build"]))
        .collect()
        .unwrap();

    assert_eq!(collection.files, vec![dir.path().join("other/a.txt")]);
}

#[test]
fn test_default_exclusions_through_config() {
    let dir = tempdir().unwrap();
    write(&dir.path().join(".git/objects/ab"), "blob");
    write(&dir.path().join("build/out.o"), "blob");
    write(&dir.path().join("main.c"), "blob");

    let finder = DuplicateFinder::new(Config::default().finder_config());
    let report = finder.find_duplicates(dir.path()).unwrap();
    assert_eq!(report.files_collected, 1);
    assert!(report.pairs.is_empty());

    let no_defaults = Config {
        use_default_excludes: false,
        ..Config::default()
    };
    let report = DuplicateFinder::new(no_defaults.finder_config())
        .find_duplicates(dir.path())
        .unwrap();
    assert_eq!(report.files_collected, 3);
    assert_eq!(report.statistics.total_duplicate_files, 3);
}

#[test]
fn test_default_list_matches_documented_set() {
    assert_eq!(
        DEFAULT_EXCLUDED_DIRS,
        &["node_modules", ".git", ".DS_Store", "dist", "build"]
    );
}

#[test]
fn test_blank_fragments_exclude_nothing() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a.txt"), "x");
    write(&dir.path().join("b.txt"), "x");

    let report = DuplicateFinder::new(FinderConfig::default().with_excluded(["", "   "]))
        .find_duplicates(dir.path())
        .unwrap();
    assert_eq!(report.pairs.len(), 1);
}
