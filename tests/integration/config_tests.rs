use clone_spotter::config::{Config, ConfigOverrides};
use clone_spotter::scanner::HashAlgorithm;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn test_config_load_defaults() {
    // Use figment directly without Env to avoid interference from other tests
    let figment = Figment::from(Serialized::defaults(Config::default()));
    let config: Config = figment.extract().unwrap();

    assert_eq!(config.algorithm, HashAlgorithm::Md5);
    assert_eq!(config.workers, 4);
    assert!(config.use_default_excludes);
    assert_eq!(config.output_dir, PathBuf::from("./output"));
}

#[test]
fn test_config_load_from_env() {
    std::env::set_var("CLONE_SPOTTER_FOLLOW_SYMLINKS", "true");

    let figment = Figment::from(Serialized::defaults(Config::default()))
        .merge(Env::prefixed("CLONE_SPOTTER_").only(&["follow_symlinks"]));
    let config: Config = figment.extract().unwrap();

    assert!(config.follow_symlinks);
    std::env::remove_var("CLONE_SPOTTER_FOLLOW_SYMLINKS");
}

#[test]
fn test_config_load_from_toml() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        r#"
algorithm = "blake3"
exclude = ["target", "vendor"]
use_default_excludes = false
workers = 12
follow_symlinks = true
output_dir = "/tmp/reports"
filename = "scan.json"
"#,
    )
    .unwrap();

    let config = Config::load(Some(&config_path), &ConfigOverrides::default()).unwrap();

    assert_eq!(config.algorithm, HashAlgorithm::Blake3);
    assert_eq!(config.effective_excludes(), vec!["target", "vendor"]);
    assert_eq!(config.effective_workers(), 12);
    assert!(config.follow_symlinks);
    assert_eq!(config.output_dir, PathBuf::from("/tmp/reports"));
    assert_eq!(config.filename, "scan.json");
}

#[test]
fn test_cli_overrides_beat_file() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "algorithm = \"sha1\"\nfilename = \"from-file\"\n").unwrap();

    let overrides = ConfigOverrides {
        algorithm: Some(HashAlgorithm::Sha512),
        filename: Some("from-cli".to_string()),
        ..ConfigOverrides::default()
    };
    let config = Config::load(Some(&config_path), &overrides).unwrap();

    assert_eq!(config.algorithm, HashAlgorithm::Sha512);
    assert_eq!(config.filename, "from-cli");
}

#[test]
fn test_config_invalid_toml_is_error() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "workers = \"many\"").unwrap();

    let result = Config::load(Some(&config_path), &ConfigOverrides::default());
    assert!(result.is_err());

    let figment = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(&config_path));
    assert!(figment.extract::<Config>().is_err());
}

#[test]
fn test_config_round_trips_through_toml() {
    let config = Config {
        algorithm: HashAlgorithm::Sha256,
        exclude: vec!["cache".to_string()],
        ..Config::default()
    };
    let rendered = config.to_toml().unwrap();

    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(&path, &rendered).unwrap();

    let reloaded: Config = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .extract()
        .unwrap();
    assert_eq!(reloaded, config);
}
