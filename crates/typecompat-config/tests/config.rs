use pretty_assertions::assert_eq;
use typecompat_config::{CompatConfig, ConfigError, DuplicateMode};

#[test]
fn loads_every_section_from_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("type-compat.toml");
    std::fs::write(
        &path,
        r#"
[logging]
level = "debug"
json = true

[catalog]
stdlib_stub = false
duplicates = "error"

[resolver]
max_visited = 500
"#,
    )
    .unwrap();

    let config = CompatConfig::load(Some(&path)).unwrap();
    assert_eq!(config.logging.level, "debug");
    assert!(config.logging.json);
    assert!(!config.catalog.stdlib_stub);
    assert_eq!(config.catalog.duplicates, DuplicateMode::Error);
    assert_eq!(config.resolver.max_visited, 500);
}

#[test]
fn partial_files_keep_defaults_for_missing_keys() {
    let config = CompatConfig::load_from_str("[logging]\njson = true\n").unwrap();
    assert!(config.logging.json);
    assert_eq!(config.logging.level, "warn");
    assert!(config.catalog.stdlib_stub);
    assert_eq!(config.catalog.duplicates, DuplicateMode::LastWins);
}

#[test]
fn unknown_keys_are_rejected() {
    let err = CompatConfig::load_from_str("[catalog]\nstdlib = true\n").unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)), "{err}");
}

#[test]
fn parse_errors_do_not_echo_the_input() {
    let err = CompatConfig::load_from_str("[logging]\nlevel = 42 # secret-marker\n").unwrap_err();
    let message = err.to_string();
    assert!(message.starts_with("failed to parse toml config"), "{message}");
    assert!(!message.contains("secret-marker"), "{message}");
}

#[test]
fn zero_traversal_limit_is_invalid() {
    let err = CompatConfig::load_from_str("[resolver]\nmax_visited = 0\n").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)), "{err}");
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");
    let err = CompatConfig::load_from_path(&path).unwrap_err();
    match err {
        ConfigError::Io { path: reported, .. } => assert_eq!(reported, path.display().to_string()),
        other => panic!("expected Io error, got {other:?}"),
    }
}
