//! Tests for layered configuration.

use palimpsest::{LayoutConfig, PalimpsestConfig, PalimpsestErrorKind, SessionConfig};
use std::io::Write;

fn toml_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_bundled_defaults_match_code_defaults() {
    let config = PalimpsestConfig::bundled().unwrap();
    assert_eq!(config.session, SessionConfig::default());
    assert_eq!(config.tree, LayoutConfig::default());
    assert_eq!(config.session.max_concurrent_runs(), &None);
    assert_eq!(config.session.changes_channel(), "versions");
}

#[test]
fn test_from_file_fills_missing_keys() {
    let file = toml_file(
        r#"
[session]
max_concurrent_runs = 2

[tree]
node_width = 120.0
"#,
    );
    let config = PalimpsestConfig::from_file(file.path()).unwrap();
    assert_eq!(config.session.max_concurrent_runs(), &Some(2));
    assert_eq!(config.session.changes_channel(), "versions");
    assert_eq!(*config.tree.node_width(), 120.0);
    assert_eq!(*config.tree.node_height(), *LayoutConfig::default().node_height());
}

#[test]
fn test_zero_run_limit_is_rejected() {
    let file = toml_file("[session]\nmax_concurrent_runs = 0\n");
    let err = PalimpsestConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(err.kind(), PalimpsestErrorKind::Config(_)));
    assert!(err.to_string().contains("max_concurrent_runs"));
}

#[test]
fn test_non_positive_node_size_is_rejected() {
    let file = toml_file("[tree]\nnode_height = 0.0\n");
    let err = PalimpsestConfig::from_file(file.path()).unwrap_err();
    assert!(err.to_string().contains("tree.node_height"));
}

#[test]
fn test_missing_file_is_a_config_error() {
    let err = PalimpsestConfig::from_file("/nonexistent/palimpsest.toml").unwrap_err();
    assert!(matches!(err.kind(), PalimpsestErrorKind::Config(_)));
}

#[test]
fn test_validate_accepts_builder_values() {
    let config = PalimpsestConfig {
        session: SessionConfig::default().with_max_concurrent_runs(Some(3)),
        tree: LayoutConfig::default().with_horizontal_gap(0.0),
    };
    assert!(config.validate().is_ok());
}
