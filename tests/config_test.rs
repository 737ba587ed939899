//! Integration tests for Settings config loading with layered merge semantics.
//!
//! Each test that touches environment variables uses its own prefix, so
//! parallel tests do not see each other's overrides.
//!
//! Note: These tests assume no global config file is present.

use std::env;
use std::fs;

use tempfile::TempDir;

use astree::application::{ApplicationError, GraphStyle, TextStyle};
use astree::config::Settings;

#[test]
fn given_no_sources_when_load_then_defaults() {
    let settings = Settings::load_with_env(None, "ASTREE_TEST_DEFAULTS").expect("load settings");

    assert_eq!(settings.text, TextStyle::default());
    assert_eq!(settings.graph, GraphStyle::default());
    assert_eq!(settings.text.indent, 4);
    assert_eq!(settings.graph.rankdir, "TB");
}

#[test]
fn given_config_file_when_load_then_specified_fields_override_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("astree.toml");
    fs::write(
        &path,
        r#"
[text]
indent = 2

[graph]
rankdir = "LR"
"#,
    )
    .unwrap();

    let settings =
        Settings::load_with_env(Some(&path), "ASTREE_TEST_FILE").expect("load settings");

    assert_eq!(settings.text.indent, 2);
    assert!(settings.text.show_payload, "unspecified field keeps default");
    assert_eq!(settings.graph.rankdir, "LR");
    assert_eq!(settings.graph.name, "ast");
}

#[test]
fn given_env_vars_when_load_then_env_overrides_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("astree.toml");
    fs::write(&path, "[text]\nindent = 2\n").unwrap();
    env::set_var("ASTREE_TEST_ENV_TEXT__INDENT", "8");
    env::set_var("ASTREE_TEST_ENV_TEXT__SHOW_PAYLOAD", "false");
    env::set_var("ASTREE_TEST_ENV_GRAPH__NAME", "program");

    let settings = Settings::load_with_env(Some(&path), "ASTREE_TEST_ENV").expect("load settings");

    assert_eq!(settings.text.indent, 8);
    assert!(!settings.text.show_payload);
    assert_eq!(settings.graph.name, "program");
}

#[test]
fn given_malformed_env_value_when_load_then_config_error() {
    env::set_var("ASTREE_TEST_BADENV_TEXT__INDENT", "wide");

    let err = Settings::load_with_env(None, "ASTREE_TEST_BADENV").unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }));
}

#[test]
fn given_invalid_rankdir_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("astree.toml");
    fs::write(&path, "[graph]\nrankdir = \"DIAGONAL\"\n").unwrap();

    let err = Settings::load_with_env(Some(&path), "ASTREE_TEST_RANKDIR").unwrap_err();

    assert!(err.to_string().contains("graph.rankdir"), "{}", err);
}

#[test]
fn given_oversized_indent_when_load_then_config_error() {
    env::set_var("ASTREE_TEST_INDENT_TEXT__INDENT", "70000");

    let err = Settings::load_with_env(None, "ASTREE_TEST_INDENT").unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }));
    assert!(err.to_string().contains("text.indent"), "{}", err);
}

#[test]
fn given_unknown_key_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("astree.toml");
    fs::write(&path, "[text]\ntabs = true\n").unwrap();

    let err = Settings::load_with_env(Some(&path), "ASTREE_TEST_UNKNOWN").unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }));
}

#[test]
fn given_missing_explicit_file_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nope.toml");

    let err = Settings::load_with_env(Some(&path), "ASTREE_TEST_MISSING").unwrap_err();

    assert!(err.to_string().contains("nope.toml"), "{}", err);
}

#[test]
fn given_settings_when_rendering_toml_then_contains_sections() {
    let settings = Settings::default();

    let rendered = settings.to_toml().unwrap();

    assert!(rendered.contains("[text]"));
    assert!(rendered.contains("indent = 4"));
    assert!(rendered.contains("[graph]"));
    assert!(rendered.contains("rankdir = \"TB\""));
}
