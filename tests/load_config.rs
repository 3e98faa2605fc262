use std::env;
use std::fs::write;
use std::path::PathBuf;

use serial_test::serial;
use tempfile::NamedTempFile;

use paperless_export::load_config::load_config;

/// A static config plus the env token produces a fully merged ExportConfig.
#[test]
#[serial]
fn load_config_success_injects_env_token() {
    let config_yaml = r#"
export:
  base_url: "https://paperless.example.com/api"
  output_dir: ./tmp/exports
  tag: Invoices
"#;
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), config_yaml).unwrap();

    env::set_var("PAPERLESS_TOKEN", "top-secret-test-token");

    let config = load_config(config_file.path(), None).expect("Config should load");

    assert_eq!(config.base_url, "https://paperless.example.com/api");
    assert_eq!(config.output_dir, PathBuf::from("./tmp/exports"));
    assert_eq!(config.tag, "Invoices");
    assert_eq!(config.token, "top-secret-test-token");
    assert_eq!(config.page_size, 25);
    assert_eq!(config.currency.decimal_separator, ',');
}

#[test]
#[serial]
fn cli_tag_override_wins_over_config_file() {
    let config_yaml = r#"
export:
  base_url: "https://paperless.example.com/api"
  output_dir: ./tmp/exports
  tag: Invoices
"#;
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), config_yaml).unwrap();

    env::set_var("PAPERLESS_TOKEN", "token");

    let config =
        load_config(config_file.path(), Some("Receipts".to_string())).expect("Config should load");
    assert_eq!(config.tag, "Receipts");
}

#[test]
#[serial]
fn optional_sections_override_page_size_and_currency() {
    let config_yaml = r#"
export:
  base_url: "https://paperless.example.com/api"
  output_dir: ./tmp/exports
  tag: Invoices
  page_size: 100
currency:
  decimal_separator: "."
  grouping_separator: ","
  symbol: "$"
"#;
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), config_yaml).unwrap();

    env::set_var("PAPERLESS_TOKEN", "token");

    let config = load_config(config_file.path(), None).expect("Config should load");
    assert_eq!(config.page_size, 100);
    assert_eq!(config.currency.decimal_separator, '.');
    assert_eq!(config.currency.grouping_separator, ',');
    assert_eq!(config.currency.symbol, "$");
}

/// Missing token env var makes the loader fail with a pointer to it.
#[test]
#[serial]
fn load_config_errors_on_missing_env() {
    let config_yaml = r#"
export:
  base_url: "https://paperless.example.com/api"
  output_dir: ./tmp/exports
  tag: Invoices
"#;
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), config_yaml).unwrap();

    env::remove_var("PAPERLESS_TOKEN");

    let err = load_config(config_file.path(), None).unwrap_err();
    assert!(
        err.to_string().contains("PAPERLESS_TOKEN"),
        "Must error for missing env var, got: {err}"
    );
}

/// A config that is not valid YAML errors and reports as such.
#[test]
#[serial]
fn load_config_errors_for_invalid_file() {
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), b"not-yaml: [:::").unwrap();

    env::set_var("PAPERLESS_TOKEN", "present-but-irrelevant");

    let err = load_config(config_file.path(), None).unwrap_err();
    let msg = err.to_string();
    assert!(
        msg.contains("parse") || msg.contains("YAML"),
        "Parse error expected, got: {msg}"
    );
}

/// Neither a configured tag nor a CLI override: nothing to export.
#[test]
#[serial]
fn load_config_errors_without_any_tag() {
    let config_yaml = r#"
export:
  base_url: "https://paperless.example.com/api"
  output_dir: ./tmp/exports
"#;
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), config_yaml).unwrap();

    env::set_var("PAPERLESS_TOKEN", "token");

    let err = load_config(config_file.path(), None).unwrap_err();
    assert!(
        err.to_string().contains("tag"),
        "Must point at the missing tag, got: {err}"
    );
}
