use std::io::Write;

use br_domain::config::{Config, TransportKind};
use br_domain::Error;

#[test]
fn default_codes_cover_builtins() {
    let config = Config::default();
    assert_eq!(config.attributes.len(), 9);
    assert_eq!(config.attributes["Rects"], 0);
    assert_eq!(config.attributes["CurrentScrolling"], 8);
}

#[test]
fn default_transport_is_stdout() {
    let config = Config::default();
    assert_eq!(config.transport.kind, TransportKind::Stdout);
    assert_eq!(config.logging.filter, "info");
    assert!(!config.logging.json);
}

#[test]
fn explicit_attribute_table_replaces_defaults() {
    let toml_str = r#"
[attributes]
Text = 9
Rects = 1
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.attributes.len(), 2);
    assert_eq!(config.attributes["Text"], 9);
    assert!(!config.attributes.contains_key("Url"));
}

#[test]
fn custom_attributes_parse() {
    let toml_str = r#"
[[custom_attributes]]
name = "Title"
code = 20

[[custom_attributes]]
name = "Tags"
code = 21
encoding = "list_join"

[transport]
kind = "log"
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.custom_attributes.len(), 2);
    assert_eq!(config.custom_attributes[0].encoding, "pass_through");
    assert_eq!(config.custom_attributes[1].encoding, "list_join");
    assert_eq!(config.transport.kind, TransportKind::Log);
    // Defaults still apply to the untouched table.
    assert_eq!(config.attributes.len(), 9);
}

#[test]
fn load_reads_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[logging]\nfilter = \"debug\"\njson = true").unwrap();
    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.logging.filter, "debug");
    assert!(config.logging.json);
}

#[test]
fn load_or_default_without_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load_or_default(&dir.path().join("missing.toml")).unwrap();
    assert_eq!(config.attributes.len(), 9);
}

#[test]
fn load_reports_toml_errors() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[attributes]\nText = \"three\"").unwrap();
    let err = Config::load(file.path()).unwrap_err();
    assert!(matches!(err, Error::Toml(_)));
}
