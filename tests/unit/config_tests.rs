use std::path::PathBuf;

use search_core::ErrorCode;
use search_core::config::{Config, LogFormat};
use search_core::test_utils::ConfigFixture;

fn fixture_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(relative)
}

#[test]
fn config_from_fixture() {
    let config = Config::load_file(&fixture_path("tests/fixtures/configs/custom.toml")).unwrap();
    assert!(config.search.log_query_text);
    assert_eq!(config.logging.filter, "info,search_core=trace");
    assert_eq!(config.logging.format, LogFormat::Json);
}

#[test]
fn partial_file_keeps_other_defaults() {
    let config = Config::load_file(&fixture_path("tests/fixtures/configs/partial.toml")).unwrap();
    assert_eq!(config.logging.format, LogFormat::Json);
    assert_eq!(config.logging.filter, "warn,search_core=info");
    assert!(!config.search.log_query_text);
}

#[test]
fn serde_defaults_match_default_impl() {
    let parsed: Config = toml::from_str("").unwrap();
    let defaults = Config::default();
    assert_eq!(parsed.search, defaults.search);
    assert_eq!(parsed.logging, defaults.logging);
}

#[test]
fn malformed_file_is_internal_error() {
    let fixture = ConfigFixture::new();
    let path = fixture.write_config("broken.toml", "[logging\nformat = ");
    let err = Config::load_file(&path).unwrap_err();
    assert_eq!(err.code(), ErrorCode::Internal);
    assert!(err.message().starts_with("parse config"), "{}", err.message());
    assert!(err.message().contains("broken.toml"));
}

#[test]
fn unknown_log_format_is_rejected() {
    let fixture = ConfigFixture::new();
    let path = fixture.write_config("format.toml", "[logging]\nformat = \"xml\"\n");
    let err = Config::load_file(&path).unwrap_err();
    assert_eq!(err.code(), ErrorCode::Internal);
}

#[test]
fn explicit_path_is_used_by_load() {
    let fixture = ConfigFixture::new();
    let path = fixture.write_config("config.toml", "[search]\nlog_query_text = true\n");
    let config = Config::load(Some(&path)).unwrap();
    if std::env::var("SEARCH_CORE_LOG_QUERY_TEXT").is_err() {
        assert!(config.search.log_query_text);
    }
}
