use std::io::Write;

use super::*;

fn parse(yaml: &str) -> Value {
    serde_yaml::from_str(yaml).expect("test yaml should parse")
}

#[test]
fn merge_values_user_scalar_wins() {
    let base = parse("retry_attempts: 3\ntimeout_seconds: 10");
    let user = parse("retry_attempts: 5");
    let merged = merge_values(base, user);
    assert_eq!(merged["retry_attempts"], parse("5"));
    assert_eq!(merged["timeout_seconds"], parse("10"));
}

#[test]
fn merge_values_recurses_into_nested_mappings() {
    let base = parse("display:\n  padding: 20\n  theme: neon");
    let user = parse("display:\n  padding: 4");
    let merged = merge_values(base, user);
    assert_eq!(merged["display"]["padding"], parse("4"));
    assert_eq!(merged["display"]["theme"], parse("neon"));
}

#[test]
fn merge_values_unknown_keys_pass_through() {
    let base = parse("files:\n  base_dir: products");
    let user = parse("files:\n  extra: kept\ntop_extra: also");
    let merged = merge_values(base, user);
    assert_eq!(merged["files"]["base_dir"], parse("products"));
    assert_eq!(merged["files"]["extra"], parse("kept"));
    assert_eq!(merged["top_extra"], parse("also"));
}

#[test]
fn merge_values_sequence_replaced_wholesale() {
    let base = parse("codes: [gbp, usd]");
    let user = parse("codes: [eur]");
    let merged = merge_values(base, user);
    assert_eq!(merged["codes"], parse("[eur]"));
}

#[test]
fn default_config_matches_builtins() {
    let config = Config::default();
    assert_eq!(config.default_currency.as_deref(), Some("gbp"));
    assert_eq!(config.default_language.as_deref(), Some("en"));
    assert_eq!(config.fallback_language, "ja");
    assert_eq!(config.retry_attempts, 3);
    assert_eq!(config.timeout_seconds, 10);
    assert_eq!(config.conversion.precision, 2);
    assert!(config.conversion.custom_rates.is_empty());
    assert_eq!(config.output.folder_name_style, FolderNameStyle::Translated);
    assert!(!config.output.overwrite_existing);
    assert_eq!(config.files.base_dir, "products");
    assert_eq!(config.files.naming_convention, NamingConvention::Safe);
    assert!((config.network.delay_between_requests - 1.5).abs() < f64::EPSILON);
    assert!(!config.debug.show_stack_traces);
}

#[test]
fn load_config_missing_file_yields_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = load_config(&dir.path().join("nope.yml")).expect("should load");
    assert_eq!(config.retry_attempts, Config::default().retry_attempts);
}

#[test]
fn load_config_partial_file_layers_over_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.yml");
    let mut file = std::fs::File::create(&path).expect("create");
    writeln!(
        file,
        "default_currency: usd\nconversion:\n  precision: 0\n  custom_rates:\n    gbp: 0.0050"
    )
    .expect("write");

    let config = load_config(&path).expect("should load");
    assert_eq!(config.default_currency.as_deref(), Some("usd"));
    assert_eq!(config.conversion.precision, 0);
    // Untouched siblings keep their defaults.
    assert!(config.conversion.show_both_prices);
    assert_eq!(config.fallback_language, "ja");
    assert_eq!(config.conversion.custom_rates.len(), 1);
}

#[test]
fn load_config_empty_file_yields_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.yml");
    std::fs::File::create(&path).expect("create");
    let config = load_config(&path).expect("should load");
    assert_eq!(config.files.csv_name, "data.csv");
}

#[test]
fn load_config_rejects_wrongly_typed_key() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.yml");
    std::fs::write(&path, "retry_attempts: lots").expect("write");
    assert!(matches!(load_config(&path), Err(ConfigError::Parse(_))));
}

#[test]
fn load_config_or_default_swallows_bad_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.yml");
    std::fs::write(&path, ": not yaml [").expect("write");
    let config = load_config_or_default(&path);
    assert_eq!(config.retry_attempts, 3);
}

#[test]
fn target_language_treats_none_as_unset() {
    let mut config = Config::default();
    assert_eq!(config.target_language(), Some("en"));
    config.default_language = Some("none".to_owned());
    assert_eq!(config.target_language(), None);
    config.default_language = Some(String::new());
    assert_eq!(config.target_language(), None);
    config.default_language = None;
    assert_eq!(config.target_language(), None);
}

#[test]
fn folder_name_style_deserializes_snake_case() {
    let style: FolderNameStyle = serde_yaml::from_str("item_id").expect("parse");
    assert_eq!(style, FolderNameStyle::ItemId);
    let style: FolderNameStyle = serde_yaml::from_str("original").expect("parse");
    assert_eq!(style, FolderNameStyle::Original);
}
