//! Layered YAML configuration.
//!
//! Every option has a built-in default; a user `config.yml` overrides
//! defaults key-by-key at every nesting depth via [`merge_values`], so a
//! partial file only has to name the options it changes. Unknown keys are
//! carried through the merge and ignored by deserialization.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::ConfigError;

/// Strategy for deriving the per-item persistence folder name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FolderNameStyle {
    /// Use the normalized (translated, lowercased) title.
    Translated,
    /// Use the raw extracted title.
    Original,
    /// Use the extracted item id.
    ItemId,
}

/// How folder names are treated before hitting the filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingConvention {
    /// Strip unsafe characters and replace spaces with underscores.
    Safe,
    /// Use the derived name verbatim.
    Raw,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Currency code used when the prompt line does not name one.
    pub default_currency: Option<String>,
    /// Translation target language; `None`, `""`, or `"none"` disables translation.
    pub default_language: Option<String>,
    /// Language retried once when translating to `default_language` fails.
    pub fallback_language: String,
    pub retry_attempts: u32,
    pub timeout_seconds: u64,
    pub output: OutputConfig,
    pub conversion: ConversionConfig,
    pub scraping: ScrapingConfig,
    pub display: DisplayConfig,
    pub files: FilesConfig,
    pub network: NetworkConfig,
    pub debug: DebugConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_currency: Some("gbp".to_owned()),
            default_language: Some("en".to_owned()),
            fallback_language: "ja".to_owned(),
            retry_attempts: 3,
            timeout_seconds: 10,
            output: OutputConfig::default(),
            conversion: ConversionConfig::default(),
            scraping: ScrapingConfig::default(),
            display: DisplayConfig::default(),
            files: FilesConfig::default(),
            network: NetworkConfig::default(),
            debug: DebugConfig::default(),
        }
    }
}

impl Config {
    /// Translation target language, treating `""` and `"none"` as unset.
    #[must_use]
    pub fn target_language(&self) -> Option<&str> {
        self.default_language
            .as_deref()
            .filter(|lang| !lang.is_empty() && !lang.eq_ignore_ascii_case("none"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub open_folder: bool,
    pub save_images: bool,
    pub save_csv: bool,
    pub save_txt: bool,
    pub print_data: bool,
    pub print_summary: bool,
    pub folder_name_style: FolderNameStyle,
    pub overwrite_existing: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            open_folder: true,
            save_images: true,
            save_csv: true,
            save_txt: true,
            print_data: true,
            print_summary: true,
            folder_name_style: FolderNameStyle::Translated,
            overwrite_existing: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// Decimal places in converted amounts.
    pub precision: u32,
    /// Put a space between the currency symbol and the amount.
    pub symbol_spacing: bool,
    /// Show the native yen amount alongside the converted one.
    pub show_both_prices: bool,
    /// Per-code rate overrides merged over the built-in table at startup.
    pub custom_rates: BTreeMap<String, f64>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            precision: 2,
            symbol_spacing: true,
            show_both_prices: true,
            custom_rates: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapingConfig {
    pub translate_title: bool,
    pub include_image_url: bool,
    pub include_seller: bool,
    pub include_condition: bool,
    pub include_shipping: bool,
    /// Enables the secondary title selectors (container paragraph,
    /// document-wide heading) when the primary one finds nothing.
    pub use_fallback_selectors: bool,
}

impl Default for ScrapingConfig {
    fn default() -> Self {
        Self {
            translate_title: true,
            include_image_url: true,
            include_seller: true,
            include_condition: true,
            include_shipping: true,
            use_fallback_selectors: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub padding: usize,
    pub theme: String,
    pub show_headers: bool,
    pub title_uppercase: bool,
    pub truncate_long_titles: bool,
    pub max_title_length: usize,
    pub separator_line: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            padding: 20,
            theme: "neon".to_owned(),
            show_headers: true,
            title_uppercase: true,
            truncate_long_titles: true,
            max_title_length: 70,
            separator_line: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    pub base_dir: String,
    pub csv_name: String,
    pub image_prefix: String,
    pub image_format: String,
    pub naming_convention: NamingConvention,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            base_dir: "products".to_owned(),
            csv_name: "data.csv".to_owned(),
            image_prefix: "img_".to_owned(),
            image_format: "jpg".to_owned(),
            naming_convention: NamingConvention::Safe,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub user_agent: String,
    pub proxy: Option<String>,
    /// Courtesy pause after every successful fetch, in seconds.
    pub delay_between_requests: f64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Neokyo-Checker)".to_owned(),
            proxy: None,
            delay_between_requests: 1.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    pub log_errors: bool,
    pub log_file: String,
    pub show_stack_traces: bool,
    pub verbose_mode: bool,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_errors: true,
            log_file: "error.log".to_owned(),
            show_stack_traces: false,
            verbose_mode: false,
        }
    }
}

impl DebugConfig {
    /// Appends one line to the configured error log, if error logging is on.
    ///
    /// Log-file failures are swallowed after a `tracing` warning: the log is
    /// itself a best-effort debugging aid and must never take down a run.
    pub fn append_log(&self, line: &str) {
        if !self.log_errors {
            return;
        }
        let result = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_file)
            .and_then(|mut file| writeln!(file, "{line}"));
        if let Err(err) = result {
            tracing::warn!(log_file = %self.log_file, error = %err, "could not append to error log");
        }
    }
}

/// Recursively merges `user` over `base`.
///
/// Mappings merge key-by-key, with nested mappings merged in turn; any other
/// value kind (scalars, sequences) is replaced wholesale by the user value.
/// Keys present only in `user` pass through untouched.
#[must_use]
pub fn merge_values(base: Value, user: Value) -> Value {
    match (base, user) {
        (Value::Mapping(mut merged), Value::Mapping(user_map)) => {
            for (key, user_value) in user_map {
                let value = match merged.remove(&key) {
                    Some(base_value) => merge_values(base_value, user_value),
                    None => user_value,
                };
                merged.insert(key, value);
            }
            Value::Mapping(merged)
        }
        (_, user) => user,
    }
}

/// Loads configuration from a YAML file layered over the built-in defaults.
///
/// A missing file is not an error: the defaults are returned as-is.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file exists but cannot be read, is not
/// valid YAML, or a recognized key holds a value of the wrong type.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let user: Value = serde_yaml::from_str(&content)?;
    // An empty file parses as null; treat it like "no overrides".
    let user = if user.is_null() {
        Value::Mapping(serde_yaml::Mapping::new())
    } else {
        user
    };
    let base = serde_yaml::to_value(Config::default())?;
    let merged = merge_values(base, user);
    let config: Config = serde_yaml::from_value(merged)?;
    Ok(config)
}

/// Like [`load_config`], but an unreadable or malformed file degrades to the
/// built-in defaults with a warning instead of failing the session.
#[must_use]
pub fn load_config_or_default(path: &Path) -> Config {
    match load_config(path) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                path = %path.display(),
                error = %err,
                "could not read config file — falling back to defaults"
            );
            Config::default()
        }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
