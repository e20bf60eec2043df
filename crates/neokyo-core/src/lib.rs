pub mod config;
pub mod currency;
pub mod item;
pub mod persist;

pub use config::{load_config, load_config_or_default, Config, FolderNameStyle};
pub use currency::{convert, Conversion, CurrencyTable};
pub use item::{ItemRecord, SENTINEL};
pub use persist::{plan, sanitize_name, PlanOutcome, WritePlan};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}
