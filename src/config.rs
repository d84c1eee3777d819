use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::Path;

use crate::infrastructure::pipeline::DEFAULT_EVENTS_COLLECTION;

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Settings {
    pub harness: HarnessSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct HarnessSettings {
    /// Collection the reference handler records events into
    pub events_collection: String,
    /// Pretty-print JSON in state mismatch diagnostics
    pub pretty_diagnostics: bool,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Settings {
    /// Load layered settings: defaults, `config/` files, then
    /// `INDEXER_TESTKIT__*` environment variables
    pub fn new() -> Result<Self, ConfigError> {
        Self::load(None)
    }

    /// Like [`Settings::new`], with an extra file layered above `config/`
    pub fn load(extra_file: Option<&Path>) -> Result<Self, ConfigError> {
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let mut builder = Config::builder()
            // Start with default values
            .set_default("harness.events_collection", DEFAULT_EVENTS_COLLECTION)?
            .set_default("harness.pretty_diagnostics", false)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            // Add configuration file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{environment}")).required(false))
            .add_source(File::with_name("config/local").required(false));

        if let Some(path) = extra_file {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder
            // Add environment variables with prefix
            .add_source(Environment::with_prefix("INDEXER_TESTKIT").separator("__"))
            .build()?
            .try_deserialize()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            harness: HarnessSettings::default(),
            logging: LoggingSettings {
                level: "info".to_string(),
                format: LogFormat::Pretty,
            },
        }
    }
}

impl Default for HarnessSettings {
    fn default() -> Self {
        Self {
            events_collection: DEFAULT_EVENTS_COLLECTION.to_string(),
            pretty_diagnostics: false,
        }
    }
}
