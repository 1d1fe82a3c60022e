//! Configuration file and environment overrides

use anyhow::Context;
use blackout_pii::DetectorConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlackoutConfig {
    /// Appended to the input file name to form the output file name
    #[serde(default = "default_output_suffix")]
    pub output_suffix: String,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Settings for the built-in span sources (`names`, `phones`, `concepts`)
    #[serde(flatten)]
    pub detectors: DetectorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for BlackoutConfig {
    fn default() -> Self {
        Self {
            output_suffix: default_output_suffix(),
            logging: LoggingConfig::default(),
            detectors: DetectorConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl BlackoutConfig {
    /// Load configuration from a YAML file, or TOML when the extension is `.toml`
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;

        let config = if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            toml::from_str(&contents)
                .with_context(|| format!("parsing TOML config {}", path.display()))?
        } else {
            // Default to YAML
            serde_yaml::from_str(&contents)
                .with_context(|| format!("parsing YAML config {}", path.display()))?
        };

        Ok(config)
    }

    /// Apply `BLACKOUT_*` environment overrides
    pub fn merge_env(&mut self) {
        self.merge_vars(|name| std::env::var(name).ok());
    }

    fn merge_vars(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("BLACKOUT_LOG_LEVEL") {
            self.logging.level = val;
        }

        if let Some(val) = lookup("BLACKOUT_OUTPUT_SUFFIX") {
            self.output_suffix = val;
        }
    }
}

fn default_output_suffix() -> String {
    ".censored".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}
