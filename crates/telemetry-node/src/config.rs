//! Node configuration
//!
//! Loaded from an optional TOML file, then overridden by `TELEMETRY__*`
//! environment variables, e.g. `TELEMETRY__TRANSPORT=notification` or
//! `TELEMETRY__PIPELINE__SCHEDULE__TRANSMIT_RATE_HZ=50`.

use pipeline::PipelineConfig;
use serde::{Deserialize, Serialize};
use transport::{NotifyConfig, SerialConfig, TransportKind};

/// Default config file stem looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "telemetry";

/// Peer link listener standing in for the radio
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Address peers connect to
    pub listen_addr: String,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:7878".to_string(),
        }
    }
}

/// Top-level node configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: Option<String>,
    /// Which transport carries frames
    pub transport: TransportKind,
    pub pipeline: PipelineConfig,
    pub serial: SerialConfig,
    pub notify: NotifyConfig,
    pub link: LinkConfig,
}

impl NodeConfig {
    /// Load from `path` (required) or the default file (optional), plus environment
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(path) => config::File::with_name(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("TELEMETRY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Parse from TOML text (no environment overrides)
    pub fn from_toml(text: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(text, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    /// Effective log level
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }
}
