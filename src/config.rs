//! Configuration file support
//!
//! ```toml
//! [server]
//! bind = "0.0.0.0:8080"
//!
//! [logging]
//! level = "debug"
//! json = true
//! file_info = true
//!
//! [limits]
//! max_headers = 128
//! require_mandatory_headers = false
//!
//! [batch]
//! threads = 4
//! ```
//!
//! Every section and key is optional.

use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SipCheckError, SipCheckResult};
use crate::limits::ParserLimits;
use crate::logging::{parse_log_level, LoggingConfig};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LogSettings,
    pub limits: ParserLimits,
    pub batch: BatchConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Address the HTTP server listens on
    pub bind: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8080)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogSettings {
    pub level: String,
    pub json: bool,
    /// Include source file and line in every event
    pub file_info: bool,
    /// Log validation spans when they close, with their timings
    pub spans: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file_info: false,
            spans: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatchConfig {
    /// Worker threads for batch validation, 0 for one per CPU
    pub threads: usize,
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> SipCheckResult<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)?;
        Self::from_toml_str(&raw).map_err(|e| match e {
            SipCheckError::Config(reason) => {
                SipCheckError::config_error(format!("{}: {}", path.display(), reason))
            }
            other => other,
        })
    }

    pub fn from_toml_str(raw: &str) -> SipCheckResult<Self> {
        let config: Config =
            toml::from_str(raw).map_err(|e| SipCheckError::config_error(e.message().to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> SipCheckResult<()> {
        self.limits.validate()?;
        parse_log_level(&self.logging.level)?;
        Ok(())
    }

    /// Logging setup described by the `[logging]` section
    pub fn logging_config(&self) -> SipCheckResult<LoggingConfig> {
        let mut config = LoggingConfig::new(parse_log_level(&self.logging.level)?);
        if self.logging.json {
            config = config.with_json();
        }
        if self.logging.file_info {
            config = config.with_file_info();
        }
        if self.logging.spans {
            config = config.with_spans();
        }
        Ok(config)
    }
}
