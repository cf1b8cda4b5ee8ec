use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

use crate::config::credentials::Credentials;

/// Service name under `requires` this plugin reads.
pub const PLUGIN_SERVICE: &str = "sdm";

/// ================================
/// Full service configuration
/// ================================
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ServiceConfig {
    pub logging: Option<LoggingConfig>,
    /// required services by name, e.g. `sdm`
    #[serde(default)]
    pub requires: HashMap<String, RequiredService>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct RequiredService {
    pub settings: Option<HashMap<String, Value>>,
    pub credentials: Option<Credentials>,
}

impl ServiceConfig {
    fn plugin(&self) -> Option<&RequiredService> {
        self.requires.get(PLUGIN_SERVICE)
    }

    /// Issuer credentials bound to the plugin service, if any.
    pub fn credentials(&self) -> Option<&Credentials> {
        self.plugin().and_then(|service| service.credentials.as_ref())
    }
}

/// Source of the plugin settings mapping.
pub trait ConfigurationProvider {
    /// `requires.sdm.settings`, empty when any level is missing.
    fn plugin_settings(&self) -> HashMap<String, Value>;
}

impl ConfigurationProvider for ServiceConfig {
    fn plugin_settings(&self) -> HashMap<String, Value> {
        self.plugin()
            .and_then(|service| service.settings.clone())
            .unwrap_or_default()
    }
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String, // allowed: trace, debug, info, warn, error
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn new (level: String, format: LogFormat) -> Self {
        Self { level, format }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::new("info".to_owned(), LogFormat::Compact)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Compact,
}
