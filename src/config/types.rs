// Configuration types module
// Defines all configuration-related data structures

use crate::cache::{CacheDirective, CachePolicy, ValidatorKind};
use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub routes: Vec<RouteConfig>,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common or json)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
}

/// Resource storage configuration
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Directory resources are served from unless a route overrides it
    pub root: String,
}

/// One served URL prefix and its cache policy
///
/// ```toml
/// [[routes]]
/// prefix = "/assets"
/// cache = { max_age = 30, scope = "public" }
/// validator = "etag"
/// ```
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct RouteConfig {
    pub prefix: String,
    /// Resource directory, defaults to `storage.root`
    #[serde(default)]
    pub dir: Option<String>,
    /// Forced-cache directive
    #[serde(default)]
    pub cache: Option<CacheDirective>,
    /// Negotiated validator
    #[serde(default)]
    pub validator: Option<ValidatorKind>,
}

impl RouteConfig {
    pub const fn policy(&self) -> CachePolicy {
        CachePolicy::new(self.cache, self.validator)
    }
}
