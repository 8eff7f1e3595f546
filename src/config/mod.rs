// Configuration module entry point
// Loads layered configuration and builds the immutable per-process state

mod state;
mod types;

use std::collections::HashSet;
use std::net::SocketAddr;

// Re-export public types
pub use state::{AppState, Route};
#[cfg(test)]
pub(crate) use state::test_config;
pub use types::{
    Config, HttpConfig, LoggingConfig, PerformanceConfig, RouteConfig, ServerConfig, StorageConfig,
};

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Default config file is "config.toml" when no path specified
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("SERVER")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "cache-server/0.1")?
            .set_default("storage.root", "static")?
            .build()?;

        let cfg: Self = settings.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject route tables that cannot be matched unambiguously
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        let mut seen = HashSet::new();
        for route in &self.routes {
            if !route.prefix.starts_with('/') {
                return Err(config::ConfigError::Message(format!(
                    "route prefix must start with '/': {}",
                    route.prefix
                )));
            }
            if !seen.insert(state::normalize_prefix(&route.prefix)) {
                return Err(config::ConfigError::Message(format!(
                    "duplicate route prefix: {}",
                    route.prefix
                )));
            }
        }
        Ok(())
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}
