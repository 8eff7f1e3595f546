// Application state module
// Immutable route table shared by every request

use super::types::Config;
#[cfg(test)]
use super::types::{
    HttpConfig, LoggingConfig, PerformanceConfig, RouteConfig, ServerConfig, StorageConfig,
};
use crate::cache::CachePolicy;
use crate::resource::FsAccessor;

/// A resolved route: where resources live and how they are cached
#[derive(Debug, Clone)]
pub struct Route {
    /// Normalized prefix, no trailing slash ("" for the root route)
    pub prefix: String,
    pub accessor: FsAccessor,
    pub policy: CachePolicy,
}

/// Application state
///
/// Built once at startup and never mutated, so requests share it through
/// an `Arc` without locking.
#[derive(Debug)]
pub struct AppState {
    pub config: Config,
    /// Ordered longest prefix first
    routes: Vec<Route>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let mut routes: Vec<Route> = config
            .routes
            .iter()
            .map(|route| Route {
                prefix: normalize_prefix(&route.prefix),
                accessor: FsAccessor::new(route.dir.as_deref().unwrap_or(&config.storage.root)),
                policy: route.policy(),
            })
            .collect();
        routes.sort_by(|a, b| b.prefix.len().cmp(&a.prefix.len()));

        Self { config, routes }
    }

    /// Longest-prefix match on whole path segments
    ///
    /// Returns the route and the resource id (path remainder, no leading slash).
    pub fn match_route<'a>(&self, path: &'a str) -> Option<(&Route, &'a str)> {
        self.routes.iter().find_map(|route| {
            let rest = path.strip_prefix(route.prefix.as_str())?;
            if rest.is_empty() || rest.starts_with('/') {
                Some((route, rest.trim_start_matches('/')))
            } else {
                None
            }
        })
    }
}

pub(super) fn normalize_prefix(prefix: &str) -> String {
    prefix.trim_end_matches('/').to_string()
}

/// Minimal configuration for tests, logging disabled
#[cfg(test)]
pub(crate) fn test_config(root: &str, routes: Vec<RouteConfig>) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            workers: None,
        },
        logging: LoggingConfig {
            level: "info".to_string(),
            access_log: false,
            access_log_format: "combined".to_string(),
            access_log_file: None,
            error_log_file: None,
        },
        performance: PerformanceConfig {
            keep_alive_timeout: 75,
            read_timeout: 30,
            write_timeout: 30,
        },
        http: HttpConfig {
            server_name: "test".to_string(),
        },
        storage: StorageConfig {
            root: root.to_string(),
        },
        routes,
    }
}
