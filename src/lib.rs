//! Static resource server with HTTP cache validation
//!
//! Resources are served per route through a [`cache::CachePolicy`]: a forced
//! `Cache-Control` window, a negotiated `Last-Modified` or `ETag` validator,
//! or both. Validation is recomputed from storage on every request.

pub mod cache;
pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod resource;
pub mod server;
