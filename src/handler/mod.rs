//! Request handler module
//!
//! Method validation, route dispatch and cache-aware static resource serving.

pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
