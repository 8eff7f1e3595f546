//! HTTP protocol layer module
//!
//! Header extraction, Content-Type lookup and response building, kept apart
//! from route dispatch and from the cache decision logic.

pub mod conditional;
pub mod mime;
pub mod response;

// Re-export commonly used types
pub use conditional::ConditionalRequest;
pub use response::{
    build_404_response, build_405_response, build_500_response, build_decision_response,
    build_error_response, ResponseBody,
};
