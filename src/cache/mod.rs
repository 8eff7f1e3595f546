//! HTTP cache validation core
//!
//! Three strategies decide between re-serving a resource and telling the
//! client to reuse its copy:
//! - [`directive::ForcedCache`] attaches `Cache-Control` and always serves
//! - [`timestamp::TimestampValidator`] compares `If-Modified-Since` with `Last-Modified`
//! - [`digest::HashValidator`] compares `If-None-Match` with a SHA-256 `ETag`
//!
//! [`policy::CachePolicy`] composes a forced-cache floor with at most one validator.
//! Nothing is cached server side; every request recomputes from storage.

pub mod digest;
pub mod directive;
pub mod policy;
pub mod timestamp;

use crate::http::mime;
use crate::resource::ResourceBody;
use std::path::Path;

pub use digest::{content_digest, ContentDigester, HashValidator};
pub use directive::{CacheDirective, ForcedCache, Scope};
pub use policy::{CacheDecision, CachePolicy, ValidatorKind};
pub use timestamp::{http_date, TimestampValidator};

/// Result of running a strategy for one request
#[derive(Debug)]
pub enum ValidationOutcome {
    /// Client copy is current, respond 304 without a body
    Unchanged,
    /// Serve the resource body
    Fresh {
        body: ResourceBody,
        content_type: &'static str,
    },
}

impl ValidationOutcome {
    /// Wrap an opened body, deriving Content-Type from the resource id
    pub fn fresh(id: &str, body: ResourceBody) -> Self {
        Self::Fresh {
            body,
            content_type: content_type_for(id),
        }
    }

    pub const fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }

    pub const fn status(&self) -> u16 {
        match self {
            Self::Unchanged => 304,
            Self::Fresh { .. } => 200,
        }
    }
}

/// Validator value emitted on every response of a negotiated route
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidatorHeader {
    LastModified(String),
    ETag(String),
}

impl ValidatorHeader {
    pub fn name(&self) -> hyper::header::HeaderName {
        match self {
            Self::LastModified(_) => hyper::header::LAST_MODIFIED,
            Self::ETag(_) => hyper::header::ETAG,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Self::LastModified(v) | Self::ETag(v) => v,
        }
    }
}

/// Outcome of a negotiated validator together with the validator to emit
#[derive(Debug)]
pub struct Validation {
    pub outcome: ValidationOutcome,
    pub validator: ValidatorHeader,
}

fn content_type_for(id: &str) -> &'static str {
    mime::get_content_type(Path::new(id).extension().and_then(|e| e.to_str()))
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::ValidationOutcome;
    use futures_util::TryStreamExt;

    /// Drain a `Fresh` outcome into its bytes
    pub async fn body_bytes(outcome: ValidationOutcome) -> Vec<u8> {
        match outcome {
            ValidationOutcome::Fresh { body, .. } => {
                let chunks: Vec<_> = body.stream.try_collect().await.unwrap();
                chunks.concat()
            }
            ValidationOutcome::Unchanged => panic!("expected a fresh outcome"),
        }
    }
}
