//! Forced caching via `Cache-Control`
//!
//! A forced-cache route never compares anything. The directive tells the
//! client how long it may reuse its copy without asking; an update made
//! inside that window stays invisible to such clients until it expires.

use super::ValidationOutcome;
use crate::resource::{ResourceAccessor, ResourceError};
use serde::Deserialize;

/// Visibility scope of a cached response
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Any cache may store the response
    #[default]
    Public,
    /// Browser cache only
    Private,
}

impl Scope {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
        }
    }
}

/// Immutable forced-cache policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CacheDirective {
    pub max_age: u32,
    #[serde(default)]
    pub scope: Scope,
}

impl CacheDirective {
    pub const fn public(max_age: u32) -> Self {
        Self {
            max_age,
            scope: Scope::Public,
        }
    }

    pub const fn private(max_age: u32) -> Self {
        Self {
            max_age,
            scope: Scope::Private,
        }
    }

    /// Render as a `Cache-Control` header value
    pub fn to_header_value(self) -> String {
        format!("{}, max-age={}", self.scope.as_str(), self.max_age)
    }
}

/// Strategy that always serves the body and attaches the directive
#[derive(Debug, Clone, Copy)]
pub struct ForcedCache {
    directive: CacheDirective,
}

impl ForcedCache {
    pub const fn new(directive: CacheDirective) -> Self {
        Self { directive }
    }

    pub fn cache_control(&self) -> String {
        self.directive.to_header_value()
    }

    /// Open the resource body; the outcome is always `Fresh`
    pub async fn apply<A: ResourceAccessor>(
        &self,
        accessor: &A,
        id: &str,
    ) -> Result<ValidationOutcome, ResourceError> {
        let body = accessor.read_body(id).await?;
        Ok(ValidationOutcome::fresh(id, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::test_support::body_bytes;
    use crate::resource::FsAccessor;

    #[test]
    fn test_header_value() {
        assert_eq!(
            CacheDirective::public(30).to_header_value(),
            "public, max-age=30"
        );
        assert_eq!(
            CacheDirective::private(600).to_header_value(),
            "private, max-age=600"
        );
        assert_eq!(CacheDirective::public(0).to_header_value(), "public, max-age=0");
    }

    #[test]
    fn test_scope_defaults_to_public() {
        let directive: CacheDirective = serde_json::from_str(r#"{"max_age": 30}"#).unwrap();
        assert_eq!(directive, CacheDirective::public(30));
        let directive: CacheDirective =
            serde_json::from_str(r#"{"max_age": 5, "scope": "private"}"#).unwrap();
        assert_eq!(directive.scope, Scope::Private);
    }

    #[tokio::test]
    async fn test_apply_always_serves_body() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("test.css"), "body{color:red}").unwrap();
        let accessor = FsAccessor::new(dir.path());
        let forced = ForcedCache::new(CacheDirective::public(30));

        let outcome = forced.apply(&accessor, "test.css").await.unwrap();
        match &outcome {
            ValidationOutcome::Fresh { content_type, .. } => assert_eq!(*content_type, "text/css"),
            ValidationOutcome::Unchanged => panic!("forced cache never validates"),
        }
        assert_eq!(body_bytes(outcome).await, b"body{color:red}");
        assert_eq!(forced.cache_control(), "public, max-age=30");
    }

    #[tokio::test]
    async fn test_apply_missing_resource() {
        let dir = tempfile::tempdir().unwrap();
        let accessor = FsAccessor::new(dir.path());
        let forced = ForcedCache::new(CacheDirective::private(10));
        assert!(matches!(
            forced.apply(&accessor, "gone.css").await,
            Err(ResourceError::NotFound(_))
        ));
    }
}
