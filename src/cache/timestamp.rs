//! Negotiated caching by modification time (`Last-Modified` / `If-Modified-Since`)

use super::{Validation, ValidationOutcome, ValidatorHeader};
use crate::http::conditional::ConditionalRequest;
use crate::resource::{ResourceAccessor, ResourceError};
use chrono::{DateTime, Utc};
use std::time::SystemTime;

/// IMF-fixdate, the HTTP date format
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Format a timestamp as an HTTP date with one-second granularity
///
/// Sub-second precision is dropped, so two writes within the same second
/// produce the same value.
pub fn http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format(HTTP_DATE_FORMAT)
        .to_string()
}

/// Validator comparing `If-Modified-Since` against the resource's mtime
///
/// The comparison is string equality against the normalized `Last-Modified`
/// value, never an ordering. Any representational drift in the client value
/// yields a re-serve instead of a false hit.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampValidator;

impl TimestampValidator {
    pub const fn new() -> Self {
        Self
    }

    pub async fn validate<A: ResourceAccessor>(
        &self,
        accessor: &A,
        id: &str,
        conditional: &ConditionalRequest,
    ) -> Result<Validation, ResourceError> {
        let modified_at = http_date(accessor.read_modified_at(id).await?);

        let outcome = if conditional.if_modified_since() == Some(modified_at.as_str()) {
            ValidationOutcome::Unchanged
        } else {
            ValidationOutcome::fresh(id, accessor.read_body(id).await?)
        };

        Ok(Validation {
            outcome,
            validator: ValidatorHeader::LastModified(modified_at),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::test_support::body_bytes;
    use crate::resource::FsAccessor;
    use filetime::FileTime;
    use std::path::Path;
    use std::time::{Duration, UNIX_EPOCH};

    const MODIFIED: &str = "Wed, 11 May 2022 10:48:50 GMT";

    fn set_mtime(path: &Path, secs: u64) {
        let when = UNIX_EPOCH + Duration::from_secs(secs);
        filetime::set_file_mtime(path, FileTime::from_system_time(when)).unwrap();
    }

    fn fixture() -> (tempfile::TempDir, FsAccessor) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.js");
        std::fs::write(&path, "console.log('v1')").unwrap();
        set_mtime(&path, 1_652_266_130);
        let accessor = FsAccessor::new(dir.path());
        (dir, accessor)
    }

    #[test]
    fn test_http_date_truncates_sub_second() {
        let exact = UNIX_EPOCH + Duration::from_secs(1_652_266_130);
        let later = exact + Duration::from_millis(999);
        assert_eq!(http_date(exact), MODIFIED);
        assert_eq!(http_date(later), MODIFIED);
    }

    #[tokio::test]
    async fn test_matching_timestamp_is_unchanged() {
        let (_dir, accessor) = fixture();
        let conditional = ConditionalRequest::new(Some(MODIFIED), None);

        let result = TimestampValidator
            .validate(&accessor, "test.js", &conditional)
            .await
            .unwrap();
        assert!(result.outcome.is_unchanged());
        assert_eq!(result.validator, ValidatorHeader::LastModified(MODIFIED.into()));
    }

    #[tokio::test]
    async fn test_repeated_validation_is_idempotent() {
        let (_dir, accessor) = fixture();
        let conditional = ConditionalRequest::new(Some(MODIFIED), None);
        for _ in 0..2 {
            let result = TimestampValidator
                .validate(&accessor, "test.js", &conditional)
                .await
                .unwrap();
            assert!(result.outcome.is_unchanged());
        }
    }

    #[tokio::test]
    async fn test_older_timestamp_is_fresh() {
        let (_dir, accessor) = fixture();
        let conditional = ConditionalRequest::new(Some("Tue, 10 May 2022 10:48:50 GMT"), None);

        let result = TimestampValidator
            .validate(&accessor, "test.js", &conditional)
            .await
            .unwrap();
        assert_eq!(result.validator.value(), MODIFIED);
        assert_eq!(body_bytes(result.outcome).await, b"console.log('v1')");
    }

    #[tokio::test]
    async fn test_formatting_drift_forces_reserve() {
        let (_dir, accessor) = fixture();
        // Same instant, different representation
        let conditional = ConditionalRequest::new(Some("Wednesday, 11-May-22 10:48:50 GMT"), None);

        let result = TimestampValidator
            .validate(&accessor, "test.js", &conditional)
            .await
            .unwrap();
        assert!(!result.outcome.is_unchanged());
    }

    #[tokio::test]
    async fn test_modification_is_detected() {
        let (dir, accessor) = fixture();
        let path = dir.path().join("test.js");
        std::fs::write(&path, "console.log('v2')").unwrap();
        set_mtime(&path, 1_652_266_200);

        let conditional = ConditionalRequest::new(Some(MODIFIED), None);
        let result = TimestampValidator
            .validate(&accessor, "test.js", &conditional)
            .await
            .unwrap();
        assert_eq!(result.validator.value(), "Wed, 11 May 2022 10:50:00 GMT");
        assert_eq!(body_bytes(result.outcome).await, b"console.log('v2')");
    }

    #[tokio::test]
    async fn test_echoed_validator_round_trip() {
        let (_dir, accessor) = fixture();
        let first = TimestampValidator
            .validate(&accessor, "test.js", &ConditionalRequest::default())
            .await
            .unwrap();
        assert!(!first.outcome.is_unchanged());

        let echoed = ConditionalRequest::new(Some(first.validator.value()), None);
        let second = TimestampValidator
            .validate(&accessor, "test.js", &echoed)
            .await
            .unwrap();
        assert!(second.outcome.is_unchanged());
    }

    #[tokio::test]
    async fn test_missing_resource_surfaces_not_found() {
        let (_dir, accessor) = fixture();
        let conditional = ConditionalRequest::new(Some(MODIFIED), None);
        assert!(matches!(
            TimestampValidator
                .validate(&accessor, "gone.js", &conditional)
                .await,
            Err(ResourceError::NotFound(_))
        ));
    }
}
