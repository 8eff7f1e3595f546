//! Per-route cache policy
//!
//! A route combines an optional forced-cache directive with at most one
//! negotiated validator. The directive only governs whether the client sends
//! a request at all; once one arrives, the validator's verdict decides
//! between 200 and 304.

use super::{
    CacheDirective, ForcedCache, HashValidator, TimestampValidator, Validation, ValidationOutcome,
    ValidatorHeader,
};
use crate::http::conditional::ConditionalRequest;
use crate::resource::{ResourceAccessor, ResourceError};
use serde::Deserialize;

/// Negotiated validator selectable per route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidatorKind {
    /// `Last-Modified` / `If-Modified-Since`
    LastModified,
    /// `ETag` / `If-None-Match`
    Etag,
}

/// Everything the response layer needs to answer one request
#[derive(Debug)]
pub struct CacheDecision {
    pub outcome: ValidationOutcome,
    pub cache_control: Option<String>,
    pub validator: Option<ValidatorHeader>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CachePolicy {
    pub forced: Option<CacheDirective>,
    pub validator: Option<ValidatorKind>,
}

impl CachePolicy {
    pub const fn new(forced: Option<CacheDirective>, validator: Option<ValidatorKind>) -> Self {
        Self { forced, validator }
    }

    pub async fn evaluate<A: ResourceAccessor>(
        &self,
        accessor: &A,
        id: &str,
        conditional: &ConditionalRequest,
    ) -> Result<CacheDecision, ResourceError> {
        let forced = self.forced.map(ForcedCache::new);
        let cache_control = forced.as_ref().map(ForcedCache::cache_control);

        let validation = match self.validator {
            Some(ValidatorKind::LastModified) => Some(
                TimestampValidator::new()
                    .validate(accessor, id, conditional)
                    .await?,
            ),
            Some(ValidatorKind::Etag) => Some(
                HashValidator::new()
                    .validate(accessor, id, conditional)
                    .await?,
            ),
            None => None,
        };

        let (outcome, validator) = match validation {
            Some(Validation { outcome, validator }) => (outcome, Some(validator)),
            None => {
                let outcome = match forced {
                    Some(forced) => forced.apply(accessor, id).await?,
                    None => ValidationOutcome::fresh(id, accessor.read_body(id).await?),
                };
                (outcome, None)
            }
        };

        Ok(CacheDecision {
            outcome,
            cache_control,
            validator,
        })
    }
}
