//! Negotiated caching by content digest (`ETag` / `If-None-Match`)

use super::{Validation, ValidationOutcome, ValidatorHeader};
use crate::http::conditional::ConditionalRequest;
use crate::resource::{ResourceAccessor, ResourceBody, ResourceError};
use bytes::Bytes;
use futures_util::{stream, StreamExt};
use sha2::{Digest, Sha256};

/// Incremental SHA-256 over a resource body
#[derive(Clone, Default)]
pub struct ContentDigester {
    hasher: Sha256,
}

impl ContentDigester {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, chunk: &[u8]) {
        self.hasher.update(chunk);
    }

    /// Lowercase hex digest, 64 characters
    pub fn finish(self) -> String {
        hex::encode(self.hasher.finalize())
    }
}

/// Digest of a complete byte sequence
pub fn content_digest(content: &[u8]) -> String {
    let mut digester = ContentDigester::new();
    digester.update(content);
    digester.finish()
}

/// Validator comparing `If-None-Match` against a digest of the full body
///
/// The whole body is read to produce the digest. Chunks are retained while
/// hashing so a `Fresh` outcome replays them without reopening the resource.
#[derive(Debug, Clone, Copy, Default)]
pub struct HashValidator;

impl HashValidator {
    pub const fn new() -> Self {
        Self
    }

    pub async fn validate<A: ResourceAccessor>(
        &self,
        accessor: &A,
        id: &str,
        conditional: &ConditionalRequest,
    ) -> Result<Validation, ResourceError> {
        let ResourceBody { mut stream, .. } = accessor.read_body(id).await?;

        let mut digester = ContentDigester::new();
        let mut chunks: Vec<Bytes> = Vec::new();
        let mut len: u64 = 0;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|source| ResourceError::Io {
                id: id.to_string(),
                source,
            })?;
            digester.update(&chunk);
            len += chunk.len() as u64;
            chunks.push(chunk);
        }
        // Release the read handle before deciding
        drop(stream);

        let etag = digester.finish();
        let outcome = if conditional.if_none_match() == Some(etag.as_str()) {
            ValidationOutcome::Unchanged
        } else {
            let replay = stream::iter(chunks.into_iter().map(Ok));
            ValidationOutcome::fresh(
                id,
                ResourceBody {
                    stream: Box::pin(replay),
                    len: Some(len),
                },
            )
        };

        Ok(Validation {
            outcome,
            validator: ValidatorHeader::ETag(etag),
        })
    }
}
