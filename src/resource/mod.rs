//! Resource access layer
//!
//! The cache core never touches storage directly. It goes through a
//! [`ResourceAccessor`], which hands out a lazy body stream and a cheap
//! modification-time probe for a logical resource id.

pub mod fs;

use bytes::Bytes;
use futures_util::Stream;
use std::future::Future;
use std::io;
use std::pin::Pin;
use std::time::SystemTime;
use thiserror::Error;

pub use fs::FsAccessor;

/// Forward-only, single-pass byte stream of a resource body
pub type BodyStream = Pin<Box<dyn Stream<Item = io::Result<Bytes>> + Send>>;

/// Failure while reading a resource
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("failed to read resource '{id}': {source}")]
    Io {
        id: String,
        #[source]
        source: io::Error,
    },
}

impl ResourceError {
    /// Classify an I/O error for `id`, keeping "not found" distinct
    pub fn from_io(id: &str, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            Self::NotFound(id.to_string())
        } else {
            Self::Io {
                id: id.to_string(),
                source,
            }
        }
    }

    /// HTTP status this error surfaces as
    pub const fn status(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Io { .. } => 500,
        }
    }
}

/// An opened resource body
pub struct ResourceBody {
    pub stream: BodyStream,
    /// Total size in bytes, when known before streaming
    pub len: Option<u64>,
}

impl std::fmt::Debug for ResourceBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceBody")
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}

/// Storage collaborator consumed by the cache core
///
/// Both operations may suspend on I/O. `read_modified_at` must not read the
/// body. Dropping the stream returned by `read_body` releases the underlying
/// read handle.
pub trait ResourceAccessor: Send + Sync {
    fn read_body(&self, id: &str) -> impl Future<Output = Result<ResourceBody, ResourceError>> + Send;

    fn read_modified_at(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<SystemTime, ResourceError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_kind_maps_to_not_found() {
        let err = ResourceError::from_io("a.css", io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(err, ResourceError::NotFound(ref id) if id == "a.css"));
        assert_eq!(err.status(), 404);
    }

    #[test]
    fn test_other_kinds_map_to_io() {
        let err = ResourceError::from_io(
            "a.css",
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        assert!(matches!(err, ResourceError::Io { .. }));
        assert_eq!(err.status(), 500);
        assert!(err.to_string().contains("a.css"));
    }
}
