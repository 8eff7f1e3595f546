//! Filesystem-backed resource accessor

use super::{ResourceAccessor, ResourceBody, ResourceError};
use crate::logger;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;
use tokio::fs;
use tokio_util::io::ReaderStream;

/// Serves resources from files below a root directory
#[derive(Debug, Clone)]
pub struct FsAccessor {
    root: PathBuf,
}

impl FsAccessor {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a logical id to a file path inside the root
    ///
    /// Ids with parent or absolute components never resolve, and symlinks
    /// pointing outside the root are rejected after canonicalization.
    async fn resolve(&self, id: &str) -> Result<PathBuf, ResourceError> {
        let relative = Path::new(id.trim_start_matches('/'));
        if relative.as_os_str().is_empty()
            || !relative
                .components()
                .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(ResourceError::NotFound(id.to_string()));
        }

        let root = fs::canonicalize(&self.root).await.map_err(|e| {
            logger::log_warning(&format!(
                "Resource root not accessible '{}': {e}",
                self.root.display()
            ));
            ResourceError::from_io(id, e)
        })?;

        let path = fs::canonicalize(root.join(relative))
            .await
            .map_err(|e| ResourceError::from_io(id, e))?;
        if !path.starts_with(&root) {
            logger::log_warning(&format!(
                "Path traversal attempt blocked: {id} -> {}",
                path.display()
            ));
            return Err(ResourceError::NotFound(id.to_string()));
        }
        Ok(path)
    }
}

impl ResourceAccessor for FsAccessor {
    async fn read_body(&self, id: &str) -> Result<ResourceBody, ResourceError> {
        let path = self.resolve(id).await?;
        let file = fs::File::open(&path)
            .await
            .map_err(|e| ResourceError::from_io(id, e))?;
        let metadata = file
            .metadata()
            .await
            .map_err(|e| ResourceError::from_io(id, e))?;
        if metadata.is_dir() {
            return Err(ResourceError::NotFound(id.to_string()));
        }

        Ok(ResourceBody {
            stream: Box::pin(ReaderStream::new(file)),
            len: Some(metadata.len()),
        })
    }

    async fn read_modified_at(&self, id: &str) -> Result<SystemTime, ResourceError> {
        let path = self.resolve(id).await?;
        let metadata = fs::metadata(&path)
            .await
            .map_err(|e| ResourceError::from_io(id, e))?;
        if metadata.is_dir() {
            return Err(ResourceError::NotFound(id.to_string()));
        }
        metadata.modified().map_err(|e| ResourceError::Io {
            id: id.to_string(),
            source: io::Error::new(e.kind(), format!("modification time unavailable: {e}")),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::TryStreamExt;
    use std::time::{Duration, UNIX_EPOCH};

    fn fixture() -> (tempfile::TempDir, FsAccessor) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("test.css"), "body{color:red}").unwrap();
        std::fs::create_dir(dir.path().join("assets")).unwrap();
        std::fs::write(dir.path().join("assets/app.js"), "console.log(1)").unwrap();
        let accessor = FsAccessor::new(dir.path());
        (dir, accessor)
    }

    #[tokio::test]
    async fn test_read_body_streams_all_bytes() {
        let (_dir, accessor) = fixture();
        let body = accessor.read_body("test.css").await.unwrap();
        assert_eq!(body.len, Some(15));
        let chunks: Vec<_> = body.stream.try_collect().await.unwrap();
        assert_eq!(chunks.concat(), b"body{color:red}");
    }

    #[tokio::test]
    async fn test_nested_and_leading_slash_ids() {
        let (_dir, accessor) = fixture();
        assert!(accessor.read_body("/assets/app.js").await.is_ok());
        assert!(accessor.read_body("assets/./app.js").await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_resource_is_not_found() {
        let (_dir, accessor) = fixture();
        assert!(matches!(
            accessor.read_body("missing.css").await,
            Err(ResourceError::NotFound(_))
        ));
        assert!(matches!(
            accessor.read_modified_at("missing.css").await,
            Err(ResourceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_traversal_and_directories_are_not_found() {
        let (_dir, accessor) = fixture();
        for id in ["../etc/passwd", "assets/../../x", "", "assets"] {
            assert!(
                matches!(
                    accessor.read_body(id).await,
                    Err(ResourceError::NotFound(_))
                ),
                "id {id:?} should not resolve"
            );
        }
    }

    #[tokio::test]
    async fn test_read_modified_at_uses_metadata() {
        let (dir, accessor) = fixture();
        let when = UNIX_EPOCH + Duration::from_secs(1_652_266_130);
        filetime::set_file_mtime(
            dir.path().join("test.css"),
            filetime::FileTime::from_system_time(when),
        )
        .unwrap();
        assert_eq!(accessor.read_modified_at("test.css").await.unwrap(), when);
    }
}
