use std::path::{Component, Path, PathBuf};

use tokio::fs;
use tracing::debug;

use crate::errors::AppError;

const MAX_SEGMENT_LEN: usize = 255;

/// Filesystem wrapper scoped to the configured content root. Every relative
/// path is validated lexically before any I/O; a path that would escape the
/// root fails closed with `InvalidPath`.
#[derive(Debug, Clone)]
pub struct BlobStore {
    root: PathBuf,
}

impl BlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        BlobStore { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a relative path against the root, rejecting absolute paths,
    /// parent traversal, and segments outside a conservative character set.
    pub fn resolve(&self, relative: &str) -> Result<PathBuf, AppError> {
        if relative.is_empty() {
            return Err(AppError::InvalidPath("empty path".into()));
        }

        let candidate = Path::new(relative);
        for component in candidate.components() {
            match component {
                Component::Normal(segment) => {
                    let segment = segment
                        .to_str()
                        .ok_or_else(|| AppError::InvalidPath("non-UTF8 path segment".into()))?;
                    validate_segment(segment)?;
                }
                Component::CurDir => {
                    return Err(AppError::InvalidPath(format!("'.' segment in: {}", relative)))
                }
                Component::ParentDir => {
                    return Err(AppError::InvalidPath(format!("'..' segment in: {}", relative)))
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(AppError::InvalidPath(format!("absolute path: {}", relative)))
                }
            }
        }

        Ok(self.root.join(candidate))
    }

    pub async fn write(&self, relative: &str, bytes: &[u8]) -> Result<(), AppError> {
        let path = self.resolve(relative)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, bytes).await?;
        debug!(path = %path.display(), size = bytes.len(), "blob written");
        Ok(())
    }

    pub async fn read(&self, relative: &str) -> Result<Vec<u8>, AppError> {
        let path = self.resolve(relative)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::FileNotFound(relative.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn exists(&self, relative: &str) -> Result<bool, AppError> {
        let path = self.resolve(relative)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }

    /// Removes a blob. Absence is not an error: callers treat deletion as
    /// best-effort and the file may already be gone.
    pub async fn delete(&self, relative: &str) -> Result<(), AppError> {
        let path = self.resolve(relative)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Relative paths of every file in a directory whose name starts with
    /// the given prefix. Used to find all derived variants of a file.
    pub async fn list_with_prefix(
        &self,
        relative_dir: &str,
        prefix: &str,
    ) -> Result<Vec<String>, AppError> {
        let path = self.resolve(relative_dir)?;
        let mut found = Vec::new();
        let mut entries = match fs::read_dir(&path).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(found),
            Err(e) => return Err(e.into()),
        };
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if name.starts_with(prefix) {
                found.push(format!("{}/{}", relative_dir, name));
            }
        }
        Ok(found)
    }

    /// Removes the given directory if it is now empty. Returns whether it
    /// was removed.
    pub async fn prune_if_empty(&self, relative_dir: &str) -> Result<bool, AppError> {
        let path = self.resolve(relative_dir)?;
        let mut entries = match fs::read_dir(&path).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e.into()),
        };
        if entries.next_entry().await?.is_some() {
            return Ok(false);
        }
        fs::remove_dir(&path).await?;
        debug!(path = %path.display(), "empty directory pruned");
        Ok(true)
    }
}

fn validate_segment(segment: &str) -> Result<(), AppError> {
    if segment.len() > MAX_SEGMENT_LEN {
        return Err(AppError::InvalidPath(format!(
            "path segment exceeds {} bytes",
            MAX_SEGMENT_LEN
        )));
    }
    let ok = segment
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));
    if !ok {
        return Err(AppError::InvalidPath(format!(
            "forbidden characters in segment: {}",
            segment
        )));
    }
    Ok(())
}
