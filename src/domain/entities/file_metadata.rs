use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::ALLOWED_EXTENSIONS;
use crate::errors::AppError;

/// One uploaded binary asset. `storage_path` is always relative to the
/// content root and never null once the row exists.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    pub id: Uuid,
    pub name: String,
    pub storage_path: String,
    pub size_bytes: i64,
    pub mime_type: String,
    pub extension: String,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub duration_seconds: Option<f64>,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct FileMetadataInsert {
    pub id: Uuid,
    pub name: String,
    pub storage_path: String,
    pub size_bytes: i64,
    pub mime_type: String,
    pub extension: String,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub duration_seconds: Option<f64>,
    pub url: String,
}

/// An incoming upload: the original filename plus the raw bytes, already
/// pulled out of the multipart stream by the handler.
#[derive(Debug)]
pub struct FileUpload {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    /// Lowercased extension taken from the original filename.
    pub fn extension(&self) -> Option<String> {
        self.name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
    }
}

/// Resolves an extension against the upload allow-list.
pub fn mime_for_extension(extension: &str) -> Result<&'static str, AppError> {
    ALLOWED_EXTENSIONS
        .get(extension)
        .copied()
        .ok_or_else(|| AppError::FileUpload(format!("Unsupported file extension: {}", extension)))
}

/// Storage path convention: `files/{first-2-chars-of-id}/{id}.{ext}`.
pub fn storage_path_for(id: Uuid, extension: &str) -> String {
    let id = id.to_string();
    format!("files/{}/{}.{}", &id[..2], id, extension)
}

/// Directory holding a file's blob and all derived variants.
pub fn storage_dir_for(id: Uuid) -> String {
    let id = id.to_string();
    format!("files/{}", &id[..2])
}

/// Canonical retrieval path recorded on the row at upload time.
pub fn retrieval_url_for(id: Uuid) -> String {
    format!("/api/files/{}", id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_lowercased() {
        let upload = FileUpload { name: "Cover.JPG".into(), bytes: vec![] };
        assert_eq!(upload.extension().as_deref(), Some("jpg"));
    }

    #[test]
    fn extension_missing_when_no_dot() {
        let upload = FileUpload { name: "noext".into(), bytes: vec![] };
        assert_eq!(upload.extension(), None);
    }

    #[test]
    fn mime_lookup_rejects_unknown_extension() {
        assert!(mime_for_extension("exe").is_err());
        assert_eq!(mime_for_extension("mp3").unwrap(), "audio/mpeg");
    }

    #[test]
    fn storage_path_uses_two_char_prefix() {
        let id = Uuid::parse_str("ab1f0000-0000-4000-8000-000000000000").unwrap();
        assert_eq!(
            storage_path_for(id, "jpg"),
            "files/ab/ab1f0000-0000-4000-8000-000000000000.jpg"
        );
        assert_eq!(storage_dir_for(id), "files/ab");
    }
}
