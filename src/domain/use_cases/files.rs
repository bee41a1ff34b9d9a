use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    entities::file_metadata::{
        mime_for_extension, retrieval_url_for, storage_dir_for, storage_path_for, FileMetadata,
        FileMetadataInsert, FileUpload,
    },
    errors::AppError,
    infrastructure::media::{
        blob_store::BlobStore,
        codec::resize_inside_webp,
        probe::probe_metadata,
    },
    constants::RESIZE_WEBP_QUALITY,
    repositories::{file::FileRepository, repository::Repository},
    use_cases::integrity::ReferenceIntegrity,
};

const MAX_RESIZE_DIMENSION: u32 = 8192;

/// Outcome of the best-effort physical cleanup during a file delete. The
/// integrity reset must succeed outright; everything after it is attempted
/// step by step and failures are reported here instead of aborting.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupReport {
    pub variants_deleted: u64,
    pub blob_deleted: bool,
    pub row_deleted: bool,
    pub directory_pruned: bool,
    pub failures: Vec<CleanupFailure>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupFailure {
    pub step: String,
    pub detail: String,
}

impl CleanupReport {
    fn record(&mut self, step: &str, err: AppError) {
        warn!("cleanup step '{}' failed: {}", step, err);
        self.failures.push(CleanupFailure {
            step: step.to_string(),
            detail: err.to_string(),
        });
    }
}

pub struct FileHandler<R, I>
where
    R: FileRepository,
    I: ReferenceIntegrity,
{
    pub files: R,
    integrity: Arc<I>,
    store: Arc<BlobStore>,
    max_upload_bytes: usize,
}

impl<R, I> FileHandler<R, I>
where
    R: FileRepository,
    I: ReferenceIntegrity,
{
    pub fn new(files: R, integrity: Arc<I>, store: Arc<BlobStore>, max_upload_bytes: usize) -> Self {
        FileHandler {
            files,
            integrity,
            store,
            max_upload_bytes,
        }
    }

    /// Validates, stores the blob, probes intrinsic properties, then inserts
    /// the metadata row. A failed probe fails the upload and leaves the
    /// already-written blob as harmless orphan garbage.
    pub async fn upload(&self, upload: FileUpload) -> Result<FileMetadata, AppError> {
        if upload.bytes.len() > self.max_upload_bytes {
            return Err(AppError::FileUpload(format!(
                "File exceeds the maximum size of {} bytes",
                self.max_upload_bytes
            )));
        }

        let extension = upload
            .extension()
            .ok_or_else(|| AppError::FileUpload("Filename has no extension".into()))?;
        let mime_type = mime_for_extension(&extension)?;

        if let Some(kind) = infer::get(&upload.bytes) {
            let sniffed_family = kind.mime_type().split('/').next().unwrap_or_default();
            let declared_family = mime_type.split('/').next().unwrap_or_default();
            if sniffed_family != declared_family {
                return Err(AppError::FileUpload(format!(
                    "Content looks like {}, not {}",
                    kind.mime_type(),
                    mime_type
                )));
            }
        }

        let id = Uuid::new_v4();
        let storage_path = storage_path_for(id, &extension);
        self.store.write(&storage_path, &upload.bytes).await?;

        let probed = probe_metadata(mime_type, &upload.bytes).inspect_err(|e| {
            warn!(%id, "metadata probe failed, blob stays orphaned: {}", e);
        })?;

        let file = self
            .files
            .create(&FileMetadataInsert {
                id,
                name: upload.name,
                storage_path,
                size_bytes: upload.bytes.len() as i64,
                mime_type: mime_type.to_string(),
                extension,
                width: probed.width,
                height: probed.height,
                duration_seconds: probed.duration_seconds,
                url: retrieval_url_for(id),
            })
            .await?;

        info!(%file.id, name = %file.name, size = file.size_bytes, "file uploaded");
        Ok(file)
    }

    pub async fn get(&self, id: &Uuid) -> Result<Option<FileMetadata>, AppError> {
        self.files.get(id).await
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Option<FileMetadata>, AppError> {
        self.files.get_by_name(name).await
    }

    pub async fn list(&self) -> Result<Vec<FileMetadata>, AppError> {
        self.files.list().await
    }

    pub async fn read_bytes(&self, file: &FileMetadata) -> Result<Vec<u8>, AppError> {
        self.store.read(&file.storage_path).await
    }

    /// Reads a derived artifact (hero variant, resized copy) by its
    /// storage path. Containment is enforced by the store.
    pub async fn read_storage(&self, relative: &str) -> Result<Vec<u8>, AppError> {
        self.store.read(relative).await
    }

    /// Deletes a file. Reference resets run first and must succeed; the
    /// remaining steps (derived variants, primary blob, row, directory
    /// prune) are independent and best-effort.
    pub async fn delete(&self, id: &Uuid) -> Result<CleanupReport, AppError> {
        let file = self
            .files
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound("File record".into()))?;

        self.integrity.handle_file_delete(id).await?;

        let mut report = CleanupReport::default();
        let dir = storage_dir_for(*id);
        let derived_prefix = format!("{}-", id);

        match self.store.list_with_prefix(&dir, &derived_prefix).await {
            Ok(derived) => {
                for path in derived {
                    match self.store.delete(&path).await {
                        Ok(()) => report.variants_deleted += 1,
                        Err(e) => report.record("delete-variant", e),
                    }
                }
            }
            Err(e) => report.record("list-variants", e),
        }

        match self.store.delete(&file.storage_path).await {
            Ok(()) => report.blob_deleted = true,
            Err(e) => report.record("delete-blob", e),
        }

        match self.files.delete(id).await {
            Ok(()) => report.row_deleted = true,
            Err(e) => report.record("delete-row", e),
        }

        match self.store.prune_if_empty(&dir).await {
            Ok(pruned) => report.directory_pruned = pruned,
            Err(e) => report.record("prune-directory", e),
        }

        info!(%id, failures = report.failures.len(), "file deleted");
        Ok(report)
    }

    /// Cache-aware resize: the destination name is deterministic in
    /// (id, width, height), so an existing output is returned untouched.
    pub async fn resize(&self, id: &Uuid, width: u32, height: u32) -> Result<String, AppError> {
        if width == 0
            || height == 0
            || width > MAX_RESIZE_DIMENSION
            || height > MAX_RESIZE_DIMENSION
        {
            return Err(AppError::FileUpload(format!(
                "Resize dimensions must be between 1 and {}",
                MAX_RESIZE_DIMENSION
            )));
        }

        let file = self
            .files
            .get(id)
            .await?
            .ok_or_else(|| AppError::FileNotFound(id.to_string()))?;

        if !file.mime_type.starts_with("image/") || file.mime_type == "image/svg+xml" {
            return Err(AppError::FileUpload(format!(
                "Cannot resize {} content",
                file.mime_type
            )));
        }

        let destination = format!("{}/{}-{}x{}.webp", storage_dir_for(*id), id, width, height);
        if self.store.exists(&destination).await? {
            return Ok(destination);
        }

        let bytes = self.store.read(&file.storage_path).await?;
        let encoded = tokio::task::spawn_blocking(move || -> Result<Vec<u8>, AppError> {
            let img = image::load_from_memory(&bytes)
                .map_err(|e| AppError::ImageDecode(e.to_string()))?;
            resize_inside_webp(&img, width, height, RESIZE_WEBP_QUALITY)
        })
        .await
        .map_err(|e| AppError::InternalError(format!("resize task panicked: {}", e)))??;

        self.store.write(&destination, &encoded).await?;
        Ok(destination)
    }
}
