use actix_multipart::Multipart;
use actix_web::{delete, get, post, web, HttpResponse, Responder};
use futures_util::StreamExt;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    entities::{
        file_metadata::FileUpload,
        hero_image::{hero_variant_storage_path, HeroSize, PLACEHOLDER_SIZE},
    },
    errors::AppError,
    AppState,
};

#[instrument(skip(state, payload))]
#[post("/files")]
pub async fn upload_file(
    state: web::Data<AppState>,
    mut payload: Multipart,
) -> Result<impl Responder, AppError> {
    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| AppError::FileUpload(format!("Malformed multipart body: {}", e)))?;

        let Some(filename) = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(String::from)
        else {
            continue;
        };

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk
                .map_err(|e| AppError::FileUpload(format!("Upload stream failed: {}", e)))?;
            if bytes.len() + chunk.len() > state.max_upload_bytes {
                return Err(AppError::FileUpload(format!(
                    "File exceeds the maximum size of {} bytes",
                    state.max_upload_bytes
                )));
            }
            bytes.extend_from_slice(&chunk);
        }

        let file = state
            .file_handler
            .upload(FileUpload { name: filename, bytes })
            .await?;
        return Ok(HttpResponse::Created().json(file));
    }

    Err(AppError::FileUpload("No file field in request".into()))
}

#[instrument(skip(state))]
#[get("/files")]
pub async fn list_files(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let files = state.file_handler.list().await?;
    Ok(HttpResponse::Ok().json(files))
}

/// Serves one pre-encoded hero variant. The last path segment is
/// `{size}.{ext}` with size in xs..2xl or `placeholder` and ext in
/// webp/jpg/jpeg.
#[instrument(skip(state))]
#[get("/files/optimized/{file_id}/hero/{variant}")]
pub async fn serve_optimized(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, String)>,
) -> Result<impl Responder, AppError> {
    let (file_id, variant) = path.into_inner();
    let (size, extension) = variant
        .rsplit_once('.')
        .ok_or_else(|| AppError::NotFound(format!("Unknown variant: {}", variant)))?;

    if size != PLACEHOLDER_SIZE && HeroSize::parse(size).is_none() {
        return Err(AppError::NotFound(format!("Unknown hero size: {}", size)));
    }
    let (storage_ext, content_type) = match extension {
        "webp" => ("webp", "image/webp"),
        "jpg" | "jpeg" => ("jpg", "image/jpeg"),
        _ => return Err(AppError::NotFound(format!("Unknown extension: {}", extension))),
    };

    let storage_path = hero_variant_storage_path(file_id, size, storage_ext);
    let bytes = state.file_handler.read_storage(&storage_path).await?;
    Ok(HttpResponse::Ok().content_type(content_type).body(bytes))
}

#[derive(Debug, serde::Deserialize)]
pub struct ResizeQuery {
    pub w: u32,
    pub h: u32,
}

#[instrument(skip(state))]
#[get("/files/resized/{file_id}")]
pub async fn serve_resized(
    state: web::Data<AppState>,
    file_id: web::Path<Uuid>,
    query: web::Query<ResizeQuery>,
) -> Result<impl Responder, AppError> {
    let path = state
        .file_handler
        .resize(&file_id, query.w, query.h)
        .await?;
    let bytes = state.file_handler.read_storage(&path).await?;
    Ok(HttpResponse::Ok().content_type("image/webp").body(bytes))
}

#[instrument(skip(state))]
#[get("/files/{file_id}")]
pub async fn get_file(
    state: web::Data<AppState>,
    file_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let file = state
        .file_handler
        .get(&file_id)
        .await?
        .ok_or_else(|| AppError::NotFound("File record".into()))?;
    let bytes = state.file_handler.read_bytes(&file).await?;
    Ok(HttpResponse::Ok().content_type(file.mime_type).body(bytes))
}

#[instrument(skip(state))]
#[get("/files/{file_id}/metadata")]
pub async fn get_file_metadata(
    state: web::Data<AppState>,
    file_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let file = state
        .file_handler
        .get(&file_id)
        .await?
        .ok_or_else(|| AppError::NotFound("File record".into()))?;
    Ok(HttpResponse::Ok().json(file))
}

/// Deletes a file after the reference-integrity sweep. The response body
/// is the cleanup report so callers can see which best-effort steps, if
/// any, failed.
#[instrument(skip(state))]
#[delete("/files/{file_id}")]
pub async fn delete_file(
    state: web::Data<AppState>,
    file_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let report = state.file_handler.delete(&file_id).await?;
    Ok(HttpResponse::Ok().json(report))
}
