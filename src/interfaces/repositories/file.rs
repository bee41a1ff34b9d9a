use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    entities::file_metadata::{FileMetadata, FileMetadataInsert},
    errors::AppError,
    repositories::{repository::Repository, sqlx_repo::SqlxFileRepo},
};

#[async_trait]
pub trait FileRepository:
    Repository<Entity = FileMetadata, Id = Uuid, Insert = FileMetadataInsert>
{
    async fn get_by_name(&self, name: &str) -> Result<Option<FileMetadata>, AppError>;
}

impl SqlxFileRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxFileRepo { pool }
    }
}

#[async_trait]
impl Repository for SqlxFileRepo {
    type Entity = FileMetadata;
    type Id = Uuid;
    type Insert = FileMetadataInsert;

    async fn get(&self, id: &Uuid) -> Result<Option<FileMetadata>, AppError> {
        let file = sqlx::query_as::<_, FileMetadata>(
            "SELECT * FROM files WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(file)
    }

    async fn list(&self) -> Result<Vec<FileMetadata>, AppError> {
        let files = sqlx::query_as::<_, FileMetadata>(
            "SELECT * FROM files ORDER BY created_at DESC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(files)
    }

    async fn create(&self, insert: &FileMetadataInsert) -> Result<FileMetadata, AppError> {
        let file = sqlx::query_as::<_, FileMetadata>(
            r#"
            INSERT INTO files (id, name, storage_path, size_bytes, mime_type, extension,
                               width, height, duration_seconds, url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(insert.id)
        .bind(&insert.name)
        .bind(&insert.storage_path)
        .bind(insert.size_bytes)
        .bind(&insert.mime_type)
        .bind(&insert.extension)
        .bind(insert.width)
        .bind(insert.height)
        .bind(insert.duration_seconds)
        .bind(&insert.url)
        .fetch_one(&self.pool)
        .await?;

        Ok(file)
    }

    async fn delete(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            Err(AppError::NotFound("File record".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl FileRepository for SqlxFileRepo {
    async fn get_by_name(&self, name: &str) -> Result<Option<FileMetadata>, AppError> {
        let file = sqlx::query_as::<_, FileMetadata>(
            "SELECT * FROM files WHERE name = $1 ORDER BY created_at DESC LIMIT 1"
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(file)
    }
}
