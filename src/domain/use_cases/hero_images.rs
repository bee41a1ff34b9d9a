use std::sync::Arc;

use base64::Engine;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    entities::hero_image::{
        hero_variant_storage_path, optimized_image_urls, HeroImage, HeroImageWithUrls,
        NewHeroImage, OptimizedImageSet, PLACEHOLDER_SIZE,
    },
    errors::{AppError, FieldError},
    infrastructure::media::{blob_store::BlobStore, codec::encode_variants},
    repositories::{
        file::FileRepository, hero_image::HeroImageRepository, repository::Repository,
    },
    use_cases::integrity::ReferenceIntegrity,
};

pub struct HeroImageHandler<H, F, I>
where
    H: HeroImageRepository,
    F: FileRepository,
    I: ReferenceIntegrity,
{
    pub heroes: H,
    files: F,
    integrity: Arc<I>,
    store: Arc<BlobStore>,
}

impl<H, F, I> HeroImageHandler<H, F, I>
where
    H: HeroImageRepository,
    F: FileRepository,
    I: ReferenceIntegrity,
{
    pub fn new(heroes: H, files: F, integrity: Arc<I>, store: Arc<BlobStore>) -> Self {
        HeroImageHandler {
            heroes,
            files,
            integrity,
            store,
        }
    }

    /// Creates a hero image and materializes every size variant. The
    /// referenced File must exist and be readable before the row is
    /// inserted; encoding needs its bytes either way. The returned
    /// placeholder is inlined as a data URI since the bytes are in hand.
    pub async fn create(&self, request: NewHeroImage) -> Result<HeroImageWithUrls, AppError> {
        request.validate()?;
        if request.podcast_id.is_some() && request.episode_id.is_some() {
            return Err(AppError::ValidationError(vec![FieldError {
                field: "podcastId".into(),
                message: "At most one of podcastId and episodeId may be set".into(),
            }]));
        }

        let file = self
            .files
            .get(&request.file_id)
            .await?
            .ok_or_else(|| AppError::FileNotFound(request.file_id.to_string()))?;
        let source = self.store.read(&file.storage_path).await?;

        let hero_image = self.heroes.create(&request.prepare_for_insert()).await?;

        let encoded = encode_variants(&source).await?;
        for variant in &encoded.variants {
            let label = variant.size.as_str();
            self.store
                .write(&hero_variant_storage_path(file.id, label, "webp"), &variant.webp)
                .await?;
            self.store
                .write(&hero_variant_storage_path(file.id, label, "jpg"), &variant.jpeg)
                .await?;
        }
        self.store
            .write(
                &hero_variant_storage_path(file.id, PLACEHOLDER_SIZE, "webp"),
                &encoded.placeholder,
            )
            .await?;

        let urls = optimized_image_urls(file.id, Some(encoded.source_width));
        let placeholder = format!(
            "data:image/webp;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(&encoded.placeholder)
        );

        info!(%hero_image.id, file_id = %file.id, "hero image created with variants");
        Ok(HeroImageWithUrls {
            hero_image,
            images: urls.images,
            placeholder,
        })
    }

    /// Pure URL derivation for read paths that need no bytes. `None` when
    /// the file does not exist, including when a stored reference went
    /// stale; callers treat that as "no hero image".
    pub async fn get_optimized_image_urls(
        &self,
        file_id: &Uuid,
    ) -> Result<Option<OptimizedImageSet>, AppError> {
        let Some(file) = self.files.get(file_id).await? else {
            return Ok(None);
        };
        let source_width = file.width.map(|w| w as u32);
        Ok(Some(optimized_image_urls(file.id, source_width)))
    }

    pub async fn get(&self, id: &Uuid) -> Result<Option<HeroImage>, AppError> {
        self.heroes.get(id).await
    }

    pub async fn list(&self) -> Result<Vec<HeroImage>, AppError> {
        self.heroes.list().await
    }

    pub async fn get_by_file_id(&self, file_id: &Uuid) -> Result<Option<HeroImage>, AppError> {
        self.heroes.get_by_file_id(file_id).await
    }

    pub async fn get_by_podcast_id(
        &self,
        podcast_id: &Uuid,
    ) -> Result<Option<HeroImage>, AppError> {
        self.heroes.get_by_podcast_id(podcast_id).await
    }

    pub async fn get_by_episode_id(
        &self,
        episode_id: &Uuid,
    ) -> Result<Option<HeroImage>, AppError> {
        self.heroes.get_by_episode_id(episode_id).await
    }

    /// Deletes the row after the reference sweep. The underlying File and
    /// its variants on disk are left alone; removing them is a separate,
    /// caller-initiated file delete.
    pub async fn delete(&self, id: &Uuid) -> Result<(), AppError> {
        self.heroes
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Hero image record".into()))?;

        self.integrity.handle_hero_image_delete(id).await?;
        self.heroes.delete(id).await?;

        info!(%id, "hero image deleted");
        Ok(())
    }
}
