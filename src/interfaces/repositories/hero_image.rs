use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    entities::hero_image::{HeroImage, HeroImageInsert},
    errors::AppError,
    repositories::{repository::Repository, sqlx_repo::SqlxHeroImageRepo},
};

#[async_trait]
pub trait HeroImageRepository:
    Repository<Entity = HeroImage, Id = Uuid, Insert = HeroImageInsert>
{
    async fn get_by_file_id(&self, file_id: &Uuid) -> Result<Option<HeroImage>, AppError>;

    async fn get_by_podcast_id(&self, podcast_id: &Uuid) -> Result<Option<HeroImage>, AppError>;

    async fn get_by_episode_id(&self, episode_id: &Uuid) -> Result<Option<HeroImage>, AppError>;
}

impl SqlxHeroImageRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxHeroImageRepo { pool }
    }
}

#[async_trait]
impl Repository for SqlxHeroImageRepo {
    type Entity = HeroImage;
    type Id = Uuid;
    type Insert = HeroImageInsert;

    async fn get(&self, id: &Uuid) -> Result<Option<HeroImage>, AppError> {
        let hero = sqlx::query_as::<_, HeroImage>(
            "SELECT * FROM hero_images WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(hero)
    }

    async fn list(&self) -> Result<Vec<HeroImage>, AppError> {
        let heroes = sqlx::query_as::<_, HeroImage>(
            "SELECT * FROM hero_images ORDER BY created_at DESC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(heroes)
    }

    async fn create(&self, insert: &HeroImageInsert) -> Result<HeroImage, AppError> {
        let hero = sqlx::query_as::<_, HeroImage>(
            r#"
            INSERT INTO hero_images (id, name, description, file_id, podcast_id, episode_id, url_to)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(insert.id)
        .bind(&insert.name)
        .bind(&insert.description)
        .bind(insert.file_id)
        .bind(insert.podcast_id)
        .bind(insert.episode_id)
        .bind(&insert.url_to)
        .fetch_one(&self.pool)
        .await?;

        Ok(hero)
    }

    async fn delete(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM hero_images WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            Err(AppError::NotFound("Hero image record".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl HeroImageRepository for SqlxHeroImageRepo {
    async fn get_by_file_id(&self, file_id: &Uuid) -> Result<Option<HeroImage>, AppError> {
        let hero = sqlx::query_as::<_, HeroImage>(
            "SELECT * FROM hero_images WHERE file_id = $1 LIMIT 1"
        )
        .bind(file_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(hero)
    }

    async fn get_by_podcast_id(&self, podcast_id: &Uuid) -> Result<Option<HeroImage>, AppError> {
        let hero = sqlx::query_as::<_, HeroImage>(
            "SELECT * FROM hero_images WHERE podcast_id = $1 LIMIT 1"
        )
        .bind(podcast_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(hero)
    }

    async fn get_by_episode_id(&self, episode_id: &Uuid) -> Result<Option<HeroImage>, AppError> {
        let hero = sqlx::query_as::<_, HeroImage>(
            "SELECT * FROM hero_images WHERE episode_id = $1 LIMIT 1"
        )
        .bind(episode_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(hero)
    }
}
