use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    entities::podcast::{Podcast, PodcastInsert},
    errors::AppError,
    repositories::{repository::Repository, sqlx_repo::SqlxPodcastRepo},
};

#[async_trait]
pub trait PodcastRepository:
    Repository<Entity = Podcast, Id = Uuid, Insert = PodcastInsert>
{
    async fn set_hero_image(
        &self,
        id: &Uuid,
        hero_image_id: Option<Uuid>,
    ) -> Result<Podcast, AppError>;

    /// Nulls `hero_image_id` on every podcast referencing the given hero
    /// image. Idempotent; returns how many rows changed.
    async fn clear_hero_image(&self, hero_image_id: &Uuid) -> Result<u64, AppError>;
}

impl SqlxPodcastRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxPodcastRepo { pool }
    }
}

#[async_trait]
impl Repository for SqlxPodcastRepo {
    type Entity = Podcast;
    type Id = Uuid;
    type Insert = PodcastInsert;

    async fn get(&self, id: &Uuid) -> Result<Option<Podcast>, AppError> {
        let podcast = sqlx::query_as::<_, Podcast>(
            "SELECT id, title, slug, hero_image_id, created_at, updated_at FROM podcasts WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(podcast)
    }

    async fn list(&self) -> Result<Vec<Podcast>, AppError> {
        let podcasts = sqlx::query_as::<_, Podcast>(
            "SELECT id, title, slug, hero_image_id, created_at, updated_at FROM podcasts ORDER BY title"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(podcasts)
    }

    async fn create(&self, insert: &PodcastInsert) -> Result<Podcast, AppError> {
        let podcast = sqlx::query_as::<_, Podcast>(
            r#"
            INSERT INTO podcasts (id, title, slug, hero_image_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, slug, hero_image_id, created_at, updated_at
            "#,
        )
        .bind(insert.id)
        .bind(&insert.title)
        .bind(&insert.slug)
        .bind(insert.hero_image_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(podcast)
    }

    async fn delete(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM podcasts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            Err(AppError::NotFound("Podcast record".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl PodcastRepository for SqlxPodcastRepo {
    async fn set_hero_image(
        &self,
        id: &Uuid,
        hero_image_id: Option<Uuid>,
    ) -> Result<Podcast, AppError> {
        let podcast = sqlx::query_as::<_, Podcast>(
            r#"
            UPDATE podcasts
            SET hero_image_id = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING id, title, slug, hero_image_id, created_at, updated_at
            "#,
        )
        .bind(hero_image_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Podcast record".into()))?;

        Ok(podcast)
    }

    async fn clear_hero_image(&self, hero_image_id: &Uuid) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE podcasts SET hero_image_id = NULL, updated_at = NOW() WHERE hero_image_id = $1"
        )
        .bind(hero_image_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
