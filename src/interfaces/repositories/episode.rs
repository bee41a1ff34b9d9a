use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    entities::episode::{Episode, EpisodeInsert},
    errors::AppError,
    repositories::{repository::Repository, sqlx_repo::SqlxEpisodeRepo},
};

#[async_trait]
pub trait EpisodeRepository:
    Repository<Entity = Episode, Id = Uuid, Insert = EpisodeInsert>
{
    async fn set_hero_image(
        &self,
        id: &Uuid,
        hero_image_id: Option<Uuid>,
    ) -> Result<Episode, AppError>;

    /// Nulls `hero_image_id` on every episode referencing the given hero
    /// image. Idempotent; returns how many rows changed.
    async fn clear_hero_image(&self, hero_image_id: &Uuid) -> Result<u64, AppError>;
}

impl SqlxEpisodeRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxEpisodeRepo { pool }
    }
}

#[async_trait]
impl Repository for SqlxEpisodeRepo {
    type Entity = Episode;
    type Id = Uuid;
    type Insert = EpisodeInsert;

    async fn get(&self, id: &Uuid) -> Result<Option<Episode>, AppError> {
        let episode = sqlx::query_as::<_, Episode>(
            "SELECT id, podcast_id, title, hero_image_id, created_at, updated_at FROM episodes WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(episode)
    }

    async fn list(&self) -> Result<Vec<Episode>, AppError> {
        let episodes = sqlx::query_as::<_, Episode>(
            "SELECT id, podcast_id, title, hero_image_id, created_at, updated_at FROM episodes ORDER BY created_at DESC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(episodes)
    }

    async fn create(&self, insert: &EpisodeInsert) -> Result<Episode, AppError> {
        let episode = sqlx::query_as::<_, Episode>(
            r#"
            INSERT INTO episodes (id, podcast_id, title, hero_image_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, podcast_id, title, hero_image_id, created_at, updated_at
            "#,
        )
        .bind(insert.id)
        .bind(insert.podcast_id)
        .bind(&insert.title)
        .bind(insert.hero_image_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(episode)
    }

    async fn delete(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM episodes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            Err(AppError::NotFound("Episode record".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl EpisodeRepository for SqlxEpisodeRepo {
    async fn set_hero_image(
        &self,
        id: &Uuid,
        hero_image_id: Option<Uuid>,
    ) -> Result<Episode, AppError> {
        let episode = sqlx::query_as::<_, Episode>(
            r#"
            UPDATE episodes
            SET hero_image_id = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING id, podcast_id, title, hero_image_id, created_at, updated_at
            "#,
        )
        .bind(hero_image_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Episode record".into()))?;

        Ok(episode)
    }

    async fn clear_hero_image(&self, hero_image_id: &Uuid) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE episodes SET hero_image_id = NULL, updated_at = NOW() WHERE hero_image_id = $1"
        )
        .bind(hero_image_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
