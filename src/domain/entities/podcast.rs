use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Partial podcast view: only the fields the media pipeline touches.
/// If `hero_image_id` is non-null it must reference an existing HeroImage;
/// the integrity coordinator nulls it when that image is deleted.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Podcast {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub hero_image_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct PodcastInsert {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub hero_image_id: Option<Uuid>,
}
