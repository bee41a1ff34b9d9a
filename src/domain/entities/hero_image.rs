use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A File's designated use as a banner image for a podcast, an episode,
/// or the site itself when neither owner is set.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct HeroImage {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub file_id: Uuid,
    pub podcast_id: Option<Uuid>,
    pub episode_id: Option<Uuid>,
    pub url_to: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewHeroImage {
    #[validate(length(min = 1, max = 255, message = "Must be 1-255 characters"))]
    pub name: String,

    #[validate(length(max = 1000, message = "Must be at most 1000 characters"))]
    pub description: Option<String>,

    pub file_id: Uuid,
    pub podcast_id: Option<Uuid>,
    pub episode_id: Option<Uuid>,

    #[validate(url(message = "Must be a valid URL"))]
    pub url_to: Option<String>,
}

#[derive(Debug)]
pub struct HeroImageInsert {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub file_id: Uuid,
    pub podcast_id: Option<Uuid>,
    pub episode_id: Option<Uuid>,
    pub url_to: Option<String>,
}

impl NewHeroImage {
    pub fn prepare_for_insert(&self) -> HeroImageInsert {
        HeroImageInsert {
            id: Uuid::new_v4(),
            name: self.name.clone(),
            description: self.description.clone(),
            file_id: self.file_id,
            podcast_id: self.podcast_id,
            episode_id: self.episode_id,
            url_to: self.url_to.clone(),
        }
    }
}

/// The fixed set of hero variant widths. External URLs depend on the
/// string form of each size, so these names are load-bearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeroSize {
    Xs,
    Sm,
    Md,
    Lg,
    Xl,
    Xxl,
}

impl HeroSize {
    pub fn width(&self) -> u32 {
        match self {
            Self::Xs => 320,
            Self::Sm => 640,
            Self::Md => 1080,
            Self::Lg => 1920,
            Self::Xl => 2560,
            Self::Xxl => 3840,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Xs => "xs",
            Self::Sm => "sm",
            Self::Md => "md",
            Self::Lg => "lg",
            Self::Xl => "xl",
            Self::Xxl => "2xl",
        }
    }

    pub fn all() -> &'static [HeroSize] {
        &[
            HeroSize::Xs,
            HeroSize::Sm,
            HeroSize::Md,
            HeroSize::Lg,
            HeroSize::Xl,
            HeroSize::Xxl,
        ]
    }

    pub fn parse(s: &str) -> Option<HeroSize> {
        Self::all().iter().copied().find(|size| size.as_str() == s)
    }
}

/// The size literal used for the blurred preview variant. It has a WebP
/// encoding only, never a JPEG one.
pub const PLACEHOLDER_SIZE: &str = "placeholder";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HeroFormatPaths {
    pub webp: String,
    pub jpeg: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HeroVariantUrls {
    pub size: String,
    pub width: u32,
    pub paths: HeroFormatPaths,
}

/// Derived value: the public URL set for a file's hero variants. The encoded
/// bytes live on disk; this is regenerated on demand and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OptimizedImageSet {
    pub images: Vec<HeroVariantUrls>,
    pub placeholder: String,
}

/// A hero image row merged with its derived URL set, as returned by create.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroImageWithUrls {
    #[serde(flatten)]
    pub hero_image: HeroImage,
    pub images: Vec<HeroVariantUrls>,
    pub placeholder: String,
}

/// Public retrieval paths for one size. Bit-exact: external consumers
/// depend on this exact shape.
pub fn hero_image_paths(file_id: Uuid, size: HeroSize) -> HeroFormatPaths {
    HeroFormatPaths {
        webp: format!("/api/files/optimized/{}/hero/{}.webp", file_id, size.as_str()),
        jpeg: format!("/api/files/optimized/{}/hero/{}.jpg", file_id, size.as_str()),
    }
}

pub fn hero_placeholder_url(file_id: Uuid) -> String {
    format!("/api/files/optimized/{}/hero/{}.webp", file_id, PLACEHOLDER_SIZE)
}

/// URL set for every configured size, widths clamped to the source width
/// when known (variants are never upscaled past the source).
pub fn optimized_image_urls(file_id: Uuid, source_width: Option<u32>) -> OptimizedImageSet {
    let images = HeroSize::all()
        .iter()
        .map(|size| {
            let width = match source_width {
                Some(src) => size.width().min(src),
                None => size.width(),
            };
            HeroVariantUrls {
                size: size.as_str().to_string(),
                width,
                paths: hero_image_paths(file_id, *size),
            }
        })
        .collect();

    OptimizedImageSet {
        images,
        placeholder: hero_placeholder_url(file_id),
    }
}

/// Storage path of one hero variant, derived from the file's storage path:
/// `files/{first2}/{fileId}-hero-{size}.{webp|jpg}`.
pub fn hero_variant_storage_path(file_id: Uuid, size_label: &str, extension: &str) -> String {
    let id = file_id.to_string();
    format!("files/{}/{}-hero-{}.{}", &id[..2], id, size_label, extension)
}
