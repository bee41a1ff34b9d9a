use std::collections::HashMap;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

/// Well-known key of the `variables` row holding the serialized site settings.
pub const SITE_SETTINGS_KEY: &str = "system.site_settings";

/// Variables with this prefix are system-owned and must not be deleted.
pub const SYSTEM_VARIABLE_PREFIX: &str = "system.";

/// Hero shown when no hero image is configured or the configured one is gone.
pub const DEFAULT_HERO_PLACEHOLDER: &str = "/images/hero-placeholder.webp";

/// Width of the blurred hero placeholder variant.
pub const PLACEHOLDER_WIDTH: u32 = 20;

pub const HERO_WEBP_QUALITY: f32 = 85.0;
pub const HERO_JPEG_QUALITY: u8 = 85;
pub const PLACEHOLDER_WEBP_QUALITY: f32 = 20.0;
pub const RESIZE_WEBP_QUALITY: f32 = 85.0;

/// Allowed upload extensions mapped to the MIME type recorded for them.
pub static ALLOWED_EXTENSIONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("jpg", "image/jpeg"),
        ("jpeg", "image/jpeg"),
        ("png", "image/png"),
        ("webp", "image/webp"),
        ("gif", "image/gif"),
        ("avif", "image/avif"),
        ("svg", "image/svg+xml"),
        ("mp3", "audio/mpeg"),
        ("m4a", "audio/mp4"),
        ("aac", "audio/aac"),
        ("ogg", "audio/ogg"),
        ("opus", "audio/opus"),
        ("flac", "audio/flac"),
        ("wav", "audio/wav"),
        ("mp4", "video/mp4"),
        ("webm", "video/webm"),
        ("pdf", "application/pdf"),
    ])
});
