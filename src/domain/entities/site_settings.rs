use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::DEFAULT_HERO_PLACEHOLDER;
use crate::domain::entities::hero_image::HeroVariantUrls;

/// Site-wide configuration, serialized as the JSON value of the
/// `system.site_settings` variable. The shape is consumed by external
/// clients and must stay stable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SiteSettings {
    pub title: String,
    pub colors: SiteColors,
    pub hero: HeroSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SiteColors {
    pub primary: ColorValue,
    pub secondary: ColorValue,
    pub accent: ColorValue,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ColorValue {
    pub hex: String,
    pub hsl: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HeroSettings {
    pub file_id: Option<Uuid>,
    pub images: Vec<HeroVariantUrls>,
    pub placeholder: Option<String>,
}

impl Default for HeroSettings {
    fn default() -> Self {
        HeroSettings {
            file_id: None,
            images: Vec::new(),
            placeholder: Some(DEFAULT_HERO_PLACEHOLDER.to_string()),
        }
    }
}

impl Default for SiteSettings {
    fn default() -> Self {
        SiteSettings {
            title: "Podcast".to_string(),
            colors: SiteColors {
                primary: ColorValue {
                    hex: "#1c1c1c".to_string(),
                    hsl: "hsl(0, 0%, 11%)".to_string(),
                },
                secondary: ColorValue {
                    hex: "#f5f5f5".to_string(),
                    hsl: "hsl(0, 0%, 96%)".to_string(),
                },
                accent: ColorValue {
                    hex: "#e36037".to_string(),
                    hsl: "hsl(14, 75%, 55%)".to_string(),
                },
            },
            hero: HeroSettings::default(),
        }
    }
}

impl SiteSettings {
    /// True when the hero section still has its hardcoded default value.
    pub fn hero_is_default(&self) -> bool {
        self.hero == HeroSettings::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_hero_has_no_file() {
        let settings = SiteSettings::default();
        assert!(settings.hero.file_id.is_none());
        assert!(settings.hero.images.is_empty());
        assert_eq!(
            settings.hero.placeholder.as_deref(),
            Some(DEFAULT_HERO_PLACEHOLDER)
        );
        assert!(settings.hero_is_default());
    }

    #[test]
    fn json_shape_is_camel_case() {
        let json = serde_json::to_value(SiteSettings::default()).unwrap();
        assert!(json.get("title").is_some());
        assert!(json["colors"]["primary"].get("hex").is_some());
        assert!(json["hero"].get("fileId").is_some());
        assert!(json["hero"].get("placeholder").is_some());
    }

    #[test]
    fn roundtrips_through_json() {
        let settings = SiteSettings::default();
        let text = serde_json::to_string(&settings).unwrap();
        let back: SiteSettings = serde_json::from_str(&text).unwrap();
        assert_eq!(back, settings);
    }
}
