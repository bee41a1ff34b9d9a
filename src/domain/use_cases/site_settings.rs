use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::warn;
use uuid::Uuid;

use crate::{
    constants::SITE_SETTINGS_KEY,
    entities::{
        site_settings::{HeroSettings, SiteSettings},
        variable::VariableInsert,
    },
    errors::AppError,
    infrastructure::media::blob_store::BlobStore,
    repositories::{file::FileRepository, repository::Repository, variable::VariableRepository},
};

/// Time source for the settings cache, injectable so tests can move time.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Explicit read cache for the settings document. One instance per process,
/// owned by the handler; the TTL makes the staleness window visible instead
/// of hiding it in a module-level static.
pub struct SettingsCache {
    slot: Mutex<Option<(SiteSettings, Instant)>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl SettingsCache {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        SettingsCache {
            slot: Mutex::new(None),
            ttl,
            clock,
        }
    }

    pub fn get(&self) -> Option<SiteSettings> {
        let slot = self.slot.lock();
        match slot.as_ref() {
            Some((settings, stored_at))
                if self.clock.now().duration_since(*stored_at) < self.ttl =>
            {
                Some(settings.clone())
            }
            _ => None,
        }
    }

    pub fn put(&self, settings: SiteSettings) {
        *self.slot.lock() = Some((settings, self.clock.now()));
    }

    pub fn invalidate(&self) {
        *self.slot.lock() = None;
    }
}

pub struct SettingsHandler<V, F>
where
    V: VariableRepository,
    F: FileRepository,
{
    pub variables: V,
    pub files: F,
    cache: SettingsCache,
    store: Arc<BlobStore>,
}

impl<V, F> SettingsHandler<V, F>
where
    V: VariableRepository,
    F: FileRepository,
{
    pub fn new(variables: V, files: F, cache: SettingsCache, store: Arc<BlobStore>) -> Self {
        SettingsHandler {
            variables,
            files,
            cache,
            store,
        }
    }

    /// Current settings, served from cache within the TTL. A missing row or
    /// unreadable value falls back to the hardcoded defaults.
    pub async fn get_settings(&self) -> Result<SiteSettings, AppError> {
        if let Some(cached) = self.cache.get() {
            return Ok(cached);
        }
        let settings = self.load_uncached().await?;
        self.cache.put(settings.clone());
        Ok(settings)
    }

    /// Read-path variant that additionally verifies `hero.fileId` still
    /// resolves to an existing File. A dangling reference is served as the
    /// default hero rather than trusted; writers may not have cleaned up
    /// perfectly.
    pub async fn get_settings_resolved(&self) -> Result<SiteSettings, AppError> {
        let mut settings = self.get_settings().await?;
        if let Some(file_id) = settings.hero.file_id {
            if self.files.get(&file_id).await?.is_none() {
                warn!(%file_id, "site settings hero references a missing file");
                settings.hero = HeroSettings::default();
            }
        }
        Ok(settings)
    }

    pub async fn save_settings(&self, settings: SiteSettings) -> Result<SiteSettings, AppError> {
        let value = serde_json::to_string(&settings)?;
        match self.variables.get_by_name(SITE_SETTINGS_KEY).await? {
            Some(existing) => {
                self.variables.update_value(&existing.id, &value).await?;
            }
            None => {
                self.variables
                    .create(&VariableInsert::new(SITE_SETTINGS_KEY, value))
                    .await?;
            }
        }
        self.cache.invalidate();
        self.sync_manifest(&settings).await;
        Ok(settings)
    }

    /// Resets the hero section to its default when (and only when) it
    /// references the given file. Idempotent: an already-reset document is
    /// left untouched and no write is issued.
    pub async fn reset_hero_if_references(&self, file_id: &Uuid) -> Result<bool, AppError> {
        // Bypass the cache: resets must see the latest persisted state.
        let mut settings = self.load_uncached().await?;
        if settings.hero.file_id != Some(*file_id) {
            return Ok(false);
        }
        settings.hero = HeroSettings::default();
        self.save_settings(settings).await?;
        Ok(true)
    }

    async fn load_uncached(&self) -> Result<SiteSettings, AppError> {
        let Some(row) = self.variables.get_by_name(SITE_SETTINGS_KEY).await? else {
            return Ok(SiteSettings::default());
        };
        match serde_json::from_str(&row.value) {
            Ok(settings) => Ok(settings),
            Err(e) => {
                warn!("unreadable site settings value, using defaults: {}", e);
                Ok(SiteSettings::default())
            }
        }
    }

    /// Mirrors site metadata into the PWA manifest. Best effort: a failed
    /// write is logged, never propagated.
    async fn sync_manifest(&self, settings: &SiteSettings) {
        let manifest = serde_json::json!({
            "name": settings.title,
            "short_name": settings.title,
            "display": "standalone",
            "start_url": "/",
            "theme_color": settings.colors.primary.hex,
            "background_color": settings.colors.secondary.hex,
            "icons": [],
        });
        let body = manifest.to_string();
        if let Err(e) = self.store.write("manifest.webmanifest", body.as_bytes()).await {
            warn!("manifest sync failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeClock {
        now: Mutex<Instant>,
    }

    impl FakeClock {
        fn new() -> Self {
            FakeClock {
                now: Mutex::new(Instant::now()),
            }
        }

        fn advance(&self, by: Duration) {
            let mut now = self.now.lock();
            *now += by;
        }
    }

    impl Clock for FakeClock {
        fn now(&self) -> Instant {
            *self.now.lock()
        }
    }

    #[test]
    fn cache_expires_after_ttl() {
        let clock = Arc::new(FakeClock::new());
        let cache = SettingsCache::new(Duration::from_secs(300), clock.clone());

        assert!(cache.get().is_none());
        cache.put(SiteSettings::default());
        assert!(cache.get().is_some());

        clock.advance(Duration::from_secs(299));
        assert!(cache.get().is_some());

        clock.advance(Duration::from_secs(2));
        assert!(cache.get().is_none());
    }

    #[test]
    fn invalidate_clears_immediately() {
        let cache = SettingsCache::new(Duration::from_secs(300), Arc::new(SystemClock));
        cache.put(SiteSettings::default());
        cache.invalidate();
        assert!(cache.get().is_none());
    }
}
