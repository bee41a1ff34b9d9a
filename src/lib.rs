use std::sync::Arc;
use std::time::Duration;

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;

pub use domain::{entities, use_cases};
pub use interfaces::{handlers, repositories, routes};
pub use infrastructure::{db, media};

use media::blob_store::BlobStore;
use repositories::sqlx_repo::{
    SqlxEpisodeRepo, SqlxFileRepo, SqlxHeroImageRepo, SqlxPodcastRepo, SqlxVariableRepo,
};
use use_cases::{
    files::FileHandler,
    hero_images::HeroImageHandler,
    integrity::IntegrityCoordinator,
    site_settings::{SettingsCache, SettingsHandler, SystemClock},
};

pub type AppSettingsHandler = SettingsHandler<SqlxVariableRepo, SqlxFileRepo>;
pub type AppIntegrityCoordinator = IntegrityCoordinator<
    SqlxHeroImageRepo,
    SqlxPodcastRepo,
    SqlxEpisodeRepo,
    SqlxVariableRepo,
    SqlxFileRepo,
>;
pub type AppFileHandler = FileHandler<SqlxFileRepo, AppIntegrityCoordinator>;
pub type AppHeroImageHandler =
    HeroImageHandler<SqlxHeroImageRepo, SqlxFileRepo, AppIntegrityCoordinator>;

pub struct AppState {
    pub file_handler: AppFileHandler,
    pub hero_image_handler: AppHeroImageHandler,
    pub settings_handler: Arc<AppSettingsHandler>,
    pub podcast_repo: SqlxPodcastRepo,
    pub episode_repo: SqlxEpisodeRepo,
    pub max_upload_bytes: usize,
    pub pool: sqlx::PgPool,
}

impl AppState {
    pub fn new(config: &settings::AppConfig, pool: sqlx::PgPool) -> Self {
        let store = Arc::new(BlobStore::new(config.content_root.clone()));

        let settings_handler = Arc::new(SettingsHandler::new(
            SqlxVariableRepo::new(pool.clone()),
            SqlxFileRepo::new(pool.clone()),
            SettingsCache::new(
                Duration::from_secs(config.settings_cache_ttl_secs),
                Arc::new(SystemClock),
            ),
            store.clone(),
        ));

        let integrity = Arc::new(IntegrityCoordinator::new(
            SqlxHeroImageRepo::new(pool.clone()),
            SqlxPodcastRepo::new(pool.clone()),
            SqlxEpisodeRepo::new(pool.clone()),
            settings_handler.clone(),
        ));

        let file_handler = FileHandler::new(
            SqlxFileRepo::new(pool.clone()),
            integrity.clone(),
            store.clone(),
            config.max_upload_bytes,
        );

        let hero_image_handler = HeroImageHandler::new(
            SqlxHeroImageRepo::new(pool.clone()),
            SqlxFileRepo::new(pool.clone()),
            integrity,
            store,
        );

        AppState {
            file_handler,
            hero_image_handler,
            settings_handler,
            podcast_repo: SqlxPodcastRepo::new(pool.clone()),
            episode_repo: SqlxEpisodeRepo::new(pool.clone()),
            max_upload_bytes: config.max_upload_bytes,
            pool,
        }
    }
}
