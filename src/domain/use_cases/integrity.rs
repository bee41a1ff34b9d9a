use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    errors::AppError,
    repositories::{
        episode::EpisodeRepository, file::FileRepository, hero_image::HeroImageRepository,
        podcast::PodcastRepository, repository::Repository, variable::VariableRepository,
    },
    use_cases::site_settings::SettingsHandler,
};

/// Invoked before any File or HeroImage is physically deleted. Implementors
/// must break every forward reference (site settings, podcasts, episodes)
/// so that no persisted entity points at a vanished row.
#[async_trait]
pub trait ReferenceIntegrity: Send + Sync {
    async fn handle_file_delete(&self, file_id: &Uuid) -> Result<IntegrityReport, AppError>;

    async fn handle_hero_image_delete(
        &self,
        hero_image_id: &Uuid,
    ) -> Result<IntegrityReport, AppError>;
}

/// What a reset sweep actually changed. All zeros/false on a second run
/// against the same target: every step is idempotent.
#[derive(Debug, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IntegrityReport {
    pub settings_reset: bool,
    pub podcasts_cleared: u64,
    pub episodes_cleared: u64,
}

/// Runs the check-and-reset sequence for deletions. Holds no state of its
/// own; the resets are plain idempotent writes. There is no transaction
/// across them: every step is attempted even when an earlier one fails,
/// and any failure is surfaced to the caller before physical deletion.
pub struct IntegrityCoordinator<H, P, E, V, F>
where
    H: HeroImageRepository,
    P: PodcastRepository,
    E: EpisodeRepository,
    V: VariableRepository,
    F: FileRepository,
{
    heroes: H,
    podcasts: P,
    episodes: E,
    settings: Arc<SettingsHandler<V, F>>,
}

impl<H, P, E, V, F> IntegrityCoordinator<H, P, E, V, F>
where
    H: HeroImageRepository,
    P: PodcastRepository,
    E: EpisodeRepository,
    V: VariableRepository,
    F: FileRepository,
{
    pub fn new(heroes: H, podcasts: P, episodes: E, settings: Arc<SettingsHandler<V, F>>) -> Self {
        IntegrityCoordinator {
            heroes,
            podcasts,
            episodes,
            settings,
        }
    }

    async fn clear_owners(
        &self,
        hero_image_id: &Uuid,
        report: &mut IntegrityReport,
        failures: &mut Vec<String>,
    ) {
        match self.podcasts.clear_hero_image(hero_image_id).await {
            Ok(count) => report.podcasts_cleared = count,
            Err(e) => failures.push(format!("podcast reset: {}", e)),
        }
        match self.episodes.clear_hero_image(hero_image_id).await {
            Ok(count) => report.episodes_cleared = count,
            Err(e) => failures.push(format!("episode reset: {}", e)),
        }
    }
}

#[async_trait]
impl<H, P, E, V, F> ReferenceIntegrity for IntegrityCoordinator<H, P, E, V, F>
where
    H: HeroImageRepository,
    P: PodcastRepository,
    E: EpisodeRepository,
    V: VariableRepository,
    F: FileRepository,
{
    #[instrument(skip(self))]
    async fn handle_file_delete(&self, file_id: &Uuid) -> Result<IntegrityReport, AppError> {
        let mut report = IntegrityReport::default();
        let mut failures = Vec::new();

        match self.settings.reset_hero_if_references(file_id).await {
            Ok(reset) => report.settings_reset = reset,
            Err(e) => failures.push(format!("settings reset: {}", e)),
        }

        // Breaks forward references only. The orphaned HeroImage row itself
        // is the caller's responsibility.
        match self.heroes.get_by_file_id(file_id).await {
            Ok(Some(hero)) => self.clear_owners(&hero.id, &mut report, &mut failures).await,
            Ok(None) => {}
            Err(e) => failures.push(format!("hero lookup: {}", e)),
        }

        finish(report, failures, "file", file_id)
    }

    #[instrument(skip(self))]
    async fn handle_hero_image_delete(
        &self,
        hero_image_id: &Uuid,
    ) -> Result<IntegrityReport, AppError> {
        let mut report = IntegrityReport::default();
        let mut failures = Vec::new();

        match self.heroes.get(hero_image_id).await {
            Ok(Some(hero)) => {
                match self.settings.reset_hero_if_references(&hero.file_id).await {
                    Ok(reset) => report.settings_reset = reset,
                    Err(e) => failures.push(format!("settings reset: {}", e)),
                }
            }
            // Already gone: nothing can reference bytes we cannot name, but
            // owner rows may still point at the id, so keep going.
            Ok(None) => {}
            Err(e) => failures.push(format!("hero lookup: {}", e)),
        }

        self.clear_owners(hero_image_id, &mut report, &mut failures)
            .await;

        finish(report, failures, "hero image", hero_image_id)
    }
}

fn finish(
    report: IntegrityReport,
    failures: Vec<String>,
    kind: &str,
    id: &Uuid,
) -> Result<IntegrityReport, AppError> {
    if failures.is_empty() {
        if report != IntegrityReport::default() {
            info!(%id, ?report, "references reset before {} deletion", kind);
        }
        Ok(report)
    } else {
        Err(AppError::InternalError(format!(
            "reference reset for {} {} incomplete: {}",
            kind,
            id,
            failures.join("; ")
        )))
    }
}
