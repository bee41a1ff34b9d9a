
use std::sync::atomic::Ordering;

use uuid::Uuid;

use podcast_cms_backend::entities::site_settings::{HeroSettings, SiteSettings};
use podcast_cms_backend::errors::AppError;
use podcast_cms_backend::repositories::repository::Repository;
use podcast_cms_backend::repositories::variable::VariableRepository;
use podcast_cms_backend::use_cases::integrity::{IntegrityReport, ReferenceIntegrity};

use test_repos::{sample_jpeg, TestHarness};

async fn upload_sample(harness: &TestHarness, name: &str) -> Uuid {
    harness
        .file_handler
        .upload(podcast_cms_backend::entities::file_metadata::FileUpload {
            name: name.to_string(),
            bytes: sample_jpeg(320, 240),
        })
        .await
        .expect("upload")
        .id
}

async fn save_settings_with_hero(harness: &TestHarness, title: &str, file_id: Uuid) {
    let mut settings = SiteSettings::default();
    settings.title = title.to_string();
    settings.hero = HeroSettings {
        file_id: Some(file_id),
        images: Vec::new(),
        placeholder: None,
    };
    harness
        .settings
        .save_settings(settings)
        .await
        .expect("save settings");
}

#[actix_rt::test]
async fn file_delete_resets_settings_hero_but_keeps_the_rest() {
    let harness = TestHarness::new();
    let file_id = upload_sample(&harness, "banner.jpg").await;
    save_settings_with_hero(&harness, "Night Watch", file_id).await;

    let report = harness
        .integrity
        .handle_file_delete(&file_id)
        .await
        .unwrap();
    assert!(report.settings_reset);

    let after = harness.settings.get_settings().await.unwrap();
    assert_eq!(after.title, "Night Watch");
    assert!(after.hero_is_default());
}

#[actix_rt::test]
async fn file_delete_ignores_settings_referencing_another_file() {
    let harness = TestHarness::new();
    let referenced = upload_sample(&harness, "kept.jpg").await;
    let doomed = upload_sample(&harness, "doomed.jpg").await;
    save_settings_with_hero(&harness, "Night Watch", referenced).await;

    let report = harness.integrity.handle_file_delete(&doomed).await.unwrap();
    assert!(!report.settings_reset);

    let after = harness.settings.get_settings().await.unwrap();
    assert_eq!(after.hero.file_id, Some(referenced));
}

#[actix_rt::test]
async fn file_delete_clears_every_owner_of_the_dependent_hero() {
    let harness = TestHarness::new();
    let file_id = upload_sample(&harness, "shared.jpg").await;
    let hero = harness.seed_hero(file_id).await;
    let other_hero = Uuid::new_v4();

    let a = harness.seed_podcast("Podcast A", Some(hero.id)).await;
    let b = harness.seed_podcast("Podcast B", Some(hero.id)).await;
    let untouched = harness.seed_podcast("Podcast C", Some(other_hero)).await;
    let episode = harness.seed_episode(a.id, "Episode 1", Some(hero.id)).await;

    let report = harness
        .integrity
        .handle_file_delete(&file_id)
        .await
        .unwrap();
    assert_eq!(report.podcasts_cleared, 2);
    assert_eq!(report.episodes_cleared, 1);

    assert_eq!(harness.podcasts.get(&a.id).await.unwrap().unwrap().hero_image_id, None);
    assert_eq!(harness.podcasts.get(&b.id).await.unwrap().unwrap().hero_image_id, None);
    assert_eq!(
        harness.podcasts.get(&untouched.id).await.unwrap().unwrap().hero_image_id,
        Some(other_hero)
    );
    assert_eq!(
        harness.episodes.get(&episode.id).await.unwrap().unwrap().hero_image_id,
        None
    );
}

#[actix_rt::test]
async fn hero_image_delete_clears_only_matching_owners() {
    let harness = TestHarness::new();
    let file_id = upload_sample(&harness, "hero.jpg").await;
    let hero = harness.seed_hero(file_id).await;
    let other_hero = Uuid::new_v4();

    let a = harness.seed_podcast("Podcast A", Some(hero.id)).await;
    let b = harness.seed_podcast("Podcast B", Some(other_hero)).await;
    let e1 = harness.seed_episode(a.id, "One", Some(hero.id)).await;
    let e2 = harness.seed_episode(a.id, "Two", Some(other_hero)).await;

    let report = harness
        .integrity
        .handle_hero_image_delete(&hero.id)
        .await
        .unwrap();
    assert_eq!(report.podcasts_cleared, 1);
    assert_eq!(report.episodes_cleared, 1);

    assert_eq!(harness.podcasts.get(&a.id).await.unwrap().unwrap().hero_image_id, None);
    assert_eq!(
        harness.podcasts.get(&b.id).await.unwrap().unwrap().hero_image_id,
        Some(other_hero)
    );
    assert_eq!(harness.episodes.get(&e1.id).await.unwrap().unwrap().hero_image_id, None);
    assert_eq!(
        harness.episodes.get(&e2.id).await.unwrap().unwrap().hero_image_id,
        Some(other_hero)
    );
}

#[actix_rt::test]
async fn reset_sweeps_are_idempotent() {
    let harness = TestHarness::new();
    let file_id = upload_sample(&harness, "hero.jpg").await;
    let hero = harness.seed_hero(file_id).await;
    harness.seed_podcast("Podcast A", Some(hero.id)).await;
    save_settings_with_hero(&harness, "Night Watch", file_id).await;

    let first = harness
        .integrity
        .handle_file_delete(&file_id)
        .await
        .unwrap();
    assert!(first.settings_reset);
    assert_eq!(first.podcasts_cleared, 1);

    // Nothing left to change: the second sweep reports a no-op.
    let second = harness
        .integrity
        .handle_file_delete(&file_id)
        .await
        .unwrap();
    assert_eq!(second, IntegrityReport::default());
}

#[actix_rt::test]
async fn hero_delete_for_missing_row_still_sweeps_owners() {
    let harness = TestHarness::new();
    let ghost = Uuid::new_v4();
    let podcast = harness.seed_podcast("Stale", Some(ghost)).await;

    let report = harness
        .integrity
        .handle_hero_image_delete(&ghost)
        .await
        .unwrap();
    assert_eq!(report.podcasts_cleared, 1);
    assert!(!report.settings_reset);
    assert_eq!(
        harness.podcasts.get(&podcast.id).await.unwrap().unwrap().hero_image_id,
        None
    );
}

#[actix_rt::test]
async fn partial_failure_still_attempts_remaining_steps() {
    let harness = TestHarness::new();
    let file_id = upload_sample(&harness, "hero.jpg").await;
    let hero = harness.seed_hero(file_id).await;
    let podcast = harness.seed_podcast("Podcast A", Some(hero.id)).await;
    let episode = harness.seed_episode(podcast.id, "One", Some(hero.id)).await;

    harness.podcasts.fail_clear.store(true, Ordering::Relaxed);

    let err = harness
        .integrity
        .handle_hero_image_delete(&hero.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InternalError(_)));

    // The episode sweep ran despite the podcast one failing.
    assert_eq!(
        harness.episodes.get(&episode.id).await.unwrap().unwrap().hero_image_id,
        None
    );
    assert_eq!(
        harness.podcasts.get(&podcast.id).await.unwrap().unwrap().hero_image_id,
        Some(hero.id)
    );
}

#[actix_rt::test]
async fn resolved_settings_fall_back_on_dangling_hero_reference() {
    let harness = TestHarness::new();
    let ghost_file = Uuid::new_v4();
    save_settings_with_hero(&harness, "Night Watch", ghost_file).await;

    let resolved = harness.settings.get_settings_resolved().await.unwrap();
    assert_eq!(resolved.title, "Night Watch");
    assert!(resolved.hero_is_default());

    // The fallback is read-side only; the stored document is untouched.
    let raw = harness.settings.get_settings().await.unwrap();
    assert_eq!(raw.hero.file_id, Some(ghost_file));
}

#[actix_rt::test]
async fn saving_settings_mirrors_title_into_manifest() {
    let harness = TestHarness::new();
    let mut settings = SiteSettings::default();
    settings.title = "Night Watch".to_string();
    harness.settings.save_settings(settings).await.unwrap();

    let manifest = harness.store.read("manifest.webmanifest").await.unwrap();
    let manifest: serde_json::Value = serde_json::from_slice(&manifest).unwrap();
    assert_eq!(manifest["name"], "Night Watch");
    assert_eq!(manifest["short_name"], "Night Watch");
}

#[actix_rt::test]
async fn system_variables_cannot_be_deleted() {
    let harness = TestHarness::new();
    harness
        .settings
        .save_settings(SiteSettings::default())
        .await
        .unwrap();

    let row = harness
        .variables
        .get_by_name("system.site_settings")
        .await
        .unwrap()
        .expect("settings row");
    let err = harness.variables.delete(&row.id).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}
