
use uuid::Uuid;

use podcast_cms_backend::entities::file_metadata::FileUpload;
use podcast_cms_backend::entities::hero_image::{
    hero_variant_storage_path, HeroSize, NewHeroImage, PLACEHOLDER_SIZE,
};
use podcast_cms_backend::errors::AppError;
use podcast_cms_backend::repositories::podcast::PodcastRepository;
use podcast_cms_backend::repositories::repository::Repository;

use test_repos::{sample_jpeg, sample_wav_one_second, TestHarness};

fn new_hero_request(file_id: Uuid, podcast_id: Option<Uuid>) -> NewHeroImage {
    serde_json::from_value(serde_json::json!({
        "name": "Season banner",
        "fileId": file_id,
        "podcastId": podcast_id,
    }))
    .expect("valid request")
}

#[actix_rt::test]
async fn upload_records_intrinsic_image_metadata() {
    let harness = TestHarness::new();
    let file = harness
        .file_handler
        .upload(FileUpload {
            name: "cover.jpg".into(),
            bytes: sample_jpeg(400, 300),
        })
        .await
        .unwrap();

    assert_eq!(file.mime_type, "image/jpeg");
    assert_eq!(file.extension, "jpg");
    assert_eq!(file.width, Some(400));
    assert_eq!(file.height, Some(300));
    assert_eq!(file.duration_seconds, None);
    assert_eq!(file.url, format!("/api/files/{}", file.id));
    assert!(file.storage_path.ends_with(&format!("{}.jpg", file.id)));
    assert!(harness.store.exists(&file.storage_path).await.unwrap());
}

#[actix_rt::test]
async fn upload_records_audio_duration() {
    let harness = TestHarness::new();
    let file = harness
        .file_handler
        .upload(FileUpload {
            name: "tone.wav".into(),
            bytes: sample_wav_one_second(),
        })
        .await
        .unwrap();

    assert_eq!(file.width, None);
    let duration = file.duration_seconds.expect("duration probed");
    assert!((0.9..=1.1).contains(&duration), "duration was {}", duration);
}

#[actix_rt::test]
async fn upload_rejects_bad_requests() {
    let harness = TestHarness::new();

    let err = harness
        .file_handler
        .upload(FileUpload { name: "noext".into(), bytes: sample_jpeg(10, 10) })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::FileUpload(_)));

    let err = harness
        .file_handler
        .upload(FileUpload { name: "tool.exe".into(), bytes: vec![0; 16] })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::FileUpload(_)));

    // Declared audio, actually a JPEG
    let err = harness
        .file_handler
        .upload(FileUpload { name: "track.mp3".into(), bytes: sample_jpeg(10, 10) })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::FileUpload(_)));

    let err = harness
        .file_handler
        .upload(FileUpload { name: "big.jpg".into(), bytes: vec![0; 11 * 1024 * 1024] })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::FileUpload(_)));
}

#[actix_rt::test]
async fn hero_creation_materializes_every_variant() {
    let harness = TestHarness::new();
    let file = harness
        .file_handler
        .upload(FileUpload {
            name: "hero.jpg".into(),
            bytes: sample_jpeg(1600, 1200),
        })
        .await
        .unwrap();

    let created = harness
        .hero_handler
        .create(new_hero_request(file.id, None))
        .await
        .unwrap();

    assert_eq!(created.images.len(), HeroSize::all().len());
    for variant in &created.images {
        assert!(variant.width <= 1600, "{} upscaled", variant.size);
    }
    assert!(created.placeholder.starts_with("data:image/webp;base64,"));

    for size in HeroSize::all() {
        for ext in ["webp", "jpg"] {
            let path = hero_variant_storage_path(file.id, size.as_str(), ext);
            assert!(
                harness.store.exists(&path).await.unwrap(),
                "missing variant {}",
                path
            );
        }
    }
    let placeholder = hero_variant_storage_path(file.id, PLACEHOLDER_SIZE, "webp");
    assert!(harness.store.exists(&placeholder).await.unwrap());
}

#[actix_rt::test]
async fn hero_creation_fails_cleanly_when_file_is_missing() {
    let harness = TestHarness::new();
    let err = harness
        .hero_handler
        .create(new_hero_request(Uuid::new_v4(), None))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::FileNotFound(_)));
    assert!(harness.heroes.list().await.unwrap().is_empty());
}

#[actix_rt::test]
async fn hero_creation_rejects_two_owners() {
    let harness = TestHarness::new();
    let file = harness
        .file_handler
        .upload(FileUpload { name: "hero.jpg".into(), bytes: sample_jpeg(64, 64) })
        .await
        .unwrap();

    let request: NewHeroImage = serde_json::from_value(serde_json::json!({
        "name": "Season banner",
        "fileId": file.id,
        "podcastId": Uuid::new_v4(),
        "episodeId": Uuid::new_v4(),
    }))
    .unwrap();

    let err = harness.hero_handler.create(request).await.unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
}

#[actix_rt::test]
async fn hero_lifecycle_end_to_end() {
    let harness = TestHarness::new();
    let podcast = harness.seed_podcast("Night Watch", None).await;

    let file = harness
        .file_handler
        .upload(FileUpload {
            name: "hero.jpg".into(),
            bytes: sample_jpeg(1600, 1200),
        })
        .await
        .unwrap();

    let created = harness
        .hero_handler
        .create(new_hero_request(file.id, Some(podcast.id)))
        .await
        .unwrap();
    let hero_id = created.hero_image.id;

    harness
        .podcasts
        .set_hero_image(&podcast.id, Some(hero_id))
        .await
        .unwrap();

    let found = harness
        .hero_handler
        .get_by_podcast_id(&podcast.id)
        .await
        .unwrap();
    assert_eq!(found.map(|h| h.id), Some(hero_id));

    harness.hero_handler.delete(&hero_id).await.unwrap();

    assert!(harness.hero_handler.get(&hero_id).await.unwrap().is_none());
    assert_eq!(
        harness.podcasts.get(&podcast.id).await.unwrap().unwrap().hero_image_id,
        None
    );
    // The underlying file and its variants survive a hero delete.
    assert!(harness.store.exists(&file.storage_path).await.unwrap());
    let xs_path = hero_variant_storage_path(file.id, "xs", "webp");
    assert!(harness.store.exists(&xs_path).await.unwrap());
}

#[actix_rt::test]
async fn file_delete_removes_blob_variants_and_row() {
    let harness = TestHarness::new();
    let file = harness
        .file_handler
        .upload(FileUpload {
            name: "hero.jpg".into(),
            bytes: sample_jpeg(400, 300),
        })
        .await
        .unwrap();
    let hero = harness
        .hero_handler
        .create(new_hero_request(file.id, None))
        .await
        .unwrap();

    let report = harness.file_handler.delete(&file.id).await.unwrap();
    assert!(report.failures.is_empty(), "{:?}", report.failures);
    // 6 sizes in two formats plus the placeholder
    assert_eq!(report.variants_deleted, 13);
    assert!(report.blob_deleted);
    assert!(report.row_deleted);
    assert!(report.directory_pruned);

    assert!(harness.files.get(&file.id).await.unwrap().is_none());
    assert!(!harness.store.exists(&file.storage_path).await.unwrap());

    // The hero row outlives the file; deleting it is a separate call.
    assert!(harness
        .heroes
        .get(&hero.hero_image.id)
        .await
        .unwrap()
        .is_some());
}

#[actix_rt::test]
async fn optimized_urls_resolve_only_for_existing_files() {
    let harness = TestHarness::new();
    let file = harness
        .file_handler
        .upload(FileUpload {
            name: "hero.jpg".into(),
            bytes: sample_jpeg(500, 400),
        })
        .await
        .unwrap();

    let set = harness
        .hero_handler
        .get_optimized_image_urls(&file.id)
        .await
        .unwrap()
        .expect("urls for existing file");
    let sm = set.images.iter().find(|v| v.size == "sm").unwrap();
    assert_eq!(sm.width, 500);
    assert_eq!(
        set.placeholder,
        format!("/api/files/optimized/{}/hero/placeholder.webp", file.id)
    );

    assert!(harness
        .hero_handler
        .get_optimized_image_urls(&Uuid::new_v4())
        .await
        .unwrap()
        .is_none());
}

#[actix_rt::test]
async fn resize_is_deterministic_and_cached() {
    let harness = TestHarness::new();
    let file = harness
        .file_handler
        .upload(FileUpload {
            name: "photo.jpg".into(),
            bytes: sample_jpeg(400, 300),
        })
        .await
        .unwrap();

    let first = harness.file_handler.resize(&file.id, 200, 150).await.unwrap();
    assert!(first.ends_with(&format!("{}-200x150.webp", file.id)));
    assert!(harness.store.exists(&first).await.unwrap());

    let second = harness.file_handler.resize(&file.id, 200, 150).await.unwrap();
    assert_eq!(first, second);

    let bytes = harness.store.read(&first).await.unwrap();
    let img = image::load_from_memory(&bytes).unwrap();
    assert!(img.width() <= 200 && img.height() <= 150);
}

#[actix_rt::test]
async fn resize_rejects_non_raster_content_and_bad_dimensions() {
    let harness = TestHarness::new();
    let pdf = harness
        .file_handler
        .upload(FileUpload {
            name: "notes.pdf".into(),
            bytes: b"%PDF-1.4\n1 0 obj\n<<>>\nendobj\n".to_vec(),
        })
        .await
        .unwrap();

    let err = harness.file_handler.resize(&pdf.id, 100, 100).await.unwrap_err();
    assert!(matches!(err, AppError::FileUpload(_)));

    let photo = harness
        .file_handler
        .upload(FileUpload {
            name: "photo.jpg".into(),
            bytes: sample_jpeg(40, 30),
        })
        .await
        .unwrap();
    let err = harness.file_handler.resize(&photo.id, 0, 100).await.unwrap_err();
    assert!(matches!(err, AppError::FileUpload(_)));
    let err = harness
        .file_handler
        .resize(&photo.id, 100, 20_000)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::FileUpload(_)));
}
