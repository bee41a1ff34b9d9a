use std::collections::HashMap;

use actix_web::{delete, get, post, web, HttpResponse, Responder};
use tracing::instrument;
use uuid::Uuid;

use crate::{entities::hero_image::NewHeroImage, errors::AppError, AppState};

#[instrument(skip(state, data))]
#[post("/hero-images")]
pub async fn create_hero_image(
    state: web::Data<AppState>,
    data: web::Json<NewHeroImage>,
) -> Result<impl Responder, AppError> {
    let created = state.hero_image_handler.create(data.into_inner()).await?;
    Ok(HttpResponse::Created().json(created))
}

/// Lists hero images, or looks one up when exactly one of `podcast_id`,
/// `episode_id`, `file_id` is supplied as a query parameter.
#[instrument(skip(state, query))]
#[get("/hero-images")]
pub async fn find_hero_images(
    state: web::Data<AppState>,
    query: web::Query<HashMap<String, String>>,
) -> Result<impl Responder, AppError> {
    let handler = &state.hero_image_handler;

    let lookup = [
        ("podcast_id", query.get("podcast_id")),
        ("episode_id", query.get("episode_id")),
        ("file_id", query.get("file_id")),
    ];
    let mut supplied = lookup.iter().filter(|(_, v)| v.is_some());

    let Some((key, Some(raw))) = supplied.next() else {
        let all = handler.list().await?;
        return Ok(HttpResponse::Ok().json(all));
    };
    if supplied.next().is_some() {
        return Err(AppError::Conflict(
            "Supply at most one of podcast_id, episode_id, file_id".into(),
        ));
    }

    let id = Uuid::parse_str(raw)
        .map_err(|_| AppError::NotFound(format!("Invalid {}: {}", key, raw)))?;
    let found = match *key {
        "podcast_id" => handler.get_by_podcast_id(&id).await?,
        "episode_id" => handler.get_by_episode_id(&id).await?,
        _ => handler.get_by_file_id(&id).await?,
    };

    let hero = found.ok_or_else(|| AppError::NotFound("Hero image record".into()))?;
    Ok(HttpResponse::Ok().json(hero))
}

/// URL-only read path: the derived variant URL set for a file, without
/// touching any encoded bytes.
#[instrument(skip(state))]
#[get("/hero-images/urls/{file_id}")]
pub async fn get_hero_image_urls(
    state: web::Data<AppState>,
    file_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let urls = state
        .hero_image_handler
        .get_optimized_image_urls(&file_id)
        .await?
        .ok_or_else(|| AppError::FileNotFound(file_id.to_string()))?;
    Ok(HttpResponse::Ok().json(urls))
}

#[instrument(skip(state))]
#[get("/hero-images/{id}")]
pub async fn get_hero_image(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let hero = state
        .hero_image_handler
        .get(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Hero image record".into()))?;
    Ok(HttpResponse::Ok().json(hero))
}

#[instrument(skip(state))]
#[delete("/hero-images/{id}")]
pub async fn delete_hero_image(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    state.hero_image_handler.delete(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}
