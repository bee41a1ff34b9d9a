use actix_web::{get, put, web, HttpResponse, Responder};
use tracing::instrument;

use crate::{entities::site_settings::SiteSettings, errors::AppError, AppState};

#[instrument(skip(state))]
#[get("/settings/site")]
pub async fn get_site_settings(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let settings = state.settings_handler.get_settings_resolved().await?;
    Ok(HttpResponse::Ok().json(settings))
}

#[instrument(skip(state, data))]
#[put("/settings/site")]
pub async fn update_site_settings(
    state: web::Data<AppState>,
    data: web::Json<SiteSettings>,
) -> Result<impl Responder, AppError> {
    let saved = state.settings_handler.save_settings(data.into_inner()).await?;
    Ok(HttpResponse::Ok().json(saved))
}
