use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{entities::profile::UpsertProfileRequest, errors::AppError, AppState};

#[instrument(skip(state))]
pub async fn get_profile(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let profile = state.profile_handler.get_profile().await?;
    Ok(HttpResponse::Ok().json(profile))
}

#[instrument(skip(state, data))]
pub async fn upsert_profile(
    state: web::Data<AppState>,
    data: web::Json<UpsertProfileRequest>,
) -> Result<impl Responder, AppError> {
    let profile = state.profile_handler.upsert_profile(data.into_inner()).await?;
    Ok(HttpResponse::Ok().json(profile))
}
