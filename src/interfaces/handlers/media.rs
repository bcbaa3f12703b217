use std::collections::HashMap;

use actix_multipart::form::MultipartForm;
use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;
use uuid::Uuid;

use crate::{entities::media::MediaUploadForm, errors::AppError, AppState};

#[instrument(skip(state, form))]
pub async fn upload_media(
    state: web::Data<AppState>,
    MultipartForm(form): MultipartForm<MediaUploadForm>,
) -> Result<impl Responder, AppError> {
    let folder = form.folder.as_ref().map(|f| f.as_str());
    let original_name = form.file.file_name.as_deref();

    let asset = state
        .media_handler
        .upload(folder, original_name, form.file.file.path())
        .await?;

    Ok(HttpResponse::Created().json(asset))
}

#[instrument(skip(state, query))]
pub async fn list_media(
    state: web::Data<AppState>,
    query: web::Query<HashMap<String, String>>,
) -> Result<impl Responder, AppError> {
    let folder = query.get("folder").filter(|f| !f.trim().is_empty());
    let response = state.media_handler.list_assets(folder.map(String::as_str)).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[instrument(skip(state, asset_id))]
pub async fn get_media(
    asset_id: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let asset = state.media_handler.get_asset(&asset_id).await?;
    Ok(HttpResponse::Ok().json(asset))
}

#[instrument(skip(state, asset_id))]
pub async fn delete_media(
    asset_id: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    state.media_handler.delete_asset(&asset_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
