use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    entities::taxonomy::{
        NewCategoryRequest, NewTagRequest, UpdateCategoryRequest, UpdateTagRequest,
    },
    errors::AppError,
    AppState,
};

#[instrument(skip(state, data))]
pub async fn create_category(
    state: web::Data<AppState>,
    data: web::Json<NewCategoryRequest>,
) -> Result<impl Responder, AppError> {
    let category = state.taxonomy_handler.create_category(data.into_inner()).await?;
    Ok(HttpResponse::Created().json(category))
}

#[instrument(skip(state))]
pub async fn list_categories(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let categories = state.taxonomy_handler.list_categories().await?;
    Ok(HttpResponse::Ok().json(categories))
}

#[instrument(skip(state, category_id, data))]
pub async fn update_category(
    category_id: web::Path<Uuid>,
    state: web::Data<AppState>,
    data: web::Json<UpdateCategoryRequest>,
) -> Result<impl Responder, AppError> {
    let category = state
        .taxonomy_handler
        .update_category(&category_id, &data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(category))
}

#[instrument(skip(state, category_id))]
pub async fn delete_category(
    category_id: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    state.taxonomy_handler.delete_category(&category_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[instrument(skip(state, data))]
pub async fn create_tag(
    state: web::Data<AppState>,
    data: web::Json<NewTagRequest>,
) -> Result<impl Responder, AppError> {
    let tag = state.taxonomy_handler.create_tag(data.into_inner()).await?;
    Ok(HttpResponse::Created().json(tag))
}

#[instrument(skip(state))]
pub async fn list_tags(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let tags = state.taxonomy_handler.list_tags().await?;
    Ok(HttpResponse::Ok().json(tags))
}

#[instrument(skip(state, tag_id, data))]
pub async fn update_tag(
    tag_id: web::Path<Uuid>,
    state: web::Data<AppState>,
    data: web::Json<UpdateTagRequest>,
) -> Result<impl Responder, AppError> {
    let tag = state
        .taxonomy_handler
        .update_tag(&tag_id, &data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(tag))
}

#[instrument(skip(state, tag_id))]
pub async fn delete_tag(
    tag_id: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    state.taxonomy_handler.delete_tag(&tag_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
