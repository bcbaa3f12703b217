use std::collections::HashMap;
use std::str::FromStr;

use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    entities::content_status::{ContentStatus, SetStatusRequest},
    entities::project::{
        AttachImageRequest, MoveImageRequest, NewProjectRequest, ReorderImagesRequest,
        UpdateProjectRequest,
    },
    errors::AppError,
    handlers::{hard_delete_flag, pagination},
    repositories::project::ProjectListFilter,
    AppState,
};

#[instrument(skip(state, data))]
pub async fn create_project(
    state: web::Data<AppState>,
    data: web::Json<NewProjectRequest>,
) -> Result<impl Responder, AppError> {
    let project = state.project_handler.create_project(data.into_inner()).await?;
    Ok(HttpResponse::Created().json(project))
}

#[instrument(skip(state, query))]
pub async fn list_projects(
    state: web::Data<AppState>,
    query: web::Query<HashMap<String, String>>,
) -> Result<impl Responder, AppError> {
    let (page, per_page) = pagination(&query);

    let status = match query.get("status") {
        Some(raw) => Some(ContentStatus::from_str(raw).map_err(AppError::InvalidInput)?),
        None => None,
    };

    let filter = ProjectListFilter {
        query: query.get("q").filter(|q| !q.trim().is_empty()).cloned(),
        status,
        technology: query.get("technology").filter(|t| !t.trim().is_empty()).cloned(),
        page,
        per_page,
    };

    let projects = state.project_handler.list_projects(filter).await?;
    Ok(HttpResponse::Ok().json(projects))
}

#[instrument(skip(state, project_id))]
pub async fn get_project(
    project_id: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let project = state.project_handler.get_project(&project_id).await?;
    Ok(HttpResponse::Ok().json(project))
}

#[instrument(skip(state, project_id, data))]
pub async fn update_project(
    project_id: web::Path<Uuid>,
    state: web::Data<AppState>,
    data: web::Json<UpdateProjectRequest>,
) -> Result<impl Responder, AppError> {
    let updated = state
        .project_handler
        .update_project(&project_id, &data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(updated))
}

#[instrument(skip(state, project_id, data))]
pub async fn set_project_status(
    project_id: web::Path<Uuid>,
    state: web::Data<AppState>,
    data: web::Json<SetStatusRequest>,
) -> Result<impl Responder, AppError> {
    let project = state
        .project_handler
        .set_project_status(&project_id, data.status)
        .await?;
    Ok(HttpResponse::Ok().json(project))
}

#[instrument(skip(state, project_id, query))]
pub async fn delete_project(
    project_id: web::Path<Uuid>,
    state: web::Data<AppState>,
    query: web::Query<HashMap<String, String>>,
) -> Result<impl Responder, AppError> {
    let hard_delete = hard_delete_flag(&query);
    state.project_handler.delete_project(&project_id, hard_delete).await?;
    Ok(HttpResponse::NoContent().finish())
}

// ───── Gallery ──────────────────────────────────────────────────────

#[instrument(skip(state, project_id, data))]
pub async fn attach_image(
    project_id: web::Path<Uuid>,
    state: web::Data<AppState>,
    data: web::Json<AttachImageRequest>,
) -> Result<impl Responder, AppError> {
    let gallery = state
        .project_handler
        .attach_image(&project_id, data.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(gallery))
}

#[instrument(skip(state, path))]
pub async fn remove_image(
    path: web::Path<(Uuid, Uuid)>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let (project_id, image_id) = path.into_inner();
    let gallery = state.project_handler.remove_image(&project_id, &image_id).await?;
    Ok(HttpResponse::Ok().json(gallery))
}

#[instrument(skip(state, project_id, data))]
pub async fn move_image(
    project_id: web::Path<Uuid>,
    state: web::Data<AppState>,
    data: web::Json<MoveImageRequest>,
) -> Result<impl Responder, AppError> {
    let gallery = state
        .project_handler
        .move_image(&project_id, &data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(gallery))
}

#[instrument(skip(state, project_id, data))]
pub async fn reorder_images(
    project_id: web::Path<Uuid>,
    state: web::Data<AppState>,
    data: web::Json<ReorderImagesRequest>,
) -> Result<impl Responder, AppError> {
    let gallery = state
        .project_handler
        .reorder_images(&project_id, &data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(gallery))
}
