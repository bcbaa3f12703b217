use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    entities::{
        education::{NewEducationRequest, UpdateEducationRequest},
        experience::{NewWorkExperienceRequest, UpdateWorkExperienceRequest},
        skill::{NewSkillRequest, UpdateSkillRequest},
    },
    errors::AppError,
    AppState,
};

// ───── Skills ───────────────────────────────────────────────────────

#[instrument(skip(state, data))]
pub async fn create_skill(
    state: web::Data<AppState>,
    data: web::Json<NewSkillRequest>,
) -> Result<impl Responder, AppError> {
    let skill = state.resume_handler.create_skill(data.into_inner()).await?;
    Ok(HttpResponse::Created().json(skill))
}

#[instrument(skip(state))]
pub async fn list_skills(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let skills = state.resume_handler.list_skills().await?;
    Ok(HttpResponse::Ok().json(skills))
}

#[instrument(skip(state, skill_id, data))]
pub async fn update_skill(
    skill_id: web::Path<Uuid>,
    state: web::Data<AppState>,
    data: web::Json<UpdateSkillRequest>,
) -> Result<impl Responder, AppError> {
    let skill = state
        .resume_handler
        .update_skill(&skill_id, &data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(skill))
}

#[instrument(skip(state, skill_id))]
pub async fn delete_skill(
    skill_id: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    state.resume_handler.delete_skill(&skill_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

// ───── Work experience ──────────────────────────────────────────────

#[instrument(skip(state, data))]
pub async fn create_experience(
    state: web::Data<AppState>,
    data: web::Json<NewWorkExperienceRequest>,
) -> Result<impl Responder, AppError> {
    let entry = state.resume_handler.create_experience(data.into_inner()).await?;
    Ok(HttpResponse::Created().json(entry))
}

#[instrument(skip(state))]
pub async fn list_experience(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let entries = state.resume_handler.list_experience().await?;
    Ok(HttpResponse::Ok().json(entries))
}

#[instrument(skip(state, entry_id, data))]
pub async fn update_experience(
    entry_id: web::Path<Uuid>,
    state: web::Data<AppState>,
    data: web::Json<UpdateWorkExperienceRequest>,
) -> Result<impl Responder, AppError> {
    let entry = state
        .resume_handler
        .update_experience(&entry_id, &data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(entry))
}

#[instrument(skip(state, entry_id))]
pub async fn delete_experience(
    entry_id: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    state.resume_handler.delete_experience(&entry_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

// ───── Education ────────────────────────────────────────────────────

#[instrument(skip(state, data))]
pub async fn create_education(
    state: web::Data<AppState>,
    data: web::Json<NewEducationRequest>,
) -> Result<impl Responder, AppError> {
    let entry = state.resume_handler.create_education(data.into_inner()).await?;
    Ok(HttpResponse::Created().json(entry))
}

#[instrument(skip(state))]
pub async fn list_education(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let entries = state.resume_handler.list_education().await?;
    Ok(HttpResponse::Ok().json(entries))
}

#[instrument(skip(state, entry_id, data))]
pub async fn update_education(
    entry_id: web::Path<Uuid>,
    state: web::Data<AppState>,
    data: web::Json<UpdateEducationRequest>,
) -> Result<impl Responder, AppError> {
    let entry = state
        .resume_handler
        .update_education(&entry_id, &data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(entry))
}

#[instrument(skip(state, entry_id))]
pub async fn delete_education(
    entry_id: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    state.resume_handler.delete_education(&entry_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
