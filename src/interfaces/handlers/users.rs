use std::collections::HashMap;

use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    entities::user::{AssignRolesRequest, NewRoleRequest, NewUserRequest},
    errors::AppError,
    handlers::hard_delete_flag,
    AppState,
};

#[instrument(skip(state, data))]
pub async fn create_user(
    state: web::Data<AppState>,
    data: web::Json<NewUserRequest>,
) -> Result<impl Responder, AppError> {
    let user = state.user_handler.create_user(data.into_inner()).await?;
    Ok(HttpResponse::Created().json(user))
}

#[instrument(skip(state))]
pub async fn list_users(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let response = state.user_handler.list_users().await?;
    Ok(HttpResponse::Ok().json(response))
}

#[instrument(skip(state, user_id))]
pub async fn get_user(
    user_id: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let user = state.user_handler.get_user(&user_id).await?;
    Ok(HttpResponse::Ok().json(user))
}

#[instrument(skip(state, user_id, query))]
pub async fn delete_user(
    user_id: web::Path<Uuid>,
    state: web::Data<AppState>,
    query: web::Query<HashMap<String, String>>,
) -> Result<impl Responder, AppError> {
    let hard_delete = hard_delete_flag(&query);
    state.user_handler.delete_user(&user_id, hard_delete).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[instrument(skip(state))]
pub async fn list_roles(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let roles = state.user_handler.list_roles().await?;
    Ok(HttpResponse::Ok().json(roles))
}

#[instrument(skip(state, data))]
pub async fn create_role(
    state: web::Data<AppState>,
    data: web::Json<NewRoleRequest>,
) -> Result<impl Responder, AppError> {
    let role = state.user_handler.create_role(data.into_inner()).await?;
    Ok(HttpResponse::Created().json(role))
}

#[instrument(skip(state, user_id, data))]
pub async fn assign_roles(
    user_id: web::Path<Uuid>,
    state: web::Data<AppState>,
    data: web::Json<AssignRolesRequest>,
) -> Result<impl Responder, AppError> {
    let response = state
        .user_handler
        .assign_roles(&user_id, &data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(response))
}
