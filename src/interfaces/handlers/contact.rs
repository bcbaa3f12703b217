use std::collections::HashMap;

use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    entities::contact::NewContactMessageRequest,
    errors::AppError,
    handlers::hard_delete_flag,
    AppState,
};

#[instrument(skip(state, data))]
pub async fn submit_message(
    state: web::Data<AppState>,
    data: web::Json<NewContactMessageRequest>,
) -> Result<impl Responder, AppError> {
    let response = state.contact_handler.submit_message(data.into_inner()).await?;
    Ok(HttpResponse::Created().json(response))
}

#[instrument(skip(state))]
pub async fn list_messages(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let response = state.contact_handler.list_messages().await?;
    Ok(HttpResponse::Ok().json(response))
}

#[instrument(skip(state, message_id))]
pub async fn read_message(
    message_id: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let message = state.contact_handler.read_message(&message_id).await?;
    Ok(HttpResponse::Ok().json(message))
}

#[instrument(skip(state, message_id, query))]
pub async fn delete_message(
    message_id: web::Path<Uuid>,
    state: web::Data<AppState>,
    query: web::Query<HashMap<String, String>>,
) -> Result<impl Responder, AppError> {
    let hard_delete = hard_delete_flag(&query);
    state.contact_handler.delete_message(&message_id, hard_delete).await?;
    Ok(HttpResponse::NoContent().finish())
}
