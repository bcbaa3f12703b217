use std::collections::HashMap;

use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    entities::comment::{ModerateCommentRequest, NewCommentRequest},
    errors::AppError,
    handlers::hard_delete_flag,
    AppState,
};

#[instrument(skip(state, post_id, data))]
pub async fn submit_comment(
    post_id: web::Path<Uuid>,
    state: web::Data<AppState>,
    data: web::Json<NewCommentRequest>,
) -> Result<impl Responder, AppError> {
    let comment = state
        .comment_handler
        .submit_comment(&post_id, data.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(comment))
}

#[instrument(skip(state, post_id, query))]
pub async fn list_comments(
    post_id: web::Path<Uuid>,
    state: web::Data<AppState>,
    query: web::Query<HashMap<String, String>>,
) -> Result<impl Responder, AppError> {
    // Admin moderation passes approved_only=false to see the queue.
    let approved_only = query.get("approved_only").map_or(true, |v| v != "false");
    let response = state.comment_handler.list_comments(&post_id, approved_only).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[instrument(skip(state, comment_id, data))]
pub async fn moderate_comment(
    comment_id: web::Path<Uuid>,
    state: web::Data<AppState>,
    data: web::Json<ModerateCommentRequest>,
) -> Result<impl Responder, AppError> {
    let comment = state
        .comment_handler
        .moderate_comment(&comment_id, data.is_approved)
        .await?;
    Ok(HttpResponse::Ok().json(comment))
}

#[instrument(skip(state, comment_id, query))]
pub async fn delete_comment(
    comment_id: web::Path<Uuid>,
    state: web::Data<AppState>,
    query: web::Query<HashMap<String, String>>,
) -> Result<impl Responder, AppError> {
    let hard_delete = hard_delete_flag(&query);
    state.comment_handler.delete_comment(&comment_id, hard_delete).await?;
    Ok(HttpResponse::NoContent().finish())
}
