use std::collections::HashMap;
use std::str::FromStr;

use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    entities::blog_post::{NewBlogPostRequest, UpdateBlogPostRequest},
    entities::content_status::{ContentStatus, SetStatusRequest},
    errors::AppError,
    handlers::{hard_delete_flag, pagination},
    repositories::blog_post::BlogPostListFilter,
    AppState,
};

#[instrument(skip(state, data))]
pub async fn create_blog_post(
    state: web::Data<AppState>,
    data: web::Json<NewBlogPostRequest>,
) -> Result<impl Responder, AppError> {
    let response = state.blog_handler.create_blog_post(data.into_inner()).await?;
    Ok(HttpResponse::Created().json(response))
}

#[instrument(skip(state, query))]
pub async fn list_blog_posts(
    state: web::Data<AppState>,
    query: web::Query<HashMap<String, String>>,
) -> Result<impl Responder, AppError> {
    let (page, per_page) = pagination(&query);

    let status = match query.get("status") {
        Some(raw) => Some(
            ContentStatus::from_str(raw).map_err(AppError::InvalidInput)?,
        ),
        None => None,
    };
    let category_id = match query.get("category_id") {
        Some(raw) => Some(
            Uuid::parse_str(raw)
                .map_err(|_| AppError::InvalidInput("category_id must be a UUID".into()))?,
        ),
        None => None,
    };

    let filter = BlogPostListFilter {
        query: query.get("q").filter(|q| !q.trim().is_empty()).cloned(),
        status,
        category_id,
        page,
        per_page,
    };

    let posts = state.blog_handler.list_blog_posts(filter).await?;
    Ok(HttpResponse::Ok().json(posts))
}

#[instrument(skip(state, post_id))]
pub async fn get_blog_post(
    post_id: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let post = state.blog_handler.get_blog_post(&post_id).await?;
    Ok(HttpResponse::Ok().json(post))
}

#[instrument(skip(state, post_id, data))]
pub async fn update_blog_post(
    post_id: web::Path<Uuid>,
    state: web::Data<AppState>,
    data: web::Json<UpdateBlogPostRequest>,
) -> Result<impl Responder, AppError> {
    let updated = state
        .blog_handler
        .update_blog_post(&post_id, &data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(updated))
}

#[instrument(skip(state, post_id, data))]
pub async fn set_blog_post_status(
    post_id: web::Path<Uuid>,
    state: web::Data<AppState>,
    data: web::Json<SetStatusRequest>,
) -> Result<impl Responder, AppError> {
    let post = state
        .blog_handler
        .set_blog_post_status(&post_id, data.status)
        .await?;
    Ok(HttpResponse::Ok().json(post))
}

#[instrument(skip(state, post_id, query))]
pub async fn delete_blog_post(
    post_id: web::Path<Uuid>,
    state: web::Data<AppState>,
    query: web::Query<HashMap<String, String>>,
) -> Result<impl Responder, AppError> {
    let hard_delete = hard_delete_flag(&query);
    state.blog_handler.delete_blog_post(&post_id, hard_delete).await?;
    Ok(HttpResponse::NoContent().finish())
}
