use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use tracing::instrument;

use crate::{domain::html_md::html_to_markdown, errors::AppError};

#[derive(Debug, Deserialize)]
pub struct ConvertHtmlRequest {
    pub html: String,
}

/// Convert legacy HTML content to Markdown. Used when migrating posts
/// authored before the Markdown editor existed.
#[instrument(skip(request))]
pub async fn convert_html_to_markdown(
    request: web::Json<ConvertHtmlRequest>,
) -> Result<impl Responder, AppError> {
    let markdown = html_to_markdown(&request.html);
    Ok(HttpResponse::Ok().json(serde_json::json!({ "markdown": markdown })))
}
