use std::collections::HashMap;

use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    domain::navigation::{resolve_path, view_path},
    errors::AppError,
    AppState,
};

/// Resolve an admin URL path to its canonical view description. The
/// admin frontend calls this to restore state from a deep link.
#[instrument(skip(_state, query))]
pub async fn resolve_admin_path(
    _state: web::Data<AppState>,
    query: web::Query<HashMap<String, String>>,
) -> Result<impl Responder, AppError> {
    let path = query
        .get("path")
        .ok_or_else(|| AppError::InvalidInput("Missing 'path' query parameter".into()))?;

    match resolve_path(path) {
        Some(view) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "view": view,
            "canonical_path": view_path(&view),
        }))),
        None => Err(AppError::NotFound(format!("No admin view for path: {path}"))),
    }
}
