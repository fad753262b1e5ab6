use crate::error::ApiError;
use crate::job_controller::state::AppState;
use crate::services::guard;
use actix_web::{web, HttpResponse};
use common::requests::RawFileQuery;

pub async fn keys(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    guard::require_admin(&state).await?;
    let keys = state.store.lock().await.list_storage_keys()?;
    Ok(HttpResponse::Ok().json(keys))
}

pub async fn raw(
    state: web::Data<AppState>,
    query: web::Query<RawFileQuery>,
) -> Result<HttpResponse, ApiError> {
    guard::require_admin(&state).await?;
    match state.store.lock().await.read_raw(&query.path)? {
        Some(content) => Ok(HttpResponse::Ok()
            .content_type("text/plain; charset=utf-8")
            .body(content)),
        None => Err(ApiError::NotFound(format!("No file at {}", query.path))),
    }
}
