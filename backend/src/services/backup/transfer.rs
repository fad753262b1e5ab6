use crate::codec::backup::BackupDocument;
use crate::error::ApiError;
use crate::job_controller::state::AppState;
use crate::services::guard;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpResponse};
use chrono::Utc;

pub async fn export(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    guard::require_admin(&state).await?;
    let json = state.store.lock().await.export_backup()?.to_json_pretty()?;
    let file_name = format!("csv-review-backup-{}.json", Utc::now().format("%Y-%m-%d"));

    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(file_name)],
        })
        .body(json))
}

/// Takes the raw body so malformed JSON is reported the same way as a
/// document that fails validation.
pub async fn import(state: web::Data<AppState>, body: String) -> Result<HttpResponse, ApiError> {
    guard::require_admin(&state).await?;
    let doc = BackupDocument::from_json(&body)?;
    state.store.lock().await.import_backup(&doc)?;

    let jobs = doc.job_index.as_ref().map_or(0, Vec::len);
    Ok(HttpResponse::Ok().json(serde_json::json!({ "imported": true, "jobs": jobs })))
}
