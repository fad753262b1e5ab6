use crate::error::ApiError;
use crate::job_controller::state::AppState;
use crate::services::guard;
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use common::requests::UploadOutcome;
use futures_util::StreamExt;
use log::warn;

/// HTTP handler for `POST /api/jobs/upload`.
///
/// Every `file` field is read completely, then parsed and saved on its own.
/// A file that fails (wrong extension, not UTF-8, empty) is reported in its
/// outcome and does not affect the other files of the request.
pub async fn process(
    state: web::Data<AppState>,
    mut payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    guard::require_admin(&state).await?;

    let mut outcomes = Vec::new();
    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| ApiError::BadRequest(e.to_string()))?;
        let field_name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));
        if field_name.as_deref() != Some("file") {
            continue;
        }

        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename().map(|f| f.to_string()))
            .unwrap_or_default();

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| ApiError::BadRequest(e.to_string()))?;
            bytes.extend_from_slice(&chunk);
        }

        outcomes.push(save_upload(&state, file_name, bytes).await);
    }

    if outcomes.is_empty() {
        return Err(ApiError::BadRequest("Missing file".to_string()));
    }
    Ok(HttpResponse::Ok().json(outcomes))
}

async fn save_upload(state: &AppState, file_name: String, bytes: Vec<u8>) -> UploadOutcome {
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(_) => return failed(file_name, "File is not valid UTF-8".to_string()),
    };

    let created = state
        .store
        .lock()
        .await
        .create_job_from_csv(&file_name, &text, Utc::now());

    match created {
        Ok(job) => UploadOutcome {
            file_name,
            job_id: Some(job.id),
            rows: Some(job.total_rows),
            error: None,
        },
        Err(e) => {
            warn!("Upload of {} failed: {}", file_name, e);
            failed(file_name, e.to_string())
        }
    }
}

fn failed(file_name: String, error: String) -> UploadOutcome {
    UploadOutcome {
        file_name,
        job_id: None,
        rows: None,
        error: Some(error),
    }
}
