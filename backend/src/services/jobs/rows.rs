use crate::error::ApiError;
use crate::job_controller::state::AppState;
use crate::review;
use crate::services::guard;
use crate::services::jobs::list::load_job;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpResponse};
use common::requests::PageQuery;

/// `GET /api/jobs/{job_id}/rows?page=N`: one page of rows for the reviewer.
pub async fn review_rows(
    state: web::Data<AppState>,
    job_id: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, ApiError> {
    let user = guard::current_user(&state).await?;
    let job = load_job(&state, &user, &job_id).await?;
    Ok(HttpResponse::Ok().json(review::review_page(&job, query.page)))
}

/// `GET /api/jobs/{job_id}/export`: downloads `<name>_flagged.csv`, admin only.
pub async fn export_csv(
    state: web::Data<AppState>,
    job_id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user = guard::require_admin(&state).await?;
    let job = load_job(&state, &user, &job_id).await?;
    let csv = state
        .store
        .lock()
        .await
        .export_flagged_csv(&job.id)?
        .ok_or_else(|| ApiError::NotFound(format!("Job {} not found", job.id)))?;

    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(format!("{}_flagged.csv", job.name))],
        })
        .body(csv))
}
