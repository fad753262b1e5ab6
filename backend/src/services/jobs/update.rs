use crate::error::ApiError;
use crate::job_controller::state::AppState;
use crate::services::guard;
use crate::services::jobs::list::load_job;
use actix_web::{web, HttpResponse};
use common::model::job::JobSummary;
use common::requests::{UpdateColumnsRequest, UpdateFlagsRequest};

fn not_found(job_id: &str) -> ApiError {
    ApiError::NotFound(format!("Job {} not found", job_id))
}

/// `PUT /api/jobs/{job_id}/columns`, admin only. Returns the saved job.
pub async fn set_columns(
    state: web::Data<AppState>,
    job_id: web::Path<String>,
    payload: web::Json<UpdateColumnsRequest>,
) -> Result<HttpResponse, ApiError> {
    guard::require_admin(&state).await?;
    let job = state
        .store
        .lock()
        .await
        .set_visible_columns(&job_id, payload.into_inner().visible_columns)?
        .ok_or_else(|| not_found(&job_id))?;
    Ok(HttpResponse::Ok().json(job))
}

/// `PUT /api/jobs/{job_id}/flags`. Interns may only flag released jobs.
/// Returns the job summary with recomputed progress and status.
pub async fn set_flags(
    state: web::Data<AppState>,
    job_id: web::Path<String>,
    payload: web::Json<UpdateFlagsRequest>,
) -> Result<HttpResponse, ApiError> {
    let user = guard::current_user(&state).await?;
    load_job(&state, &user, &job_id).await?;

    let job = state
        .store
        .lock()
        .await
        .set_flags(&job_id, payload.into_inner().flags)?
        .ok_or_else(|| not_found(&job_id))?;
    Ok(HttpResponse::Ok().json(JobSummary::from(&job)))
}

/// `DELETE /api/jobs/{job_id}`, admin only.
pub async fn delete_job(
    state: web::Data<AppState>,
    job_id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    guard::require_admin(&state).await?;
    if state.store.lock().await.delete_job(&job_id)? {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(not_found(&job_id))
    }
}
