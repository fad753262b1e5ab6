use crate::error::ApiError;
use crate::job_controller::state::AppState;
use crate::review::StatusCounts;
use crate::services::guard;
use actix_web::{web, HttpResponse};
use common::model::job::{CsvJob, JobSummary};
use common::model::user::User;

/// Loads a job the user may see. Unreleased jobs do not exist for interns.
pub(super) async fn load_job(state: &AppState, user: &User, job_id: &str) -> Result<CsvJob, ApiError> {
    let job = state.store.lock().await.get_job(job_id)?;
    match job {
        Some(job) if user.is_admin() || job.is_released() => Ok(job),
        _ => Err(ApiError::NotFound(format!("Job {} not found", job_id))),
    }
}

async fn visible_jobs(state: &AppState, user: &User) -> Result<Vec<CsvJob>, ApiError> {
    let jobs = state.store.lock().await.list_jobs()?;
    Ok(jobs
        .into_iter()
        .filter(|job| user.is_admin() || job.is_released())
        .collect())
}

pub async fn list_jobs(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let user = guard::current_user(&state).await?;
    let summaries: Vec<JobSummary> = visible_jobs(&state, &user)
        .await?
        .iter()
        .map(JobSummary::from)
        .collect();
    Ok(HttpResponse::Ok().json(summaries))
}

pub async fn job_stats(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let user = guard::current_user(&state).await?;
    let jobs = visible_jobs(&state, &user).await?;
    Ok(HttpResponse::Ok().json(StatusCounts::tally(&jobs)))
}

pub async fn get_job(
    state: web::Data<AppState>,
    job_id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user = guard::current_user(&state).await?;
    let job = load_job(&state, &user, &job_id).await?;
    if user.is_admin() {
        Ok(HttpResponse::Ok().json(job))
    } else {
        Ok(HttpResponse::Ok().json(JobSummary::from(&job)))
    }
}
