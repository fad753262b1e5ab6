use crate::error::ApiError;
use crate::job_controller::state::AppState;
use crate::services::guard;
use actix_web::{web, HttpResponse};
use common::requests::{LoginRequest, SessionUser};

pub async fn login(
    state: web::Data<AppState>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let user = state
        .store
        .lock()
        .await
        .authenticate(&payload.username, &payload.password)?;

    match user {
        Some(user) => Ok(HttpResponse::Ok().json(SessionUser::from(&user))),
        None => Err(ApiError::InvalidCredentials),
    }
}

pub async fn logout(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    state.store.lock().await.end_session()?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn me(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let user = guard::current_user(&state).await?;
    Ok(HttpResponse::Ok().json(SessionUser::from(&user)))
}
