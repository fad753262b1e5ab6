use crate::error::ApiError;
use crate::job_controller::state::AppState;
use common::model::user::{Role, User};

/// The logged-in user, or `401` when nobody is.
pub(crate) async fn current_user(state: &AppState) -> Result<User, ApiError> {
    state
        .store
        .lock()
        .await
        .current_user()?
        .ok_or(ApiError::Unauthorized)
}

/// The logged-in user when they are an admin, `403` otherwise.
pub(crate) async fn require_admin(state: &AppState) -> Result<User, ApiError> {
    let user = current_user(state).await?;
    if !user.is_admin() {
        return Err(ApiError::Forbidden(Role::Admin));
    }
    Ok(user)
}
