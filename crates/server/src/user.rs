//! User registration endpoint

use api_types::user::RegisterUser;
use axum::{Json, extract::State, http::StatusCode};

use crate::{ServerError, server::ServerState};

/// Creates a user. This is the only write that does not require
/// authentication.
pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<RegisterUser>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .register_user(&payload.username, &payload.password)
        .await?;

    Ok(StatusCode::CREATED)
}
