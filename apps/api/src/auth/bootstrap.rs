use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use custodian_core::{AppError, UserIdentity};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{info, warn};

use crate::error::ApiResult;
use crate::state::AppState;

use super::{SESSION_CREATED_AT_KEY, SESSION_USER_KEY};

#[derive(Debug, Deserialize)]
pub struct BootstrapRequest {
    pub subject: String,
    pub token: String,
}

pub async fn bootstrap_handler(
    State(state): State<AppState>,
    session: Session,
    payload: Result<Json<BootstrapRequest>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Json(payload) = payload?;

    if payload.token != state.bootstrap_token {
        warn!(subject = payload.subject.as_str(), "rejected bootstrap login");
        return Err(AppError::Unauthorized("invalid bootstrap token".to_owned()).into());
    }

    let subject = payload.subject.trim().to_owned();
    if subject.is_empty() {
        return Err(AppError::InvalidArgument("subject must not be empty".to_owned()).into());
    }

    let identity = UserIdentity::new(subject.clone(), subject.clone(), None);

    session
        .cycle_id()
        .await
        .map_err(|error| AppError::Internal(format!("failed to cycle session id: {error}")))?;

    session
        .insert(SESSION_USER_KEY, &identity)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to persist session identity: {error}"))
        })?;

    session
        .insert(SESSION_CREATED_AT_KEY, chrono::Utc::now().timestamp())
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to persist session creation time: {error}"))
        })?;

    info!(subject = subject.as_str(), "bootstrap login");

    Ok(StatusCode::NO_CONTENT)
}
