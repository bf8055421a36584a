use axum::http::StatusCode;
use custodian_core::{AppError, UserIdentity};
use tower_sessions::Session;
use tracing::info;

use crate::error::ApiResult;

use super::SESSION_USER_KEY;

pub async fn logout_handler(session: Session) -> ApiResult<StatusCode> {
    let subject = session
        .get::<UserIdentity>(SESSION_USER_KEY)
        .await
        .ok()
        .flatten()
        .map(|identity| identity.subject().to_owned());

    session
        .delete()
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete session: {error}")))?;

    if let Some(subject) = subject {
        info!(subject = subject.as_str(), "logout");
    }

    Ok(StatusCode::NO_CONTENT)
}
