use axum::extract::{Request, State};
use axum::http::{HeaderValue, Method, header};
use axum::middleware::Next;
use axum::response::Response;
use custodian_core::{AppError, UserIdentity};
use tower_sessions::Session;
use tracing::warn;

use crate::auth::{SESSION_ABSOLUTE_TIMEOUT_SECONDS, SESSION_CREATED_AT_KEY, SESSION_USER_KEY};
use crate::error::ApiResult;
use crate::state::AppState;

/// Identity resolved from the session, if any.
///
/// Handlers pass it to the facade, which rejects anonymous callers.
#[derive(Debug, Clone, Default)]
pub struct Caller(pub Option<UserIdentity>);

impl Caller {
    pub fn identity(&self) -> Option<&UserIdentity> {
        self.0.as_ref()
    }
}

pub async fn resolve_caller(session: Session, mut request: Request, next: Next) -> Response {
    let identity = match session_identity(&session).await {
        Ok(identity) => identity,
        Err(error) => {
            warn!(%error, "treating caller as anonymous");
            None
        }
    };

    request.extensions_mut().insert(Caller(identity));
    next.run(request).await
}

async fn session_identity(session: &Session) -> Result<Option<UserIdentity>, AppError> {
    let Some(identity) = session
        .get::<UserIdentity>(SESSION_USER_KEY)
        .await
        .map_err(|error| AppError::Unauthorized(format!("failed to read session identity: {error}")))?
    else {
        return Ok(None);
    };

    let created_at = session
        .get::<i64>(SESSION_CREATED_AT_KEY)
        .await
        .map_err(|error| {
            AppError::Unauthorized(format!("failed to read session creation time: {error}"))
        })?
        .unwrap_or_default();

    if session_expired(created_at, chrono::Utc::now().timestamp()) {
        session
            .flush()
            .await
            .map_err(|error| AppError::Internal(format!("failed to flush session: {error}")))?;
        return Ok(None);
    }

    Ok(Some(identity))
}

fn session_expired(created_at: i64, now: i64) -> bool {
    now.saturating_sub(created_at) > SESSION_ABSOLUTE_TIMEOUT_SECONDS
}

pub async fn require_same_origin_for_mutations(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    if is_state_changing_method(request.method()) {
        let headers = request.headers();

        if let Some(fetch_site) = headers.get("sec-fetch-site")
            && fetch_site == HeaderValue::from_static("cross-site")
        {
            return Err(AppError::Unauthorized("cross-site request blocked".to_owned()).into());
        }

        let origin = headers
            .get(header::ORIGIN)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        let referer = headers
            .get(header::REFERER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();

        if !origin_is_allowed(origin, referer, state.frontend_url.as_str()) {
            return Err(AppError::Unauthorized("origin validation failed".to_owned()).into());
        }
    }

    Ok(next.run(request).await)
}

fn origin_is_allowed(origin: &str, referer: &str, allowed_origin: &str) -> bool {
    let allowed_origin = allowed_origin.trim_end_matches('/');
    if allowed_origin.is_empty() {
        return false;
    }

    // The referer must name the origin itself, not a host that merely shares its prefix.
    origin == allowed_origin
        || referer
            .strip_prefix(allowed_origin)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

fn is_state_changing_method(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}
