use axum::Json;
use axum::extract::{Extension, State};

use crate::dto::PermissionViewResponse;
use crate::error::ApiResult;
use crate::middleware::Caller;
use crate::state::AppState;

pub async fn list_permission_views_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> ApiResult<Json<Vec<PermissionViewResponse>>> {
    let permission_views = state
        .facade
        .list_permission_views(caller.identity())
        .await?
        .iter()
        .map(PermissionViewResponse::from)
        .collect();

    Ok(Json(permission_views))
}
