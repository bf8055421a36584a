use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;

use crate::dto::{CreateRoleRequest, RolePermissionViewRequest, RoleResponse, UserRoleRequest};
use crate::error::ApiResult;
use crate::middleware::Caller;
use crate::state::AppState;

pub async fn list_roles_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> ApiResult<Json<Vec<RoleResponse>>> {
    let roles = state
        .facade
        .list_roles(caller.identity())
        .await?
        .into_iter()
        .map(RoleResponse::from)
        .collect();

    Ok(Json(roles))
}

pub async fn get_role_by_name_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(name): Path<String>,
) -> ApiResult<Json<RoleResponse>> {
    let role = state
        .facade
        .find_role(caller.identity(), name.as_str())
        .await?;

    Ok(Json(RoleResponse::from(role)))
}

pub async fn create_role_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    payload: Result<Json<CreateRoleRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<RoleResponse>)> {
    state.facade.current_user(caller.identity())?;
    let Json(payload) = payload?;

    let role = state
        .facade
        .create_role(caller.identity(), payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(RoleResponse::from(role))))
}

pub async fn delete_role_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(name): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .facade
        .delete_role(caller.identity(), name.as_str())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_role_for_user_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    payload: Result<Json<UserRoleRequest>, JsonRejection>,
) -> ApiResult<Json<RoleResponse>> {
    state.facade.current_user(caller.identity())?;
    let Json(payload) = payload?;

    let role = state
        .facade
        .add_role_to_user(caller.identity(), payload.into())
        .await?;

    Ok(Json(RoleResponse::from(role)))
}

pub async fn remove_role_from_user_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    payload: Result<Json<UserRoleRequest>, JsonRejection>,
) -> ApiResult<Json<RoleResponse>> {
    state.facade.current_user(caller.identity())?;
    let Json(payload) = payload?;

    let role = state
        .facade
        .remove_role_from_user(caller.identity(), payload.into())
        .await?;

    Ok(Json(RoleResponse::from(role)))
}

pub async fn add_permission_view_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    payload: Result<Json<RolePermissionViewRequest>, JsonRejection>,
) -> ApiResult<Json<RoleResponse>> {
    state.facade.current_user(caller.identity())?;
    let Json(payload) = payload?;

    let role = state
        .facade
        .add_permission_views(caller.identity(), payload.into())
        .await?;

    Ok(Json(RoleResponse::from(role)))
}

pub async fn remove_permission_view_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    payload: Result<Json<RolePermissionViewRequest>, JsonRejection>,
) -> ApiResult<Json<RoleResponse>> {
    state.facade.current_user(caller.identity())?;
    let Json(payload) = payload?;

    let role = state
        .facade
        .remove_permission_views(caller.identity(), payload.into())
        .await?;

    Ok(Json(RoleResponse::from(role)))
}
