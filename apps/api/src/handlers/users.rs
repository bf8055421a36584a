use std::str::FromStr;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use custodian_domain::UserId;

use crate::dto::{CreateUserRequest, UserIdentityResponse, UserResponse};
use crate::error::ApiResult;
use crate::middleware::Caller;
use crate::state::AppState;

pub async fn me_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> ApiResult<Json<UserIdentityResponse>> {
    let identity = state.facade.current_user(caller.identity())?;

    Ok(Json(UserIdentityResponse::from(identity)))
}

pub async fn get_user_by_email_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(email): Path<String>,
) -> ApiResult<Json<UserResponse>> {
    let user = state
        .facade
        .find_user_by_email(caller.identity(), email.as_str())
        .await?;

    Ok(Json(UserResponse::from(user)))
}

pub async fn create_user_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    state.facade.current_user(caller.identity())?;
    let Json(payload) = payload?;

    let user = state
        .facade
        .create_user(caller.identity(), payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

pub async fn get_or_create_user_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> ApiResult<Json<UserResponse>> {
    state.facade.current_user(caller.identity())?;
    let Json(payload) = payload?;

    let user = state
        .facade
        .get_or_create_user(caller.identity(), payload.into())
        .await?;

    Ok(Json(UserResponse::from(user)))
}

pub async fn delete_user_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(user_id): Path<String>,
) -> ApiResult<StatusCode> {
    state.facade.current_user(caller.identity())?;
    let user_id = UserId::from_str(user_id.as_str())?;

    state.facade.delete_user(caller.identity(), user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
