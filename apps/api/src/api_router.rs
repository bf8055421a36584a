use axum::Router;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use custodian_core::AppError;
use tower_http::trace::TraceLayer;
use tower_sessions::{SessionManagerLayer, SessionStore};

use crate::state::AppState;
use crate::{auth, handlers, middleware};

mod cors;


pub fn build_router<Store>(
    app_state: AppState,
    frontend_url: &str,
    session_layer: SessionManagerLayer<Store>,
) -> Result<Router, AppError>
where
    Store: SessionStore + Clone,
{
    let rbac_routes = Router::new()
        .route(
            "/api/v1/role/",
            get(handlers::roles::list_roles_handler).post(handlers::roles::create_role_handler),
        )
        .route(
            "/api/v1/role/name/{name}",
            get(handlers::roles::get_role_by_name_handler)
                .delete(handlers::roles::delete_role_handler),
        )
        .route(
            "/api/v1/role/add_for_user",
            post(handlers::roles::add_role_for_user_handler),
        )
        .route(
            "/api/v1/role/remove_from_user",
            post(handlers::roles::remove_role_from_user_handler),
        )
        .route(
            "/api/v1/role/add_permission_view",
            post(handlers::roles::add_permission_view_handler),
        )
        .route(
            "/api/v1/role/remove_permission_view",
            post(handlers::roles::remove_permission_view_handler),
        )
        .route(
            "/api/v1/permission_view/",
            get(handlers::permission_views::list_permission_views_handler),
        )
        .route("/api/v1/me/", get(handlers::users::me_handler))
        .route("/api/v1/user/", post(handlers::users::create_user_handler))
        .route(
            "/api/v1/user/get_or_create",
            post(handlers::users::get_or_create_user_handler),
        )
        // One segment serves both lookups: an email on GET, a numeric id on DELETE.
        .route(
            "/api/v1/user/{user_key}",
            get(handlers::users::get_user_by_email_handler)
                .delete(handlers::users::delete_user_handler),
        )
        .route_layer(from_fn(middleware::resolve_caller));

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/auth/bootstrap", post(auth::bootstrap_handler))
        .route("/auth/logout", post(auth::logout_handler))
        .merge(rbac_routes)
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_same_origin_for_mutations,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors::build_cors_layer(frontend_url)?)
        .layer(session_layer)
        .with_state(app_state))
}
