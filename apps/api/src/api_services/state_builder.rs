use std::sync::Arc;

use custodian_application::AuthorizationFacade;
#[cfg(test)]
use custodian_infrastructure::InMemoryRbacRepository;
use custodian_infrastructure::{
    PostgresAuditRepository, PostgresPermissionViewRepository, PostgresRoleRepository,
    PostgresUserRepository,
};
use sqlx::PgPool;

use crate::api_config::ApiConfig;
use crate::state::AppState;

pub fn build_app_state(pool: PgPool, config: &ApiConfig) -> AppState {
    let facade = AuthorizationFacade::new(
        Arc::new(PostgresPermissionViewRepository::new(pool.clone())),
        Arc::new(PostgresRoleRepository::new(pool.clone())),
        Arc::new(PostgresUserRepository::new(pool.clone())),
        Arc::new(PostgresAuditRepository::new(pool)),
    );

    AppState {
        facade,
        frontend_url: config.frontend_url.clone(),
        bootstrap_token: config.bootstrap_token.clone(),
    }
}

/// Wires every port to one shared in-memory store.
#[cfg(test)]
pub fn build_in_memory_app_state(
    repository: Arc<InMemoryRbacRepository>,
    frontend_url: &str,
    bootstrap_token: &str,
) -> AppState {
    AppState {
        facade: AuthorizationFacade::new(
            repository.clone(),
            repository.clone(),
            repository.clone(),
            repository,
        ),
        frontend_url: frontend_url.to_owned(),
        bootstrap_token: bootstrap_token.to_owned(),
    }
}
