//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_rbac_repository;
mod postgres_audit_repository;
mod postgres_permission_view_repository;
mod postgres_role_repository;
mod postgres_user_repository;

#[cfg(test)]
mod test_support;

pub use in_memory_rbac_repository::InMemoryRbacRepository;
pub use postgres_audit_repository::PostgresAuditRepository;
pub use postgres_permission_view_repository::PostgresPermissionViewRepository;
pub use postgres_role_repository::PostgresRoleRepository;
pub use postgres_user_repository::PostgresUserRepository;
