//! Application services and ports.

#![forbid(unsafe_code)]

mod authorization_facade;
mod permission_registry_service;
mod rbac_ports;
mod role_store_service;
mod user_directory_service;
mod user_role_service;

#[cfg(test)]
mod test_fakes;

pub use authorization_facade::{
    AuthorizationFacade, CreateRoleInput, RolePermissionViewsInput, UserDetails, UserRoleInput,
};
pub use permission_registry_service::PermissionRegistryService;
pub use rbac_ports::{
    AuditEvent, AuditRepository, NewUser, PermissionViewRepository, RoleRepository, UserRecord,
    UserRepository,
};
pub use role_store_service::RoleStoreService;
pub use user_directory_service::{CreateUserInput, UserDirectoryService};
pub use user_role_service::UserRoleService;
