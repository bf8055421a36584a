mod common;
mod roles;
mod users;

pub use common::{HealthResponse, UserIdentityResponse};
pub use roles::{
    CreateRoleRequest, PermissionViewResponse, RolePermissionViewRequest, RoleResponse,
    UserRoleRequest,
};
pub use users::{CreateUserRequest, UserResponse};
