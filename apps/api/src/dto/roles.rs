use custodian_application::{CreateRoleInput, RolePermissionViewsInput, UserRoleInput};
use custodian_domain::{PermissionView, PermissionViewSelection, Role, UserId};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for role creation.
///
/// `permission_view` is one `[permission, resource]` pair or a list of pairs.
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "create-role-request.ts")]
pub struct CreateRoleRequest {
    pub name: String,
    #[serde(default)]
    #[ts(type = "[string, string] | Array<[string, string]> | null")]
    pub permission_view: Option<PermissionViewSelection>,
}

/// Incoming payload for granting or revoking a role on a user.
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "user-role-request.ts")]
pub struct UserRoleRequest {
    #[serde(default)]
    #[ts(type = "number | null")]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub role_name: Option<String>,
}

/// Incoming payload for granting or revoking permission views on a role.
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "role-permission-view-request.ts")]
pub struct RolePermissionViewRequest {
    #[serde(default)]
    pub role_name: Option<String>,
    #[serde(default)]
    #[ts(type = "[string, string] | Array<[string, string]> | null")]
    pub permission_view: Option<PermissionViewSelection>,
}

/// API representation of one permission view.
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "permission-view-response.ts")]
pub struct PermissionViewResponse {
    pub id: String,
    pub permission_name: String,
    pub resource_name: String,
}

/// API representation of a role and its permission views.
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "role-response.ts")]
pub struct RoleResponse {
    pub id: String,
    pub name: String,
    pub permissions: Vec<PermissionViewResponse>,
}

impl From<CreateRoleRequest> for CreateRoleInput {
    fn from(value: CreateRoleRequest) -> Self {
        Self {
            name: value.name,
            permission_view: value.permission_view,
        }
    }
}

impl From<UserRoleRequest> for UserRoleInput {
    fn from(value: UserRoleRequest) -> Self {
        Self {
            user_id: value.user_id.map(UserId::new),
            role_name: value.role_name,
        }
    }
}

impl From<RolePermissionViewRequest> for RolePermissionViewsInput {
    fn from(value: RolePermissionViewRequest) -> Self {
        Self {
            role_name: value.role_name,
            permission_view: value.permission_view,
        }
    }
}

impl From<&PermissionView> for PermissionViewResponse {
    fn from(value: &PermissionView) -> Self {
        Self {
            id: value.id().to_string(),
            permission_name: value.permission_name().to_owned(),
            resource_name: value.resource_name().to_owned(),
        }
    }
}

impl From<Role> for RoleResponse {
    fn from(value: Role) -> Self {
        Self {
            id: value.id().to_string(),
            name: value.name().to_owned(),
            permissions: value
                .permissions()
                .iter()
                .map(PermissionViewResponse::from)
                .collect(),
        }
    }
}
