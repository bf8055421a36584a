use custodian_application::{CreateUserInput, UserDetails};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for user creation.
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "create-user-request.ts")]
pub struct CreateUserRequest {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Names of roles to attach on creation.
    #[serde(default)]
    #[ts(optional)]
    pub roles: Option<Vec<String>>,
}

/// API representation of a user and the names of the roles it holds.
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "user-response.ts")]
pub struct UserResponse {
    #[ts(type = "number")]
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub active: bool,
    pub roles: Vec<String>,
}

impl From<CreateUserRequest> for CreateUserInput {
    fn from(value: CreateUserRequest) -> Self {
        Self {
            username: value.username,
            first_name: value.first_name,
            last_name: value.last_name,
            email: value.email,
            role_names: value.roles.unwrap_or_default(),
        }
    }
}

impl From<UserDetails> for UserResponse {
    fn from(value: UserDetails) -> Self {
        Self {
            id: value.user.id.as_i64(),
            username: value.user.username,
            first_name: value.user.first_name,
            last_name: value.user.last_name,
            email: value.user.email,
            active: value.user.active,
            roles: value
                .roles
                .iter()
                .map(|role| role.name().to_owned())
                .collect(),
        }
    }
}
