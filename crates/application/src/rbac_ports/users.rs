use async_trait::async_trait;

use custodian_core::{AppResult, NonEmptyString};
use custodian_domain::{EmailAddress, RoleId, UserId};

/// User record returned by the user store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// Store-assigned user id.
    pub id: UserId,
    /// Unique login name.
    pub username: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Canonical email address.
    pub email: String,
    /// Whether the account is active.
    pub active: bool,
    /// Roles referenced by the user. May contain ids of deleted roles.
    pub role_ids: Vec<RoleId>,
}

impl UserRecord {
    /// Returns whether the user references the role.
    #[must_use]
    pub fn has_role(&self, role_id: RoleId) -> bool {
        self.role_ids.contains(&role_id)
    }
}

/// Validated payload for a new user record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Unique login name.
    pub username: NonEmptyString,
    /// Given name.
    pub first_name: NonEmptyString,
    /// Family name.
    pub last_name: NonEmptyString,
    /// Canonical email address.
    pub email: EmailAddress,
    /// Initial role references.
    pub role_ids: Vec<RoleId>,
}

/// Port to the external user store.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user by id.
    async fn find_user_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>>;

    /// Finds a user by canonical email.
    async fn find_user_by_email(&self, email: &EmailAddress) -> AppResult<Option<UserRecord>>;

    /// Creates a user. Returns `AppError::Conflict` on duplicate email or username.
    async fn create_user(&self, user: NewUser) -> AppResult<UserRecord>;

    /// Deletes a user. Returns `false` when no user with this id existed.
    async fn delete_user(&self, user_id: UserId) -> AppResult<bool>;

    /// Adds a role reference to the user. Adding a held role is a no-op.
    async fn grant_user_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<()>;

    /// Removes a role reference from the user. Removing an absent role is a no-op.
    async fn revoke_user_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<()>;
}
