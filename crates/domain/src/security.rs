use serde::{Deserialize, Serialize};

/// Stable audit actions emitted by facade mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Emitted when a role is created.
    SecurityRoleCreated,
    /// Emitted when a role is deleted.
    SecurityRoleDeleted,
    /// Emitted when permission views are granted to a role.
    SecurityRolePermissionsGranted,
    /// Emitted when permission views are revoked from a role.
    SecurityRolePermissionsRevoked,
    /// Emitted when a role is assigned to a user.
    SecurityRoleAssigned,
    /// Emitted when a role is removed from a user.
    SecurityRoleUnassigned,
    /// Emitted when a user is created.
    SecurityUserCreated,
    /// Emitted when a user is deleted.
    SecurityUserDeleted,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SecurityRoleCreated => "security.role.created",
            Self::SecurityRoleDeleted => "security.role.deleted",
            Self::SecurityRolePermissionsGranted => "security.role.permissions_granted",
            Self::SecurityRolePermissionsRevoked => "security.role.permissions_revoked",
            Self::SecurityRoleAssigned => "security.role.assigned",
            Self::SecurityRoleUnassigned => "security.role.unassigned",
            Self::SecurityUserCreated => "security.user.created",
            Self::SecurityUserDeleted => "security.user.deleted",
        }
    }
}
