use std::fmt::{Display, Formatter};

use custodian_core::{AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{PermissionView, PermissionViewId};

/// Unique identifier for a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoleId(Uuid);

impl RoleId {
    /// Creates a new random role identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a role identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RoleId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for RoleId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Named bundle of permission views.
///
/// The permission set never holds two views with the same id and is kept
/// sorted by `(permission_name, resource_name)` so equal sets compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    id: RoleId,
    name: NonEmptyString,
    permissions: Vec<PermissionView>,
}

impl Role {
    /// Creates a role, deduplicating the given permission views.
    pub fn new(
        id: RoleId,
        name: impl Into<String>,
        permissions: impl IntoIterator<Item = PermissionView>,
    ) -> AppResult<Self> {
        let mut role = Self {
            id,
            name: NonEmptyString::for_field("role name", name)?,
            permissions: Vec::new(),
        };
        role.grant(permissions);
        Ok(role)
    }

    /// Returns the role identifier.
    #[must_use]
    pub fn id(&self) -> RoleId {
        self.id
    }

    /// Returns the unique role name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the permission views held by the role.
    #[must_use]
    pub fn permissions(&self) -> &[PermissionView] {
        self.permissions.as_slice()
    }

    /// Returns the ids of the permission views held by the role.
    #[must_use]
    pub fn permission_ids(&self) -> Vec<PermissionViewId> {
        self.permissions.iter().map(PermissionView::id).collect()
    }

    /// Returns whether the role holds the permission view.
    #[must_use]
    pub fn has_permission(&self, permission_view_id: PermissionViewId) -> bool {
        self.permissions
            .iter()
            .any(|permission| permission.id() == permission_view_id)
    }

    /// Adds permission views not already held. Returns how many were added.
    pub fn grant(&mut self, permissions: impl IntoIterator<Item = PermissionView>) -> usize {
        let mut added = 0;
        for permission in permissions {
            if !self.has_permission(permission.id()) {
                self.permissions.push(permission);
                added += 1;
            }
        }

        if added > 0 {
            self.permissions
                .sort_by(|left, right| left.key().cmp(right.key()));
        }

        added
    }

    /// Removes the listed permission views. Absent ids are ignored.
    /// Returns how many were removed.
    pub fn revoke(&mut self, permission_view_ids: &[PermissionViewId]) -> usize {
        let before = self.permissions.len();
        self.permissions
            .retain(|permission| !permission_view_ids.contains(&permission.id()));
        before - self.permissions.len()
    }
}
