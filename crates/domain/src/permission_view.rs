use std::fmt::{Display, Formatter};

use custodian_core::{AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a registered permission view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PermissionViewId(Uuid);

impl PermissionViewId {
    /// Creates a new random permission view identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an identifier from an existing UUID value.
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

impl Default for PermissionViewId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for PermissionViewId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Validated `(permission_name, resource_name)` lookup key.
///
/// Matching is exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PermissionViewKey {
    permission_name: NonEmptyString,
    resource_name: NonEmptyString,
}

impl PermissionViewKey {
    /// Creates a key, rejecting empty or whitespace-only names.
    pub fn new(
        permission_name: impl Into<String>,
        resource_name: impl Into<String>,
    ) -> AppResult<Self> {
        Ok(Self {
            permission_name: NonEmptyString::for_field("permission_name", permission_name)?,
            resource_name: NonEmptyString::for_field("resource_name", resource_name)?,
        })
    }

    /// Returns the permission half of the pair.
    #[must_use]
    pub fn permission_name(&self) -> &str {
        self.permission_name.as_str()
    }

    /// Returns the resource half of the pair.
    #[must_use]
    pub fn resource_name(&self) -> &str {
        self.resource_name.as_str()
    }
}

impl Display for PermissionViewKey {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "{} on {}",
            self.permission_name, self.resource_name
        )
    }
}

/// One registered `(permission, resource)` capability.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermissionView {
    id: PermissionViewId,
    key: PermissionViewKey,
}

impl PermissionView {
    /// Creates a permission view from a stored identity and key.
    #[must_use]
    pub fn new(id: PermissionViewId, key: PermissionViewKey) -> Self {
        Self { id, key }
    }

    /// Returns the registry identifier.
    #[must_use]
    pub fn id(&self) -> PermissionViewId {
        self.id
    }

    /// Returns the lookup key.
    #[must_use]
    pub fn key(&self) -> &PermissionViewKey {
        &self.key
    }

    /// Returns the permission name.
    #[must_use]
    pub fn permission_name(&self) -> &str {
        self.key.permission_name()
    }

    /// Returns the resource name.
    #[must_use]
    pub fn resource_name(&self) -> &str {
        self.key.resource_name()
    }
}

/// Raw `(permission_name, resource_name)` pair as received on the wire.
pub type PermissionViewPair = (String, String);

/// Either one pair or a list of pairs.
///
/// Clients send `["can_read", "Dashboard"]` as often as
/// `[["can_read", "Dashboard"]]`; both deserialize, and both normalize to the
/// same ordered list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PermissionViewSelection {
    /// A single bare pair.
    One(PermissionViewPair),
    /// An ordered sequence of pairs.
    Many(Vec<PermissionViewPair>),
}

impl PermissionViewSelection {
    /// Returns whether the selection names no pair at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::One(_) => false,
            Self::Many(pairs) => pairs.is_empty(),
        }
    }

    /// Normalizes the selection into an ordered list of raw pairs.
    #[must_use]
    pub fn into_pairs(self) -> Vec<PermissionViewPair> {
        match self {
            Self::One(pair) => vec![pair],
            Self::Many(pairs) => pairs,
        }
    }

    /// Normalizes and validates the selection, preserving input order.
    pub fn into_keys(self) -> AppResult<Vec<PermissionViewKey>> {
        self.into_pairs()
            .into_iter()
            .map(|(permission_name, resource_name)| {
                PermissionViewKey::new(permission_name, resource_name)
            })
            .collect()
    }
}

impl From<PermissionViewPair> for PermissionViewSelection {
    fn from(value: PermissionViewPair) -> Self {
        Self::One(value)
    }
}

impl From<Vec<PermissionViewPair>> for PermissionViewSelection {
    fn from(value: Vec<PermissionViewPair>) -> Self {
        Self::Many(value)
    }
}
