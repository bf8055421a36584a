//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod permission_view;
mod role;
mod security;
mod user;

pub use permission_view::{
    PermissionView, PermissionViewId, PermissionViewKey, PermissionViewPair,
    PermissionViewSelection,
};
pub use role::{Role, RoleId};
pub use security::AuditAction;
pub use user::{EmailAddress, UserId};
