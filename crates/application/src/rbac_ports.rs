mod audit;
mod repositories;
mod users;

pub use audit::{AuditEvent, AuditRepository};
pub use repositories::{PermissionViewRepository, RoleRepository};
pub use users::{NewUser, UserRecord, UserRepository};
