mod bootstrap;
mod session;

pub use bootstrap::bootstrap_handler;
pub use session::logout_handler;

pub const SESSION_COOKIE_NAME: &str = "custodian_session";
pub const SESSION_USER_KEY: &str = "user_identity";
/// Absolute session creation timestamp, in seconds since the Unix epoch.
pub const SESSION_CREATED_AT_KEY: &str = "session_created_at";
/// Sessions older than this are treated as anonymous regardless of activity.
pub const SESSION_ABSOLUTE_TIMEOUT_SECONDS: i64 = 8 * 60 * 60;
/// Sessions idle for longer than this are dropped by the store.
pub const SESSION_INACTIVITY_TIMEOUT_MINUTES: i64 = 30;
