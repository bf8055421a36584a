pub mod health;
pub mod permission_views;
pub mod roles;
pub mod users;
