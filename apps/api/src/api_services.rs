mod database;
mod sessions;
mod state_builder;

pub use database::connect_and_migrate;
pub use sessions::build_postgres_session_layer;
#[cfg(test)]
pub use sessions::configure_session_layer;
pub use state_builder::build_app_state;
#[cfg(test)]
pub use state_builder::build_in_memory_app_state;
