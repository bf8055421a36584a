//! PostgreSQL-backed user store.

use async_trait::async_trait;
use sqlx::PgPool;

use custodian_application::{NewUser, UserRecord, UserRepository};
use custodian_core::{AppError, AppResult};
use custodian_domain::{EmailAddress, RoleId, UserId};

mod account;
mod lookup;
mod roles;


/// PostgreSQL implementation of the user repository port.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    first_name: String,
    last_name: String,
    email: String,
    active: bool,
}

impl UserRow {
    fn into_record(self, role_ids: Vec<uuid::Uuid>) -> UserRecord {
        UserRecord {
            id: UserId::new(self.id),
            username: self.username,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            active: self.active,
            role_ids: role_ids.into_iter().map(RoleId::from_uuid).collect(),
        }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_user_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        self.find_by_id_impl(user_id).await
    }

    async fn find_user_by_email(&self, email: &EmailAddress) -> AppResult<Option<UserRecord>> {
        self.find_by_email_impl(email).await
    }

    async fn create_user(&self, user: NewUser) -> AppResult<UserRecord> {
        self.create_impl(user).await
    }

    async fn delete_user(&self, user_id: UserId) -> AppResult<bool> {
        self.delete_impl(user_id).await
    }

    async fn grant_user_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        self.grant_role_impl(user_id, role_id).await
    }

    async fn revoke_user_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        self.revoke_role_impl(user_id, role_id).await
    }
}

fn user_conflict_or_internal(error: sqlx::Error, operation: &str) -> AppError {
    if let sqlx::Error::Database(ref database_error) = error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict(
            "a user with this email or username already exists".to_owned(),
        );
    }

    AppError::Internal(format!("failed to {operation}: {error}"))
}

fn reference_missing_or_internal(error: sqlx::Error, operation: &str) -> AppError {
    if let sqlx::Error::Database(ref database_error) = error
        && database_error.code().as_deref() == Some("23503")
    {
        return AppError::NotFound(format!("failed to {operation}: user was not found"));
    }

    AppError::Internal(format!("failed to {operation}: {error}"))
}
