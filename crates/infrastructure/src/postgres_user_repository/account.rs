use super::*;

impl PostgresUserRepository {
    pub(super) async fn create_impl(&self, user: NewUser) -> AppResult<UserRecord> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!("failed to begin transaction: {error}"))
        })?;

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (username, first_name, last_name, email)
            VALUES ($1, $2, $3, LOWER($4))
            RETURNING id, username, first_name, last_name, email, active
            "#,
        )
        .bind(user.username.as_str())
        .bind(user.first_name.as_str())
        .bind(user.last_name.as_str())
        .bind(user.email.as_str())
        .fetch_one(&mut *transaction)
        .await
        .map_err(|error| user_conflict_or_internal(error, "create user"))?;

        for role_id in &user.role_ids {
            sqlx::query(
                r#"
                INSERT INTO rbac_user_roles (user_id, role_id)
                VALUES ($1, $2)
                ON CONFLICT (user_id, role_id) DO NOTHING
                "#,
            )
            .bind(row.id)
            .bind(role_id.as_uuid())
            .execute(&mut *transaction)
            .await
            .map_err(|error| reference_missing_or_internal(error, "attach initial role"))?;
        }

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        let role_ids = user.role_ids.iter().map(RoleId::as_uuid).collect();
        Ok(row.into_record(role_ids))
    }

    pub(super) async fn delete_impl(&self, user_id: UserId) -> AppResult<bool> {
        let rows_affected = sqlx::query(
            r#"
            DELETE FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_i64())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete user: {error}")))?
        .rows_affected();

        Ok(rows_affected > 0)
    }
}
