use super::*;

use tracing::info;

use crate::CreateUserInput;

impl AuthorizationFacade {
    /// Returns the user registered under the email, with resolved roles.
    pub async fn find_user_by_email(
        &self,
        caller: Option<&UserIdentity>,
        email: &str,
    ) -> AppResult<UserDetails> {
        require_authenticated(caller)?;
        let user = self.user_directory.find_by_email(email).await?;
        self.user_details(user).await
    }

    /// Creates a user with optional initial roles.
    pub async fn create_user(
        &self,
        caller: Option<&UserIdentity>,
        input: CreateUserInput,
    ) -> AppResult<UserDetails> {
        let actor = require_authenticated(caller)?;
        let user = self.user_directory.create(input).await?;
        self.record_user_created(actor, &user).await;
        self.user_details(user).await
    }

    /// Returns the user matching the input email, creating it when absent.
    pub async fn get_or_create_user(
        &self,
        caller: Option<&UserIdentity>,
        input: CreateUserInput,
    ) -> AppResult<UserDetails> {
        let actor = require_authenticated(caller)?;
        let (user, created) = self.user_directory.get_or_create(input).await?;
        if created {
            self.record_user_created(actor, &user).await;
        }

        self.user_details(user).await
    }

    /// Deletes a user.
    pub async fn delete_user(
        &self,
        caller: Option<&UserIdentity>,
        user_id: UserId,
    ) -> AppResult<()> {
        let actor = require_authenticated(caller)?;
        let user = self.user_directory.delete(user_id).await?;

        info!(%user_id, subject = actor.subject(), "user deleted");
        self.record(
            actor,
            AuditAction::SecurityUserDeleted,
            "rbac_user",
            user_id.to_string(),
            format!("deleted user '{}'", user.email),
        )
        .await;

        Ok(())
    }

    async fn user_details(&self, user: UserRecord) -> AppResult<UserDetails> {
        let roles = self.user_roles.roles_for_user(&user).await?;
        Ok(UserDetails { user, roles })
    }

    async fn record_user_created(&self, actor: &UserIdentity, user: &UserRecord) {
        info!(user_id = %user.id, subject = actor.subject(), "user created");
        self.record(
            actor,
            AuditAction::SecurityUserCreated,
            "rbac_user",
            user.id.to_string(),
            format!("created user '{}'", user.email),
        )
        .await;
    }
}
