//! User management: profile reads, admin CRUD, password changes.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{normalize_email, NewUser, Password, User, UserFilter, UserUpdate};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{RoleRepository, UserRepository};

#[async_trait]
pub trait UserService: Send + Sync {
    async fn get(&self, id: Uuid) -> AppResult<User>;

    async fn list(&self, filter: UserFilter) -> AppResult<Vec<User>>;

    /// Admin creation with an explicit role assignment
    async fn create(
        &self,
        email: String,
        password: String,
        first_name: String,
        last_name: String,
        role_ids: Vec<Uuid>,
    ) -> AppResult<User>;

    async fn update(&self, id: Uuid, update: UserUpdate) -> AppResult<User>;

    /// Deactivate instead of delete; the account stays for audit
    async fn deactivate(&self, id: Uuid) -> AppResult<()>;

    /// Verify the current password, then replace it
    async fn change_password(
        &self,
        id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()>;
}

pub struct UserManager {
    users: Arc<dyn UserRepository>,
    roles: Arc<dyn RoleRepository>,
}

impl UserManager {
    pub fn new(users: Arc<dyn UserRepository>, roles: Arc<dyn RoleRepository>) -> Self {
        Self { users, roles }
    }

    /// Reject role ids that do not resolve to stored roles
    async fn ensure_roles_exist(&self, role_ids: &[Uuid]) -> AppResult<()> {
        if role_ids.is_empty() {
            return Ok(());
        }
        let found = self.roles.find_by_ids(role_ids.to_vec()).await?;
        if found.len() != role_ids.len() {
            return Err(AppError::validation("One or more role ids are invalid"));
        }
        Ok(())
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn get(&self, id: Uuid) -> AppResult<User> {
        self.users.find_by_id(id).await?.ok_or_not_found("User")
    }

    async fn list(&self, filter: UserFilter) -> AppResult<Vec<User>> {
        self.users.list(filter).await
    }

    async fn create(
        &self,
        email: String,
        password: String,
        first_name: String,
        last_name: String,
        role_ids: Vec<Uuid>,
    ) -> AppResult<User> {
        let email = normalize_email(&email);

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("User"));
        }

        self.ensure_roles_exist(&role_ids).await?;

        let password_hash = Password::new(&password)?.into_string();

        self.users
            .create(NewUser {
                email,
                password_hash,
                first_name,
                last_name,
                role_ids,
            })
            .await
    }

    async fn update(&self, id: Uuid, mut update: UserUpdate) -> AppResult<User> {
        if let Some(email) = update.email.take() {
            let email = normalize_email(&email);
            if let Some(existing) = self.users.find_by_email(&email).await? {
                if existing.id != id {
                    return Err(AppError::conflict("User"));
                }
            }
            update.email = Some(email);
        }

        if let Some(role_ids) = &update.role_ids {
            self.ensure_roles_exist(role_ids).await?;
        }

        self.users.update(id, update).await
    }

    async fn deactivate(&self, id: Uuid) -> AppResult<()> {
        self.users.deactivate(id).await
    }

    async fn change_password(
        &self,
        id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        let user = self.get(id).await?;

        if !Password::from_hash(user.password_hash).verify(current_password) {
            return Err(AppError::validation("Current password is incorrect"));
        }

        let new_hash = Password::new(new_password)?.into_string();
        self.users.set_password(id, new_hash).await
    }
}
