//! Role management and the default role seed.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::config::{ROLE_ADMIN, ROLE_EXECUTIVE_ASSISTANT};
use crate::domain::{NewRole, Permission, Role, RoleUpdate};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{RoleRepository, UserRepository};

#[async_trait]
pub trait RoleService: Send + Sync {
    async fn get(&self, id: Uuid) -> AppResult<Role>;

    async fn list(&self, active_only: bool) -> AppResult<Vec<Role>>;

    async fn create(&self, data: NewRole) -> AppResult<Role>;

    async fn update(&self, id: Uuid, update: RoleUpdate) -> AppResult<Role>;

    /// Hard-delete a role; refused while any user still references it
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Create the built-in roles if they are missing (idempotent)
    async fn seed_defaults(&self) -> AppResult<()>;
}

pub struct RoleManager {
    roles: Arc<dyn RoleRepository>,
    users: Arc<dyn UserRepository>,
}

impl RoleManager {
    pub fn new(roles: Arc<dyn RoleRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { roles, users }
    }

    async fn seed_one(&self, name: &str, description: &str, permissions: Vec<Permission>) -> AppResult<()> {
        if self.roles.find_by_name(name).await?.is_some() {
            return Ok(());
        }

        self.roles
            .create(NewRole {
                name: name.to_string(),
                description: Some(description.to_string()),
                permissions,
                is_active: true,
            })
            .await?;

        info!(role = name, "seeded default role");
        Ok(())
    }
}

#[async_trait]
impl RoleService for RoleManager {
    async fn get(&self, id: Uuid) -> AppResult<Role> {
        self.roles.find_by_id(id).await?.ok_or_not_found("Role")
    }

    async fn list(&self, active_only: bool) -> AppResult<Vec<Role>> {
        self.roles.list(active_only).await
    }

    async fn create(&self, data: NewRole) -> AppResult<Role> {
        if self.roles.find_by_name(&data.name).await?.is_some() {
            return Err(AppError::conflict("Role"));
        }

        self.roles.create(data).await
    }

    async fn update(&self, id: Uuid, update: RoleUpdate) -> AppResult<Role> {
        if let Some(name) = &update.name {
            if let Some(existing) = self.roles.find_by_name(name).await? {
                if existing.id != id {
                    return Err(AppError::conflict("Role"));
                }
            }
        }

        self.roles.update(id, update).await
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let referencing = self.users.count_with_role(id).await?;
        if referencing > 0 {
            return Err(AppError::validation(
                "Cannot delete a role that is assigned to users",
            ));
        }

        self.roles.delete(id).await
    }

    async fn seed_defaults(&self) -> AppResult<()> {
        self.seed_one(
            ROLE_ADMIN,
            "Full administrative access",
            Permission::ALL.to_vec(),
        )
        .await?;

        self.seed_one(
            ROLE_EXECUTIVE_ASSISTANT,
            "Task management with read access to users",
            vec![
                Permission::UserRead,
                Permission::TodoRead,
                Permission::TodoWrite,
                Permission::TodoDelete,
            ],
        )
        .await
    }
}
