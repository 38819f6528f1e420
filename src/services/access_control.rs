//! Role and permission checks against a caller's assigned roles.
//!
//! Role assignments travel in the JWT as role ids; the guard resolves
//! them to role documents at check time so permission edits take effect
//! without re-issuing tokens.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::Permission;
use crate::errors::{AppError, AppResult};
use crate::infra::RoleRepository;

/// Authorization checks used by the HTTP handlers.
#[async_trait]
pub trait AccessControl: Send + Sync {
    /// Pass when any of the caller's active roles is named in `required`.
    async fn require_roles(&self, role_ids: &[Uuid], required: &[&str]) -> AppResult<()>;

    /// Pass when the union of the caller's active role permissions
    /// intersects `required`.
    async fn require_permissions(
        &self,
        role_ids: &[Uuid],
        required: &[Permission],
    ) -> AppResult<()>;
}

/// AccessControl backed by the role repository.
pub struct RoleGuard {
    roles: Arc<dyn RoleRepository>,
}

impl RoleGuard {
    pub fn new(roles: Arc<dyn RoleRepository>) -> Self {
        Self { roles }
    }

    async fn active_roles(&self, role_ids: &[Uuid]) -> AppResult<Vec<crate::domain::Role>> {
        let roles = self.roles.find_by_ids(role_ids.to_vec()).await?;
        Ok(roles.into_iter().filter(|r| r.is_active).collect())
    }
}

#[async_trait]
impl AccessControl for RoleGuard {
    async fn require_roles(&self, role_ids: &[Uuid], required: &[&str]) -> AppResult<()> {
        let roles = self.active_roles(role_ids).await?;

        if roles.iter().any(|r| required.contains(&r.name.as_str())) {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }

    async fn require_permissions(
        &self,
        role_ids: &[Uuid],
        required: &[Permission],
    ) -> AppResult<()> {
        let roles = self.active_roles(role_ids).await?;

        let granted: Vec<Permission> = roles
            .iter()
            .flat_map(|r| r.permissions.iter().copied())
            .collect();

        if required.iter().any(|p| granted.contains(p)) {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}
