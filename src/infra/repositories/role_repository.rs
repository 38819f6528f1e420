//! Role repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::role::{self, ActiveModel, Entity as RoleEntity};
use crate::domain::{NewRole, Permission, Role, RoleUpdate};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Role repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Find role by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Role>>;

    /// Find all roles among the given ids
    async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<Role>>;

    /// Find role by exact name
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>>;

    /// Create a new role
    async fn create(&self, data: NewRole) -> AppResult<Role>;

    /// Apply a partial update
    async fn update(&self, id: Uuid, data: RoleUpdate) -> AppResult<Role>;

    /// Hard delete a role (reference checks happen in the service)
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// List roles sorted by name, optionally only active ones
    async fn list(&self, active_only: bool) -> AppResult<Vec<Role>>;
}

fn permissions_to_json(permissions: &[Permission]) -> sea_orm::prelude::Json {
    serde_json::json!(permissions)
}

/// Concrete implementation of RoleRepository
pub struct RoleStore {
    db: DatabaseConnection,
}

impl RoleStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RoleRepository for RoleStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Role>> {
        let result = RoleEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Role::from))
    }

    async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<Role>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = RoleEntity::find()
            .filter(role::Column::Id.is_in(ids))
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Role::from).collect())
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        let result = RoleEntity::find()
            .filter(role::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Role::from))
    }

    async fn create(&self, data: NewRole) -> AppResult<Role> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(data.name),
            description: Set(data.description),
            permissions: Set(permissions_to_json(&data.permissions)),
            is_active: Set(data.is_active),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(Role::from(model))
    }

    async fn update(&self, id: Uuid, data: RoleUpdate) -> AppResult<Role> {
        let model = RoleEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("Role"))?;

        let mut active: ActiveModel = model.into();

        if let Some(name) = data.name {
            active.name = Set(name);
        }
        if let Some(description) = data.description {
            active.description = Set(Some(description));
        }
        if let Some(permissions) = data.permissions {
            active.permissions = Set(permissions_to_json(&permissions));
        }
        if let Some(is_active) = data.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Role::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = RoleEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("Role"));
        }
        Ok(())
    }

    async fn list(&self, active_only: bool) -> AppResult<Vec<Role>> {
        let mut query = RoleEntity::find().order_by_asc(role::Column::Name);
        if active_only {
            query = query.filter(role::Column::IsActive.eq(true));
        }

        let models = query.all(&self.db).await.map_err(AppError::from)?;
        Ok(models.into_iter().map(Role::from).collect())
    }
}
