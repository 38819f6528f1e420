//! User repository implementation.
//!
//! Users are never hard-deleted; `deactivate` clears the active flag. The
//! store assigns the default role when a user is created without any.

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, Set,
};
use uuid::Uuid;

use super::entities::ids_to_json;
use super::entities::role::{self, Entity as RoleEntity};
use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::config::{ROLE_ADMIN, ROLE_EXECUTIVE_ASSISTANT};
use crate::domain::{NewUser, User, UserFilter, UserUpdate};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find user by (already normalized) email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Create a new user; an empty role list gets the default role
    async fn create(&self, data: NewUser) -> AppResult<User>;

    /// Apply a partial update
    async fn update(&self, id: Uuid, data: UserUpdate) -> AppResult<User>;

    /// Replace the stored password hash
    async fn set_password(&self, id: Uuid, password_hash: String) -> AppResult<()>;

    /// Stamp the last-login timestamp
    async fn touch_last_login(&self, id: Uuid) -> AppResult<()>;

    /// Soft-disable the account (`is_active = false`)
    async fn deactivate(&self, id: Uuid) -> AppResult<()>;

    /// List users matching the filter
    async fn list(&self, filter: UserFilter) -> AppResult<Vec<User>>;

    /// Count users referencing a role (used to block role deletion)
    async fn count_with_role(&self, role_id: Uuid) -> AppResult<u64>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Resolve the default role id: Executive Assistant first, Admin as
    /// fallback (mirrors the seed ordering).
    async fn default_role_id(&self) -> AppResult<Option<Uuid>> {
        for name in [ROLE_EXECUTIVE_ASSISTANT, ROLE_ADMIN] {
            let found = RoleEntity::find()
                .filter(role::Column::Name.eq(name))
                .filter(role::Column::IsActive.eq(true))
                .one(&self.db)
                .await
                .map_err(AppError::from)?;
            if let Some(role) = found {
                return Ok(Some(role.id));
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn create(&self, data: NewUser) -> AppResult<User> {
        let role_ids = if data.role_ids.is_empty() {
            self.default_role_id().await?.into_iter().collect()
        } else {
            data.role_ids
        };

        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(data.email),
            password_hash: Set(data.password_hash),
            first_name: Set(data.first_name),
            last_name: Set(data.last_name),
            role_ids: Set(ids_to_json(&role_ids)),
            is_active: Set(true),
            last_login: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(User::from(model))
    }

    async fn update(&self, id: Uuid, data: UserUpdate) -> AppResult<User> {
        let model = UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;

        let mut active: ActiveModel = model.into();

        if let Some(email) = data.email {
            active.email = Set(email);
        }
        if let Some(first_name) = data.first_name {
            active.first_name = Set(first_name);
        }
        if let Some(last_name) = data.last_name {
            active.last_name = Set(last_name);
        }
        if let Some(role_ids) = data.role_ids {
            active.role_ids = Set(ids_to_json(&role_ids));
        }
        if let Some(is_active) = data.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(User::from(model))
    }

    async fn set_password(&self, id: Uuid, password_hash: String) -> AppResult<()> {
        let model = UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;

        let mut active: ActiveModel = model.into();
        active.password_hash = Set(password_hash);
        active.updated_at = Set(chrono::Utc::now());
        active.update(&self.db).await.map_err(AppError::from)?;
        Ok(())
    }

    async fn touch_last_login(&self, id: Uuid) -> AppResult<()> {
        let model = UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;

        let mut active: ActiveModel = model.into();
        active.last_login = Set(Some(chrono::Utc::now()));
        active.update(&self.db).await.map_err(AppError::from)?;
        Ok(())
    }

    async fn deactivate(&self, id: Uuid) -> AppResult<()> {
        let model = UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;

        let mut active: ActiveModel = model.into();
        active.is_active = Set(false);
        active.updated_at = Set(chrono::Utc::now());
        active.update(&self.db).await.map_err(AppError::from)?;
        Ok(())
    }

    async fn list(&self, filter: UserFilter) -> AppResult<Vec<User>> {
        let mut query = UserEntity::find();

        if let Some(is_active) = filter.is_active {
            query = query.filter(user::Column::IsActive.eq(is_active));
        }
        if let Some(role_id) = filter.role_id {
            query = query.filter(Expr::cust_with_values(
                "role_ids @> $1",
                [ids_to_json(&[role_id])],
            ));
        }
        if let Some(search) = filter.search {
            query = query.filter(
                Condition::any()
                    .add(user::Column::FirstName.contains(&search))
                    .add(user::Column::LastName.contains(&search))
                    .add(user::Column::Email.contains(&search)),
            );
        }

        let models = query.all(&self.db).await.map_err(AppError::from)?;
        Ok(models.into_iter().map(User::from).collect())
    }

    async fn count_with_role(&self, role_id: Uuid) -> AppResult<u64> {
        UserEntity::find()
            .filter(Expr::cust_with_values(
                "role_ids @> $1",
                [ids_to_json(&[role_id])],
            ))
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }
}
