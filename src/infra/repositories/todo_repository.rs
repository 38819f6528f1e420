//! Todo repository implementation with soft delete support.
//!
//! All query methods exclude soft-deleted rows; a deleted todo can only be
//! observed through its row still existing in the table.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, Select, Set,
};
use uuid::Uuid;

use super::entities::ids_to_json;
use super::entities::todo::{self, ActiveModel, Entity as TodoEntity};
use crate::domain::{
    NewTodo, Priority, SortOrder, Todo, TodoCounts, TodoFilter, TodoSortBy, TodoUpdate,
};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Todo repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Persist a new todo
    async fn create(&self, data: NewTodo) -> AppResult<Todo>;

    /// Find an active todo by ID (soft-deleted rows are invisible)
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Todo>>;

    /// One page of active todos plus the total match count
    async fn list(
        &self,
        filter: TodoFilter,
        sort_by: TodoSortBy,
        order: SortOrder,
        page: u64,
        limit: u64,
    ) -> AppResult<(Vec<Todo>, u64)>;

    /// Apply a partial update to an active todo
    async fn update(&self, id: Uuid, data: TodoUpdate, edited_by: Uuid) -> AppResult<Todo>;

    /// Mark an active todo deleted; fails with NotFound if already deleted
    async fn soft_delete(&self, id: Uuid, deleted_by: Uuid) -> AppResult<()>;

    /// Raw counts over active todos
    async fn counts(&self) -> AppResult<TodoCounts>;
}

fn sort_column(sort_by: TodoSortBy) -> todo::Column {
    match sort_by {
        TodoSortBy::CreatedAt => todo::Column::CreatedAt,
        TodoSortBy::UpdatedAt => todo::Column::UpdatedAt,
        TodoSortBy::Title => todo::Column::Title,
        TodoSortBy::Priority => todo::Column::Priority,
        TodoSortBy::DueDate => todo::Column::DueDate,
    }
}

/// Concrete implementation of TodoRepository
pub struct TodoStore {
    db: DatabaseConnection,
}

impl TodoStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Base query over active rows with the list filter applied
    fn active_filtered(filter: TodoFilter) -> Select<TodoEntity> {
        let mut query = TodoEntity::find().filter(todo::Column::DeletedAt.is_null());

        if let Some(completed) = filter.completed {
            query = query.filter(todo::Column::Completed.eq(completed));
        }
        if let Some(priority) = filter.priority {
            query = query.filter(todo::Column::Priority.eq(priority.as_str()));
        }

        query
    }

    async fn count_active(&self, filter: TodoFilter) -> AppResult<u64> {
        Self::active_filtered(filter)
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }
}

#[async_trait]
impl TodoRepository for TodoStore {
    async fn create(&self, data: NewTodo) -> AppResult<Todo> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(data.title),
            description: Set(data.description),
            completed: Set(false),
            priority: Set(data.priority.as_str().to_string()),
            due_date: Set(data.due_date),
            created_by: Set(data.created_by),
            edited_by: Set(None),
            deleted_by: Set(None),
            deleted_at: Set(None),
            assigned_to: Set(ids_to_json(&data.assigned_to)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(Todo::from(model))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Todo>> {
        let result = TodoEntity::find_by_id(id)
            .filter(todo::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Todo::from))
    }

    async fn list(
        &self,
        filter: TodoFilter,
        sort_by: TodoSortBy,
        order: SortOrder,
        page: u64,
        limit: u64,
    ) -> AppResult<(Vec<Todo>, u64)> {
        let direction = match order {
            SortOrder::Asc => Order::Asc,
            SortOrder::Desc => Order::Desc,
        };

        let query = Self::active_filtered(filter).order_by(sort_column(sort_by), direction);

        let paginator = query.paginate(&self.db, limit);
        let total = paginator.num_items().await.map_err(AppError::from)?;
        let models = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(AppError::from)?;

        Ok((models.into_iter().map(Todo::from).collect(), total))
    }

    async fn update(&self, id: Uuid, data: TodoUpdate, edited_by: Uuid) -> AppResult<Todo> {
        let model = TodoEntity::find_by_id(id)
            .filter(todo::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("Todo"))?;

        let mut active: ActiveModel = model.into();

        if let Some(title) = data.title {
            active.title = Set(title);
        }
        if let Some(description) = data.description {
            active.description = Set(Some(description));
        }
        if let Some(completed) = data.completed {
            active.completed = Set(completed);
        }
        if let Some(priority) = data.priority {
            active.priority = Set(priority.as_str().to_string());
        }
        if let Some(due_date) = data.due_date {
            active.due_date = Set(Some(due_date));
        }
        if let Some(assigned_to) = data.assigned_to {
            active.assigned_to = Set(ids_to_json(&assigned_to));
        }
        active.edited_by = Set(Some(edited_by));
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Todo::from(model))
    }

    async fn soft_delete(&self, id: Uuid, deleted_by: Uuid) -> AppResult<()> {
        // A second delete finds nothing and surfaces as NotFound
        let model = TodoEntity::find_by_id(id)
            .filter(todo::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("Todo"))?;

        let mut active: ActiveModel = model.into();
        let now = chrono::Utc::now();
        active.deleted_at = Set(Some(now));
        active.deleted_by = Set(Some(deleted_by));
        active.updated_at = Set(now);

        active.update(&self.db).await.map_err(AppError::from)?;
        Ok(())
    }

    async fn counts(&self) -> AppResult<TodoCounts> {
        let total = self.count_active(TodoFilter::default()).await?;
        let completed = self
            .count_active(TodoFilter {
                completed: Some(true),
                ..Default::default()
            })
            .await?;

        let mut by_priority = [0u64; 3];
        for (slot, priority) in by_priority
            .iter_mut()
            .zip([Priority::Low, Priority::Medium, Priority::High])
        {
            *slot = self
                .count_active(TodoFilter {
                    priority: Some(priority),
                    ..Default::default()
                })
                .await?;
        }

        Ok(TodoCounts {
            total,
            completed,
            low: by_priority[0],
            medium: by_priority[1],
            high: by_priority[2],
        })
    }
}
