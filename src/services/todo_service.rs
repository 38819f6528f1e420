//! Todo business logic: CRUD with soft deletion, listing and statistics.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    NewTodo, SortOrder, Todo, TodoFilter, TodoPage, TodoSortBy, TodoStats, TodoUpdate,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::TodoRepository;

#[async_trait]
pub trait TodoService: Send + Sync {
    async fn create(&self, data: NewTodo) -> AppResult<Todo>;

    async fn list(
        &self,
        filter: TodoFilter,
        sort_by: TodoSortBy,
        order: SortOrder,
        page: u64,
        limit: u64,
    ) -> AppResult<TodoPage>;

    async fn get(&self, id: Uuid) -> AppResult<Todo>;

    async fn update(&self, id: Uuid, update: TodoUpdate, edited_by: Uuid) -> AppResult<Todo>;

    /// Soft-delete: the row survives with a deletion stamp and drops out
    /// of every read path.
    async fn soft_delete(&self, id: Uuid, deleted_by: Uuid) -> AppResult<()>;

    async fn stats(&self) -> AppResult<TodoStats>;
}

pub struct TodoManager {
    todos: Arc<dyn TodoRepository>,
}

impl TodoManager {
    pub fn new(todos: Arc<dyn TodoRepository>) -> Self {
        Self { todos }
    }
}

#[async_trait]
impl TodoService for TodoManager {
    async fn create(&self, data: NewTodo) -> AppResult<Todo> {
        if let Some(due) = data.due_date {
            if due <= Utc::now() {
                return Err(AppError::validation("Due date must be in the future"));
            }
        }

        self.todos.create(data).await
    }

    async fn list(
        &self,
        filter: TodoFilter,
        sort_by: TodoSortBy,
        order: SortOrder,
        page: u64,
        limit: u64,
    ) -> AppResult<TodoPage> {
        let (todos, total) = self
            .todos
            .list(filter, sort_by, order, page, limit)
            .await?;

        let total_pages = if total == 0 { 0 } else { (total + limit - 1) / limit };

        Ok(TodoPage {
            todos,
            total,
            page,
            total_pages,
        })
    }

    async fn get(&self, id: Uuid) -> AppResult<Todo> {
        self.todos.find_by_id(id).await?.ok_or_not_found("Todo")
    }

    async fn update(&self, id: Uuid, update: TodoUpdate, edited_by: Uuid) -> AppResult<Todo> {
        if let Some(due) = update.due_date {
            if due <= Utc::now() {
                return Err(AppError::validation("Due date must be in the future"));
            }
        }

        self.todos.update(id, update, edited_by).await
    }

    async fn soft_delete(&self, id: Uuid, deleted_by: Uuid) -> AppResult<()> {
        self.todos.soft_delete(id, deleted_by).await
    }

    async fn stats(&self) -> AppResult<TodoStats> {
        let counts = self.todos.counts().await?;
        Ok(TodoStats::from(counts))
    }
}
