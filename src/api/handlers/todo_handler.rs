//! Todo handlers.

use axum::{
    extract::{Extension, Path, Query, State},
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{
    NewTodo, Permission, Priority, SortOrder, TodoFilter, TodoResponse, TodoSortBy, TodoStats,
    TodoUpdate,
};
use crate::errors::AppResult;
use crate::types::{ApiResponse, Created, NoContent, PaginationParams};

/// Todo creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodoRequest {
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    #[schema(example = "Prepare quarterly review")]
    pub title: String,
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub assigned_to: Vec<Uuid>,
}

/// Partial todo update request; absent fields are left untouched
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodoRequest {
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: Option<String>,
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,
    pub completed: Option<bool>,
    pub priority: Option<Priority>,
    pub due_date: Option<DateTime<Utc>>,
    pub assigned_to: Option<Vec<Uuid>>,
}

impl From<UpdateTodoRequest> for TodoUpdate {
    fn from(req: UpdateTodoRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            completed: req.completed,
            priority: req.priority,
            due_date: req.due_date,
            assigned_to: req.assigned_to,
        }
    }
}

/// Todo list query parameters
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase", default)]
pub struct ListTodosQuery {
    pub completed: Option<bool>,
    pub priority: Option<Priority>,
    pub sort_by: TodoSortBy,
    pub sort_order: SortOrder,
    pub page: u64,
    pub limit: u64,
}

impl Default for ListTodosQuery {
    fn default() -> Self {
        let pagination = PaginationParams::default();
        Self {
            completed: None,
            priority: None,
            sort_by: TodoSortBy::default(),
            sort_order: SortOrder::default(),
            page: pagination.page,
            limit: pagination.limit,
        }
    }
}

impl ListTodosQuery {
    fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            limit: self.limit,
        }
    }
}

/// Paginated todo list
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TodoListResponse {
    pub todos: Vec<TodoResponse>,
    pub total: u64,
    pub page: u64,
    pub total_pages: u64,
}

/// Create todo routes.
///
/// `/stats` is registered before `/:id` so it is not captured as an id.
pub fn todo_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_todos).post(create_todo))
        .route("/stats", get(todo_stats))
        .route("/:id", get(get_todo).put(update_todo).delete(delete_todo))
}

/// List todos with filtering, sorting and pagination
#[utoipa::path(
    get,
    path = "/api/todo",
    tag = "Todos",
    params(ListTodosQuery),
    responses(
        (status = 200, description = "Todo list", body = TodoListResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Missing todo:read permission")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_todos(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<ListTodosQuery>,
) -> AppResult<ApiResponse<TodoListResponse>> {
    state
        .access
        .require_permissions(&user.role_ids, &[Permission::TodoRead])
        .await?;

    let filter = TodoFilter {
        completed: query.completed,
        priority: query.priority,
    };

    let pagination = query.pagination();
    let page = state
        .todo_service
        .list(
            filter,
            query.sort_by,
            query.sort_order,
            pagination.page(),
            pagination.limit(),
        )
        .await?;

    Ok(ApiResponse::success(TodoListResponse {
        todos: page.todos.into_iter().map(TodoResponse::from).collect(),
        total: page.total,
        page: page.page,
        total_pages: page.total_pages,
    }))
}

/// Create a new todo
#[utoipa::path(
    post,
    path = "/api/todo",
    tag = "Todos",
    request_body = CreateTodoRequest,
    responses(
        (status = 201, description = "Todo created", body = TodoResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Missing todo:write permission")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_todo(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateTodoRequest>,
) -> AppResult<Created<TodoResponse>> {
    state
        .access
        .require_permissions(&user.role_ids, &[Permission::TodoWrite])
        .await?;

    let todo = state
        .todo_service
        .create(NewTodo {
            title: payload.title,
            description: payload.description,
            priority: payload.priority,
            due_date: payload.due_date,
            created_by: user.id,
            assigned_to: payload.assigned_to,
        })
        .await?;

    Ok(Created(ApiResponse::with_message(
        TodoResponse::from(todo),
        "Todo created successfully",
    )))
}

/// Aggregate statistics over non-deleted todos
#[utoipa::path(
    get,
    path = "/api/todo/stats",
    tag = "Todos",
    responses(
        (status = 200, description = "Todo statistics", body = TodoStats),
        (status = 403, description = "Missing todo:read permission")
    ),
    security(("bearer_auth" = []))
)]
pub async fn todo_stats(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<ApiResponse<TodoStats>> {
    state
        .access
        .require_permissions(&user.role_ids, &[Permission::TodoRead])
        .await?;

    let stats = state.todo_service.stats().await?;

    Ok(ApiResponse::success(stats))
}

/// Fetch a single todo by id
#[utoipa::path(
    get,
    path = "/api/todo/{id}",
    tag = "Todos",
    params(("id" = Uuid, Path, description = "Todo id")),
    responses(
        (status = 200, description = "Todo found", body = TodoResponse),
        (status = 404, description = "Todo not found or deleted")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_todo(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<TodoResponse>> {
    state
        .access
        .require_permissions(&user.role_ids, &[Permission::TodoRead])
        .await?;

    let todo = state.todo_service.get(id).await?;

    Ok(ApiResponse::success(TodoResponse::from(todo)))
}

/// Partially update a todo
#[utoipa::path(
    put,
    path = "/api/todo/{id}",
    tag = "Todos",
    params(("id" = Uuid, Path, description = "Todo id")),
    request_body = UpdateTodoRequest,
    responses(
        (status = 200, description = "Todo updated", body = TodoResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Todo not found or deleted")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_todo(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateTodoRequest>,
) -> AppResult<ApiResponse<TodoResponse>> {
    state
        .access
        .require_permissions(&user.role_ids, &[Permission::TodoWrite])
        .await?;

    let todo = state
        .todo_service
        .update(id, payload.into(), user.id)
        .await?;

    Ok(ApiResponse::success(TodoResponse::from(todo)))
}

/// Soft-delete a todo
#[utoipa::path(
    delete,
    path = "/api/todo/{id}",
    tag = "Todos",
    params(("id" = Uuid, Path, description = "Todo id")),
    responses(
        (status = 204, description = "Todo deleted"),
        (status = 404, description = "Todo not found or already deleted")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_todo(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    state
        .access
        .require_permissions(&user.role_ids, &[Permission::TodoDelete])
        .await?;

    state.todo_service.soft_delete(id, user.id).await?;

    Ok(NoContent)
}
