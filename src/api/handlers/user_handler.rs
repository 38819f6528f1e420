//! User management handlers.

use axum::{
    extract::{Extension, Path, Query, State},
    routing::{get, patch},
    Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{Permission, UserFilter, UserResponse, UserUpdate};
use crate::errors::AppResult;
use crate::types::{ApiResponse, Created, NoContent};

/// Admin user creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 50, message = "First name must be 1-50 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 50, message = "Last name must be 1-50 characters"))]
    pub last_name: String,
    #[serde(default)]
    pub roles: Vec<Uuid>,
}

/// Partial user update request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 50, message = "First name must be 1-50 characters"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 50, message = "Last name must be 1-50 characters"))]
    pub last_name: Option<String>,
    pub roles: Option<Vec<Uuid>>,
    pub is_active: Option<bool>,
}

/// Password change request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,
}

/// User list query parameters
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase", default)]
pub struct ListUsersQuery {
    pub is_active: Option<bool>,
    pub role: Option<Uuid>,
    pub search: Option<String>,
}

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/me", get(me))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
        .route("/:id/change-password", patch(change_password))
}

/// Current caller's profile
#[utoipa::path(
    get,
    path = "/api/user/me",
    tag = "Users",
    responses(
        (status = 200, description = "Current user profile", body = UserResponse),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = []))
)]
pub async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<ApiResponse<UserResponse>> {
    let profile = state.user_service.get(user.id).await?;

    Ok(ApiResponse::success(UserResponse::from(profile)))
}

/// List users
#[utoipa::path(
    get,
    path = "/api/user",
    tag = "Users",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "User list", body = [UserResponse]),
        (status = 403, description = "Missing user:read permission")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_users(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<ListUsersQuery>,
) -> AppResult<ApiResponse<Vec<UserResponse>>> {
    state
        .access
        .require_permissions(&user.role_ids, &[Permission::UserRead])
        .await?;

    let users = state
        .user_service
        .list(UserFilter {
            is_active: query.is_active,
            role_id: query.role,
            search: query.search,
        })
        .await?;

    Ok(ApiResponse::success(
        users.into_iter().map(UserResponse::from).collect(),
    ))
}

/// Create a user with explicit role assignments
#[utoipa::path(
    post,
    path = "/api/user",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Missing user:write permission"),
        (status = 409, description = "Email already registered")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_user(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateUserRequest>,
) -> AppResult<Created<UserResponse>> {
    state
        .access
        .require_permissions(&user.role_ids, &[Permission::UserWrite])
        .await?;

    let created = state
        .user_service
        .create(
            payload.email,
            payload.password,
            payload.first_name,
            payload.last_name,
            payload.roles,
        )
        .await?;

    Ok(Created(ApiResponse::with_message(
        UserResponse::from(created),
        "User created successfully",
    )))
}

/// Fetch a user by id
#[utoipa::path(
    get,
    path = "/api/user/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_user(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<UserResponse>> {
    state
        .access
        .require_permissions(&user.role_ids, &[Permission::UserRead])
        .await?;

    let found = state.user_service.get(id).await?;

    Ok(ApiResponse::success(UserResponse::from(found)))
}

/// Partially update a user
#[utoipa::path(
    put,
    path = "/api/user/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email already registered")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_user(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> AppResult<ApiResponse<UserResponse>> {
    state
        .access
        .require_permissions(&user.role_ids, &[Permission::UserWrite])
        .await?;

    let updated = state
        .user_service
        .update(
            id,
            UserUpdate {
                email: payload.email,
                first_name: payload.first_name,
                last_name: payload.last_name,
                role_ids: payload.roles,
                is_active: payload.is_active,
            },
        )
        .await?;

    Ok(ApiResponse::success(UserResponse::from(updated)))
}

/// Deactivate a user account
#[utoipa::path(
    delete,
    path = "/api/user/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 204, description = "User deactivated"),
        (status = 403, description = "Missing user:delete permission"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    state
        .access
        .require_permissions(&user.role_ids, &[Permission::UserDelete])
        .await?;

    state.user_service.deactivate(id).await?;

    Ok(NoContent)
}

/// Change a user's password.
///
/// Callers may change their own password; changing another account's
/// password requires `user:manage`.
#[utoipa::path(
    patch,
    path = "/api/user/{id}/change-password",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User id")),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed"),
        (status = 400, description = "Current password is incorrect"),
        (status = 403, description = "Not the account owner and missing user:manage")
    ),
    security(("bearer_auth" = []))
)]
pub async fn change_password(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<ChangePasswordRequest>,
) -> AppResult<ApiResponse<()>> {
    if user.id != id {
        state
            .access
            .require_permissions(&user.role_ids, &[Permission::UserManage])
            .await?;
    }

    state
        .user_service
        .change_password(id, &payload.current_password, &payload.new_password)
        .await?;

    Ok(ApiResponse::with_message((), "Password changed successfully"))
}
