//! Role management handlers.

use axum::{
    extract::{Extension, Path, Query, State},
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{NewRole, Permission, RoleResponse, RoleUpdate};
use crate::errors::AppResult;
use crate::types::{ApiResponse, Created, NoContent};

/// Role creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoleRequest {
    #[validate(length(min = 1, max = 50, message = "Role name must be 1-50 characters"))]
    #[schema(example = "Reviewer")]
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub permissions: Vec<Permission>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Partial role update request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoleRequest {
    #[validate(length(min = 1, max = 50, message = "Role name must be 1-50 characters"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub permissions: Option<Vec<Permission>>,
    pub is_active: Option<bool>,
}

/// Role list query parameters
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase", default)]
pub struct ListRolesQuery {
    /// When true, inactive roles are omitted
    pub active_only: bool,
}

/// Create role routes
pub fn role_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_roles).post(create_role))
        .route("/:id", get(get_role).put(update_role).delete(delete_role))
}

/// List roles
#[utoipa::path(
    get,
    path = "/api/role",
    tag = "Roles",
    params(ListRolesQuery),
    responses(
        (status = 200, description = "Role list", body = [RoleResponse]),
        (status = 403, description = "Missing role:read permission")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_roles(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<ListRolesQuery>,
) -> AppResult<ApiResponse<Vec<RoleResponse>>> {
    state
        .access
        .require_permissions(&user.role_ids, &[Permission::RoleRead])
        .await?;

    let roles = state.role_service.list(query.active_only).await?;

    Ok(ApiResponse::success(
        roles.into_iter().map(RoleResponse::from).collect(),
    ))
}

/// Create a role
#[utoipa::path(
    post,
    path = "/api/role",
    tag = "Roles",
    request_body = CreateRoleRequest,
    responses(
        (status = 201, description = "Role created", body = RoleResponse),
        (status = 403, description = "Missing role:write permission"),
        (status = 409, description = "Role name already exists")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_role(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateRoleRequest>,
) -> AppResult<Created<RoleResponse>> {
    state
        .access
        .require_permissions(&user.role_ids, &[Permission::RoleWrite])
        .await?;

    let role = state
        .role_service
        .create(NewRole {
            name: payload.name,
            description: payload.description,
            permissions: payload.permissions,
            is_active: payload.is_active,
        })
        .await?;

    Ok(Created(ApiResponse::with_message(
        RoleResponse::from(role),
        "Role created successfully",
    )))
}

/// Fetch a role by id
#[utoipa::path(
    get,
    path = "/api/role/{id}",
    tag = "Roles",
    params(("id" = Uuid, Path, description = "Role id")),
    responses(
        (status = 200, description = "Role found", body = RoleResponse),
        (status = 404, description = "Role not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_role(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<RoleResponse>> {
    state
        .access
        .require_permissions(&user.role_ids, &[Permission::RoleRead])
        .await?;

    let role = state.role_service.get(id).await?;

    Ok(ApiResponse::success(RoleResponse::from(role)))
}

/// Partially update a role
#[utoipa::path(
    put,
    path = "/api/role/{id}",
    tag = "Roles",
    params(("id" = Uuid, Path, description = "Role id")),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Role updated", body = RoleResponse),
        (status = 404, description = "Role not found"),
        (status = 409, description = "Role name already exists")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_role(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateRoleRequest>,
) -> AppResult<ApiResponse<RoleResponse>> {
    state
        .access
        .require_permissions(&user.role_ids, &[Permission::RoleWrite])
        .await?;

    let role = state
        .role_service
        .update(
            id,
            RoleUpdate {
                name: payload.name,
                description: payload.description,
                permissions: payload.permissions,
                is_active: payload.is_active,
            },
        )
        .await?;

    Ok(ApiResponse::success(RoleResponse::from(role)))
}

/// Delete a role (refused while users still reference it)
#[utoipa::path(
    delete,
    path = "/api/role/{id}",
    tag = "Roles",
    params(("id" = Uuid, Path, description = "Role id")),
    responses(
        (status = 204, description = "Role deleted"),
        (status = 400, description = "Role is still assigned to users"),
        (status = 403, description = "Missing role:delete permission"),
        (status = 404, description = "Role not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_role(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    state
        .access
        .require_permissions(&user.role_ids, &[Permission::RoleDelete])
        .await?;

    state.role_service.delete(id).await?;

    Ok(NoContent)
}
