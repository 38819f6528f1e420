//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{auth_handler, role_handler, todo_handler, user_handler};
use crate::domain::{
    Permission, Priority, PriorityBreakdown, RoleResponse, SortOrder, TodoResponse, TodoSortBy,
    TodoStats, UserResponse,
};
use crate::services::{AuthResponse, TokenPair};

/// OpenAPI documentation for the Taskboard API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Taskboard API",
        version = "0.1.0",
        description = "Task management API with JWT authentication and role-based access control",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // Authentication endpoints
        auth_handler::register,
        auth_handler::login,
        auth_handler::refresh_token,
        // Todo endpoints
        todo_handler::list_todos,
        todo_handler::create_todo,
        todo_handler::todo_stats,
        todo_handler::get_todo,
        todo_handler::update_todo,
        todo_handler::delete_todo,
        // User endpoints
        user_handler::me,
        user_handler::list_users,
        user_handler::create_user,
        user_handler::get_user,
        user_handler::update_user,
        user_handler::delete_user,
        user_handler::change_password,
        // Role endpoints
        role_handler::list_roles,
        role_handler::create_role,
        role_handler::get_role,
        role_handler::update_role,
        role_handler::delete_role,
    ),
    components(
        schemas(
            // Domain types
            Permission,
            Priority,
            TodoSortBy,
            SortOrder,
            TodoResponse,
            TodoStats,
            PriorityBreakdown,
            UserResponse,
            RoleResponse,
            // Auth types
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            auth_handler::RefreshTokenRequest,
            AuthResponse,
            TokenPair,
            // Todo handler types
            todo_handler::CreateTodoRequest,
            todo_handler::UpdateTodoRequest,
            todo_handler::TodoListResponse,
            // User handler types
            user_handler::CreateUserRequest,
            user_handler::UpdateUserRequest,
            user_handler::ChangePasswordRequest,
            // Role handler types
            role_handler::CreateRoleRequest,
            role_handler::UpdateRoleRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and token refresh"),
        (name = "Todos", description = "Todo management operations"),
        (name = "Users", description = "User management operations"),
        (name = "Roles", description = "Role and permission management")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /api/auth/login"))
                        .build(),
                ),
            );
        }
    }
}
