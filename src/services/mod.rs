//! Business logic layer.

pub mod access_control;
pub mod auth_service;
pub mod container;
pub mod role_service;
pub mod todo_service;
pub mod user_service;

pub use access_control::{AccessControl, RoleGuard};
pub use auth_service::{AuthResponse, AuthService, Authenticator, Claims, TokenPair};
pub use container::{ServiceContainer, Services};
pub use role_service::{RoleManager, RoleService};
pub use todo_service::{TodoManager, TodoService};
pub use user_service::{UserManager, UserService};
