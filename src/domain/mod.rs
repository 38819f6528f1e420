//! Core business entities and logic.
//!
//! Domain types are plain structs independent of persistence; the entity
//! layer converts to and from them at the repository boundary.

mod password;
mod role;
mod todo;
mod user;

pub use password::Password;
pub use role::{NewRole, Permission, Role, RoleResponse, RoleUpdate};
pub use todo::{
    NewTodo, Priority, PriorityBreakdown, SortOrder, Todo, TodoCounts, TodoFilter, TodoPage,
    TodoResponse, TodoSortBy, TodoState, TodoStats, TodoUpdate,
};
pub use user::{normalize_email, NewUser, User, UserFilter, UserResponse, UserUpdate};
