//! Repository layer - Data access abstraction
//!
//! Repositories translate between SeaORM entities and domain types,
//! following the Repository pattern for clean separation of concerns.

pub(crate) mod entities;
mod role_repository;
mod todo_repository;
mod user_repository;

pub use role_repository::{RoleRepository, RoleStore};
pub use todo_repository::{TodoRepository, TodoStore};
pub use user_repository::{UserRepository, UserStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use role_repository::MockRoleRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use todo_repository::MockTodoRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
