//! Infrastructure layer - External systems integration
//!
//! This module handles database connections, repositories, and the
//! in-process rate limiter.

pub mod db;
pub mod rate_limit;
pub mod repositories;

pub use db::{Database, Migrator};
pub use rate_limit::RateLimiter;
pub use repositories::{
    RoleRepository, RoleStore, TodoRepository, TodoStore, UserRepository, UserStore,
};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{MockRoleRepository, MockTodoRepository, MockUserRepository};
