//! HTTP request handlers.

pub mod auth_handler;
pub mod role_handler;
pub mod todo_handler;
pub mod user_handler;
