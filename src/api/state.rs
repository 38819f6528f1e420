//! Application state - dependency injection container for the HTTP layer.

use std::sync::Arc;
use std::time::Instant;

use crate::config::{
    Config, RATE_LIMIT_AUTH_REQUESTS, RATE_LIMIT_AUTH_WINDOW_SECONDS, RATE_LIMIT_REQUESTS,
    RATE_LIMIT_WINDOW_SECONDS,
};
use crate::infra::{Database, RateLimiter};
use crate::services::{
    AccessControl, AuthService, RoleService, ServiceContainer, Services, TodoService, UserService,
};

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub user_service: Arc<dyn UserService>,
    pub role_service: Arc<dyn RoleService>,
    pub todo_service: Arc<dyn TodoService>,
    pub access: Arc<dyn AccessControl>,
    pub database: Arc<Database>,
    /// General per-client request limiter
    pub rate_limiter: Arc<RateLimiter>,
    /// Stricter limiter for the auth endpoints
    pub auth_rate_limiter: Arc<RateLimiter>,
    /// Process start time, reported by the health endpoint
    pub started_at: Instant,
}

impl AppState {
    pub fn from_config(database: Arc<Database>, config: Config) -> Self {
        let container = Services::new(&database, config);

        Self {
            auth_service: container.auth(),
            user_service: container.users(),
            role_service: container.roles(),
            todo_service: container.todos(),
            access: container.access(),
            database,
            rate_limiter: Arc::new(RateLimiter::new(
                RATE_LIMIT_REQUESTS,
                RATE_LIMIT_WINDOW_SECONDS,
            )),
            auth_rate_limiter: Arc::new(RateLimiter::new(
                RATE_LIMIT_AUTH_REQUESTS,
                RATE_LIMIT_AUTH_WINDOW_SECONDS,
            )),
            started_at: Instant::now(),
        }
    }
}
