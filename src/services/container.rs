//! Service container wiring repositories to services.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Database, RoleStore, TodoStore, UserStore};

use super::access_control::{AccessControl, RoleGuard};
use super::auth_service::{AuthService, Authenticator};
use super::role_service::{RoleManager, RoleService};
use super::todo_service::{TodoManager, TodoService};
use super::user_service::{UserManager, UserService};

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;
    fn users(&self) -> Arc<dyn UserService>;
    fn roles(&self) -> Arc<dyn RoleService>;
    fn todos(&self) -> Arc<dyn TodoService>;
    fn access(&self) -> Arc<dyn AccessControl>;
}

/// Production wiring: SeaORM-backed stores behind the service traits.
pub struct Services {
    auth: Arc<dyn AuthService>,
    users: Arc<dyn UserService>,
    roles: Arc<dyn RoleService>,
    todos: Arc<dyn TodoService>,
    access: Arc<dyn AccessControl>,
}

impl Services {
    pub fn new(database: &Database, config: Config) -> Self {
        let conn = database.get_connection();

        let user_store = Arc::new(UserStore::new(conn.clone()));
        let role_store = Arc::new(RoleStore::new(conn.clone()));
        let todo_store = Arc::new(TodoStore::new(conn));

        Self {
            auth: Arc::new(Authenticator::new(user_store.clone(), config)),
            users: Arc::new(UserManager::new(user_store.clone(), role_store.clone())),
            roles: Arc::new(RoleManager::new(role_store.clone(), user_store)),
            todos: Arc::new(TodoManager::new(todo_store)),
            access: Arc::new(RoleGuard::new(role_store)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.users.clone()
    }

    fn roles(&self) -> Arc<dyn RoleService> {
        self.roles.clone()
    }

    fn todos(&self) -> Arc<dyn TodoService> {
        self.todos.clone()
    }

    fn access(&self) -> Arc<dyn AccessControl> {
        self.access.clone()
    }
}
