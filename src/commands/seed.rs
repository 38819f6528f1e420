//! Seed command - creates the built-in roles.

use std::sync::Arc;

use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::{Database, RoleStore, UserStore};
use crate::services::{RoleManager, RoleService};

/// Execute the seed command (idempotent)
pub async fn execute(config: Config) -> AppResult<()> {
    tracing::info!("Seeding default roles...");

    let db = Database::connect(&config).await;
    let conn = db.get_connection();

    let roles = RoleManager::new(
        Arc::new(RoleStore::new(conn.clone())),
        Arc::new(UserStore::new(conn)),
    );

    roles.seed_defaults().await?;

    tracing::info!("Seed completed");
    Ok(())
}
