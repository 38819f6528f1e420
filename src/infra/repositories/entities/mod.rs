//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod role;
pub mod todo;
pub mod user;

/// Serialize a uuid list for a JSON column.
pub(crate) fn ids_to_json(ids: &[uuid::Uuid]) -> sea_orm::prelude::Json {
    serde_json::json!(ids)
}
