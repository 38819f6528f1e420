//! Role database entity for SeaORM.

use std::str::FromStr;

use sea_orm::entity::prelude::*;

use crate::domain::{Permission, Role};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "roles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    pub description: Option<String>,
    /// JSON array of permission strings; membership in the enumeration is
    /// enforced at write time
    #[sea_orm(column_type = "JsonBinary")]
    pub permissions: Json,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for Role {
    fn from(model: Model) -> Self {
        let strings: Vec<String> = serde_json::from_value(model.permissions).unwrap_or_default();
        let permissions = strings
            .iter()
            .filter_map(|s| Permission::from_str(s).ok())
            .collect();

        Role {
            id: model.id,
            name: model.name,
            description: model.description,
            permissions,
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
