//! Todo database entity for SeaORM.

use std::str::FromStr;

use sea_orm::entity::prelude::*;

use crate::domain::{Priority, Todo, TodoState};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "todos")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub priority: String,
    pub due_date: Option<DateTimeUtc>,
    pub created_by: Uuid,
    pub edited_by: Option<Uuid>,
    pub deleted_by: Option<Uuid>,
    /// Soft-delete timestamp (NULL = active)
    pub deleted_at: Option<DateTimeUtc>,
    /// JSON array of assignee uuids
    #[sea_orm(column_type = "JsonBinary")]
    pub assigned_to: Json,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for Todo {
    fn from(model: Model) -> Self {
        let state = match model.deleted_at {
            Some(at) => TodoState::Deleted {
                at,
                by: model.deleted_by,
            },
            None => TodoState::Active,
        };

        Todo {
            id: model.id,
            title: model.title,
            description: model.description,
            completed: model.completed,
            priority: Priority::from_str(&model.priority).unwrap_or_default(),
            due_date: model.due_date,
            created_by: model.created_by,
            edited_by: model.edited_by,
            assigned_to: serde_json::from_value(model.assigned_to).unwrap_or_default(),
            state,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
