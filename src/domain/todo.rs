//! Todo domain entity, its soft-delete state, and query types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Todo priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(format!("unknown priority: {}", other)),
        }
    }
}

/// Soft-delete state.
///
/// `Deleted` is terminal: there is no undelete operation, and making the
/// state an explicit variant keeps accidental transitions out of the type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TodoState {
    Active,
    Deleted {
        at: DateTime<Utc>,
        by: Option<Uuid>,
    },
}

impl TodoState {
    pub fn is_deleted(&self) -> bool {
        matches!(self, TodoState::Deleted { .. })
    }
}

/// Todo domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Todo {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub priority: Priority,
    pub due_date: Option<DateTime<Utc>>,
    pub created_by: Uuid,
    pub edited_by: Option<Uuid>,
    pub assigned_to: Vec<Uuid>,
    pub state: TodoState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    pub fn is_deleted(&self) -> bool {
        self.state.is_deleted()
    }
}

/// Todo creation data
#[derive(Debug, Clone)]
pub struct NewTodo {
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub due_date: Option<DateTime<Utc>>,
    pub created_by: Uuid,
    pub assigned_to: Vec<Uuid>,
}

/// Partial todo update; absent fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct TodoUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
    pub priority: Option<Priority>,
    pub due_date: Option<DateTime<Utc>>,
    pub assigned_to: Option<Vec<Uuid>>,
}

impl TodoUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.completed.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
            && self.assigned_to.is_none()
    }
}

/// List filter
#[derive(Debug, Clone, Copy, Default)]
pub struct TodoFilter {
    pub completed: Option<bool>,
    pub priority: Option<Priority>,
}

/// Sort keys for todo listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum TodoSortBy {
    #[default]
    CreatedAt,
    UpdatedAt,
    Title,
    Priority,
    DueDate,
}

/// Sort direction (default descending, matching `createdAt desc`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// One page of todos
#[derive(Debug, Clone)]
pub struct TodoPage {
    pub todos: Vec<Todo>,
    pub total: u64,
    pub page: u64,
    pub total_pages: u64,
}

/// Raw counts over non-deleted todos, as read from the store
#[derive(Debug, Clone, Copy, Default)]
pub struct TodoCounts {
    pub total: u64,
    pub completed: u64,
    pub low: u64,
    pub medium: u64,
    pub high: u64,
}

/// Aggregate statistics over non-deleted todos
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TodoStats {
    pub total: u64,
    pub completed: u64,
    pub pending: u64,
    pub by_priority: PriorityBreakdown,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PriorityBreakdown {
    pub low: u64,
    pub medium: u64,
    pub high: u64,
}

impl From<TodoCounts> for TodoStats {
    fn from(counts: TodoCounts) -> Self {
        Self {
            total: counts.total,
            completed: counts.completed,
            // The count queries are not transactional, so completed can
            // momentarily exceed total under concurrent writes.
            pending: counts.total.saturating_sub(counts.completed),
            by_priority: PriorityBreakdown {
                low: counts.low,
                medium: counts.medium,
                high: counts.high,
            },
        }
    }
}

/// Todo response (wire shape; deleted todos are never returned)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TodoResponse {
    pub id: Uuid,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub completed: bool,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    pub created_by: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edited_by: Option<Uuid>,
    pub assigned_to: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Todo> for TodoResponse {
    fn from(todo: Todo) -> Self {
        Self {
            id: todo.id,
            title: todo.title,
            description: todo.description,
            completed: todo.completed,
            priority: todo.priority,
            due_date: todo.due_date,
            created_by: todo.created_by,
            edited_by: todo.edited_by,
            assigned_to: todo.assigned_to,
            created_at: todo.created_at,
            updated_at: todo.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_defaults_to_medium() {
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn priority_serde_is_lowercase() {
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "\"high\"");
        let p: Priority = serde_json::from_str("\"low\"").unwrap();
        assert_eq!(p, Priority::Low);
    }

    #[test]
    fn deleted_state_is_recognized() {
        let state = TodoState::Deleted {
            at: Utc::now(),
            by: Some(Uuid::new_v4()),
        };
        assert!(state.is_deleted());
        assert!(!TodoState::Active.is_deleted());
    }

    #[test]
    fn stats_pending_is_total_minus_completed() {
        let stats = TodoStats::from(TodoCounts {
            total: 10,
            completed: 4,
            low: 2,
            medium: 5,
            high: 3,
        });
        assert_eq!(stats.pending, 6);
        assert_eq!(
            stats.by_priority.low + stats.by_priority.medium + stats.by_priority.high,
            stats.total
        );
    }

    #[test]
    fn stats_pending_never_underflows() {
        // completed can race ahead of total between the two count queries
        let stats = TodoStats::from(TodoCounts {
            total: 3,
            completed: 5,
            ..Default::default()
        });
        assert_eq!(stats.pending, 0);
    }

    #[test]
    fn empty_update_is_detected() {
        assert!(TodoUpdate::default().is_empty());
        let update = TodoUpdate {
            completed: Some(true),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
