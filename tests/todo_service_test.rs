//! Todo service unit tests.

use std::sync::Arc;

use chrono::{Duration, Utc};
use mockall::predicate::eq;
use uuid::Uuid;

use taskboard_api::domain::{
    NewTodo, Priority, SortOrder, Todo, TodoCounts, TodoFilter, TodoSortBy, TodoState, TodoUpdate,
};
use taskboard_api::errors::AppError;
use taskboard_api::infra::MockTodoRepository;
use taskboard_api::services::{TodoManager, TodoService};

fn test_todo(id: Uuid) -> Todo {
    Todo {
        id,
        title: "Write report".to_string(),
        description: None,
        completed: false,
        priority: Priority::Medium,
        due_date: None,
        created_by: Uuid::new_v4(),
        edited_by: None,
        assigned_to: vec![],
        state: TodoState::Active,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn new_todo() -> NewTodo {
    NewTodo {
        title: "Write report".to_string(),
        description: None,
        priority: Priority::Medium,
        due_date: None,
        created_by: Uuid::new_v4(),
        assigned_to: vec![],
    }
}

#[tokio::test]
async fn create_rejects_past_due_date() {
    let repo = MockTodoRepository::new();
    let service = TodoManager::new(Arc::new(repo));

    let result = service
        .create(NewTodo {
            due_date: Some(Utc::now() - Duration::hours(1)),
            ..new_todo()
        })
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}

#[tokio::test]
async fn create_accepts_future_due_date() {
    let mut repo = MockTodoRepository::new();
    repo.expect_create().returning(|data| {
        let mut todo = test_todo(Uuid::new_v4());
        todo.due_date = data.due_date;
        Ok(todo)
    });

    let service = TodoManager::new(Arc::new(repo));
    let result = service
        .create(NewTodo {
            due_date: Some(Utc::now() + Duration::days(1)),
            ..new_todo()
        })
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn get_missing_todo_is_not_found() {
    let mut repo = MockTodoRepository::new();
    repo.expect_find_by_id().returning(|_| Ok(None));

    let service = TodoManager::new(Arc::new(repo));
    let result = service.get(Uuid::new_v4()).await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound(_)));
}

#[tokio::test]
async fn list_computes_total_pages_with_ceiling() {
    let mut repo = MockTodoRepository::new();
    repo.expect_list().returning(|_, _, _, _, _| {
        Ok((vec![test_todo(Uuid::new_v4())], 25))
    });

    let service = TodoManager::new(Arc::new(repo));
    let page = service
        .list(
            TodoFilter::default(),
            TodoSortBy::CreatedAt,
            SortOrder::Desc,
            1,
            10,
        )
        .await
        .unwrap();

    assert_eq!(page.total, 25);
    assert_eq!(page.total_pages, 3);
}

#[tokio::test]
async fn list_of_nothing_has_zero_pages() {
    let mut repo = MockTodoRepository::new();
    repo.expect_list().returning(|_, _, _, _, _| Ok((vec![], 0)));

    let service = TodoManager::new(Arc::new(repo));
    let page = service
        .list(
            TodoFilter::default(),
            TodoSortBy::CreatedAt,
            SortOrder::Desc,
            1,
            10,
        )
        .await
        .unwrap();

    assert_eq!(page.total_pages, 0);
    assert!(page.todos.is_empty());
}

#[tokio::test]
async fn update_rejects_past_due_date() {
    let repo = MockTodoRepository::new();
    let service = TodoManager::new(Arc::new(repo));

    let result = service
        .update(
            Uuid::new_v4(),
            TodoUpdate {
                due_date: Some(Utc::now() - Duration::minutes(5)),
                ..Default::default()
            },
            Uuid::new_v4(),
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}

#[tokio::test]
async fn update_stamps_editor() {
    let todo_id = Uuid::new_v4();
    let editor = Uuid::new_v4();

    let mut repo = MockTodoRepository::new();
    repo.expect_update()
        .with(eq(todo_id), mockall::predicate::always(), eq(editor))
        .returning(|id, update, edited_by| {
            let mut todo = test_todo(id);
            if let Some(completed) = update.completed {
                todo.completed = completed;
            }
            todo.edited_by = Some(edited_by);
            Ok(todo)
        });

    let service = TodoManager::new(Arc::new(repo));
    let todo = service
        .update(
            todo_id,
            TodoUpdate {
                completed: Some(true),
                ..Default::default()
            },
            editor,
        )
        .await
        .unwrap();

    assert!(todo.completed);
    assert_eq!(todo.edited_by, Some(editor));
}

#[tokio::test]
async fn deleting_a_deleted_todo_is_not_found() {
    let mut repo = MockTodoRepository::new();
    // The store filters deleted rows, so a second delete sees nothing
    repo.expect_soft_delete()
        .returning(|_, _| Err(AppError::not_found("Todo")));

    let service = TodoManager::new(Arc::new(repo));
    let result = service.soft_delete(Uuid::new_v4(), Uuid::new_v4()).await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound(_)));
}

#[tokio::test]
async fn stats_derive_pending_from_totals() {
    let mut repo = MockTodoRepository::new();
    repo.expect_counts().returning(|| {
        Ok(TodoCounts {
            total: 12,
            completed: 5,
            low: 3,
            medium: 6,
            high: 3,
        })
    });

    let service = TodoManager::new(Arc::new(repo));
    let stats = service.stats().await.unwrap();

    assert_eq!(stats.total, 12);
    assert_eq!(stats.completed, 5);
    assert_eq!(stats.pending, 7);
    assert_eq!(
        stats.by_priority.low + stats.by_priority.medium + stats.by_priority.high,
        stats.total
    );
}
