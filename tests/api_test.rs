//! Wire-level tests for response envelopes and request types.
//!
//! These exercise the HTTP shapes without a database connection.

use axum::body::to_bytes;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

use taskboard_api::domain::{Priority, Todo, TodoResponse, TodoState, User, UserResponse};
use taskboard_api::errors::{AppError, FieldError};
use taskboard_api::types::{ApiResponse, Created, NoContent};

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn success_envelope_has_status_and_data() {
    let response = ApiResponse::success(serde_json::json!({"n": 1})).into_response();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "success");
    assert_eq!(json["data"]["n"], 1);
}

#[tokio::test]
async fn created_wrapper_returns_201() {
    let response = Created(ApiResponse::with_message((), "Created")).into_response();
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["message"], "Created");
}

#[tokio::test]
async fn no_content_is_empty_204() {
    let response = NoContent.into_response();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn error_envelope_carries_message() {
    let response = AppError::not_found("Todo").into_response();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["status"], "error");
    assert_eq!(json["message"], "Todo not found");
    assert!(json.get("errors").is_none());
}

#[tokio::test]
async fn field_validation_lists_field_errors() {
    let response = AppError::FieldValidation(vec![FieldError {
        field: "email".to_string(),
        message: "Invalid email format".to_string(),
    }])
    .into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["errors"][0]["field"], "email");
    assert_eq!(json["errors"][0]["message"], "Invalid email format");
}

#[tokio::test]
async fn database_errors_do_not_leak_details() {
    let response =
        AppError::Database(sea_orm::DbErr::Custom("connection refused at 10.0.0.5".into()))
            .into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert_eq!(json["message"], "A database error occurred");
}

#[tokio::test]
async fn error_statuses_map_to_http_codes() {
    assert_eq!(
        AppError::Unauthorized.into_response().status(),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        AppError::InvalidCredentials.into_response().status(),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        AppError::Forbidden.into_response().status(),
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        AppError::conflict("User").into_response().status(),
        StatusCode::CONFLICT
    );
    assert_eq!(
        AppError::validation("bad").into_response().status(),
        StatusCode::BAD_REQUEST
    );
}

#[test]
fn todo_response_uses_camel_case_and_hides_deletion() {
    let todo = Todo {
        id: Uuid::new_v4(),
        title: "Report".to_string(),
        description: None,
        completed: false,
        priority: Priority::High,
        due_date: Some(Utc::now()),
        created_by: Uuid::new_v4(),
        edited_by: None,
        assigned_to: vec![Uuid::new_v4()],
        state: TodoState::Active,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    let json = serde_json::to_value(TodoResponse::from(todo)).unwrap();
    assert!(json.get("dueDate").is_some());
    assert!(json.get("createdBy").is_some());
    assert!(json.get("assignedTo").is_some());
    assert_eq!(json["priority"], "high");
    // Deletion bookkeeping never appears on the wire
    assert!(json.get("state").is_none());
    assert!(json.get("deletedAt").is_none());
}

#[test]
fn user_response_never_contains_password() {
    let user = User {
        id: Uuid::new_v4(),
        email: "jane@example.com".to_string(),
        password_hash: "argon2-hash-value".to_string(),
        first_name: "Jane".to_string(),
        last_name: "Doe".to_string(),
        role_ids: vec![Uuid::new_v4()],
        is_active: true,
        last_login: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    let json = serde_json::to_string(&UserResponse::from(user)).unwrap();
    assert!(!json.contains("argon2-hash-value"));
    assert!(!json.to_lowercase().contains("password"));
}

#[derive(serde::Deserialize, Validate)]
struct EmailProbe {
    #[validate(email(message = "Invalid email format"))]
    email: String,
}

#[test]
fn validator_rules_reject_malformed_email() {
    let probe = EmailProbe {
        email: "not-an-email".to_string(),
    };
    assert!(probe.validate().is_err());

    let probe = EmailProbe {
        email: "jane@example.com".to_string(),
    };
    assert!(probe.validate().is_ok());
}
