//! Authentication service unit tests.

use std::sync::Arc;

use chrono::Utc;
use mockall::predicate::eq;
use uuid::Uuid;

use taskboard_api::config::Config;
use taskboard_api::domain::{Password, User};
use taskboard_api::errors::AppError;
use taskboard_api::infra::MockUserRepository;
use taskboard_api::services::{AuthService, Authenticator};

fn test_config() -> Config {
    Config::new(
        "postgres://test",
        "test-secret-key-for-testing-only-32ch",
        15,
        7,
        "127.0.0.1",
        0,
    )
}

fn test_user(id: Uuid, password: &str) -> User {
    User {
        id,
        email: "jane@example.com".to_string(),
        password_hash: Password::new(password).unwrap().into_string(),
        first_name: "Jane".to_string(),
        last_name: "Doe".to_string(),
        role_ids: vec![Uuid::new_v4()],
        is_active: true,
        last_login: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[tokio::test]
async fn register_rejects_duplicate_email() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_email()
        .with(eq("jane@example.com"))
        .returning(|_| Ok(Some(test_user(Uuid::new_v4(), "password123"))));

    let service = Authenticator::new(Arc::new(repo), test_config());
    let result = service
        .register(
            // Email normalization happens before the lookup
            "  Jane@Example.COM ".to_string(),
            "password123".to_string(),
            "Jane".to_string(),
            "Doe".to_string(),
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Conflict(_)));
}

#[tokio::test]
async fn register_assigns_tokens_and_default_role() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_email().returning(|_| Ok(None));
    repo.expect_create().returning(|data| {
        Ok(User {
            id: Uuid::new_v4(),
            email: data.email,
            password_hash: data.password_hash,
            first_name: data.first_name,
            last_name: data.last_name,
            role_ids: vec![Uuid::new_v4()],
            is_active: true,
            last_login: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    });

    let service = Authenticator::new(Arc::new(repo), test_config());
    let auth = service
        .register(
            "jane@example.com".to_string(),
            "password123".to_string(),
            "Jane".to_string(),
            "Doe".to_string(),
        )
        .await
        .unwrap();

    assert_eq!(auth.user.email, "jane@example.com");
    assert!(!auth.tokens.access.is_empty());
    assert!(!auth.tokens.refresh.is_empty());
    assert_eq!(auth.tokens.token_type, "Bearer");
    assert_eq!(auth.tokens.expires_in, 15 * 60);
}

#[tokio::test]
async fn register_rejects_short_password() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_email().returning(|_| Ok(None));

    let service = Authenticator::new(Arc::new(repo), test_config());
    let result = service
        .register(
            "jane@example.com".to_string(),
            "short".to_string(),
            "Jane".to_string(),
            "Doe".to_string(),
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}

#[tokio::test]
async fn login_succeeds_and_stamps_last_login() {
    let user_id = Uuid::new_v4();

    let mut repo = MockUserRepository::new();
    repo.expect_find_by_email()
        .returning(move |_| Ok(Some(test_user(user_id, "password123"))));
    repo.expect_touch_last_login()
        .with(eq(user_id))
        .times(1)
        .returning(|_| Ok(()));

    let service = Authenticator::new(Arc::new(repo), test_config());
    let auth = service
        .login("jane@example.com".to_string(), "password123".to_string())
        .await
        .unwrap();

    assert_eq!(auth.user.id, user_id);
}

#[tokio::test]
async fn login_rejects_wrong_password() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_email()
        .returning(|_| Ok(Some(test_user(Uuid::new_v4(), "password123"))));

    let service = Authenticator::new(Arc::new(repo), test_config());
    let result = service
        .login("jane@example.com".to_string(), "wrong-password".to_string())
        .await;

    assert!(matches!(result.unwrap_err(), AppError::InvalidCredentials));
}

#[tokio::test]
async fn login_rejects_unknown_email_with_same_error() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_email().returning(|_| Ok(None));

    let service = Authenticator::new(Arc::new(repo), test_config());
    let result = service
        .login("nobody@example.com".to_string(), "password123".to_string())
        .await;

    // Unknown email and wrong password are indistinguishable to the caller
    assert!(matches!(result.unwrap_err(), AppError::InvalidCredentials));
}

#[tokio::test]
async fn login_rejects_deactivated_account() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_email().returning(|_| {
        let mut user = test_user(Uuid::new_v4(), "password123");
        user.is_active = false;
        Ok(Some(user))
    });

    let service = Authenticator::new(Arc::new(repo), test_config());
    let result = service
        .login("jane@example.com".to_string(), "password123".to_string())
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Forbidden));
}

#[tokio::test]
async fn refresh_issues_new_pair_for_valid_token() {
    let user_id = Uuid::new_v4();

    let mut repo = MockUserRepository::new();
    repo.expect_find_by_email()
        .returning(move |_| Ok(Some(test_user(user_id, "password123"))));
    repo.expect_touch_last_login().returning(|_| Ok(()));
    repo.expect_find_by_id()
        .with(eq(user_id))
        .returning(move |id| Ok(Some(test_user(id, "password123"))));

    let service = Authenticator::new(Arc::new(repo), test_config());
    let auth = service
        .login("jane@example.com".to_string(), "password123".to_string())
        .await
        .unwrap();

    let refreshed = service.refresh(&auth.tokens.refresh).await.unwrap();
    assert_eq!(refreshed.user.id, user_id);
    assert!(!refreshed.tokens.access.is_empty());
}

#[tokio::test]
async fn refresh_rejects_garbage_token() {
    let repo = MockUserRepository::new();
    let service = Authenticator::new(Arc::new(repo), test_config());

    let result = service.refresh("not-a-jwt").await;
    assert!(result.is_err());
}

#[tokio::test]
async fn token_signed_with_other_secret_is_rejected() {
    let user_id = Uuid::new_v4();

    let mut repo = MockUserRepository::new();
    repo.expect_find_by_email()
        .returning(move |_| Ok(Some(test_user(user_id, "password123"))));
    repo.expect_touch_last_login().returning(|_| Ok(()));

    let issuer = Authenticator::new(Arc::new(repo), test_config());
    let auth = issuer
        .login("jane@example.com".to_string(), "password123".to_string())
        .await
        .unwrap();

    let verifier = Authenticator::new(
        Arc::new(MockUserRepository::new()),
        Config::new(
            "postgres://test",
            "a-completely-different-secret-32chars",
            15,
            7,
            "127.0.0.1",
            0,
        ),
    );

    assert!(verifier.verify_token(&auth.tokens.access).is_err());
}

#[tokio::test]
async fn claims_carry_user_id_and_roles() {
    let user_id = Uuid::new_v4();
    let role_id = Uuid::new_v4();

    let mut repo = MockUserRepository::new();
    repo.expect_find_by_email().returning(move |_| {
        let mut user = test_user(user_id, "password123");
        user.role_ids = vec![role_id];
        Ok(Some(user))
    });
    repo.expect_touch_last_login().returning(|_| Ok(()));

    let service = Authenticator::new(Arc::new(repo), test_config());
    let auth = service
        .login("jane@example.com".to_string(), "password123".to_string())
        .await
        .unwrap();

    let claims = service.verify_token(&auth.tokens.access).unwrap();
    assert_eq!(claims.sub, user_id);
    assert_eq!(claims.roles, vec![role_id]);
    assert!(claims.exp > claims.iat);
}
