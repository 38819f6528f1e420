//! Role guard unit tests.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use taskboard_api::domain::{Permission, Role};
use taskboard_api::errors::AppError;
use taskboard_api::infra::MockRoleRepository;
use taskboard_api::services::{AccessControl, RoleGuard};

fn role(name: &str, permissions: Vec<Permission>, is_active: bool) -> Role {
    Role {
        id: Uuid::new_v4(),
        name: name.to_string(),
        description: None,
        permissions,
        is_active,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[tokio::test]
async fn permission_in_any_role_grants_access() {
    let mut repo = MockRoleRepository::new();
    repo.expect_find_by_ids().returning(|_| {
        Ok(vec![
            role("Viewer", vec![Permission::TodoRead], true),
            role("Writer", vec![Permission::TodoWrite], true),
        ])
    });

    let guard = RoleGuard::new(Arc::new(repo));
    let result = guard
        .require_permissions(&[Uuid::new_v4(), Uuid::new_v4()], &[Permission::TodoWrite])
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn missing_permission_is_forbidden() {
    let mut repo = MockRoleRepository::new();
    repo.expect_find_by_ids()
        .returning(|_| Ok(vec![role("Viewer", vec![Permission::TodoRead], true)]));

    let guard = RoleGuard::new(Arc::new(repo));
    let result = guard
        .require_permissions(&[Uuid::new_v4()], &[Permission::TodoDelete])
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Forbidden));
}

#[tokio::test]
async fn one_matching_permission_is_enough() {
    let mut repo = MockRoleRepository::new();
    repo.expect_find_by_ids()
        .returning(|_| Ok(vec![role("Writer", vec![Permission::TodoWrite], true)]));

    let guard = RoleGuard::new(Arc::new(repo));
    // Holding any one of the required permissions grants access
    let result = guard
        .require_permissions(
            &[Uuid::new_v4()],
            &[Permission::TodoWrite, Permission::TodoDelete],
        )
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn inactive_roles_grant_nothing() {
    let mut repo = MockRoleRepository::new();
    repo.expect_find_by_ids()
        .returning(|_| Ok(vec![role("Admin", Permission::ALL.to_vec(), false)]));

    let guard = RoleGuard::new(Arc::new(repo));
    let result = guard
        .require_permissions(&[Uuid::new_v4()], &[Permission::TodoRead])
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Forbidden));
}

#[tokio::test]
async fn empty_role_list_is_forbidden() {
    let mut repo = MockRoleRepository::new();
    repo.expect_find_by_ids().returning(|_| Ok(vec![]));

    let guard = RoleGuard::new(Arc::new(repo));
    let result = guard
        .require_permissions(&[], &[Permission::TodoRead])
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Forbidden));
}

#[tokio::test]
async fn role_name_check_admits_by_name() {
    let mut repo = MockRoleRepository::new();
    repo.expect_find_by_ids()
        .returning(|_| Ok(vec![role("Admin", Permission::ALL.to_vec(), true)]));

    let guard = RoleGuard::new(Arc::new(repo));
    assert!(guard
        .require_roles(&[Uuid::new_v4()], &["Admin"])
        .await
        .is_ok());
    assert!(matches!(
        guard
            .require_roles(&[Uuid::new_v4()], &["Executive Assistant"])
            .await
            .unwrap_err(),
        AppError::Forbidden
    ));
}
