use custodian_application::{PermissionViewRepository, RoleRepository};
use custodian_core::AppError;
use custodian_domain::{PermissionView, PermissionViewKey};
use sqlx::PgPool;

use super::PostgresRoleRepository;
use crate::PostgresPermissionViewRepository;
use crate::test_support::test_pool;

async fn register(pool: &PgPool, permission_name: &str, resource_name: &str) -> PermissionView {
    let Ok(key) = PermissionViewKey::new(permission_name, resource_name) else {
        panic!("key should be valid");
    };

    match PostgresPermissionViewRepository::new(pool.clone())
        .insert_permission_view(&key)
        .await
    {
        Ok(view) => view,
        Err(error) => panic!("failed to register permission view: {error}"),
    }
}

fn unique_name(prefix: &str) -> String {
    format!("{prefix}-{}", uuid::Uuid::new_v4())
}

#[tokio::test]
async fn create_role_persists_permissions_and_rejects_duplicates() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresRoleRepository::new(pool.clone());
    let read = register(&pool, "can_read", unique_name("Dashboard").as_str()).await;
    let name = unique_name("Analyst");

    let created = repository
        .create_role(name.as_str(), std::slice::from_ref(&read))
        .await;
    let duplicate = repository.create_role(name.as_str(), &[]).await;
    let found = repository.find_role_by_name(name.as_str()).await;

    let (Ok(created), Ok(Some(found))) = (created, found) else {
        panic!("role round trip failed");
    };
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));
    assert_eq!(created, found);
    assert_eq!(found.permissions(), std::slice::from_ref(&read));
}

#[tokio::test]
async fn grant_and_revoke_update_the_permission_set() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresRoleRepository::new(pool.clone());
    let resource = unique_name("Chart");
    let read = register(&pool, "can_read", resource.as_str()).await;
    let write = register(&pool, "can_write", resource.as_str()).await;
    let Ok(role) = repository
        .create_role(unique_name("Editor").as_str(), std::slice::from_ref(&read))
        .await
    else {
        panic!("role creation should succeed");
    };

    let granted = repository
        .add_role_permissions(role.id(), &[read.clone(), write.clone()])
        .await;
    assert_eq!(granted.map(|role| role.permissions().len()).ok(), Some(2));

    let revoked = repository
        .remove_role_permissions(role.id(), &[write.id()])
        .await;
    assert_eq!(
        revoked.map(|role| role.permissions().to_vec()).ok(),
        Some(vec![read])
    );
}

#[tokio::test]
async fn delete_role_reports_whether_a_row_was_removed() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresRoleRepository::new(pool);
    let name = unique_name("Temporary");
    let Ok(role) = repository.create_role(name.as_str(), &[]).await else {
        panic!("role creation should succeed");
    };

    assert_eq!(repository.delete_role(role.id()).await.ok(), Some(true));
    assert_eq!(repository.delete_role(role.id()).await.ok(), Some(false));
    assert!(matches!(
        repository.find_role_by_name(name.as_str()).await,
        Ok(None)
    ));
    assert!(
        repository
            .find_roles_by_ids(&[role.id()])
            .await
            .unwrap_or_default()
            .is_empty()
    );
}
