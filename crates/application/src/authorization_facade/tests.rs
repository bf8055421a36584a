use std::sync::Arc;
use std::sync::atomic::Ordering;

use custodian_core::{AppError, UserIdentity};
use custodian_domain::{AuditAction, PermissionViewSelection, UserId};

use crate::CreateUserInput;
use crate::test_fakes::{
    FakeAuditRepository, FakePermissionViewRepository, FakeRoleRepository, FakeUserRepository,
};

use super::{AuthorizationFacade, CreateRoleInput, RolePermissionViewsInput, UserRoleInput};

struct Fixture {
    facade: AuthorizationFacade,
    permission_views: Arc<FakePermissionViewRepository>,
    users: Arc<FakeUserRepository>,
    audit: Arc<FakeAuditRepository>,
}

async fn fixture() -> Fixture {
    let permission_views = Arc::new(FakePermissionViewRepository::default());
    let users = Arc::new(FakeUserRepository::default());
    users.seed(42, "ada@example.com").await;
    let audit = Arc::new(FakeAuditRepository::default());

    Fixture {
        facade: AuthorizationFacade::new(
            permission_views.clone(),
            Arc::new(FakeRoleRepository::default()),
            users.clone(),
            audit.clone(),
        ),
        permission_views,
        users,
        audit,
    }
}

fn admin() -> UserIdentity {
    UserIdentity::new("admin", "Admin", None)
}

fn pair(permission: &str, resource: &str) -> (String, String) {
    (permission.to_owned(), resource.to_owned())
}

fn create_input(name: &str, selection: Option<PermissionViewSelection>) -> CreateRoleInput {
    CreateRoleInput {
        name: name.to_owned(),
        permission_view: selection,
    }
}

fn user_role(user_id: i64, role_name: &str) -> UserRoleInput {
    UserRoleInput {
        user_id: Some(UserId::new(user_id)),
        role_name: Some(role_name.to_owned()),
    }
}

fn role_views(role_name: &str, pairs: Vec<(String, String)>) -> RolePermissionViewsInput {
    RolePermissionViewsInput {
        role_name: Some(role_name.to_owned()),
        permission_view: Some(PermissionViewSelection::from(pairs)),
    }
}

fn user_input(email: &str) -> CreateUserInput {
    CreateUserInput {
        username: "grace".to_owned(),
        first_name: "Grace".to_owned(),
        last_name: "Hopper".to_owned(),
        email: email.to_owned(),
        role_names: Vec::new(),
    }
}

#[tokio::test]
async fn analyst_role_lifecycle() {
    let fixture = fixture().await;
    let actor = admin();
    let caller = Some(&actor);

    let created = fixture
        .facade
        .create_role(
            caller,
            create_input(
                "Analyst",
                Some(PermissionViewSelection::from(pair("can_read", "Dashboard"))),
            ),
        )
        .await;
    let Ok(created) = created else {
        panic!("role creation should succeed");
    };
    assert_eq!(created.permissions().len(), 1);

    assert!(
        fixture
            .facade
            .add_role_to_user(caller, user_role(42, "Analyst"))
            .await
            .is_ok()
    );
    let Ok(details) = fixture
        .facade
        .find_user_by_email(caller, "ada@example.com")
        .await
    else {
        panic!("user lookup should succeed");
    };
    assert!(details.roles.iter().any(|role| role.name() == "Analyst"));

    assert!(
        fixture
            .facade
            .remove_role_from_user(caller, user_role(42, "Analyst"))
            .await
            .is_ok()
    );
    let Ok(details) = fixture
        .facade
        .find_user_by_email(caller, "ada@example.com")
        .await
    else {
        panic!("user lookup should succeed");
    };
    assert!(details.roles.is_empty());

    assert!(fixture.facade.delete_role(caller, "Analyst").await.is_ok());
    assert!(matches!(
        fixture.facade.find_role(caller, "Analyst").await,
        Err(AppError::NotFound(_))
    ));

    let actions = fixture
        .audit
        .events
        .lock()
        .await
        .iter()
        .map(|event| event.action)
        .collect::<Vec<_>>();
    assert_eq!(
        actions,
        vec![
            AuditAction::SecurityRoleCreated,
            AuditAction::SecurityRoleAssigned,
            AuditAction::SecurityRoleUnassigned,
            AuditAction::SecurityRoleDeleted,
        ]
    );
}

#[tokio::test]
async fn anonymous_caller_is_rejected_everywhere() {
    let fixture = fixture().await;

    let results = vec![
        fixture.facade.current_user(None).map(|_| ()),
        fixture.facade.list_roles(None).await.map(|_| ()),
        fixture.facade.find_role(None, "Analyst").await.map(|_| ()),
        fixture
            .facade
            .create_role(None, create_input("Analyst", None))
            .await
            .map(|_| ()),
        fixture.facade.delete_role(None, "Analyst").await.map(|_| ()),
        fixture
            .facade
            .add_role_to_user(None, user_role(42, "Analyst"))
            .await
            .map(|_| ()),
        fixture
            .facade
            .remove_role_from_user(None, user_role(42, "Analyst"))
            .await
            .map(|_| ()),
        fixture
            .facade
            .add_permission_views(None, role_views("Analyst", vec![pair("can_read", "Chart")]))
            .await
            .map(|_| ()),
        fixture
            .facade
            .remove_permission_views(None, role_views("Analyst", vec![pair("can_read", "Chart")]))
            .await
            .map(|_| ()),
        fixture.facade.list_permission_views(None).await.map(|_| ()),
        fixture
            .facade
            .find_user_by_email(None, "ada@example.com")
            .await
            .map(|_| ()),
        fixture
            .facade
            .create_user(None, user_input("grace@example.com"))
            .await
            .map(|_| ()),
        fixture
            .facade
            .get_or_create_user(None, user_input("grace@example.com"))
            .await
            .map(|_| ()),
        fixture.facade.delete_user(None, UserId::new(42)).await,
    ];

    for result in results {
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }
    assert!(fixture.permission_views.views.lock().await.is_empty());
    assert_eq!(fixture.users.users.lock().await.len(), 1);
    assert!(fixture.audit.events.lock().await.is_empty());
}

#[tokio::test]
async fn duplicate_role_is_conflict_and_registers_nothing() {
    let fixture = fixture().await;
    let actor = admin();
    assert!(
        fixture
            .facade
            .create_role(Some(&actor), create_input("Analyst", None))
            .await
            .is_ok()
    );

    let duplicate = fixture
        .facade
        .create_role(
            Some(&actor),
            create_input(
                "Analyst",
                Some(PermissionViewSelection::from(pair("can_read", "Dashboard"))),
            ),
        )
        .await;

    assert!(matches!(duplicate, Err(AppError::Conflict(_))));
    assert!(fixture.permission_views.views.lock().await.is_empty());
}

#[tokio::test]
async fn grant_then_revoke_restores_permission_set() {
    let fixture = fixture().await;
    let actor = admin();
    let Ok(original) = fixture
        .facade
        .create_role(
            Some(&actor),
            create_input(
                "Analyst",
                Some(PermissionViewSelection::from(pair("can_read", "Dashboard"))),
            ),
        )
        .await
    else {
        panic!("role creation should succeed");
    };

    let extra = vec![pair("can_write", "Dashboard"), pair("can_read", "Chart")];
    let granted = fixture
        .facade
        .add_permission_views(Some(&actor), role_views("Analyst", extra.clone()))
        .await;
    assert_eq!(granted.map(|role| role.permissions().len()).ok(), Some(3));

    let revoked = fixture
        .facade
        .remove_permission_views(Some(&actor), role_views("Analyst", extra))
        .await;

    assert_eq!(
        revoked.map(|role| role.permissions().to_vec()).ok(),
        Some(original.permissions().to_vec())
    );
}

#[tokio::test]
async fn revoking_unknown_pairs_registers_nothing() {
    let fixture = fixture().await;
    let actor = admin();
    assert!(
        fixture
            .facade
            .create_role(Some(&actor), create_input("Analyst", None))
            .await
            .is_ok()
    );

    let result = fixture
        .facade
        .remove_permission_views(
            Some(&actor),
            role_views("Analyst", vec![pair("can_delete", "Dashboard")]),
        )
        .await;

    assert!(result.is_ok());
    assert!(fixture.permission_views.views.lock().await.is_empty());
}

#[tokio::test]
async fn missing_or_empty_permission_view_is_invalid() {
    let fixture = fixture().await;
    let actor = admin();
    assert!(
        fixture
            .facade
            .create_role(Some(&actor), create_input("Analyst", None))
            .await
            .is_ok()
    );

    let missing = fixture
        .facade
        .add_permission_views(
            Some(&actor),
            RolePermissionViewsInput {
                role_name: Some("Analyst".to_owned()),
                permission_view: None,
            },
        )
        .await;
    let empty = fixture
        .facade
        .remove_permission_views(Some(&actor), role_views("Analyst", Vec::new()))
        .await;

    assert!(matches!(missing, Err(AppError::InvalidArgument(_))));
    assert!(matches!(empty, Err(AppError::InvalidArgument(_))));
}

#[tokio::test]
async fn permission_changes_on_unknown_role_are_not_found() {
    let fixture = fixture().await;
    let actor = admin();

    let result = fixture
        .facade
        .add_permission_views(
            Some(&actor),
            role_views("Auditor", vec![pair("can_read", "Dashboard")]),
        )
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn missing_user_role_fields_are_invalid() {
    let fixture = fixture().await;
    let actor = admin();

    let missing_user = fixture
        .facade
        .add_role_to_user(
            Some(&actor),
            UserRoleInput {
                user_id: None,
                role_name: Some("Analyst".to_owned()),
            },
        )
        .await;
    let missing_role = fixture
        .facade
        .remove_role_from_user(
            Some(&actor),
            UserRoleInput {
                user_id: Some(UserId::new(42)),
                role_name: None,
            },
        )
        .await;

    assert!(matches!(missing_user, Err(AppError::InvalidArgument(_))));
    assert!(matches!(missing_role, Err(AppError::InvalidArgument(_))));
}

#[tokio::test]
async fn audit_failure_does_not_fail_the_mutation() {
    let fixture = fixture().await;
    let actor = admin();
    fixture.audit.fail.store(true, Ordering::SeqCst);

    let result = fixture
        .facade
        .create_role(Some(&actor), create_input("Analyst", None))
        .await;

    assert!(result.is_ok());
    assert!(fixture.facade.find_role(Some(&actor), "Analyst").await.is_ok());
}

#[tokio::test]
async fn get_or_create_user_audits_only_creation() {
    let fixture = fixture().await;
    let actor = admin();

    let first = fixture
        .facade
        .get_or_create_user(Some(&actor), user_input("grace@example.com"))
        .await;
    let second = fixture
        .facade
        .get_or_create_user(Some(&actor), user_input("grace@example.com"))
        .await;

    let (Ok(first), Ok(second)) = (first, second) else {
        panic!("get_or_create should succeed");
    };
    assert_eq!(first.user.id, second.user.id);
    assert_eq!(fixture.audit.events.lock().await.len(), 1);
}

#[tokio::test]
async fn delete_user_removes_record() {
    let fixture = fixture().await;
    let actor = admin();

    assert!(
        fixture
            .facade
            .delete_user(Some(&actor), UserId::new(42))
            .await
            .is_ok()
    );
    assert!(matches!(
        fixture
            .facade
            .delete_user(Some(&actor), UserId::new(42))
            .await,
        Err(AppError::NotFound(_))
    ));
}
