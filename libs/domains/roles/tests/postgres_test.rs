//! PgRoleRepository against a real PostgreSQL container.

use domain_roles::*;
use test_utils::{TestDataBuilder, TestDatabase};

fn name(raw: &str) -> RoleName {
    RoleName::parse(raw).unwrap()
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn test_pg_role_lifecycle() {
    let db = TestDatabase::new().await;
    let repo = PgRoleRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("pg_role_lifecycle");

    let created = repo.create(name(&builder.role_name("dev"))).await.unwrap();
    assert!(created.id > 0);

    let id = RoleId::new(created.id.into()).unwrap();
    let fetched = repo.get_by_id(id).await.unwrap().unwrap();
    assert_eq!(fetched, created);

    let by_name = repo
        .find_by_name(&name(&builder.role_name("dev")))
        .await
        .unwrap();
    assert_eq!(by_name, Some(created.clone()));

    assert!(repo.update(id, name(&builder.role_name("eng"))).await.unwrap());
    assert_eq!(
        repo.get_by_id(id).await.unwrap().unwrap().name,
        builder.role_name("eng")
    );

    assert!(repo.delete(id).await.unwrap());
    assert!(!repo.delete(id).await.unwrap());
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn test_pg_unique_index_reports_duplicate_name() {
    let db = TestDatabase::new().await;
    let repo = PgRoleRepository::new(db.connection());

    repo.create(name("Developer")).await.unwrap();
    let second = repo.create(name("Developer")).await;
    assert!(matches!(second, Err(RoleError::DuplicateName(_))));

    let other = repo.create(name("Designer")).await.unwrap();
    let renamed = repo
        .update(RoleId::new(other.id.into()).unwrap(), name("Developer"))
        .await;
    assert!(matches!(renamed, Err(RoleError::DuplicateName(_))));
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn test_pg_service_scenario_create_twice_conflicts() {
    let db = TestDatabase::new().await;
    let service = RoleService::new(PgRoleRepository::new(db.connection()));

    let first = service
        .create(CreateRole {
            name: "Developer".into(),
        })
        .await
        .unwrap();
    assert_eq!(first.id, 1);

    let again = service
        .create(CreateRole {
            name: "Developer".into(),
        })
        .await;
    assert!(matches!(again, Err(RoleError::DuplicateName(_))));
}
