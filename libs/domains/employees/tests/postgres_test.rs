//! PgEmployeeRepository against a real PostgreSQL container.

use domain_employees::models::{EmployeeChanges, NewEmployee};
use domain_employees::*;
use domain_roles::{PgRoleRepository, RoleError, RoleId, RoleName, RoleRepository};
use test_utils::{TestDataBuilder, TestDatabase};

async fn seed_role(db: &TestDatabase, name: &str) -> RoleId {
    let role = PgRoleRepository::new(db.connection())
        .create(RoleName::parse(name).unwrap())
        .await
        .unwrap();
    RoleId::new(role.id.into()).unwrap()
}

fn new_employee(email: &str, role_id: RoleId) -> NewEmployee {
    NewEmployee {
        name: EmployeeName::parse("John Smith").unwrap(),
        email: Email::parse(email).unwrap(),
        password_hash: "$argon2id$stub".to_string(),
        commute_allowance: CommuteAllowance::new(1).unwrap(),
        role_id,
    }
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn test_pg_employee_lifecycle() {
    let db = TestDatabase::new().await;
    let builder = TestDataBuilder::from_test_name("pg_employee_lifecycle");
    let role_id = seed_role(&db, &builder.role_name("dev")).await;
    let repo = PgEmployeeRepository::new(db.connection());

    let created = repo
        .create(new_employee(&builder.email("john"), role_id))
        .await
        .unwrap();
    assert_eq!(created.role.id, role_id.get());
    assert_eq!(created.role.name, builder.role_name("dev"));

    let id = EmployeeId::new(created.id.into()).unwrap();
    assert_eq!(repo.get_by_id(id).await.unwrap(), Some(created.clone()));

    let credentials = repo
        .find_by_email(&Email::parse(&builder.email("john")).unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(credentials.password_hash, "$argon2id$stub");

    let changed = repo
        .update(
            id,
            EmployeeChanges {
                commute_allowance: Some(CommuteAllowance::new(0).unwrap()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(changed);
    assert_eq!(
        repo.get_by_id(id).await.unwrap().unwrap().commute_allowance,
        0
    );

    assert_eq!(repo.list().await.unwrap().len(), 1);
    assert!(repo.delete(id).await.unwrap());
    assert!(!repo.delete(id).await.unwrap());
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn test_pg_constraints_map_to_domain_errors() {
    let db = TestDatabase::new().await;
    let role_id = seed_role(&db, "Developer").await;
    let repo = PgEmployeeRepository::new(db.connection());

    repo.create(new_employee("john@x.com", role_id))
        .await
        .unwrap();

    let duplicate = repo.create(new_employee("john@x.com", role_id)).await;
    assert!(matches!(duplicate, Err(EmployeeError::DuplicateEmail(_))));

    let missing_role = repo
        .create(new_employee("jane@x.com", RoleId::new(999).unwrap()))
        .await;
    assert!(matches!(missing_role, Err(EmployeeError::RoleNotFound)));
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn test_pg_role_in_use_cannot_be_deleted() {
    let db = TestDatabase::new().await;
    let role_id = seed_role(&db, "Developer").await;
    PgEmployeeRepository::new(db.connection())
        .create(new_employee("john@x.com", role_id))
        .await
        .unwrap();

    let result = PgRoleRepository::new(db.connection()).delete(role_id).await;

    assert!(matches!(result, Err(RoleError::InUse(_))));
}
