use async_trait::async_trait;
use domain_roles::{InMemoryRoleRepository, RoleId, RoleRepository};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::entity;
use crate::error::{EmployeeError, EmployeeResult};
use crate::models::{Email, EmployeeChanges, EmployeeCredentials, EmployeeId, EmployeeView, NewEmployee};

/// Repository trait for Employee persistence
///
/// Reads return employees joined with their role.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    async fn create(&self, input: NewEmployee) -> EmployeeResult<EmployeeView>;

    /// All employees, ordered by id
    async fn list(&self) -> EmployeeResult<Vec<EmployeeView>>;

    async fn get_by_id(&self, id: EmployeeId) -> EmployeeResult<Option<EmployeeView>>;

    /// Employee and stored hash for a normalized email
    async fn find_by_email(&self, email: &Email) -> EmployeeResult<Option<EmployeeCredentials>>;

    /// Apply the set fields. `false` when no row has this id.
    async fn update(&self, id: EmployeeId, changes: EmployeeChanges) -> EmployeeResult<bool>;

    /// `false` when no row has this id.
    async fn delete(&self, id: EmployeeId) -> EmployeeResult<bool>;
}

#[derive(Debug, Default)]
struct Store {
    rows: BTreeMap<i32, entity::Model>,
    last_id: i32,
}

/// In-memory implementation of EmployeeRepository (for development/testing)
///
/// Resolves roles through an [`InMemoryRoleRepository`] and enforces the same
/// unique email and role reference constraints as the database. Each row
/// holds an assignment on its role, so a referenced role cannot be deleted.
#[derive(Debug, Default, Clone)]
pub struct InMemoryEmployeeRepository {
    store: Arc<RwLock<Store>>,
    roles: InMemoryRoleRepository,
}

impl InMemoryEmployeeRepository {
    pub fn new(roles: InMemoryRoleRepository) -> Self {
        Self {
            store: Arc::default(),
            roles,
        }
    }

    async fn join(&self, row: entity::Model) -> EmployeeResult<EmployeeCredentials> {
        let role_id = RoleId::new(row.role_id.into())?;
        let role = self.roles.get_by_id(role_id).await?;
        row.into_credentials(role.map(|r| domain_roles::entity::Model {
            id: r.id,
            name: r.name,
        }))
    }

    async fn assign_role(&self, role_id: RoleId) -> EmployeeResult<()> {
        if self.roles.assign(role_id).await {
            Ok(())
        } else {
            Err(EmployeeError::RoleNotFound)
        }
    }
}

#[async_trait]
impl EmployeeRepository for InMemoryEmployeeRepository {
    async fn create(&self, input: NewEmployee) -> EmployeeResult<EmployeeView> {
        let row = {
            let mut store = self.store.write().await;

            if store.rows.values().any(|r| r.email == input.email.as_str()) {
                return Err(EmployeeError::DuplicateEmail(input.email.to_string()));
            }
            self.assign_role(input.role_id).await?;

            store.last_id += 1;
            let row = entity::Model {
                id: store.last_id,
                name: input.name.as_str().to_string(),
                email: input.email.as_str().to_string(),
                password_hash: input.password_hash,
                commute_allowance: input.commute_allowance.as_i16(),
                role_id: input.role_id.get(),
            };
            store.rows.insert(row.id, row.clone());
            row
        };

        tracing::info!(employee_id = row.id, "Created employee");
        Ok(self.join(row).await?.employee)
    }

    async fn list(&self) -> EmployeeResult<Vec<EmployeeView>> {
        let rows: Vec<entity::Model> = self.store.read().await.rows.values().cloned().collect();

        let mut employees = Vec::with_capacity(rows.len());
        for row in rows {
            employees.push(self.join(row).await?.employee);
        }
        Ok(employees)
    }

    async fn get_by_id(&self, id: EmployeeId) -> EmployeeResult<Option<EmployeeView>> {
        let row = self.store.read().await.rows.get(&id.get()).cloned();
        match row {
            Some(row) => Ok(Some(self.join(row).await?.employee)),
            None => Ok(None),
        }
    }

    async fn find_by_email(&self, email: &Email) -> EmployeeResult<Option<EmployeeCredentials>> {
        let row = self
            .store
            .read()
            .await
            .rows
            .values()
            .find(|r| r.email == email.as_str())
            .cloned();

        match row {
            Some(row) => Ok(Some(self.join(row).await?)),
            None => Ok(None),
        }
    }

    async fn update(&self, id: EmployeeId, changes: EmployeeChanges) -> EmployeeResult<bool> {
        let mut store = self.store.write().await;

        if let Some(email) = &changes.email {
            if store
                .rows
                .values()
                .any(|r| r.id != id.get() && r.email == email.as_str())
            {
                return Err(EmployeeError::DuplicateEmail(email.to_string()));
            }
        }

        let Some(row) = store.rows.get_mut(&id.get()) else {
            return Ok(false);
        };

        let previous_role = match changes.role_id {
            Some(role_id) if role_id.get() != row.role_id => {
                let previous = RoleId::new(row.role_id.into())?;
                self.assign_role(role_id).await?;
                Some(previous)
            }
            _ => None,
        };

        if let Some(name) = changes.name {
            row.name = name.as_str().to_string();
        }
        if let Some(email) = changes.email {
            row.email = email.as_str().to_string();
        }
        if let Some(hash) = changes.password_hash {
            row.password_hash = hash;
        }
        if let Some(allowance) = changes.commute_allowance {
            row.commute_allowance = allowance.as_i16();
        }
        if let Some(role_id) = changes.role_id {
            row.role_id = role_id.get();
        }
        if let Some(previous_role) = previous_role {
            self.roles.release(previous_role).await;
        }

        tracing::info!(employee_id = %id, "Updated employee");
        Ok(true)
    }

    async fn delete(&self, id: EmployeeId) -> EmployeeResult<bool> {
        let mut store = self.store.write().await;

        if let Some(row) = store.rows.remove(&id.get()) {
            self.roles.release(RoleId::new(row.role_id.into())?).await;
            tracing::info!(employee_id = %id, "Deleted employee");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CommuteAllowance, EmployeeName};
    use domain_roles::RoleName;

    async fn repo_with_role() -> (InMemoryEmployeeRepository, RoleId) {
        let roles = InMemoryRoleRepository::new();
        let role = roles
            .create(RoleName::parse("Developer").unwrap())
            .await
            .unwrap();
        (
            InMemoryEmployeeRepository::new(roles),
            RoleId::new(role.id.into()).unwrap(),
        )
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
    async fn test_create_joins_role_name() {
        let (repo, role_id) = repo_with_role().await;

        let view = repo
            .create(new_employee("john@x.com", role_id))
            .await
            .unwrap();

        assert_eq!(view.id, 1);
        assert_eq!(view.role.id, role_id.get());
        assert_eq!(view.role.name, "Developer");
        assert_eq!(view.commute_allowance, 1);
    }

    #[tokio::test]
    async fn test_unique_email_and_role_reference_are_enforced() {
        let (repo, role_id) = repo_with_role().await;
        repo.create(new_employee("john@x.com", role_id))
            .await
            .unwrap();

        let duplicate = repo.create(new_employee("john@x.com", role_id)).await;
        assert!(matches!(duplicate, Err(EmployeeError::DuplicateEmail(_))));

        let missing_role = repo
            .create(new_employee("jane@x.com", RoleId::new(99).unwrap()))
            .await;
        assert!(matches!(missing_role, Err(EmployeeError::RoleNotFound)));
    }

    #[tokio::test]
    async fn test_find_by_email_returns_hash() {
        let (repo, role_id) = repo_with_role().await;
        repo.create(new_employee("john@x.com", role_id))
            .await
            .unwrap();

        let found = repo
            .find_by_email(&Email::parse("JOHN@x.com").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.password_hash, "$argon2id$stub");
        assert_eq!(found.employee.email, "john@x.com");
    }

    #[tokio::test]
    async fn test_partial_update_keeps_other_fields() {
        let (repo, role_id) = repo_with_role().await;
        let view = repo
            .create(new_employee("john@x.com", role_id))
            .await
            .unwrap();
        let id = EmployeeId::new(view.id.into()).unwrap();

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

        let updated = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(updated.commute_allowance, 0);
        assert_eq!(updated.name, "John Smith");
        assert_eq!(updated.email, "john@x.com");

        let missing = EmployeeId::new(42).unwrap();
        assert!(!repo.update(missing, EmployeeChanges::default()).await.unwrap());
        assert!(repo.delete(id).await.unwrap());
        assert!(!repo.delete(id).await.unwrap());
    }

    #[tokio::test]
    async fn test_referenced_role_cannot_be_deleted() {
        let roles = InMemoryRoleRepository::new();
        let developer = roles
            .create(RoleName::parse("Developer").unwrap())
            .await
            .unwrap();
        let designer = roles
            .create(RoleName::parse("Designer").unwrap())
            .await
            .unwrap();
        let developer = RoleId::new(developer.id.into()).unwrap();
        let designer = RoleId::new(designer.id.into()).unwrap();
        let repo = InMemoryEmployeeRepository::new(roles.clone());

        let view = repo
            .create(new_employee("john@x.com", developer))
            .await
            .unwrap();
        let id = EmployeeId::new(view.id.into()).unwrap();

        assert!(matches!(
            roles.delete(developer).await,
            Err(domain_roles::RoleError::InUse(_))
        ));
        assert_eq!(repo.list().await.unwrap().len(), 1);

        let moved = repo
            .update(
                id,
                EmployeeChanges {
                    role_id: Some(designer),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(moved);
        assert!(roles.delete(developer).await.unwrap());
        assert!(matches!(
            roles.delete(designer).await,
            Err(domain_roles::RoleError::InUse(_))
        ));

        assert!(repo.delete(id).await.unwrap());
        assert!(roles.delete(designer).await.unwrap());
    }
}
