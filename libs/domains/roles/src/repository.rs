use async_trait::async_trait;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{RoleError, RoleResult};
use crate::models::{Role, RoleId, RoleName};

/// Repository trait for Role persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Insert a role and return it with its assigned id
    async fn create(&self, name: RoleName) -> RoleResult<Role>;

    /// All roles, ordered by id
    async fn list(&self) -> RoleResult<Vec<Role>>;

    async fn get_by_id(&self, id: RoleId) -> RoleResult<Option<Role>>;

    /// Exact-match lookup on the trimmed name
    async fn find_by_name(&self, name: &RoleName) -> RoleResult<Option<Role>>;

    /// Rename a role. `false` when no row has this id.
    async fn update(&self, id: RoleId, name: RoleName) -> RoleResult<bool>;

    /// `false` when no row has this id.
    async fn delete(&self, id: RoleId) -> RoleResult<bool>;
}

#[derive(Debug, Default)]
struct Store {
    roles: HashMap<i32, Role>,
    /// Employees referencing each role, keyed by role id
    assignments: HashMap<i32, usize>,
    last_id: i32,
}

/// In-memory implementation of RoleRepository (for development/testing)
///
/// Enforces the unique name constraint like the database does. Stores that
/// reference roles record their references with [`Self::assign`] and
/// [`Self::release`]; a referenced role cannot be deleted.
#[derive(Debug, Default, Clone)]
pub struct InMemoryRoleRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryRoleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one more reference to `id`. `false` when the role does not exist.
    pub async fn assign(&self, id: RoleId) -> bool {
        let mut store = self.store.write().await;

        if !store.roles.contains_key(&id.get()) {
            return false;
        }
        *store.assignments.entry(id.get()).or_default() += 1;
        true
    }

    /// Drop a reference recorded by [`Self::assign`].
    pub async fn release(&self, id: RoleId) {
        let mut store = self.store.write().await;

        if let Entry::Occupied(mut entry) = store.assignments.entry(id.get()) {
            *entry.get_mut() -= 1;
            if *entry.get() == 0 {
                entry.remove();
            }
        }
    }
}

#[async_trait]
impl RoleRepository for InMemoryRoleRepository {
    async fn create(&self, name: RoleName) -> RoleResult<Role> {
        let mut store = self.store.write().await;

        if store.roles.values().any(|r| r.name == name.as_str()) {
            return Err(RoleError::DuplicateName(name.into_inner()));
        }

        store.last_id += 1;
        let role = Role {
            id: store.last_id,
            name: name.into_inner(),
        };
        store.roles.insert(role.id, role.clone());

        tracing::info!(role_id = role.id, "Created role");
        Ok(role)
    }

    async fn list(&self) -> RoleResult<Vec<Role>> {
        let store = self.store.read().await;
        let mut roles: Vec<Role> = store.roles.values().cloned().collect();
        roles.sort_by_key(|r| r.id);
        Ok(roles)
    }

    async fn get_by_id(&self, id: RoleId) -> RoleResult<Option<Role>> {
        let store = self.store.read().await;
        Ok(store.roles.get(&id.get()).cloned())
    }

    async fn find_by_name(&self, name: &RoleName) -> RoleResult<Option<Role>> {
        let store = self.store.read().await;
        Ok(store
            .roles
            .values()
            .find(|r| r.name == name.as_str())
            .cloned())
    }

    async fn update(&self, id: RoleId, name: RoleName) -> RoleResult<bool> {
        let mut store = self.store.write().await;

        if store
            .roles
            .values()
            .any(|r| r.id != id.get() && r.name == name.as_str())
        {
            return Err(RoleError::DuplicateName(name.into_inner()));
        }

        match store.roles.get_mut(&id.get()) {
            Some(role) => {
                role.name = name.into_inner();
                tracing::info!(role_id = %id, "Updated role");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: RoleId) -> RoleResult<bool> {
        let mut store = self.store.write().await;

        if store.assignments.contains_key(&id.get()) {
            return Err(RoleError::InUse(id.get()));
        }

        if store.roles.remove(&id.get()).is_some() {
            tracing::info!(role_id = %id, "Deleted role");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(raw: &str) -> RoleName {
        RoleName::parse(raw).unwrap()
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let repo = InMemoryRoleRepository::new();

        let first = repo.create(name("Developer")).await.unwrap();
        let second = repo.create(name("Designer")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);

        let listed = repo.list().await.unwrap();
        assert_eq!(listed, vec![first, second]);
    }

    #[tokio::test]
    async fn test_duplicate_name_error() {
        let repo = InMemoryRoleRepository::new();
        repo.create(name("Developer")).await.unwrap();

        let result = repo.create(name("Developer")).await;
        assert!(matches!(result, Err(RoleError::DuplicateName(_))));
    }

    #[tokio::test]
    async fn test_update_and_delete_report_missing_rows() {
        let repo = InMemoryRoleRepository::new();
        let role = repo.create(name("Developer")).await.unwrap();
        let id = RoleId::new(role.id.into()).unwrap();
        let missing = RoleId::new(99).unwrap();

        assert!(repo.update(id, name("Engineer")).await.unwrap());
        assert!(!repo.update(missing, name("Engineer")).await.unwrap());
        assert_eq!(
            repo.get_by_id(id).await.unwrap().unwrap().name,
            "Engineer"
        );

        assert!(repo.delete(id).await.unwrap());
        assert!(!repo.delete(id).await.unwrap());
        assert!(repo.get_by_id(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_assigned_role_cannot_be_deleted_until_released() {
        let repo = InMemoryRoleRepository::new();
        let role = repo.create(name("Developer")).await.unwrap();
        let id = RoleId::new(role.id.into()).unwrap();

        assert!(repo.assign(id).await);
        assert!(repo.assign(id).await);
        assert!(!repo.assign(RoleId::new(99).unwrap()).await);

        let result = repo.delete(id).await;
        assert!(matches!(result, Err(RoleError::InUse(1))));
        assert!(repo.get_by_id(id).await.unwrap().is_some());

        repo.release(id).await;
        assert!(matches!(repo.delete(id).await, Err(RoleError::InUse(1))));

        repo.release(id).await;
        assert!(repo.delete(id).await.unwrap());
    }
}
