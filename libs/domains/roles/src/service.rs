use std::sync::Arc;

use crate::error::{RoleError, RoleResult};
use crate::models::{CreateRole, Role, RoleId, RoleName, UpdateRole};
use crate::repository::RoleRepository;

/// Service layer for Role business logic
#[derive(Clone)]
pub struct RoleService<R: RoleRepository> {
    repository: Arc<R>,
}

impl<R: RoleRepository> RoleService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a role with a name no other role uses.
    ///
    /// The lookup is a pre-check for a readable conflict; concurrent creates
    /// are settled by the unique index.
    pub async fn create(&self, input: CreateRole) -> RoleResult<Role> {
        let name = RoleName::parse(&input.name)?;

        if self.repository.find_by_name(&name).await?.is_some() {
            return Err(RoleError::DuplicateName(name.into_inner()));
        }

        self.repository.create(name).await
    }

    pub async fn list(&self) -> RoleResult<Vec<Role>> {
        self.repository.list().await
    }

    pub async fn get_by_id(&self, id: i32) -> RoleResult<Role> {
        let role_id = RoleId::new(id.into())?;
        self.repository
            .get_by_id(role_id)
            .await?
            .ok_or(RoleError::NotFound(id))
    }

    /// Lookup used by other domains to check that a referenced role exists.
    pub async fn find(&self, id: RoleId) -> RoleResult<Option<Role>> {
        self.repository.get_by_id(id).await
    }

    /// Rename a role. Returns `false` when the id matched nothing.
    pub async fn update(&self, id: i32, input: UpdateRole) -> RoleResult<bool> {
        let role_id = RoleId::new(id.into())?;
        let name = RoleName::parse(&input.name)?;

        if let Some(existing) = self.repository.find_by_name(&name).await? {
            if existing.id != role_id.get() {
                return Err(RoleError::DuplicateName(name.into_inner()));
            }
        }

        self.repository.update(role_id, name).await
    }

    /// Delete a role. Returns `false` when the id matched nothing.
    ///
    /// Roles still assigned to employees are kept by the foreign key and
    /// surface as [`RoleError::InUse`].
    pub async fn delete(&self, id: i32) -> RoleResult<bool> {
        let role_id = RoleId::new(id.into())?;
        self.repository.delete(role_id).await
    }
}
