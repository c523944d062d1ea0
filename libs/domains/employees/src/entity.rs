use domain_roles::Role;
use sea_orm::entity::prelude::*;

use crate::error::{EmployeeError, EmployeeResult};
use crate::models::{EmployeeCredentials, EmployeeView};

/// Sea-ORM Entity for the employees table
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    /// 0 or 1, enforced by a CHECK constraint
    pub commute_allowance: i16,
    pub role_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "domain_roles::entity::Entity",
        from = "Column::RoleId",
        to = "domain_roles::entity::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Role,
}

impl Related<domain_roles::entity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Role.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Joined read model. The role is required by the foreign key, so a
    /// missing one means the join itself is broken.
    pub fn into_credentials(
        self,
        role: Option<domain_roles::entity::Model>,
    ) -> EmployeeResult<EmployeeCredentials> {
        let role = role.ok_or_else(|| {
            EmployeeError::Internal(format!(
                "employee {} references missing role {}",
                self.id, self.role_id
            ))
        })?;

        Ok(EmployeeCredentials {
            employee: EmployeeView {
                id: self.id,
                name: self.name,
                email: self.email,
                commute_allowance: self.commute_allowance,
                role: Role::from(role),
            },
            password_hash: self.password_hash,
        })
    }

    pub fn into_view(
        self,
        role: Option<domain_roles::entity::Model>,
    ) -> EmployeeResult<EmployeeView> {
        self.into_credentials(role).map(|c| c.employee)
    }
}
