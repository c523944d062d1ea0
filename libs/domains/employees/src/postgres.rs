use async_trait::async_trait;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    SqlErr,
};

use crate::{
    entity,
    error::{EmployeeError, EmployeeResult},
    models::{Email, EmployeeChanges, EmployeeCredentials, EmployeeId, EmployeeView, NewEmployee},
    repository::EmployeeRepository,
};

use domain_roles::entity::Entity as RoleEntity;

/// SeaORM-backed EmployeeRepository.
#[derive(Clone)]
pub struct PgEmployeeRepository {
    db: DatabaseConnection,
}

impl PgEmployeeRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Constraint violations that raced past the service pre-checks.
fn constraint_violation(err: DbErr, email: Option<&Email>) -> EmployeeError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => EmployeeError::DuplicateEmail(
            email.map(ToString::to_string).unwrap_or_default(),
        ),
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => EmployeeError::RoleNotFound,
        _ => EmployeeError::Database(err),
    }
}

fn set_if<T>(value: Option<T>) -> sea_orm::ActiveValue<T>
where
    T: Into<sea_orm::Value>,
{
    value.map_or(NotSet, Set)
}

#[async_trait]
impl EmployeeRepository for PgEmployeeRepository {
    async fn create(&self, input: NewEmployee) -> EmployeeResult<EmployeeView> {
        let model = entity::ActiveModel {
            name: Set(input.name.as_str().to_string()),
            email: Set(input.email.as_str().to_string()),
            password_hash: Set(input.password_hash),
            commute_allowance: Set(input.commute_allowance.as_i16()),
            role_id: Set(input.role_id.get()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| constraint_violation(e, Some(&input.email)))?;

        tracing::info!(employee_id = model.id, role_id = model.role_id, "Created employee");

        let role = RoleEntity::find_by_id(model.role_id).one(&self.db).await?;
        model.into_view(role)
    }

    async fn list(&self) -> EmployeeResult<Vec<EmployeeView>> {
        let rows = entity::Entity::find()
            .find_also_related(RoleEntity)
            .order_by_asc(entity::Column::Id)
            .all(&self.db)
            .await?;

        rows.into_iter()
            .map(|(employee, role)| employee.into_view(role))
            .collect()
    }

    async fn get_by_id(&self, id: EmployeeId) -> EmployeeResult<Option<EmployeeView>> {
        let row = entity::Entity::find_by_id(id.get())
            .find_also_related(RoleEntity)
            .one(&self.db)
            .await?;

        row.map(|(employee, role)| employee.into_view(role))
            .transpose()
    }

    async fn find_by_email(&self, email: &Email) -> EmployeeResult<Option<EmployeeCredentials>> {
        let row = entity::Entity::find()
            .filter(entity::Column::Email.eq(email.as_str()))
            .find_also_related(RoleEntity)
            .one(&self.db)
            .await?;

        row.map(|(employee, role)| employee.into_credentials(role))
            .transpose()
    }

    async fn update(&self, id: EmployeeId, changes: EmployeeChanges) -> EmployeeResult<bool> {
        let email = changes.email.clone();
        let active = entity::ActiveModel {
            id: NotSet,
            name: set_if(changes.name.map(|n| n.as_str().to_string())),
            email: set_if(changes.email.map(|e| e.as_str().to_string())),
            password_hash: set_if(changes.password_hash),
            commute_allowance: set_if(changes.commute_allowance.map(|c| c.as_i16())),
            role_id: set_if(changes.role_id.map(|r| r.get())),
        };

        let result = entity::Entity::update_many()
            .set(active)
            .filter(entity::Column::Id.eq(id.get()))
            .exec(&self.db)
            .await
            .map_err(|e| constraint_violation(e, email.as_ref()))?;

        if result.rows_affected > 0 {
            tracing::info!(employee_id = %id, "Updated employee");
        }
        Ok(result.rows_affected > 0)
    }

    async fn delete(&self, id: EmployeeId) -> EmployeeResult<bool> {
        let result = entity::Entity::delete_by_id(id.get())
            .exec(&self.db)
            .await?;

        if result.rows_affected > 0 {
            tracing::info!(employee_id = %id, "Deleted employee");
        }
        Ok(result.rows_affected > 0)
    }
}
