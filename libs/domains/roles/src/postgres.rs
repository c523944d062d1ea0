use async_trait::async_trait;
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    SqlErr,
};

use crate::{
    entity,
    error::{RoleError, RoleResult},
    models::{Role, RoleId, RoleName},
    repository::RoleRepository,
};

/// SeaORM-backed RoleRepository.
///
/// The unique index on `roles.name` and the `employees.role_id` foreign key
/// decide races; their violations come back as domain errors.
#[derive(Clone)]
pub struct PgRoleRepository {
    db: DatabaseConnection,
}

impl PgRoleRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn unique_violation(err: DbErr, name: &RoleName) -> RoleError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            RoleError::DuplicateName(name.as_str().to_string())
        }
        _ => RoleError::Database(err),
    }
}

#[async_trait]
impl RoleRepository for PgRoleRepository {
    async fn create(&self, name: RoleName) -> RoleResult<Role> {
        let model = entity::ActiveModel {
            name: Set(name.as_str().to_string()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| unique_violation(e, &name))?;

        tracing::info!(role_id = model.id, "Created role");
        Ok(model.into())
    }

    async fn list(&self) -> RoleResult<Vec<Role>> {
        let models = entity::Entity::find()
            .order_by_asc(entity::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn get_by_id(&self, id: RoleId) -> RoleResult<Option<Role>> {
        let model = entity::Entity::find_by_id(id.get()).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn find_by_name(&self, name: &RoleName) -> RoleResult<Option<Role>> {
        let model = entity::Entity::find()
            .filter(entity::Column::Name.eq(name.as_str()))
            .one(&self.db)
            .await?;

        Ok(model.map(Into::into))
    }

    async fn update(&self, id: RoleId, name: RoleName) -> RoleResult<bool> {
        let result = entity::Entity::update_many()
            .col_expr(entity::Column::Name, Expr::value(name.as_str()))
            .filter(entity::Column::Id.eq(id.get()))
            .exec(&self.db)
            .await
            .map_err(|e| unique_violation(e, &name))?;

        if result.rows_affected > 0 {
            tracing::info!(role_id = %id, "Updated role");
        }
        Ok(result.rows_affected > 0)
    }

    async fn delete(&self, id: RoleId) -> RoleResult<bool> {
        let result = entity::Entity::delete_by_id(id.get())
            .exec(&self.db)
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::ForeignKeyConstraintViolation(_)) => RoleError::InUse(id.get()),
                _ => RoleError::Database(e),
            })?;

        if result.rows_affected > 0 {
            tracing::info!(role_id = %id, "Deleted role");
        }
        Ok(result.rows_affected > 0)
    }
}
