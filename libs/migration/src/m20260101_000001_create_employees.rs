use sea_orm_migration::{prelude::*, schema::*};

use crate::m20260101_000000_create_roles::Roles;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Employees::Table)
                    .if_not_exists()
                    .col(pk_auto(Employees::Id))
                    .col(string(Employees::Name))
                    .col(string_uniq(Employees::Email))
                    .col(string(Employees::PasswordHash))
                    .col(
                        small_integer(Employees::CommuteAllowance)
                            .default(0)
                            .check(Expr::cust("commute_allowance IN (0, 1)")),
                    )
                    .col(integer(Employees::RoleId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_employees_role_id")
                            .from(Employees::Table, Employees::RoleId)
                            .to(Roles::Table, Roles::Id)
                            .on_delete(ForeignKeyAction::NoAction)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_employees_role_id")
                    .table(Employees::Table)
                    .col(Employees::RoleId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Employees::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Employees {
    Table,
    Id,
    Name,
    Email,
    PasswordHash,
    CommuteAllowance,
    RoleId,
}
