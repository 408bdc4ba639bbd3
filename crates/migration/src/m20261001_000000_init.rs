//! Initial schema.
//!
//! - `users`: authentication and the superuser flag
//! - `charity_projects`: projects waiting for money, unique by lowercased
//!   `name_key`
//! - `donations`: money waiting for projects

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Users {
    Table,
    Username,
    Password,
    IsSuperuser,
}

#[derive(Iden)]
enum CharityProjects {
    Table,
    Id,
    Name,
    NameKey,
    Description,
    FullAmount,
    InvestedAmount,
    FullyInvested,
    CreateDate,
    CloseDate,
}

#[derive(Iden)]
enum Donations {
    Table,
    Id,
    UserId,
    Comment,
    FullAmount,
    InvestedAmount,
    FullyInvested,
    CreateDate,
    CloseDate,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .col(
                        ColumnDef::new(Users::IsSuperuser)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CharityProjects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CharityProjects::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CharityProjects::Name)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(ColumnDef::new(CharityProjects::NameKey).string().not_null())
                    .col(ColumnDef::new(CharityProjects::Description).text().not_null())
                    .col(
                        ColumnDef::new(CharityProjects::FullAmount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CharityProjects::InvestedAmount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(CharityProjects::FullyInvested)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(CharityProjects::CreateDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CharityProjects::CloseDate).timestamp_with_time_zone())
                    .check(Expr::col(CharityProjects::FullAmount).gt(0))
                    .check(Expr::col(CharityProjects::InvestedAmount).gte(0))
                    .check(
                        Expr::col(CharityProjects::InvestedAmount)
                            .lte(Expr::col(CharityProjects::FullAmount)),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-charity_projects-name_key-unique")
                    .table(CharityProjects::Table)
                    .col(CharityProjects::NameKey)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-charity_projects-open")
                    .table(CharityProjects::Table)
                    .col(CharityProjects::FullyInvested)
                    .col(CharityProjects::CreateDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Donations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Donations::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Donations::UserId).string().not_null())
                    .col(ColumnDef::new(Donations::Comment).text())
                    .col(ColumnDef::new(Donations::FullAmount).big_integer().not_null())
                    .col(
                        ColumnDef::new(Donations::InvestedAmount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Donations::FullyInvested)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Donations::CreateDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Donations::CloseDate).timestamp_with_time_zone())
                    .check(Expr::col(Donations::FullAmount).gt(0))
                    .check(Expr::col(Donations::InvestedAmount).gte(0))
                    .check(
                        Expr::col(Donations::InvestedAmount)
                            .lte(Expr::col(Donations::FullAmount)),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-donations-user_id")
                            .from(Donations::Table, Donations::UserId)
                            .to(Users::Table, Users::Username),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-donations-open")
                    .table(Donations::Table)
                    .col(Donations::FullyInvested)
                    .col(Donations::CreateDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-donations-user_id")
                    .table(Donations::Table)
                    .col(Donations::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Donations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CharityProjects::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
