//! Storage access shared by projects and donations.
//!
//! Both tables carry the same funding columns, so reading the open backlog
//! and writing back the result of a sweep is implemented once, over any
//! [`Record`]. Kind specific queries (names, contributors) and inserts live
//! next to the operations that need them.

use std::marker::PhantomData;

use sea_orm::{DatabaseTransaction, QueryFilter, QueryOrder, Select, prelude::*, sea_query::Expr};
use uuid::Uuid;

use crate::{EngineError, Fundable, ResultEngine};

/// Funding columns every fundable table has.
#[derive(Clone, Copy, Debug)]
pub(crate) enum FundColumn {
    Id,
    InvestedAmount,
    FullyInvested,
    CreateDate,
    CloseDate,
}

/// A fundable entity backed by a table.
pub(crate) trait Record: Fundable + Sized {
    type Entity: EntityTrait;

    /// Name used in error messages.
    const LABEL: &'static str;

    fn column(column: FundColumn) -> <Self::Entity as EntityTrait>::Column;

    fn from_model(model: <Self::Entity as EntityTrait>::Model) -> ResultEngine<Self>;
}

/// Generic repository bound to one database transaction.
pub(crate) struct Repository<'a, R> {
    db: &'a DatabaseTransaction,
    kind: PhantomData<R>,
}

impl<'a, R: Record> Repository<'a, R> {
    pub(crate) fn new(db: &'a DatabaseTransaction) -> Self {
        Self {
            db,
            kind: PhantomData,
        }
    }

    pub(crate) async fn get(&self, id: Uuid) -> ResultEngine<Option<R>> {
        R::Entity::find()
            .filter(R::column(FundColumn::Id).eq(id.to_string()))
            .one(self.db)
            .await?
            .map(R::from_model)
            .transpose()
    }

    pub(crate) async fn require(&self, id: Uuid) -> ResultEngine<R> {
        self.get(id)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("{} not exists", R::LABEL)))
    }

    /// Every row, oldest first.
    pub(crate) async fn list(&self) -> ResultEngine<Vec<R>> {
        self.collect(
            R::Entity::find()
                .order_by_asc(R::column(FundColumn::CreateDate))
                .order_by_asc(R::column(FundColumn::Id)),
        )
        .await
    }

    /// Rows still waiting for money (or for projects), in processing order.
    ///
    /// Ids are UUIDv7, so they break creation time ties in insertion order.
    pub(crate) async fn list_open(&self) -> ResultEngine<Vec<R>> {
        self.collect(
            R::Entity::find()
                .filter(R::column(FundColumn::FullyInvested).eq(false))
                .order_by_asc(R::column(FundColumn::CreateDate))
                .order_by_asc(R::column(FundColumn::Id)),
        )
        .await
    }

    /// Write back the funding state owned by the allocation sweep.
    pub(crate) async fn persist(&self, record: &R) -> ResultEngine<()> {
        let funding = record.funding();
        let result = R::Entity::update_many()
            .col_expr(
                R::column(FundColumn::InvestedAmount),
                Expr::value(funding.invested_amount),
            )
            .col_expr(
                R::column(FundColumn::FullyInvested),
                Expr::value(funding.fully_invested),
            )
            .col_expr(
                R::column(FundColumn::CloseDate),
                Expr::value(funding.closed_at),
            )
            .filter(R::column(FundColumn::Id).eq(record.id().to_string()))
            .exec(self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound(format!("{} not exists", R::LABEL)));
        }
        Ok(())
    }

    pub(crate) async fn delete(&self, id: Uuid) -> ResultEngine<()> {
        let result = R::Entity::delete_many()
            .filter(R::column(FundColumn::Id).eq(id.to_string()))
            .exec(self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound(format!("{} not exists", R::LABEL)));
        }
        Ok(())
    }

    async fn collect(&self, select: Select<R::Entity>) -> ResultEngine<Vec<R>> {
        select
            .all(self.db)
            .await?
            .into_iter()
            .map(R::from_model)
            .collect()
    }
}
