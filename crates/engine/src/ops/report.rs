use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{Project, ReportRow, ResultEngine, projects, rank_by_funding_speed};

use super::{Engine, with_tx};

impl Engine {
    /// Closed projects, fastest funded first.
    ///
    /// Authorization: superuser only.
    pub async fn closed_projects_report(&self, user_id: &str) -> ResultEngine<Vec<ReportRow>> {
        with_tx!(self, |db_tx| {
            self.require_superuser(&db_tx, user_id).await?;
            let closed = projects::Entity::find()
                .filter(projects::Column::FullyInvested.eq(true))
                .order_by_asc(projects::Column::CreateDate)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Project::try_from)
                .collect::<ResultEngine<Vec<_>>>()?;
            Ok(rank_by_funding_speed(closed))
        })
    }
}
