use chrono::Utc;
use sea_orm::{ActiveModelTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    Donation, DonationNew, Fundable, Project, ResultEngine, donations,
    repository::Repository,
    util::normalize_optional_text,
};

use super::{Engine, run_sweep, with_tx, with_write_tx};

impl Engine {
    /// Record a donation and spend it on the open projects.
    ///
    /// Projects are funded oldest first; whatever is left stays open on the
    /// donation until a new project shows up.
    pub async fn new_donation(&self, cmd: DonationNew) -> ResultEngine<Donation> {
        let comment = normalize_optional_text(cmd.comment.as_deref());

        with_write_tx!(self, |db_tx| {
            let now = Utc::now();
            let mut donation = Donation::new(cmd.user_id, comment, cmd.full_amount, now)?;

            self.require_user(&db_tx, &donation.user_id).await?;

            let donation_model: donations::ActiveModel = (&donation).into();
            donation_model.insert(&db_tx).await?;

            let sweep = run_sweep::<Project, Donation>(&db_tx, &mut donation, now).await?;
            tracing::info!(
                donation = %donation.id,
                user = %donation.user_id,
                full_amount = donation.target_amount(),
                invested_amount = donation.invested_amount(),
                projects_funded = sweep.touched.len(),
                "donation created"
            );
            Ok(donation)
        })
    }

    /// Every donation, oldest first.
    ///
    /// Authorization: superuser only.
    pub async fn donations(&self, user_id: &str) -> ResultEngine<Vec<Donation>> {
        with_tx!(self, |db_tx| {
            self.require_superuser(&db_tx, user_id).await?;
            Repository::<Donation>::new(&db_tx).list().await
        })
    }

    /// Donations made by `user_id`, oldest first.
    pub async fn user_donations(&self, user_id: &str) -> ResultEngine<Vec<Donation>> {
        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, user_id).await?;
            donations::Entity::find()
                .filter(donations::Column::UserId.eq(user_id))
                .order_by_asc(donations::Column::CreateDate)
                .order_by_asc(donations::Column::Id)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Donation::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }
}
