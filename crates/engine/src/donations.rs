//! The module contains `Donation` struct and its storage model.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, Fundable, Funding, ResultEngine,
    repository::{FundColumn, Record},
    util::parse_uuid,
};

/// A donation.
///
/// Once created only its funding state changes, as the allocation sweep
/// moves its money into projects.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Donation {
    /// Stable identifier, time ordered (UUIDv7).
    pub id: Uuid,
    /// Username of the contributor.
    pub user_id: String,
    pub comment: Option<String>,
    pub funding: Funding,
}

impl Donation {
    pub fn new(
        user_id: String,
        comment: Option<String>,
        target_amount: i64,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        Ok(Self {
            id: Uuid::now_v7(),
            user_id,
            comment,
            funding: Funding::new(target_amount, created_at)?,
        })
    }
}

impl Fundable for Donation {
    fn id(&self) -> Uuid {
        self.id
    }

    fn funding(&self) -> &Funding {
        &self.funding
    }

    fn funding_mut(&mut self) -> &mut Funding {
        &mut self.funding
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "donations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub comment: Option<String>,
    pub full_amount: i64,
    pub invested_amount: i64,
    pub fully_invested: bool,
    pub create_date: DateTimeUtc,
    pub close_date: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Username",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Donation> for ActiveModel {
    fn from(donation: &Donation) -> Self {
        Self {
            id: ActiveValue::Set(donation.id.to_string()),
            user_id: ActiveValue::Set(donation.user_id.clone()),
            comment: ActiveValue::Set(donation.comment.clone()),
            full_amount: ActiveValue::Set(donation.funding.target_amount),
            invested_amount: ActiveValue::Set(donation.funding.invested_amount),
            fully_invested: ActiveValue::Set(donation.funding.fully_invested),
            create_date: ActiveValue::Set(donation.funding.created_at),
            close_date: ActiveValue::Set(donation.funding.closed_at),
        }
    }
}

impl TryFrom<Model> for Donation {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "donation")?,
            user_id: model.user_id,
            comment: model.comment,
            funding: Funding {
                target_amount: model.full_amount,
                invested_amount: model.invested_amount,
                fully_invested: model.fully_invested,
                created_at: model.create_date,
                closed_at: model.close_date,
            },
        })
    }
}

impl Record for Donation {
    type Entity = Entity;

    const LABEL: &'static str = "donation";

    fn column(column: FundColumn) -> Column {
        match column {
            FundColumn::Id => Column::Id,
            FundColumn::InvestedAmount => Column::InvestedAmount,
            FundColumn::FullyInvested => Column::FullyInvested,
            FundColumn::CreateDate => Column::CreateDate,
            FundColumn::CloseDate => Column::CloseDate,
        }
    }

    fn from_model(model: Model) -> ResultEngine<Self> {
        Self::try_from(model)
    }
}
