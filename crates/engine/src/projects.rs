//! The module contains `Project` struct and its storage model.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, Fundable, Funding, ResultEngine,
    repository::{FundColumn, Record},
    util::parse_uuid,
};

/// Longest accepted project name, in characters.
pub const MAX_NAME_LEN: usize = 100;

/// A charity project.
///
/// A project collects donations until `invested_amount` reaches
/// `target_amount`. Its name is unique among projects.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Stable identifier, time ordered (UUIDv7).
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub funding: Funding,
}

impl Project {
    pub fn new(
        name: String,
        description: String,
        target_amount: i64,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        Ok(Self {
            id: Uuid::now_v7(),
            name,
            description,
            funding: Funding::new(target_amount, created_at)?,
        })
    }

    /// Time it took to be fully funded, if it is closed.
    pub fn funding_duration(&self) -> Option<chrono::TimeDelta> {
        self.funding
            .closed_at
            .map(|closed_at| closed_at - self.funding.created_at)
    }
}

impl Fundable for Project {
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
#[sea_orm(table_name = "charity_projects")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    /// Lowercased `name`, the column uniqueness is enforced on.
    #[sea_orm(unique)]
    pub name_key: String,
    pub description: String,
    pub full_amount: i64,
    pub invested_amount: i64,
    pub fully_invested: bool,
    pub create_date: DateTimeUtc,
    pub close_date: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Case-folded form of a project name, used for the uniqueness check.
pub fn name_key(name: &str) -> String {
    name.to_lowercase()
}

impl From<&Project> for ActiveModel {
    fn from(project: &Project) -> Self {
        Self {
            id: ActiveValue::Set(project.id.to_string()),
            name: ActiveValue::Set(project.name.clone()),
            name_key: ActiveValue::Set(name_key(&project.name)),
            description: ActiveValue::Set(project.description.clone()),
            full_amount: ActiveValue::Set(project.funding.target_amount),
            invested_amount: ActiveValue::Set(project.funding.invested_amount),
            fully_invested: ActiveValue::Set(project.funding.fully_invested),
            create_date: ActiveValue::Set(project.funding.created_at),
            close_date: ActiveValue::Set(project.funding.closed_at),
        }
    }
}

impl TryFrom<Model> for Project {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "project")?,
            name: model.name,
            description: model.description,
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

impl Record for Project {
    type Entity = Entity;

    const LABEL: &'static str = "project";

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
