//! The module contains the funding state shared by projects and donations.
//!
//! A project *needs* money and a donation *provides* it, but both are
//! described by the same five numbers: how much in total, how much already
//! moved, whether it is complete, when it was created and when it closed.
//! That state lives in [`Funding`], embedded by both [`Project`] and
//! [`Donation`], and is exposed through the [`Fundable`] trait so the
//! allocation sweep never needs to know which side it is looking at.
//!
//!  [`Project`]: crate::Project
//!  [`Donation`]: crate::Donation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Amounts and lifecycle timestamps of a fundable entity.
///
/// Amounts are integer units of a single currency. The following always
/// holds:
///
/// - `0 <= invested_amount <= target_amount`
/// - `fully_invested == (invested_amount == target_amount)`
/// - `closed_at.is_some() == fully_invested`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Funding {
    pub target_amount: i64,
    pub invested_amount: i64,
    pub fully_invested: bool,
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl Funding {
    /// Open funding with nothing invested yet.
    pub fn new(target_amount: i64, created_at: DateTime<Utc>) -> ResultEngine<Self> {
        validate_target(target_amount)?;
        Ok(Self {
            target_amount,
            invested_amount: 0,
            fully_invested: false,
            created_at,
            closed_at: None,
        })
    }

    /// Amount still missing to reach the target.
    #[must_use]
    pub fn remaining(&self) -> i64 {
        self.target_amount - self.invested_amount
    }

    /// Changes the target amount.
    ///
    /// The new target must be positive and not below what was already
    /// invested. Closing the entity when the target is met is left to the
    /// caller.
    pub fn set_target(&mut self, target_amount: i64) -> ResultEngine<()> {
        validate_target(target_amount)?;
        if target_amount < self.invested_amount {
            return Err(EngineError::TargetBelowInvested {
                target: target_amount,
                invested: self.invested_amount,
            });
        }
        self.target_amount = target_amount;
        Ok(())
    }

    pub(crate) fn invest(&mut self, amount: i64) {
        self.invested_amount += amount;
    }

    /// Closure policy: mark as fully invested and stamp `closed_at`.
    ///
    /// Calling it twice overwrites `closed_at`.
    pub(crate) fn close(&mut self, now: DateTime<Utc>) {
        self.fully_invested = true;
        self.closed_at = Some(now);
    }
}

fn validate_target(target_amount: i64) -> ResultEngine<()> {
    if target_amount <= 0 {
        return Err(EngineError::InvalidAmount(
            "full_amount must be > 0".to_string(),
        ));
    }
    Ok(())
}

/// Anything with a target amount and an invested amount.
pub trait Fundable {
    fn id(&self) -> Uuid;

    fn funding(&self) -> &Funding;

    fn funding_mut(&mut self) -> &mut Funding;

    fn target_amount(&self) -> i64 {
        self.funding().target_amount
    }

    fn invested_amount(&self) -> i64 {
        self.funding().invested_amount
    }

    fn remaining(&self) -> i64 {
        self.funding().remaining()
    }

    fn is_fulfilled(&self) -> bool {
        self.funding().fully_invested
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.funding().created_at
    }

    fn closed_at(&self) -> Option<DateTime<Utc>> {
        self.funding().closed_at
    }

    /// See [`Funding::close`].
    fn close(&mut self, now: DateTime<Utc>) {
        self.funding_mut().close(now);
    }
}
