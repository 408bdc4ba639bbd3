//! Fund distribution between open projects and open donations.
//!
//! Every time money (a donation) or demand (a project) enters the system, the
//! newcomer is matched against the backlog of open counter-entities, oldest
//! first. The sweep is a single greedy pass: each backlog entry is either
//! filled completely (and the sweep moves on) or it absorbs whatever is left
//! of the newcomer (and the sweep stops).
//!
//! The sweep does not care which side is the source and which is the sink,
//! it only moves `invested_amount` forward on both sides by the same amount.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::{EngineError, Fundable, ResultEngine};

/// Outcome of one sweep.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Sweep {
    /// Indices of the backlog entries that received money, in sweep order.
    pub touched: Vec<usize>,
    /// Total amount moved between `incoming` and the backlog.
    pub moved: i64,
}

/// Distribute `incoming` over `backlog`.
///
/// `backlog` must hold only open entities, ordered by creation time. Entities
/// reaching their target are closed with `now` as closing time. Only the
/// entries listed in [`Sweep::touched`] and `incoming` itself are modified.
///
/// Returns [`EngineError::InvalidAmount`] if an entity breaks the funding
/// invariants (non-positive target, nothing left to fill in the backlog).
/// Such an entity can only come from a bug upstream, so the caller is expected
/// to abort its transaction.
pub fn distribute<B, I>(
    backlog: &mut [B],
    incoming: &mut I,
    now: DateTime<Utc>,
) -> ResultEngine<Sweep>
where
    B: Fundable,
    I: Fundable,
{
    ensure_consistent(&*incoming)?;

    let mut sweep = Sweep::default();
    if incoming.is_fulfilled() {
        return Ok(sweep);
    }

    for (index, item) in backlog.iter_mut().enumerate() {
        ensure_consistent(&*item)?;
        let remaining_incoming = incoming.remaining();
        let remaining_item = item.remaining();
        if item.is_fulfilled() || remaining_item == 0 {
            return Err(EngineError::InvalidAmount(format!(
                "backlog entry {} is already fully invested",
                item.id()
            )));
        }

        match remaining_incoming.cmp(&remaining_item) {
            Ordering::Greater => {
                transfer(item, incoming, remaining_item);
                item.close(now);
                sweep.touched.push(index);
                sweep.moved += remaining_item;
            }
            Ordering::Equal => {
                transfer(item, incoming, remaining_item);
                item.close(now);
                incoming.close(now);
                sweep.touched.push(index);
                sweep.moved += remaining_item;
                break;
            }
            Ordering::Less => {
                transfer(item, incoming, remaining_incoming);
                incoming.close(now);
                sweep.touched.push(index);
                sweep.moved += remaining_incoming;
                break;
            }
        }
    }

    Ok(sweep)
}

fn transfer<B: Fundable, I: Fundable>(item: &mut B, incoming: &mut I, amount: i64) {
    item.funding_mut().invest(amount);
    incoming.funding_mut().invest(amount);
}

fn ensure_consistent<F: Fundable>(entity: &F) -> ResultEngine<()> {
    let funding = entity.funding();
    if funding.target_amount <= 0 {
        return Err(EngineError::InvalidAmount(format!(
            "{} has a non-positive full_amount",
            entity.id()
        )));
    }
    if funding.invested_amount < 0 || funding.invested_amount > funding.target_amount {
        return Err(EngineError::InvalidAmount(format!(
            "{} has invested_amount out of range",
            entity.id()
        )));
    }
    Ok(())
}
