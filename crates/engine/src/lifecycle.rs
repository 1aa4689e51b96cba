//! One-way lifecycles of items and expenses.
//!
//! Both state machines have a single directed edge and a terminal state:
//!
//! - [`ArrivalState`]: `Pending -> Arrived`. The edge is the only moment stock
//!   is incremented for an item.
//! - [`ReimbursementState`]: `Open -> Reimbursed`. The edge freezes every
//!   financial field of the expense and its items.
//!
//! The reverse edges are rejected here and nowhere else.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

/// Arrival state of an expense item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ArrivalState {
    Pending,
    Arrived { on: NaiveDate },
}

impl ArrivalState {
    /// Builds the initial state of a new item from the requested flag/date.
    pub(crate) fn requested(is_arrived: bool, date: Option<NaiveDate>) -> ResultEngine<Self> {
        match (is_arrived, date) {
            (true, Some(on)) => Ok(Self::Arrived { on }),
            (true, None) => Err(EngineError::ArrivalDateMissing(
                "arrival_date is required when is_arrived is true".to_string(),
            )),
            (false, Some(_)) => Err(EngineError::ArrivalDateWithoutArrival(
                "arrival_date requires is_arrived".to_string(),
            )),
            (false, None) => Ok(Self::Pending),
        }
    }

    #[must_use]
    pub fn is_arrived(self) -> bool {
        matches!(self, Self::Arrived { .. })
    }

    #[must_use]
    pub fn date(self) -> Option<NaiveDate> {
        match self {
            Self::Pending => None,
            Self::Arrived { on } => Some(on),
        }
    }

    /// Applies a requested change and returns the next state plus whether the
    /// `Pending -> Arrived` edge was taken.
    ///
    /// An arrived item keeps its state; only its date may be corrected.
    pub(crate) fn advance(
        self,
        is_arrived: Option<bool>,
        date: Option<NaiveDate>,
    ) -> ResultEngine<(Self, bool)> {
        match self {
            Self::Arrived { on } => {
                if is_arrived == Some(false) {
                    return Err(EngineError::ArrivalReverted(
                        "an arrived item cannot go back to pending".to_string(),
                    ));
                }
                Ok((Self::Arrived { on: date.unwrap_or(on) }, false))
            }
            Self::Pending => match is_arrived {
                Some(true) => Ok((Self::requested(true, date)?, true)),
                Some(false) | None => Ok((Self::requested(false, date)?, false)),
            },
        }
    }
}

/// Reimbursement state of an expense.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ReimbursementState {
    Open,
    Reimbursed { at: DateTime<Utc> },
}

/// What the `Open -> Reimbursed` edge is gated on.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ReimbursementGate {
    pub(crate) payer_present: bool,
    pub(crate) pending_items: usize,
}

impl ReimbursementState {
    #[must_use]
    pub fn is_reimbursed(self) -> bool {
        matches!(self, Self::Reimbursed { .. })
    }

    #[must_use]
    pub fn at(self) -> Option<DateTime<Utc>> {
        match self {
            Self::Open => None,
            Self::Reimbursed { at } => Some(at),
        }
    }

    /// Applies a requested change and returns the next state plus whether the
    /// `Open -> Reimbursed` edge was taken.
    pub(crate) fn advance(
        self,
        is_reimbursed: Option<bool>,
        at: Option<DateTime<Utc>>,
        gate: ReimbursementGate,
    ) -> ResultEngine<(Self, bool)> {
        match self {
            Self::Reimbursed { at: current } => {
                if is_reimbursed == Some(false) {
                    return Err(EngineError::ReimbursementReverted(
                        "a reimbursed expense cannot be reopened".to_string(),
                    ));
                }
                if !gate.payer_present {
                    return Err(EngineError::PayerMissing(
                        "a reimbursed expense must keep its payer".to_string(),
                    ));
                }
                Ok((Self::Reimbursed { at: at.unwrap_or(current) }, false))
            }
            Self::Open => match is_reimbursed {
                Some(true) => {
                    if !gate.payer_present {
                        return Err(EngineError::PayerMissing(
                            "payer_id is required to reimburse".to_string(),
                        ));
                    }
                    let at = at.ok_or_else(|| {
                        EngineError::ReimbursedAtMissing(
                            "reimbursed_at is required when is_reimbursed is true".to_string(),
                        )
                    })?;
                    if gate.pending_items > 0 {
                        return Err(EngineError::ItemsPendingArrival(format!(
                            "{} item(s) have not arrived yet",
                            gate.pending_items
                        )));
                    }
                    Ok((Self::Reimbursed { at }, true))
                }
                Some(false) | None => {
                    if at.is_some() {
                        return Err(EngineError::ReimbursedAtWithoutReimbursement(
                            "reimbursed_at requires is_reimbursed".to_string(),
                        ));
                    }
                    Ok((Self::Open, false))
                }
            },
        }
    }
}
