//! The module contains the errors the engine can throw.
//!
//! Errors fall in three groups:
//!
//! - lookups: [`KeyNotFound`] when a record is missing or belongs to another
//!   store, [`ExistingKey`] on duplicates.
//! - rule violations: one variant per ledger rule (arrival, reimbursement,
//!   amount ownership), see [`EngineError::is_rule_violation`].
//! - [`Database`]: the unit of work could not be committed. The transaction is
//!   always rolled back before this is returned.
//!
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`ExistingKey`]: EngineError::ExistingKey
//!  [`Database`]: EngineError::Database
use std::mem::discriminant;

use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid id: {0}")]
    InvalidId(String),
    #[error("Invalid name: {0}")]
    InvalidName(String),
    #[error("Arrival without date: {0}")]
    ArrivalDateMissing(String),
    #[error("Arrival date without arrival: {0}")]
    ArrivalDateWithoutArrival(String),
    #[error("Arrival cannot be reverted: {0}")]
    ArrivalReverted(String),
    #[error("Item already arrived: {0}")]
    ItemAlreadyArrived(String),
    #[error("Expense already reimbursed: {0}")]
    ExpenseReimbursed(String),
    #[error("Expense fully arrived: {0}")]
    ExpenseFullyArrived(String),
    #[error("Reimbursement cannot be reverted: {0}")]
    ReimbursementReverted(String),
    #[error("Payer missing: {0}")]
    PayerMissing(String),
    #[error("Reimbursement date missing: {0}")]
    ReimbursedAtMissing(String),
    #[error("Reimbursement date without reimbursement: {0}")]
    ReimbursedAtWithoutReimbursement(String),
    #[error("Items pending arrival: {0}")]
    ItemsPendingArrival(String),
    #[error("Amount managed by items: {0}")]
    AmountManagedByItems(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl EngineError {
    /// Returns `true` for violations of the ledger lifecycle rules.
    ///
    /// These are rejected before any write and never leave side effects.
    pub fn is_rule_violation(&self) -> bool {
        matches!(
            self,
            Self::ArrivalDateMissing(_)
                | Self::ArrivalDateWithoutArrival(_)
                | Self::ArrivalReverted(_)
                | Self::ItemAlreadyArrived(_)
                | Self::ExpenseReimbursed(_)
                | Self::ExpenseFullyArrived(_)
                | Self::ReimbursementReverted(_)
                | Self::PayerMissing(_)
                | Self::ReimbursedAtMissing(_)
                | Self::ReimbursedAtWithoutReimbursement(_)
                | Self::ItemsPendingArrival(_)
                | Self::AmountManagedByItems(_)
        )
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            (Self::Database(_), _) | (_, Self::Database(_)) => false,
            (a, b) => discriminant(a) == discriminant(b) && a.to_string() == b.to_string(),
        }
    }
}
