//! Expense ledger and inventory reconciliation engine.
//!
//! The engine records restocking expenses (a header plus its line items),
//! keeps each header's amount in sync with its items and increments product
//! stock when goods arrive. Every write runs inside one database transaction,
//! so header, items and stock never drift apart.
//!
//! Callers are expected to have resolved the store scope already: every
//! operation takes the `store_id` it is allowed to touch and treats records of
//! other stores as missing.

pub use commands::{CreateExpenseCmd, CreateItemCmd, UpdateExpenseCmd, UpdateItemCmd};
pub use error::EngineError;
pub use expense_items::ExpenseItem;
pub use expenses::Expense;
pub use lifecycle::{ArrivalState, ReimbursementState};
pub use money::MoneyCents;
pub use ops::{Engine, EngineBuilder};
pub use products::Product;
pub use stock::{ProductStockColumn, StockCounter};
pub use suppliers::Supplier;

mod commands;
mod error;
mod expense_items;
mod expenses;
mod lifecycle;
mod money;
mod ops;
mod products;
mod rules;
mod stock;
mod suppliers;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
