//! Command structs for engine operations.
//!
//! These types group parameters for write operations (expense and item
//! create/update), keeping call sites readable and avoiding long argument
//! lists. Every command carries the `store_id` the caller is authorized for
//! and the `user_id` recorded as `updater`.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::MoneyCents;

/// Create an expense header.
#[derive(Clone, Debug)]
pub struct CreateExpenseCmd {
    pub store_id: String,
    pub user_id: String,
    pub supplier_id: Uuid,
    pub amount: MoneyCents,
    pub other_fee: Option<MoneyCents>,
    pub payer_id: Option<String>,
    pub category: Option<String>,
    pub note: Option<String>,
    pub expense_date: Option<NaiveDate>,
}

impl CreateExpenseCmd {
    #[must_use]
    pub fn new(store_id: impl Into<String>, user_id: impl Into<String>, supplier_id: Uuid) -> Self {
        Self {
            store_id: store_id.into(),
            user_id: user_id.into(),
            supplier_id,
            amount: MoneyCents::ZERO,
            other_fee: None,
            payer_id: None,
            category: None,
            note: None,
            expense_date: None,
        }
    }

    /// Amount of an expense without items.
    #[must_use]
    pub fn amount(mut self, amount: MoneyCents) -> Self {
        self.amount = amount;
        self
    }

    #[must_use]
    pub fn other_fee(mut self, other_fee: MoneyCents) -> Self {
        self.other_fee = Some(other_fee);
        self
    }

    #[must_use]
    pub fn payer_id(mut self, payer_id: impl Into<String>) -> Self {
        self.payer_id = Some(payer_id.into());
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    #[must_use]
    pub fn expense_date(mut self, expense_date: NaiveDate) -> Self {
        self.expense_date = Some(expense_date);
        self
    }
}

/// Update an expense header.
///
/// `None` fields are left untouched. For text fields an empty string clears
/// the stored value; `other_fee` and `expense_date` are cleared with
/// `Some(None)`.
#[derive(Clone, Debug)]
pub struct UpdateExpenseCmd {
    pub store_id: String,
    pub user_id: String,
    pub expense_id: Uuid,
    pub supplier_id: Option<Uuid>,
    pub amount: Option<MoneyCents>,
    pub other_fee: Option<Option<MoneyCents>>,
    pub payer_id: Option<String>,
    pub category: Option<String>,
    pub note: Option<String>,
    pub expense_date: Option<Option<NaiveDate>>,
    pub is_reimbursed: Option<bool>,
    pub reimbursed_at: Option<DateTime<Utc>>,
}

impl UpdateExpenseCmd {
    #[must_use]
    pub fn new(store_id: impl Into<String>, user_id: impl Into<String>, expense_id: Uuid) -> Self {
        Self {
            store_id: store_id.into(),
            user_id: user_id.into(),
            expense_id,
            supplier_id: None,
            amount: None,
            other_fee: None,
            payer_id: None,
            category: None,
            note: None,
            expense_date: None,
            is_reimbursed: None,
            reimbursed_at: None,
        }
    }

    #[must_use]
    pub fn supplier_id(mut self, supplier_id: Uuid) -> Self {
        self.supplier_id = Some(supplier_id);
        self
    }

    #[must_use]
    pub fn amount(mut self, amount: MoneyCents) -> Self {
        self.amount = Some(amount);
        self
    }

    #[must_use]
    pub fn other_fee(mut self, other_fee: MoneyCents) -> Self {
        self.other_fee = Some(Some(other_fee));
        self
    }

    #[must_use]
    pub fn clear_other_fee(mut self) -> Self {
        self.other_fee = Some(None);
        self
    }

    #[must_use]
    pub fn payer_id(mut self, payer_id: impl Into<String>) -> Self {
        self.payer_id = Some(payer_id.into());
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    #[must_use]
    pub fn expense_date(mut self, expense_date: NaiveDate) -> Self {
        self.expense_date = Some(Some(expense_date));
        self
    }

    #[must_use]
    pub fn clear_expense_date(mut self) -> Self {
        self.expense_date = Some(None);
        self
    }

    /// Marks the expense as reimbursed at `at`.
    #[must_use]
    pub fn reimbursed(mut self, at: DateTime<Utc>) -> Self {
        self.is_reimbursed = Some(true);
        self.reimbursed_at = Some(at);
        self
    }
}

/// Add an item to an expense.
#[derive(Clone, Debug)]
pub struct CreateItemCmd {
    pub store_id: String,
    pub user_id: String,
    pub expense_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i64,
    pub price: MoneyCents,
    pub is_arrived: bool,
    pub arrival_date: Option<NaiveDate>,
    pub expiration_date: Option<NaiveDate>,
    pub storage_location: Option<String>,
    pub note: Option<String>,
}

impl CreateItemCmd {
    #[must_use]
    pub fn new(
        store_id: impl Into<String>,
        user_id: impl Into<String>,
        expense_id: Uuid,
        product_id: Uuid,
        quantity: i64,
        price: MoneyCents,
    ) -> Self {
        Self {
            store_id: store_id.into(),
            user_id: user_id.into(),
            expense_id,
            product_id,
            quantity,
            price,
            is_arrived: false,
            arrival_date: None,
            expiration_date: None,
            storage_location: None,
            note: None,
        }
    }

    /// Marks the item as already received on `on`.
    #[must_use]
    pub fn arrived(mut self, on: NaiveDate) -> Self {
        self.is_arrived = true;
        self.arrival_date = Some(on);
        self
    }

    #[must_use]
    pub fn expiration_date(mut self, expiration_date: NaiveDate) -> Self {
        self.expiration_date = Some(expiration_date);
        self
    }

    #[must_use]
    pub fn storage_location(mut self, location: impl Into<String>) -> Self {
        self.storage_location = Some(location.into());
        self
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Update an expense item. `None` fields are left untouched.
#[derive(Clone, Debug)]
pub struct UpdateItemCmd {
    pub store_id: String,
    pub user_id: String,
    pub expense_id: Uuid,
    pub item_id: Uuid,
    pub product_id: Option<Uuid>,
    pub quantity: Option<i64>,
    pub price: Option<MoneyCents>,
    pub is_arrived: Option<bool>,
    pub arrival_date: Option<NaiveDate>,
    /// `Some(None)` clears the stored date.
    pub expiration_date: Option<Option<NaiveDate>>,
    pub storage_location: Option<String>,
    pub note: Option<String>,
}

impl UpdateItemCmd {
    #[must_use]
    pub fn new(
        store_id: impl Into<String>,
        user_id: impl Into<String>,
        expense_id: Uuid,
        item_id: Uuid,
    ) -> Self {
        Self {
            store_id: store_id.into(),
            user_id: user_id.into(),
            expense_id,
            item_id,
            product_id: None,
            quantity: None,
            price: None,
            is_arrived: None,
            arrival_date: None,
            expiration_date: None,
            storage_location: None,
            note: None,
        }
    }

    #[must_use]
    pub fn product_id(mut self, product_id: Uuid) -> Self {
        self.product_id = Some(product_id);
        self
    }

    #[must_use]
    pub fn quantity(mut self, quantity: i64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    #[must_use]
    pub fn price(mut self, price: MoneyCents) -> Self {
        self.price = Some(price);
        self
    }

    /// Marks the item as received on `on`.
    #[must_use]
    pub fn arrived(mut self, on: NaiveDate) -> Self {
        self.is_arrived = Some(true);
        self.arrival_date = Some(on);
        self
    }

    #[must_use]
    pub fn is_arrived(mut self, is_arrived: bool) -> Self {
        self.is_arrived = Some(is_arrived);
        self
    }

    #[must_use]
    pub fn arrival_date(mut self, arrival_date: NaiveDate) -> Self {
        self.arrival_date = Some(arrival_date);
        self
    }

    #[must_use]
    pub fn expiration_date(mut self, expiration_date: NaiveDate) -> Self {
        self.expiration_date = Some(Some(expiration_date));
        self
    }

    #[must_use]
    pub fn clear_expiration_date(mut self) -> Self {
        self.expiration_date = Some(None);
        self
    }

    #[must_use]
    pub fn storage_location(mut self, location: impl Into<String>) -> Self {
        self.storage_location = Some(location.into());
        self
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}
