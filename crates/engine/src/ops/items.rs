//! Expense item writes.
//!
//! Each operation is one unit of work:
//! 1. lock the expense header and load its items
//! 2. check the requested change against the rules
//! 3. write the item, re-sum the header amount from the stored items and, on
//!    the arrival edge only, increment product stock
//!
//! Any failure after step 1 rolls back all writes.

use chrono::Utc;
use uuid::Uuid;

use crate::{
    CreateItemCmd, EngineError, Expense, ExpenseItem, ResultEngine, UpdateItemCmd, rules,
    util::{
        apply_optional_text_patch, ensure_non_negative_money, ensure_non_negative_quantity,
        normalize_optional_text,
    },
};

use super::{Engine, with_tx};

fn find_item(expense: &Expense, item_id: Uuid) -> ResultEngine<&ExpenseItem> {
    expense
        .items
        .iter()
        .find(|item| item.id == item_id)
        .ok_or_else(|| EngineError::KeyNotFound("expense item not exists".to_string()))
}

impl Engine {
    /// Adds an item to an expense.
    ///
    /// Rejected, in this order, when the expense is missing, quantity or price
    /// is negative, the item is arrived without a date, the expense is
    /// reimbursed, every existing item has already arrived, or the product is
    /// not in the expense's store.
    pub async fn create_expense_item(&self, cmd: CreateItemCmd) -> ResultEngine<Uuid> {
        let now = Utc::now();
        with_tx!(self, |db_tx| {
            let uow = self.unit_of_work(&db_tx, &cmd.store_id);
            let mut expense = uow.lock_expense(cmd.expense_id).await?;
            ensure_non_negative_quantity(cmd.quantity, "quantity")?;
            ensure_non_negative_money(cmd.price, "price")?;

            let arrival = rules::check_item_create(&expense, cmd.is_arrived, cmd.arrival_date)?;
            uow.require_product(cmd.product_id).await?;

            let item = ExpenseItem {
                id: Uuid::new_v4(),
                expense_id: expense.id,
                product_id: cmd.product_id,
                quantity: cmd.quantity,
                price: cmd.price,
                arrival,
                expiration_date: cmd.expiration_date,
                storage_location: normalize_optional_text(cmd.storage_location.as_deref()),
                note: normalize_optional_text(cmd.note.as_deref()),
                created_at: now,
                updated_at: now,
            };
            item.line_total()?;
            uow.insert_item(&item).await?;
            let amount = uow.resync_amount(&mut expense, &cmd.user_id, now).await?;

            if item.is_arrived() {
                uow.receive_stock(item.product_id, item.quantity).await?;
            }

            tracing::debug!(
                expense_id = %expense.id,
                item_id = %item.id,
                arrived = item.is_arrived(),
                amount = %amount,
                "expense item created"
            );
            Ok(item.id)
        })
    }

    /// Updates an expense item.
    ///
    /// Product, quantity and price are locked once the item has arrived or
    /// the expense is reimbursed. Marking the item arrived increments the
    /// stock of the (possibly just changed) product by the (possibly just
    /// changed) quantity.
    pub async fn update_expense_item(&self, cmd: UpdateItemCmd) -> ResultEngine<Uuid> {
        let now = Utc::now();
        with_tx!(self, |db_tx| {
            let uow = self.unit_of_work(&db_tx, &cmd.store_id);
            let mut expense = uow.lock_expense(cmd.expense_id).await?;
            let current = find_item(&expense, cmd.item_id)?;
            if let Some(quantity) = cmd.quantity {
                ensure_non_negative_quantity(quantity, "quantity")?;
            }
            if let Some(price) = cmd.price {
                ensure_non_negative_money(price, "price")?;
            }

            let update = rules::check_item_update(&expense, current, &cmd)?;
            if update.product_id != current.product_id {
                uow.require_product(update.product_id).await?;
            }

            let item = ExpenseItem {
                product_id: update.product_id,
                quantity: update.quantity,
                price: update.price,
                arrival: update.arrival,
                expiration_date: cmd.expiration_date.unwrap_or(current.expiration_date),
                storage_location: apply_optional_text_patch(
                    current.storage_location.clone(),
                    cmd.storage_location.as_deref(),
                ),
                note: apply_optional_text_patch(current.note.clone(), cmd.note.as_deref()),
                updated_at: now,
                ..current.clone()
            };
            item.line_total()?;
            uow.save_item(&item).await?;
            let amount = uow.resync_amount(&mut expense, &cmd.user_id, now).await?;

            if update.arrived_now {
                uow.receive_stock(item.product_id, item.quantity).await?;
                tracing::info!(
                    expense_id = %expense.id,
                    item_id = %item.id,
                    product_id = %item.product_id,
                    quantity = item.quantity,
                    "expense item arrived"
                );
            }

            tracing::debug!(
                expense_id = %expense.id,
                item_id = %item.id,
                amount = %amount,
                "expense item updated"
            );
            Ok(item.id)
        })
    }

    /// Removes a pending item from an open expense and drops its line total
    /// from the expense amount. Stock is untouched: the item never arrived.
    pub async fn delete_expense_item(
        &self,
        store_id: &str,
        user_id: &str,
        expense_id: Uuid,
        item_id: Uuid,
    ) -> ResultEngine<Uuid> {
        let now = Utc::now();
        with_tx!(self, |db_tx| {
            let uow = self.unit_of_work(&db_tx, store_id);
            let mut expense = uow.lock_expense(expense_id).await?;
            let item = find_item(&expense, item_id)?;

            rules::check_item_delete(&expense, item)?;
            uow.delete_item(item_id).await?;
            let amount = uow.resync_amount(&mut expense, user_id, now).await?;

            tracing::debug!(
                expense_id = %expense_id,
                item_id = %item_id,
                amount = %amount,
                "expense item deleted"
            );
            Ok(item_id)
        })
    }
}
