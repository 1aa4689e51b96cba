use chrono::Utc;
use uuid::Uuid;

use crate::{
    CreateExpenseCmd, Expense, ReimbursementState, ResultEngine, UpdateExpenseCmd, rules,
    util::{ensure_non_negative_money, normalize_optional_text},
};

use super::{Engine, with_tx};

impl Engine {
    /// Creates an expense header.
    ///
    /// The expense starts open (not reimbursed) and without items; `amount` is
    /// taken as given until the first item is added.
    pub async fn create_expense(&self, cmd: CreateExpenseCmd) -> ResultEngine<Uuid> {
        ensure_non_negative_money(cmd.amount, "amount")?;
        if let Some(fee) = cmd.other_fee {
            ensure_non_negative_money(fee, "other_fee")?;
        }
        let now = Utc::now();
        with_tx!(self, |db_tx| {
            let uow = self.unit_of_work(&db_tx, &cmd.store_id);
            uow.require_supplier(cmd.supplier_id).await?;

            let expense = Expense {
                id: Uuid::new_v4(),
                store_id: cmd.store_id.clone(),
                supplier_id: cmd.supplier_id,
                payer_id: normalize_optional_text(cmd.payer_id.as_deref()),
                category: normalize_optional_text(cmd.category.as_deref()),
                amount: cmd.amount,
                other_fee: cmd.other_fee,
                note: normalize_optional_text(cmd.note.as_deref()),
                expense_date: cmd.expense_date,
                reimbursement: ReimbursementState::Open,
                updater: cmd.user_id.clone(),
                created_at: now,
                updated_at: now,
                items: Vec::new(),
            };
            uow.insert_expense(&expense).await?;

            tracing::debug!(
                store_id = %cmd.store_id,
                expense_id = %expense.id,
                amount = %expense.amount,
                "expense created"
            );
            Ok(expense.id)
        })
    }

    /// Return an expense snapshot (header and items) from DB.
    pub async fn expense(&self, store_id: &str, expense_id: Uuid) -> ResultEngine<Expense> {
        with_tx!(self, |db_tx| {
            self.unit_of_work(&db_tx, store_id)
                .read_expense(expense_id)
                .await
        })
    }

    /// Updates an expense header, including the `Open -> Reimbursed`
    /// transition.
    ///
    /// Once reimbursed, only `note` and `reimbursed_at` may still change.
    /// While the expense has items its `amount` is derived from them and cannot
    /// be set directly.
    pub async fn update_expense(&self, cmd: UpdateExpenseCmd) -> ResultEngine<Uuid> {
        let now = Utc::now();
        with_tx!(self, |db_tx| {
            let uow = self.unit_of_work(&db_tx, &cmd.store_id);
            let mut expense = uow.lock_expense(cmd.expense_id).await?;
            if let Some(amount) = cmd.amount {
                ensure_non_negative_money(amount, "amount")?;
            }
            if let Some(Some(fee)) = cmd.other_fee {
                ensure_non_negative_money(fee, "other_fee")?;
            }

            let update = rules::check_expense_update(&expense, &cmd)?;
            if update.supplier_id != expense.supplier_id {
                uow.require_supplier(update.supplier_id).await?;
            }

            expense.supplier_id = update.supplier_id;
            expense.payer_id = update.payer_id;
            expense.category = update.category;
            expense.amount = update.amount;
            expense.other_fee = update.other_fee;
            expense.note = update.note;
            expense.expense_date = update.expense_date;
            expense.reimbursement = update.reimbursement;
            expense.updater = cmd.user_id.clone();
            expense.updated_at = now;
            uow.save_expense(&expense).await?;

            if update.reimbursed_now {
                tracing::info!(
                    store_id = %cmd.store_id,
                    expense_id = %expense.id,
                    amount = %expense.amount,
                    "expense reimbursed"
                );
            } else {
                tracing::debug!(expense_id = %expense.id, "expense updated");
            }
            Ok(expense.id)
        })
    }
}
