//! Line item rules.
//!
//! Pure checks of a requested change against the current persisted state.
//! Nothing here touches the database: the ops layer loads the expense (with
//! its items) inside the unit of work, asks these functions what the new state
//! is, and only then writes.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    ArrivalState, EngineError, Expense, ExpenseItem, MoneyCents, ReimbursementState,
    ResultEngine, UpdateExpenseCmd, UpdateItemCmd,
    lifecycle::ReimbursementGate,
    util::{apply_optional_text_patch, differs},
};

/// Sum of the line totals of `items`.
pub(crate) fn items_total(items: &[ExpenseItem]) -> ResultEngine<MoneyCents> {
    items.iter().try_fold(MoneyCents::ZERO, |total, item| {
        total
            .checked_add(item.line_total()?)
            .ok_or_else(|| EngineError::InvalidAmount("expense amount overflows".to_string()))
    })
}

/// Checks a new item against its expense and returns its initial arrival.
///
/// Order matters: the first failing rule is the one reported.
pub(crate) fn check_item_create(
    expense: &Expense,
    is_arrived: bool,
    arrival_date: Option<NaiveDate>,
) -> ResultEngine<ArrivalState> {
    let arrival = ArrivalState::requested(is_arrived, arrival_date)?;
    if expense.is_reimbursed() {
        return Err(EngineError::ExpenseReimbursed(
            "cannot add items to a reimbursed expense".to_string(),
        ));
    }
    if expense.is_fully_arrived() {
        return Err(EngineError::ExpenseFullyArrived(
            "cannot add items: all existing items have arrived".to_string(),
        ));
    }
    Ok(arrival)
}

/// Effective values of an item after an update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ItemUpdate {
    pub(crate) product_id: Uuid,
    pub(crate) quantity: i64,
    pub(crate) price: MoneyCents,
    pub(crate) arrival: ArrivalState,
    /// The update is the `Pending -> Arrived` edge.
    pub(crate) arrived_now: bool,
}

/// First financial field the command would change, if any.
fn changed_financial_field(item: &ExpenseItem, cmd: &UpdateItemCmd) -> Option<&'static str> {
    if differs(&item.product_id, cmd.product_id.as_ref()) {
        Some("product_id")
    } else if differs(&item.quantity, cmd.quantity.as_ref()) {
        Some("quantity")
    } else if differs(&item.price, cmd.price.as_ref()) {
        Some("price")
    } else {
        None
    }
}

pub(crate) fn check_item_update(
    expense: &Expense,
    item: &ExpenseItem,
    cmd: &UpdateItemCmd,
) -> ResultEngine<ItemUpdate> {
    let changed = changed_financial_field(item, cmd);
    if expense.is_reimbursed()
        && let Some(field) = changed
    {
        return Err(EngineError::ExpenseReimbursed(format!(
            "{field} is locked once the expense is reimbursed"
        )));
    }

    let (arrival, arrived_now) = item.arrival.advance(cmd.is_arrived, cmd.arrival_date)?;

    if item.is_arrived()
        && let Some(field) = changed
    {
        return Err(EngineError::ItemAlreadyArrived(format!(
            "{field} is locked once the item has arrived"
        )));
    }

    Ok(ItemUpdate {
        product_id: cmd.product_id.unwrap_or(item.product_id),
        quantity: cmd.quantity.unwrap_or(item.quantity),
        price: cmd.price.unwrap_or(item.price),
        arrival,
        arrived_now,
    })
}

pub(crate) fn check_item_delete(expense: &Expense, item: &ExpenseItem) -> ResultEngine<()> {
    if expense.is_reimbursed() {
        return Err(EngineError::ExpenseReimbursed(
            "cannot delete items of a reimbursed expense".to_string(),
        ));
    }
    if item.is_arrived() {
        return Err(EngineError::ItemAlreadyArrived(
            "cannot delete an arrived item".to_string(),
        ));
    }
    Ok(())
}

/// Effective header values after an update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ExpenseUpdate {
    pub(crate) supplier_id: Uuid,
    pub(crate) payer_id: Option<String>,
    pub(crate) category: Option<String>,
    pub(crate) amount: MoneyCents,
    pub(crate) other_fee: Option<MoneyCents>,
    pub(crate) note: Option<String>,
    pub(crate) expense_date: Option<NaiveDate>,
    pub(crate) reimbursement: ReimbursementState,
    pub(crate) reimbursed_now: bool,
}

/// A clearable patch changes the field when it is present and its inner value
/// (possibly `None`) differs from the stored one.
fn differs_optional<T: PartialEq + Copy>(current: Option<T>, patch: Option<Option<T>>) -> bool {
    patch.is_some_and(|value| value != current)
}

pub(crate) fn check_expense_update(
    expense: &Expense,
    cmd: &UpdateExpenseCmd,
) -> ResultEngine<ExpenseUpdate> {
    let payer_id = apply_optional_text_patch(expense.payer_id.clone(), cmd.payer_id.as_deref());
    let category = apply_optional_text_patch(expense.category.clone(), cmd.category.as_deref());

    if expense.is_reimbursed() {
        let locked = [
            ("amount", differs(&expense.amount, cmd.amount.as_ref())),
            ("category", category != expense.category),
            (
                "supplier_id",
                differs(&expense.supplier_id, cmd.supplier_id.as_ref()),
            ),
            (
                "other_fee",
                differs_optional(expense.other_fee, cmd.other_fee),
            ),
            (
                "expense_date",
                differs_optional(expense.expense_date, cmd.expense_date),
            ),
            ("payer_id", payer_id != expense.payer_id),
        ];
        if let Some((field, _)) = locked.iter().find(|(_, changed)| *changed) {
            return Err(EngineError::ExpenseReimbursed(format!(
                "{field} is locked once the expense is reimbursed"
            )));
        }
    }

    if !expense.items.is_empty() && differs(&expense.amount, cmd.amount.as_ref()) {
        return Err(EngineError::AmountManagedByItems(
            "amount is the sum of the expense items".to_string(),
        ));
    }

    let (reimbursement, reimbursed_now) = expense.reimbursement.advance(
        cmd.is_reimbursed,
        cmd.reimbursed_at,
        ReimbursementGate {
            payer_present: payer_id.is_some(),
            pending_items: expense.pending_items(),
        },
    )?;

    Ok(ExpenseUpdate {
        supplier_id: cmd.supplier_id.unwrap_or(expense.supplier_id),
        payer_id,
        category,
        amount: cmd.amount.unwrap_or(expense.amount),
        other_fee: cmd.other_fee.unwrap_or(expense.other_fee),
        note: apply_optional_text_patch(expense.note.clone(), cmd.note.as_deref()),
        expense_date: cmd.expense_date.unwrap_or(expense.expense_date),
        reimbursement,
        reimbursed_now,
    })
}
