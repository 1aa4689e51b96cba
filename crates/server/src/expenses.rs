//! Expense and expense item API endpoints

use api_types::{
    Created,
    expense::{ExpenseNew, ExpenseUpdate, ExpenseView, ItemNew, ItemUpdate, ItemView},
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{
    CreateExpenseCmd, CreateItemCmd, Expense, ExpenseItem, MoneyCents, UpdateExpenseCmd,
    UpdateItemCmd,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

fn item_view(item: ExpenseItem) -> ItemView {
    ItemView {
        id: item.id,
        product_id: item.product_id,
        quantity: item.quantity,
        price_minor: item.price.cents(),
        is_arrived: item.arrival.is_arrived(),
        arrival_date: item.arrival.date(),
        expiration_date: item.expiration_date,
        storage_location: item.storage_location,
        note: item.note,
    }
}

fn expense_view(expense: Expense) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        supplier_id: expense.supplier_id,
        payer_id: expense.payer_id,
        category: expense.category,
        amount_minor: expense.amount.cents(),
        other_fee_minor: expense.other_fee.map(MoneyCents::cents),
        note: expense.note,
        expense_date: expense.expense_date,
        is_reimbursed: expense.reimbursement.is_reimbursed(),
        reimbursed_at: expense.reimbursement.at(),
        updater: expense.updater,
        created_at: expense.created_at,
        updated_at: expense.updated_at,
        items: expense.items.into_iter().map(item_view).collect(),
    }
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseNew>,
) -> Result<(StatusCode, Json<Created>), ServerError> {
    let cmd = CreateExpenseCmd {
        amount: MoneyCents::new(payload.amount_minor),
        other_fee: payload.other_fee_minor.map(MoneyCents::new),
        payer_id: payload.payer_id,
        category: payload.category,
        note: payload.note,
        expense_date: payload.expense_date,
        ..CreateExpenseCmd::new(&user.store_id, &user.username, payload.supplier_id)
    };
    let id = state.engine.create_expense(cmd).await?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}

pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ExpenseView>, ServerError> {
    let expense = state.engine.expense(&user.store_id, id).await?;
    Ok(Json(expense_view(expense)))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ExpenseUpdate>,
) -> Result<Json<ExpenseView>, ServerError> {
    let cmd = UpdateExpenseCmd {
        supplier_id: payload.supplier_id,
        amount: payload.amount_minor.map(MoneyCents::new),
        other_fee: payload
            .other_fee_minor
            .map(|fee| fee.map(MoneyCents::new)),
        payer_id: payload.payer_id,
        category: payload.category,
        note: payload.note,
        expense_date: payload.expense_date,
        is_reimbursed: payload.is_reimbursed,
        reimbursed_at: payload.reimbursed_at,
        ..UpdateExpenseCmd::new(&user.store_id, &user.username, id)
    };
    state.engine.update_expense(cmd).await?;
    let expense = state.engine.expense(&user.store_id, id).await?;
    Ok(Json(expense_view(expense)))
}

pub async fn item_create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(expense_id): Path<Uuid>,
    Json(payload): Json<ItemNew>,
) -> Result<(StatusCode, Json<Created>), ServerError> {
    let cmd = CreateItemCmd {
        is_arrived: payload.is_arrived,
        arrival_date: payload.arrival_date,
        expiration_date: payload.expiration_date,
        storage_location: payload.storage_location,
        note: payload.note,
        ..CreateItemCmd::new(
            &user.store_id,
            &user.username,
            expense_id,
            payload.product_id,
            payload.quantity,
            MoneyCents::new(payload.price_minor),
        )
    };
    let id = state.engine.create_expense_item(cmd).await?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}

pub async fn item_update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((expense_id, item_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<ItemUpdate>,
) -> Result<Json<ExpenseView>, ServerError> {
    let cmd = UpdateItemCmd {
        product_id: payload.product_id,
        quantity: payload.quantity,
        price: payload.price_minor.map(MoneyCents::new),
        is_arrived: payload.is_arrived,
        arrival_date: payload.arrival_date,
        expiration_date: payload.expiration_date,
        storage_location: payload.storage_location,
        note: payload.note,
        ..UpdateItemCmd::new(&user.store_id, &user.username, expense_id, item_id)
    };
    state.engine.update_expense_item(cmd).await?;
    let expense = state.engine.expense(&user.store_id, expense_id).await?;
    Ok(Json(expense_view(expense)))
}

pub async fn item_delete(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((expense_id, item_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .delete_expense_item(&user.store_id, &user.username, expense_id, item_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
