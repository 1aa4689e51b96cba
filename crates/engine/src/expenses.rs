//! Expense headers.
//!
//! An `Expense` is one restocking purchase: who sold it, who paid for it, how
//! much it cost in total and whether the payer has been reimbursed. When the
//! expense has items, `amount` is always the sum of their line totals.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, ExpenseItem, MoneyCents, ReimbursementState, ResultEngine, util::parse_uuid,
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub store_id: String,
    pub supplier_id: Uuid,
    /// Staff member who advanced the money, if any.
    pub payer_id: Option<String>,
    pub category: Option<String>,
    pub amount: MoneyCents,
    pub other_fee: Option<MoneyCents>,
    pub note: Option<String>,
    pub expense_date: Option<NaiveDate>,
    pub reimbursement: ReimbursementState,
    pub updater: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub items: Vec<ExpenseItem>,
}

impl Expense {
    #[must_use]
    pub fn is_reimbursed(&self) -> bool {
        self.reimbursement.is_reimbursed()
    }

    /// `true` when the expense has items and every one of them has arrived.
    #[must_use]
    pub fn is_fully_arrived(&self) -> bool {
        !self.items.is_empty() && self.items.iter().all(ExpenseItem::is_arrived)
    }

    /// Number of items still waiting for arrival.
    #[must_use]
    pub fn pending_items(&self) -> usize {
        self.items.iter().filter(|item| !item.is_arrived()).count()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub store_id: String,
    pub supplier_id: String,
    pub payer_id: Option<String>,
    pub category: Option<String>,
    pub amount_minor: i64,
    pub other_fee_minor: Option<i64>,
    pub note: Option<String>,
    pub expense_date: Option<Date>,
    pub is_reimbursed: bool,
    pub reimbursed_at: Option<DateTimeUtc>,
    pub updater: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::expense_items::Entity")]
    ExpenseItems,
    #[sea_orm(
        belongs_to = "super::suppliers::Entity",
        from = "Column::SupplierId",
        to = "super::suppliers::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Suppliers,
}

impl Related<super::expense_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExpenseItems.def()
    }
}

impl Related<super::suppliers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Suppliers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Expense> for ActiveModel {
    fn from(value: &Expense) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            store_id: ActiveValue::Set(value.store_id.clone()),
            supplier_id: ActiveValue::Set(value.supplier_id.to_string()),
            payer_id: ActiveValue::Set(value.payer_id.clone()),
            category: ActiveValue::Set(value.category.clone()),
            amount_minor: ActiveValue::Set(value.amount.cents()),
            other_fee_minor: ActiveValue::Set(value.other_fee.map(MoneyCents::cents)),
            note: ActiveValue::Set(value.note.clone()),
            expense_date: ActiveValue::Set(value.expense_date),
            is_reimbursed: ActiveValue::Set(value.reimbursement.is_reimbursed()),
            reimbursed_at: ActiveValue::Set(value.reimbursement.at()),
            updater: ActiveValue::Set(value.updater.clone()),
            created_at: ActiveValue::Set(value.created_at),
            updated_at: ActiveValue::Set(value.updated_at),
        }
    }
}

impl Model {
    pub(crate) fn reimbursement(&self) -> ResultEngine<ReimbursementState> {
        match (self.is_reimbursed, self.reimbursed_at) {
            (false, _) => Ok(ReimbursementState::Open),
            (true, Some(at)) => Ok(ReimbursementState::Reimbursed { at }),
            (true, None) => Err(EngineError::ReimbursedAtMissing(format!(
                "stored expense {} is reimbursed without a date",
                self.id
            ))),
        }
    }
}

impl TryFrom<Model> for Expense {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let reimbursement = model.reimbursement()?;
        Ok(Self {
            id: parse_uuid(&model.id, "expense")?,
            supplier_id: parse_uuid(&model.supplier_id, "supplier")?,
            store_id: model.store_id,
            payer_id: model.payer_id,
            category: model.category,
            amount: MoneyCents::new(model.amount_minor),
            other_fee: model.other_fee_minor.map(MoneyCents::new),
            note: model.note,
            expense_date: model.expense_date,
            reimbursement,
            updater: model.updater,
            created_at: model.created_at,
            updated_at: model.updated_at,
            items: Vec::new(),
        })
    }
}
