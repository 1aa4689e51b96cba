//! Expense items: one product/quantity/price line of an [`Expense`](crate::Expense).

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ArrivalState, EngineError, MoneyCents, ResultEngine, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseItem {
    pub id: Uuid,
    pub expense_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i64,
    /// Unit price.
    pub price: MoneyCents,
    pub arrival: ArrivalState,
    pub expiration_date: Option<NaiveDate>,
    pub storage_location: Option<String>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ExpenseItem {
    #[must_use]
    pub fn is_arrived(&self) -> bool {
        self.arrival.is_arrived()
    }

    /// `price * quantity`.
    pub fn line_total(&self) -> ResultEngine<MoneyCents> {
        self.price.checked_times(self.quantity).ok_or_else(|| {
            EngineError::InvalidAmount(format!("line total of item {} overflows", self.id))
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "expense_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub expense_id: String,
    pub product_id: String,
    pub quantity: i64,
    pub price_minor: i64,
    pub is_arrived: bool,
    pub arrival_date: Option<Date>,
    pub expiration_date: Option<Date>,
    pub storage_location: Option<String>,
    pub note: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::expenses::Entity",
        from = "Column::ExpenseId",
        to = "super::expenses::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Expenses,
    #[sea_orm(
        belongs_to = "super::products::Entity",
        from = "Column::ProductId",
        to = "super::products::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Products,
}

impl Related<super::expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&ExpenseItem> for ActiveModel {
    fn from(value: &ExpenseItem) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            expense_id: ActiveValue::Set(value.expense_id.to_string()),
            product_id: ActiveValue::Set(value.product_id.to_string()),
            quantity: ActiveValue::Set(value.quantity),
            price_minor: ActiveValue::Set(value.price.cents()),
            is_arrived: ActiveValue::Set(value.arrival.is_arrived()),
            arrival_date: ActiveValue::Set(value.arrival.date()),
            expiration_date: ActiveValue::Set(value.expiration_date),
            storage_location: ActiveValue::Set(value.storage_location.clone()),
            note: ActiveValue::Set(value.note.clone()),
            created_at: ActiveValue::Set(value.created_at),
            updated_at: ActiveValue::Set(value.updated_at),
        }
    }
}

impl TryFrom<Model> for ExpenseItem {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let arrival = match (model.is_arrived, model.arrival_date) {
            (true, Some(on)) => ArrivalState::Arrived { on },
            (true, None) => {
                return Err(EngineError::ArrivalDateMissing(format!(
                    "stored item {} is arrived without a date",
                    model.id
                )));
            }
            (false, _) => ArrivalState::Pending,
        };
        Ok(Self {
            id: parse_uuid(&model.id, "expense item")?,
            expense_id: parse_uuid(&model.expense_id, "expense")?,
            product_id: parse_uuid(&model.product_id, "product")?,
            quantity: model.quantity,
            price: MoneyCents::new(model.price_minor),
            arrival,
            expiration_date: model.expiration_date,
            storage_location: model.storage_location,
            note: model.note,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
