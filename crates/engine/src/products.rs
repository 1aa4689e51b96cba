//! The module contains `Product` and its on-hand stock counter.
//!
//! Products belong to the inventory catalog. The engine only reads them and
//! increments `stock` through [`StockCounter`](crate::StockCounter) when an
//! expense item arrives.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, util::parse_uuid};

/// A product of a store catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub store_id: String,
    pub name: String,
    /// Units on hand.
    pub stock: i64,
}

impl Product {
    pub fn new(store_id: String, name: String, stock: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            store_id,
            name,
            stock,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub store_id: String,
    pub name: String,
    pub stock: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::expense_items::Entity")]
    ExpenseItems,
}

impl Related<super::expense_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExpenseItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Product> for ActiveModel {
    fn from(value: &Product) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            store_id: ActiveValue::Set(value.store_id.clone()),
            name: ActiveValue::Set(value.name.clone()),
            stock: ActiveValue::Set(value.stock),
        }
    }
}

impl TryFrom<Model> for Product {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "product")?,
            store_id: model.store_id,
            name: model.name,
            stock: model.stock,
        })
    }
}
