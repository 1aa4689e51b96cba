//! Product stock counter.
//!
//! Stock is a resource shared with the rest of the inventory system. From the
//! expense path it is only ever incremented, and only through a
//! [`StockCounter`] driven by the same [`DatabaseTransaction`] that writes the
//! expense and its items.
//!
//! The counter is injected into the [`Engine`](crate::Engine) so it can be
//! swapped, e.g. to observe or fail increments.

use std::fmt::Debug;

use async_trait::async_trait;
use sea_orm::{DatabaseTransaction, QueryFilter, prelude::*, sea_query::Expr};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, products};

#[async_trait]
pub trait StockCounter: Debug + Send + Sync {
    /// Adds `delta` units to the stock of `product_id` inside `db`.
    async fn increment(
        &self,
        db: &DatabaseTransaction,
        product_id: Uuid,
        delta: i64,
    ) -> ResultEngine<()>;
}

/// Default counter: the `stock` column of the `products` table.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProductStockColumn;

#[async_trait]
impl StockCounter for ProductStockColumn {
    async fn increment(
        &self,
        db: &DatabaseTransaction,
        product_id: Uuid,
        delta: i64,
    ) -> ResultEngine<()> {
        let res = products::Entity::update_many()
            .col_expr(
                products::Column::Stock,
                Expr::col(products::Column::Stock).add(delta),
            )
            .filter(products::Column::Id.eq(product_id.to_string()))
            .exec(db)
            .await?;
        if res.rows_affected != 1 {
            return Err(EngineError::KeyNotFound("product not exists".to_string()));
        }
        Ok(())
    }
}
