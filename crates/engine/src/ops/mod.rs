use std::sync::Arc;

use sea_orm::{DatabaseConnection, DatabaseTransaction};

use crate::{ProductStockColumn, StockCounter};

mod catalog;
mod expenses;
mod items;
mod unit_of_work;

use unit_of_work::UnitOfWork;

/// Run a block inside a DB transaction, committing on success and rolling
/// back on error.
///
/// The block runs as its own future, so `?` and `return` inside it end the
/// unit of work instead of the calling function.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = sea_orm::TransactionTrait::begin(&$self.database).await?;
        let result: $crate::ResultEngine<_> = async { $body }.await;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = $tx.rollback().await {
                    tracing::error!("rollback failed after {err}: {rollback_err}");
                } else {
                    tracing::warn!("unit of work rolled back: {err}");
                }
                Err(err)
            }
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    stock: Arc<dyn StockCounter>,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    fn unit_of_work<'a>(
        &'a self,
        db: &'a DatabaseTransaction,
        store_id: &'a str,
    ) -> UnitOfWork<'a> {
        UnitOfWork::new(db, self.stock.as_ref(), store_id)
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    stock: Option<Arc<dyn StockCounter>>,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Replace the stock counter (defaults to [`ProductStockColumn`]).
    pub fn stock_counter(mut self, stock: impl StockCounter + 'static) -> EngineBuilder {
        self.stock = Some(Arc::new(stock));
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> crate::ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
            stock: self
                .stock
                .unwrap_or_else(|| Arc::new(ProductStockColumn)),
        })
    }
}
