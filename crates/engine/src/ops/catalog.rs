use uuid::Uuid;

use crate::{
    Product, ResultEngine, Supplier,
    util::{ensure_non_negative_quantity, normalize_required_name},
};

use super::{Engine, with_tx};

impl Engine {
    /// Register a supplier in a store. Names are unique per store.
    pub async fn new_supplier(&self, store_id: &str, name: &str) -> ResultEngine<Uuid> {
        let name = normalize_required_name(name, "supplier")?;
        with_tx!(self, |db_tx| {
            let uow = self.unit_of_work(&db_tx, store_id);
            let supplier = Supplier::new(uow.store_id().to_string(), name);
            uow.insert_supplier(&supplier).await?;
            tracing::debug!(store_id, supplier_id = %supplier.id, "supplier created");
            Ok(supplier.id)
        })
    }

    /// Add a product to a store catalog with its opening stock.
    pub async fn new_product(
        &self,
        store_id: &str,
        name: &str,
        opening_stock: i64,
    ) -> ResultEngine<Uuid> {
        let name = normalize_required_name(name, "product")?;
        ensure_non_negative_quantity(opening_stock, "opening stock")?;
        with_tx!(self, |db_tx| {
            let uow = self.unit_of_work(&db_tx, store_id);
            let product = Product::new(uow.store_id().to_string(), name, opening_stock);
            uow.insert_product(&product).await?;
            tracing::debug!(store_id, product_id = %product.id, "product created");
            Ok(product.id)
        })
    }

    /// Return a product snapshot (including its current stock) from DB.
    pub async fn product(&self, store_id: &str, product_id: Uuid) -> ResultEngine<Product> {
        with_tx!(self, |db_tx| {
            self.unit_of_work(&db_tx, store_id)
                .require_product(product_id)
                .await
        })
    }

    /// Return a supplier of the store.
    pub async fn supplier(&self, store_id: &str, supplier_id: Uuid) -> ResultEngine<Supplier> {
        with_tx!(self, |db_tx| {
            self.unit_of_work(&db_tx, store_id)
                .require_supplier(supplier_id)
                .await
        })
    }
}
