//! Unit of work over one database transaction.
//!
//! Every write of an expense, its items and product stock goes through a
//! [`UnitOfWork`] borrowed from the transaction opened by `with_tx!`, so there
//! is no way to touch one of the three without the others being part of the
//! same commit or rollback.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveValue, ConnectionTrait, DatabaseTransaction, DbBackend, QueryFilter, QueryOrder,
    QuerySelect, prelude::*,
};
use uuid::Uuid;

use crate::{
    EngineError, Expense, ExpenseItem, MoneyCents, Product, ResultEngine, StockCounter, Supplier,
    expense_items, expenses, products, rules, suppliers,
};

pub(super) struct UnitOfWork<'a> {
    db: &'a DatabaseTransaction,
    stock: &'a dyn StockCounter,
    store_id: &'a str,
}

impl<'a> UnitOfWork<'a> {
    pub(super) fn new(
        db: &'a DatabaseTransaction,
        stock: &'a dyn StockCounter,
        store_id: &'a str,
    ) -> Self {
        Self {
            db,
            stock,
            store_id,
        }
    }

    pub(super) fn store_id(&self) -> &'a str {
        self.store_id
    }

    /// Loads an expense of the store together with its items.
    ///
    /// With `lock` the header row is held until the transaction ends, which
    /// serializes concurrent item writes on the same expense. SQLite has no
    /// row locks; its single writer gives the same guarantee.
    async fn find_expense(&self, expense_id: Uuid, lock: bool) -> ResultEngine<Expense> {
        let mut query = expenses::Entity::find_by_id(expense_id.to_string())
            .filter(expenses::Column::StoreId.eq(self.store_id));
        if lock && self.db.get_database_backend() != DbBackend::Sqlite {
            query = query.lock_exclusive();
        }
        let model = query
            .one(self.db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("expense not exists".to_string()))?;

        let mut expense = Expense::try_from(model)?;
        expense.items = self.items_of(expense_id).await?;
        Ok(expense)
    }

    pub(super) async fn lock_expense(&self, expense_id: Uuid) -> ResultEngine<Expense> {
        self.find_expense(expense_id, true).await
    }

    pub(super) async fn read_expense(&self, expense_id: Uuid) -> ResultEngine<Expense> {
        self.find_expense(expense_id, false).await
    }

    async fn items_of(&self, expense_id: Uuid) -> ResultEngine<Vec<ExpenseItem>> {
        expense_items::Entity::find()
            .filter(expense_items::Column::ExpenseId.eq(expense_id.to_string()))
            .order_by_asc(expense_items::Column::CreatedAt)
            .order_by_asc(expense_items::Column::Id)
            .all(self.db)
            .await?
            .into_iter()
            .map(ExpenseItem::try_from)
            .collect()
    }

    pub(super) async fn require_product(&self, product_id: Uuid) -> ResultEngine<Product> {
        let model = products::Entity::find_by_id(product_id.to_string())
            .filter(products::Column::StoreId.eq(self.store_id))
            .one(self.db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("product not exists".to_string()))?;
        Product::try_from(model)
    }

    pub(super) async fn require_supplier(&self, supplier_id: Uuid) -> ResultEngine<Supplier> {
        let model = suppliers::Entity::find_by_id(supplier_id.to_string())
            .filter(suppliers::Column::StoreId.eq(self.store_id))
            .one(self.db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("supplier not exists".to_string()))?;
        Supplier::try_from(model)
    }

    pub(super) async fn insert_supplier(&self, supplier: &Supplier) -> ResultEngine<()> {
        let exists = suppliers::Entity::find()
            .filter(suppliers::Column::StoreId.eq(self.store_id))
            .filter(suppliers::Column::Name.eq(supplier.name.clone()))
            .one(self.db)
            .await?
            .is_some();
        if exists {
            return Err(EngineError::ExistingKey(supplier.name.clone()));
        }
        suppliers::ActiveModel::from(supplier).insert(self.db).await?;
        Ok(())
    }

    pub(super) async fn insert_product(&self, product: &Product) -> ResultEngine<()> {
        let exists = products::Entity::find()
            .filter(products::Column::StoreId.eq(self.store_id))
            .filter(products::Column::Name.eq(product.name.clone()))
            .one(self.db)
            .await?
            .is_some();
        if exists {
            return Err(EngineError::ExistingKey(product.name.clone()));
        }
        products::ActiveModel::from(product).insert(self.db).await?;
        Ok(())
    }

    pub(super) async fn insert_expense(&self, expense: &Expense) -> ResultEngine<()> {
        expenses::ActiveModel::from(expense).insert(self.db).await?;
        Ok(())
    }

    pub(super) async fn save_expense(&self, expense: &Expense) -> ResultEngine<()> {
        let mut active = expenses::ActiveModel::from(expense);
        active.created_at = ActiveValue::NotSet;
        active.update(self.db).await?;
        Ok(())
    }

    pub(super) async fn insert_item(&self, item: &ExpenseItem) -> ResultEngine<()> {
        expense_items::ActiveModel::from(item).insert(self.db).await?;
        Ok(())
    }

    pub(super) async fn save_item(&self, item: &ExpenseItem) -> ResultEngine<()> {
        let mut active = expense_items::ActiveModel::from(item);
        active.created_at = ActiveValue::NotSet;
        active.update(self.db).await?;
        Ok(())
    }

    pub(super) async fn delete_item(&self, item_id: Uuid) -> ResultEngine<()> {
        expense_items::Entity::delete_by_id(item_id.to_string())
            .exec(self.db)
            .await?;
        Ok(())
    }

    /// Re-sums the expense amount from its stored items and writes it back
    /// along with the audit fields.
    pub(super) async fn resync_amount(
        &self,
        expense: &mut Expense,
        updater: &str,
        now: DateTime<Utc>,
    ) -> ResultEngine<MoneyCents> {
        expense.items = self.items_of(expense.id).await?;
        expense.amount = rules::items_total(&expense.items)?;
        expense.updater = updater.to_string();
        expense.updated_at = now;

        let active = expenses::ActiveModel {
            id: ActiveValue::Set(expense.id.to_string()),
            amount_minor: ActiveValue::Set(expense.amount.cents()),
            updater: ActiveValue::Set(expense.updater.clone()),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };
        active.update(self.db).await?;
        Ok(expense.amount)
    }

    /// The only place the expense path touches product stock.
    pub(super) async fn receive_stock(&self, product_id: Uuid, quantity: i64) -> ResultEngine<()> {
        if quantity == 0 {
            return Ok(());
        }
        self.stock.increment(self.db, product_id, quantity).await
    }
}
