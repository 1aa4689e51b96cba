use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Tells a missing field (`None`) apart from an explicit `null`
/// (`Some(None)`). Use together with `#[serde(default)]`.
pub fn clearable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Response of every create endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct Created {
    pub id: Uuid,
}

pub mod expense {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub supplier_id: Uuid,
        /// Ignored as soon as the expense has items.
        #[serde(default)]
        pub amount_minor: i64,
        pub other_fee_minor: Option<i64>,
        pub payer_id: Option<String>,
        pub category: Option<String>,
        pub note: Option<String>,
        pub expense_date: Option<NaiveDate>,
    }

    /// Partial update of an expense header. Missing fields are left untouched;
    /// an empty string clears a text field and `null` clears `other_fee_minor`
    /// or `expense_date`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ExpenseUpdate {
        pub supplier_id: Option<Uuid>,
        pub amount_minor: Option<i64>,
        #[serde(
            default,
            deserialize_with = "crate::clearable",
            skip_serializing_if = "Option::is_none"
        )]
        pub other_fee_minor: Option<Option<i64>>,
        pub payer_id: Option<String>,
        pub category: Option<String>,
        pub note: Option<String>,
        #[serde(
            default,
            deserialize_with = "crate::clearable",
            skip_serializing_if = "Option::is_none"
        )]
        pub expense_date: Option<Option<NaiveDate>>,
        pub is_reimbursed: Option<bool>,
        /// RFC3339 timestamp.
        pub reimbursed_at: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub id: Uuid,
        pub supplier_id: Uuid,
        pub payer_id: Option<String>,
        pub category: Option<String>,
        /// Sum of the item line totals when the expense has items.
        pub amount_minor: i64,
        pub other_fee_minor: Option<i64>,
        pub note: Option<String>,
        pub expense_date: Option<NaiveDate>,
        pub is_reimbursed: bool,
        pub reimbursed_at: Option<DateTime<Utc>>,
        pub updater: String,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
        pub items: Vec<ItemView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ItemNew {
        pub product_id: Uuid,
        pub quantity: i64,
        pub price_minor: i64,
        #[serde(default)]
        pub is_arrived: bool,
        pub arrival_date: Option<NaiveDate>,
        pub expiration_date: Option<NaiveDate>,
        pub storage_location: Option<String>,
        pub note: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ItemUpdate {
        pub product_id: Option<Uuid>,
        pub quantity: Option<i64>,
        pub price_minor: Option<i64>,
        pub is_arrived: Option<bool>,
        pub arrival_date: Option<NaiveDate>,
        /// `null` clears the stored date.
        #[serde(
            default,
            deserialize_with = "crate::clearable",
            skip_serializing_if = "Option::is_none"
        )]
        pub expiration_date: Option<Option<NaiveDate>>,
        pub storage_location: Option<String>,
        pub note: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ItemView {
        pub id: Uuid,
        pub product_id: Uuid,
        pub quantity: i64,
        pub price_minor: i64,
        pub is_arrived: bool,
        pub arrival_date: Option<NaiveDate>,
        pub expiration_date: Option<NaiveDate>,
        pub storage_location: Option<String>,
        pub note: Option<String>,
    }
}

pub mod product {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProductView {
        pub id: Uuid,
        pub name: String,
        /// Units on hand.
        pub stock: i64,
    }
}

pub mod supplier {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SupplierView {
        pub id: Uuid,
        pub name: String,
    }
}

#[cfg(test)]
mod tests {
    use super::expense::{ExpenseUpdate, ItemUpdate};

    #[test]
    fn null_clears_but_missing_keeps() {
        let update: ItemUpdate = serde_json::from_str(r#"{"expiration_date": null}"#).unwrap();
        assert_eq!(update.expiration_date, Some(None));
        let update: ItemUpdate = serde_json::from_str(r#"{"note": "x"}"#).unwrap();
        assert_eq!(update.expiration_date, None);

        let update: ExpenseUpdate =
            serde_json::from_str(r#"{"other_fee_minor": null, "expense_date": "2026-10-03"}"#)
                .unwrap();
        assert_eq!(update.other_fee_minor, Some(None));
        assert_eq!(
            update.expense_date,
            Some(chrono::NaiveDate::from_ymd_opt(2026, 10, 3))
        );
    }
}
