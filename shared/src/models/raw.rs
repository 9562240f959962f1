//! Raw gateway records
//!
//! Create, edit, list and import responses do not agree on which fields they
//! include. Everything except the id is optional here; the entity formatter
//! supplies defaults.

use super::{AvailabilityFields, AvailabilityMode, FoodType, serde_helpers};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Category record as returned by the gateway
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCategory {
    #[serde(alias = "_id", deserialize_with = "serde_helpers::flexible_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "isActive")]
    pub active: Option<bool>,
    #[serde(default, alias = "isArchived")]
    pub archived: Option<bool>,
    #[serde(default)]
    pub availability_mode: Option<AvailabilityMode>,
    #[serde(default)]
    pub available_after_time: Option<String>,
    #[serde(default)]
    pub available_from_time: Option<String>,
    #[serde(default)]
    pub available_to_time: Option<String>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
    #[serde(default, alias = "productsCount")]
    pub product_count: Option<u32>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl RawCategory {
    pub fn availability_fields(&self) -> AvailabilityFields {
        AvailabilityFields {
            availability_mode: self.availability_mode.unwrap_or_default(),
            available_after_time: self.available_after_time.clone(),
            available_from_time: self.available_from_time.clone(),
            available_to_time: self.available_to_time.clone(),
        }
    }
}

/// Nested inventory block some endpoints return instead of flat fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawInventory {
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub stock: Option<i64>,
    #[serde(default)]
    pub reorder_level: Option<i64>,
}

/// Product record as returned by the gateway
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProduct {
    #[serde(alias = "_id", deserialize_with = "serde_helpers::flexible_id")]
    pub id: String,
    #[serde(
        default,
        alias = "category",
        deserialize_with = "serde_helpers::option_flexible_id"
    )]
    pub category_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub cost_price: Option<Decimal>,
    #[serde(default)]
    pub food_type: Option<FoodType>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default, alias = "isActive")]
    pub active: Option<bool>,
    #[serde(default, alias = "isArchived")]
    pub archived: Option<bool>,
    #[serde(default)]
    pub preparation_time: Option<u32>,
    #[serde(default)]
    pub min_order_qty: Option<u32>,
    #[serde(default)]
    pub max_order_qty: Option<u32>,
    #[serde(default)]
    pub availability_mode: Option<AvailabilityMode>,
    #[serde(default)]
    pub available_after_time: Option<String>,
    #[serde(default)]
    pub available_from_time: Option<String>,
    #[serde(default)]
    pub available_to_time: Option<String>,
    #[serde(default)]
    pub enable_inventory: Option<bool>,
    #[serde(default)]
    pub stock: Option<i64>,
    #[serde(default)]
    pub reorder_level: Option<i64>,
    #[serde(default)]
    pub inventory: Option<RawInventory>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl RawProduct {
    pub fn availability_fields(&self) -> AvailabilityFields {
        AvailabilityFields {
            availability_mode: self.availability_mode.unwrap_or_default(),
            available_after_time: self.available_after_time.clone(),
            available_from_time: self.available_from_time.clone(),
            available_to_time: self.available_to_time.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_category_minimal() {
        let raw: RawCategory = serde_json::from_str(r#"{"_id":"c-1"}"#).unwrap();
        assert_eq!(raw.id, "c-1");
        assert_eq!(raw.name, None);
        assert_eq!(raw.product_count, None);
    }

    #[test]
    fn test_raw_category_aliases() {
        let raw: RawCategory = serde_json::from_str(
            r#"{"id":17,"name":"Soups","isActive":false,"productsCount":4,
                "availabilityMode":"time-based","availableAfterTime":"17:00"}"#,
        )
        .unwrap();
        assert_eq!(raw.id, "17");
        assert_eq!(raw.active, Some(false));
        assert_eq!(raw.product_count, Some(4));
        assert_eq!(
            raw.availability_fields().availability_mode,
            AvailabilityMode::TimeBased
        );
    }

    #[test]
    fn test_raw_product_shapes() {
        let raw: RawProduct = serde_json::from_str(
            r#"{"id":"p-1","category":"c-1","price":12.5,"foodType":"non-veg",
                "inventory":{"enabled":true,"stock":3,"reorderLevel":5}}"#,
        )
        .unwrap();
        assert_eq!(raw.category_id.as_deref(), Some("c-1"));
        assert_eq!(raw.price, Some(Decimal::new(125, 1)));
        assert_eq!(raw.food_type, Some(FoodType::NonVeg));
        assert_eq!(raw.inventory.as_ref().and_then(|i| i.stock), Some(3));

        let raw: RawProduct =
            serde_json::from_str(r#"{"id":"p-2","categoryId":"c-9","price":"7.25"}"#).unwrap();
        assert_eq!(raw.category_id.as_deref(), Some("c-9"));
        assert_eq!(raw.price, Some(Decimal::new(725, 2)));
    }
}
