//! Product Model

use super::{
    Availability, AvailabilityFields, EntityStatus, FilePayload, ImageChanges, ImageSource,
    category::check_images, validation_error,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Dietary classification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FoodType {
    #[default]
    Veg,
    #[serde(alias = "non_veg", alias = "nonVeg", alias = "nonveg")]
    NonVeg,
}

/// Stock tracking, present only when inventory is enabled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inventory {
    pub stock: u32,
    pub reorder_level: u32,
}

impl Inventory {
    pub fn is_low(&self) -> bool {
        self.stock < self.reorder_level
    }
}

/// Low stock holds only when inventory is enabled and stock is below the reorder level
pub fn is_low_stock(enable_inventory: bool, stock: u32, reorder_level: u32) -> bool {
    enable_inventory && stock < reorder_level
}

/// Product entity, as held by the catalog store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    /// Owning category (exactly one at a time)
    pub category_id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub cost_price: Option<Decimal>,
    pub food_type: FoodType,
    /// Sale unit, e.g. "piece", "kg"
    pub unit: String,
    pub active: bool,
    pub archived: bool,
    /// Minutes
    pub preparation_time: u32,
    pub min_order_qty: u32,
    pub max_order_qty: u32,
    pub availability: Availability,
    pub inventory: Option<Inventory>,
    pub is_low_stock: bool,
    pub images: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    pub fn status(&self) -> EntityStatus {
        EntityStatus::from_active(self.active)
    }

    pub fn enable_inventory(&self) -> bool {
        self.inventory.is_some()
    }

    /// Current images as an editable list
    pub fn image_sources(&self) -> Vec<ImageSource> {
        self.images.iter().cloned().map(ImageSource::Reference).collect()
    }
}

/// Create product input, shaped like the product form
#[derive(Debug, Clone, Validate)]
#[validate(schema(function = "validate_product_draft"))]
pub struct ProductDraft {
    #[validate(length(min = 1, max = 160, message = "name must be 1-160 characters"))]
    pub name: String,
    #[validate(length(max = 4000))]
    pub description: Option<String>,
    pub price: Decimal,
    pub cost_price: Option<Decimal>,
    pub food_type: FoodType,
    #[validate(length(min = 1, max = 32, message = "unit must be 1-32 characters"))]
    pub unit: String,
    pub preparation_time: u32,
    #[validate(range(min = 1, message = "minimum order quantity must be at least 1"))]
    pub min_order_qty: u32,
    #[validate(range(min = 1, message = "maximum order quantity must be at least 1"))]
    pub max_order_qty: u32,
    pub availability: AvailabilityFields,
    pub enable_inventory: bool,
    pub stock: u32,
    pub reorder_level: u32,
    pub active: bool,
    pub images: Vec<FilePayload>,
}

impl ProductDraft {
    pub fn new(name: impl Into<String>, price: Decimal) -> Self {
        Self {
            name: name.into(),
            description: None,
            price,
            cost_price: None,
            food_type: FoodType::Veg,
            unit: "piece".to_string(),
            preparation_time: 0,
            min_order_qty: 1,
            max_order_qty: 99,
            availability: AvailabilityFields::always(),
            enable_inventory: false,
            stock: 0,
            reorder_level: 0,
            active: true,
            images: Vec::new(),
        }
    }

    pub fn with_food_type(mut self, food_type: FoodType) -> Self {
        self.food_type = food_type;
        self
    }

    pub fn with_inventory(mut self, stock: u32, reorder_level: u32) -> Self {
        self.enable_inventory = true;
        self.stock = stock;
        self.reorder_level = reorder_level;
        self
    }

    pub fn with_order_qty(mut self, min: u32, max: u32) -> Self {
        self.min_order_qty = min;
        self.max_order_qty = max;
        self
    }

    pub fn with_availability(mut self, availability: AvailabilityFields) -> Self {
        self.availability = availability;
        self
    }

    pub fn with_image(mut self, image: FilePayload) -> Self {
        self.images.push(image);
        self
    }

    /// Wire fields. Availability is derived from the mode: exactly one field
    /// group survives, whatever the form held.
    pub fn fields(&self) -> ProductFields {
        ProductFields {
            name: self.name.trim().to_string(),
            description: self.description.clone(),
            price: self.price,
            cost_price: self.cost_price,
            food_type: self.food_type,
            unit: self.unit.trim().to_string(),
            preparation_time: self.preparation_time,
            min_order_qty: self.min_order_qty,
            max_order_qty: self.max_order_qty,
            active: self.active,
            availability: self.availability.normalized(),
            enable_inventory: self.enable_inventory,
            stock: self.enable_inventory.then_some(self.stock),
            reorder_level: self.enable_inventory.then_some(self.reorder_level),
        }
    }
}

fn check_prices(price: Option<Decimal>, cost_price: Option<Decimal>) -> Result<(), ValidationError> {
    if price.is_some_and(|p| p < Decimal::ZERO) {
        return Err(validation_error("price_negative", "price must not be negative".into()));
    }
    if cost_price.is_some_and(|p| p < Decimal::ZERO) {
        return Err(validation_error(
            "cost_price_negative",
            "cost price must not be negative".into(),
        ));
    }
    Ok(())
}

/// Check `1 <= min <= max`
pub fn check_order_qty(min: u32, max: u32) -> Result<(), ValidationError> {
    if min == 0 || min > max {
        return Err(validation_error(
            "order_qty_bounds",
            format!("minimum order quantity {} must be between 1 and {}", min, max),
        ));
    }
    Ok(())
}

fn validate_product_draft(draft: &ProductDraft) -> Result<(), ValidationError> {
    if draft.name.trim().is_empty() {
        return Err(validation_error("name_blank", "name must not be blank".into()));
    }
    check_prices(Some(draft.price), draft.cost_price)?;
    check_order_qty(draft.min_order_qty, draft.max_order_qty)?;
    draft.availability.check()?;
    check_images(&draft.images)
}

/// Product fields transmitted on create
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFields {
    pub name: String,
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub cost_price: Option<Decimal>,
    pub food_type: FoodType,
    pub unit: String,
    pub preparation_time: u32,
    pub min_order_qty: u32,
    pub max_order_qty: u32,
    pub active: bool,
    #[serde(flatten)]
    pub availability: AvailabilityFields,
    pub enable_inventory: bool,
    pub stock: Option<u32>,
    pub reorder_level: Option<u32>,
}

/// Edit product input
///
/// `images` is the full editable list; `None` keeps the current images.
#[derive(Debug, Clone, Default, Validate)]
#[validate(schema(function = "validate_product_patch"))]
pub struct ProductPatch {
    #[validate(length(min = 1, max = 160, message = "name must be 1-160 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 4000))]
    pub description: Option<String>,
    /// Move the product to another category
    pub category_id: Option<String>,
    pub price: Option<Decimal>,
    pub cost_price: Option<Decimal>,
    pub food_type: Option<FoodType>,
    #[validate(length(min = 1, max = 32, message = "unit must be 1-32 characters"))]
    pub unit: Option<String>,
    pub preparation_time: Option<u32>,
    pub min_order_qty: Option<u32>,
    pub max_order_qty: Option<u32>,
    pub availability: Option<AvailabilityFields>,
    pub enable_inventory: Option<bool>,
    pub stock: Option<u32>,
    pub reorder_level: Option<u32>,
    pub images: Option<Vec<ImageSource>>,
    pub images_to_remove: Vec<String>,
}

fn validate_product_patch(patch: &ProductPatch) -> Result<(), ValidationError> {
    if patch.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(validation_error("name_blank", "name must not be blank".into()));
    }
    check_prices(patch.price, patch.cost_price)?;
    if let (Some(min), Some(max)) = (patch.min_order_qty, patch.max_order_qty) {
        check_order_qty(min, max)?;
    }
    if let Some(availability) = &patch.availability {
        availability.check()?;
    }
    let uploads: Vec<FilePayload> = patch
        .images
        .iter()
        .flatten()
        .filter_map(|s| match s {
            ImageSource::Payload(p) => Some(p.clone()),
            ImageSource::Reference(_) => None,
        })
        .collect();
    check_images(&uploads)
}

/// Product fields transmitted on edit, alongside the pending uploads
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Decimal>,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub cost_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub food_type: Option<FoodType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preparation_time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_order_qty: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_order_qty: Option<u32>,
    #[serde(flatten)]
    pub availability: Option<AvailabilityFields>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_inventory: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reorder_level: Option<u32>,
    #[serde(flatten)]
    pub images: ImageChanges,
}
