//! Entity formatter
//!
//! Gateway responses differ in shape between list, create, edit and import
//! endpoints. These functions turn any of them into a fully-populated entity
//! so the store never sees a missing field.

use rust_decimal::Decimal;
use shared::models::{
    Availability, AvailabilityFields, Category, FoodType, Inventory, Product, RawCategory,
    RawProduct, is_low_stock,
};

const DEFAULT_UNIT: &str = "piece";
const DEFAULT_MIN_ORDER_QTY: u32 = 1;
const DEFAULT_MAX_ORDER_QTY: u32 = 99;

/// Normalize a raw category record
pub fn format_category(raw: RawCategory) -> Category {
    let availability = resolve_availability(&raw.id, &raw.availability_fields());
    Category {
        id: raw.id,
        name: raw.name.unwrap_or_default(),
        description: raw.description.filter(|d| !d.trim().is_empty()),
        active: raw.active.unwrap_or(true),
        archived: raw.archived.unwrap_or(false),
        availability,
        images: raw.images.unwrap_or_default(),
        product_count: raw.product_count.unwrap_or(0),
        created_at: raw.created_at,
        updated_at: raw.updated_at,
    }
}

/// Normalize a raw product record
///
/// Inventory is taken from the nested block when present, otherwise from
/// the flat fields. Negative counts are clamped to zero.
pub fn format_product(raw: RawProduct) -> Product {
    let availability = resolve_availability(&raw.id, &raw.availability_fields());

    let nested = raw.inventory.as_ref();
    let enable_inventory = nested
        .and_then(|i| i.enabled)
        .or(raw.enable_inventory)
        .unwrap_or(false);
    let stock = clamp_count(nested.and_then(|i| i.stock).or(raw.stock));
    let reorder_level = clamp_count(nested.and_then(|i| i.reorder_level).or(raw.reorder_level));

    let min_order_qty = raw.min_order_qty.filter(|q| *q > 0).unwrap_or(DEFAULT_MIN_ORDER_QTY);
    let max_order_qty = raw
        .max_order_qty
        .filter(|q| *q >= min_order_qty)
        .unwrap_or(DEFAULT_MAX_ORDER_QTY.max(min_order_qty));

    Product {
        id: raw.id,
        category_id: raw.category_id.unwrap_or_default(),
        name: raw.name.unwrap_or_default(),
        description: raw.description.filter(|d| !d.trim().is_empty()),
        price: raw.price.unwrap_or(Decimal::ZERO),
        cost_price: raw.cost_price,
        food_type: raw.food_type.unwrap_or(FoodType::Veg),
        unit: raw
            .unit
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_UNIT.to_string()),
        active: raw.active.unwrap_or(true),
        archived: raw.archived.unwrap_or(false),
        preparation_time: raw.preparation_time.unwrap_or(0),
        min_order_qty,
        max_order_qty,
        availability,
        inventory: enable_inventory.then_some(Inventory {
            stock,
            reorder_level,
        }),
        is_low_stock: is_low_stock(enable_inventory, stock, reorder_level),
        images: raw.images.unwrap_or_default(),
        created_at: raw.created_at,
        updated_at: raw.updated_at,
    }
}

/// Format products fetched for one category
///
/// Records without a category id belong to the category they were fetched for.
pub fn format_products_for(category_id: &str, raws: Vec<RawProduct>) -> Vec<Product> {
    raws.into_iter()
        .map(|raw| {
            let mut product = format_product(raw);
            if product.category_id.is_empty() {
                product.category_id = category_id.to_string();
            }
            product
        })
        .collect()
}

fn resolve_availability(id: &str, fields: &AvailabilityFields) -> Availability {
    Availability::from_fields(fields).unwrap_or_else(|| {
        tracing::warn!(
            id = %id,
            mode = %fields.availability_mode,
            "Availability mode without its time fields, treating as always"
        );
        Availability::Always
    })
}

fn clamp_count(value: Option<i64>) -> u32 {
    value
        .unwrap_or(0)
        .clamp(0, i64::from(u32::MAX))
        .try_into()
        .unwrap_or(0)
}
