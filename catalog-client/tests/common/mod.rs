//! In-memory catalog gateway for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use catalog_client::models::{
    BulkTarget, CategoryFields, CategoryUpdate, FilePayload, ImportReport,
    ProductFields, ProductUpdate, RawCategory, RawInventory, RawProduct,
};
use catalog_client::{CatalogGateway, CatalogStore, ClientError, ClientResult, ErrorCode};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Notify;

pub const MERCHANT: &str = "m-1";

#[derive(Debug, Default)]
struct MockState {
    categories: Vec<RawCategory>,
    products: Vec<RawProduct>,
    failing: HashSet<&'static str>,
    calls: Vec<String>,
    category_updates: Vec<(String, CategoryUpdate, Vec<FilePayload>)>,
    product_updates: Vec<(String, ProductUpdate, Vec<FilePayload>)>,
    created_products: Vec<(String, ProductFields)>,
    import_report: Option<ImportReport>,
    next_id: u32,
}

/// Gateway double with failure injection and per-category fetch gates
#[derive(Default)]
pub struct MockGateway {
    state: Mutex<MockState>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
}

pub fn raw_category(id: &str, name: &str) -> RawCategory {
    RawCategory {
        id: id.to_string(),
        name: Some(name.to_string()),
        active: Some(true),
        ..Default::default()
    }
}

pub fn raw_product(id: &str, category_id: &str, name: &str) -> RawProduct {
    RawProduct {
        id: id.to_string(),
        category_id: Some(category_id.to_string()),
        name: Some(name.to_string()),
        price: Some(Decimal::new(1000, 2)),
        active: Some(true),
        ..Default::default()
    }
}

fn unavailable(op: &str) -> ClientError {
    ClientError::Api {
        code: ErrorCode::ServiceUnavailable,
        message: format!("{op} unavailable"),
    }
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_categories(self, categories: Vec<RawCategory>) -> Self {
        self.state.lock().categories = categories;
        self
    }

    pub fn with_products(self, products: Vec<RawProduct>) -> Self {
        self.state.lock().products = products;
        self
    }

    /// Make every call of `op` fail until [`MockGateway::recover`]
    pub fn fail(&self, op: &'static str) {
        self.state.lock().failing.insert(op);
    }

    pub fn recover(&self, op: &'static str) {
        self.state.lock().failing.remove(op);
    }

    /// Hold `list_products` for `category_id` until the returned gate is notified
    pub fn gate_products(&self, category_id: &str) -> Arc<Notify> {
        self.gates
            .lock()
            .entry(category_id.to_string())
            .or_insert_with(|| Arc::new(Notify::new()))
            .clone()
    }

    /// Hold `import_catalog` until the returned gate is notified
    pub fn gate_import(&self) -> Arc<Notify> {
        self.gate_products("__import__")
    }

    /// Hold the gateway call `op` until the returned gate is notified.
    /// Failure injection is checked after the gate opens.
    pub fn gate_call(&self, op: &str) -> Arc<Notify> {
        self.gate_products(&format!("call:{op}"))
    }

    async fn hold(&self, op: &str) {
        let gate = self.gates.lock().get(&format!("call:{op}")).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }

    pub fn set_import_report(&self, report: ImportReport) {
        self.state.lock().import_report = Some(report);
    }

    /// Replace the stored product record, as if changed server-side
    pub fn put_product(&self, product: RawProduct) {
        let mut state = self.state.lock();
        match state.products.iter_mut().find(|p| p.id == product.id) {
            Some(slot) => *slot = product,
            None => state.products.push(product),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }

    pub fn call_count(&self, op: &str) -> usize {
        self.state.lock().calls.iter().filter(|c| c.as_str() == op).count()
    }

    pub fn last_category_update(&self) -> Option<(String, CategoryUpdate, Vec<FilePayload>)> {
        self.state.lock().category_updates.last().cloned()
    }

    pub fn last_product_update(&self) -> Option<(String, ProductUpdate, Vec<FilePayload>)> {
        self.state.lock().product_updates.last().cloned()
    }

    pub fn last_created_product(&self) -> Option<(String, ProductFields)> {
        self.state.lock().created_products.last().cloned()
    }

    fn enter(&self, op: &'static str) -> ClientResult<()> {
        let mut state = self.state.lock();
        state.calls.push(op.to_string());
        if state.failing.contains(op) {
            return Err(unavailable(op));
        }
        Ok(())
    }

    fn next_id(&self, prefix: &str) -> String {
        let mut state = self.state.lock();
        state.next_id += 1;
        format!("{prefix}-{}", state.next_id)
    }

    fn set_category_flag(&self, id: &str, f: impl FnOnce(&mut RawCategory)) -> ClientResult<()> {
        let mut state = self.state.lock();
        let category = state
            .categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| ClientError::NotFound(format!("category {id}")))?;
        f(category);
        Ok(())
    }

    fn set_product_flag(&self, id: &str, f: impl FnOnce(&mut RawProduct)) -> ClientResult<RawProduct> {
        let mut state = self.state.lock();
        let product = state
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| ClientError::NotFound(format!("product {id}")))?;
        f(product);
        Ok(product.clone())
    }
}

fn uploaded(images: &[FilePayload]) -> impl Iterator<Item = String> + '_ {
    images.iter().map(|f| format!("uploads/{}", f.file_name))
}

#[async_trait]
impl CatalogGateway for MockGateway {
    async fn list_categories(&self, _merchant_id: &str) -> ClientResult<Vec<RawCategory>> {
        self.enter("list_categories")?;
        // Archived categories are filtered server-side
        Ok(self
            .state
            .lock()
            .categories
            .iter()
            .filter(|c| !c.archived.unwrap_or(false))
            .cloned()
            .collect())
    }

    async fn create_category(
        &self,
        _merchant_id: &str,
        fields: &CategoryFields,
        images: &[FilePayload],
    ) -> ClientResult<RawCategory> {
        self.enter("create_category")?;
        let availability = &fields.availability;
        let raw = RawCategory {
            id: self.next_id("cat"),
            name: Some(fields.name.clone()),
            description: fields.description.clone(),
            active: Some(fields.active),
            archived: Some(false),
            availability_mode: Some(availability.availability_mode),
            available_after_time: availability.available_after_time.clone(),
            available_from_time: availability.available_from_time.clone(),
            available_to_time: availability.available_to_time.clone(),
            images: Some(uploaded(images).collect()),
            product_count: Some(0),
            ..Default::default()
        };
        self.state.lock().categories.push(raw.clone());
        Ok(raw)
    }

    async fn update_category(
        &self,
        id: &str,
        update: &CategoryUpdate,
        images: &[FilePayload],
    ) -> ClientResult<RawCategory> {
        self.enter("update_category")?;
        let mut state = self.state.lock();
        state
            .category_updates
            .push((id.to_string(), update.clone(), images.to_vec()));
        let category = state
            .categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| ClientError::NotFound(format!("category {id}")))?;
        if let Some(name) = &update.name {
            category.name = Some(name.clone());
        }
        if let Some(description) = &update.description {
            category.description = Some(description.clone());
        }
        if let Some(availability) = &update.availability {
            category.availability_mode = Some(availability.availability_mode);
            category.available_after_time = availability.available_after_time.clone();
            category.available_from_time = availability.available_from_time.clone();
            category.available_to_time = availability.available_to_time.clone();
        }
        let mut kept = update.images.existing_images.clone();
        kept.extend(uploaded(images));
        category.images = Some(kept);
        Ok(category.clone())
    }

    async fn delete_category(&self, id: &str) -> ClientResult<()> {
        self.hold("delete_category").await;
        self.enter("delete_category")?;
        self.state.lock().categories.retain(|c| c.id != id);
        Ok(())
    }

    async fn toggle_category_active(&self, id: &str) -> ClientResult<()> {
        self.hold("toggle_category_active").await;
        self.enter("toggle_category_active")?;
        self.set_category_flag(id, |c| c.active = Some(!c.active.unwrap_or(true)))
    }

    async fn archive_category(&self, id: &str) -> ClientResult<()> {
        self.enter("archive_category")?;
        self.set_category_flag(id, |c| c.archived = Some(true))
    }

    async fn unarchive_category(&self, id: &str) -> ClientResult<()> {
        self.enter("unarchive_category")?;
        self.set_category_flag(id, |c| c.archived = Some(false))
    }

    async fn list_products(
        &self,
        _merchant_id: &str,
        category_id: &str,
    ) -> ClientResult<Vec<RawProduct>> {
        self.enter("list_products")?;
        let gate = self.gates.lock().get(category_id).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        let state = self.state.lock();
        if state.failing.contains("list_products_after_gate") {
            return Err(unavailable("list_products"));
        }
        Ok(state
            .products
            .iter()
            .filter(|p| p.category_id.as_deref() == Some(category_id))
            .filter(|p| !p.archived.unwrap_or(false))
            .cloned()
            .collect())
    }

    async fn create_product(
        &self,
        _merchant_id: &str,
        category_id: &str,
        fields: &ProductFields,
        images: &[FilePayload],
    ) -> ClientResult<RawProduct> {
        self.enter("create_product")?;
        let availability = &fields.availability;
        let raw = RawProduct {
            id: self.next_id("prod"),
            category_id: Some(category_id.to_string()),
            name: Some(fields.name.clone()),
            description: fields.description.clone(),
            price: Some(fields.price),
            cost_price: fields.cost_price,
            food_type: Some(fields.food_type),
            unit: Some(fields.unit.clone()),
            active: Some(fields.active),
            archived: Some(false),
            preparation_time: Some(fields.preparation_time),
            min_order_qty: Some(fields.min_order_qty),
            max_order_qty: Some(fields.max_order_qty),
            availability_mode: Some(availability.availability_mode),
            available_after_time: availability.available_after_time.clone(),
            available_from_time: availability.available_from_time.clone(),
            available_to_time: availability.available_to_time.clone(),
            inventory: Some(RawInventory {
                enabled: Some(fields.enable_inventory),
                stock: fields.stock.map(i64::from),
                reorder_level: fields.reorder_level.map(i64::from),
            }),
            images: Some(uploaded(images).collect()),
            ..Default::default()
        };
        let mut state = self.state.lock();
        state
            .created_products
            .push((category_id.to_string(), fields.clone()));
        state.products.push(raw.clone());
        Ok(raw)
    }

    async fn update_product(
        &self,
        id: &str,
        update: &ProductUpdate,
        images: &[FilePayload],
    ) -> ClientResult<RawProduct> {
        self.enter("update_product")?;
        self.state
            .lock()
            .product_updates
            .push((id.to_string(), update.clone(), images.to_vec()));
        self.set_product_flag(id, |p| {
            if let Some(name) = &update.name {
                p.name = Some(name.clone());
            }
            if let Some(category_id) = &update.category_id {
                p.category_id = Some(category_id.clone());
            }
            if let Some(price) = update.price {
                p.price = Some(price);
            }
            if let Some(enable) = update.enable_inventory {
                p.enable_inventory = Some(enable);
            }
            if update.stock.is_some() {
                p.stock = update.stock.map(i64::from);
            }
            if update.reorder_level.is_some() {
                p.reorder_level = update.reorder_level.map(i64::from);
            }
            if let Some(availability) = &update.availability {
                p.availability_mode = Some(availability.availability_mode);
                p.available_after_time = availability.available_after_time.clone();
                p.available_from_time = availability.available_from_time.clone();
                p.available_to_time = availability.available_to_time.clone();
            }
            let mut kept = update.images.existing_images.clone();
            kept.extend(uploaded(images));
            p.images = Some(kept);
        })
    }

    async fn delete_product(&self, id: &str) -> ClientResult<()> {
        self.hold("delete_product").await;
        self.enter("delete_product")?;
        self.state.lock().products.retain(|p| p.id != id);
        Ok(())
    }

    async fn toggle_product_active(&self, id: &str) -> ClientResult<RawProduct> {
        self.enter("toggle_product_active")?;
        self.set_product_flag(id, |p| p.active = Some(!p.active.unwrap_or(true)))
    }

    async fn archive_product(&self, id: &str) -> ClientResult<()> {
        self.enter("archive_product")?;
        self.set_product_flag(id, |p| p.archived = Some(true)).map(|_| ())
    }

    async fn unarchive_product(&self, id: &str) -> ClientResult<()> {
        self.enter("unarchive_product")?;
        self.set_product_flag(id, |p| p.archived = Some(false)).map(|_| ())
    }

    async fn import_catalog(
        &self,
        _merchant_id: &str,
        _target: BulkTarget,
        file: &FilePayload,
    ) -> ClientResult<ImportReport> {
        self.enter("import_catalog")?;
        let gate = self.gates.lock().get("__import__").cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if file.is_empty() {
            return Err(ClientError::Validation("spreadsheet is empty".into()));
        }
        self.state
            .lock()
            .import_report
            .clone()
            .ok_or_else(|| ClientError::Internal("no import report configured".into()))
    }

    async fn export_catalog(&self, merchant_id: &str) -> ClientResult<FilePayload> {
        self.enter("export_catalog")?;
        Ok(FilePayload::new(
            format!("{merchant_id}-catalog.xlsx"),
            b"PK\x03\x04".to_vec(),
        ))
    }

    async fn download_template(&self) -> ClientResult<FilePayload> {
        self.enter("download_template")?;
        Ok(FilePayload::new("catalog-template.xlsx", b"PK\x03\x04".to_vec()))
    }
}

/// Store over a seeded mock, with categories already loaded
pub async fn loaded_store(gateway: MockGateway) -> (Arc<MockGateway>, Arc<CatalogStore<MockGateway>>) {
    let gateway = Arc::new(gateway);
    let store = Arc::new(CatalogStore::new(gateway.clone(), MERCHANT));
    store
        .load_categories()
        .await
        .expect("categories should load");
    (gateway, store)
}

/// The standard fixture: categories C1, C2 with products P1, P2 under C1 and P3 under C2
pub fn seeded_gateway() -> MockGateway {
    MockGateway::new()
        .with_categories(vec![
            raw_category("C1", "Starters"),
            raw_category("C2", "Mains"),
        ])
        .with_products(vec![
            raw_product("P1", "C1", "Soup"),
            raw_product("P2", "C1", "Salad"),
            raw_product("P3", "C2", "Curry"),
        ])
}
