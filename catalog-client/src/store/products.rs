//! Product operations

use shared::models::{Product, ProductDraft, ProductPatch, ProductUpdate};
use shared::util::non_blank;
use validator::Validate;

use super::{CatalogState, CatalogStore, FetchOutcome};
use crate::events::StoreEvent;
use crate::formatter::format_product;
use crate::gateway::CatalogGateway;
use crate::images::partition_images;
use crate::mutation::{OptimisticMutation, run_optimistic};
use crate::outcome::{CatalogAction, EntityKind, OperationError, OperationResult};

/// Remove a product from the listed products
struct DeleteProduct<'a> {
    id: &'a str,
}

impl OptimisticMutation<CatalogState> for DeleteProduct<'_> {
    type Snapshot = (Vec<shared::models::Category>, Vec<Product>);

    fn snapshot(&self, state: &CatalogState) -> Self::Snapshot {
        (state.categories.clone(), state.products.clone())
    }

    fn apply(&self, state: &mut CatalogState) {
        state.products.retain(|p| p.id != self.id);
    }

    fn rollback(&self, state: &mut CatalogState, (categories, products): Self::Snapshot) {
        state.categories = categories;
        state.products = products;
    }
}

impl<G: CatalogGateway> CatalogStore<G> {
    /// Create a product under `category_id`
    ///
    /// The availability fields are normalized to the chosen mode before
    /// transmission. The product is listed and selected only when its
    /// category is the selected one.
    pub async fn create_product(
        &self,
        draft: ProductDraft,
        category_id: &str,
    ) -> OperationResult<Product> {
        draft
            .validate()
            .map_err(|e| OperationError::validation(EntityKind::Product, CatalogAction::Create, e))?;
        if self.category(category_id).is_none() {
            return Err(OperationError::not_found(
                EntityKind::Category,
                CatalogAction::Create,
                category_id,
            ));
        }

        let fields = draft.fields();
        let raw = self
            .gateway
            .create_product(&self.merchant_id, category_id, &fields, &draft.images)
            .await
            .map_err(|e| {
                tracing::error!(category_id = %category_id, name = %fields.name, error = %e, "Failed to create product");
                OperationError::from_client(EntityKind::Product, CatalogAction::Create, &e)
                    .with_target(fields.name.clone())
            })?;

        let mut product = format_product(raw);
        if product.category_id.is_empty() {
            product.category_id = category_id.to_string();
        }

        let listed = {
            let mut state = self.state.write();
            let listed = state.selection.category_id() == Some(product.category_id.as_str());
            if listed {
                state.products.push(product.clone());
                state.selection.select_product(Some(product.id.clone()));
            }
            listed
        };
        if listed {
            self.notify_all(&[StoreEvent::ProductsChanged, StoreEvent::SelectionChanged]);
        }

        tracing::info!(product_id = %product.id, category_id = %product.category_id, listed, "Product created");
        Ok(product)
    }

    /// Edit a product; the local entity changes only once the gateway confirms
    ///
    /// A product moved to another category leaves the listed products.
    pub async fn edit_product(&self, id: &str, patch: ProductPatch) -> OperationResult<Product> {
        patch.validate().map_err(|e| {
            OperationError::validation(EntityKind::Product, CatalogAction::Update, e).with_target(id)
        })?;
        let current = self
            .product(id)
            .ok_or_else(|| OperationError::not_found(EntityKind::Product, CatalogAction::Update, id))?;

        // Order quantities are checked against the values the patch leaves in place
        let min = patch.min_order_qty.unwrap_or(current.min_order_qty);
        let max = patch.max_order_qty.unwrap_or(current.max_order_qty);
        shared::models::check_order_qty(min, max).map_err(|e| {
            let message = e.message.map(|m| m.to_string()).unwrap_or_else(|| e.code.to_string());
            OperationError::new(
                EntityKind::Product,
                CatalogAction::Update,
                shared::ErrorCode::ProductInvalidOrderQty,
                message,
            )
            .with_target(id)
        })?;

        let images = patch.images.unwrap_or_else(|| current.image_sources());
        let diff = partition_images(&images, &patch.images_to_remove);

        let enable_inventory = patch.enable_inventory.unwrap_or(current.enable_inventory());
        let update = ProductUpdate {
            name: patch.name.map(|n| n.trim().to_string()),
            description: patch.description.map(|d| non_blank(Some(&d)).unwrap_or_default()),
            category_id: patch.category_id,
            price: patch.price,
            cost_price: patch.cost_price,
            food_type: patch.food_type,
            unit: patch.unit.and_then(|u| non_blank(Some(&u))),
            preparation_time: patch.preparation_time,
            min_order_qty: patch.min_order_qty,
            max_order_qty: patch.max_order_qty,
            availability: patch.availability.map(|a| a.normalized()),
            enable_inventory: patch.enable_inventory,
            stock: patch.stock.filter(|_| enable_inventory),
            reorder_level: patch.reorder_level.filter(|_| enable_inventory),
            images: (&diff).into(),
        };

        let raw = self
            .gateway
            .update_product(id, &update, &diff.pending)
            .await
            .map_err(|e| {
                tracing::error!(product_id = %id, error = %e, "Failed to update product");
                OperationError::from_client(EntityKind::Product, CatalogAction::Update, &e).with_target(id)
            })?;

        let mut product = format_product(raw);
        if product.category_id.is_empty() {
            product.category_id = current.category_id.clone();
        }
        self.replace_listed_product(&product);

        tracing::info!(
            product_id = %product.id,
            uploaded = diff.pending.len(),
            removed = diff.removed.len(),
            "Product updated"
        );
        Ok(product)
    }

    /// Delete a product, restoring the lists if the gateway fails
    ///
    /// The product selection is left as is; [`CatalogStore::selected_product`]
    /// returns `None` once the product is gone.
    pub async fn delete_product(&self, id: &str) -> OperationResult<()> {
        if self.product(id).is_none() {
            return Err(OperationError::not_found(EntityKind::Product, CatalogAction::Delete, id));
        }

        let events = [StoreEvent::ProductsChanged];
        run_optimistic(
            &self.state,
            &DeleteProduct { id },
            self.gateway.delete_product(id),
            self.phase_notifier(&events),
        )
        .await
        .map_err(|e| {
            tracing::warn!(product_id = %id, error = %e, "Product delete failed, rolled back");
            OperationError::from_client(EntityKind::Product, CatalogAction::Delete, &e).with_target(id)
        })?;

        tracing::info!(product_id = %id, "Product deleted");
        Ok(())
    }

    /// Toggle a product's active flag
    ///
    /// Not optimistic: the local product is replaced by the record the
    /// gateway returns.
    pub async fn toggle_product_active(&self, id: &str) -> OperationResult<Product> {
        let raw = self.gateway.toggle_product_active(id).await.map_err(|e| {
            tracing::error!(product_id = %id, error = %e, "Failed to toggle product");
            OperationError::from_client(EntityKind::Product, CatalogAction::ToggleActive, &e)
                .with_target(id)
        })?;

        let mut product = format_product(raw);
        if product.category_id.is_empty() {
            product.category_id = self.product(id).map(|p| p.category_id).unwrap_or_default();
        }
        self.replace_listed_product(&product);

        tracing::info!(product_id = %id, active = product.active, "Product active toggled");
        Ok(product)
    }

    /// Archive a product, then refetch the selected category's products
    pub async fn archive_product(&self, id: &str) -> OperationResult<FetchOutcome> {
        self.change_product_archive(id, true).await
    }

    /// Unarchive a product, then refetch the selected category's products
    pub async fn unarchive_product(&self, id: &str) -> OperationResult<FetchOutcome> {
        self.change_product_archive(id, false).await
    }

    async fn change_product_archive(
        &self,
        id: &str,
        archived: bool,
    ) -> OperationResult<FetchOutcome> {
        let (action, result) = if archived {
            (CatalogAction::Archive, self.gateway.archive_product(id).await)
        } else {
            (CatalogAction::Unarchive, self.gateway.unarchive_product(id).await)
        };
        result.map_err(|e| {
            tracing::error!(product_id = %id, archived, error = %e, "Product archive change failed");
            OperationError::from_client(EntityKind::Product, action, &e).with_target(id)
        })?;

        tracing::info!(product_id = %id, archived, "Product archive state changed, refetching");
        self.refresh_products().await.map_err(|e| OperationError {
            action: CatalogAction::Refresh,
            ..e
        })
    }

    /// Replace a listed product by id, or drop it when it moved out of the
    /// selected category
    fn replace_listed_product(&self, product: &Product) {
        let changed = {
            let mut state = self.state.write();
            let in_scope = state.selection.category_id() == Some(product.category_id.as_str());
            match state.products.iter().position(|p| p.id == product.id) {
                Some(index) if in_scope => {
                    state.products[index] = product.clone();
                    true
                }
                Some(index) => {
                    state.products.remove(index);
                    true
                }
                None => false,
            }
        };
        if changed {
            self.notify(StoreEvent::ProductsChanged);
        }
    }
}
