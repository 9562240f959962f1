//! Catalog store
//!
//! Holds the categories of the loaded merchant, the products of the
//! selected category and the current selection. All catalog mutations go
//! through the store; observers subscribe to [`StoreEvent`]s and re-read the
//! state through the accessors or [`CatalogStore::snapshot`].

mod categories;
mod products;

use parking_lot::RwLock;
use shared::models::{Category, ImportReport, Product};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::bulk::merge_by_id;
use crate::events::{EVENT_CAPACITY, StoreEvent};
use crate::formatter::{format_category, format_product, format_products_for};
use crate::gateway::CatalogGateway;
use crate::mutation::MutationPhase;
use crate::outcome::{CatalogAction, EntityKind, OperationError, OperationResult};
use crate::selection::{FetchFence, Selection};

// =============================================================================
// State
// =============================================================================

/// Mutable state behind the store lock
#[derive(Debug, Clone, Default)]
pub(crate) struct CatalogState {
    pub(crate) categories: Vec<Category>,
    pub(crate) products: Vec<Product>,
    pub(crate) selection: Selection,
    pub(crate) products_loading: bool,
}

/// Point-in-time copy of the store for rendering
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogSnapshot {
    pub categories: Vec<Category>,
    pub products: Vec<Product>,
    pub selected_category_id: Option<String>,
    pub selected_product_id: Option<String>,
    pub products_loading: bool,
}

/// How a product fetch ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The result landed; number of products now listed
    Applied(usize),
    /// Selection changed while the fetch was in flight; result discarded
    Superseded,
}

// =============================================================================
// CatalogStore
// =============================================================================

pub struct CatalogStore<G> {
    gateway: Arc<G>,
    merchant_id: String,
    state: RwLock<CatalogState>,
    events: broadcast::Sender<StoreEvent>,
}

impl<G> std::fmt::Debug for CatalogStore<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("CatalogStore")
            .field("merchant_id", &self.merchant_id)
            .field("categories", &state.categories.len())
            .field("products", &state.products.len())
            .field("selection", &state.selection)
            .finish()
    }
}

impl<G: CatalogGateway> CatalogStore<G> {
    pub fn new(gateway: Arc<G>, merchant_id: impl Into<String>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            gateway,
            merchant_id: merchant_id.into(),
            state: RwLock::new(CatalogState::default()),
            events,
        }
    }

    pub fn merchant_id(&self) -> &str {
        &self.merchant_id
    }

    pub fn gateway(&self) -> &Arc<G> {
        &self.gateway
    }

    /// Subscribe to change notifications
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    pub(crate) fn notify(&self, event: StoreEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    pub(crate) fn notify_all(&self, events: &[StoreEvent]) {
        for event in events {
            self.notify(*event);
        }
    }

    /// Notifier for an optimistic mutation: every phase changes `events`
    pub(crate) fn phase_notifier<'a>(
        &'a self,
        events: &'a [StoreEvent],
    ) -> impl Fn(MutationPhase) + 'a {
        move |phase| {
            tracing::trace!(?phase, "Optimistic mutation phase");
            self.notify_all(events);
        }
    }

    // ========== Read model ==========

    pub fn snapshot(&self) -> CatalogSnapshot {
        let state = self.state.read();
        CatalogSnapshot {
            categories: state.categories.clone(),
            products: state.products.clone(),
            selected_category_id: state.selection.category_id().map(str::to_string),
            selected_product_id: state.selection.product_id().map(str::to_string),
            products_loading: state.products_loading,
        }
    }

    pub fn categories(&self) -> Vec<Category> {
        self.state.read().categories.clone()
    }

    pub fn products(&self) -> Vec<Product> {
        self.state.read().products.clone()
    }

    pub fn category(&self, id: &str) -> Option<Category> {
        self.state.read().categories.iter().find(|c| c.id == id).cloned()
    }

    pub fn product(&self, id: &str) -> Option<Product> {
        self.state.read().products.iter().find(|p| p.id == id).cloned()
    }

    pub fn selected_category_id(&self) -> Option<String> {
        self.state.read().selection.category_id().map(str::to_string)
    }

    pub fn selected_product_id(&self) -> Option<String> {
        self.state.read().selection.product_id().map(str::to_string)
    }

    /// Selected category, if it is still loaded
    pub fn selected_category(&self) -> Option<Category> {
        let state = self.state.read();
        let id = state.selection.category_id()?;
        state.categories.iter().find(|c| c.id == id).cloned()
    }

    /// Selected product, if it is still listed
    pub fn selected_product(&self) -> Option<Product> {
        let state = self.state.read();
        let id = state.selection.product_id()?;
        state.products.iter().find(|p| p.id == id).cloned()
    }

    pub fn is_loading_products(&self) -> bool {
        self.state.read().products_loading
    }

    // ========== Loading and selection ==========

    /// Fetch and replace the category list
    pub async fn load_categories(&self) -> OperationResult<usize> {
        self.fetch_categories(CatalogAction::Load).await
    }

    async fn fetch_categories(&self, action: CatalogAction) -> OperationResult<usize> {
        let raws = self
            .gateway
            .list_categories(&self.merchant_id)
            .await
            .map_err(|e| {
                tracing::error!(merchant_id = %self.merchant_id, error = %e, "Failed to fetch categories");
                OperationError::from_client(EntityKind::Category, action, &e)
            })?;

        let categories: Vec<Category> = raws.into_iter().map(format_category).collect();
        let count = categories.len();
        self.state.write().categories = categories;
        self.notify(StoreEvent::CategoriesChanged);

        tracing::debug!(merchant_id = %self.merchant_id, count, "Categories loaded");
        Ok(count)
    }

    /// Select a category and fetch its products
    ///
    /// The selection changes when this is called, before the returned future
    /// is polled. The fetch result lands only if no later selection was made
    /// in the meantime; otherwise it resolves to [`FetchOutcome::Superseded`]
    /// without touching the store, whether the fetch succeeded or failed.
    pub fn select_category<'a>(
        &'a self,
        category_id: &str,
    ) -> impl Future<Output = OperationResult<FetchOutcome>> + Send + use<'a, G> {
        let fence = {
            let mut state = self.state.write();
            let fence = state.selection.select_category(category_id);
            state.products.clear();
            state.products_loading = true;
            fence
        };
        self.notify(StoreEvent::SelectionChanged);
        self.notify(StoreEvent::ProductsChanged);
        tracing::debug!(category_id = %fence.category_id, "Category selected");

        self.fetch_products(fence)
    }

    /// Clear the category selection and the product list
    pub fn clear_selection(&self) {
        {
            let mut state = self.state.write();
            state.selection.clear_category();
            state.products.clear();
            state.products_loading = false;
        }
        self.notify(StoreEvent::SelectionChanged);
        self.notify(StoreEvent::ProductsChanged);
    }

    /// Select a product of the current list, or clear the product selection
    pub fn select_product(&self, product_id: Option<&str>) -> OperationResult<()> {
        {
            let mut state = self.state.write();
            let listed = product_id.is_none_or(|id| state.products.iter().any(|p| p.id == id));
            if let (false, Some(id)) = (listed, product_id) {
                return Err(OperationError::new(
                    EntityKind::Product,
                    CatalogAction::Load,
                    shared::ErrorCode::ProductNotFound,
                    "product is not in the current list",
                )
                .with_target(id));
            }
            state.selection.select_product(product_id.map(str::to_string));
        }
        self.notify(StoreEvent::SelectionChanged);
        Ok(())
    }

    /// Refetch the products of the selected category
    ///
    /// Shares the fence of the current selection, so a selection made while
    /// this is in flight still wins.
    pub async fn refresh_products(&self) -> OperationResult<FetchOutcome> {
        let fence = {
            let mut state = self.state.write();
            match state.selection.current_fence() {
                Some(fence) => {
                    state.products_loading = true;
                    fence
                }
                None => return Ok(FetchOutcome::Applied(0)),
            }
        };
        self.fetch_products(fence).await
    }

    async fn fetch_products(&self, fence: FetchFence) -> OperationResult<FetchOutcome> {
        let result = self
            .gateway
            .list_products(&self.merchant_id, &fence.category_id)
            .await;

        let outcome = {
            let mut state = self.state.write();
            if !state.selection.admits(&fence) {
                None
            } else {
                state.products_loading = false;
                Some(result.map(|raws| {
                    state.products = format_products_for(&fence.category_id, raws);
                    state.products.len()
                }))
            }
        };

        match outcome {
            None => {
                tracing::debug!(category_id = %fence.category_id, "Discarded superseded product fetch");
                Ok(FetchOutcome::Superseded)
            }
            Some(Ok(count)) => {
                self.notify(StoreEvent::ProductsChanged);
                tracing::debug!(category_id = %fence.category_id, count, "Products loaded");
                Ok(FetchOutcome::Applied(count))
            }
            Some(Err(e)) => {
                self.notify(StoreEvent::ProductsChanged);
                tracing::error!(category_id = %fence.category_id, error = %e, "Failed to fetch products");
                Err(OperationError::from_client(EntityKind::Product, CatalogAction::Load, &e)
                    .with_target(fence.category_id))
            }
        }
    }

    // ========== Bulk import merge ==========

    /// Merge records returned by a bulk import
    ///
    /// Categories are matched by id or appended. Products are merged only
    /// into the list of the selected category: a matched product that moved
    /// to another category leaves the list, and new products of other
    /// categories are not listed.
    pub(crate) fn apply_import(&self, report: ImportReport) {
        match report {
            ImportReport::Categories {
                saved_categories, ..
            } => {
                let incoming = saved_categories.into_iter().map(format_category);
                let (replaced, appended) = merge_by_id(&mut self.state.write().categories, incoming);
                tracing::info!(replaced, appended, "Merged imported categories");
                self.notify(StoreEvent::CategoriesChanged);
            }
            ImportReport::Products {
                updated_products, ..
            } => {
                let (replaced, appended) = {
                    let mut state = self.state.write();
                    let Some(selected) = state.selection.category_id().map(str::to_string) else {
                        return;
                    };
                    // Import rows may omit the category; keep the one already listed
                    let (in_scope, moved): (Vec<Product>, Vec<Product>) = updated_products
                        .into_iter()
                        .map(|raw| {
                            let mut product = format_product(raw);
                            if product.category_id.is_empty() {
                                product.category_id = state
                                    .products
                                    .iter()
                                    .find(|p| p.id == product.id)
                                    .map(|p| p.category_id.clone())
                                    .unwrap_or_else(|| selected.clone());
                            }
                            product
                        })
                        .partition(|p| p.category_id == selected);
                    state
                        .products
                        .retain(|p| !moved.iter().any(|m| m.id == p.id));
                    merge_by_id(&mut state.products, in_scope)
                };
                tracing::info!(replaced, appended, "Merged imported products");
                self.notify(StoreEvent::ProductsChanged);
            }
        }
    }
}
