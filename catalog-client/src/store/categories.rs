//! Category operations

use shared::models::{Category, CategoryDraft, CategoryPatch, CategoryUpdate, Product};
use shared::util::non_blank;
use validator::Validate;

use super::{CatalogState, CatalogStore};
use crate::events::StoreEvent;
use crate::formatter::format_category;
use crate::gateway::CatalogGateway;
use crate::images::partition_images;
use crate::mutation::{OptimisticMutation, run_optimistic};
use crate::outcome::{CatalogAction, EntityKind, OperationError, OperationResult};

/// Remove a category and, locally, every product under it
struct DeleteCategory<'a> {
    id: &'a str,
}

impl OptimisticMutation<CatalogState> for DeleteCategory<'_> {
    type Snapshot = (Vec<Category>, Vec<Product>);

    fn snapshot(&self, state: &CatalogState) -> Self::Snapshot {
        (state.categories.clone(), state.products.clone())
    }

    fn apply(&self, state: &mut CatalogState) {
        state.categories.retain(|c| c.id != self.id);
        state.products.retain(|p| p.category_id != self.id);
    }

    fn commit(&self, state: &mut CatalogState) {
        if state.selection.category_id() == Some(self.id) {
            state.selection.clear_category();
            state.products.clear();
            state.products_loading = false;
        }
    }

    fn rollback(&self, state: &mut CatalogState, (categories, products): Self::Snapshot) {
        state.categories = categories;
        state.products = products;
    }
}

/// Flip a category's active flag
struct ToggleCategoryActive<'a> {
    id: &'a str,
}

impl OptimisticMutation<CatalogState> for ToggleCategoryActive<'_> {
    type Snapshot = ();

    fn snapshot(&self, _state: &CatalogState) {}

    fn apply(&self, state: &mut CatalogState) {
        self.flip(state);
    }

    fn rollback(&self, state: &mut CatalogState, _: ()) {
        self.flip(state);
    }
}

impl ToggleCategoryActive<'_> {
    fn flip(&self, state: &mut CatalogState) {
        if let Some(category) = state.categories.iter_mut().find(|c| c.id == self.id) {
            category.active = !category.active;
        }
    }
}

impl<G: CatalogGateway> CatalogStore<G> {
    /// Create a category; on success it is appended and selected
    pub async fn create_category(&self, draft: CategoryDraft) -> OperationResult<Category> {
        draft
            .validate()
            .map_err(|e| OperationError::validation(EntityKind::Category, CatalogAction::Create, e))?;

        let fields = draft.fields();
        let raw = self
            .gateway
            .create_category(&self.merchant_id, &fields, &draft.images)
            .await
            .map_err(|e| {
                tracing::error!(name = %fields.name, error = %e, "Failed to create category");
                OperationError::from_client(EntityKind::Category, CatalogAction::Create, &e)
                    .with_target(fields.name.clone())
            })?;

        let category = format_category(raw);
        {
            let mut state = self.state.write();
            state.categories.push(category.clone());
            // A new category has no products yet
            state.selection.select_category(category.id.clone());
            state.products.clear();
            state.products_loading = false;
        }
        self.notify_all(&[
            StoreEvent::CategoriesChanged,
            StoreEvent::SelectionChanged,
            StoreEvent::ProductsChanged,
        ]);

        tracing::info!(category_id = %category.id, name = %category.name, "Category created");
        Ok(category)
    }

    /// Edit a category; the local entity changes only once the gateway confirms
    pub async fn edit_category(&self, id: &str, patch: CategoryPatch) -> OperationResult<Category> {
        patch
            .validate()
            .map_err(|e| {
                OperationError::validation(EntityKind::Category, CatalogAction::Update, e).with_target(id)
            })?;
        let current = self
            .category(id)
            .ok_or_else(|| OperationError::not_found(EntityKind::Category, CatalogAction::Update, id))?;

        let images = patch.images.unwrap_or_else(|| current.image_sources());
        let diff = partition_images(&images, &patch.images_to_remove);
        let update = CategoryUpdate {
            name: patch.name.map(|n| n.trim().to_string()),
            description: patch.description.map(|d| non_blank(Some(&d)).unwrap_or_default()),
            availability: patch.availability.map(|a| a.normalized()),
            images: (&diff).into(),
        };

        let raw = self
            .gateway
            .update_category(id, &update, &diff.pending)
            .await
            .map_err(|e| {
                tracing::error!(category_id = %id, error = %e, "Failed to update category");
                OperationError::from_client(EntityKind::Category, CatalogAction::Update, &e).with_target(id)
            })?;

        let category = format_category(raw);
        {
            let mut state = self.state.write();
            if let Some(slot) = state.categories.iter_mut().find(|c| c.id == category.id) {
                *slot = category.clone();
            }
        }
        self.notify(StoreEvent::CategoriesChanged);

        tracing::info!(
            category_id = %category.id,
            uploaded = diff.pending.len(),
            removed = diff.removed.len(),
            "Category updated"
        );
        Ok(category)
    }

    /// Delete a category and its products, restoring both lists if the gateway fails
    pub async fn delete_category(&self, id: &str) -> OperationResult<()> {
        if self.category(id).is_none() {
            return Err(OperationError::not_found(EntityKind::Category, CatalogAction::Delete, id));
        }

        let events = [
            StoreEvent::CategoriesChanged,
            StoreEvent::ProductsChanged,
            StoreEvent::SelectionChanged,
        ];
        run_optimistic(
            &self.state,
            &DeleteCategory { id },
            self.gateway.delete_category(id),
            self.phase_notifier(&events),
        )
        .await
        .map_err(|e| {
            tracing::warn!(category_id = %id, error = %e, "Category delete failed, rolled back");
            OperationError::from_client(EntityKind::Category, CatalogAction::Delete, &e).with_target(id)
        })?;

        tracing::info!(category_id = %id, "Category deleted");
        Ok(())
    }

    /// Flip a category's active flag optimistically; returns the new value
    pub async fn toggle_category_active(&self, id: &str) -> OperationResult<bool> {
        if self.category(id).is_none() {
            return Err(OperationError::not_found(
                EntityKind::Category,
                CatalogAction::ToggleActive,
                id,
            ));
        }

        let events = [StoreEvent::CategoriesChanged];
        run_optimistic(
            &self.state,
            &ToggleCategoryActive { id },
            self.gateway.toggle_category_active(id),
            self.phase_notifier(&events),
        )
        .await
        .map_err(|e| {
            tracing::warn!(category_id = %id, error = %e, "Category toggle failed, flipped back");
            OperationError::from_client(EntityKind::Category, CatalogAction::ToggleActive, &e)
                .with_target(id)
        })?;

        let active = self.category(id).is_some_and(|c| c.active);
        tracing::info!(category_id = %id, active, "Category active toggled");
        Ok(active)
    }

    /// Archive a category, then refetch the category list
    pub async fn archive_category(&self, id: &str) -> OperationResult<usize> {
        self.change_category_archive(id, true).await
    }

    /// Unarchive a category, then refetch the category list
    pub async fn unarchive_category(&self, id: &str) -> OperationResult<usize> {
        self.change_category_archive(id, false).await
    }

    async fn change_category_archive(
        &self,
        id: &str,
        archived: bool,
    ) -> OperationResult<usize> {
        let (action, result) = if archived {
            (CatalogAction::Archive, self.gateway.archive_category(id).await)
        } else {
            (CatalogAction::Unarchive, self.gateway.unarchive_category(id).await)
        };
        result.map_err(|e| {
            tracing::error!(category_id = %id, archived, error = %e, "Category archive change failed");
            OperationError::from_client(EntityKind::Category, action, &e).with_target(id)
        })?;

        tracing::info!(category_id = %id, archived, "Category archive state changed, refetching");
        self.fetch_categories(CatalogAction::Refresh)
            .await
            .map_err(|e| e.with_target(id))
    }
}
