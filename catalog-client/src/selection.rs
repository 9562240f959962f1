//! Selection controller
//!
//! Product fetches are scoped to the selected category and resolve
//! asynchronously. Each fetch carries a [`FetchFence`] captured when it was
//! issued; its result may land only while that fence is still current.
//! Every category selection bumps a generation counter, so re-selecting
//! the same category also supersedes fetches issued before it.

/// Currently selected category and product
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    category_id: Option<String>,
    product_id: Option<String>,
    generation: u64,
}

/// Token captured at fetch start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFence {
    pub category_id: String,
    generation: u64,
}

impl Selection {
    pub fn category_id(&self) -> Option<&str> {
        self.category_id.as_deref()
    }

    pub fn product_id(&self) -> Option<&str> {
        self.product_id.as_deref()
    }

    /// Select a category and return the fence for its product fetch
    ///
    /// The selected product is cleared since it belonged to the previous list.
    pub fn select_category(&mut self, category_id: impl Into<String>) -> FetchFence {
        let category_id = category_id.into();
        self.generation += 1;
        self.category_id = Some(category_id.clone());
        self.product_id = None;
        FetchFence {
            category_id,
            generation: self.generation,
        }
    }

    /// Clear the category selection, superseding any in-flight fetch
    pub fn clear_category(&mut self) {
        self.generation += 1;
        self.category_id = None;
        self.product_id = None;
    }

    pub fn select_product(&mut self, product_id: Option<String>) {
        self.product_id = product_id;
    }

    /// Fence for a refetch of the current selection without superseding
    /// fetches already issued for it
    pub fn current_fence(&self) -> Option<FetchFence> {
        self.category_id.as_ref().map(|category_id| FetchFence {
            category_id: category_id.clone(),
            generation: self.generation,
        })
    }

    /// Whether a fetch issued under `fence` may still land
    pub fn admits(&self, fence: &FetchFence) -> bool {
        self.generation == fence.generation
            && self.category_id.as_deref() == Some(fence.category_id.as_str())
    }
}
