//! Store change notifications

use shared::models::BulkJobStatus;

/// Broadcast to observers after the store's state changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    CategoriesChanged,
    ProductsChanged,
    SelectionChanged,
    BulkJobChanged(BulkJobStatus),
}

/// Channel capacity; slow observers see `RecvError::Lagged` and should re-read the snapshot
pub(crate) const EVENT_CAPACITY: usize = 64;
