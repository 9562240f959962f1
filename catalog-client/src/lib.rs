//! Catalog Client - catalog synchronization engine
//!
//! Keeps a merchant's categories and products in step with the remote
//! catalog gateway: optimistic deletes and toggles with rollback, fenced
//! product fetches, image diff uploads and spreadsheet bulk jobs.

pub mod bulk;
pub mod config;
pub mod error;
pub mod events;
pub mod formatter;
pub mod gateway;
pub mod images;
pub mod logger;
pub mod mutation;
pub mod outcome;
pub mod selection;
pub mod store;

pub use bulk::{BulkJob, BulkJobRunner, merge_by_id};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use events::StoreEvent;
pub use formatter::{format_category, format_product, format_products_for};
pub use gateway::{CatalogGateway, HttpGateway};
pub use images::partition_images;
pub use outcome::{CatalogAction, EntityKind, OperationError, OperationResult, into_response};
pub use store::{CatalogSnapshot, CatalogStore, FetchOutcome};

// Re-export shared types for convenience
pub use shared::models;
pub use shared::{ApiResponse, AppError, ErrorCode};
