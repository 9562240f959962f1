//! Remote catalog gateway
//!
//! The gateway is the network boundary of the catalog store. Every method
//! returns raw wire records; the store formats them before they land.

mod http;

pub use self::http::HttpGateway;

use async_trait::async_trait;
use shared::models::{
    BulkTarget, CategoryFields, CategoryUpdate, FilePayload, ImportReport, ProductFields,
    ProductUpdate, RawCategory, RawProduct,
};

use crate::ClientResult;

/// Operations exposed by the remote catalog store
#[async_trait]
pub trait CatalogGateway: Send + Sync {
    // ========== Categories ==========

    async fn list_categories(&self, merchant_id: &str) -> ClientResult<Vec<RawCategory>>;

    async fn create_category(
        &self,
        merchant_id: &str,
        fields: &CategoryFields,
        images: &[FilePayload],
    ) -> ClientResult<RawCategory>;

    /// Edit a category. `update` carries the kept references and removal
    /// list; `images` are the new uploads.
    async fn update_category(
        &self,
        id: &str,
        update: &CategoryUpdate,
        images: &[FilePayload],
    ) -> ClientResult<RawCategory>;

    async fn delete_category(&self, id: &str) -> ClientResult<()>;

    async fn toggle_category_active(&self, id: &str) -> ClientResult<()>;

    async fn archive_category(&self, id: &str) -> ClientResult<()>;

    async fn unarchive_category(&self, id: &str) -> ClientResult<()>;

    // ========== Products ==========

    async fn list_products(
        &self,
        merchant_id: &str,
        category_id: &str,
    ) -> ClientResult<Vec<RawProduct>>;

    async fn create_product(
        &self,
        merchant_id: &str,
        category_id: &str,
        fields: &ProductFields,
        images: &[FilePayload],
    ) -> ClientResult<RawProduct>;

    async fn update_product(
        &self,
        id: &str,
        update: &ProductUpdate,
        images: &[FilePayload],
    ) -> ClientResult<RawProduct>;

    async fn delete_product(&self, id: &str) -> ClientResult<()>;

    /// Flip the active flag and return the canonical record
    async fn toggle_product_active(&self, id: &str) -> ClientResult<RawProduct>;

    async fn archive_product(&self, id: &str) -> ClientResult<()>;

    async fn unarchive_product(&self, id: &str) -> ClientResult<()>;

    // ========== Bulk ==========

    async fn import_catalog(
        &self,
        merchant_id: &str,
        target: BulkTarget,
        file: &FilePayload,
    ) -> ClientResult<ImportReport>;

    async fn export_catalog(&self, merchant_id: &str) -> ClientResult<FilePayload>;

    async fn download_template(&self) -> ClientResult<FilePayload>;
}
