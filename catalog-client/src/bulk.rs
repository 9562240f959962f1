//! Bulk job runner
//!
//! Drives spreadsheet import and export. A job moves
//! `Idle -> Selected -> Uploading -> Success | Error`; export and template
//! downloads skip the file selection. Import results are merged into the
//! catalog store by id, matching or appending.

use parking_lot::Mutex;
use shared::ErrorCode;
use shared::models::{BulkJobStatus, BulkTarget, Category, FilePayload, ImportReport, Product};
use std::sync::Arc;

use crate::events::StoreEvent;
use crate::gateway::CatalogGateway;
use crate::outcome::{CatalogAction, EntityKind, OperationError, OperationResult};
use crate::store::CatalogStore;

// =============================================================================
// Match-or-append merge
// =============================================================================

/// Entities merged by identity
pub trait Identified {
    fn id(&self) -> &str;
}

impl Identified for Category {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for Product {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Replace entries with a matching id in place, append the rest
///
/// Records are applied in order, so a later duplicate in `incoming`
/// overwrites an earlier one. Returns `(replaced, appended)`.
pub fn merge_by_id<T: Identified>(
    target: &mut Vec<T>,
    incoming: impl IntoIterator<Item = T>,
) -> (usize, usize) {
    let mut replaced = 0;
    let mut appended = 0;
    for item in incoming {
        match target.iter().position(|t| t.id() == item.id()) {
            Some(index) => {
                target[index] = item;
                replaced += 1;
            }
            None => {
                target.push(item);
                appended += 1;
            }
        }
    }
    (replaced, appended)
}

// =============================================================================
// Job state
// =============================================================================

/// Transient state of the bulk dialog
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkJob {
    pub status: BulkJobStatus,
    pub message: Option<String>,
    pub target: Option<BulkTarget>,
    /// Present only while selected or uploading
    pub file: Option<FilePayload>,
}

fn busy(action: CatalogAction) -> OperationError {
    OperationError::new(
        EntityKind::Catalog,
        action,
        ErrorCode::BulkJobBusy,
        "a bulk job is already running",
    )
}

#[derive(Debug, Clone, Copy)]
enum Download {
    Export,
    Template,
}

impl Download {
    fn action(self) -> CatalogAction {
        match self {
            Self::Export => CatalogAction::Export,
            Self::Template => CatalogAction::DownloadTemplate,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Export => "Export",
            Self::Template => "Template download",
        }
    }
}

pub struct BulkJobRunner<G> {
    store: Arc<CatalogStore<G>>,
    job: Mutex<BulkJob>,
}

impl<G: CatalogGateway> BulkJobRunner<G> {
    pub fn new(store: Arc<CatalogStore<G>>) -> Self {
        Self {
            store,
            job: Mutex::new(BulkJob::default()),
        }
    }

    pub fn job(&self) -> BulkJob {
        self.job.lock().clone()
    }

    pub fn status(&self) -> BulkJobStatus {
        self.job.lock().status
    }

    fn set(&self, job: BulkJob) {
        let status = job.status;
        *self.job.lock() = job;
        self.store.notify(StoreEvent::BulkJobChanged(status));
    }

    /// Select the spreadsheet to import; rejected while uploading
    pub fn select_file(&self, target: BulkTarget, file: FilePayload) -> OperationResult<()> {
        if !self.status().accepts_file() {
            return Err(busy(CatalogAction::Import));
        }
        tracing::debug!(%target, file_name = %file.file_name, size = file.len(), "Bulk file selected");
        self.set(BulkJob {
            status: BulkJobStatus::Selected,
            message: None,
            target: Some(target),
            file: Some(file),
        });
        Ok(())
    }

    /// Return to idle, dropping any selected file; rejected while uploading
    pub fn dismiss(&self) -> OperationResult<()> {
        if self.status() == BulkJobStatus::Uploading {
            return Err(busy(CatalogAction::Import));
        }
        self.set(BulkJob::default());
        Ok(())
    }

    /// Upload the selected file and merge the returned records into the store
    ///
    /// All or nothing: on failure the store is left untouched.
    pub async fn submit_import(&self) -> OperationResult<ImportReport> {
        let (target, file) = {
            let mut job = self.job.lock();
            match (job.status, job.target, job.file.clone()) {
                (BulkJobStatus::Selected, Some(target), Some(file)) => {
                    job.status = BulkJobStatus::Uploading;
                    job.message = None;
                    (target, file)
                }
                (BulkJobStatus::Uploading, ..) => return Err(busy(CatalogAction::Import)),
                _ => {
                    return Err(OperationError::new(
                        EntityKind::Catalog,
                        CatalogAction::Import,
                        ErrorCode::NoFileSelected,
                        "no spreadsheet selected",
                    ));
                }
            }
        };
        self.store.notify(StoreEvent::BulkJobChanged(BulkJobStatus::Uploading));

        tracing::info!(%target, file_name = %file.file_name, "Importing spreadsheet");
        let result = self
            .store
            .gateway()
            .import_catalog(self.store.merchant_id(), target, &file)
            .await;

        match result {
            Ok(report) => {
                let message = match &report {
                    ImportReport::Categories { count, .. } => format!("Imported {count} categories"),
                    ImportReport::Products { updated_count, .. } => {
                        format!("Updated {updated_count} products")
                    }
                };
                self.store.apply_import(report.clone());
                tracing::info!(%target, count = report.count(), "Import finished");
                self.set(BulkJob {
                    status: BulkJobStatus::Success,
                    message: Some(message),
                    target: Some(target),
                    file: None,
                });
                Ok(report)
            }
            Err(e) => {
                tracing::error!(%target, error = %e, "Import failed");
                self.set(BulkJob {
                    status: BulkJobStatus::Error,
                    message: Some(format!("Import failed: {}", e.user_message())),
                    target: Some(target),
                    file: None,
                });
                Err(OperationError::from_client(EntityKind::Catalog, CatalogAction::Import, &e))
            }
        }
    }

    /// Export the merchant's catalog as a spreadsheet
    pub async fn export(&self) -> OperationResult<FilePayload> {
        self.download(Download::Export).await
    }

    /// Download the empty import template
    pub async fn download_template(&self) -> OperationResult<FilePayload> {
        self.download(Download::Template).await
    }

    /// Downloads start from a job without a pending import; a selected file
    /// must be submitted or dismissed first.
    async fn download(&self, kind: Download) -> OperationResult<FilePayload> {
        {
            let mut job = self.job.lock();
            match job.status {
                BulkJobStatus::Uploading => return Err(busy(kind.action())),
                BulkJobStatus::Selected => {
                    return Err(OperationError::new(
                        EntityKind::Catalog,
                        kind.action(),
                        ErrorCode::BulkJobBusy,
                        "an import file is selected; submit or dismiss it first",
                    ));
                }
                _ => {}
            }
            *job = BulkJob {
                status: BulkJobStatus::Uploading,
                ..BulkJob::default()
            };
        }
        self.store.notify(StoreEvent::BulkJobChanged(BulkJobStatus::Uploading));

        let gateway = self.store.gateway();
        let result = match kind {
            Download::Export => gateway.export_catalog(self.store.merchant_id()).await,
            Download::Template => gateway.download_template().await,
        };

        let label = kind.label();
        match result {
            Ok(file) => {
                tracing::info!(file_name = %file.file_name, size = file.len(), "{label} finished");
                let message = match kind {
                    Download::Export => format!("Exported {}", file.file_name),
                    Download::Template => format!("Downloaded {}", file.file_name),
                };
                self.set(BulkJob {
                    status: BulkJobStatus::Success,
                    message: Some(message),
                    ..BulkJob::default()
                });
                Ok(file)
            }
            Err(e) => {
                tracing::error!(error = %e, "{label} failed");
                self.set(BulkJob {
                    status: BulkJobStatus::Error,
                    message: Some(format!("{label} failed: {}", e.user_message())),
                    ..BulkJob::default()
                });
                Err(OperationError::from_client(EntityKind::Catalog, kind.action(), &e))
            }
        }
    }
}
