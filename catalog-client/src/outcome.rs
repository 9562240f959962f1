//! Structured operation outcomes
//!
//! Gateway failures never escape the store as transport errors. Each
//! operation reports an [`OperationError`] naming the entity and action that
//! failed, which a presentation layer can show as-is.

use shared::{ApiResponse, AppError, ErrorCode};
use std::fmt;

use crate::ClientError;

/// Entity an operation acts on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Category,
    Product,
    Catalog,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Product => "product",
            Self::Catalog => "catalog",
        }
    }
}

/// Action attempted by an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogAction {
    Load,
    Create,
    Update,
    Delete,
    ToggleActive,
    Archive,
    Unarchive,
    Refresh,
    Import,
    Export,
    DownloadTemplate,
}

impl CatalogAction {
    /// Verb used in failure messages
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::ToggleActive => "toggle",
            Self::Archive => "archive",
            Self::Unarchive => "unarchive",
            Self::Refresh => "refresh",
            Self::Import => "import",
            Self::Export => "export",
            Self::DownloadTemplate => "download template for",
        }
    }
}

/// Failure of a store or bulk operation
#[derive(Debug, Clone, PartialEq)]
pub struct OperationError {
    pub entity: EntityKind,
    pub action: CatalogAction,
    pub target: Option<String>,
    pub code: ErrorCode,
    pub message: String,
}

impl OperationError {
    pub fn new(
        entity: EntityKind,
        action: CatalogAction,
        code: ErrorCode,
        message: impl Into<String>,
    ) -> Self {
        Self {
            entity,
            action,
            target: None,
            code,
            message: message.into(),
        }
    }

    /// Build from a client error raised by the gateway or by validation
    pub fn from_client(entity: EntityKind, action: CatalogAction, err: &ClientError) -> Self {
        Self::new(entity, action, err.error_code(), err.user_message())
    }

    /// Input rejected before any gateway call
    pub fn validation(
        entity: EntityKind,
        action: CatalogAction,
        errors: validator::ValidationErrors,
    ) -> Self {
        let app = AppError::from(errors);
        Self::new(entity, action, app.code, app.message)
    }

    pub fn not_found(entity: EntityKind, action: CatalogAction, id: &str) -> Self {
        let code = match entity {
            EntityKind::Category => ErrorCode::CategoryNotFound,
            EntityKind::Product => ErrorCode::ProductNotFound,
            EntityKind::Catalog => ErrorCode::NotFound,
        };
        Self::new(entity, action, code, format!("{} is not loaded", entity.as_str())).with_target(id)
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }
}

impl fmt::Display for OperationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failed to {} {}", self.action.verb(), self.entity.as_str())?;
        if let Some(target) = &self.target {
            write!(f, " {target}")?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for OperationError {}

impl From<OperationError> for AppError {
    fn from(err: OperationError) -> Self {
        let mut app = AppError::with_message(err.code, err.to_string())
            .with_detail("entity", err.entity.as_str())
            .with_detail("action", err.action.verb());
        if let Some(target) = err.target {
            app = app.with_detail("target", target);
        }
        app
    }
}

/// Result of a store or bulk operation
pub type OperationResult<T> = Result<T, OperationError>;

/// Convert an operation result into the envelope handed to a presentation layer
pub fn into_response<T>(result: OperationResult<T>) -> ApiResponse<T> {
    match result {
        Ok(data) => ApiResponse::success(data),
        Err(err) => ApiResponse::error(&AppError::from(err)),
    }
}
