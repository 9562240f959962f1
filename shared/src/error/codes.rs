//! Unified error codes for the catalog console
//!
//! Error codes are organized by range:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 6xxx: Catalog errors (60xx category, 61xx product, 62xx image, 63xx bulk job)
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Represented as u16 on the wire so the same values work for the remote
/// gateway envelope and any presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,
    /// Operation not allowed in the current state
    InvalidState = 9,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Session has expired
    SessionExpired = 1005,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,

    // ==================== 6xxx: Catalog ====================
    /// Category not found
    CategoryNotFound = 6001,
    /// Category name already exists
    CategoryNameExists = 6002,
    /// Category still has products
    CategoryHasProducts = 6003,
    /// Category is archived
    CategoryArchived = 6004,
    /// Product not found
    ProductNotFound = 6101,
    /// Product price is invalid
    ProductInvalidPrice = 6102,
    /// Product order quantity bounds are invalid
    ProductInvalidOrderQty = 6103,
    /// Product references a category that is not loaded
    ProductCategoryMissing = 6104,
    /// Image upload failed
    ImageUploadFailed = 6201,
    /// Image payload is invalid
    ImageInvalid = 6202,
    /// A bulk job is already running
    BulkJobBusy = 6301,
    /// Spreadsheet import failed
    ImportFailed = 6302,
    /// Spreadsheet export failed
    ExportFailed = 6303,
    /// No file selected for import
    NoFileSelected = 6304,
    /// Spreadsheet content is invalid
    InvalidSpreadsheet = 6305,

    // ==================== 9xxx: System ====================
    /// Internal error
    InternalError = 9001,
    /// Network error
    NetworkError = 9003,
    /// Request timed out
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
    /// Remote service unavailable
    ServiceUnavailable = 9006,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",
            ErrorCode::InvalidState => "Operation not allowed in the current state",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::SessionExpired => "Session has expired",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",

            // Catalog
            ErrorCode::CategoryNotFound => "Category not found",
            ErrorCode::CategoryNameExists => "Category name already exists",
            ErrorCode::CategoryHasProducts => "Category still has products",
            ErrorCode::CategoryArchived => "Category is archived",
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::ProductInvalidPrice => "Product price must not be negative",
            ErrorCode::ProductInvalidOrderQty => "Minimum order quantity exceeds maximum",
            ErrorCode::ProductCategoryMissing => "Product category is not loaded",
            ErrorCode::ImageUploadFailed => "Image upload failed",
            ErrorCode::ImageInvalid => "Image payload is invalid",
            ErrorCode::BulkJobBusy => "A bulk job is already running",
            ErrorCode::ImportFailed => "Spreadsheet import failed",
            ErrorCode::ExportFailed => "Spreadsheet export failed",
            ErrorCode::NoFileSelected => "No file selected",
            ErrorCode::InvalidSpreadsheet => "Spreadsheet content is invalid",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Request timed out",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::ServiceUnavailable => "Service unavailable",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),
            9 => Ok(ErrorCode::InvalidState),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::SessionExpired),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),

            // Catalog
            6001 => Ok(ErrorCode::CategoryNotFound),
            6002 => Ok(ErrorCode::CategoryNameExists),
            6003 => Ok(ErrorCode::CategoryHasProducts),
            6004 => Ok(ErrorCode::CategoryArchived),
            6101 => Ok(ErrorCode::ProductNotFound),
            6102 => Ok(ErrorCode::ProductInvalidPrice),
            6103 => Ok(ErrorCode::ProductInvalidOrderQty),
            6104 => Ok(ErrorCode::ProductCategoryMissing),
            6201 => Ok(ErrorCode::ImageUploadFailed),
            6202 => Ok(ErrorCode::ImageInvalid),
            6301 => Ok(ErrorCode::BulkJobBusy),
            6302 => Ok(ErrorCode::ImportFailed),
            6303 => Ok(ErrorCode::ExportFailed),
            6304 => Ok(ErrorCode::NoFileSelected),
            6305 => Ok(ErrorCode::InvalidSpreadsheet),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),
            9006 => Ok(ErrorCode::ServiceUnavailable),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
