//! Shared types for the catalog console
//!
//! Data model for categories, products and bulk jobs, plus the unified
//! error system used by the client crate and any presentation layer.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
