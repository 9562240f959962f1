//! Data models
//!
//! Entities (`Category`, `Product`) are what the catalog store holds; `Raw*`
//! records are what the gateway returns; drafts and patches are form input.

pub mod availability;
pub mod bulk;
pub mod category;
pub mod image;
pub mod product;
pub mod raw;
pub mod serde_helpers;
pub mod status;

// Re-exports
pub use availability::*;
pub use bulk::*;
pub use category::*;
pub use image::*;
pub use product::*;
pub use raw::*;
pub use status::*;

use std::borrow::Cow;
use validator::ValidationError;

pub(crate) fn validation_error(code: &'static str, message: String) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Owned(message));
    error
}
