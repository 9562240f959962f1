//! Bulk import/export models

use super::{RawCategory, RawProduct};
use serde::{Deserialize, Serialize};

/// Which collection a spreadsheet import targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkTarget {
    Categories,
    Products,
}

impl BulkTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Categories => "categories",
            Self::Products => "products",
        }
    }
}

impl std::fmt::Display for BulkTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Bulk job lifecycle status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkJobStatus {
    #[default]
    Idle,
    /// Idle with a file selected
    Selected,
    Uploading,
    Success,
    Error,
}

impl BulkJobStatus {
    /// A new file may be selected in every state except while uploading
    pub fn accepts_file(&self) -> bool {
        !matches!(self, Self::Uploading)
    }
}

/// Import result as returned by the gateway
///
/// Category imports report `{count, savedCategories}`; product imports report
/// `{updatedCount, updatedProducts}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImportReport {
    Categories {
        count: u32,
        #[serde(rename = "savedCategories")]
        saved_categories: Vec<RawCategory>,
    },
    Products {
        #[serde(rename = "updatedCount")]
        updated_count: u32,
        #[serde(rename = "updatedProducts")]
        updated_products: Vec<RawProduct>,
    },
}

impl ImportReport {
    pub fn count(&self) -> u32 {
        match self {
            Self::Categories { count, .. } => *count,
            Self::Products { updated_count, .. } => *updated_count,
        }
    }

    pub fn target(&self) -> BulkTarget {
        match self {
            Self::Categories { .. } => BulkTarget::Categories,
            Self::Products { .. } => BulkTarget::Products,
        }
    }
}
