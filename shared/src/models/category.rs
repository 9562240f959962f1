//! Category Model

use super::{
    Availability, AvailabilityFields, EntityStatus, FilePayload, ImageChanges, ImageSource,
    validation_error,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Category entity, as held by the catalog store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub active: bool,
    /// Soft-removed from default views; independent of `active`
    pub archived: bool,
    pub availability: Availability,
    /// Persisted image locators
    pub images: Vec<String>,
    /// Maintained by the gateway, never recomputed locally
    pub product_count: u32,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Category {
    pub fn status(&self) -> EntityStatus {
        EntityStatus::from_active(self.active)
    }

    /// Current images as an editable list
    pub fn image_sources(&self) -> Vec<ImageSource> {
        self.images.iter().cloned().map(ImageSource::Reference).collect()
    }
}

/// Create category input
#[derive(Debug, Clone, Validate)]
#[validate(schema(function = "validate_category_draft"))]
pub struct CategoryDraft {
    #[validate(length(min = 1, max = 120, message = "name must be 1-120 characters"))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub availability: AvailabilityFields,
    pub active: bool,
    /// Images to upload with the new category
    pub images: Vec<FilePayload>,
}

impl CategoryDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            availability: AvailabilityFields::always(),
            active: true,
            images: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_availability(mut self, availability: AvailabilityFields) -> Self {
        self.availability = availability;
        self
    }

    pub fn with_image(mut self, image: FilePayload) -> Self {
        self.images.push(image);
        self
    }

    /// Wire fields with availability normalized to the chosen mode
    pub fn fields(&self) -> CategoryFields {
        CategoryFields {
            name: self.name.trim().to_string(),
            description: self.description.clone(),
            active: self.active,
            availability: self.availability.normalized(),
        }
    }
}

fn validate_category_draft(draft: &CategoryDraft) -> Result<(), ValidationError> {
    if draft.name.trim().is_empty() {
        return Err(validation_error("name_blank", "name must not be blank".into()));
    }
    draft.availability.check()?;
    check_images(&draft.images)
}

pub(crate) fn check_images(images: &[FilePayload]) -> Result<(), ValidationError> {
    if let Some(bad) = images.iter().find(|p| !p.is_image() || p.is_empty()) {
        return Err(validation_error(
            "image_invalid",
            format!("{} is not a valid image upload", bad.file_name),
        ));
    }
    Ok(())
}

/// Category fields transmitted on create
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryFields {
    pub name: String,
    pub description: Option<String>,
    pub active: bool,
    #[serde(flatten)]
    pub availability: AvailabilityFields,
}

/// Edit category input
///
/// `images` is the full editable list; `None` keeps the current images.
#[derive(Debug, Clone, Default, Validate)]
#[validate(schema(function = "validate_category_patch"))]
pub struct CategoryPatch {
    #[validate(length(min = 1, max = 120, message = "name must be 1-120 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub availability: Option<AvailabilityFields>,
    pub images: Option<Vec<ImageSource>>,
    pub images_to_remove: Vec<String>,
}

fn validate_category_patch(patch: &CategoryPatch) -> Result<(), ValidationError> {
    if patch.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(validation_error("name_blank", "name must not be blank".into()));
    }
    if let Some(availability) = &patch.availability {
        availability.check()?;
    }
    let uploads: Vec<FilePayload> = patch
        .images
        .iter()
        .flatten()
        .filter_map(|s| match s {
            ImageSource::Payload(p) => Some(p.clone()),
            ImageSource::Reference(_) => None,
        })
        .collect();
    check_images(&uploads)
}

/// Category fields transmitted on edit, alongside the pending uploads
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub availability: Option<AvailabilityFields>,
    #[serde(flatten)]
    pub images: ImageChanges,
}
