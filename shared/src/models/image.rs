//! Image and file payload models
//!
//! An editable image list mixes images already stored by the gateway
//! (referenced by locator) with new uploads. [`ImageSource`] keeps the two
//! apart from the moment the list is built.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary file content awaiting upload, or a file returned by the gateway
#[derive(Clone, PartialEq, Eq)]
pub struct FilePayload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl FilePayload {
    /// Create a payload, guessing the content type from the file name
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        let file_name = file_name.into();
        let content_type = mime_guess::from_path(&file_name)
            .first_or_octet_stream()
            .to_string();
        Self {
            file_name,
            content_type,
            bytes: bytes.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }
}

impl fmt::Debug for FilePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilePayload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// One entry of an editable image list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Image already persisted by the gateway
    Reference(String),
    /// New image content to upload
    Payload(FilePayload),
}

impl ImageSource {
    pub fn reference(locator: impl Into<String>) -> Self {
        Self::Reference(locator.into())
    }

    pub fn as_reference(&self) -> Option<&str> {
        match self {
            Self::Reference(locator) => Some(locator),
            Self::Payload(_) => None,
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, Self::Reference(_))
    }
}

impl From<FilePayload> for ImageSource {
    fn from(payload: FilePayload) -> Self {
        Self::Payload(payload)
    }
}

/// Images split for transmission on edit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageDiff {
    /// References kept on the entity, in their original order
    pub existing: Vec<String>,
    /// New content to upload
    pub pending: Vec<FilePayload>,
    /// References whose stored assets the gateway should delete
    pub removed: Vec<String>,
}

impl ImageDiff {
    pub fn is_unchanged(&self) -> bool {
        self.pending.is_empty() && self.removed.is_empty()
    }
}

/// Serialized image fields sent alongside an edit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageChanges {
    pub existing_images: Vec<String>,
    pub images_to_remove: Vec<String>,
}

impl From<&ImageDiff> for ImageChanges {
    fn from(diff: &ImageDiff) -> Self {
        Self {
            existing_images: diff.existing.clone(),
            images_to_remove: diff.removed.clone(),
        }
    }
}
