//! Request and response types for the drive service

use serde::{Deserialize, Serialize};

use platform_listing::{ListingFlags, ProductReference, ResourceId};

/// Request to create a drive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateDriveRequest {
    /// Product that will back the drive
    pub product: ProductReference,
}

impl CreateDriveRequest {
    /// Create a request for `product`.
    pub fn new(product: ProductReference) -> Self {
        Self { product }
    }
}

/// Request for one page of drives.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BrowseRequest {
    /// Filter, hide and include flags
    pub flags: ListingFlags,

    /// Requested page size; absent or zero means the service default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items_per_page: Option<usize>,

    /// Cursor returned as `next` by the previous page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

impl BrowseRequest {
    /// First page with the given flags.
    pub fn new(flags: ListingFlags) -> Self {
        Self {
            flags,
            ..Default::default()
        }
    }

    /// Set the page size.
    pub fn items_per_page(mut self, items: usize) -> Self {
        self.items_per_page = Some(items);
        self
    }

    /// Continue from a previous page's cursor.
    pub fn next(mut self, cursor: Option<String>) -> Self {
        self.next = cursor;
        self
    }

    /// Decode the cursor into the last id already returned.
    pub(crate) fn after(&self) -> Result<Option<ResourceId>, String> {
        match self.next.as_deref() {
            None | Some("") => Ok(None),
            Some(raw) => raw
                .parse()
                .map(Some)
                .map_err(|_| format!("invalid cursor: {:?}", raw)),
        }
    }
}

/// One page of results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Page<T> {
    /// Page size used
    pub items_per_page: usize,

    /// Items on this page
    pub items: Vec<T>,

    /// Cursor for the following page, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

impl<T> Page<T> {
    /// Whether more pages follow.
    pub fn has_more(&self) -> bool {
        self.next.is_some()
    }
}
