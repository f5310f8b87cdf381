//! Read-only category listing the player browses and auto-advances through.

mod json;

pub use json::JsonCatalog;

use crate::models::{Category, MediaRef, VideoRecord};

/// Source of the category → videos listing, loaded once at startup
pub trait CatalogStore: Send + Sync {
    /// All categories in display order
    fn list_categories(&self) -> &[Category];

    /// Find a category by name
    fn category(&self, name: &str) -> Option<&Category> {
        self.list_categories().iter().find(|c| c.name == name)
    }

    /// Videos in `category` other than `current`, in catalog order.
    /// Empty when the category is unknown.
    fn related_videos(&self, category: &str, current: &MediaRef) -> Vec<VideoRecord> {
        self.category(category)
            .map(|c| c.related_to(current))
            .unwrap_or_default()
    }
}
