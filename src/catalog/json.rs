use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use super::CatalogStore;
use crate::models::{Category, VideoRecord};
use crate::utils::Result;

/// On-disk layout: `{ categories: [{ category: { name }, contents: [...] }] }`
#[derive(Debug, Deserialize)]
struct CatalogFile {
    categories: Vec<CategoryEntry>,
}

#[derive(Debug, Deserialize)]
struct CategoryEntry {
    category: CategoryHeader,
    #[serde(default)]
    contents: Vec<VideoRecord>,
}

#[derive(Debug, Deserialize)]
struct CategoryHeader {
    name: String,
}

/// Catalog backed by a static JSON document
#[derive(Debug, Clone, Default)]
pub struct JsonCatalog {
    categories: Vec<Category>,
}

impl JsonCatalog {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(contents)?;
        let categories = file
            .categories
            .into_iter()
            .map(|entry| Category::new(entry.category.name, entry.contents))
            .collect::<Vec<_>>();

        debug!("Parsed catalog with {} categories", categories.len());
        Ok(Self { categories })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let catalog = Self::from_json(&contents)?;
        info!(
            "Loaded catalog from {:?}: {} categories, {} videos",
            path,
            catalog.categories.len(),
            catalog.categories.iter().map(|c| c.videos.len()).sum::<usize>()
        );
        Ok(catalog)
    }
}

impl CatalogStore for JsonCatalog {
    fn list_categories(&self) -> &[Category] {
        &self.categories
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MediaRef;

    const SAMPLE: &str = r#"{
        "categories": [
            {
                "category": { "name": "Movies" },
                "contents": [
                    { "title": "Big Buck Bunny", "mp4": "bbb.mp4", "thumbnailUrl": "bbb.jpg", "duration": "9:56" },
                    { "title": "Sintel", "mp4": "sintel.mp4", "thumbnailUrl": "sintel.jpg", "duration": "14:48" }
                ]
            },
            {
                "category": { "name": "Shorts" },
                "contents": [
                    { "title": "Blazes", "mp4": "blazes.mp4", "thumbnailUrl": "b.jpg", "duration": "0:15" }
                ]
            }
        ]
    }"#;

    #[test]
    fn parses_categories_in_order() {
        let catalog = JsonCatalog::from_json(SAMPLE).unwrap();
        let names: Vec<_> = catalog
            .list_categories()
            .iter()
            .map(|c| c.name.as_str())
            .collect();

        assert_eq!(names, vec!["Movies", "Shorts"]);
        assert_eq!(catalog.category("Movies").unwrap().videos.len(), 2);
    }

    #[test]
    fn related_videos_exclude_the_current_one() {
        let catalog = JsonCatalog::from_json(SAMPLE).unwrap();
        let related = catalog.related_videos("Movies", &MediaRef::new("bbb.mp4"));

        assert_eq!(related.len(), 1);
        assert_eq!(related[0].title, "Sintel");
    }

    #[test]
    fn unknown_category_has_no_related_videos() {
        let catalog = JsonCatalog::from_json(SAMPLE).unwrap();
        assert!(
            catalog
                .related_videos("Documentaries", &MediaRef::new("bbb.mp4"))
                .is_empty()
        );
    }

    #[test]
    fn missing_contents_defaults_to_empty() {
        let catalog =
            JsonCatalog::from_json(r#"{"categories":[{"category":{"name":"Empty"}}]}"#).unwrap();
        assert!(catalog.category("Empty").unwrap().videos.is_empty());
    }

    #[test]
    fn malformed_document_is_a_serialization_error() {
        let err = JsonCatalog::from_json("{\"categories\": 3}").unwrap_err();
        assert!(matches!(err, crate::utils::AppError::Serialization(_)));
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("videos.json");
        std::fs::write(&path, SAMPLE).unwrap();

        let catalog = JsonCatalog::load(&path).unwrap();
        assert_eq!(catalog.list_categories().len(), 2);
    }
}
