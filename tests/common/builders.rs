use reelcast::catalog::JsonCatalog;
use reelcast::models::{Category, VideoRecord};

/// Builds a catalog category by category
#[derive(Default)]
pub struct CatalogBuilder {
    categories: Vec<Category>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a category whose videos are `<name>.mp4`, each ten minutes long
    pub fn category(mut self, name: &str, videos: &[&str]) -> Self {
        let videos = videos.iter().map(|title| video(title)).collect();
        self.categories.push(Category::new(name, videos));
        self
    }

    pub fn build(self) -> JsonCatalog {
        JsonCatalog::new(self.categories)
    }
}

pub fn video(title: &str) -> VideoRecord {
    VideoRecord::new(title, format!("{}.mp4", title))
        .with_thumbnail(format!("https://img.example.com/{}.jpg", title))
        .with_duration_label("10:00")
}
