use serde::{Deserialize, Serialize};

use super::MediaRef;
use crate::utils::parse_time_label;

/// A playable video as listed in the catalog.
///
/// Field names on the wire follow the catalog file (`mp4`, `thumbnailUrl`,
/// `duration`). Identity is the media reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub title: String,
    #[serde(rename = "mp4")]
    pub media_ref: MediaRef,
    #[serde(rename = "thumbnailUrl", default)]
    pub thumbnail_url: String,
    /// Display label such as `10:53`
    #[serde(rename = "duration", default)]
    pub duration_label: String,
}

impl VideoRecord {
    pub fn new(title: impl Into<String>, media_ref: impl Into<MediaRef>) -> Self {
        Self {
            title: title.into(),
            media_ref: media_ref.into(),
            thumbnail_url: String::new(),
            duration_label: String::new(),
        }
    }

    pub fn with_thumbnail(mut self, url: impl Into<String>) -> Self {
        self.thumbnail_url = url.into();
        self
    }

    pub fn with_duration_label(mut self, label: impl Into<String>) -> Self {
        self.duration_label = label.into();
        self
    }

    /// Duration in seconds parsed from the display label, if it is well formed
    pub fn duration_hint(&self) -> Option<f64> {
        parse_time_label(&self.duration_label)
    }
}

/// Named, ordered group of videos
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub name: String,
    pub videos: Vec<VideoRecord>,
}

impl Category {
    pub fn new(name: impl Into<String>, videos: Vec<VideoRecord>) -> Self {
        Self {
            name: name.into(),
            videos,
        }
    }

    /// First `limit` videos, for the collapsed grid row
    pub fn preview(&self, limit: usize) -> &[VideoRecord] {
        &self.videos[..self.videos.len().min(limit)]
    }

    /// Whether the grid row needs a "show more" toggle
    pub fn has_more(&self, limit: usize) -> bool {
        self.videos.len() > limit
    }

    pub fn find(&self, media: &MediaRef) -> Option<&VideoRecord> {
        self.videos.iter().find(|v| &v.media_ref == media)
    }

    /// Every other video in this category, in catalog order
    pub fn related_to(&self, media: &MediaRef) -> Vec<VideoRecord> {
        self.videos
            .iter()
            .filter(|v| &v.media_ref != media)
            .cloned()
            .collect()
    }
}
