#![cfg(test)]

use std::sync::{Arc, Mutex};

use crate::models::{Category, MediaRef, VideoRecord};
use crate::player::MediaElement;

/// Call made on a [`RecordingMedia`]
#[derive(Debug, Clone, PartialEq)]
pub enum MediaCall {
    Load(MediaRef),
    Play,
    Pause,
    Seek(f64),
    Unload,
}

/// Media element that only records what it was asked to do.
/// Clones share the same call log.
#[derive(Debug, Clone, Default)]
pub struct RecordingMedia {
    calls: Arc<Mutex<Vec<MediaCall>>>,
}

impl RecordingMedia {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<MediaCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<MediaCall> {
        self.calls.lock().unwrap().last().cloned()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: MediaCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl MediaElement for RecordingMedia {
    fn load(&mut self, video: &VideoRecord) {
        self.record(MediaCall::Load(video.media_ref.clone()));
    }

    fn play(&mut self) {
        self.record(MediaCall::Play);
    }

    fn pause(&mut self) {
        self.record(MediaCall::Pause);
    }

    fn seek(&mut self, position_secs: f64) {
        self.record(MediaCall::Seek(position_secs));
    }

    fn unload(&mut self) {
        self.record(MediaCall::Unload);
    }
}

/// Video `<name>` backed by `<name>.mp4`
pub fn sample_video(name: &str) -> VideoRecord {
    VideoRecord::new(name, format!("{}.mp4", name)).with_duration_label("10:00")
}

/// Two categories: "Movies" with three videos and "Shorts" with one
pub fn sample_categories() -> Vec<Category> {
    vec![
        Category::new(
            "Movies",
            vec![sample_video("a"), sample_video("b"), sample_video("c")],
        ),
        Category::new("Shorts", vec![sample_video("solo")]),
    ]
}
