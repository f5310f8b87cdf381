use reelcast::models::{MediaRef, VideoRecord};
use reelcast::player::MediaElement;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
pub enum MediaCall {
    Load(MediaRef),
    Play,
    Pause,
    Seek(f64),
    Unload,
}

/// Media element that records every transport call. Clones share the log.
#[derive(Debug, Clone, Default)]
pub struct MockMedia {
    calls: Arc<Mutex<Vec<MediaCall>>>,
}

impl MockMedia {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<MediaCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<MediaCall> {
        self.calls.lock().unwrap().last().cloned()
    }

    pub fn loaded(&self) -> Option<MediaRef> {
        self.calls.lock().unwrap().iter().rev().find_map(|call| match call {
            MediaCall::Load(media) => Some(media.clone()),
            _ => None,
        })
    }
}

impl MediaElement for MockMedia {
    fn load(&mut self, video: &VideoRecord) {
        self.calls
            .lock()
            .unwrap()
            .push(MediaCall::Load(video.media_ref.clone()));
    }

    fn play(&mut self) {
        self.calls.lock().unwrap().push(MediaCall::Play);
    }

    fn pause(&mut self) {
        self.calls.lock().unwrap().push(MediaCall::Pause);
    }

    fn seek(&mut self, position_secs: f64) {
        self.calls.lock().unwrap().push(MediaCall::Seek(position_secs));
    }

    fn unload(&mut self) {
        self.calls.lock().unwrap().push(MediaCall::Unload);
    }
}
