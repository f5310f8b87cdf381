use tracing::{debug, info, warn};

use crate::models::{MediaRef, MiniSnapshot};
use crate::player::{MediaElement, MediaEvent};

/// The floating mini player: a snapshot plus its own lightweight media
/// handle, restarted at the snapshot's offset.
pub struct MiniPlayer {
    media: Box<dyn MediaElement>,
    snapshot: Option<MiniSnapshot>,
    ready: bool,
}

impl MiniPlayer {
    pub fn new(media: Box<dyn MediaElement>) -> Self {
        Self {
            media,
            snapshot: None,
            ready: false,
        }
    }

    pub fn snapshot(&self) -> Option<&MiniSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Show `snapshot`, replacing whatever the mini player held
    pub fn show(&mut self, snapshot: MiniSnapshot) {
        if self.snapshot.is_some() {
            self.media.unload();
        }
        info!(
            "Mini player showing '{}' at {:.1}s",
            snapshot.video.title, snapshot.current_time
        );
        self.media.load(&snapshot.video);
        self.snapshot = Some(snapshot);
        self.ready = false;
    }

    /// Apply a media callback. Returns true when the snapshot changed and
    /// should be persisted.
    pub fn handle_event(&mut self, media: &MediaRef, event: MediaEvent) -> bool {
        let Some(snapshot) = self.snapshot.as_mut() else {
            return false;
        };
        if &snapshot.video.media_ref != media {
            return false;
        }

        match event {
            MediaEvent::Ready { .. } => {
                self.ready = true;
                if snapshot.current_time > 0.0 {
                    self.media.seek(snapshot.current_time);
                }
                if snapshot.is_playing {
                    self.media.play();
                }
                false
            }
            MediaEvent::TimeUpdate { current_time, .. } if current_time.is_finite() => {
                // The snapshot follows the mini handle once it plays, so
                // restoring resumes where the mini player got to rather than
                // at the demotion offset.
                snapshot.current_time = current_time.max(0.0);
                true
            }
            MediaEvent::Ended => {
                snapshot.is_playing = false;
                true
            }
            MediaEvent::Error(message) => {
                warn!("Mini player media failed: {}", message);
                false
            }
            _ => false,
        }
    }

    /// Flip play/pause on the mini handle. Returns the new playing flag.
    pub fn toggle_play_pause(&mut self) -> Option<bool> {
        let snapshot = self.snapshot.as_mut()?;
        snapshot.is_playing = !snapshot.is_playing;

        // Before ready the flag is applied once the media reports in
        if self.ready {
            if snapshot.is_playing {
                self.media.play();
            } else {
                self.media.pause();
            }
        }
        debug!("Mini player playing: {}", snapshot.is_playing);
        Some(snapshot.is_playing)
    }

    /// Hide the mini player and hand back its snapshot
    pub fn take(&mut self) -> Option<MiniSnapshot> {
        let snapshot = self.snapshot.take()?;
        self.media.unload();
        self.ready = false;
        Some(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PlaybackSession;
    use crate::test_utils::{MediaCall, RecordingMedia, sample_video};

    fn snapshot(current_time: f64, is_playing: bool) -> MiniSnapshot {
        let mut session = PlaybackSession::new(sample_video("a"), "Movies");
        session.duration = 600.0;
        session.current_time = current_time;
        session.is_playing = is_playing;
        session.snapshot()
    }

    #[test]
    fn restarts_at_snapshot_offset_when_ready() {
        let media = RecordingMedia::new();
        let mut mini = MiniPlayer::new(Box::new(media.clone()));

        mini.show(snapshot(42.0, true));
        assert!(!mini.handle_event(
            &MediaRef::new("a.mp4"),
            MediaEvent::Ready { duration: 600.0 }
        ));

        assert_eq!(
            media.calls(),
            vec![
                MediaCall::Load(MediaRef::new("a.mp4")),
                MediaCall::Seek(42.0),
                MediaCall::Play,
            ]
        );
    }

    #[test]
    fn paused_snapshot_stays_paused() {
        let media = RecordingMedia::new();
        let mut mini = MiniPlayer::new(Box::new(media.clone()));

        mini.show(snapshot(10.0, false));
        mini.handle_event(&MediaRef::new("a.mp4"), MediaEvent::Ready { duration: 600.0 });

        assert!(!media.calls().contains(&MediaCall::Play));
    }

    #[test]
    fn time_updates_advance_snapshot() {
        let mut mini = MiniPlayer::new(Box::new(RecordingMedia::new()));
        mini.show(snapshot(10.0, true));

        assert!(mini.handle_event(
            &MediaRef::new("a.mp4"),
            MediaEvent::TimeUpdate {
                current_time: 11.0,
                duration: 600.0,
            }
        ));
        assert_eq!(mini.snapshot().unwrap().current_time, 11.0);

        // Other media is ignored
        assert!(!mini.handle_event(
            &MediaRef::new("b.mp4"),
            MediaEvent::TimeUpdate {
                current_time: 99.0,
                duration: 600.0,
            }
        ));
    }

    #[test]
    fn toggle_waits_for_ready() {
        let media = RecordingMedia::new();
        let mut mini = MiniPlayer::new(Box::new(media.clone()));
        assert_eq!(mini.toggle_play_pause(), None);

        mini.show(snapshot(0.0, true));
        assert_eq!(mini.toggle_play_pause(), Some(false));
        assert_eq!(media.last(), Some(MediaCall::Load(MediaRef::new("a.mp4"))));

        mini.handle_event(&MediaRef::new("a.mp4"), MediaEvent::Ready { duration: 600.0 });
        assert_eq!(mini.toggle_play_pause(), Some(true));
        assert_eq!(media.last(), Some(MediaCall::Play));
    }

    #[test]
    fn take_unloads_and_hides() {
        let media = RecordingMedia::new();
        let mut mini = MiniPlayer::new(Box::new(media.clone()));
        mini.show(snapshot(5.0, true));

        let taken = mini.take().unwrap();
        assert_eq!(taken.current_time, 5.0);
        assert!(!mini.is_visible());
        assert_eq!(media.last(), Some(MediaCall::Unload));
        assert!(mini.take().is_none());
    }
}
