use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{SessionId, VideoRecord};

/// The single live watching context.
///
/// `current_time` stays within `[0, duration]` once the duration is known;
/// until the media reports it, `duration` is zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSession {
    pub id: SessionId,
    pub video: VideoRecord,
    pub category: String,
    pub current_time: f64,
    pub duration: f64,
    pub is_playing: bool,
}

impl PlaybackSession {
    pub fn new(video: VideoRecord, category: impl Into<String>) -> Self {
        Self {
            id: SessionId::generate(),
            video,
            category: category.into(),
            current_time: 0.0,
            duration: 0.0,
            is_playing: false,
        }
    }

    pub fn duration_known(&self) -> bool {
        is_known_duration(self.duration)
    }

    /// Clamp a position into `[0, duration]`
    pub fn clamp_time(&self, position: f64) -> f64 {
        position.max(0.0).min(self.duration)
    }

    /// Fraction of the video watched, 0.0 while the duration is unknown
    pub fn progress_fraction(&self) -> f64 {
        if self.duration_known() {
            (self.current_time / self.duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Freeze this session for the mini player
    pub fn snapshot(&self) -> MiniSnapshot {
        MiniSnapshot {
            video: self.video.clone(),
            category: self.category.clone(),
            current_time: self.current_time,
            is_playing: self.is_playing,
            captured_at: Utc::now(),
        }
    }
}

/// Duration as reported by a media resource is usable only when finite and positive
pub fn is_known_duration(duration: f64) -> bool {
    duration.is_finite() && duration > 0.0
}

/// Contents of the "currently active video" slot, enough to rebuild a
/// session after a hard reload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedSession {
    pub video: VideoRecord,
    pub category: String,
    pub saved_at: DateTime<Utc>,
}

impl From<&PlaybackSession> for SavedSession {
    fn from(session: &PlaybackSession) -> Self {
        Self {
            video: session.video.clone(),
            category: session.category.clone(),
            saved_at: Utc::now(),
        }
    }
}

/// Frozen copy of a session taken when it is demoted to the mini player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MiniSnapshot {
    pub video: VideoRecord,
    pub category: String,
    pub current_time: f64,
    pub is_playing: bool,
    pub captured_at: DateTime<Utc>,
}

/// Auto-advance countdown shown after a video ends
#[derive(Debug, Clone, PartialEq)]
pub struct CountdownState {
    pub remaining_seconds: u32,
    pub target_video: VideoRecord,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> PlaybackSession {
        PlaybackSession::new(VideoRecord::new("Sintel", "sintel.mp4"), "Movies")
    }

    #[test]
    fn new_session_has_unknown_duration() {
        let session = session();
        assert!(!session.duration_known());
        assert_eq!(session.progress_fraction(), 0.0);
        assert!(!session.is_playing);
    }

    #[test]
    fn clamp_time_respects_bounds() {
        let mut session = session();
        session.duration = 100.0;

        assert_eq!(session.clamp_time(-5.0), 0.0);
        assert_eq!(session.clamp_time(42.5), 42.5);
        assert_eq!(session.clamp_time(150.0), 100.0);
    }

    #[test]
    fn snapshot_copies_live_position_and_play_state() {
        let mut session = session();
        session.duration = 100.0;
        session.current_time = 37.25;
        session.is_playing = true;

        let snapshot = session.snapshot();
        assert_eq!(snapshot.current_time, 37.25);
        assert!(snapshot.is_playing);
        assert_eq!(snapshot.category, "Movies");
        assert_eq!(snapshot.video, session.video);
    }

    #[test]
    fn nan_and_zero_durations_are_unknown() {
        assert!(!is_known_duration(0.0));
        assert!(!is_known_duration(f64::NAN));
        assert!(!is_known_duration(f64::INFINITY));
        assert!(is_known_duration(0.5));
    }
}
