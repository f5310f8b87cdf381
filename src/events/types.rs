use chrono::{DateTime, Utc};

use crate::models::MediaRef;
use crate::player::ProgressReport;
use crate::transitions::ViewState;

/// Event published for the view layer
#[derive(Debug, Clone)]
pub struct PlayerEvent {
    pub id: String,
    pub event_type: EventType,
    pub payload: EventPayload,
    pub timestamp: DateTime<Utc>,
}

impl PlayerEvent {
    pub fn new(event_type: EventType, payload: EventPayload) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            event_type,
            payload,
            timestamp: Utc::now(),
        }
    }

    pub fn view_changed(state: ViewState) -> Self {
        Self::new(EventType::ViewChanged, EventPayload::View(state))
    }

    pub fn progress(media: MediaRef, report: ProgressReport) -> Self {
        Self::new(
            EventType::ProgressUpdated,
            EventPayload::Progress { media, report },
        )
    }

    pub fn playback_failed(media: MediaRef, message: String) -> Self {
        Self::new(
            EventType::PlaybackFailed,
            EventPayload::Failure { media, message },
        )
    }

    pub fn command_rejected(command: String, reason: String) -> Self {
        Self::new(
            EventType::CommandRejected,
            EventPayload::Rejected { command, reason },
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    ViewChanged,
    ProgressUpdated,
    /// Media could not be played; shown as "no playable video"
    PlaybackFailed,
    CommandRejected,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::ViewChanged => "view.changed",
            EventType::ProgressUpdated => "playback.progress",
            EventType::PlaybackFailed => "playback.failed",
            EventType::CommandRejected => "command.rejected",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventPayload {
    View(ViewState),
    Progress {
        media: MediaRef,
        report: ProgressReport,
    },
    Failure {
        media: MediaRef,
        message: String,
    },
    Rejected {
        command: String,
        reason: String,
    },
}
