//! Common types shared by the playback engine and media backends
use crate::utils::format_time;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Idle,
    Loading,
    Playing,
    Paused,
    Ended,
}

impl PlayerState {
    /// A media resource is attached and has reported ready
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Playing | Self::Paused | Self::Ended)
    }
}

/// Which media handle an event came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaSlot {
    Full,
    Mini,
}

/// Callbacks a media resource reports back to its owner
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// Metadata loaded; `duration` may still be unknown (0 or NaN)
    Ready { duration: f64 },
    TimeUpdate { current_time: f64, duration: f64 },
    Seeked,
    Ended,
    Error(String),
}

/// Position snapshot recomputed on every time-update tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressReport {
    pub current_time: f64,
    pub duration: f64,
    pub fraction: f64,
}

impl ProgressReport {
    /// `m:ss / m:ss` label for the controls row
    pub fn label(&self) -> String {
        format!(
            "{} / {}",
            format_time(self.current_time),
            format_time(self.duration)
        )
    }
}

/// How a saved offset was applied when the media became ready
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResumeOutcome {
    FromStart,
    Resumed(f64),
    /// Offset was within the completion epsilon of the end; started at 0
    DiscardedStale(f64),
    /// Duration still unknown; the offset waits for the first tick that reports it
    Deferred(f64),
}

/// What a media event did to the engine
#[derive(Debug, Clone, PartialEq)]
pub enum EngineUpdate {
    Ignored,
    Ready(ResumeOutcome),
    Progress(ProgressReport),
    Seeked,
    Ended,
    Failed(String),
}
