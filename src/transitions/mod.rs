//! Full ⇄ mini transitions and the end-of-video countdown.

mod controller;
mod countdown;
mod mini;

pub use controller::{ControllerParts, ControllerSettings, TransitionController};
pub use countdown::{Countdown, CountdownId, CountdownTick, ManualTimer, TimerDriver};
pub use mini::MiniPlayer;

use crate::models::{CountdownState, MiniSnapshot};

/// What the view layer should render; exactly one branch at a time
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    /// Category grids, no player visible
    Browsing,
    /// Full player with a live session
    Full,
    /// Full player stopped at the end, nothing queued
    Ended,
    /// Full player stopped at the end, counting down to the next video
    Countdown(CountdownState),
    /// Mini player floating over the grids
    Mini(MiniSnapshot),
}

impl ViewState {
    pub fn is_full_player(&self) -> bool {
        matches!(self, Self::Full | Self::Ended | Self::Countdown(_))
    }

    /// Short name used in logs and status lines
    pub fn label(&self) -> &'static str {
        match self {
            Self::Browsing => "browsing",
            Self::Full => "full",
            Self::Ended => "ended",
            Self::Countdown(_) => "countdown",
            Self::Mini(_) => "mini",
        }
    }
}
