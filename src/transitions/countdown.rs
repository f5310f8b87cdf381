use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info, trace};

use crate::models::{CountdownState, VideoRecord};

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Identifies one countdown run; ticks carrying an older id are stale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CountdownId(u64);

impl fmt::Display for CountdownId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "countdown#{}", self.0)
    }
}

/// Schedules the recurring countdown tick.
///
/// At most one ticker runs at a time: `start` replaces any running one and
/// `cancel` stops it. Implementations must also stop ticking when dropped.
pub trait TimerDriver: Send {
    fn start(&mut self, id: CountdownId, period: Duration);
    fn cancel(&mut self);
}

/// Result of delivering one tick
#[derive(Debug, Clone, PartialEq)]
pub enum CountdownTick {
    /// Tick from a cancelled or replaced run
    Stale,
    Remaining(CountdownState),
    /// Reached zero; the countdown is gone and `target` should open
    Finished(VideoRecord),
}

/// The end-of-video countdown and the single timer that drives it
pub struct Countdown {
    timer: Box<dyn TimerDriver>,
    seconds: u32,
    next_id: u64,
    active: Option<(CountdownId, CountdownState)>,
}

impl Countdown {
    pub fn new(timer: Box<dyn TimerDriver>, seconds: u32) -> Self {
        Self {
            timer,
            seconds: seconds.max(1),
            next_id: 0,
            active: None,
        }
    }

    pub fn state(&self) -> Option<&CountdownState> {
        self.active.as_ref().map(|(_, state)| state)
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Start counting down towards `target`, replacing any running countdown
    pub fn start(&mut self, target: VideoRecord) -> CountdownState {
        self.cancel();

        self.next_id += 1;
        let id = CountdownId(self.next_id);
        let state = CountdownState {
            remaining_seconds: self.seconds,
            target_video: target,
        };

        info!(
            "Starting {} ({}s) towards '{}'",
            id, state.remaining_seconds, state.target_video.title
        );
        self.timer.start(id, TICK_PERIOD);
        self.active = Some((id, state.clone()));
        state
    }

    pub fn tick(&mut self, id: CountdownId) -> CountdownTick {
        let Some((active_id, state)) = self.active.as_mut() else {
            trace!("Ignoring {} with no countdown running", id);
            return CountdownTick::Stale;
        };
        if *active_id != id {
            trace!("Ignoring stale {} (active {})", id, active_id);
            return CountdownTick::Stale;
        }

        state.remaining_seconds = state.remaining_seconds.saturating_sub(1);
        if state.remaining_seconds > 0 {
            debug!("{}: {}s left", id, state.remaining_seconds);
            return CountdownTick::Remaining(state.clone());
        }

        self.timer.cancel();
        match self.active.take() {
            Some((_, finished)) => {
                info!("{} finished, advancing to '{}'", id, finished.target_video.title);
                CountdownTick::Finished(finished.target_video)
            }
            None => CountdownTick::Stale,
        }
    }

    /// Stop the countdown, returning its last state if one was running
    pub fn cancel(&mut self) -> Option<CountdownState> {
        let (id, state) = self.active.take()?;
        debug!("Cancelling {} at {}s", id, state.remaining_seconds);
        self.timer.cancel();
        Some(state)
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.timer.cancel();
    }
}

#[derive(Debug, Default)]
struct ManualTimerState {
    running: Option<CountdownId>,
    starts: usize,
    cancels: usize,
}

/// Timer driven by the host: it only records what was scheduled, and the
/// host delivers ticks itself. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct ManualTimer {
    state: Arc<Mutex<ManualTimerState>>,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of the running ticker, if any
    pub fn running(&self) -> Option<CountdownId> {
        self.state.lock().ok().and_then(|state| state.running)
    }

    pub fn starts(&self) -> usize {
        self.state.lock().map(|state| state.starts).unwrap_or_default()
    }

    pub fn cancels(&self) -> usize {
        self.state.lock().map(|state| state.cancels).unwrap_or_default()
    }
}

impl TimerDriver for ManualTimer {
    fn start(&mut self, id: CountdownId, _period: Duration) {
        if let Ok(mut state) = self.state.lock() {
            state.running = Some(id);
            state.starts += 1;
        }
    }

    fn cancel(&mut self) {
        if let Ok(mut state) = self.state.lock()
            && state.running.take().is_some()
        {
            state.cancels += 1;
        }
    }
}
