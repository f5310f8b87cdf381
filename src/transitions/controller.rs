use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::ViewState;
use super::countdown::{Countdown, CountdownId, CountdownTick, TimerDriver};
use super::mini::MiniPlayer;
use crate::catalog::CatalogStore;
use crate::constants::{
    DEFAULT_COMPLETION_EPSILON_SECS, DEFAULT_COUNTDOWN_SECONDS, DEFAULT_DEMOTE_THRESHOLD,
    DEFAULT_DOUBLE_TAP_WINDOW_MS, DEFAULT_SKIP_SECONDS,
};
use crate::gestures::{GestureDetector, GestureEvent, PointerInput};
use crate::ledger::ProgressLedger;
use crate::models::{CountdownState, MediaRef, MiniSnapshot, PlaybackSession, VideoRecord};
use crate::navigation::{Navigator, Route, RouteState};
use crate::player::{
    EngineUpdate, MediaElement, MediaEvent, MediaSlot, PlaybackEngine, PlayerState,
};
use crate::utils::{AppError, Result};

/// Tunables for the controller, normally taken from the config file
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerSettings {
    pub skip_seconds: f64,
    pub completion_epsilon: f64,
    pub countdown_seconds: u32,
    pub auto_advance: bool,
    pub demote_threshold: f64,
    pub double_tap_window: Duration,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            skip_seconds: DEFAULT_SKIP_SECONDS,
            completion_epsilon: DEFAULT_COMPLETION_EPSILON_SECS,
            countdown_seconds: DEFAULT_COUNTDOWN_SECONDS,
            auto_advance: true,
            demote_threshold: DEFAULT_DEMOTE_THRESHOLD,
            double_tap_window: Duration::from_millis(DEFAULT_DOUBLE_TAP_WINDOW_MS),
        }
    }
}

/// Collaborators the controller is built from
pub struct ControllerParts {
    pub catalog: Arc<dyn CatalogStore>,
    pub ledger: ProgressLedger,
    pub full_media: Box<dyn MediaElement>,
    pub mini_media: Box<dyn MediaElement>,
    pub navigator: Box<dyn Navigator>,
    pub timer: Box<dyn TimerDriver>,
}

/// Single owner of the playback session, the mini player and the countdown.
///
/// Every exit from a session (new video, demote, leave, shutdown) cancels
/// the countdown, and dropping the controller stops its timer.
pub struct TransitionController {
    catalog: Arc<dyn CatalogStore>,
    ledger: ProgressLedger,
    engine: PlaybackEngine,
    mini: MiniPlayer,
    countdown: Countdown,
    gestures: GestureDetector,
    navigator: Box<dyn Navigator>,
    settings: ControllerSettings,
}

impl TransitionController {
    pub fn new(parts: ControllerParts, settings: ControllerSettings) -> Self {
        let engine = PlaybackEngine::new(
            parts.full_media,
            parts.ledger.clone(),
            settings.completion_epsilon,
        );
        let gestures = GestureDetector::new(settings.demote_threshold, settings.double_tap_window);

        Self {
            catalog: parts.catalog,
            ledger: parts.ledger,
            engine,
            mini: MiniPlayer::new(parts.mini_media),
            countdown: Countdown::new(parts.timer, settings.countdown_seconds),
            gestures,
            navigator: parts.navigator,
            settings,
        }
    }

    pub fn view_state(&self) -> ViewState {
        if self.engine.session().is_some() {
            if let Some(countdown) = self.countdown.state() {
                return ViewState::Countdown(countdown.clone());
            }
            if self.engine.state() == PlayerState::Ended {
                return ViewState::Ended;
            }
            return ViewState::Full;
        }

        match self.mini.snapshot() {
            Some(snapshot) => ViewState::Mini(snapshot.clone()),
            None => ViewState::Browsing,
        }
    }

    pub fn engine(&self) -> &PlaybackEngine {
        &self.engine
    }

    pub fn session(&self) -> Option<&PlaybackSession> {
        self.engine.session()
    }

    pub fn mini_snapshot(&self) -> Option<&MiniSnapshot> {
        self.mini.snapshot()
    }

    pub fn countdown(&self) -> Option<&CountdownState> {
        self.countdown.state()
    }

    pub fn catalog(&self) -> &dyn CatalogStore {
        self.catalog.as_ref()
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    /// Other videos in the live session's category
    pub fn related_videos(&self) -> Vec<VideoRecord> {
        match self.engine.session() {
            Some(session) => self
                .catalog
                .related_videos(&session.category, &session.video.media_ref),
            None => Vec::new(),
        }
    }

    /// Open `video` in the full player, replacing any session, countdown or
    /// mini player, and navigate to the player route.
    pub fn open_video(&mut self, video: VideoRecord, category: &str, resume_offset: Option<f64>) {
        self.start_session(video, category, resume_offset, true);
        self.navigate_to_session();
    }

    /// Open the `index`th video of `category`
    pub fn open_at(&mut self, category: &str, index: usize) -> Result<()> {
        let entry = self
            .catalog
            .category(category)
            .ok_or_else(|| AppError::CategoryNotFound(category.to_string()))?;
        let video = entry
            .videos
            .get(index)
            .cloned()
            .ok_or_else(|| AppError::VideoNotFound(format!("{} #{}", category, index)))?;
        let name = entry.name.clone();

        self.open_video(video, &name, None);
        Ok(())
    }

    /// Rebuild the player after the player route was (re)entered.
    ///
    /// A state bundle wins; without one the saved-session slot is used.
    pub fn restore_player_route(&mut self, state: Option<RouteState>) -> Result<()> {
        match state {
            Some(RouteState::Session { video, category }) => {
                self.start_session(video, &category, None, true);
            }
            Some(RouteState::Mini(snapshot)) => {
                self.resume_snapshot(snapshot);
            }
            None => {
                let saved = self
                    .ledger
                    .load_session()?
                    .ok_or(AppError::MissingVideoSelection)?;
                info!(
                    "Rebuilding player from saved session '{}' ({})",
                    saved.video.title, saved.category
                );
                self.start_session(saved.video, &saved.category, None, true);
            }
        }
        Ok(())
    }

    fn start_session(
        &mut self,
        video: VideoRecord,
        category: &str,
        resume_offset: Option<f64>,
        autoplay: bool,
    ) {
        self.countdown.cancel();
        self.gestures.reset();
        if let Some(discarded) = self.mini.take() {
            debug!("Discarding mini player for '{}'", discarded.video.title);
        }
        self.clear_mini_slot();
        self.engine.open_with(video, category, resume_offset, autoplay);
    }

    fn resume_snapshot(&mut self, snapshot: MiniSnapshot) {
        self.start_session(
            snapshot.video,
            &snapshot.category,
            Some(snapshot.current_time),
            snapshot.is_playing,
        );
    }

    fn navigate_to_session(&mut self) {
        if let Some(session) = self.engine.session() {
            let state = RouteState::Session {
                video: session.video.clone(),
                category: session.category.clone(),
            };
            self.navigator.go_to(Route::Player, Some(state));
        }
    }

    /// Route a media callback to the handle it came from
    pub fn handle_media_event(
        &mut self,
        slot: MediaSlot,
        media: &MediaRef,
        event: MediaEvent,
    ) -> EngineUpdate {
        match slot {
            MediaSlot::Full => {
                let update = self.engine.handle_event(media, event);
                if update == EngineUpdate::Ended {
                    self.on_playback_ended();
                }
                update
            }
            MediaSlot::Mini => {
                let failure = match &event {
                    MediaEvent::Error(message) => Some(message.clone()),
                    _ => None,
                };
                if self.mini.handle_event(media, event) {
                    self.persist_mini();
                }
                failure.map_or(EngineUpdate::Ignored, EngineUpdate::Failed)
            }
        }
    }

    fn on_playback_ended(&mut self) {
        if !self.settings.auto_advance {
            debug!("Auto-advance disabled, staying on ended screen");
            return;
        }

        match self.related_videos().into_iter().next() {
            Some(next) => {
                self.countdown.start(next);
            }
            None => info!("No related videos, staying on ended screen"),
        }
    }

    /// Deliver one countdown tick. Returns true when the view changed.
    pub fn on_countdown_tick(&mut self, id: CountdownId) -> bool {
        match self.countdown.tick(id) {
            CountdownTick::Stale => false,
            CountdownTick::Remaining(_) => true,
            CountdownTick::Finished(target) => {
                let Some(category) = self.engine.session().map(|s| s.category.clone()) else {
                    warn!("Countdown finished without a session, not advancing");
                    return true;
                };
                self.open_video(target, &category, None);
                true
            }
        }
    }

    /// User dismissed the countdown; the player stays on the ended screen
    pub fn cancel_countdown(&mut self) -> bool {
        match self.countdown.cancel() {
            Some(state) => {
                info!(
                    "Countdown cancelled with {}s left",
                    state.remaining_seconds
                );
                true
            }
            None => false,
        }
    }

    /// Skip the rest of the countdown and open its target now
    pub fn play_now(&mut self) -> bool {
        let Some(state) = self.countdown.cancel() else {
            return false;
        };
        let Some(category) = self.engine.session().map(|s| s.category.clone()) else {
            return false;
        };
        self.open_video(state.target_video, &category, None);
        true
    }

    /// Open the `index`th related video in the current category
    pub fn play_related(&mut self, index: usize) -> Result<()> {
        let category = self
            .engine
            .session()
            .map(|s| s.category.clone())
            .ok_or(AppError::MissingVideoSelection)?;
        let video = self
            .related_videos()
            .into_iter()
            .nth(index)
            .ok_or_else(|| AppError::VideoNotFound(format!("related #{}", index)))?;

        self.open_video(video, &category, None);
        Ok(())
    }

    pub fn replay(&mut self) -> bool {
        self.countdown.cancel();
        self.engine.replay()
    }

    /// Play/pause whichever player is visible
    pub fn toggle_play_pause(&mut self) -> bool {
        if self.engine.session().is_some() {
            self.engine.toggle_play_pause()
        } else {
            self.toggle_mini_play_pause()
        }
    }

    pub fn toggle_mini_play_pause(&mut self) -> bool {
        if self.mini.toggle_play_pause().is_some() {
            self.persist_mini();
            true
        } else {
            false
        }
    }

    pub fn skip(&mut self, delta_secs: f64) -> bool {
        let moved = self.engine.skip(delta_secs);
        if moved {
            self.cancel_if_left_end();
        }
        moved
    }

    pub fn skip_forward(&mut self) -> bool {
        self.skip(self.settings.skip_seconds)
    }

    pub fn skip_backward(&mut self) -> bool {
        self.skip(-self.settings.skip_seconds)
    }

    pub fn seek_to_fraction(&mut self, fraction: f64) -> bool {
        let moved = self.engine.seek_to_fraction(fraction);
        if moved {
            self.cancel_if_left_end();
        }
        moved
    }

    // A countdown only makes sense while the video sits at its end
    fn cancel_if_left_end(&mut self) {
        if self.engine.state() != PlayerState::Ended && self.countdown.cancel().is_some() {
            debug!("Moved away from the end, countdown cancelled");
        }
    }

    /// Feed pointer input from the full player surface
    pub fn handle_pointer(&mut self, input: PointerInput) -> Option<GestureEvent> {
        if self.engine.session().is_none() {
            return None;
        }

        let gesture = self.gestures.handle(input)?;
        match gesture {
            GestureEvent::Demote => {
                self.demote();
            }
            GestureEvent::SkipBackward => {
                self.skip_backward();
            }
            GestureEvent::SkipForward => {
                self.skip_forward();
            }
        }
        Some(gesture)
    }

    /// Collapse the full player into the mini player
    pub fn demote(&mut self) -> bool {
        self.countdown.cancel();
        let Some(session) = self.engine.teardown() else {
            debug!("Nothing to demote");
            return false;
        };

        let snapshot = session.snapshot();
        if let Err(e) = self.ledger.save_mini(&snapshot) {
            warn!("Failed to save mini snapshot: {}", e);
        }
        if let Err(e) = self.ledger.clear_session() {
            warn!("Failed to clear session slot: {}", e);
        }

        info!(
            "Demoted '{}' to mini player at {:.1}s (playing: {})",
            snapshot.video.title, snapshot.current_time, snapshot.is_playing
        );
        self.mini.show(snapshot.clone());
        self.navigator
            .go_to(Route::Home, Some(RouteState::Mini(snapshot)));
        true
    }

    /// Reopen the mini player's video in the full player where it left off
    pub fn restore_mini(&mut self) -> Result<()> {
        let snapshot = self.mini.take().ok_or(AppError::MissingVideoSelection)?;
        info!(
            "Restoring '{}' from mini player at {:.1}s",
            snapshot.video.title, snapshot.current_time
        );

        self.resume_snapshot(snapshot);
        self.navigate_to_session();
        Ok(())
    }

    pub fn close_mini(&mut self) -> bool {
        match self.mini.take() {
            Some(snapshot) => {
                info!("Closed mini player for '{}'", snapshot.video.title);
                self.clear_mini_slot();
                true
            }
            None => false,
        }
    }

    /// Back out of the full player without keeping a mini player
    pub fn leave_player(&mut self) -> bool {
        self.countdown.cancel();
        self.gestures.reset();
        if self.engine.teardown().is_none() {
            return false;
        }

        if let Err(e) = self.ledger.clear_session() {
            warn!("Failed to clear session slot: {}", e);
        }
        self.navigator.go_to(Route::Home, None);
        true
    }

    /// Bring back a mini player persisted by an earlier run
    pub fn restore_mini_from_ledger(&mut self) -> bool {
        if self.mini.is_visible() || self.engine.session().is_some() {
            return false;
        }

        match self.ledger.load_mini() {
            Ok(Some(snapshot)) => {
                self.mini.show(snapshot);
                true
            }
            Ok(None) => false,
            Err(e) => {
                warn!("Failed to read mini snapshot: {}", e);
                false
            }
        }
    }

    /// Release every media handle and timer. Ledger slots are kept so the
    /// next start can pick up where this one stopped.
    pub fn shutdown(&mut self) {
        self.countdown.cancel();
        self.gestures.reset();
        self.engine.teardown();
        self.mini.take();
        info!("Transition controller shut down");
    }

    fn persist_mini(&self) {
        if let Some(snapshot) = self.mini.snapshot()
            && let Err(e) = self.ledger.save_mini(snapshot)
        {
            warn!("Failed to persist mini snapshot: {}", e);
        }
    }

    fn clear_mini_slot(&self) {
        if let Err(e) = self.ledger.clear_mini() {
            warn!("Failed to clear mini snapshot: {}", e);
        }
    }
}
