use tracing::{debug, info, trace, warn};

use super::traits::MediaElement;
use super::types::{EngineUpdate, MediaEvent, PlayerState, ProgressReport, ResumeOutcome};
use crate::ledger::ProgressLedger;
use crate::models::{MediaRef, PlaybackSession, VideoRecord, is_known_duration};

/// Owns the full-player media handle and the live [`PlaybackSession`].
///
/// State transitions:
/// - `Idle → Loading` on [`open`](Self::open)
/// - `Loading → Playing | Paused` when the media reports ready
/// - `Playing ⇄ Paused` via [`toggle_play_pause`](Self::toggle_play_pause)
/// - `Playing | Paused → Ended` when the media reports the end
/// - any → `Idle` on [`teardown`](Self::teardown)
///
/// Seeking is tracked alongside the main state and cleared when the media
/// reports the seek completed.
pub struct PlaybackEngine {
    media: Box<dyn MediaElement>,
    ledger: ProgressLedger,
    /// Offsets this close to the end count as "finished"
    completion_epsilon: f64,
    state: PlayerState,
    session: Option<PlaybackSession>,
    /// Offset to apply once the duration is known
    pending_resume: Option<f64>,
    autoplay: bool,
    seek_target: Option<f64>,
    load_error: Option<String>,
}

impl PlaybackEngine {
    pub fn new(
        media: Box<dyn MediaElement>,
        ledger: ProgressLedger,
        completion_epsilon: f64,
    ) -> Self {
        Self {
            media,
            ledger,
            completion_epsilon: completion_epsilon.max(0.0),
            state: PlayerState::Idle,
            session: None,
            pending_resume: None,
            autoplay: true,
            seek_target: None,
            load_error: None,
        }
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn session(&self) -> Option<&PlaybackSession> {
        self.session.as_ref()
    }

    pub fn current_media(&self) -> Option<&MediaRef> {
        self.session.as_ref().map(|s| &s.video.media_ref)
    }

    pub fn is_seeking(&self) -> bool {
        self.seek_target.is_some()
    }

    /// Set when the media resource failed; the view shows "no playable video"
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    /// Current position, or `None` until the duration is known
    pub fn progress(&self) -> Option<ProgressReport> {
        let session = self.session.as_ref()?;
        session.duration_known().then(|| report_for(session))
    }

    /// Open `video` and start playing once ready.
    ///
    /// With no explicit `resume_offset` the ledger's saved offset is used.
    pub fn open(
        &mut self,
        video: VideoRecord,
        category: impl Into<String>,
        resume_offset: Option<f64>,
    ) -> &PlaybackSession {
        self.open_with(video, category, resume_offset, true)
    }

    /// Open `video`, replacing any live session. `autoplay` decides whether
    /// the ready media starts in `Playing` or `Paused`.
    pub fn open_with(
        &mut self,
        video: VideoRecord,
        category: impl Into<String>,
        resume_offset: Option<f64>,
        autoplay: bool,
    ) -> &PlaybackSession {
        if let Some(previous) = self.session.take() {
            debug!(
                "Replacing session {} ({})",
                previous.id, previous.video.title
            );
            self.media.unload();
        }

        let resume = resume_offset.or_else(|| self.saved_offset(&video.media_ref));
        let session = PlaybackSession::new(video, category);
        info!(
            "Opening '{}' from {} [session {}], resume offset {:?}",
            session.video.title, session.category, session.id, resume
        );

        if let Err(e) = self.ledger.save_session(&session) {
            warn!("Failed to save active session: {}", e);
        }

        self.media.load(&session.video);
        self.state = PlayerState::Loading;
        self.pending_resume = resume;
        self.autoplay = autoplay;
        self.seek_target = None;
        self.load_error = None;
        self.session.insert(session)
    }

    fn saved_offset(&self, media: &MediaRef) -> Option<f64> {
        match self.ledger.get(media) {
            Ok(offset) => offset,
            Err(e) => {
                warn!("Failed to read saved progress for {}: {}", media, e);
                None
            }
        }
    }

    /// Apply a callback from the media handle. Events for any media other
    /// than the live session's are dropped.
    pub fn handle_event(&mut self, media: &MediaRef, event: MediaEvent) -> EngineUpdate {
        if self.current_media() != Some(media) {
            trace!("Dropping {:?} from stale media {}", event, media);
            return EngineUpdate::Ignored;
        }

        match event {
            MediaEvent::Ready { duration } => self.on_ready(duration),
            MediaEvent::TimeUpdate {
                current_time,
                duration,
            } => self.on_time_update(current_time, duration),
            MediaEvent::Seeked => {
                self.seek_target = None;
                EngineUpdate::Seeked
            }
            MediaEvent::Ended => self.on_ended(),
            MediaEvent::Error(message) => self.on_error(message),
        }
    }

    fn on_ready(&mut self, duration: f64) -> EngineUpdate {
        if self.state != PlayerState::Loading {
            return EngineUpdate::Ignored;
        }
        let Some(session) = self.session.as_mut() else {
            return EngineUpdate::Ignored;
        };

        session.duration = if is_known_duration(duration) {
            duration
        } else {
            0.0
        };

        let outcome = if session.duration_known() {
            apply_resume(
                session,
                self.pending_resume.take(),
                self.completion_epsilon,
                &self.ledger,
                &mut *self.media,
            )
        } else {
            match self.pending_resume {
                Some(offset) if offset > 0.0 => ResumeOutcome::Deferred(offset),
                _ => ResumeOutcome::FromStart,
            }
        };
        if let ResumeOutcome::Resumed(offset) = outcome {
            self.seek_target = Some(offset);
        }

        session.is_playing = self.autoplay;
        if self.autoplay {
            self.state = PlayerState::Playing;
            self.media.play();
        } else {
            self.state = PlayerState::Paused;
        }

        info!(
            "'{}' ready ({:.1}s), {:?}, now {:?}",
            session.video.title, session.duration, outcome, self.state
        );
        EngineUpdate::Ready(outcome)
    }

    fn on_time_update(&mut self, current_time: f64, duration: f64) -> EngineUpdate {
        // Unknown duration would turn every fraction into NaN
        if !self.state.is_loaded() || !is_known_duration(duration) || !current_time.is_finite() {
            return EngineUpdate::Ignored;
        }
        let Some(session) = self.session.as_mut() else {
            return EngineUpdate::Ignored;
        };

        session.duration = duration;
        session.current_time = session.clamp_time(current_time);

        // First tick with a known duration settles an offset Ready could not
        if self.pending_resume.is_some() {
            let outcome = apply_resume(
                session,
                self.pending_resume.take(),
                self.completion_epsilon,
                &self.ledger,
                &mut *self.media,
            );
            debug!("Late resume for '{}': {:?}", session.video.title, outcome);
            if let ResumeOutcome::Resumed(offset) = outcome {
                self.seek_target = Some(offset);
            }
        }

        let media = &session.video.media_ref;
        let persisted = if session.current_time >= duration - self.completion_epsilon {
            self.ledger.clear(media)
        } else {
            self.ledger.set(media, session.current_time)
        };
        if let Err(e) = persisted {
            warn!("Failed to persist progress for {}: {}", media, e);
        }

        EngineUpdate::Progress(report_for(session))
    }

    fn on_ended(&mut self) -> EngineUpdate {
        if !matches!(self.state, PlayerState::Playing | PlayerState::Paused) {
            return EngineUpdate::Ignored;
        }
        let Some(session) = self.session.as_mut() else {
            return EngineUpdate::Ignored;
        };

        if session.duration_known() {
            session.current_time = session.duration;
        }
        session.is_playing = false;
        self.state = PlayerState::Ended;
        self.seek_target = None;

        if let Err(e) = self.ledger.clear(&session.video.media_ref) {
            warn!("Failed to clear finished progress: {}", e);
        }

        info!("Playback ended: '{}'", session.video.title);
        EngineUpdate::Ended
    }

    fn on_error(&mut self, message: String) -> EngineUpdate {
        warn!(
            "Media failed for {:?} in {:?}: {}",
            self.current_media().map(|m| m.as_str()),
            self.state,
            message
        );
        self.load_error = Some(message.clone());
        EngineUpdate::Failed(message)
    }

    /// Flip between playing and paused. No-op until the media is ready.
    pub fn toggle_play_pause(&mut self) -> bool {
        match self.state {
            PlayerState::Playing => {
                self.set_playing(false);
                true
            }
            PlayerState::Paused => {
                self.set_playing(true);
                true
            }
            other => {
                debug!("Ignoring play/pause while {:?}", other);
                false
            }
        }
    }

    fn set_playing(&mut self, playing: bool) {
        if playing {
            self.media.play();
            self.state = PlayerState::Playing;
        } else {
            self.media.pause();
            self.state = PlayerState::Paused;
        }
        if let Some(session) = self.session.as_mut() {
            session.is_playing = playing;
        }
    }

    /// Move by `delta_secs`, clamped to `[0, duration]`. Play/pause state is
    /// kept. No-op while the duration is unknown.
    pub fn skip(&mut self, delta_secs: f64) -> bool {
        if self.state == PlayerState::Idle || !delta_secs.is_finite() {
            return false;
        }
        let Some(session) = self.session.as_ref() else {
            return false;
        };
        if !session.duration_known() {
            debug!("Skip ignored: duration not reported yet");
            return false;
        }

        let target = session.clamp_time(session.current_time + delta_secs);
        self.seek_to(target);
        true
    }

    /// Jump to `fraction × duration`. No-op while the duration is unknown.
    pub fn seek_to_fraction(&mut self, fraction: f64) -> bool {
        if self.state == PlayerState::Idle || !fraction.is_finite() {
            return false;
        }
        let Some(session) = self.session.as_ref() else {
            return false;
        };
        if !session.duration_known() {
            debug!("Seek ignored: duration not reported yet");
            return false;
        }

        let target = fraction.clamp(0.0, 1.0) * session.duration;
        self.seek_to(target);
        true
    }

    fn seek_to(&mut self, target: f64) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        session.current_time = target;
        self.seek_target = Some(target);
        self.media.seek(target);

        // Seeking back from the end leaves the video paused, not finished
        if self.state == PlayerState::Ended && target < session.duration - self.completion_epsilon
        {
            self.state = PlayerState::Paused;
        }
    }

    /// Restart an ended video from 0 and play it
    pub fn replay(&mut self) -> bool {
        if self.state != PlayerState::Ended {
            return false;
        }
        if let Some(media) = self.current_media()
            && let Err(e) = self.ledger.clear(media)
        {
            warn!("Failed to clear progress before replay: {}", e);
        }

        self.seek_to(0.0);
        self.set_playing(true);
        info!("Replaying from start");
        true
    }

    /// Release the media handle and hand back the finished session.
    ///
    /// A resume offset that was never applied is carried in the returned
    /// session's `current_time`, and a session still loading reports the
    /// play state it was about to enter.
    pub fn teardown(&mut self) -> Option<PlaybackSession> {
        let mut session = self.session.take();
        if let Some(session) = session.as_mut() {
            debug!("Tearing down session {}", session.id);
            self.media.unload();

            if let Some(offset) = self.pending_resume.filter(|offset| *offset > 0.0) {
                session.current_time = offset;
            }
            if self.state == PlayerState::Loading {
                session.is_playing = self.autoplay;
            }
        }

        self.state = PlayerState::Idle;
        self.pending_resume = None;
        self.seek_target = None;
        self.load_error = None;
        session
    }
}

/// Seek to `offset` unless it sits within `epsilon` of the end, in which
/// case the saved entry is dropped and playback starts over.
fn apply_resume(
    session: &mut PlaybackSession,
    offset: Option<f64>,
    epsilon: f64,
    ledger: &ProgressLedger,
    media: &mut dyn MediaElement,
) -> ResumeOutcome {
    let Some(offset) = offset.filter(|offset| *offset > 0.0) else {
        return ResumeOutcome::FromStart;
    };

    if offset >= session.duration - epsilon {
        debug!(
            "Saved offset {:.1}s is at the end of '{}', starting over",
            offset, session.video.title
        );
        if let Err(e) = ledger.clear(&session.video.media_ref) {
            warn!("Failed to clear stale progress: {}", e);
        }
        return ResumeOutcome::DiscardedStale(offset);
    }

    session.current_time = offset;
    media.seek(offset);
    ResumeOutcome::Resumed(offset)
}

fn report_for(session: &PlaybackSession) -> ProgressReport {
    ProgressReport {
        current_time: session.current_time,
        duration: session.duration,
        fraction: session.progress_fraction(),
    }
}
