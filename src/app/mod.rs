//! Single-owner runtime: every input (user commands, media callbacks,
//! countdown ticks) arrives on one channel and is applied in order.

pub mod commands;
pub mod timer;

pub use commands::{ConsoleInput, HELP, parse_command};
pub use timer::ChannelTimer;

use std::fmt;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::catalog::CatalogStore;
use crate::config::Config;
use crate::events::{EventBus, PlayerEvent};
use crate::gestures::PointerInput;
use crate::ledger::ProgressLedger;
use crate::models::MediaRef;
use crate::navigation::Navigator;
use crate::player::{EngineUpdate, HeadlessMedia, MediaEvent, MediaSlot, ProgressReport};
use crate::storage::KeyValueStore;
use crate::transitions::{ControllerParts, CountdownId, TransitionController, ViewState};
use crate::utils::{AppError, Result};

#[derive(Debug)]
pub enum AppCommand {
    OpenAt { category: String, index: usize },
    PlayRelated(usize),
    TogglePlayPause,
    Skip(f64),
    SkipForward,
    SkipBackward,
    SeekFraction(f64),
    Replay,
    CancelCountdown,
    PlayNow,
    Pointer(PointerInput),
    RestoreMini,
    CloseMini,
    LeavePlayer,
    /// Rebuild the player route from the saved session
    RestoreRoute,
    Status {
        respond_to: oneshot::Sender<StatusReport>,
    },
    Media {
        slot: MediaSlot,
        media: MediaRef,
        event: MediaEvent,
    },
    CountdownTick(CountdownId),
    Quit,
}

impl AppCommand {
    fn name(&self) -> &'static str {
        match self {
            AppCommand::OpenAt { .. } => "open",
            AppCommand::PlayRelated(_) => "related",
            AppCommand::RestoreMini => "restore",
            AppCommand::RestoreRoute => "reload",
            _ => "command",
        }
    }
}

/// Cloneable sender into the app loop
#[derive(Debug, Clone)]
pub struct AppHandle {
    sender: mpsc::UnboundedSender<AppCommand>,
}

impl AppHandle {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<AppCommand>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    pub fn send(&self, command: AppCommand) -> Result<()> {
        self.sender
            .send(command)
            .map_err(|_| AppError::ChannelClosed)
    }

    pub async fn status(&self) -> Result<StatusReport> {
        let (respond_to, response) = oneshot::channel();
        self.send(AppCommand::Status { respond_to })?;
        response.await.map_err(|_| AppError::ChannelClosed)
    }
}

/// Snapshot of what the player shows right now
#[derive(Debug, Clone, PartialEq)]
pub struct StatusReport {
    pub view: ViewState,
    pub title: Option<String>,
    pub category: Option<String>,
    pub progress: Option<ProgressReport>,
    pub load_error: Option<String>,
    /// Events published on the bus so far
    pub events_published: u64,
    /// Events published while nobody was subscribed
    pub events_dropped: u64,
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.view.label())?;
        if let (Some(title), Some(category)) = (&self.title, &self.category) {
            write!(f, " {} ({})", title, category)?;
        }
        if let Some(progress) = &self.progress {
            write!(f, " {}", progress.label())?;
        }
        match &self.view {
            ViewState::Countdown(countdown) => write!(
                f,
                " next: {} in {}s",
                countdown.target_video.title, countdown.remaining_seconds
            )?,
            ViewState::Mini(snapshot) => write!(
                f,
                " mini: {} at {}",
                snapshot.video.title,
                crate::utils::format_time(snapshot.current_time)
            )?,
            _ => {}
        }
        if self.load_error.is_some() {
            write!(f, " (no playable video)")?;
        }
        Ok(())
    }
}

pub struct App {
    controller: TransitionController,
    receiver: mpsc::UnboundedReceiver<AppCommand>,
    events: EventBus,
    shutdown: CancellationToken,
    last_view: ViewState,
}

impl App {
    pub fn new(
        controller: TransitionController,
        receiver: mpsc::UnboundedReceiver<AppCommand>,
        events: EventBus,
    ) -> Self {
        let last_view = controller.view_state();
        Self {
            controller,
            receiver,
            events,
            shutdown: CancellationToken::new(),
            last_view,
        }
    }

    /// Wire an app with clock-driven headless media and a tokio countdown.
    /// Must be called inside a tokio runtime.
    pub fn headless(
        config: &Config,
        catalog: Arc<dyn CatalogStore>,
        store: Arc<dyn KeyValueStore>,
        navigator: Box<dyn Navigator>,
        events: EventBus,
    ) -> (AppHandle, App) {
        let (handle, receiver) = AppHandle::channel();
        let tick = config.progress_tick();

        let parts = ControllerParts {
            catalog,
            ledger: ProgressLedger::new(store),
            full_media: Box::new(HeadlessMedia::new(MediaSlot::Full, handle.clone(), tick)),
            mini_media: Box::new(HeadlessMedia::new(MediaSlot::Mini, handle.clone(), tick)),
            navigator,
            timer: Box::new(ChannelTimer::new(handle.clone())),
        };
        let controller = TransitionController::new(parts, config.controller_settings());

        (handle, App::new(controller, receiver, events))
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub async fn run(mut self) {
        info!("App loop started");

        if self.controller.restore_mini_from_ledger() {
            info!("Restored mini player from previous run");
        }
        self.events
            .publish(PlayerEvent::view_changed(self.controller.view_state()))
            .await;
        self.last_view = self.controller.view_state();

        loop {
            let command = tokio::select! {
                _ = self.shutdown.cancelled() => break,
                command = self.receiver.recv() => match command {
                    Some(command) => command,
                    None => break,
                },
            };

            if matches!(command, AppCommand::Quit) {
                break;
            }
            self.dispatch(command).await;
            self.publish_view_if_changed().await;
        }

        self.controller.shutdown();
        info!("App loop stopped");
    }

    async fn dispatch(&mut self, command: AppCommand) {
        trace!("Dispatching {:?}", command);
        let name = command.name();

        let handled = match command {
            AppCommand::OpenAt { category, index } => {
                self.controller.open_at(&category, index).map(|_| true)
            }
            AppCommand::PlayRelated(index) => self.controller.play_related(index).map(|_| true),
            AppCommand::TogglePlayPause => Ok(self.controller.toggle_play_pause()),
            AppCommand::Skip(delta) => Ok(self.controller.skip(delta)),
            AppCommand::SkipForward => Ok(self.controller.skip_forward()),
            AppCommand::SkipBackward => Ok(self.controller.skip_backward()),
            AppCommand::SeekFraction(fraction) => Ok(self.controller.seek_to_fraction(fraction)),
            AppCommand::Replay => Ok(self.controller.replay()),
            AppCommand::CancelCountdown => Ok(self.controller.cancel_countdown()),
            AppCommand::PlayNow => Ok(self.controller.play_now()),
            AppCommand::Pointer(input) => {
                if let Some(gesture) = self.controller.handle_pointer(input) {
                    debug!("Gesture: {:?}", gesture);
                }
                Ok(true)
            }
            AppCommand::RestoreMini => self.controller.restore_mini().map(|_| true),
            AppCommand::CloseMini => Ok(self.controller.close_mini()),
            AppCommand::LeavePlayer => Ok(self.controller.leave_player()),
            AppCommand::RestoreRoute => self.controller.restore_player_route(None).map(|_| true),
            AppCommand::Status { respond_to } => {
                let _ = respond_to.send(self.status().await);
                Ok(true)
            }
            AppCommand::Media { slot, media, event } => {
                self.on_media_event(slot, media, event).await;
                Ok(true)
            }
            AppCommand::CountdownTick(id) => {
                self.controller.on_countdown_tick(id);
                Ok(true)
            }
            AppCommand::Quit => Ok(true),
        };

        match handled {
            Ok(true) => {}
            Ok(false) => debug!("{} had no effect in {}", name, self.last_view.label()),
            Err(e) => {
                warn!("{} rejected: {}", name, e);
                self.events
                    .publish(PlayerEvent::command_rejected(
                        name.to_string(),
                        e.to_string(),
                    ))
                    .await;
            }
        }
    }

    async fn on_media_event(&mut self, slot: MediaSlot, media: MediaRef, event: MediaEvent) {
        match self.controller.handle_media_event(slot, &media, event) {
            EngineUpdate::Progress(report) => {
                self.events
                    .publish(PlayerEvent::progress(media, report))
                    .await;
            }
            EngineUpdate::Failed(message) => {
                self.events
                    .publish(PlayerEvent::playback_failed(media, message))
                    .await;
            }
            _ => {}
        }
    }

    async fn publish_view_if_changed(&mut self) {
        let view = self.controller.view_state();
        if view == self.last_view {
            return;
        }

        if view.label() != self.last_view.label() {
            info!("View: {} -> {}", self.last_view.label(), view.label());
        }
        self.last_view = view.clone();
        self.events.publish(PlayerEvent::view_changed(view)).await;
    }

    async fn status(&mut self) -> StatusReport {
        let stats = self.events.get_stats().await;
        let session = self.controller.session();
        StatusReport {
            view: self.controller.view_state(),
            title: session.map(|s| s.video.title.clone()),
            category: session.map(|s| s.category.clone()),
            progress: self.controller.engine().progress(),
            load_error: self.controller.engine().load_error().map(str::to_string),
            events_published: stats.total_events,
            events_dropped: stats.dropped_events,
        }
    }
}
