use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, trace};

use super::traits::MediaElement;
use super::types::{MediaEvent, MediaSlot};
use crate::app::{AppCommand, AppHandle};
use crate::models::{MediaRef, VideoRecord, is_known_duration};

#[derive(Debug)]
enum ClockCommand {
    Play,
    Pause,
    Seek(f64),
}

/// Media element without a decoder: a clock task advances the position and
/// reports it back to the app loop like a real element would.
///
/// The duration comes from the catalog's display label; a video without a
/// usable label fails to load.
pub struct HeadlessMedia {
    slot: MediaSlot,
    app: AppHandle,
    tick: Duration,
    control: Option<mpsc::UnboundedSender<ClockCommand>>,
    task: Option<JoinHandle<()>>,
}

impl HeadlessMedia {
    pub fn new(slot: MediaSlot, app: AppHandle, tick: Duration) -> Self {
        Self {
            slot,
            app,
            tick,
            control: None,
            task: None,
        }
    }

    fn send(&self, command: ClockCommand) {
        match &self.control {
            Some(control) => {
                if control.send(command).is_err() {
                    debug!("{:?} clock already stopped", self.slot);
                }
            }
            None => trace!("{:?} media has nothing loaded, dropping {:?}", self.slot, command),
        }
    }

    fn stop_clock(&mut self) {
        self.control = None;
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl MediaElement for HeadlessMedia {
    fn load(&mut self, video: &VideoRecord) {
        self.stop_clock();

        let (tx, rx) = mpsc::unbounded_channel();
        let clock = MediaClock {
            slot: self.slot,
            media: video.media_ref.clone(),
            duration: video.duration_hint(),
            app: self.app.clone(),
            tick: self.tick,
        };
        debug!("{:?} media loading {}", self.slot, video.media_ref);

        self.control = Some(tx);
        self.task = Some(tokio::spawn(clock.run(rx)));
    }

    fn play(&mut self) {
        self.send(ClockCommand::Play);
    }

    fn pause(&mut self) {
        self.send(ClockCommand::Pause);
    }

    fn seek(&mut self, position_secs: f64) {
        self.send(ClockCommand::Seek(position_secs));
    }

    fn unload(&mut self) {
        self.stop_clock();
    }
}

impl Drop for HeadlessMedia {
    fn drop(&mut self) {
        self.stop_clock();
    }
}

struct MediaClock {
    slot: MediaSlot,
    media: MediaRef,
    duration: Option<f64>,
    app: AppHandle,
    tick: Duration,
}

impl MediaClock {
    /// Returns false once the app loop is gone
    fn emit(&self, event: MediaEvent) -> bool {
        self.app
            .send(AppCommand::Media {
                slot: self.slot,
                media: self.media.clone(),
                event,
            })
            .is_ok()
    }

    async fn run(self, mut control: mpsc::UnboundedReceiver<ClockCommand>) {
        let Some(duration) = self.duration.filter(|d| is_known_duration(*d)) else {
            self.emit(MediaEvent::Error(format!(
                "{} has no playable duration",
                self.media
            )));
            return;
        };

        if !self.emit(MediaEvent::Ready { duration }) {
            return;
        }

        let step = self.tick.as_secs_f64();
        let mut position = 0.0_f64;
        let mut playing = false;
        let mut ticker = interval(self.tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            let alive = tokio::select! {
                command = control.recv() => match command {
                    Some(ClockCommand::Play) => {
                        playing = true;
                        true
                    }
                    Some(ClockCommand::Pause) => {
                        playing = false;
                        true
                    }
                    Some(ClockCommand::Seek(target)) => {
                        position = target.clamp(0.0, duration);
                        self.emit(MediaEvent::Seeked)
                            && self.emit(MediaEvent::TimeUpdate {
                                current_time: position,
                                duration,
                            })
                    }
                    None => false,
                },
                _ = ticker.tick(), if playing => {
                    position = (position + step).min(duration);
                    let mut alive = self.emit(MediaEvent::TimeUpdate {
                        current_time: position,
                        duration,
                    });
                    if position >= duration {
                        playing = false;
                        alive = alive && self.emit(MediaEvent::Ended);
                    }
                    alive
                }
            };

            if !alive {
                break;
            }
        }

        trace!("{:?} clock for {} stopped", self.slot, self.media);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn next_media_event(
        rx: &mut mpsc::UnboundedReceiver<AppCommand>,
    ) -> (MediaSlot, MediaRef, MediaEvent) {
        match rx.recv().await {
            Some(AppCommand::Media { slot, media, event }) => (slot, media, event),
            other => panic!("expected media event, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn reports_ready_then_progress_then_end() {
        let (app, mut rx) = AppHandle::channel();
        let mut media = HeadlessMedia::new(MediaSlot::Full, app, Duration::from_millis(500));

        let video = VideoRecord::new("Short", "short.mp4").with_duration_label("0:01");
        media.load(&video);

        let (slot, media_ref, event) = next_media_event(&mut rx).await;
        assert_eq!(slot, MediaSlot::Full);
        assert_eq!(media_ref, MediaRef::new("short.mp4"));
        assert_eq!(event, MediaEvent::Ready { duration: 1.0 });

        media.play();

        let mut updates = Vec::new();
        loop {
            let (_, _, event) = next_media_event(&mut rx).await;
            match event {
                MediaEvent::TimeUpdate { current_time, .. } => updates.push(current_time),
                MediaEvent::Ended => break,
                other => panic!("unexpected {:?}", other),
            }
        }
        assert_eq!(updates.last(), Some(&1.0));
    }

    #[tokio::test(start_paused = true)]
    async fn seek_reports_new_position() {
        let (app, mut rx) = AppHandle::channel();
        let mut media = HeadlessMedia::new(MediaSlot::Mini, app, Duration::from_millis(250));

        media.load(&VideoRecord::new("Long", "long.mp4").with_duration_label("10:00"));
        next_media_event(&mut rx).await;

        media.seek(700.0);
        assert_eq!(next_media_event(&mut rx).await.2, MediaEvent::Seeked);
        assert_eq!(
            next_media_event(&mut rx).await.2,
            MediaEvent::TimeUpdate {
                current_time: 600.0,
                duration: 600.0,
            }
        );
    }

    #[tokio::test]
    async fn missing_duration_fails_load() {
        let (app, mut rx) = AppHandle::channel();
        let mut media = HeadlessMedia::new(MediaSlot::Full, app, Duration::from_millis(250));

        media.load(&VideoRecord::new("Broken", "broken.mp4"));

        let (_, _, event) = next_media_event(&mut rx).await;
        assert!(matches!(event, MediaEvent::Error(_)));
    }
}
