use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::trace;

use super::{AppCommand, AppHandle};
use crate::transitions::{CountdownId, TimerDriver};

/// Countdown ticker backed by a tokio task that posts
/// [`AppCommand::CountdownTick`] into the app loop.
pub struct ChannelTimer {
    app: AppHandle,
    task: Option<JoinHandle<()>>,
}

impl ChannelTimer {
    pub fn new(app: AppHandle) -> Self {
        Self { app, task: None }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl TimerDriver for ChannelTimer {
    fn start(&mut self, id: CountdownId, period: Duration) {
        self.cancel();

        let app = self.app.clone();
        self.task = Some(tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                trace!("{} tick", id);
                if app.send(AppCommand::CountdownTick(id)).is_err() {
                    break;
                }
            }
        }));
    }

    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for ChannelTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transitions::{Countdown, CountdownTick, ManualTimer};
    use crate::test_utils::sample_video;

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_period_until_cancelled() {
        let (app, mut rx) = AppHandle::channel();
        let mut countdown = Countdown::new(Box::new(ChannelTimer::new(app)), 5);
        countdown.start(sample_video("b"));

        let mut ids = Vec::new();
        for _ in 0..2 {
            match rx.recv().await {
                Some(AppCommand::CountdownTick(id)) => ids.push(id),
                other => panic!("unexpected {:?}", other),
            }
        }
        assert_eq!(ids[0], ids[1]);
        assert!(matches!(countdown.tick(ids[0]), CountdownTick::Remaining(_)));

        countdown.cancel();
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn first_tick_waits_a_full_period_and_drop_stops() {
        let (app, mut rx) = AppHandle::channel();
        let mut timer = ChannelTimer::new(app);

        // Borrow a real id from a manually driven countdown
        let manual = ManualTimer::new();
        let mut countdown = Countdown::new(Box::new(manual.clone()), 5);
        countdown.start(sample_video("b"));
        let id = manual.running().unwrap();

        let started = Instant::now();
        timer.start(id, Duration::from_secs(1));

        match rx.recv().await {
            Some(AppCommand::CountdownTick(ticked)) => assert_eq!(ticked, id),
            other => panic!("unexpected {:?}", other),
        }
        assert!(started.elapsed() >= Duration::from_secs(1));
        assert!(timer.is_running());

        drop(timer);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());
    }
}
