#![allow(dead_code)]

pub mod builders;
pub mod mocks;

use reelcast::catalog::JsonCatalog;
use reelcast::ledger::ProgressLedger;
use reelcast::models::MediaRef;
use reelcast::navigation::HistoryNavigator;
use reelcast::player::{EngineUpdate, MediaEvent, MediaSlot};
use reelcast::storage::FileStore;
use reelcast::transitions::{
    ControllerParts, ControllerSettings, ManualTimer, TransitionController,
};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

pub use builders::{CatalogBuilder, video};
pub use mocks::{MediaCall, MockMedia};

pub const DURATION: f64 = 600.0;

/// Controller wired to mocks and a file-backed ledger in a temp dir
pub struct TestContext {
    pub controller: TransitionController,
    pub full: MockMedia,
    pub mini: MockMedia,
    pub navigator: HistoryNavigator,
    pub timer: ManualTimer,
    pub ledger: ProgressLedger,
    ledger_path: PathBuf,
    _temp_dir: TempDir,
}

pub fn default_catalog() -> JsonCatalog {
    CatalogBuilder::new()
        .category("Movies", &["bunny", "sintel", "steel"])
        .category("Shorts", &["solo"])
        .build()
}

impl TestContext {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let ledger_path = temp_dir.path().join("ledger.json");
        Self::build(temp_dir, ledger_path)
    }

    fn build(temp_dir: TempDir, ledger_path: PathBuf) -> Self {
        let store = FileStore::open(&ledger_path).expect("Failed to open ledger");
        let ledger = ProgressLedger::new(Arc::new(store));
        let full = MockMedia::new();
        let mini = MockMedia::new();
        let navigator = HistoryNavigator::new();
        let timer = ManualTimer::new();

        let controller = TransitionController::new(
            ControllerParts {
                catalog: Arc::new(default_catalog()),
                ledger: ledger.clone(),
                full_media: Box::new(full.clone()),
                mini_media: Box::new(mini.clone()),
                navigator: Box::new(navigator.clone()),
                timer: Box::new(timer.clone()),
            },
            ControllerSettings::default(),
        );

        Self {
            controller,
            full,
            mini,
            navigator,
            timer,
            ledger,
            ledger_path,
            _temp_dir: temp_dir,
        }
    }

    /// Simulate a hard reload: drop everything in memory and reopen the
    /// same ledger file
    pub fn reload(self) -> Self {
        let Self {
            controller,
            ledger_path,
            _temp_dir: temp_dir,
            ..
        } = self;
        drop(controller);
        Self::build(temp_dir, ledger_path)
    }

    pub fn full_event(&mut self, event: MediaEvent) -> EngineUpdate {
        let media = self
            .controller
            .engine()
            .current_media()
            .cloned()
            .expect("no live session");
        self.controller
            .handle_media_event(MediaSlot::Full, &media, event)
    }

    pub fn ready(&mut self) -> EngineUpdate {
        self.full_event(MediaEvent::Ready { duration: DURATION })
    }

    pub fn time_update(&mut self, current_time: f64) -> EngineUpdate {
        self.full_event(MediaEvent::TimeUpdate {
            current_time,
            duration: DURATION,
        })
    }

    pub fn end(&mut self) -> EngineUpdate {
        self.full_event(MediaEvent::Ended)
    }

    pub fn current_time(&self) -> f64 {
        self.controller
            .session()
            .map(|s| s.current_time)
            .expect("no live session")
    }

    pub fn current_media(&self) -> Option<MediaRef> {
        self.controller.engine().current_media().cloned()
    }
}
