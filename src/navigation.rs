//! Route change requests issued by the transition controller.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

use crate::models::{MiniSnapshot, VideoRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Route {
    /// Category grids
    Home,
    /// Full player surface
    Player,
}

/// Opaque bundle handed to the destination route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RouteState {
    Session {
        video: VideoRecord,
        category: String,
    },
    Mini(MiniSnapshot),
}

/// External router
pub trait Navigator: Send {
    fn go_to(&mut self, route: Route, state: Option<RouteState>);
}

/// Navigator that remembers every request. Clones share the history.
#[derive(Debug, Clone, Default)]
pub struct HistoryNavigator {
    history: Arc<Mutex<Vec<(Route, Option<RouteState>)>>>,
}

impl HistoryNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Route> {
        self.history
            .lock()
            .ok()
            .and_then(|history| history.last().map(|(route, _)| *route))
    }

    pub fn history(&self) -> Vec<(Route, Option<RouteState>)> {
        self.history
            .lock()
            .map(|history| history.clone())
            .unwrap_or_default()
    }
}

impl Navigator for HistoryNavigator {
    fn go_to(&mut self, route: Route, state: Option<RouteState>) {
        info!("Navigating to {:?}", route);
        match self.history.lock() {
            Ok(mut history) => history.push((route, state)),
            Err(_) => warn!("Navigation history lock poisoned, dropping {:?}", route),
        }
    }
}
