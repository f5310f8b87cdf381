//! Playback core for a video catalog client: progress ledger, playback
//! engine, gestures and full/mini transitions, plus a headless runtime.

pub mod app;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod events;
pub mod gestures;
pub mod ledger;
pub mod models;
pub mod navigation;
pub mod player;
pub mod storage;
pub mod transitions;
pub mod utils;

#[cfg(test)]
mod test_utils;

pub use utils::{AppError, Result};
