//! Pointer input → discrete player gestures.
//!
//! Both recognizers see every event. Once a drag crosses the demote
//! threshold it owns the interaction: any pending first tap is dropped and
//! taps are ignored until the next pointer-down.

mod double_tap;
mod drag;

pub use double_tap::{DoubleTapRecognizer, TapSide};
pub use drag::DragRecognizer;

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    Down { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Up { x: f64, y: f64 },
    /// A tap on the video surface
    Tap {
        x: f64,
        surface_width: f64,
        at: Instant,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureEvent {
    Demote,
    SkipBackward,
    SkipForward,
}

#[derive(Debug, Clone)]
pub struct GestureDetector {
    drag: DragRecognizer,
    taps: DoubleTapRecognizer,
    drag_claimed: bool,
}

impl GestureDetector {
    pub fn new(demote_threshold: f64, double_tap_window: Duration) -> Self {
        Self {
            drag: DragRecognizer::new(demote_threshold),
            taps: DoubleTapRecognizer::new(double_tap_window),
            drag_claimed: false,
        }
    }

    pub fn handle(&mut self, input: PointerInput) -> Option<GestureEvent> {
        match input {
            PointerInput::Down { y, .. } => {
                self.drag_claimed = false;
                self.drag.pointer_down(y);
                None
            }
            PointerInput::Move { y, .. } => {
                if self.drag.pointer_move(y) {
                    self.drag_claimed = true;
                    self.taps.reset();
                    Some(GestureEvent::Demote)
                } else {
                    None
                }
            }
            PointerInput::Up { .. } => {
                self.drag.pointer_up();
                None
            }
            PointerInput::Tap {
                x,
                surface_width,
                at,
            } => {
                if self.drag_claimed {
                    return None;
                }
                self.taps.tap(x, surface_width, at).map(|side| match side {
                    TapSide::Left => GestureEvent::SkipBackward,
                    TapSide::Right => GestureEvent::SkipForward,
                })
            }
        }
    }

    /// Drop all in-flight gesture state, e.g. when the player surface goes away
    pub fn reset(&mut self) {
        self.drag.reset();
        self.taps.reset();
        self.drag_claimed = false;
    }
}
