use std::time::{Duration, Instant};
use tracing::trace;

/// Which half of the surface a double tap landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapSide {
    Left,
    Right,
}

/// Pairs taps that land less than `window` apart.
///
/// The second tap of a pair decides the side; after a pair fires the next
/// tap starts a fresh pair.
#[derive(Debug, Clone)]
pub struct DoubleTapRecognizer {
    window: Duration,
    last_tap: Option<Instant>,
}

impl DoubleTapRecognizer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_tap: None,
        }
    }

    pub fn tap(&mut self, x: f64, surface_width: f64, at: Instant) -> Option<TapSide> {
        let paired = self
            .last_tap
            .and_then(|previous| at.checked_duration_since(previous))
            .is_some_and(|elapsed| elapsed < self.window);

        if !paired {
            self.last_tap = Some(at);
            return None;
        }

        self.last_tap = None;
        let side = if x < surface_width / 2.0 {
            TapSide::Left
        } else {
            TapSide::Right
        };
        trace!("Double tap on {:?} half", side);
        Some(side)
    }

    /// Forget any pending first tap
    pub fn reset(&mut self) {
        self.last_tap = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(300);

    #[test]
    fn single_tap_does_nothing() {
        let mut taps = DoubleTapRecognizer::new(WINDOW);
        assert_eq!(taps.tap(10.0, 100.0, Instant::now()), None);
    }

    #[test]
    fn quick_pair_reports_side_of_second_tap() {
        let mut taps = DoubleTapRecognizer::new(WINDOW);
        let t0 = Instant::now();

        assert_eq!(taps.tap(10.0, 100.0, t0), None);
        assert_eq!(
            taps.tap(20.0, 100.0, t0 + Duration::from_millis(150)),
            Some(TapSide::Left)
        );

        let t1 = t0 + Duration::from_secs(5);
        taps.tap(90.0, 100.0, t1);
        assert_eq!(
            taps.tap(50.0, 100.0, t1 + Duration::from_millis(299)),
            Some(TapSide::Right)
        );
    }

    #[test]
    fn slow_pair_does_nothing() {
        let mut taps = DoubleTapRecognizer::new(WINDOW);
        let t0 = Instant::now();

        assert_eq!(taps.tap(10.0, 100.0, t0), None);
        assert_eq!(taps.tap(10.0, 100.0, t0 + WINDOW), None);
    }

    #[test]
    fn third_tap_starts_new_pair() {
        let mut taps = DoubleTapRecognizer::new(WINDOW);
        let t0 = Instant::now();

        taps.tap(10.0, 100.0, t0);
        assert!(taps.tap(10.0, 100.0, t0 + Duration::from_millis(100)).is_some());
        assert_eq!(taps.tap(10.0, 100.0, t0 + Duration::from_millis(200)), None);
    }

    #[test]
    fn reset_drops_pending_tap() {
        let mut taps = DoubleTapRecognizer::new(WINDOW);
        let t0 = Instant::now();

        taps.tap(10.0, 100.0, t0);
        taps.reset();
        assert_eq!(taps.tap(10.0, 100.0, t0 + Duration::from_millis(50)), None);
    }
}
