use tracing::debug;

/// Vertical drag tracker that fires once per gesture when the pointer has
/// moved down by at least `threshold` units.
#[derive(Debug, Clone)]
pub struct DragRecognizer {
    threshold: f64,
    start_y: Option<f64>,
}

impl DragRecognizer {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            start_y: None,
        }
    }

    pub fn is_tracking(&self) -> bool {
        self.start_y.is_some()
    }

    pub fn pointer_down(&mut self, y: f64) {
        self.start_y = Some(y);
    }

    /// Returns true exactly once per drag, when the threshold is crossed.
    /// Tracking stops at that point, so further moves are ignored.
    pub fn pointer_move(&mut self, y: f64) -> bool {
        let Some(start_y) = self.start_y else {
            return false;
        };

        let delta = y - start_y;
        if delta >= self.threshold {
            debug!("Drag crossed demote threshold ({:.0} >= {:.0})", delta, self.threshold);
            self.start_y = None;
            true
        } else {
            false
        }
    }

    /// Release before the threshold abandons the gesture
    pub fn pointer_up(&mut self) {
        self.start_y = None;
    }

    pub fn reset(&mut self) {
        self.start_y = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_drag_never_fires() {
        let mut drag = DragRecognizer::new(200.0);
        drag.pointer_down(100.0);
        for y in [150.0, 250.0, 299.0] {
            assert!(!drag.pointer_move(y));
        }
        drag.pointer_up();
        assert!(!drag.is_tracking());
    }

    #[test]
    fn long_drag_fires_once() {
        let mut drag = DragRecognizer::new(200.0);
        drag.pointer_down(0.0);

        let fired: Vec<bool> = [50.0, 120.0, 200.0, 260.0, 400.0, 800.0]
            .into_iter()
            .map(|y| drag.pointer_move(y))
            .collect();

        assert_eq!(fired.iter().filter(|f| **f).count(), 1);
        assert!(fired[2]);
    }

    #[test]
    fn upward_drag_does_not_fire() {
        let mut drag = DragRecognizer::new(200.0);
        drag.pointer_down(500.0);
        assert!(!drag.pointer_move(100.0));
    }

    #[test]
    fn move_without_down_is_ignored() {
        let mut drag = DragRecognizer::new(200.0);
        assert!(!drag.pointer_move(1000.0));
    }

    #[test]
    fn new_drag_can_fire_again() {
        let mut drag = DragRecognizer::new(200.0);
        drag.pointer_down(0.0);
        assert!(drag.pointer_move(210.0));
        drag.pointer_up();

        drag.pointer_down(0.0);
        assert!(drag.pointer_move(205.0));
    }
}
