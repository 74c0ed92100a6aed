// Copyright (c) 2026 rezky_nightky

use std::time::{Duration, Instant};

use crate::geom::Point;

/// How long a pointer-down keeps pushing snow around.
pub const INTERACTION_WINDOW: Duration = Duration::from_millis(300);

/// Most recent pointer-down and when it happened. Last event wins.
#[derive(Clone, Copy, Debug, Default)]
pub struct Interaction {
    pub pos: Point,
    pub active: bool,
    pub at: Option<Instant>,
}

impl Interaction {
    pub fn record(&mut self, pos: Point, now: Instant) {
        self.pos = pos;
        self.active = true;
        self.at = Some(now);
    }

    /// Returns the interaction point while it is still fresh.
    pub fn fresh_at(&self, now: Instant) -> Option<Point> {
        if !self.active {
            return None;
        }
        let at = self.at?;
        if now.saturating_duration_since(at) < INTERACTION_WINDOW {
            Some(self.pos)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inactive_by_default() {
        let i = Interaction::default();
        assert!(i.fresh_at(Instant::now()).is_none());
    }

    #[test]
    fn fresh_for_the_window_only() {
        let t0 = Instant::now();
        let mut i = Interaction::default();
        i.record(Point::new(5.0, 6.0), t0);

        assert_eq!(i.fresh_at(t0), Some(Point::new(5.0, 6.0)));
        assert!(i.fresh_at(t0 + Duration::from_millis(299)).is_some());
        assert!(i.fresh_at(t0 + INTERACTION_WINDOW).is_none());
    }

    #[test]
    fn later_event_replaces_earlier() {
        let t0 = Instant::now();
        let mut i = Interaction::default();
        i.record(Point::new(1.0, 1.0), t0);
        i.record(Point::new(9.0, 9.0), t0 + Duration::from_millis(250));
        assert_eq!(
            i.fresh_at(t0 + Duration::from_millis(400)),
            Some(Point::new(9.0, 9.0))
        );
    }
}
