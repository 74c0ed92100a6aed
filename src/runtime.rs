// Copyright (c) 2026 rezky_nightky

use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorMode {
    Mono,
    Color16,
    Color256,
    TrueColor,
}

impl ColorMode {
    pub fn label(self) -> &'static str {
        match self {
            ColorMode::TrueColor => "24-bit truecolor",
            ColorMode::Color256 => "8-bit (256-color)",
            ColorMode::Color16 => "16-color",
            ColorMode::Mono => "mono",
        }
    }
}

/// Fixed-rate frame pacing. Late frames are not made up for.
pub struct FrameClock {
    period: Duration,
    next_frame: Instant,
}

impl FrameClock {
    pub fn new(fps: f64, now: Instant) -> Self {
        Self {
            period: Duration::from_secs_f64(1.0 / fps),
            next_frame: now,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Time left until the next frame is due, `None` when it already is.
    pub fn until_due(&self, now: Instant) -> Option<Duration> {
        if now >= self.next_frame {
            None
        } else {
            Some(self.next_frame - now)
        }
    }

    pub fn advance(&mut self, now: Instant) {
        self.next_frame += self.period;
        if now > self.next_frame {
            self.next_frame = now;
        }
    }
}

#[derive(Debug, Default)]
pub struct PerfStats {
    pub frames: u64,
    pub drawn_frames: u64,
    pub overshoot_frames: u64,
    pub work_sum_s: f64,
    pub work_max_s: f64,
    pub max_particles: usize,
    pub max_rockets: usize,
    pub launches: u64,
}

impl PerfStats {
    pub fn record_frame(&mut self, work: Duration, period: Duration, drawn: bool) {
        let work_s = work.as_secs_f64();
        self.frames = self.frames.saturating_add(1);
        if drawn {
            self.drawn_frames = self.drawn_frames.saturating_add(1);
        }
        if work > period {
            self.overshoot_frames = self.overshoot_frames.saturating_add(1);
        }
        self.work_sum_s += work_s;
        self.work_max_s = self.work_max_s.max(work_s);
    }

    pub fn record_load(&mut self, rockets: usize, particles: usize) {
        self.max_rockets = self.max_rockets.max(rockets);
        self.max_particles = self.max_particles.max(particles);
    }

    pub fn print_summary(&self, elapsed: Duration, target_fps: f64) {
        let elapsed_s = elapsed.as_secs_f64().max(0.000_001);
        let frames = self.frames.max(1) as f64;

        println!("PERF STATS:");
        println!("  elapsed_s: {:.3}", elapsed_s);
        println!("  target_fps: {:.3}", target_fps);
        println!("  avg_fps: {:.3}", self.frames as f64 / elapsed_s);
        println!("  frames: {}", self.frames);
        println!(
            "  drawn_frames: {} ({:.1}%)",
            self.drawn_frames,
            self.drawn_frames as f64 / frames * 100.0
        );
        println!("  avg_work_ms: {:.3}", self.work_sum_s / frames * 1000.0);
        println!("  max_work_ms: {:.3}", self.work_max_s * 1000.0);
        println!(
            "  overshoot_frames: {} ({:.1}%)",
            self.overshoot_frames,
            self.overshoot_frames as f64 / frames * 100.0
        );
        println!("  launches: {}", self.launches);
        println!("  max_rockets: {}", self.max_rockets);
        println!("  max_particles: {}", self.max_particles);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_is_due_immediately_then_waits_one_period() {
        let t0 = Instant::now();
        let mut clock = FrameClock::new(50.0, t0);
        assert!(clock.until_due(t0).is_none());

        clock.advance(t0);
        assert_eq!(clock.until_due(t0), Some(Duration::from_millis(20)));
    }

    #[test]
    fn clock_does_not_accumulate_backlog() {
        let t0 = Instant::now();
        let mut clock = FrameClock::new(100.0, t0);
        let late = t0 + Duration::from_secs(1);
        clock.advance(late);
        assert!(clock.until_due(late).is_none());
        clock.advance(late);
        assert_eq!(clock.until_due(late), Some(Duration::from_millis(10)));
    }

    #[test]
    fn perf_stats_track_overshoot_and_peaks() {
        let mut stats = PerfStats::default();
        let period = Duration::from_millis(16);
        stats.record_frame(Duration::from_millis(4), period, true);
        stats.record_frame(Duration::from_millis(30), period, false);
        stats.record_load(3, 400);
        stats.record_load(1, 100);

        assert_eq!(stats.frames, 2);
        assert_eq!(stats.drawn_frames, 1);
        assert_eq!(stats.overshoot_frames, 1);
        assert_eq!(stats.max_rockets, 3);
        assert_eq!(stats.max_particles, 400);
    }
}
