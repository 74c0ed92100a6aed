// Copyright (c) 2026 rezky_nightky

use std::collections::VecDeque;
use std::f32::consts::TAU;

use rand::Rng;

use crate::canvas::{Blend, Layer};
use crate::geom::Point;
use crate::palette::{Rgb, SPARKLE, WHITE};

pub const TRAIL_LEN: usize = 12;
pub const BURST_RADIUS: f32 = 35.0;
pub const SPARKLE_CHANCE: f64 = 0.6;
pub const BURST_MIN: usize = 130;
pub const BURST_SPREAD: usize = 70;

const LAUNCH_SPEED_MIN: f32 = 10.0;
const LAUNCH_SPEED_SPREAD: f32 = 6.0;

const FADE_ALPHA: f32 = 0.3;
const TRAIL_WIDTH: f32 = 2.5;
const HEAD_RADIUS: f32 = 2.0;
const PARTICLE_RADIUS: f32 = 1.2;

#[derive(Clone, Debug)]
pub struct Rocket {
    pub pos: Point,
    pub target: Point,
    pub vx: f32,
    pub vy: f32,
    pub color: Rgb,
    pub trail: VecDeque<Point>,
}

impl Rocket {
    fn should_burst(&self) -> bool {
        // Past the apex without reaching the target still bursts, so rockets
        // never sail off screen.
        self.pos.distance(self.target) < BURST_RADIUS || self.vy >= 0.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub pos: Point,
    pub vx: f32,
    pub vy: f32,
    pub alpha: f32,
    pub color: Rgb,
    pub decay: f32,
    pub gravity: f32,
    pub friction: f32,
}

impl Particle {
    fn sparkle<R: Rng + ?Sized>(rng: &mut R, pos: Point) -> Self {
        Self {
            pos,
            vx: (rng.random::<f32>() - 0.5) * 2.0,
            vy: (rng.random::<f32>() - 0.5) * 2.0,
            alpha: 0.8,
            color: SPARKLE,
            decay: 0.05,
            gravity: 0.05,
            friction: 0.98,
        }
    }

    fn shard<R: Rng + ?Sized>(rng: &mut R, pos: Point, color: Rgb) -> Self {
        let angle = rng.random::<f32>() * TAU;
        let speed = rng.random::<f32>() * 8.0 + 3.0;
        Self {
            pos,
            vx: angle.cos() * speed,
            vy: angle.sin() * speed,
            alpha: 1.0,
            color,
            decay: rng.random::<f32>() * 0.01 + 0.01,
            gravity: 0.1,
            friction: 0.96,
        }
    }

    /// One frame of motion; returns false once the particle has faded out.
    fn advance(&mut self) -> bool {
        self.vx *= self.friction;
        self.vy *= self.friction;
        self.vy += self.gravity;
        self.pos.x += self.vx;
        self.pos.y += self.vy;
        self.alpha -= self.decay;
        self.alpha > 0.0
    }
}

#[derive(Default)]
pub struct Fireworks {
    pub rockets: Vec<Rocket>,
    pub particles: Vec<Particle>,
    bursts: usize,
}

impl Fireworks {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn is_idle(&self) -> bool {
        self.rockets.is_empty() && self.particles.is_empty()
    }

    /// Total bursts since creation.
    pub fn bursts(&self) -> usize {
        self.bursts
    }

    pub fn clear(&mut self) {
        self.rockets.clear();
        self.particles.clear();
    }

    /// Fires one rocket from `origin` toward `target`.
    pub fn launch<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        origin: Point,
        target: Point,
        colors: &[Rgb],
    ) {
        let angle = (target.y - origin.y).atan2(target.x - origin.x);
        let speed = LAUNCH_SPEED_MIN + rng.random::<f32>() * LAUNCH_SPEED_SPREAD;
        let color = if colors.is_empty() {
            WHITE
        } else {
            colors[rng.random_range(0..colors.len())]
        };
        self.rockets.push(Rocket {
            pos: origin,
            target,
            vx: angle.cos() * speed,
            vy: angle.sin() * speed,
            color,
            trail: VecDeque::with_capacity(TRAIL_LEN + 1),
        });
    }

    fn burst<R: Rng + ?Sized>(
        particles: &mut Vec<Particle>,
        rng: &mut R,
        pos: Point,
        color: Rgb,
    ) -> usize {
        let count = BURST_MIN + (rng.random::<f32>() * BURST_SPREAD as f32) as usize;
        let count = count.min(BURST_MIN + BURST_SPREAD - 1);
        particles.reserve(count);
        for _ in 0..count {
            particles.push(Particle::shard(rng, pos, color));
        }
        count
    }

    /// Advances rockets then particles by one frame. Rockets that burst this
    /// frame are gone before painting; their shards move on the same frame.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let particles = &mut self.particles;
        let mut bursts = 0usize;
        self.rockets.retain_mut(|r| {
            r.pos.x += r.vx;
            r.pos.y += r.vy;
            r.trail.push_back(r.pos);
            if r.trail.len() > TRAIL_LEN {
                r.trail.pop_front();
            }

            if rng.random_bool(SPARKLE_CHANCE) {
                particles.push(Particle::sparkle(rng, r.pos));
            }

            if r.should_burst() {
                let n = Self::burst(particles, rng, r.pos, r.color);
                log::trace!("burst of {} at ({:.0},{:.0})", n, r.pos.x, r.pos.y);
                bursts += 1;
                return false;
            }
            true
        });
        self.bursts += bursts;

        self.particles.retain_mut(Particle::advance);
    }

    /// Fades what was there, then adds this frame's glow on top.
    pub fn paint(&self, layer: &mut Layer) {
        layer.fade_out(FADE_ALPHA);

        for r in &self.rockets {
            if r.trail.len() > 1 {
                layer.stroke_polyline(r.trail.iter().copied(), TRAIL_WIDTH, r.color, 1.0, Blend::Lighter);
            }
            layer.fill_disc(r.pos, HEAD_RADIUS, WHITE, 1.0, Blend::Lighter);
        }

        for p in &self.particles {
            layer.fill_disc(p.pos, PARTICLE_RADIUS, p.color, p.alpha, Blend::Lighter);
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::geom::Viewport;
    use crate::palette::FireworkTheme;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn rocket(pos: Point, target: Point, vx: f32, vy: f32) -> Rocket {
        Rocket {
            pos,
            target,
            vx,
            vy,
            color: WHITE,
            trail: VecDeque::new(),
        }
    }

    #[test]
    fn launch_aims_from_bottom_centre_at_pointer() {
        let mut rng = rng();
        let mut fw = Fireworks::new();
        let origin = Point::new(960.0, 1080.0);
        let click = Point::new(960.0, 540.0);
        fw.launch(&mut rng, origin, click, FireworkTheme::Classic.colors());

        assert_eq!(fw.rockets.len(), 1);
        let r = &fw.rockets[0];
        assert_eq!(r.pos, origin);
        let speed = (r.vx * r.vx + r.vy * r.vy).sqrt();
        assert!((10.0..16.0).contains(&speed));
        assert!(r.vx.abs() < 1e-4);
        assert!(r.vy < 0.0);
    }

    #[test]
    fn launch_direction_matches_click_vector() {
        let mut rng = rng();
        let mut fw = Fireworks::new();
        let origin = Point::new(960.0, 1080.0);
        let click = Point::new(1200.0, 300.0);
        fw.launch(&mut rng, origin, click, &[]);

        let r = &fw.rockets[0];
        let (dx, dy) = (click.x - origin.x, click.y - origin.y);
        let len = (dx * dx + dy * dy).sqrt();
        let speed = (r.vx * r.vx + r.vy * r.vy).sqrt();
        assert!((r.vx / speed - dx / len).abs() < 1e-4);
        assert!((r.vy / speed - dy / len).abs() < 1e-4);
        assert_eq!(r.color, WHITE);
    }

    #[test]
    fn trail_is_capped() {
        let mut rng = rng();
        let mut fw = Fireworks::new();
        fw.rockets.push(rocket(
            Point::new(0.0, 10_000.0),
            Point::new(0.0, -10_000.0),
            0.0,
            -1.0,
        ));
        for _ in 0..40 {
            fw.step(&mut rng);
        }
        assert_eq!(fw.rockets.len(), 1);
        assert_eq!(fw.rockets[0].trail.len(), TRAIL_LEN);
        assert_eq!(fw.rockets[0].trail.back(), Some(&fw.rockets[0].pos));
    }

    #[test]
    fn rocket_bursts_on_the_frame_it_gets_close() {
        let mut rng = rng();
        let mut fw = Fireworks::new();
        fw.rockets.push(rocket(
            Point::new(100.0, 200.0),
            Point::new(100.0, 100.0),
            0.0,
            -10.0,
        ));
        // 190, 180, ..., 140: still 40 away.
        for _ in 0..6 {
            fw.step(&mut rng);
            assert_eq!(fw.rockets.len(), 1);
        }
        fw.step(&mut rng);
        assert!(fw.rockets.is_empty());
        assert_eq!(fw.bursts(), 1);
    }

    #[test]
    fn rocket_bursts_at_apex_even_far_from_target() {
        let mut rng = rng();
        let mut fw = Fireworks::new();
        fw.rockets.push(rocket(
            Point::new(100.0, 500.0),
            Point::new(900.0, 500.0),
            10.0,
            0.0,
        ));
        fw.step(&mut rng);
        assert!(fw.rockets.is_empty());
        assert_eq!(fw.bursts(), 1);
    }

    #[test]
    fn burst_size_stays_in_range() {
        let mut rng = rng();
        for _ in 0..200 {
            let mut particles = Vec::new();
            let n = Fireworks::burst(&mut particles, &mut rng, Point::default(), WHITE);
            assert!((BURST_MIN..BURST_MIN + BURST_SPREAD).contains(&n));
            assert_eq!(particles.len(), n);
        }
    }

    #[test]
    fn shards_follow_burst_parameters() {
        let mut rng = rng();
        let mut particles = Vec::new();
        let color = Rgb::hex(0x00BFFF);
        Fireworks::burst(&mut particles, &mut rng, Point::new(5.0, 5.0), color);
        for p in &particles {
            let speed = (p.vx * p.vx + p.vy * p.vy).sqrt();
            assert!((2.999..11.001).contains(&speed));
            assert!((0.01..0.02).contains(&p.decay));
            assert_eq!((p.gravity, p.friction, p.alpha), (0.1, 0.96, 1.0));
            assert_eq!(p.color, color);
        }
    }

    #[test]
    fn particle_opacity_never_rises_and_dead_ones_go() {
        let mut rng = rng();
        let mut fw = Fireworks::new();
        Fireworks::burst(&mut fw.particles, &mut rng, Point::new(400.0, 300.0), WHITE);
        for _ in 0..120 {
            // Removal keeps order, so survivors line up with what they were.
            let survivors: Vec<(f32, f32)> = fw
                .particles
                .iter()
                .map(|p| (p.alpha, p.alpha - p.decay))
                .filter(|(_, next)| *next > 0.0)
                .collect();
            fw.step(&mut rng);
            assert_eq!(fw.particles.len(), survivors.len());
            for (p, (before, next)) in fw.particles.iter().zip(&survivors) {
                assert_eq!(p.alpha, *next);
                assert!(p.alpha > 0.0);
                assert!(p.alpha <= *before);
            }
        }
        assert!(fw.particles.is_empty());
    }

    #[test]
    fn sparkles_are_golden_and_short_lived() {
        let mut rng = rng();
        let mut fw = Fireworks::new();
        fw.rockets.push(rocket(
            Point::new(0.0, 10_000.0),
            Point::new(0.0, -10_000.0),
            0.0,
            -1.0,
        ));
        for _ in 0..50 {
            fw.step(&mut rng);
        }
        assert!(!fw.particles.is_empty());
        assert!(fw.particles.len() < 50);
        for p in &fw.particles {
            assert_eq!(p.color, SPARKLE);
            assert_eq!(p.decay, 0.05);
        }
    }

    #[test]
    fn paint_glows_and_fades() {
        let vp = Viewport::new(40, 20, 8.0, 16.0);
        let mut layer = Layer::new(vp);
        let mut rng = rng();
        let mut fw = Fireworks::new();
        Fireworks::burst(&mut fw.particles, &mut rng, Point::new(160.0, 160.0), WHITE);
        fw.paint(&mut layer);
        let center = vp.dot_at(Point::new(160.0, 160.0)).unwrap();
        assert_eq!(layer.pixel(center)[3], 1.0);

        fw.clear();
        assert!(fw.is_idle());
        fw.paint(&mut layer);
        assert!((layer.pixel(center)[3] - 0.7).abs() < 1e-6);
    }
}
