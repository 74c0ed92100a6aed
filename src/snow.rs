// Copyright (c) 2026 rezky_nightky

use rand::Rng;

use crate::canvas::{Blend, Layer};
use crate::geom::Point;
use crate::palette::SNOW;

/// Viewport area, in square pixels, per snowflake.
pub const DEFAULT_AREA_PER_FLAKE: f32 = 8000.0;

pub const IMPULSE_FRICTION: f32 = 0.95;
pub const REPULSION_RADIUS: f32 = 150.0;
pub const REPULSION_STRENGTH: f32 = 10.0;
const SNOW_OPACITY: f32 = 0.7;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Snowflake {
    pub x: f32,
    pub y: f32,
    /// Impulse left over from pointer pushes; decays every frame.
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
    pub speed: f32,
    pub wind: f32,
}

impl Snowflake {
    fn scatter<R: Rng + ?Sized>(rng: &mut R, w: f32, h: f32) -> Self {
        Self {
            x: rng.random::<f32>() * w,
            y: rng.random::<f32>() * h,
            vx: 0.0,
            vy: 0.0,
            radius: rng.random::<f32>() * 2.0 + 1.0,
            speed: rng.random::<f32>() + 0.5,
            wind: (rng.random::<f32>() - 0.5) * 0.5,
        }
    }

    fn recycle<R: Rng + ?Sized>(&mut self, rng: &mut R, w: f32) {
        self.y = -self.radius;
        self.x = rng.random::<f32>() * w;
        self.vx = 0.0;
        self.vy = 0.0;
    }
}

/// Impulse a pointer at `from` gives a flake at `at`, or `None` when out of reach.
pub fn repulsion(at: Point, from: Point) -> Option<(f32, f32)> {
    let dx = at.x - from.x;
    let dy = at.y - from.y;
    let distance = (dx * dx + dy * dy).sqrt();
    if distance >= REPULSION_RADIUS {
        return None;
    }
    let force = (REPULSION_RADIUS - distance) / REPULSION_RADIUS;
    let angle = dy.atan2(dx);
    Some((
        angle.cos() * force * REPULSION_STRENGTH,
        angle.sin() * force * REPULSION_STRENGTH,
    ))
}

pub struct SnowField {
    pub width: f32,
    pub height: f32,
    pub area_per_flake: f32,
    flakes: Vec<Snowflake>,
    painted: Vec<(Point, f32)>,
}

impl SnowField {
    pub fn new(area_per_flake: f32) -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            area_per_flake: area_per_flake.max(1.0),
            flakes: Vec::new(),
            painted: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn flakes(&self) -> &[Snowflake] {
        &self.flakes
    }

    #[cfg(test)]
    pub fn flakes_mut(&mut self) -> &mut [Snowflake] {
        &mut self.flakes
    }

    pub fn batch_size(&self) -> usize {
        ((self.width * self.height) / self.area_per_flake).floor() as usize
    }

    /// Resizes the field and scatters a fresh batch over it.
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R, width: f32, height: f32) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
        let n = self.batch_size();
        let (w, h) = (self.width, self.height);
        self.flakes.clear();
        self.flakes.resize_with(n, || Snowflake::scatter(rng, w, h));
        self.painted.clear();
        self.painted.reserve(n);
        log::debug!("snow: {} flakes over {:.0}x{:.0}px", n, w, h);
    }

    /// Advances every flake one frame. `push` is the fresh interaction point, if any.
    ///
    /// Flakes are recorded for painting where they land this frame, before
    /// recycling or wrapping moves them.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R, push: Option<Point>) {
        let (w, h) = (self.width, self.height);
        self.painted.clear();
        for flake in &mut self.flakes {
            flake.y += flake.speed + flake.vy;
            flake.x += flake.wind + flake.vx;

            flake.vx *= IMPULSE_FRICTION;
            flake.vy *= IMPULSE_FRICTION;

            if let Some((px, py)) = push.and_then(|p| repulsion(Point::new(flake.x, flake.y), p)) {
                flake.vx += px;
                flake.vy += py;
            }

            self.painted.push((Point::new(flake.x, flake.y), flake.radius));

            if flake.y > h {
                flake.recycle(rng, w);
            }
            if flake.x > w {
                flake.x = 0.0;
            }
            if flake.x < 0.0 {
                flake.x = w;
            }
        }
    }

    /// Hard clear, then every flake as a single white path.
    pub fn paint(&self, layer: &mut Layer) {
        layer.clear();
        layer.fill_discs(
            self.painted.iter().copied(),
            SNOW,
            SNOW_OPACITY,
            Blend::SourceOver,
        );
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::geom::Viewport;

    fn field(w: f32, h: f32) -> (SnowField, StdRng) {
        let mut rng = StdRng::seed_from_u64(7);
        let mut f = SnowField::new(DEFAULT_AREA_PER_FLAKE);
        f.reset(&mut rng, w, h);
        (f, rng)
    }

    #[test]
    fn batch_size_follows_viewport_area() {
        let (f, _) = field(1920.0, 1080.0);
        assert_eq!(f.flakes().len(), 259);
        let (f, _) = field(80.0, 80.0);
        assert!(f.flakes().is_empty());
    }

    #[test]
    fn scattered_flakes_stay_in_their_ranges() {
        let (f, _) = field(800.0, 600.0);
        for fl in f.flakes() {
            assert!((0.0..800.0).contains(&fl.x));
            assert!((0.0..600.0).contains(&fl.y));
            assert!((1.0..3.0).contains(&fl.radius));
            assert!((0.5..1.5).contains(&fl.speed));
            assert!((-0.25..0.25).contains(&fl.wind));
            assert_eq!((fl.vx, fl.vy), (0.0, 0.0));
        }
    }

    #[test]
    fn flakes_falling_out_are_recycled_to_the_top() {
        let (mut f, mut rng) = field(800.0, 600.0);
        for fl in f.flakes_mut() {
            fl.y = 599.9;
            fl.vx = 3.0;
            fl.vy = 2.0;
        }
        f.step(&mut rng, None);
        for fl in f.flakes() {
            assert!(fl.y >= -fl.radius && fl.y < 0.0);
            assert_eq!((fl.vx, fl.vy), (0.0, 0.0));
            assert!((0.0..=800.0).contains(&fl.x));
        }
    }

    #[test]
    fn flakes_wrap_horizontally() {
        let (mut f, mut rng) = field(800.0, 600.0);
        f.flakes_mut()[0] = Snowflake {
            x: 799.9,
            y: 10.0,
            vx: 5.0,
            vy: 0.0,
            radius: 1.0,
            speed: 0.5,
            wind: 0.0,
        };
        f.flakes_mut()[1] = Snowflake {
            x: 0.1,
            y: 10.0,
            vx: -5.0,
            vy: 0.0,
            radius: 1.0,
            speed: 0.5,
            wind: 0.0,
        };
        f.step(&mut rng, None);
        assert_eq!(f.flakes()[0].x, 0.0);
        assert_eq!(f.flakes()[1].x, 800.0);
    }

    #[test]
    fn impulse_decays_by_friction() {
        let (mut f, mut rng) = field(800.0, 600.0);
        f.flakes_mut()[0].vx = 1.0;
        f.flakes_mut()[0].x = 400.0;
        f.flakes_mut()[0].y = 100.0;
        f.step(&mut rng, None);
        assert!((f.flakes()[0].vx - IMPULSE_FRICTION).abs() < 1e-6);
    }

    #[test]
    fn repulsion_is_zero_out_of_reach() {
        let origin = Point::new(0.0, 0.0);
        assert!(repulsion(Point::new(150.0, 0.0), origin).is_none());
        assert!(repulsion(Point::new(120.0, 120.0), origin).is_none());
    }

    #[test]
    fn repulsion_points_away_and_scales_linearly() {
        let origin = Point::new(100.0, 100.0);
        let (px, py) = repulsion(Point::new(175.0, 100.0), origin).unwrap();
        assert!((px - 5.0).abs() < 1e-4);
        assert!(py.abs() < 1e-4);

        let (px, py) = repulsion(Point::new(100.0, 70.0), origin).unwrap();
        assert!(px.abs() < 1e-4);
        assert!((py + 8.0).abs() < 1e-4);
    }

    #[test]
    fn push_only_reaches_nearby_flakes() {
        let (mut f, mut rng) = field(800.0, 600.0);
        for (i, fl) in f.flakes_mut().iter_mut().enumerate() {
            *fl = Snowflake {
                x: if i == 0 { 410.0 } else { 10.0 },
                y: 300.0,
                vx: 0.0,
                vy: 0.0,
                radius: 1.0,
                speed: 0.0,
                wind: 0.0,
            };
        }
        f.step(&mut rng, Some(Point::new(400.0, 300.0)));
        assert!(f.flakes()[0].vx > 0.0);
        assert_eq!(f.flakes()[1].vx, 0.0);
    }

    #[test]
    fn paint_clears_previous_frame() {
        let vp = Viewport::new(100, 40, 8.0, 16.0);
        let (mut f, mut rng) = field(vp.width(), vp.height());
        let mut layer = Layer::new(vp);
        f.step(&mut rng, None);
        f.paint(&mut layer);
        let lit = (0..vp.dot_count())
            .filter(|&i| layer.pixel(i)[3] > 0.0)
            .count();
        assert!(lit > 0 && lit <= f.flakes().len());
        assert!((0..vp.dot_count()).all(|i| layer.pixel(i)[3] <= SNOW_OPACITY + 1e-6));
    }
}
