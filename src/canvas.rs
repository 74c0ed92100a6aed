// Copyright (c) 2026 rezky_nightky

use crate::geom::{Point, Viewport};
use crate::palette::Rgb;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Blend {
    SourceOver,
    /// Additive; overlapping colours sum up to white.
    Lighter,
}

/// Premultiplied RGBA surface at dot resolution covering the whole viewport.
#[derive(Clone, Debug)]
pub struct Layer {
    vp: Viewport,
    px: Vec<[f32; 4]>,
    scratch: Vec<usize>,
}

impl Layer {
    pub fn new(vp: Viewport) -> Self {
        Self {
            vp,
            px: vec![[0.0; 4]; vp.dot_count()],
            scratch: Vec::new(),
        }
    }

    pub fn resize(&mut self, vp: Viewport) {
        self.vp = vp;
        self.px.clear();
        self.px.resize(vp.dot_count(), [0.0; 4]);
    }

    #[cfg(test)]
    pub fn viewport(&self) -> Viewport {
        self.vp
    }

    pub fn pixel(&self, idx: usize) -> [f32; 4] {
        self.px.get(idx).copied().unwrap_or([0.0; 4])
    }

    pub fn clear(&mut self) {
        self.px.fill([0.0; 4]);
    }

    /// Destination-out with a uniform source of the given opacity.
    pub fn fade_out(&mut self, alpha: f32) {
        let keep = 1.0 - alpha.clamp(0.0, 1.0);
        for p in &mut self.px {
            for ch in p.iter_mut() {
                *ch *= keep;
                if *ch < 1.0 / 1024.0 {
                    *ch = 0.0;
                }
            }
        }
    }

    pub fn fill_disc(&mut self, center: Point, radius: f32, color: Rgb, alpha: f32, blend: Blend) {
        self.fill_discs(std::iter::once((center, radius)), color, alpha, blend);
    }

    /// Fills several discs as one path: a dot covered twice is painted once.
    pub fn fill_discs<I>(&mut self, discs: I, color: Rgb, alpha: f32, blend: Blend)
    where
        I: IntoIterator<Item = (Point, f32)>,
    {
        let mut dots = std::mem::take(&mut self.scratch);
        dots.clear();
        for (center, radius) in discs {
            cover_disc(&self.vp, center, radius, &mut dots);
        }
        self.paint(&mut dots, color, alpha, blend);
        self.scratch = dots;
    }

    pub fn stroke_polyline<I>(&mut self, points: I, width: f32, color: Rgb, alpha: f32, blend: Blend)
    where
        I: IntoIterator<Item = Point>,
    {
        let mut dots = std::mem::take(&mut self.scratch);
        dots.clear();
        let mut prev: Option<Point> = None;
        for p in points {
            if let Some(a) = prev {
                cover_segment(&self.vp, a, p, width / 2.0, &mut dots);
            }
            prev = Some(p);
        }
        self.paint(&mut dots, color, alpha, blend);
        self.scratch = dots;
    }

    fn paint(&mut self, dots: &mut Vec<usize>, color: Rgb, alpha: f32, blend: Blend) {
        dots.sort_unstable();
        dots.dedup();
        let alpha = alpha.clamp(0.0, 1.0);
        let [r, g, b] = color.unit();
        let src = [r * alpha, g * alpha, b * alpha, alpha];
        for &i in dots.iter() {
            let Some(dst) = self.px.get_mut(i) else {
                continue;
            };
            match blend {
                Blend::SourceOver => {
                    for c in 0..4 {
                        dst[c] = src[c] + dst[c] * (1.0 - alpha);
                    }
                }
                Blend::Lighter => {
                    for c in 0..4 {
                        dst[c] = (dst[c] + src[c]).min(1.0);
                    }
                }
            }
        }
    }
}

/// Dots whose centre lies inside the disc; a disc smaller than a dot
/// still lights the dot it sits in.
fn cover_disc(vp: &Viewport, c: Point, r: f32, out: &mut Vec<usize>) {
    let before = out.len();
    let (dw, dh) = (vp.dot_w(), vp.dot_h());
    let x0 = ((c.x - r) / dw).floor().max(0.0) as usize;
    let y0 = ((c.y - r) / dh).floor().max(0.0) as usize;
    let x1 = (((c.x + r) / dw).floor().max(-1.0) as isize).min(vp.dot_cols() as isize - 1);
    let y1 = (((c.y + r) / dh).floor().max(-1.0) as isize).min(vp.dot_rows() as isize - 1);

    if x1 >= 0 && y1 >= 0 {
        for dy in y0..=y1 as usize {
            for dx in x0..=x1 as usize {
                if vp.dot_center(dx, dy).distance(c) <= r {
                    out.push(dy * vp.dot_cols() + dx);
                }
            }
        }
    }

    if out.len() == before {
        if let Some(i) = vp.dot_at(c) {
            out.push(i);
        }
    }
}

fn cover_segment(vp: &Viewport, a: Point, b: Point, half_width: f32, out: &mut Vec<usize>) {
    let step = (vp.dot_w().min(vp.dot_h()) / 2.0).max(0.5);
    let len = a.distance(b);
    let n = (len / step).ceil().max(1.0) as usize;
    for k in 0..=n {
        let t = k as f32 / n as f32;
        let p = Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t);
        cover_disc(vp, p, half_width, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::WHITE;

    fn layer() -> Layer {
        Layer::new(Viewport::new(10, 5, 8.0, 16.0))
    }

    #[test]
    fn small_disc_lights_the_dot_it_sits_in() {
        let mut l = layer();
        l.fill_disc(Point::new(12.0, 3.0), 1.2, WHITE, 1.0, Blend::Lighter);
        assert_eq!(l.pixel(1)[3], 1.0);
        assert_eq!((0..50).filter(|&i| l.pixel(i)[3] > 0.0).count(), 1);
    }

    #[test]
    fn offscreen_disc_paints_nothing() {
        let mut l = layer();
        l.fill_disc(Point::new(-40.0, -40.0), 2.0, WHITE, 1.0, Blend::SourceOver);
        l.fill_disc(Point::new(500.0, 20.0), 2.0, WHITE, 1.0, Blend::SourceOver);
        assert!((0..50).all(|i| l.pixel(i)[3] == 0.0));
    }

    #[test]
    fn single_path_does_not_compound() {
        let mut l = layer();
        let p = Point::new(4.0, 4.0);
        l.fill_discs([(p, 2.0), (p, 2.5)], WHITE, 0.7, Blend::SourceOver);
        assert!((l.pixel(0)[3] - 0.7).abs() < 1e-6);
    }

    #[test]
    fn lighter_sums_and_saturates() {
        let mut l = layer();
        let p = Point::new(4.0, 4.0);
        l.fill_disc(p, 1.0, Rgb::new(255, 0, 0), 0.6, Blend::Lighter);
        l.fill_disc(p, 1.0, Rgb::new(255, 0, 0), 0.6, Blend::Lighter);
        let px = l.pixel(0);
        assert_eq!(px[0], 1.0);
        assert_eq!(px[1], 0.0);
        assert_eq!(px[3], 1.0);
    }

    #[test]
    fn fade_out_keeps_seventy_percent() {
        let mut l = layer();
        l.fill_disc(Point::new(4.0, 4.0), 1.0, WHITE, 1.0, Blend::SourceOver);
        l.fade_out(0.3);
        assert!((l.pixel(0)[3] - 0.7).abs() < 1e-6);
        for _ in 0..40 {
            l.fade_out(0.3);
        }
        assert_eq!(l.pixel(0), [0.0; 4]);
    }

    #[test]
    fn stroke_covers_dots_between_points() {
        let mut l = layer();
        let pts = [Point::new(4.0, 4.0), Point::new(76.0, 4.0)];
        l.stroke_polyline(pts, 2.5, WHITE, 1.0, Blend::Lighter);
        assert!((0..10).all(|i| l.pixel(i)[3] > 0.0));
        assert_eq!(l.pixel(10)[3], 0.0);
    }

    #[test]
    fn resize_clears_and_reshapes() {
        let mut l = layer();
        l.fill_disc(Point::new(4.0, 4.0), 1.0, WHITE, 1.0, Blend::SourceOver);
        l.resize(Viewport::new(4, 4, 8.0, 16.0));
        assert_eq!(l.pixel(0), [0.0; 4]);
        assert_eq!(l.viewport().dot_count(), 32);
    }
}
