// Copyright (c) 2026 rezky_nightky

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Viewport geometry in pixels, backed by a grid of terminal cells.
///
/// Every cell is split into an upper and a lower "dot", so a layer has
/// `cols` dots per row and `rows * 2` dot rows.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
    pub cell_w: f32,
    pub cell_h: f32,
}

impl Viewport {
    pub const DEFAULT_CELL_W: f32 = 8.0;
    pub const DEFAULT_CELL_H: f32 = 16.0;

    pub fn new(cols: u16, rows: u16, cell_w: f32, cell_h: f32) -> Self {
        Self {
            cols,
            rows,
            cell_w: cell_w.max(1.0),
            cell_h: cell_h.max(2.0),
        }
    }

    pub fn width(&self) -> f32 {
        self.cols as f32 * self.cell_w
    }

    pub fn height(&self) -> f32 {
        self.rows as f32 * self.cell_h
    }

    pub fn dot_cols(&self) -> usize {
        self.cols as usize
    }

    pub fn dot_rows(&self) -> usize {
        self.rows as usize * 2
    }

    pub fn dot_w(&self) -> f32 {
        self.cell_w
    }

    pub fn dot_h(&self) -> f32 {
        self.cell_h / 2.0
    }

    pub fn dot_count(&self) -> usize {
        self.dot_cols() * self.dot_rows()
    }

    pub fn dot_at(&self, p: Point) -> Option<usize> {
        if !(p.x >= 0.0 && p.y >= 0.0) {
            return None;
        }
        let dx = (p.x / self.dot_w()) as usize;
        let dy = (p.y / self.dot_h()) as usize;
        if dx >= self.dot_cols() || dy >= self.dot_rows() {
            return None;
        }
        Some(dy * self.dot_cols() + dx)
    }

    pub fn dot_center(&self, dx: usize, dy: usize) -> Point {
        Point::new(
            (dx as f32 + 0.5) * self.dot_w(),
            (dy as f32 + 0.5) * self.dot_h(),
        )
    }

    /// Pixel position a pointer event on this cell stands for.
    pub fn cell_center(&self, col: u16, row: u16) -> Point {
        Point::new(
            (col as f32 + 0.5) * self.cell_w,
            (row as f32 + 0.5) * self.cell_h,
        )
    }

    /// Where rockets start: bottom-centre of the viewport.
    pub fn launch_origin(&self) -> Point {
        Point::new(self.width() / 2.0, self.height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_lookup_splits_cells_in_halves() {
        let vp = Viewport::new(10, 5, 8.0, 16.0);
        assert_eq!(vp.dot_rows(), 10);
        assert_eq!(vp.dot_at(Point::new(0.0, 0.0)), Some(0));
        assert_eq!(vp.dot_at(Point::new(1.0, 9.0)), Some(10));
        assert_eq!(vp.dot_at(Point::new(79.9, 79.9)), Some(99));
        assert_eq!(vp.dot_at(Point::new(80.0, 10.0)), None);
        assert_eq!(vp.dot_at(Point::new(-0.5, 10.0)), None);
        assert_eq!(vp.dot_at(Point::new(f32::NAN, 10.0)), None);
    }

    #[test]
    fn cell_center_maps_to_pixels() {
        let vp = Viewport::new(240, 67, 8.0, 16.0);
        let p = vp.cell_center(2, 1);
        assert_eq!(p, Point::new(20.0, 24.0));
        assert_eq!(vp.launch_origin(), Point::new(960.0, 1072.0));
    }
}
