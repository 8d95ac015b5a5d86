//! Minimal software rasterizer for [`DrawList`]s.
//!
//! Pixels are `0x00RRGGBB`, the layout softbuffer presents. Coverage is
//! sampled once at each pixel center; there is no anti-aliasing.

use rayon::{iter::ParallelIterator, slice::ParallelSliceMut};

use crate::display::{DrawList, Fill, Primitive, Rgba, Stroke, circle_outline};
use crate::math::Point;

/// Segments used to stroke circle outlines.
const OUTLINE_SEGMENTS: usize = 32;

#[inline]
pub fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    // BGRA8 in little-endian memory
    (b as u32) | ((g as u32) << 8) | ((r as u32) << 16)
    // Alpha at 0
}

/// Source-over blend of `src` onto the packed pixel `dst`.
#[inline]
fn blend(dst: u32, src: Rgba) -> u32 {
    match src.a {
        0 => dst,
        255 => pack_rgb(src.r, src.g, src.b),
        a => {
            let a = a as u32;
            let inv = 255 - a;
            let ch = |d: u32, s: u8| ((s as u32 * a + d * inv + 127) / 255) as u8;
            let (dr, dg, db) = ((dst >> 16) & 0xFF, (dst >> 8) & 0xFF, dst & 0xFF);
            pack_rgb(ch(dr, src.r), ch(dg, src.g), ch(db, src.b))
        }
    }
}

/// A `width` by `height` pixel target.
pub struct Canvas<'a> {
    buf: &'a mut [u32],
    width: usize,
    height: usize,
}

impl<'a> Canvas<'a> {
    /// Wraps `buf`, which must hold at least `width * height` pixels.
    pub fn new(buf: &'a mut [u32], width: usize, height: usize) -> Self {
        debug_assert!(buf.len() >= width * height);
        Self { buf, width, height }
    }

    pub fn clear(&mut self, color: u32) {
        let width = self.width;
        if width == 0 {
            return;
        }
        self.buf[..width * self.height]
            .par_chunks_mut(width)
            .for_each(|row| row.fill(color));
    }

    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        self.buf[y * self.width + x]
    }

    pub fn draw(&mut self, list: &DrawList) {
        for prim in list {
            match prim {
                Primitive::Line {
                    from,
                    to,
                    color,
                    width,
                } => self.line(*from, *to, *color, *width),
                Primitive::Polygon {
                    points,
                    fill,
                    stroke,
                } => {
                    self.fill_polygon(points, fill);
                    if let Some(s) = stroke {
                        self.outline(points, s);
                    }
                }
                Primitive::Circle {
                    center,
                    radius,
                    fill,
                    stroke,
                } => {
                    self.fill_circle(*center, *radius, fill);
                    if let Some(s) = stroke {
                        self.outline(&circle_outline(*center, *radius, OUTLINE_SEGMENTS), s);
                    }
                }
            }
        }
    }

    /// Clamped range of pixel rows whose centers lie in `[y0, y1]`.
    fn rows(&self, y0: f32, y1: f32) -> std::ops::Range<usize> {
        let lo = (y0 - 0.5).ceil().max(0.0) as usize;
        let hi = ((y1 - 0.5).floor() + 1.0).clamp(0.0, self.height as f32) as usize;
        lo..hi.max(lo)
    }

    /// Paints pixels of row `y` whose centers lie in `[x0, x1]`.
    fn span(&mut self, y: usize, x0: f32, x1: f32, fill: &Fill) {
        let lo = (x0 - 0.5).ceil().max(0.0) as usize;
        let hi = ((x1 - 0.5).floor() + 1.0).clamp(0.0, self.width as f32) as usize;
        let row = y * self.width;
        let cy = y as f32 + 0.5;
        for x in lo..hi {
            let c = fill.sample(Point::new(x as f32 + 0.5, cy));
            self.buf[row + x] = blend(self.buf[row + x], c);
        }
    }

    /// Even-odd scanline fill.
    fn fill_polygon(&mut self, points: &[Point], fill: &Fill) {
        if points.len() < 3 {
            return;
        }
        let (y0, y1) = points
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)));

        let mut xs: Vec<f32> = Vec::with_capacity(points.len());
        for y in self.rows(y0, y1) {
            let cy = y as f32 + 0.5;
            xs.clear();
            for (i, a) in points.iter().enumerate() {
                let b = points[(i + 1) % points.len()];
                // Half-open in y so shared vertices are counted once
                if (a.y <= cy) != (b.y <= cy) {
                    xs.push(a.x + (cy - a.y) * (b.x - a.x) / (b.y - a.y));
                }
            }
            xs.sort_by(f32::total_cmp);
            for pair in xs.chunks_exact(2) {
                self.span(y, pair[0], pair[1], fill);
            }
        }
    }

    fn fill_circle(&mut self, c: Point, r: f32, fill: &Fill) {
        if r <= 0.0 {
            return;
        }
        for y in self.rows(c.y - r, c.y + r) {
            let dy = y as f32 + 0.5 - c.y;
            let half = (r * r - dy * dy).max(0.0).sqrt();
            self.span(y, c.x - half, c.x + half, fill);
        }
    }

    /// A line of the given width, drawn as a quad around the segment.
    fn line(&mut self, from: Point, to: Point, color: Rgba, width: f32) {
        let d = to - from;
        let len = d.len();
        if len == 0.0 {
            return;
        }
        // At least one pixel wide so hairlines stay visible
        let half = width.max(1.0) * 0.5;
        let n = Point::new(-d.y, d.x) * (half / len);
        let quad = [from + n, to + n, to - n, from - n];
        self.fill_polygon(&quad, &Fill::Solid(color));
    }

    fn outline(&mut self, points: &[Point], stroke: &Stroke) {
        for (i, a) in points.iter().enumerate() {
            let b = points[(i + 1) % points.len()];
            self.line(*a, b, stroke.color, stroke.width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::Stop;

    fn canvas_buf(w: usize, h: usize) -> Vec<u32> {
        vec![0; w * h]
    }

    #[test]
    fn pack_layout() {
        assert_eq!(pack_rgb(0x12, 0x34, 0x56), 0x0012_3456);
    }

    #[test]
    fn blend_extremes_and_half() {
        let dst = pack_rgb(0, 0, 0);
        assert_eq!(blend(dst, Rgba::new(9, 9, 9, 0)), dst);
        assert_eq!(blend(dst, Rgba::new(200, 100, 50, 255)), pack_rgb(200, 100, 50));
        assert_eq!(
            blend(pack_rgb(0, 0, 0), Rgba::new(255, 255, 255, 128)),
            pack_rgb(128, 128, 128)
        );
    }

    #[test]
    fn rectangle_covers_exact_pixels() {
        let mut buf = canvas_buf(8, 8);
        let mut canvas = Canvas::new(&mut buf, 8, 8);
        let red = Rgba::new(255, 0, 0, 255);
        canvas.draw(&vec![Primitive::Polygon {
            points: vec![
                Point::new(2.0, 2.0),
                Point::new(5.0, 2.0),
                Point::new(5.0, 4.0),
                Point::new(2.0, 4.0),
            ],
            fill: Fill::Solid(red),
            stroke: None,
        }]);
        let filled: usize = (0..8)
            .flat_map(|y| (0..8).map(move |x| (x, y)))
            .filter(|&(x, y)| canvas.pixel(x, y) != 0)
            .count();
        assert_eq!(filled, 6);
        assert_eq!(canvas.pixel(2, 2), pack_rgb(255, 0, 0));
        assert_eq!(canvas.pixel(4, 3), pack_rgb(255, 0, 0));
        assert_eq!(canvas.pixel(5, 2), 0);
    }

    #[test]
    fn offscreen_primitives_are_clipped() {
        let mut buf = canvas_buf(4, 4);
        let mut canvas = Canvas::new(&mut buf, 4, 4);
        canvas.draw(&vec![
            Primitive::Circle {
                center: Point::new(-50.0, -50.0),
                radius: 10.0,
                fill: Fill::Solid(Rgba::WHITE),
                stroke: Some(Stroke::new(Rgba::WHITE, 2.0)),
            },
            Primitive::Line {
                from: Point::new(-10.0, 2.5),
                to: Point::new(20.0, 2.5),
                color: Rgba::WHITE,
                width: 1.0,
            },
        ]);
        assert_eq!(canvas.pixel(0, 2), pack_rgb(255, 255, 255));
        assert_eq!(canvas.pixel(3, 2), pack_rgb(255, 255, 255));
        assert_eq!(canvas.pixel(0, 0), 0);
    }

    #[test]
    fn radial_circle_is_brightest_at_center() {
        let mut buf = canvas_buf(21, 21);
        let mut canvas = Canvas::new(&mut buf, 21, 21);
        let c = Point::new(10.5, 10.5);
        canvas.draw(&vec![Primitive::Circle {
            center: c,
            radius: 10.0,
            fill: Fill::Radial {
                center: c,
                radius: 10.0,
                stops: vec![
                    Stop::new(0.0, Rgba::new(255, 255, 255, 255)),
                    Stop::new(1.0, Rgba::new(255, 255, 255, 0)),
                ],
            },
            stroke: None,
        }]);
        let center = canvas.pixel(10, 10) & 0xFF;
        let edge = canvas.pixel(18, 10) & 0xFF;
        assert_eq!(center, 255);
        assert!(edge < center);
        assert_eq!(canvas.pixel(0, 0), 0);
    }

    #[test]
    fn clear_fills_everything() {
        let mut buf = canvas_buf(5, 3);
        let mut canvas = Canvas::new(&mut buf, 5, 3);
        canvas.clear(0x00AB_CDEF);
        assert!(buf.iter().all(|&p| p == 0x00AB_CDEF));
    }

    #[test]
    fn clear_with_zero_width_is_a_no_op() {
        let mut buf = canvas_buf(4, 4);
        let mut canvas = Canvas::new(&mut buf, 0, 4);
        canvas.clear(0x00FF_FFFF);
        assert!(buf.iter().all(|&p| p == 0));
    }
}
