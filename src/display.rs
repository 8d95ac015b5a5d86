//! Renderer-agnostic draw list for a [`Frame`].
//!
//! [`compose`] turns a frame into an ordered list of primitives: the overhead
//! map with lights, walls, rays and the player, the first-person view built
//! from the projected strips, and a minimap. Primitives are in pixel space
//! and later ones paint over earlier ones.

use std::f32::consts::TAU;

use crate::math::Point;
use crate::sim::Frame;
use crate::world::{Rgb, bounds_of};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(c: Rgb) -> Self {
        Self::with_alpha(c, 255)
    }

    pub const fn with_alpha(c: Rgb, a: u8) -> Self {
        Self::new(c.r, c.g, c.b, a)
    }
}

/// A gradient color stop; `offset` is in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stop {
    pub offset: f32,
    pub color: Rgba,
}

impl Stop {
    pub const fn new(offset: f32, color: Rgba) -> Self {
        Self { offset, color }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Fill {
    Solid(Rgba),
    /// Varies along the line `from..to`.
    Linear { from: Point, to: Point, stops: Vec<Stop> },
    /// Varies with distance from `center`, reaching the last stop at `radius`.
    Radial { center: Point, radius: f32, stops: Vec<Stop> },
}

impl Fill {
    /// Color of the fill at `p`.
    pub fn sample(&self, p: Point) -> Rgba {
        match self {
            Fill::Solid(c) => *c,
            Fill::Linear { from, to, stops } => {
                let axis = *to - *from;
                let len_sqr = axis.len_sqr();
                let t = if len_sqr > 0.0 {
                    (p - *from).dot(axis) / len_sqr
                } else {
                    0.0
                };
                sample_stops(stops, t)
            }
            Fill::Radial { center, radius, stops } => {
                let t = if *radius > 0.0 {
                    center.distance(p) / radius
                } else {
                    1.0
                };
                sample_stops(stops, t)
            }
        }
    }
}

/// Piecewise-linear interpolation between stops, clamped at both ends.
pub fn sample_stops(stops: &[Stop], t: f32) -> Rgba {
    let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
        return Rgba::default();
    };
    if t <= first.offset {
        return first.color;
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.offset {
            let span = b.offset - a.offset;
            let k = if span > 0.0 { (t - a.offset) / span } else { 1.0 };
            let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * k).round() as u8;
            return Rgba::new(
                mix(a.color.r, b.color.r),
                mix(a.color.g, b.color.g),
                mix(a.color.b, b.color.b),
                mix(a.color.a, b.color.a),
            );
        }
    }
    last.color
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    pub color: Rgba,
    pub width: f32,
}

impl Stroke {
    pub const fn new(color: Rgba, width: f32) -> Self {
        Self { color, width }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    Line {
        from: Point,
        to: Point,
        color: Rgba,
        width: f32,
    },
    /// Closed polygon; the last point connects back to the first.
    Polygon {
        points: Vec<Point>,
        fill: Fill,
        stroke: Option<Stroke>,
    },
    Circle {
        center: Point,
        radius: f32,
        fill: Fill,
        stroke: Option<Stroke>,
    },
}

pub type DrawList = Vec<Primitive>;

fn line(from: Point, to: Point, color: Rgba, width: f32) -> Primitive {
    Primitive::Line {
        from,
        to,
        color,
        width,
    }
}

fn rect(x: f32, y: f32, w: f32, h: f32, fill: Fill, stroke: Option<Stroke>) -> Primitive {
    Primitive::Polygon {
        points: vec![
            Point::new(x, y),
            Point::new(x + w, y),
            Point::new(x + w, y + h),
            Point::new(x, y + h),
        ],
        fill,
        stroke,
    }
}

fn circle(center: Point, radius: f32, fill: Fill) -> Primitive {
    Primitive::Circle {
        center,
        radius,
        fill,
        stroke: None,
    }
}

/// Rays drawn on the overhead map: one out of every `RAY_STRIDE`.
const RAY_STRIDE: usize = 3;
const MINIMAP_SIZE: f32 = 150.0;

/// Builds the draw list for `frame` on a `width` by `height` pixel canvas.
pub fn compose(frame: &Frame, width: f32, height: f32) -> DrawList {
    let mut out = DrawList::new();

    out.push(rect(
        0.0,
        0.0,
        width,
        height,
        Fill::Linear {
            from: Point::new(0.0, 0.0),
            to: Point::new(0.0, height),
            stops: vec![
                Stop::new(0.0, Rgba::new(5, 5, 15, 255)),
                Stop::new(1.0, Rgba::new(15, 15, 30, 255)),
            ],
        },
        None,
    ));

    overhead_lights(&mut out, frame);
    for w in frame.walls {
        out.push(line(w.start, w.end, Rgba::opaque(w.color), 4.0));
    }
    overhead_rays(&mut out, frame);
    overhead_player(&mut out, frame);
    first_person_view(&mut out, frame, width);
    minimap(&mut out, frame, height);

    out
}

fn overhead_lights(out: &mut DrawList, frame: &Frame) {
    for light in frame.lights {
        let glow = light.intensity * 0.8;
        let c = light.color;
        out.push(circle(
            light.position,
            glow,
            Fill::Radial {
                center: light.position,
                radius: glow,
                stops: vec![
                    Stop::new(0.0, Rgba::with_alpha(c, 80)),
                    Stop::new(0.6, Rgba::with_alpha(c, 20)),
                    Stop::new(1.0, Rgba::with_alpha(c, 0)),
                ],
            },
        ));
        out.push(circle(light.position, 4.0, Fill::Solid(Rgba::WHITE)));
    }
}

fn overhead_rays(out: &mut DrawList, frame: &Frame) {
    let origin = frame.player.pos;
    for ray in frame.rays.iter().step_by(RAY_STRIDE) {
        let Some(p) = ray.projected else { continue };
        let alpha = (p.illumination * (1.0 - p.hit.distance / 500.0)).max(0.05);
        let a = (alpha * 150.0).clamp(0.0, 255.0) as u8;
        out.push(line(origin, p.hit.point, Rgba::new(255, 255, 100, a), 1.0));
    }
}

fn overhead_player(out: &mut DrawList, frame: &Frame) {
    let pos = frame.player.pos;
    let heading = frame.player.heading;
    let fov = frame.config.fov;

    out.push(circle(
        pos,
        15.0,
        Fill::Radial {
            center: pos,
            radius: 15.0,
            stops: vec![
                Stop::new(0.0, Rgba::new(100, 255, 100, 100)),
                Stop::new(1.0, Rgba::new(100, 255, 100, 0)),
            ],
        },
    ));
    out.push(Primitive::Circle {
        center: pos,
        radius: 8.0,
        fill: Fill::Solid(Rgba::new(100, 255, 100, 255)),
        stroke: Some(Stroke::new(Rgba::WHITE, 2.0)),
    });

    // Field of view wedge
    const ARC_RADIUS: f32 = 50.0;
    const ARC_STEPS: usize = 20;
    let mut wedge = Vec::with_capacity(ARC_STEPS + 2);
    wedge.push(pos);
    wedge.extend((0..=ARC_STEPS).map(|i| {
        let a = heading - 0.5 * fov + fov * i as f32 / ARC_STEPS as f32;
        pos + Point::from_angle(a) * ARC_RADIUS
    }));
    out.push(Primitive::Polygon {
        points: wedge,
        fill: Fill::Solid(Rgba::new(255, 255, 255, 30)),
        stroke: None,
    });

    // Heading arrow
    const ARROW_LEN: f32 = 25.0;
    let wing = |da: f32| pos + Point::from_angle(heading + da) * (ARROW_LEN * 0.7);
    out.push(Primitive::Polygon {
        points: vec![
            pos + Point::from_angle(heading) * ARROW_LEN,
            wing(-2.5),
            pos,
            wing(2.5),
        ],
        fill: Fill::Solid(Rgba::WHITE),
        stroke: Some(Stroke::new(Rgba::BLACK, 1.0)),
    });
}

fn first_person_view(out: &mut DrawList, frame: &Frame, width: f32) {
    let view_w = frame.view_width;
    let view_h = frame.view_height;
    let view_x = width - view_w - 10.0;
    let view_y = 10.0;

    out.push(rect(
        view_x,
        view_y,
        view_w,
        view_h,
        Fill::Linear {
            from: Point::new(view_x, view_y),
            to: Point::new(view_x, view_y + view_h),
            stops: vec![
                Stop::new(0.0, Rgba::new(50, 50, 80, 255)),  // ceiling
                Stop::new(0.5, Rgba::new(20, 20, 35, 255)),  // horizon
                Stop::new(1.0, Rgba::new(30, 30, 50, 255)),  // floor
            ],
        },
        Some(Stroke::new(Rgba::new(150, 150, 150, 255), 2.0)),
    ));

    let strip_w = frame.column_width;
    for p in frame.rays.iter().filter_map(|r| r.projected) {
        let s = p.strip;
        let x = view_x + s.column as f32 * strip_w;
        let y = view_y + (view_h - s.height) / 2.0;
        // One pixel of overlap hides seams between neighbouring strips
        out.push(rect(x, y, strip_w + 1.0, s.height, Fill::Solid(Rgba::opaque(s.color)), None));

        if s.column % 3 == 0 {
            let c = s.color;
            let lit = Rgba::new(
                c.r.saturating_add(20),
                c.g.saturating_add(20),
                c.b.saturating_add(20),
                100,
            );
            let mid = x + strip_w / 2.0;
            out.push(line(Point::new(mid, y), Point::new(mid, y + s.height), lit, 1.0));
        }
    }

    let cx = view_x + view_w / 2.0;
    let cy = view_y + view_h / 2.0;
    let hair = Rgba::new(255, 255, 255, 150);
    out.push(line(Point::new(cx - 10.0, cy), Point::new(cx + 10.0, cy), hair, 2.0));
    out.push(line(Point::new(cx, cy - 10.0), Point::new(cx, cy + 10.0), hair, 2.0));

    out.push(rect(
        view_x + 10.0,
        view_y + view_h - 40.0,
        100.0,
        30.0,
        Fill::Solid(Rgba::new(0, 0, 0, 180)),
        None,
    ));
}

fn minimap(out: &mut DrawList, frame: &Frame, height: f32) {
    let map_x = 10.0;
    let map_y = height - MINIMAP_SIZE - 10.0;

    out.push(rect(
        map_x,
        map_y,
        MINIMAP_SIZE,
        MINIMAP_SIZE,
        Fill::Solid(Rgba::new(0, 0, 0, 200)),
        Some(Stroke::new(Rgba::new(100, 100, 100, 255), 2.0)),
    ));

    let Some((lo, hi)) = bounds_of(frame.walls) else {
        return;
    };
    let span = hi - lo;
    let sx = if span.x > 0.0 { MINIMAP_SIZE / span.x } else { 1.0 };
    let sy = if span.y > 0.0 { MINIMAP_SIZE / span.y } else { 1.0 };
    let to_map = |p: Point| Point::new(map_x + (p.x - lo.x) * sx, map_y + (p.y - lo.y) * sy);

    for w in frame.walls {
        out.push(line(to_map(w.start), to_map(w.end), Rgba::with_alpha(w.color, 200), 2.0));
    }

    let player = to_map(frame.player.pos);
    out.push(circle(player, 3.0, Fill::Solid(Rgba::new(100, 255, 100, 255))));
    let tip = player + Point::from_angle(frame.player.heading) * 15.0;
    out.push(line(player, tip, Rgba::WHITE, 2.0));

    for light in frame.lights {
        out.push(circle(to_map(light.position), 2.0, Fill::Solid(Rgba::opaque(light.color))));
    }
}

/// Points approximating a circle outline, for stroking.
pub fn circle_outline(center: Point, radius: f32, segments: usize) -> Vec<Point> {
    (0..segments)
        .map(|i| center + Point::from_angle(TAU * i as f32 / segments as f32) * radius)
        .collect()
}
