use tracing::info;

use crate::math::Point;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Multiplies each channel by `k`, truncating toward zero.
    #[inline]
    pub fn scale(self, k: f32) -> Self {
        let ch = |c: u8| (c as f32 * k).clamp(0.0, 255.0) as u8;
        Self::new(ch(self.r), ch(self.g), ch(self.b))
    }
}

pub const DEFAULT_WALL_COLOR: Rgb = Rgb::new(150, 150, 150);

/// Index of a wall inside its [`Scene`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WallId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Wall {
    pub start: Point, // (x, y) start point in world space
    pub end: Point,   // (x, y) end point in world space
    pub color: Rgb,
}

impl Wall {
    pub fn new(start: Point, end: Point, color: Rgb) -> Self {
        Self { start, end, color }
    }

    /// Direction vector from `start` to `end` (not normalized).
    #[inline]
    pub fn dir(&self) -> Point {
        self.end - self.start
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightSource {
    pub position: Point,
    pub intensity: f32, // > 0
    pub color: Rgb,
}

impl LightSource {
    pub fn new(position: Point, intensity: f32, color: Rgb) -> Self {
        Self {
            position,
            intensity,
            color,
        }
    }
}

/// Static level geometry and lighting.
///
/// A scene is never mutated after construction, so [`WallId`]s handed out by
/// the ray caster stay valid for the scene's whole lifetime.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    walls: Vec<Wall>,
    lights: Vec<LightSource>,
}

impl Scene {
    pub fn new(walls: Vec<Wall>, lights: Vec<LightSource>) -> Self {
        Self { walls, lights }
    }

    /// The built-in walled arena with a small maze and three lights.
    pub fn arena() -> Self {
        let w = |x0: f32, y0: f32, x1: f32, y1: f32, (r, g, b): (u8, u8, u8)| {
            Wall::new(Point::new(x0, y0), Point::new(x1, y1), Rgb::new(r, g, b))
        };
        let walls = vec![
            // Outer boundary
            w(50.0, 50.0, 750.0, 50.0, (200, 100, 100)),
            w(750.0, 50.0, 750.0, 550.0, (100, 200, 100)),
            w(750.0, 550.0, 50.0, 550.0, (100, 100, 200)),
            w(50.0, 550.0, 50.0, 50.0, (200, 200, 100)),
            // Inner maze
            w(150.0, 150.0, 250.0, 150.0, (180, 120, 180)),
            w(250.0, 150.0, 250.0, 250.0, (180, 120, 180)),
            w(350.0, 100.0, 450.0, 100.0, (120, 180, 180)),
            w(450.0, 100.0, 450.0, 200.0, (120, 180, 180)),
            w(550.0, 150.0, 650.0, 150.0, (180, 180, 120)),
            w(650.0, 150.0, 650.0, 300.0, (180, 180, 120)),
            w(100.0, 350.0, 200.0, 350.0, (200, 150, 100)),
            w(200.0, 350.0, 200.0, 450.0, (200, 150, 100)),
            w(300.0, 400.0, 400.0, 300.0, (150, 200, 150)),
            w(500.0, 350.0, 600.0, 450.0, (100, 150, 200)),
        ];
        let lights = vec![
            LightSource::new(Point::new(200.0, 200.0), 100.0, Rgb::new(255, 200, 200)),
            LightSource::new(Point::new(600.0, 200.0), 80.0, Rgb::new(200, 200, 255)),
            LightSource::new(Point::new(400.0, 450.0), 120.0, Rgb::new(200, 255, 200)),
        ];
        let scene = Self::new(walls, lights);
        info!(
            walls = scene.walls.len(),
            lights = scene.lights.len(),
            "arena scene built"
        );
        scene
    }

    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    pub fn lights(&self) -> &[LightSource] {
        &self.lights
    }

    pub fn wall(&self, id: WallId) -> Option<&Wall> {
        self.walls.get(id.0)
    }

    /// Walls paired with their ids, in storage order.
    pub fn walls_with_ids(&self) -> impl Iterator<Item = (WallId, &Wall)> {
        self.walls.iter().enumerate().map(|(i, w)| (WallId(i), w))
    }

    /// Axis-aligned bounding box of all wall endpoints as `(min, max)`.
    pub fn bounds(&self) -> Option<(Point, Point)> {
        bounds_of(&self.walls)
    }
}

/// Axis-aligned bounding box of the endpoints of `walls`.
pub fn bounds_of(walls: &[Wall]) -> Option<(Point, Point)> {
    let mut pts = walls.iter().flat_map(|w| [w.start, w.end]);
    let first = pts.next()?;
    Some(pts.fold((first, first), |(lo, hi), p| {
        (
            Point::new(lo.x.min(p.x), lo.y.min(p.y)),
            Point::new(hi.x.max(p.x), hi.y.max(p.y)),
        )
    }))
}
