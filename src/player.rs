use crate::math::Point;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Player {
    pub pos: Point,   // (x, y) position in world space
    pub heading: f32, // radians; +x axis is 0, kept in [0, 2π) by the mover
}

impl Player {
    pub fn new(pos: Point, heading: f32) -> Self {
        Self { pos, heading }
    }

    /// Unit vector in the facing direction.
    #[inline]
    pub fn forward(&self) -> Point {
        Point::from_angle(self.heading)
    }

    /// Angle of ray `column` out of `num_rays` spread evenly across `fov`,
    /// centered on the heading. The first and last rays lie exactly on the
    /// edges of the field of view.
    #[inline]
    pub fn ray_angle(&self, column: usize, num_rays: usize, fov: f32) -> f32 {
        if num_rays < 2 {
            return self.heading;
        }
        self.heading - 0.5 * fov + fov * column as f32 / (num_rays - 1) as f32
    }
}

/// Start of the arena walk, clear of every wall by more than the player radius.
impl Default for Player {
    fn default() -> Self {
        Self::new(Point::new(400.0, 250.0), 0.0)
    }
}
