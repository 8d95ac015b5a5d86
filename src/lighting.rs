//! Point-light illumination.
//!
//! Lights are not occluded by walls: each contribution depends only on the
//! straight-line distance between the light and the lit point.

use crate::math::Point;
use crate::world::LightSource;

/// Illumination every point receives with no lights nearby.
pub const AMBIENT: f32 = 0.1;
/// Upper clamp of the summed illumination.
pub const MAX_LIGHT: f32 = 1.0;

const FALLOFF: f32 = 0.01;
const GAIN: f32 = 0.01;

/// Contribution of a single light at distance `d`.
///
/// The falloff `intensity / (d * FALLOFF + 1)` saturates at `intensity` as
/// `d` approaches zero.
#[inline]
pub fn contribution(light: &LightSource, d: f32) -> f32 {
    (light.intensity / (d * FALLOFF + 1.0) * GAIN).max(0.0)
}

/// Total illumination at `point`, in `[AMBIENT, MAX_LIGHT]`.
pub fn illumination(lights: &[LightSource], point: Point) -> f32 {
    let total = lights.iter().fold(AMBIENT, |acc, light| {
        acc + contribution(light, light.position.distance(point))
    });
    total.min(MAX_LIGHT)
}
