//! Perspective projection of a ray sweep into vertical wall strips.
//!
//! One ray is cast per screen column. Each hit is corrected for fisheye
//! distortion, mapped to a strip height inversely proportional to distance
//! and shaded by the lights and by distance.

use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tracing::trace;

use crate::caster::{RayCaster, RayHit};
use crate::lighting::illumination;
use crate::player::Player;
use crate::world::{Rgb, Scene};

/// Strip height at unit corrected distance, as a multiple of view height.
const PROJECTION_SCALE: f32 = 150.0;
/// Corrected distance at which distance attenuation reaches its floor.
const MAX_VISIBLE: f32 = 400.0;
const ATTENUATION_FLOOR: f32 = 0.2;

/// One vertical column of the 3D view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Strip {
    pub column: usize,
    pub height: f32,
    pub color: Rgb,
}

/// A ray that struck a wall, with its projection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
    pub hit: RayHit,
    /// Distance along the view direction; never greater than `hit.distance`.
    pub corrected_distance: f32,
    pub illumination: f32,
    pub strip: Strip,
}

/// Result of casting the ray for one column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RaySample {
    pub column: usize,
    pub angle: f32,
    /// `None` when the ray left the scene without striking a wall; the column
    /// is then left undrawn.
    pub projected: Option<Projected>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projector {
    pub num_rays: usize,
    pub fov: f32,
}

impl Projector {
    pub fn new(num_rays: usize, fov: f32) -> Self {
        Self { num_rays, fov }
    }

    /// Casts and projects every column for a view `view_height` pixels tall.
    ///
    /// Columns are independent, so they are computed in parallel; the result
    /// is ordered by column.
    pub fn sweep(&self, scene: &Scene, player: &Player, view_height: f32) -> Vec<RaySample> {
        let caster = RayCaster::new(scene);
        let samples: Vec<RaySample> = (0..self.num_rays)
            .into_par_iter()
            .map(|column| self.sample(&caster, player, column, view_height))
            .collect();
        trace!(
            rays = samples.len(),
            hits = samples.iter().filter(|s| s.projected.is_some()).count(),
            "sweep done"
        );
        samples
    }

    /// Casts and projects a single column.
    pub fn sample(
        &self,
        caster: &RayCaster,
        player: &Player,
        column: usize,
        view_height: f32,
    ) -> RaySample {
        let angle = player.ray_angle(column, self.num_rays, self.fov);
        let projected = caster.cast_angle(player.pos, angle).map(|hit| {
            let corrected_distance = fisheye_correct(hit.distance, angle, player.heading);
            let scene = caster.scene();
            let illumination = illumination(scene.lights(), hit.point);
            let base = scene.wall(hit.wall).map_or(Rgb::default(), |w| w.color);
            Projected {
                hit,
                corrected_distance,
                illumination,
                strip: Strip {
                    column,
                    height: strip_height(corrected_distance, view_height),
                    color: base.scale(illumination * attenuation(corrected_distance)),
                },
            }
        });
        RaySample {
            column,
            angle,
            projected,
        }
    }

    /// Width of one strip in a view `view_width` pixels wide.
    #[inline]
    pub fn column_width(&self, view_width: f32) -> f32 {
        view_width / self.num_rays as f32
    }
}

/// Removes the fisheye effect of a radial sweep onto a flat screen.
///
/// `ray_angle` must be the exact angle the ray was cast along.
#[inline]
pub fn fisheye_correct(distance: f32, ray_angle: f32, heading: f32) -> f32 {
    distance * (ray_angle - heading).cos()
}

/// On-screen height of a wall at `corrected_distance`, capped at `view_height`.
#[inline]
pub fn strip_height(corrected_distance: f32, view_height: f32) -> f32 {
    (view_height * PROJECTION_SCALE / (corrected_distance + 1.0)).min(view_height)
}

/// Linear darkening with distance, down to a floor at `MAX_VISIBLE`.
#[inline]
pub fn attenuation(corrected_distance: f32) -> f32 {
    (1.0 - corrected_distance / MAX_VISIBLE).max(ATTENUATION_FLOOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Point;
    use crate::world::{LightSource, Wall};

    #[test]
    fn correction_is_identity_on_center_ray() {
        assert_eq!(fisheye_correct(42.0, 0.7, 0.7), 42.0);
    }

    #[test]
    fn correction_shortens_off_center_rays() {
        let d = fisheye_correct(100.0, 0.5, 0.0);
        assert!((d - 100.0 * 0.5f32.cos()).abs() < 1e-4);
        assert!(d < 100.0);
    }

    #[test]
    fn nearer_walls_are_taller_up_to_the_cap() {
        let h = 420.0;
        assert_eq!(strip_height(0.0, h), h);
        assert_eq!(strip_height(149.0, h), h);
        assert!(strip_height(200.0, h) > strip_height(300.0, h));
        assert!((strip_height(299.0, h) - h * 0.5).abs() < 1e-3);
    }

    #[test]
    fn attenuation_floors_at_max_range() {
        assert_eq!(attenuation(0.0), 1.0);
        assert!((attenuation(200.0) - 0.5).abs() < 1e-6);
        assert_eq!(attenuation(400.0), ATTENUATION_FLOOR);
        assert_eq!(attenuation(1e6), ATTENUATION_FLOOR);
    }

    #[test]
    fn facing_wall_projects_expected_strip() {
        // Wall 100 units ahead, light sitting on the hit point
        let scene = Scene::new(
            vec![Wall::new(
                Point::new(100.0, -50.0),
                Point::new(100.0, 50.0),
                Rgb::new(200, 100, 50),
            )],
            vec![LightSource::new(Point::new(100.0, 0.0), 100.0, Rgb::new(255, 255, 255))],
        );
        let player = Player::new(Point::new(0.0, 0.0), 0.0);
        let proj = Projector::new(1, 1.0);
        let samples = proj.sweep(&scene, &player, 300.0);
        assert_eq!(samples.len(), 1);

        let p = samples[0].projected.expect("hit");
        assert_eq!(p.hit.distance, 100.0);
        assert_eq!(p.corrected_distance, 100.0);
        assert_eq!(p.illumination, 1.0);
        // attenuation = 1 - 100 / 400 = 0.75
        assert_eq!(p.strip.color, Rgb::new(150, 75, 37));
        assert_eq!(p.strip.height, 300.0);
    }

    #[test]
    fn misses_produce_no_strip() {
        let scene = Scene::default();
        let samples = Projector::new(8, 1.0).sweep(&scene, &Player::default(), 300.0);
        assert_eq!(samples.len(), 8);
        assert!(samples.iter().all(|s| s.projected.is_none()));
    }

    #[test]
    fn parallel_sweep_matches_sequential() {
        let scene = Scene::arena();
        let player = Player::new(Point::new(320.0, 270.0), 2.1);
        let proj = Projector::new(97, 1.1);
        let caster = RayCaster::new(&scene);

        let swept = proj.sweep(&scene, &player, 480.0);
        let serial: Vec<_> = (0..97)
            .map(|c| proj.sample(&caster, &player, c, 480.0))
            .collect();
        assert_eq!(swept, serial);
        assert!(swept.iter().enumerate().all(|(i, s)| s.column == i));
    }

    #[test]
    fn corrected_never_exceeds_raw_distance() {
        let scene = Scene::arena();
        let proj = Projector::new(120, 1.25);
        for k in 0..12 {
            let player = Player::new(Point::new(120.0 + 50.0 * k as f32, 300.0), k as f32);
            for s in proj.sweep(&scene, &player, 400.0) {
                let p = s.projected.expect("arena is closed");
                assert!(p.corrected_distance <= p.hit.distance);
                assert!(p.strip.height <= 400.0);
            }
        }
    }

    #[test]
    fn column_width_divides_view() {
        assert_eq!(Projector::new(120, 1.0).column_width(540.0), 4.5);
    }
}
