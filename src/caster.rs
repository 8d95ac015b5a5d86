use crate::math::Point;
use crate::world::{Scene, Wall, WallId};

/// Determinant magnitude below which a ray and a wall count as parallel.
const PARALLEL_EPS: f32 = 1e-10;

/// Nearest wall struck by a ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub point: Point,
    /// Distance from the ray origin, in units of the direction vector.
    pub distance: f32,
    pub wall: WallId,
}

/// Nearest-wall queries against a borrowed [`Scene`].
#[derive(Clone, Copy)]
pub struct RayCaster<'a> {
    scene: &'a Scene,
}

impl<'a> RayCaster<'a> {
    pub fn new(scene: &'a Scene) -> Self {
        Self { scene }
    }

    /// Casts a ray from `origin` along `dir` and returns the nearest wall hit.
    ///
    /// `dir` should be a unit vector for `distance` to be Euclidean. Walls
    /// parallel to the ray are ignored; on equal distances the wall stored
    /// first wins.
    pub fn cast(&self, origin: Point, dir: Point) -> Option<RayHit> {
        let mut nearest: Option<RayHit> = None;
        for (id, wall) in self.scene.walls_with_ids() {
            let Some(t) = intersect(origin, dir, wall) else {
                continue;
            };
            if nearest.is_none_or(|n| t < n.distance) {
                nearest = Some(RayHit {
                    point: origin + dir * t,
                    distance: t,
                    wall: id,
                });
            }
        }
        nearest
    }

    /// Casts a ray along `angle` (radians).
    #[inline]
    pub fn cast_angle(&self, origin: Point, angle: f32) -> Option<RayHit> {
        self.cast(origin, Point::from_angle(angle))
    }

    pub fn scene(&self) -> &'a Scene {
        self.scene
    }
}

/// Ray parameter `t` at which the ray `origin + t * dir` crosses `wall`.
///
/// Solves `origin + t * dir = start + u * (end - start)` for `t` and `u` by
/// Cramer's rule; a valid hit needs `t > 0` and `u` within `[0, 1]`.
fn intersect(origin: Point, dir: Point, wall: &Wall) -> Option<f32> {
    let wall_dir = wall.dir();
    let det = dir.cross(wall_dir);
    if det.abs() < PARALLEL_EPS {
        return None;
    }
    let to_start = wall.start - origin;
    let t = to_start.cross(wall_dir) / det;
    let u = to_start.cross(dir) / det;

    (t > 0.0 && (0.0..=1.0).contains(&u)).then_some(t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{DEFAULT_WALL_COLOR, Rgb};

    fn wall(x0: f32, y0: f32, x1: f32, y1: f32) -> Wall {
        Wall::new(Point::new(x0, y0), Point::new(x1, y1), DEFAULT_WALL_COLOR)
    }

    fn single_floor() -> Scene {
        Scene::new(vec![wall(0.0, 0.0, 10.0, 0.0)], vec![])
    }

    #[test]
    fn straight_down_hits_floor() {
        let scene = single_floor();
        let hit = RayCaster::new(&scene)
            .cast(Point::new(5.0, 5.0), Point::new(0.0, -1.0))
            .expect("hit");
        assert_eq!(hit.point, Point::new(5.0, 0.0));
        assert_eq!(hit.distance, 5.0);
        assert_eq!(hit.wall, WallId(0));
    }

    #[test]
    fn parallel_ray_misses() {
        let scene = single_floor();
        let hit = RayCaster::new(&scene).cast(Point::new(5.0, 5.0), Point::new(1.0, 0.0));
        assert_eq!(hit, None);
    }

    #[test]
    fn wall_behind_origin_is_ignored() {
        let scene = single_floor();
        let hit = RayCaster::new(&scene).cast(Point::new(5.0, 5.0), Point::new(0.0, 1.0));
        assert_eq!(hit, None);
    }

    #[test]
    fn ray_past_segment_end_misses() {
        let scene = single_floor();
        let hit = RayCaster::new(&scene).cast(Point::new(15.0, 5.0), Point::new(0.0, -1.0));
        assert_eq!(hit, None);
    }

    #[test]
    fn segment_endpoint_counts_as_hit() {
        let scene = single_floor();
        let hit = RayCaster::new(&scene).cast(Point::new(10.0, 3.0), Point::new(0.0, -1.0));
        assert_eq!(hit.map(|h| h.point), Some(Point::new(10.0, 0.0)));
    }

    #[test]
    fn nearest_of_several_walls_wins() {
        let scene = Scene::new(
            vec![
                wall(0.0, -10.0, 10.0, -10.0),
                wall(0.0, -2.0, 10.0, -2.0),
                wall(0.0, -6.0, 10.0, -6.0),
            ],
            vec![],
        );
        let caster = RayCaster::new(&scene);
        let hit = caster.cast(Point::new(5.0, 0.0), Point::new(0.0, -1.0)).unwrap();
        assert_eq!(hit.wall, WallId(1));
        assert_eq!(hit.distance, 2.0);
    }

    #[test]
    fn first_stored_wall_wins_ties() {
        let red = Rgb::new(255, 0, 0);
        let scene = Scene::new(
            vec![
                Wall::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0), red),
                Wall::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0), DEFAULT_WALL_COLOR),
            ],
            vec![],
        );
        let hit = RayCaster::new(&scene)
            .cast(Point::new(5.0, 5.0), Point::new(0.0, -1.0))
            .unwrap();
        assert_eq!(hit.wall, WallId(0));
    }

    #[test]
    fn casting_is_deterministic() {
        let scene = Scene::arena();
        let caster = RayCaster::new(&scene);
        let origin = Point::new(400.0, 300.0);
        for i in 0..64 {
            let a = i as f32 * 0.1;
            let first = caster.cast_angle(origin, a);
            let second = caster.cast_angle(origin, a);
            assert_eq!(first, second);
            if let (Some(x), Some(y)) = (first, second) {
                assert_eq!(x.distance.to_bits(), y.distance.to_bits());
            }
        }
    }

    #[test]
    fn enclosed_origin_always_hits_something() {
        let scene = Scene::arena();
        let caster = RayCaster::new(&scene);
        let origin = Point::new(400.0, 300.0);
        for i in 0..360 {
            let a = (i as f32).to_radians();
            let hit = caster.cast_angle(origin, a).expect("arena is closed");
            assert!(hit.distance > 0.0);
        }
    }

    #[test]
    fn returned_hit_is_nearest_of_all_valid_crossings() {
        let scene = Scene::arena();
        let caster = RayCaster::new(&scene);
        let origin = Point::new(300.0, 280.0);
        for i in 0..90 {
            let dir = Point::from_angle(i as f32 * 0.07);
            let hit = caster.cast(origin, dir).unwrap();
            for w in scene.walls() {
                if let Some(t) = intersect(origin, dir, w) {
                    assert!(hit.distance <= t);
                }
            }
        }
    }
}
