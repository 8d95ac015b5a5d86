use std::f32::consts::{PI, TAU};

use tracing::debug;

use crate::math::{Point, segment_distance_sqr};
use crate::player::Player;
use crate::world::Scene;

/// Minimum distance the player keeps from any wall.
pub const PLAYER_RADIUS: f32 = 15.0;
/// Heading change applied when a move is blocked by a wall.
pub const BOUNCE_TURN: f32 = PI * 0.7;
/// Inner corners of the rectangle the player is clamped to.
pub const ARENA_MIN: Point = Point::new(60.0, 60.0);
pub const ARENA_MAX: Point = Point::new(740.0, 540.0);

/// Result of a single [`Mover::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// The candidate position was free and has been committed.
    Moved,
    /// A wall was within [`PLAYER_RADIUS`]; the player stayed put and turned.
    Bounced,
}

/// Drives the player along a wandering path.
///
/// Speed along each axis is modulated by its own slow oscillator, and the
/// heading drifts continuously, so the player traces curves rather than
/// straight lines. Running into a wall does not reflect the player; it
/// rotates the heading by a fixed obtuse angle and lets the next ticks carry
/// it away.
#[derive(Clone, Debug)]
pub struct Mover {
    player: Player,
    move_speed: f32,
    rot_speed: f32,
}

impl Mover {
    pub fn new(mut player: Player, move_speed: f32, rot_speed: f32) -> Self {
        player.heading = player.heading.rem_euclid(TAU);
        Self {
            player,
            move_speed,
            rot_speed,
        }
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Advances the player by one tick at animation frame `frame`.
    ///
    /// The heading stays in `[0, 2π)` so ray angles keep full `f32` precision
    /// however long the walk runs.
    pub fn tick(&mut self, scene: &Scene, frame: u64) -> TickOutcome {
        let (sin_t, cos_t) = oscillators(frame);

        let fwd = self.player.forward();
        let delta = Point::new(
            fwd.x * self.move_speed * (1.0 + sin_t * 0.3),
            fwd.y * self.move_speed * (1.0 + cos_t * 0.3),
        );
        let candidate = self.player.pos + delta;

        let outcome = if collides(scene, candidate) {
            self.player.heading += BOUNCE_TURN;
            debug!(
                x = self.player.pos.x,
                y = self.player.pos.y,
                heading = self.player.heading,
                "blocked by wall, turning"
            );
            TickOutcome::Bounced
        } else {
            self.player.pos = candidate;
            TickOutcome::Moved
        };

        self.player.heading += self.rot_speed * (1.0 + cos_t * 0.5);
        self.player.heading = self.player.heading.rem_euclid(TAU);
        self.player.pos = self.player.pos.clamp(ARENA_MIN, ARENA_MAX);

        outcome
    }
}

/// `sin(0.005 t)` and `cos(0.003 t)` at frame `t`.
fn oscillators(frame: u64) -> (f32, f32) {
    // f64 holds every frame count up to 2^53 exactly
    let t = frame as f64;
    ((t * 0.005).sin() as f32, (t * 0.003).cos() as f32)
}

/// Whether a player centered at `pos` would overlap any wall.
pub fn collides(scene: &Scene, pos: Point) -> bool {
    let r_sqr = PLAYER_RADIUS * PLAYER_RADIUS;
    scene
        .walls()
        .iter()
        .filter_map(|w| segment_distance_sqr(pos, w.start, w.end))
        .any(|d_sqr| d_sqr < r_sqr)
}
