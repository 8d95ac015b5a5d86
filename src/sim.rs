use tracing::info;

use crate::config::SimConfig;
use crate::error::ConfigError;
use crate::mover::{Mover, TickOutcome};
use crate::player::Player;
use crate::projector::{Projector, RaySample};
use crate::world::{LightSource, Scene, Wall};

/// Everything an external renderer needs to draw one frame.
#[derive(Clone, Debug)]
pub struct Frame<'a> {
    pub player: Player,
    pub walls: &'a [Wall],
    pub lights: &'a [LightSource],
    /// One sample per column, in column order.
    pub rays: Vec<RaySample>,
    pub tick: TickOutcome,
    pub config: SimConfig,
    /// Size of the 3D view the strips were projected for.
    pub view_width: f32,
    pub view_height: f32,
    /// Horizontal extent of one strip, `view_width / num_rays`.
    pub column_width: f32,
}

/// A scene plus the player wandering through it.
///
/// Each call to [`Simulation::step`] advances the player once, then casts and
/// projects the full ray sweep from the new pose.
#[derive(Clone, Debug)]
pub struct Simulation {
    scene: Scene,
    mover: Mover,
    projector: Projector,
    config: SimConfig,
    time: u64,
}

impl Simulation {
    pub fn new(scene: Scene, player: Player, config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        info!(
            rays = config.num_rays,
            fov_deg = config.fov.to_degrees(),
            walls = scene.walls().len(),
            lights = scene.lights().len(),
            "simulation ready"
        );
        Ok(Self {
            mover: Mover::new(player, config.move_speed, config.rot_speed),
            projector: Projector::new(config.num_rays, config.fov),
            scene,
            config,
            time: 0,
        })
    }

    /// The built-in arena with the default starting pose.
    pub fn arena(config: SimConfig) -> Result<Self, ConfigError> {
        Self::new(Scene::arena(), Player::default(), config)
    }

    /// Runs one frame for a `screen_width` by `screen_height` output.
    pub fn step(&mut self, screen_width: f32, screen_height: f32) -> Frame<'_> {
        let tick = self.mover.tick(&self.scene, self.time);
        self.time += 1;

        let player = *self.mover.player();
        let view_width = screen_width * self.config.view_width;
        let view_height = screen_height * self.config.view_height;
        let rays = self.projector.sweep(&self.scene, &player, view_height);
        Frame {
            player,
            walls: self.scene.walls(),
            lights: self.scene.lights(),
            rays,
            tick,
            config: self.config,
            view_width,
            view_height,
            column_width: self.projector.column_width(view_width),
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn player(&self) -> &Player {
        self.mover.player()
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Frame number of the next tick.
    pub fn time(&self) -> u64 {
        self.time
    }
}
