//! Real-time 2D ray casting over a map of wall segments and point lights.
//!
//! Each [`Simulation::step`] moves the player one tick, casts one ray per
//! screen column, and projects the hits into lit, fisheye-corrected wall
//! strips. [`display::compose`] turns the resulting [`Frame`] into a
//! renderer-agnostic draw list, and [`renderer::Canvas`] rasterizes that list
//! into a pixel buffer.

pub mod caster;
pub mod config;
pub mod display;
pub mod error;
pub mod lighting;
pub mod math;
pub mod mover;
pub mod player;
pub mod projector;
pub mod renderer;
pub mod sim;
pub mod world;

pub use caster::{RayCaster, RayHit};
pub use config::SimConfig;
pub use error::ConfigError;
pub use math::Point;
pub use mover::{Mover, TickOutcome};
pub use player::Player;
pub use projector::{Projected, Projector, RaySample, Strip};
pub use sim::{Frame, Simulation};
pub use world::{LightSource, Rgb, Scene, Wall, WallId};
