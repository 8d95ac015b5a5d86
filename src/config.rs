//! Simulation parameters, with defaults and environment overrides.
//!
//! | Variable               | Default | Description                        |
//! |------------------------|---------|------------------------------------|
//! | `RAY_ARENA_RAYS`       | `120`   | rays per frame (one per strip)     |
//! | `RAY_ARENA_FOV_DEG`    | `72`    | horizontal field of view, degrees  |
//! | `RAY_ARENA_MOVE_SPEED` | `3.0`   | world units per tick               |
//! | `RAY_ARENA_ROT_SPEED`  | `0.08`  | base heading drift, radians / tick |
//!
//! Unparseable values fall back to the default.

use std::f32::consts::PI;

use crate::error::ConfigError;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimConfig {
    /// Rays cast per frame, one per strip of the 3D view.
    pub num_rays: usize,
    /// Horizontal field of view, radians.
    pub fov: f32,
    pub move_speed: f32,
    pub rot_speed: f32,
    /// Width of the 3D view as a fraction of the output width.
    pub view_width: f32,
    /// Height of the 3D view as a fraction of the output height.
    pub view_height: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_rays: 120,
            fov: PI / 2.5,
            move_speed: 3.0,
            rot_speed: 0.08,
            view_width: 0.45,
            view_height: 0.7,
        }
    }
}

impl SimConfig {
    /// Defaults overridden by any `RAY_ARENA_*` variables that are set.
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            num_rays: env_parse("RAY_ARENA_RAYS", d.num_rays),
            fov: std::env::var("RAY_ARENA_FOV_DEG")
                .ok()
                .and_then(|v| v.parse::<f32>().ok())
                .map_or(d.fov, f32::to_radians),
            move_speed: env_parse("RAY_ARENA_MOVE_SPEED", d.move_speed),
            rot_speed: env_parse("RAY_ARENA_ROT_SPEED", d.rot_speed),
            ..d
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_rays == 0 {
            return Err(ConfigError::NoRays);
        }
        if !(self.fov > 0.0 && self.fov < PI) {
            return Err(ConfigError::FieldOfView(self.fov));
        }
        for (name, value) in [("move speed", self.move_speed), ("rotation speed", self.rot_speed)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Speed { name, value });
            }
        }
        for (name, value) in [("width", self.view_width), ("height", self.view_height)] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ConfigError::ViewFraction { name, value });
            }
        }
        Ok(())
    }
}

pub fn env_str(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

pub fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(SimConfig::default().validate(), Ok(()));
    }

    #[test]
    fn zero_rays_rejected() {
        let cfg = SimConfig {
            num_rays: 0,
            ..Default::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::NoRays));
    }

    #[test]
    fn bad_fov_rejected() {
        for fov in [0.0, -1.0, PI, f32::NAN] {
            let cfg = SimConfig {
                fov,
                ..Default::default()
            };
            assert!(matches!(cfg.validate(), Err(ConfigError::FieldOfView(_))));
        }
    }

    #[test]
    fn bad_speed_rejected() {
        let cfg = SimConfig {
            rot_speed: f32::INFINITY,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::Speed { name: "rotation speed", .. })
        ));
    }

    #[test]
    fn bad_view_fraction_rejected() {
        let cfg = SimConfig {
            view_height: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::ViewFraction { name: "height", .. })
        ));
    }

    #[test]
    fn env_override_applied() {
        // SAFETY: no other test reads or writes this variable.
        unsafe { std::env::set_var("RAY_ARENA_RAYS", "64") };
        let cfg = SimConfig::from_env();
        assert_eq!(cfg.num_rays, 64);
        unsafe { std::env::remove_var("RAY_ARENA_RAYS") };
    }

    #[test]
    fn unparseable_env_falls_back() {
        assert_eq!(env_parse("RAY_ARENA_TEST_UNSET_VARIABLE", 7u32), 7);
        // SAFETY: the variable name is unique to this test.
        unsafe { std::env::set_var("RAY_ARENA_TEST_GARBAGE", "seven") };
        assert_eq!(env_parse("RAY_ARENA_TEST_GARBAGE", 7u32), 7);
        unsafe { std::env::remove_var("RAY_ARENA_TEST_GARBAGE") };
    }
}
