use thiserror::Error;

/// Rejected simulation parameters.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("ray count must be at least 1")]
    NoRays,

    #[error("field of view {0} must be in (0, pi) radians")]
    FieldOfView(f32),

    #[error("{name} must be finite and non-negative, got {value}")]
    Speed { name: &'static str, value: f32 },

    #[error("view {name} fraction {value} must be in (0, 1]")]
    ViewFraction { name: &'static str, value: f32 },
}
