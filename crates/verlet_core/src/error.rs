use thiserror::Error;

/// Errors returned when a solver configuration is rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be finite")]
    NonFinite { field: &'static str },

    #[error("particle radius must be > 0, got {radius}")]
    InvalidRadius { radius: f32 },

    #[error("world must be wider than one particle and taller than zero, got {width}x{height}")]
    InvalidWorldSize { width: f32, height: f32 },

    #[error("sub-step count must be at least 1")]
    ZeroSubSteps,

    #[error("cell size {cell_size} is smaller than the interaction distance {min}")]
    CellTooSmall { cell_size: f32, min: f32 },

    #[error("max frame dt must be > 0, got {max_frame_dt}")]
    InvalidMaxFrameDt { max_frame_dt: f32 },

    #[error("wall damping must be within [0, 1], got {damping}")]
    InvalidDamping { damping: f32 },
}
