use std::path::PathBuf;

use gpu::GpuError;
use grid::{CapError, StepError};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssetError {
    #[error("asset {path:?} not found")]
    NotFound { path: String },
    #[error("fetching {path:?} failed: {reason}")]
    Fetch { path: String, reason: String },
    #[error("decoding {path:?} failed: {reason}")]
    Decode { path: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Step(#[from] StepError),
    #[error(transparent)]
    Gpu(#[from] GpuError),
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error("unknown texture {0:?}")]
    UnknownTexture(String),
    #[error("grid of {count} points exceeds a single draw call")]
    TooManyPoints { count: usize },
    #[error("globe entity is gone")]
    MissingGlobe,
    #[error("session has been shut down")]
    ShutDown,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Cap(#[from] CapError),
    #[error("radius must be positive and finite, got {0}")]
    Radius(f64),
    #[error("surface offset must be finite and non-negative, got {0}")]
    SurfaceOffset(f64),
    #[error("step options must not be empty")]
    NoStepOptions,
    #[error("texture list must not be empty")]
    NoTextures,
    #[error("default texture {0:?} is not in the texture list")]
    DefaultTexture(String),
    #[error("camera {field} must be positive and finite, got {value}")]
    Camera { field: &'static str, value: f64 },
}
