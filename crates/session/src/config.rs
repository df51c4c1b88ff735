use std::path::Path;

use grid::{AngularStep, GraticuleSpec, GridParams, PointCap};
use scene::components::{LineMaterial, PointMaterial, Rgb};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_TEXTURES: [&str; 7] = [
    "earth_vegitation.jpg",
    "earth_temperature.png",
    "earth_temperature_descrete.png",
    "earth_pollution.png",
    "earth_precipitation.png",
    "pollution_combined.png",
    "precipitation_combined.png",
];

pub const INITIAL_STEP: AngularStep = AngularStep::new_const(3.0);

pub const STEP_OPTIONS: [AngularStep; 7] = [
    AngularStep::new_const(0.2),
    AngularStep::new_const(0.5),
    AngularStep::new_const(1.0),
    AngularStep::new_const(2.0),
    AngularStep::new_const(3.0),
    AngularStep::new_const(5.0),
    AngularStep::new_const(10.0),
];

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_y_deg: f64,
    /// Home distance from the globe center; `reset` returns here.
    pub distance: f64,
    pub max_distance: f64,
    pub near: f64,
    pub far: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_deg: 60.0,
            distance: 2.5,
            max_distance: 50.0,
            near: 0.1,
            far: 2000.0,
        }
    }
}

/// Everything the viewer reads at startup. Missing fields fall back to the
/// defaults, so an empty `{}` is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub grid: GridParams,
    pub point_cap: PointCap,
    pub initial_step: AngularStep,
    pub step_options: Vec<AngularStep>,
    pub points: PointMaterial,
    pub graticule: GraticuleSpec,
    pub lines: LineMaterial,
    pub background: Rgb,
    pub asset_root: String,
    pub textures: Vec<String>,
    pub default_texture: String,
    pub camera: CameraConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            grid: GridParams::default(),
            point_cap: PointCap::DEFAULT,
            initial_step: INITIAL_STEP,
            step_options: STEP_OPTIONS.to_vec(),
            points: PointMaterial::default(),
            graticule: GraticuleSpec::default(),
            lines: LineMaterial::default(),
            background: Rgb(0x0b1020),
            asset_root: "assets".to_string(),
            textures: DEFAULT_TEXTURES.iter().map(|s| s.to_string()).collect(),
            default_texture: DEFAULT_TEXTURES[0].to_string(),
            camera: CameraConfig::default(),
        }
    }
}

impl ViewerConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let radius = self.grid.radius;
        if !radius.is_finite() || radius <= 0.0 {
            return Err(ConfigError::Radius(radius));
        }
        let offset = self.grid.surface_offset;
        if !offset.is_finite() || offset < 0.0 {
            return Err(ConfigError::SurfaceOffset(offset));
        }
        if self.step_options.is_empty() {
            return Err(ConfigError::NoStepOptions);
        }
        if self.textures.is_empty() {
            return Err(ConfigError::NoTextures);
        }
        if !self.textures.contains(&self.default_texture) {
            return Err(ConfigError::DefaultTexture(self.default_texture.clone()));
        }
        let camera = [
            ("fov_y_deg", self.camera.fov_y_deg),
            ("distance", self.camera.distance),
            ("max_distance", self.camera.max_distance),
            ("near", self.camera.near),
            ("far", self.camera.far),
        ];
        for (field, value) in camera {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Camera { field, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::ViewerConfig;
    use crate::error::ConfigError;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_object_is_the_default() {
        let config = ViewerConfig::from_json_str("{}").unwrap();
        assert_eq!(config, ViewerConfig::default());
        assert_eq!(config.initial_step.degrees(), 3.0);
        assert_eq!(config.point_cap.get(), 1_200_000);
        assert_eq!(config.camera.distance, 2.5);
    }

    #[test]
    fn partial_overrides_keep_other_defaults() {
        let json = r##"{ "point_cap": 5000, "background": "#000000", "grid": { "radius": 2.0 } }"##;
        let config = ViewerConfig::from_json_str(json).unwrap();
        assert_eq!(config.point_cap.get(), 5000);
        assert_eq!(config.background.0, 0);
        assert_eq!(config.grid.radius, 2.0);
        assert_eq!(config.grid.surface_offset, 0.002);
        assert_eq!(config.textures.len(), 7);
    }

    #[test]
    fn round_trips_through_json() {
        let config = ViewerConfig::default();
        let json = config.to_json_pretty().unwrap();
        assert!(json.contains("\"#ffff88\""));
        assert_eq!(ViewerConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(matches!(
            ViewerConfig::from_json_str(r#"{ "initial_step": 0 }"#),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            ViewerConfig::from_json_str(r#"{ "default_texture": "moon.png" }"#),
            Err(ConfigError::DefaultTexture(_))
        ));
        assert!(matches!(
            ViewerConfig::from_json_str(r#"{ "grid": { "radius": -1.0 } }"#),
            Err(ConfigError::Radius(_))
        ));
        assert!(matches!(
            ViewerConfig::from_json_str(r#"{ "step_options": [] }"#),
            Err(ConfigError::NoStepOptions)
        ));
        assert!(matches!(
            ViewerConfig::from_json_str(r#"{ "camera": { "fov_y_deg": 0.0 } }"#),
            Err(ConfigError::Camera { field: "fov_y_deg", .. })
        ));
    }
}
