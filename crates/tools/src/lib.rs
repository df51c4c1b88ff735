//! Offline helpers behind the `globe-grid` binary.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use grid::{
    AngularStep, COORD_BYTES, CapError, Graticule, PointCap, StepError,
    estimate_counts, stride_for,
};
use serde::Serialize;
use session::{ConfigError, TextureCatalog, ViewerConfig, memory_label, points_label};

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Step(#[from] StepError),
    #[error(transparent)]
    Cap(#[from] CapError),
    #[error("writing {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_config(path: Option<&Path>) -> Result<ViewerConfig, ConfigError> {
    match path {
        Some(path) => ViewerConfig::from_path(path),
        None => Ok(ViewerConfig::default()),
    }
}

/// What a step would produce, without generating it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EstimateSummary {
    pub step_deg: String,
    pub lat_count: usize,
    pub lon_count: usize,
    pub total: usize,
    pub skip: usize,
    pub count: usize,
    pub byte_size: usize,
}

impl EstimateSummary {
    pub fn new(step: AngularStep, cap: PointCap) -> Self {
        let estimate = estimate_counts(step);
        let (skip, count) = stride_for(estimate.total, cap);
        Self {
            step_deg: step.degrees().to_string(),
            lat_count: estimate.lat_count,
            lon_count: estimate.lon_count,
            total: estimate.total,
            skip,
            count,
            byte_size: count * 3 * COORD_BYTES,
        }
    }

    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("step: {}°", self.step_deg),
            format!(
                "grid: {} x {} = {}",
                self.lat_count, self.lon_count, self.total
            ),
            format!("skip: {}", self.skip),
            points_label(self.count),
            memory_label(self.byte_size),
        ]
    }
}

/// Writes `data` as packed little-endian `f32`s.
pub fn write_f32_le<W: Write>(out: &mut W, data: &[f32]) -> io::Result<()> {
    let mut buf = Vec::with_capacity(data.len() * COORD_BYTES);
    for v in data {
        buf.extend_from_slice(&v.to_le_bytes());
    }
    out.write_all(&buf)
}

pub fn write_f32_file(path: &Path, data: &[f32]) -> Result<(), ToolError> {
    let mut file = std::fs::File::create(path).map_err(|source| ToolError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    write_f32_le(&mut file, data).map_err(|source| ToolError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Graticule as `LineList` vertices on the bare globe.
pub fn graticule_vertices(config: &ViewerConfig) -> (Graticule, Vec<f32>) {
    let graticule = Graticule::build(config.grid.radius, config.graticule);
    let vertices = graticule.line_list();
    (graticule, vertices)
}

pub fn texture_listing(config: &ViewerConfig) -> Vec<String> {
    let catalog = TextureCatalog::from_config(config);
    catalog
        .names()
        .iter()
        .map(|name| {
            let marker = if name == catalog.default_name() { "*" } else { " " };
            let path = catalog.path(name).unwrap_or_default();
            format!("{marker} {name}\t{path}")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{EstimateSummary, texture_listing, write_f32_le};
    use grid::{AngularStep, PointCap};
    use pretty_assertions::assert_eq;
    use session::ViewerConfig;

    #[test]
    fn estimate_matches_generator_contract() {
        let s = EstimateSummary::new(AngularStep::new(0.2).unwrap(), PointCap::DEFAULT);
        assert_eq!(
            (s.lat_count, s.lon_count, s.total, s.skip, s.count),
            (901, 1800, 1_621_800, 2, 810_900)
        );
        assert_eq!(s.lines()[3], "Points: 810,900");
    }

    #[test]
    fn floats_are_little_endian() {
        let mut out = Vec::new();
        write_f32_le(&mut out, &[1.0, -2.5]).unwrap();
        assert_eq!(out, [0, 0, 128, 63, 0, 0, 32, 192]);
    }

    #[test]
    fn listing_marks_default_texture() {
        let lines = texture_listing(&ViewerConfig::default());
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], "* earth_vegitation.jpg\tassets/earth_vegitation.jpg");
        assert!(lines[1].starts_with("  earth_temperature.png"));
    }
}
