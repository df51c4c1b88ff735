use foundation::math::LatLon;
use serde::{Deserialize, Serialize};

/// Line layout of the lat/lon overlay.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraticuleSpec {
    /// Spacing between parallels and between meridians.
    pub spacing_deg: i32,
    /// Sample spacing along each line.
    pub sample_deg: f64,
    /// Outermost parallel drawn (both hemispheres).
    pub parallel_limit_deg: i32,
    /// Meridians stop this far from the poles so they don't pinch to a point.
    pub meridian_limit_deg: f64,
}

impl Default for GraticuleSpec {
    fn default() -> Self {
        Self {
            spacing_deg: 15,
            sample_deg: 1.0,
            parallel_limit_deg: 75,
            meridian_limit_deg: 89.5,
        }
    }
}

/// Precomputed overlay polylines. Built once, never regenerated.
#[derive(Debug, Clone, PartialEq)]
pub struct Graticule {
    pub parallels: Vec<Vec<[f32; 3]>>,
    pub meridians: Vec<Vec<[f32; 3]>>,
}

impl Graticule {
    pub fn build(radius: f64, spec: GraticuleSpec) -> Self {
        let spacing = spec.spacing_deg.max(1);
        let sample = spec.sample_deg.max(1e-3);

        // Parallels: lat fixed, lon sweeps -180..=180 so each ring closes.
        let lon_samples = (360.0 / sample).round() as usize;
        let mut parallels = Vec::new();
        let mut lat = -spec.parallel_limit_deg;
        while lat <= spec.parallel_limit_deg {
            let line = (0..=lon_samples)
                .map(|i| point(lat as f64, -180.0 + i as f64 * sample, radius))
                .collect();
            parallels.push(line);
            lat += spacing;
        }

        // Meridians: lon fixed, lat sweeps between the limits.
        let limit = spec.meridian_limit_deg;
        let lat_samples = ((2.0 * limit) / sample).floor() as usize;
        let mut meridians = Vec::new();
        let mut lon = -180;
        while lon < 180 {
            let line = (0..=lat_samples)
                .map(|i| point(-limit + i as f64 * sample, lon as f64, radius))
                .collect();
            meridians.push(line);
            lon += spacing;
        }

        Self {
            parallels,
            meridians,
        }
    }

    pub fn lines(&self) -> impl Iterator<Item = &Vec<[f32; 3]>> {
        self.parallels.iter().chain(self.meridians.iter())
    }

    pub fn line_count(&self) -> usize {
        self.parallels.len() + self.meridians.len()
    }

    /// Flattens the polylines into `LineList` vertex pairs: `(p0,p1),(p1,p2),...`.
    pub fn line_list(&self) -> Vec<f32> {
        let mut out = Vec::new();
        for line in self.lines() {
            for seg in line.windows(2) {
                out.extend_from_slice(&seg[0]);
                out.extend_from_slice(&seg[1]);
            }
        }
        out
    }
}

fn point(lat_deg: f64, lon_deg: f64, radius: f64) -> [f32; 3] {
    LatLon::from_degrees(lat_deg, lon_deg)
        .to_cartesian(radius)
        .to_f32_array()
}
