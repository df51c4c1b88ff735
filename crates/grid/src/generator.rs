use foundation::math::sphere_point;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::step::{AngularStep, PointCap};

/// Size of one coordinate in the position buffer.
pub const COORD_BYTES: usize = std::mem::size_of::<f32>();

/// Sphere the grid is placed on.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridParams {
    /// Globe radius `R`.
    pub radius: f64,
    /// Lift above the globe surface so points don't z-fight with it.
    pub surface_offset: f64,
}

impl GridParams {
    pub fn shell_radius(&self) -> f64 {
        self.radius + self.surface_offset
    }
}

impl Default for GridParams {
    fn default() -> Self {
        Self {
            radius: 1.0,
            surface_offset: 0.002,
        }
    }
}

/// Pre-stride lat/lon counts for a step.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct GridEstimate {
    pub lat_count: usize,
    pub lon_count: usize,
    pub total: usize,
}

/// Latitudes include both poles; longitudes stop short of the +180° seam.
pub fn estimate_counts(step: AngularStep) -> GridEstimate {
    counts_for_degrees(step.degrees())
}

fn counts_for_degrees(step_deg: f64) -> GridEstimate {
    let lat_count = ((180.0 / step_deg).floor() as usize + 1).max(1);
    let lon_count = ((360.0 / step_deg).floor() as usize).max(1);
    GridEstimate {
        lat_count,
        lon_count,
        total: lat_count.saturating_mul(lon_count),
    }
}

/// Returns `(skip, used)`: the index stride and the number of samples it keeps.
pub fn stride_for(total: usize, cap: PointCap) -> (usize, usize) {
    let cap = cap.get();
    if total <= cap {
        return (1, total);
    }
    let skip = total.div_ceil(cap);
    (skip, total.div_ceil(skip))
}

/// An immutable, capped point grid.
#[derive(Debug, Clone, PartialEq)]
pub struct GridResult {
    pub step: AngularStep,
    pub estimate: GridEstimate,
    /// Flat `x, y, z` triples, exactly `count * 3` long.
    pub positions: Vec<f32>,
    pub count: usize,
    pub skip: usize,
    pub byte_size: usize,
}

impl GridResult {
    pub fn points(&self) -> impl Iterator<Item = [f32; 3]> + '_ {
        self.positions
            .chunks_exact(3)
            .map(|p| [p[0], p[1], p[2]])
    }
}

/// Samples the lat/lon grid for `step`, keeping every `skip`-th linear index
/// (latitude-major) so the result never exceeds `cap`.
pub fn generate_grid(step: AngularStep, cap: PointCap, params: GridParams) -> GridResult {
    let step_deg = step.degrees();
    let estimate = counts_for_degrees(step_deg);
    let GridEstimate {
        lat_count,
        lon_count,
        total,
    } = estimate;
    let (skip, used) = stride_for(total, cap);
    let radius = params.shell_radius();

    let mut positions = Vec::with_capacity(used * 3);
    for li in 0..lat_count {
        let lat = (-90.0 + li as f64 * step_deg).to_radians();
        let (sin_lat, cos_lat) = lat.sin_cos();

        // First column in this row whose linear index lands on the stride.
        let row_start = li * lon_count;
        let mut lj = (skip - row_start % skip) % skip;
        while lj < lon_count {
            let lon = (-180.0 + lj as f64 * step_deg).to_radians();
            let p = sphere_point(cos_lat, sin_lat, lon, radius);
            positions.extend_from_slice(&p.to_f32_array());
            lj += skip;
        }
    }
    positions.shrink_to_fit();

    let count = positions.len() / 3;
    debug!(
        step_deg,
        lat_count, lon_count, total, skip, count, "generated point grid"
    );

    GridResult {
        step,
        estimate,
        positions,
        count,
        skip,
        byte_size: count * 3 * COORD_BYTES,
    }
}

#[cfg(test)]
mod tests {
    use super::{GridParams, counts_for_degrees, estimate_counts, generate_grid, stride_for};
    use crate::step::{AngularStep, PointCap};
    use pretty_assertions::assert_eq;

    fn step(deg: f64) -> AngularStep {
        AngularStep::new(deg).unwrap()
    }

    fn cap(n: usize) -> PointCap {
        PointCap::new(n).unwrap()
    }

    #[test]
    fn one_degree_fits_under_default_cap() {
        let grid = generate_grid(step(1.0), PointCap::DEFAULT, GridParams::default());
        assert_eq!(grid.estimate.lat_count, 181);
        assert_eq!(grid.estimate.lon_count, 360);
        assert_eq!(grid.estimate.total, 65_160);
        assert_eq!(grid.skip, 1);
        assert_eq!(grid.count, 65_160);
        assert_eq!(grid.positions.len(), 65_160 * 3);
        assert_eq!(grid.byte_size, 65_160 * 12);
    }

    #[test]
    fn fifth_of_a_degree_is_strided_by_two() {
        let grid = generate_grid(step(0.2), PointCap::DEFAULT, GridParams::default());
        assert_eq!(grid.estimate.lat_count, 901);
        assert_eq!(grid.estimate.lon_count, 1800);
        assert_eq!(grid.estimate.total, 1_621_800);
        assert_eq!(grid.skip, 2);
        assert_eq!(grid.count, 810_900);
        assert!(grid.count <= PointCap::DEFAULT.get());
    }

    #[test]
    fn uncapped_grids_keep_every_sample() {
        for deg in [1.0, 2.0, 3.0, 5.0, 10.0, 15.0, 45.0, 90.0] {
            let estimate = estimate_counts(step(deg));
            let grid = generate_grid(step(deg), PointCap::DEFAULT, GridParams::default());
            assert_eq!(grid.skip, 1, "step {deg}");
            assert_eq!(grid.count, estimate.total, "step {deg}");
        }
    }

    #[test]
    fn capped_grids_use_more_than_half_the_budget() {
        for n in [1, 7, 500, 1000, 30_000, 65_159] {
            let grid = generate_grid(step(1.0), cap(n), GridParams::default());
            assert!(grid.skip > 1, "cap {n}");
            assert!(grid.count <= n, "cap {n}: {}", grid.count);
            assert!(grid.count > n / 2, "cap {n}: {}", grid.count);
        }
    }

    #[test]
    fn count_matches_retained_indices() {
        let c = cap(1000);
        let grid = generate_grid(step(1.0), c, GridParams::default());
        let estimate = grid.estimate;
        let expected = (0..estimate.total).filter(|i| i % grid.skip == 0).count();
        assert_eq!(grid.count, expected);
        assert_eq!(stride_for(estimate.total, c), (grid.skip, expected));
    }

    #[test]
    fn first_retained_sample_is_south_pole_at_antimeridian() {
        let grid = generate_grid(step(10.0), PointCap::DEFAULT, GridParams::default());
        let first = grid.points().next().unwrap();
        assert!((first[1] + 1.002).abs() < 1e-6);
    }

    #[test]
    fn points_lie_on_offset_shell() {
        let params = GridParams {
            radius: 1.0,
            surface_offset: 0.002,
        };
        let grid = generate_grid(step(2.0), cap(5000), params);
        for p in grid.points() {
            let r = (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt();
            assert!((r as f64 - 1.002).abs() < 1e-5, "radius {r}");
        }
    }

    #[test]
    fn regeneration_is_deterministic() {
        let a = generate_grid(step(3.0), cap(2000), GridParams::default());
        let b = generate_grid(step(3.0), cap(2000), GridParams::default());
        assert_eq!(a.count, b.count);
        assert_eq!(a.byte_size, b.byte_size);
        assert_eq!(a.positions, b.positions);
    }

    #[test]
    fn coarse_steps_degrade_to_minimal_grid() {
        let widest = generate_grid(step(180.0), PointCap::DEFAULT, GridParams::default());
        assert_eq!(widest.estimate.lat_count, 2);
        assert_eq!(widest.estimate.lon_count, 2);
        assert_eq!(widest.count, 4);

        let beyond = counts_for_degrees(500.0);
        assert_eq!(beyond.lat_count, 1);
        assert_eq!(beyond.lon_count, 1);
        assert_eq!(beyond.total, 1);
    }

    #[test]
    fn single_point_cap_keeps_only_index_zero() {
        let grid = generate_grid(step(1.0), cap(1), GridParams::default());
        assert_eq!(grid.skip, 65_160);
        assert_eq!(grid.count, 1);
    }
}
