//! Lat/lon point grids and graticule geometry on a sphere.
//!
//! Everything here is pure: no GPU, no scene, no logging subscriber. The
//! render session feeds [`generate_grid`] output straight into a vertex buffer.

pub mod generator;
pub mod graticule;
pub mod step;

pub use generator::*;
pub use graticule::*;
pub use step::*;
