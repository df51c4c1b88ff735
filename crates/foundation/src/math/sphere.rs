use super::Vec3;

/// Latitude/longitude on a sphere, in radians.
///
/// Viewer convention: `+Y` is the north pole, longitude 0 lies on `+X` and
/// longitude +90° on `+Z`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LatLon {
    pub lat_rad: f64,
    pub lon_rad: f64,
}

impl LatLon {
    pub fn new(lat_rad: f64, lon_rad: f64) -> Self {
        Self { lat_rad, lon_rad }
    }

    pub fn from_degrees(lat_deg: f64, lon_deg: f64) -> Self {
        Self::new(lat_deg.to_radians(), lon_deg.to_radians())
    }

    pub fn to_cartesian(self, radius: f64) -> Vec3 {
        sphere_point(self.lat_rad.cos(), self.lat_rad.sin(), self.lon_rad, radius)
    }
}

/// Point on a sphere of `radius` from a precomputed `cos(lat)`/`sin(lat)` pair.
///
/// Grid loops hoist the latitude trig out of the inner longitude loop.
#[inline]
pub fn sphere_point(cos_lat: f64, sin_lat: f64, lon_rad: f64, radius: f64) -> Vec3 {
    Vec3::new(
        radius * cos_lat * lon_rad.cos(),
        radius * sin_lat,
        radius * cos_lat * lon_rad.sin(),
    )
}
