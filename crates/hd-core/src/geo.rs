//! Geometric primitives shared by every map entity.
//!
//! Map geometry lives in a local Cartesian frame (metres) produced by the
//! excluded projection step; only the origin of that frame is kept as a
//! geographic coordinate.

/// A position in the local map frame, in metres.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    #[inline]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn xy(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// Planar (x/y) distance, ignoring elevation.  This is what lane
    /// association uses; ramps and bridges are separated by lane topology,
    /// not by height.
    #[inline]
    pub fn distance_2d(self, other: Point3) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    #[inline]
    pub fn distance(self, other: Point3) -> f64 {
        let dz = other.z - self.z;
        (self.distance_2d(other).powi(2) + dz * dz).sqrt()
    }
}

impl std::fmt::Display for Point3 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3})", self.x, self.y, self.z)
    }
}

/// A WGS-84 coordinate.  Used for the map origin only.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
    pub alt: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lon: f64, alt: f64) -> Self {
        Self { lat, lon, alt }
    }

    /// `true` when latitude and longitude are inside their WGS-84 ranges.
    pub fn is_valid(self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

/// Total length of a polyline in metres (planar).  Zero for fewer than two
/// points.
pub fn polyline_length(points: &[Point3]) -> f64 {
    points.windows(2).map(|w| w[0].distance_2d(w[1])).sum()
}

/// Arithmetic mean of a point set, or `None` when empty.
pub fn centroid(points: &[Point3]) -> Option<Point3> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (sx, sy, sz) = points
        .iter()
        .fold((0.0, 0.0, 0.0), |(x, y, z), p| (x + p.x, y + p.y, z + p.z));
    Some(Point3::new(sx / n, sy / n, sz / n))
}
