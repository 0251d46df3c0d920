//! Map-level configuration and projection metadata.

use crate::error::{HdError, HdResult};
use crate::geo::GeoPoint;

/// Metadata carried by every map instance.
///
/// Typically filled in by the map loader from the file header and passed to
/// the network builder.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapConfig {
    /// Geographic position of the local frame's `(0, 0, 0)`.
    pub origin: GeoPoint,

    /// Projection definition string (e.g. a PROJ pipeline).  Opaque to the
    /// store; empty when the map is already in a local frame.
    pub projection: String,

    /// `true` for left-hand traffic maps.
    pub left_hand: bool,

    /// Run the full consistency check when a network is built.  Defaults to
    /// on in debug builds and off in release builds.
    pub validate_on_build: bool,
}

impl MapConfig {
    /// Reject configurations the store cannot represent.
    pub fn validate(&self) -> HdResult<()> {
        if !self.origin.is_valid() {
            return Err(HdError::Config(format!("map origin {} out of range", self.origin)));
        }
        Ok(())
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            origin:            GeoPoint::default(),
            projection:        String::new(),
            left_hand:         false,
            validate_on_build: cfg!(debug_assertions),
        }
    }
}
