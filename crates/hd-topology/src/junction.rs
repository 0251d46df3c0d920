//! Junctions and the legal movements through them.

use hd_core::{ConnectionId, JunctionId, LaneId, Point3, RoadId};

/// Lane-level mapping inside a [`Connection`]: traffic in `from` (on the
/// incoming road) continues into `to` (on the connecting road).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LaneLink {
    pub from: LaneId,
    pub to:   LaneId,
}

/// One legal movement: from `incoming_road_id` onto `connecting_road_id`.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Connection {
    pub id:                 ConnectionId,
    pub incoming_road_id:   RoadId,
    pub connecting_road_id: RoadId,
    pub lane_links:         Vec<LaneLink>,
}

impl Connection {
    #[inline]
    pub fn matches(&self, connecting: RoadId, incoming: RoadId) -> bool {
        self.connecting_road_id == connecting && self.incoming_road_id == incoming
    }
}

/// An intersection: the set of movements it permits.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Junction {
    pub id:          JunctionId,
    pub connections: Vec<Connection>,
    /// Outline of the junction area.  May be empty.
    pub points:      Vec<Point3>,
}

impl Junction {
    pub fn new(id: JunctionId) -> Self {
        Self { id, ..Self::default() }
    }

    /// The first connection with exactly this `(connecting, incoming)` pair.
    pub fn find_connection(&self, connecting: RoadId, incoming: RoadId) -> Option<&Connection> {
        self.connections.iter().find(|c| c.matches(connecting, incoming))
    }

    /// `true` if any movement enters or leaves through `road`.
    pub fn touches_road(&self, road: RoadId) -> bool {
        self.connections
            .iter()
            .any(|c| c.incoming_road_id == road || c.connecting_road_id == road)
    }
}
