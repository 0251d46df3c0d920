//! Waypoints, lanes and road segments: the routable core of the map.
//!
//! Segments own their lanes and lanes own their waypoints; every other
//! relationship (successor segments, neighbouring lanes, linked stop lines)
//! is an id resolved through [`RoadNetwork`](crate::RoadNetwork) lookups.

use hd_core::{LaneId, Point3, RoadId, StopLineId, TrafficLightId, WaypointId};

/// A sample of a lane's centre-line.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Waypoint {
    pub id:      WaypointId,
    /// Owning lane.  Kept in sync with the containing `Lane::id`.
    pub lane_id: LaneId,
    pub pos:     Point3,
    /// Heading in radians, counter-clockwise from the +x axis.
    pub heading: f64,
    /// Reference speed in m/s.
    pub speed:   f64,
    /// Lane width at this point, in metres.
    pub width:   f64,

    /// Laterally adjacent points on the neighbouring lanes.
    pub left_point_id:  WaypointId,
    pub right_point_id: WaypointId,

    pub from_ids: Vec<WaypointId>,
    pub to_ids:   Vec<WaypointId>,
}

impl Waypoint {
    pub fn new(id: WaypointId, lane_id: LaneId, pos: Point3, heading: f64) -> Self {
        Self { id, lane_id, pos, heading, ..Self::default() }
    }
}

/// One drivable lane: an ordered centre-line plus lane-level links.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Lane {
    pub id:      LaneId,
    /// Owning road segment.
    pub road_id: RoadId,
    /// Position of the lane within its segment, counted from the left.
    pub num:     u32,
    /// Centre-line in driving order.
    pub points:  Vec<Waypoint>,

    /// Predecessor lanes (lanes that flow into this one).
    pub from_ids: Vec<LaneId>,
    /// Successor lanes.
    pub to_ids:   Vec<LaneId>,

    /// Lane-change neighbours.  Unset when there is none.
    pub left_lane_id:  LaneId,
    pub right_lane_id: LaneId,

    /// Speed limit in m/s.
    pub speed: f64,
    pub width: f64,

    pub stop_line_ids:     Vec<StopLineId>,
    pub traffic_light_ids: Vec<TrafficLightId>,
}

impl Lane {
    pub fn new(id: LaneId, road_id: RoadId) -> Self {
        Self { id, road_id, ..Self::default() }
    }

    /// `true` if a waypoint with `id` is on this lane's centre-line.
    #[inline]
    pub fn contains_waypoint(&self, id: WaypointId) -> bool {
        self.points.iter().any(|p| p.id == id)
    }

    pub fn waypoint(&self, id: WaypointId) -> Option<&Waypoint> {
        self.points.iter().find(|p| p.id == id)
    }

    /// Centre-line length in metres.
    pub fn length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| w[0].pos.distance_2d(w[1].pos))
            .sum()
    }
}

/// A road segment: a bundle of parallel lanes plus segment-level routing
/// links.  The `to_ids`/`from_ids` sets form the routing graph.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoadSegment {
    pub id:       RoadId,
    pub lanes:    Vec<Lane>,
    pub from_ids: Vec<RoadId>,
    pub to_ids:   Vec<RoadId>,
}

impl RoadSegment {
    pub fn new(id: RoadId) -> Self {
        Self { id, ..Self::default() }
    }

    pub fn lane(&self, id: LaneId) -> Option<&Lane> {
        self.lanes.iter().find(|l| l.id == id)
    }

    #[inline]
    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }
}
