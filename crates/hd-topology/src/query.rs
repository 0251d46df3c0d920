//! Structural lookups and traversal over a [`RoadNetwork`].
//!
//! Every lookup is a linear scan in collection insertion order and returns
//! `None` when nothing matches; "not found" is an expected outcome, not an
//! error.  No persistent id index is maintained: the store is rebuilt far
//! more often than a planner queries it per cycle.
//!
//! Ids are unique per kind, so "first match" is the only match in a valid
//! network.  Debug builds assert that uniqueness on the id lookups; use
//! [`RoadNetwork::validate`] to check a whole network up front.

use hd_core::{JunctionId, LaneId, Point3, RoadId, StopLineId, TrafficLightId, WaypointId};

use crate::furniture::{Sign, StopLine, TrafficLight};
use crate::junction::{Connection, Junction};
use crate::lane::{Lane, RoadSegment, Waypoint};
use crate::network::RoadNetwork;

impl RoadNetwork {
    // ── Counts ────────────────────────────────────────────────────────────

    /// Total number of lanes across all segments.
    pub fn lane_count_total(&self) -> usize {
        self.segments.iter().map(|s| s.lanes.len()).sum()
    }

    pub fn waypoint_count_total(&self) -> usize {
        self.lanes().map(|l| l.points.len()).sum()
    }

    /// Every lane, segment by segment, in insertion order.
    pub fn lanes(&self) -> impl Iterator<Item = &Lane> + '_ {
        self.segments.iter().flat_map(|s| s.lanes.iter())
    }

    // ── Id lookups ────────────────────────────────────────────────────────

    /// The lane whose centre-line contains waypoint `id`.
    pub fn lane_by_waypoint_id(&self, id: WaypointId) -> Option<&Lane> {
        let found = self.lanes().find(|l| l.contains_waypoint(id));
        debug_assert!(
            found.is_none() || self.lanes().filter(|l| l.contains_waypoint(id)).count() == 1,
            "waypoint {id} appears on more than one lane"
        );
        found
    }

    pub fn waypoint_by_id(&self, id: WaypointId) -> Option<&Waypoint> {
        self.lanes().find_map(|l| l.waypoint(id))
    }

    /// The lane with id `id`.  Unset ids return `None` without scanning.
    pub fn lane_by_id(&self, id: LaneId) -> Option<&Lane> {
        if !id.is_set() {
            return None;
        }
        let found = self.lanes().find(|l| l.id == id);
        debug_assert!(
            found.is_none() || self.lanes().filter(|l| l.id == id).count() == 1,
            "duplicate lane id {id}"
        );
        found
    }

    /// The segment with id `id`.  Unset ids return `None` without scanning.
    pub fn segment_by_id(&self, id: RoadId) -> Option<&RoadSegment> {
        if !id.is_set() {
            return None;
        }
        let found = self.segments.iter().find(|s| s.id == id);
        debug_assert!(
            found.is_none() || self.segments.iter().filter(|s| s.id == id).count() == 1,
            "duplicate road id {id}"
        );
        found
    }

    /// The segment that stores lane `id`.  Unset ids return `None` without
    /// scanning.
    pub fn segment_by_lane_id(&self, id: LaneId) -> Option<&RoadSegment> {
        if !id.is_set() {
            return None;
        }
        let found = self.segments.iter().find(|s| s.lanes.iter().any(|l| l.id == id));
        debug_assert!(
            found.is_none() || self.lanes().filter(|l| l.id == id).count() == 1,
            "duplicate lane id {id}"
        );
        found
    }

    /// Mutable access to one lane, for in-place geometry or attribute edits.
    /// Drops the transient cache.
    pub fn lane_by_id_mut(&mut self, id: LaneId) -> Option<&mut Lane> {
        if !id.is_set() {
            return None;
        }
        self.invalidate_caches();
        self.segments
            .iter_mut()
            .flat_map(|s| s.lanes.iter_mut())
            .find(|l| l.id == id)
    }

    /// Mutable access to one segment.  Drops the transient cache.
    pub fn segment_by_id_mut(&mut self, id: RoadId) -> Option<&mut RoadSegment> {
        if !id.is_set() {
            return None;
        }
        self.invalidate_caches();
        self.segments.iter_mut().find(|s| s.id == id)
    }

    pub fn junction_by_id(&self, id: JunctionId) -> Option<&Junction> {
        if !id.is_set() {
            return None;
        }
        self.junctions.iter().find(|j| j.id == id)
    }

    pub fn stop_line_by_id(&self, id: StopLineId) -> Option<&StopLine> {
        if !id.is_set() {
            return None;
        }
        self.stop_lines.iter().find(|s| s.id == id)
    }

    pub fn traffic_light_by_id(&self, id: TrafficLightId) -> Option<&TrafficLight> {
        if !id.is_set() {
            return None;
        }
        self.traffic_lights.iter().find(|t| t.id == id)
    }

    // ── Junctions ─────────────────────────────────────────────────────────

    /// The junction holding a connection from `incoming` onto `connecting`.
    pub fn find_junction(&self, connecting: RoadId, incoming: RoadId) -> Option<&Junction> {
        self.junctions
            .iter()
            .find(|j| j.find_connection(connecting, incoming).is_some())
    }

    /// The junction and connection for a movement, in one scan.
    pub fn find_connection(
        &self,
        connecting: RoadId,
        incoming: RoadId,
    ) -> Option<(&Junction, &Connection)> {
        self.junctions
            .iter()
            .find_map(|j| j.find_connection(connecting, incoming).map(|c| (j, c)))
    }

    // ── Traversal ─────────────────────────────────────────────────────────

    /// Resolved successor segments of `road`, in `to_ids` order.  Ids that do
    /// not resolve are skipped.
    pub fn successors(&self, road: RoadId) -> Vec<&RoadSegment> {
        self.segment_by_id(road)
            .map(|s| s.to_ids.iter().filter_map(|&id| self.segment_by_id(id)).collect())
            .unwrap_or_default()
    }

    /// Resolved predecessor segments of `road`, in `from_ids` order.
    pub fn predecessors(&self, road: RoadId) -> Vec<&RoadSegment> {
        self.segment_by_id(road)
            .map(|s| s.from_ids.iter().filter_map(|&id| self.segment_by_id(id)).collect())
            .unwrap_or_default()
    }

    pub fn next_lanes(&self, lane: LaneId) -> Vec<&Lane> {
        self.lane_by_id(lane)
            .map(|l| l.to_ids.iter().filter_map(|&id| self.lane_by_id(id)).collect())
            .unwrap_or_default()
    }

    pub fn prev_lanes(&self, lane: LaneId) -> Vec<&Lane> {
        self.lane_by_id(lane)
            .map(|l| l.from_ids.iter().filter_map(|&id| self.lane_by_id(id)).collect())
            .unwrap_or_default()
    }

    pub fn left_lane(&self, lane: LaneId) -> Option<&Lane> {
        self.lane_by_id(lane).and_then(|l| self.lane_by_id(l.left_lane_id))
    }

    pub fn right_lane(&self, lane: LaneId) -> Option<&Lane> {
        self.lane_by_id(lane).and_then(|l| self.lane_by_id(l.right_lane_id))
    }

    /// Stop lines attached to `lane`, via the lane's own `stop_line_ids`.
    pub fn stop_lines_of_lane(&self, lane: LaneId) -> Vec<&StopLine> {
        self.lane_by_id(lane)
            .map(|l| l.stop_line_ids.iter().filter_map(|&id| self.stop_line_by_id(id)).collect())
            .unwrap_or_default()
    }

    /// Signs whose owning road is `road`.
    pub fn signs_on_road(&self, road: RoadId) -> impl Iterator<Item = &Sign> + '_ {
        self.signs.iter().filter(move |s| road.is_set() && s.road_id == road)
    }

    /// The lane of the waypoint nearest to `pos`.
    pub fn closest_lane(&self, pos: Point3) -> Option<&Lane> {
        self.closest_waypoint(pos)
            .and_then(|wp| self.lane_by_waypoint_id(wp.id))
    }
}
