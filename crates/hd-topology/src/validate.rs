//! Eager consistency check.
//!
//! The store resolves references lazily and treats a dangling id as "not
//! found" at query time.  This pass checks the invariants up front instead,
//! for use after loading, merging or renumbering:
//!
//! - ids are unique within each kind,
//! - every set waypoint/lane/road/stop-line/traffic-light/sign reference
//!   resolves,
//! - each lane's `road_id` names the segment that stores it, and each
//!   waypoint's `lane_id` (when set) names its lane,
//! - no allocator could reissue an id already in use.

use std::collections::HashSet;

use tracing::warn;

use hd_core::{
    EntityKind, LaneId, RoadId, SignId, StopLineId, TrafficLightId, TypedId, WaypointId,
};

use crate::error::{TopologyError, TopologyResult};
use crate::network::RoadNetwork;

/// Id sets used to resolve references during validation.
struct Resolver {
    waypoints:      HashSet<WaypointId>,
    roads:          HashSet<RoadId>,
    lanes:          HashSet<LaneId>,
    stop_lines:     HashSet<StopLineId>,
    traffic_lights: HashSet<TrafficLightId>,
    signs:          HashSet<SignId>,
}

impl Resolver {
    fn new(net: &RoadNetwork) -> Self {
        Self {
            waypoints:      net.lanes().flat_map(|l| l.points.iter().map(|p| p.id)).collect(),
            roads:          net.segments.iter().map(|s| s.id).collect(),
            lanes:          net.lanes().map(|l| l.id).collect(),
            stop_lines:     net.stop_lines.iter().map(|s| s.id).collect(),
            traffic_lights: net.traffic_lights.iter().map(|t| t.id).collect(),
            signs:          net.signs.iter().map(|s| s.id).collect(),
        }
    }
}

/// Records a dangling reference if `to` is set and absent from `known`.
fn check_ref<F, T>(out: &mut Vec<TopologyError>, from_id: F, to: T, known: &HashSet<T>)
where
    F: TypedId,
    T: TypedId + std::hash::Hash,
{
    if to.is_set() && !known.contains(&to) {
        out.push(TopologyError::DanglingReference {
            from_kind: F::KIND,
            from_id:   from_id.raw(),
            to_kind:   T::KIND,
            to_id:     to.raw(),
        });
    }
}

impl RoadNetwork {
    /// Every invariant violation, in discovery order.  Empty for a consistent
    /// network.
    pub fn violations(&self) -> Vec<TopologyError> {
        let mut out = Vec::new();
        self.check_unique_ids(&mut out);
        self.check_references(&mut out);
        self.check_allocators(&mut out);
        for v in &out {
            warn!(%v, "topology violation");
        }
        out
    }

    /// `Ok(())` for a consistent network, otherwise the first violation.
    pub fn validate(&self) -> TopologyResult<()> {
        match self.violations().into_iter().next() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn check_unique_ids(&self, out: &mut Vec<TopologyError>) {
        let mut seen: HashSet<(EntityKind, i32)> = HashSet::new();
        self.for_each_id(|kind, id| {
            if !seen.insert((kind, id)) {
                out.push(TopologyError::DuplicateId { kind, id });
            }
        });
    }

    fn check_allocators(&self, out: &mut Vec<TopologyError>) {
        let mut reported: HashSet<EntityKind> = HashSet::new();
        self.for_each_id(|kind, id| {
            if id > 0 && self.allocators.is_behind(kind, id) && reported.insert(kind) {
                out.push(TopologyError::AllocatorBehind {
                    kind,
                    id,
                    next: self.allocators.next(kind),
                });
            }
        });
    }

    fn check_references(&self, out: &mut Vec<TopologyError>) {
        let r = Resolver::new(self);

        for seg in &self.segments {
            for &to in seg.to_ids.iter().chain(&seg.from_ids) {
                check_ref(out, seg.id, to, &r.roads);
            }
            for lane in &seg.lanes {
                if lane.road_id != seg.id {
                    out.push(TopologyError::LaneRoadMismatch {
                        lane:    lane.id,
                        segment: seg.id,
                        claimed: lane.road_id,
                    });
                }
                let links = lane
                    .from_ids
                    .iter()
                    .chain(&lane.to_ids)
                    .chain([&lane.left_lane_id, &lane.right_lane_id]);
                for &to in links {
                    check_ref(out, lane.id, to, &r.lanes);
                }
                for &sl in &lane.stop_line_ids {
                    check_ref(out, lane.id, sl, &r.stop_lines);
                }
                for &tl in &lane.traffic_light_ids {
                    check_ref(out, lane.id, tl, &r.traffic_lights);
                }
                for wp in &lane.points {
                    if wp.lane_id.is_set() && wp.lane_id != lane.id {
                        out.push(TopologyError::WaypointLaneMismatch {
                            waypoint: wp.id,
                            lane:     lane.id,
                            claimed:  wp.lane_id,
                        });
                    }
                    let links = wp
                        .from_ids
                        .iter()
                        .chain(&wp.to_ids)
                        .chain([&wp.left_point_id, &wp.right_point_id]);
                    for &to in links {
                        check_ref(out, wp.id, to, &r.waypoints);
                    }
                }
            }
        }

        for x in &self.lines {
            check_ref(out, x.id, x.road_id, &r.roads);
            check_ref(out, x.id, x.lane_id, &r.lanes);
        }
        for x in &self.crossings {
            check_ref(out, x.id, x.road_id, &r.roads);
        }
        for x in &self.markings {
            check_ref(out, x.id, x.road_id, &r.roads);
            check_ref(out, x.id, x.lane_id, &r.lanes);
        }
        for x in &self.signs {
            check_ref(out, x.id, x.road_id, &r.roads);
            check_ref(out, x.id, x.lane_id, &r.lanes);
        }
        for x in &self.boundaries {
            check_ref(out, x.id, x.road_id, &r.roads);
        }
        for x in &self.curbs {
            check_ref(out, x.id, x.road_id, &r.roads);
            check_ref(out, x.id, x.lane_id, &r.lanes);
        }
        for x in &self.stop_lines {
            check_ref(out, x.id, x.road_id, &r.roads);
            check_ref(out, x.id, x.lane_id, &r.lanes);
            check_ref(out, x.id, x.traffic_light_id, &r.traffic_lights);
            check_ref(out, x.id, x.sign_id, &r.signs);
        }
        for x in &self.traffic_lights {
            for &lane in &x.lane_ids {
                check_ref(out, x.id, lane, &r.lanes);
            }
            check_ref(out, x.id, x.stop_line_id, &r.stop_lines);
        }
        for junc in &self.junctions {
            for conn in &junc.connections {
                check_ref(out, conn.id, conn.incoming_road_id, &r.roads);
                check_ref(out, conn.id, conn.connecting_road_id, &r.roads);
                for link in &conn.lane_links {
                    check_ref(out, conn.id, link.from, &r.lanes);
                    check_ref(out, conn.id, link.to, &r.lanes);
                }
            }
        }
    }
}
