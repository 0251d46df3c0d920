//! Incremental construction of a [`RoadNetwork`].
//!
//! The builder is the map-building collaborator's entry point: every `add_*`
//! call mints the new entity's id from the network's own allocators and keeps
//! both ends of each link consistent (a successor road also records its
//! predecessor, a stop line is listed on its lane, …).

use tracing::info;

use hd_core::{
    BoundaryId, ConnectionId, CrossingId, CurbId, JunctionId, LaneId, LineId, MapConfig,
    MarkingId, Point3, RoadId, SignId, StopLineId, TrafficLightId, WaypointId,
};

use crate::error::{TopologyError, TopologyResult};
use crate::furniture::{
    Boundary, BoundaryKind, Crossing, CrossingKind, Curb, Line, LineKind, Marking, MarkingKind,
    Sign, SignKind, StopLine, TrafficLight,
};
use crate::junction::{Connection, Junction, LaneLink};
use crate::lane::{Lane, RoadSegment, Waypoint};
use crate::network::RoadNetwork;

/// Construct a [`RoadNetwork`] incrementally, then call [`build`](Self::build).
///
/// Road references passed to furniture (`add_line`, `add_sign`, …) may be
/// [`RoadId::UNSET`]; any *set* id must already exist.
///
/// # Example
///
/// ```
/// use hd_core::Point3;
/// use hd_topology::RoadNetworkBuilder;
///
/// let mut b = RoadNetworkBuilder::new();
/// let r1 = b.add_segment().unwrap();
/// let r2 = b.add_segment().unwrap();
/// b.link_roads(r1, r2).unwrap();
/// let l1 = b.add_lane(r1).unwrap();
/// let w1 = b.add_waypoint(l1, Point3::xy(0.0, 0.0), 0.0).unwrap();
/// let net = b.build().unwrap();
/// assert_eq!(net.lane_by_waypoint_id(w1).map(|l| l.id), Some(l1));
/// ```
pub struct RoadNetworkBuilder {
    net: RoadNetwork,
}

impl RoadNetworkBuilder {
    pub fn new() -> Self {
        Self::with_config(MapConfig::default())
    }

    pub fn with_config(config: MapConfig) -> Self {
        Self { net: RoadNetwork::with_config(config) }
    }

    /// Continue editing an existing network.  New ids continue from its
    /// allocators.
    pub fn from_network(net: RoadNetwork) -> Self {
        Self { net }
    }

    /// The network built so far.
    pub fn network(&self) -> &RoadNetwork {
        &self.net
    }

    fn check_road(&self, road: RoadId) -> TopologyResult<()> {
        if road.is_set() && self.net.segment_by_id(road).is_none() {
            return Err(TopologyError::RoadNotFound(road));
        }
        Ok(())
    }

    fn check_lane(&self, lane: LaneId) -> TopologyResult<()> {
        if lane.is_set() && self.net.lane_by_id(lane).is_none() {
            return Err(TopologyError::LaneNotFound(lane));
        }
        Ok(())
    }

    fn lane_mut(&mut self, lane: LaneId) -> TopologyResult<&mut Lane> {
        self.net.lane_by_id_mut(lane).ok_or(TopologyError::LaneNotFound(lane))
    }

    fn segment_mut(&mut self, road: RoadId) -> TopologyResult<&mut RoadSegment> {
        self.net.segment_by_id_mut(road).ok_or(TopologyError::RoadNotFound(road))
    }

    // ── Roads, lanes, waypoints ───────────────────────────────────────────

    /// Add an empty road segment and return its id.
    pub fn add_segment(&mut self) -> TopologyResult<RoadId> {
        let id = self.net.allocate()?;
        self.net.segments.push(RoadSegment::new(id));
        Ok(id)
    }

    /// Record that traffic on `from` continues onto `to` (fills `to_ids` on
    /// `from` and `from_ids` on `to`).
    pub fn link_roads(&mut self, from: RoadId, to: RoadId) -> TopologyResult<()> {
        self.segment_mut(to)?;
        let seg = self.segment_mut(from)?;
        if !seg.to_ids.contains(&to) {
            seg.to_ids.push(to);
        }
        let seg = self.segment_mut(to)?;
        if !seg.from_ids.contains(&from) {
            seg.from_ids.push(from);
        }
        Ok(())
    }

    /// Append a lane to `road`.  Lanes are numbered in insertion order.
    pub fn add_lane(&mut self, road: RoadId) -> TopologyResult<LaneId> {
        self.segment_mut(road)?;
        let id = self.net.allocate()?;
        let seg = self.segment_mut(road)?;
        let mut lane = Lane::new(id, road);
        lane.num = seg.lanes.len() as u32;
        seg.lanes.push(lane);
        Ok(id)
    }

    /// Set a lane's speed limit (m/s) and width (m).
    pub fn set_lane_profile(&mut self, lane: LaneId, speed: f64, width: f64) -> TopologyResult<()> {
        let l = self.lane_mut(lane)?;
        l.speed = speed;
        l.width = width;
        Ok(())
    }

    /// Append a centre-line point to `lane`, chained to the previous point.
    pub fn add_waypoint(
        &mut self,
        lane: LaneId,
        pos: Point3,
        heading: f64,
    ) -> TopologyResult<WaypointId> {
        self.lane_mut(lane)?;
        let id: WaypointId = self.net.allocate()?;
        let l = self.lane_mut(lane)?;
        let mut wp = Waypoint::new(id, lane, pos, heading);
        wp.speed = l.speed;
        wp.width = l.width;
        if let Some(prev) = l.points.last_mut() {
            prev.to_ids.push(id);
            wp.from_ids.push(prev.id);
        }
        l.points.push(wp);
        Ok(id)
    }

    /// Record that `from` flows into `to`, at lane level and between their
    /// end and start waypoints.  Linking the same pair again is a no-op.
    pub fn link_lanes(&mut self, from: LaneId, to: LaneId) -> TopologyResult<()> {
        let first_of_to = self.lane_mut(to)?.points.first().map(|p| p.id);
        let f = self.lane_mut(from)?;
        if !f.to_ids.contains(&to) {
            f.to_ids.push(to);
        }
        let last_of_from = f.points.last_mut().map(|p| {
            if let Some(first) = first_of_to {
                if !p.to_ids.contains(&first) {
                    p.to_ids.push(first);
                }
            }
            p.id
        });
        let t = self.lane_mut(to)?;
        if !t.from_ids.contains(&from) {
            t.from_ids.push(from);
        }
        if let (Some(last), Some(first)) = (last_of_from, t.points.first_mut()) {
            if !first.from_ids.contains(&last) {
                first.from_ids.push(last);
            }
        }
        Ok(())
    }

    /// Mark `left` and `right` as lane-change neighbours.
    pub fn set_neighbors(&mut self, left: LaneId, right: LaneId) -> TopologyResult<()> {
        self.lane_mut(right)?;
        self.lane_mut(left)?.right_lane_id = right;
        self.lane_mut(right)?.left_lane_id = left;
        Ok(())
    }

    // ── Road furniture ────────────────────────────────────────────────────

    pub fn add_line(
        &mut self,
        road: RoadId,
        lane: LaneId,
        kind: LineKind,
        points: Vec<Point3>,
    ) -> TopologyResult<LineId> {
        self.check_road(road)?;
        self.check_lane(lane)?;
        let id = self.net.allocate()?;
        self.net.lines.push(Line { id, road_id: road, lane_id: lane, kind, points, ..Line::default() });
        Ok(id)
    }

    pub fn add_crossing(
        &mut self,
        road: RoadId,
        kind: CrossingKind,
        points: Vec<Point3>,
    ) -> TopologyResult<CrossingId> {
        self.check_road(road)?;
        let id = self.net.allocate()?;
        self.net.crossings.push(Crossing { id, road_id: road, kind, points });
        Ok(id)
    }

    pub fn add_marking(
        &mut self,
        road: RoadId,
        lane: LaneId,
        kind: MarkingKind,
        center: Point3,
        heading: f64,
    ) -> TopologyResult<MarkingId> {
        self.check_road(road)?;
        self.check_lane(lane)?;
        let id = self.net.allocate()?;
        self.net.markings.push(Marking {
            id,
            road_id: road,
            lane_id: lane,
            kind,
            center,
            heading,
            points: Vec::new(),
        });
        Ok(id)
    }

    pub fn add_sign(
        &mut self,
        road: RoadId,
        lane: LaneId,
        kind: SignKind,
        value: f64,
        pos: Point3,
    ) -> TopologyResult<SignId> {
        self.check_road(road)?;
        self.check_lane(lane)?;
        let id = self.net.allocate()?;
        self.net.signs.push(Sign { id, road_id: road, lane_id: lane, kind, value, pos, heading: 0.0 });
        Ok(id)
    }

    pub fn add_boundary(
        &mut self,
        road: RoadId,
        kind: BoundaryKind,
        points: Vec<Point3>,
    ) -> TopologyResult<BoundaryId> {
        self.check_road(road)?;
        let id = self.net.allocate()?;
        self.net.boundaries.push(Boundary { id, road_id: road, kind, points });
        Ok(id)
    }

    pub fn add_curb(
        &mut self,
        road: RoadId,
        lane: LaneId,
        points: Vec<Point3>,
    ) -> TopologyResult<CurbId> {
        self.check_road(road)?;
        self.check_lane(lane)?;
        let id = self.net.allocate()?;
        self.net.curbs.push(Curb { id, road_id: road, lane_id: lane, points, ..Curb::default() });
        Ok(id)
    }

    /// Add a stop line.  When `lane` is set the stop line is also listed in
    /// that lane's `stop_line_ids`.
    pub fn add_stop_line(
        &mut self,
        road: RoadId,
        lane: LaneId,
        points: Vec<Point3>,
    ) -> TopologyResult<StopLineId> {
        self.check_road(road)?;
        self.check_lane(lane)?;
        let id = self.net.allocate()?;
        if lane.is_set() {
            self.lane_mut(lane)?.stop_line_ids.push(id);
        }
        self.net.stop_lines.push(StopLine { id, road_id: road, lane_id: lane, points, ..StopLine::default() });
        Ok(id)
    }

    /// Add a traffic light controlling `lanes`; each lane lists it in
    /// `traffic_light_ids`.
    pub fn add_traffic_light(
        &mut self,
        lanes: &[LaneId],
        pos: Point3,
    ) -> TopologyResult<TrafficLightId> {
        for &lane in lanes {
            self.check_lane(lane)?;
        }
        let id = self.net.allocate()?;
        for &lane in lanes.iter().filter(|l| l.is_set()) {
            self.lane_mut(lane)?.traffic_light_ids.push(id);
        }
        self.net.traffic_lights.push(TrafficLight {
            id,
            lane_ids: lanes.to_vec(),
            pos,
            ..TrafficLight::default()
        });
        Ok(id)
    }

    /// Pair a stop line with the traffic light that governs it.
    pub fn attach_traffic_light(
        &mut self,
        stop_line: StopLineId,
        light: TrafficLightId,
    ) -> TopologyResult<()> {
        if self.net.stop_line_by_id(stop_line).is_none() {
            return Err(TopologyError::StopLineNotFound(stop_line));
        }
        let tl = self
            .net
            .traffic_lights
            .iter_mut()
            .find(|t| t.id == light)
            .ok_or(TopologyError::TrafficLightNotFound(light))?;
        tl.stop_line_id = stop_line;
        let sl = self
            .net
            .stop_lines
            .iter_mut()
            .find(|s| s.id == stop_line)
            .ok_or(TopologyError::StopLineNotFound(stop_line))?;
        sl.traffic_light_id = light;
        Ok(())
    }

    // ── Junctions ─────────────────────────────────────────────────────────

    pub fn add_junction(&mut self) -> TopologyResult<JunctionId> {
        let id = self.net.allocate()?;
        self.net.junctions.push(Junction::new(id));
        Ok(id)
    }

    /// Add the movement `incoming → connecting` to `junction`.
    pub fn add_connection(
        &mut self,
        junction: JunctionId,
        incoming: RoadId,
        connecting: RoadId,
        lane_links: Vec<LaneLink>,
    ) -> TopologyResult<ConnectionId> {
        self.check_road(incoming)?;
        self.check_road(connecting)?;
        for link in &lane_links {
            self.check_lane(link.from)?;
            self.check_lane(link.to)?;
        }
        if self.net.junction_by_id(junction).is_none() {
            return Err(TopologyError::JunctionNotFound(junction));
        }
        let id = self.net.allocate()?;
        let conn = Connection {
            id,
            incoming_road_id: incoming,
            connecting_road_id: connecting,
            lane_links,
        };
        if let Some(j) = self.net.junctions.iter_mut().find(|j| j.id == junction) {
            j.connections.push(conn);
        }
        Ok(id)
    }

    // ── Finish ────────────────────────────────────────────────────────────

    /// Consume the builder and return the network.
    ///
    /// # Errors
    ///
    /// The map configuration is invalid, or `validate_on_build` is set and
    /// the network breaks an invariant (see [`RoadNetwork::validate`]).
    pub fn build(self) -> TopologyResult<RoadNetwork> {
        let net = self.net;
        net.config.validate()?;
        if net.config.validate_on_build {
            net.validate()?;
        }
        info!(
            segments = net.segments.len(),
            lanes = net.lane_count_total(),
            waypoints = net.waypoint_count_total(),
            junctions = net.junctions.len(),
            "built road network"
        );
        Ok(net)
    }
}

impl Default for RoadNetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
