//! Unit tests for hd-topology.
//!
//! All tests use hand-crafted networks so they run without any map file.

#[cfg(test)]
mod helpers {
    use hd_core::{JunctionId, LaneId, Point3, RoadId, StopLineId, TrafficLightId, WaypointId};

    use crate::{
        BoundaryKind, CrossingKind, LaneLink, LineKind, MarkingKind, RoadNetwork,
        RoadNetworkBuilder, SignKind,
    };

    /// Two segments, `S1 → S2`, one lane each.  `L1` has waypoints `w1, w2`.
    pub fn scenario() -> (RoadNetwork, [RoadId; 2], [LaneId; 2], [WaypointId; 2]) {
        let mut b = RoadNetworkBuilder::new();
        let s1 = b.add_segment().unwrap();
        let s2 = b.add_segment().unwrap();
        b.link_roads(s1, s2).unwrap();
        let l1 = b.add_lane(s1).unwrap();
        let l2 = b.add_lane(s2).unwrap();
        let w1 = b.add_waypoint(l1, Point3::xy(0.0, 0.0), 0.0).unwrap();
        let w2 = b.add_waypoint(l1, Point3::xy(10.0, 0.0), 0.0).unwrap();
        b.add_waypoint(l2, Point3::xy(20.0, 0.0), 0.0).unwrap();
        (b.build().unwrap(), [s1, s2], [l1, l2], [w1, w2])
    }

    pub struct Rich {
        pub net: RoadNetwork,
        pub r:   [RoadId; 3],
        pub l:   [LaneId; 4],
        pub sl:  StopLineId,
        pub tl:  TrafficLightId,
        pub j:   JunctionId,
    }

    /// A fork with furniture on every collection.
    ///
    /// ```text
    ///   r1 (l1, l2) ──┬──▶ r2 (l3)     l1 → l3
    ///                 └──▶ r3 (l4)     l2 → l4
    /// ```
    ///
    /// Junction `j` holds connections `r1 → r2` and `r1 → r3`.
    pub fn rich() -> Rich {
        let mut b = RoadNetworkBuilder::new();
        let r1 = b.add_segment().unwrap();
        let r2 = b.add_segment().unwrap();
        let r3 = b.add_segment().unwrap();
        b.link_roads(r1, r2).unwrap();
        b.link_roads(r1, r3).unwrap();

        let l1 = b.add_lane(r1).unwrap();
        let l2 = b.add_lane(r1).unwrap();
        let l3 = b.add_lane(r2).unwrap();
        let l4 = b.add_lane(r3).unwrap();
        b.set_neighbors(l1, l2).unwrap();

        for (lane, pts) in [
            (l1, [(0.0, 0.0), (10.0, 0.0)]),
            (l2, [(0.0, 3.5), (10.0, 3.5)]),
            (l3, [(20.0, 0.0), (30.0, 0.0)]),
            (l4, [(20.0, 10.0), (20.0, 20.0)]),
        ] {
            for (x, y) in pts {
                b.add_waypoint(lane, Point3::xy(x, y), 0.0).unwrap();
            }
        }
        b.link_lanes(l1, l3).unwrap();
        b.link_lanes(l2, l4).unwrap();

        let line_pts = vec![Point3::xy(0.0, 1.75), Point3::xy(10.0, 1.75)];
        b.add_line(r1, l1, LineKind::Dashed, line_pts).unwrap();
        b.add_crossing(r2, CrossingKind::Pedestrian, vec![Point3::xy(22.0, -2.0)]).unwrap();
        b.add_marking(r1, l1, MarkingKind::ForwardArrow, Point3::xy(5.0, 0.0), 0.0).unwrap();
        b.add_sign(r1, l1, SignKind::SpeedLimit, 13.9, Point3::xy(2.0, -2.0)).unwrap();
        b.add_boundary(r2, BoundaryKind::Intersection, vec![Point3::xy(12.0, -5.0)]).unwrap();
        b.add_curb(r1, l2, vec![Point3::xy(0.0, 5.5), Point3::xy(10.0, 5.5)]).unwrap();
        let sl = b.add_stop_line(r1, l1, vec![Point3::xy(10.0, -1.75)]).unwrap();
        let tl = b.add_traffic_light(&[l1, l2], Point3::new(11.0, -3.0, 5.0)).unwrap();
        b.attach_traffic_light(sl, tl).unwrap();

        let j = b.add_junction().unwrap();
        b.add_connection(j, r1, r2, vec![LaneLink { from: l1, to: l3 }]).unwrap();
        b.add_connection(j, r1, r3, vec![LaneLink { from: l2, to: l4 }]).unwrap();

        Rich { net: b.build().unwrap(), r: [r1, r2, r3], l: [l1, l2, l3, l4], sl, tl, j }
    }

    /// Every road-reference field in a fixed traversal order.
    pub fn road_refs(net: &RoadNetwork) -> Vec<RoadId> {
        let mut v = Vec::new();
        for s in net.segments() {
            v.push(s.id);
            v.extend(&s.to_ids);
            v.extend(&s.from_ids);
            v.extend(s.lanes.iter().map(|l| l.road_id));
        }
        v.extend(net.lines().iter().map(|x| x.road_id));
        v.extend(net.crossings().iter().map(|x| x.road_id));
        v.extend(net.markings().iter().map(|x| x.road_id));
        v.extend(net.signs().iter().map(|x| x.road_id));
        v.extend(net.boundaries().iter().map(|x| x.road_id));
        v.extend(net.curbs().iter().map(|x| x.road_id));
        v.extend(net.stop_lines().iter().map(|x| x.road_id));
        for c in net.junctions().iter().flat_map(|j| &j.connections) {
            v.push(c.incoming_road_id);
            v.push(c.connecting_road_id);
        }
        v
    }

    /// Every lane-reference field in a fixed traversal order.
    pub fn lane_refs(net: &RoadNetwork) -> Vec<LaneId> {
        let mut v = Vec::new();
        for l in net.lanes() {
            v.push(l.id);
            v.push(l.left_lane_id);
            v.push(l.right_lane_id);
            v.extend(&l.from_ids);
            v.extend(&l.to_ids);
            v.extend(l.points.iter().map(|p| p.lane_id));
        }
        v.extend(net.lines().iter().map(|x| x.lane_id));
        v.extend(net.markings().iter().map(|x| x.lane_id));
        v.extend(net.signs().iter().map(|x| x.lane_id));
        v.extend(net.curbs().iter().map(|x| x.lane_id));
        v.extend(net.stop_lines().iter().map(|x| x.lane_id));
        for t in net.traffic_lights() {
            v.extend(&t.lane_ids);
        }
        for link in net
            .junctions()
            .iter()
            .flat_map(|j| &j.connections)
            .flat_map(|c| &c.lane_links)
        {
            v.push(link.from);
            v.push(link.to);
        }
        v
    }
}

// ── Construction & builder ─────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use hd_core::{
        EntityKind, GeoPoint, HdError, JunctionId, LaneId, MapConfig, Point3, RoadId, FIRST_ID,
    };

    use crate::{RoadNetwork, RoadNetworkBuilder, RoadSegment, TopologyError};

    #[test]
    fn empty_network() {
        let net = RoadNetwork::new();
        assert!(net.is_empty());
        assert_eq!(net.lane_count_total(), 0);
        for kind in EntityKind::ALL {
            assert_eq!(net.allocators().next(kind), i64::from(FIRST_ID));
        }
        let built = RoadNetworkBuilder::new().build().unwrap();
        assert_eq!(built, net);
    }

    #[test]
    fn ids_are_sequential_per_kind() {
        let mut b = RoadNetworkBuilder::new();
        let r1 = b.add_segment().unwrap();
        let r2 = b.add_segment().unwrap();
        let l1 = b.add_lane(r2).unwrap();
        assert_eq!((r1, r2), (RoadId(1), RoadId(2)));
        assert_eq!(l1, LaneId(1));
        assert_eq!(b.network().allocators().next(EntityKind::Road), 3);
    }

    #[test]
    fn link_roads_fills_both_ends() {
        let (net, [s1, s2], _, _) = super::helpers::scenario();
        assert_eq!(net.segment_by_id(s1).unwrap().to_ids, vec![s2]);
        assert_eq!(net.segment_by_id(s2).unwrap().from_ids, vec![s1]);
        assert!(net.segment_by_id(s2).unwrap().to_ids.is_empty());
    }

    #[test]
    fn lanes_numbered_in_order() {
        let rich = super::helpers::rich();
        let [l1, l2, ..] = rich.l;
        assert_eq!(rich.net.lane_by_id(l1).unwrap().num, 0);
        assert_eq!(rich.net.lane_by_id(l2).unwrap().num, 1);
    }

    #[test]
    fn waypoints_are_chained() {
        let (net, _, [l1, _], [w1, w2]) = super::helpers::scenario();
        let lane = net.lane_by_id(l1).unwrap();
        assert_eq!(lane.points[0].to_ids, vec![w2]);
        assert_eq!(lane.points[1].from_ids, vec![w1]);
        assert!(lane.points.iter().all(|p| p.lane_id == l1));
    }

    #[test]
    fn relinking_lanes_adds_no_duplicates() {
        let mut b = RoadNetworkBuilder::new();
        let r = b.add_segment().unwrap();
        let l1 = b.add_lane(r).unwrap();
        let l2 = b.add_lane(r).unwrap();
        let end = b.add_waypoint(l1, Point3::xy(0.0, 0.0), 0.0).unwrap();
        let start = b.add_waypoint(l2, Point3::xy(5.0, 0.0), 0.0).unwrap();
        b.link_lanes(l1, l2).unwrap();
        b.link_lanes(l1, l2).unwrap();

        let net = b.build().unwrap();
        assert_eq!(net.lane_by_id(l1).unwrap().to_ids, vec![l2]);
        assert_eq!(net.lane_by_id(l2).unwrap().from_ids, vec![l1]);
        assert_eq!(net.waypoint_by_id(end).unwrap().to_ids, vec![start]);
        assert_eq!(net.waypoint_by_id(start).unwrap().from_ids, vec![end]);
    }

    #[test]
    fn link_lanes_joins_end_to_start() {
        let rich = super::helpers::rich();
        let [l1, _, l3, _] = rich.l;
        let from = rich.net.lane_by_id(l1).unwrap();
        let to = rich.net.lane_by_id(l3).unwrap();
        assert_eq!(from.to_ids, vec![l3]);
        assert_eq!(to.from_ids, vec![l1]);
        assert!(from.points.last().unwrap().to_ids.contains(&to.points[0].id));
        assert!(to.points[0].from_ids.contains(&from.points[1].id));
    }

    #[test]
    fn stop_line_and_light_are_cross_listed() {
        let rich = super::helpers::rich();
        let [l1, l2, ..] = rich.l;
        let lane = rich.net.lane_by_id(l1).unwrap();
        assert_eq!(lane.stop_line_ids, vec![rich.sl]);
        assert!(rich.net.lane_by_id(l2).unwrap().traffic_light_ids.contains(&rich.tl));
        assert_eq!(rich.net.stop_line_by_id(rich.sl).unwrap().traffic_light_id, rich.tl);
        assert_eq!(rich.net.traffic_light_by_id(rich.tl).unwrap().stop_line_id, rich.sl);
        assert_eq!(rich.net.stop_lines_of_lane(l1).len(), 1);
    }

    #[test]
    fn unknown_references_rejected() {
        let mut b = RoadNetworkBuilder::new();
        assert_eq!(b.add_lane(RoadId(9)), Err(TopologyError::RoadNotFound(RoadId(9))));
        assert_eq!(
            b.add_waypoint(LaneId(3), Point3::default(), 0.0),
            Err(TopologyError::LaneNotFound(LaneId(3)))
        );
        let r = b.add_segment().unwrap();
        assert!(b.link_roads(r, RoadId(42)).is_err());
        // A failed link must not leave a half-written edge behind.
        assert!(b.network().segment_by_id(r).unwrap().to_ids.is_empty());
        assert_eq!(
            b.add_connection(JunctionId(1), r, r, vec![]),
            Err(TopologyError::JunctionNotFound(JunctionId(1)))
        );
    }

    #[test]
    fn furniture_may_have_unset_road() {
        let mut b = RoadNetworkBuilder::new();
        let sl = b.add_stop_line(RoadId::UNSET, LaneId::UNSET, vec![]).unwrap();
        let net = b.build().unwrap();
        assert!(!net.stop_line_by_id(sl).unwrap().road_id.is_set());
    }

    #[test]
    fn invalid_config_rejected() {
        let cfg = MapConfig { origin: GeoPoint::new(100.0, 0.0, 0.0), ..MapConfig::default() };
        let result = RoadNetworkBuilder::with_config(cfg).build();
        assert!(matches!(result, Err(TopologyError::Core(HdError::Config(_)))));
    }

    #[test]
    fn build_validates_when_asked() {
        let mut net = super::helpers::rich().net;
        net.segments_mut()[0].to_ids.push(RoadId(77));
        net.config_mut().validate_on_build = true;
        let result = RoadNetworkBuilder::from_network(net).build();
        assert!(matches!(result, Err(TopologyError::DanglingReference { .. })));
    }

    #[test]
    fn max_id_syncs_then_exhausts() {
        let mut net = RoadNetwork::new();
        net.set_segments(vec![RoadSegment::new(RoadId(i32::MAX))]);
        net.sync_allocators();
        assert_eq!(net.allocators().next(EntityKind::Road), i64::from(i32::MAX) + 1);
        assert!(net.validate().is_ok());

        let mut b = RoadNetworkBuilder::from_network(net);
        assert_eq!(
            b.add_segment(),
            Err(TopologyError::Core(HdError::IdsExhausted { kind: EntityKind::Road }))
        );
        // Other kinds still allocate.
        assert_eq!(b.add_junction(), Ok(JunctionId(FIRST_ID)));
    }

    #[test]
    fn from_network_continues_allocation() {
        let (net, [_, s2], _, _) = super::helpers::scenario();
        let mut b = RoadNetworkBuilder::from_network(net);
        let s3 = b.add_segment().unwrap();
        assert!(s3 > s2);
    }
}

// ── Lookup queries ────────────────────────────────────────────────────────────

#[cfg(test)]
mod query {
    use hd_core::{LaneId, Point3, RoadId, WaypointId};

    #[test]
    fn lane_count_total() {
        let rich = super::helpers::rich();
        assert_eq!(rich.net.lane_count_total(), 4);
        assert_eq!(rich.net.waypoint_count_total(), 8);
    }

    #[test]
    fn lane_by_waypoint_id() {
        let (net, _, [l1, _], [w1, w2]) = super::helpers::scenario();
        assert_eq!(net.lane_by_waypoint_id(w1).unwrap().id, l1);
        assert_eq!(net.lane_by_waypoint_id(w2).unwrap().id, l1);
        assert!(net.lane_by_waypoint_id(WaypointId(999)).is_none());
        assert_eq!(net.waypoint_by_id(w2).unwrap().pos, Point3::xy(10.0, 0.0));
    }

    #[test]
    fn unset_ids_short_circuit() {
        let (net, _, _, _) = super::helpers::scenario();
        assert!(net.lane_by_id(LaneId::UNSET).is_none());
        assert!(net.lane_by_id(LaneId(-1)).is_none());
        assert!(net.segment_by_id(RoadId::UNSET).is_none());
        assert!(net.segment_by_lane_id(LaneId(0)).is_none());
    }

    #[test]
    fn missing_ids_are_none() {
        let (net, _, _, _) = super::helpers::scenario();
        assert!(net.lane_by_id(LaneId(50)).is_none());
        assert!(net.segment_by_id(RoadId(50)).is_none());
        assert!(net.segment_by_lane_id(LaneId(50)).is_none());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "duplicate lane id")]
    fn segment_by_lane_id_asserts_unique_lane() {
        let (mut net, _, [l1, _], _) = super::helpers::scenario();
        let mut segs = net.segments().to_vec();
        let mut copy = segs[0].clone();
        copy.id = RoadId(30);
        segs.push(copy);
        net.set_segments(segs);
        net.segment_by_lane_id(l1);
    }

    #[test]
    fn segment_by_lane_id_matches_road_id() {
        let rich = super::helpers::rich();
        for lane in rich.net.lanes() {
            let seg = rich.net.segment_by_lane_id(lane.id).unwrap();
            assert_eq!(seg.id, lane.road_id);
            assert!(seg.lane(lane.id).is_some());
        }
    }

    #[test]
    fn find_junction() {
        let rich = super::helpers::rich();
        let [r1, r2, r3] = rich.r;
        assert_eq!(rich.net.find_junction(r2, r1).unwrap().id, rich.j);
        assert_eq!(rich.net.find_junction(r3, r1).unwrap().id, rich.j);
        // Direction matters: there is no r2 → r1 movement.
        assert!(rich.net.find_junction(r1, r2).is_none());
        assert!(rich.net.find_junction(r3, r2).is_none());

        let (junc, conn) = rich.net.find_connection(r2, r1).unwrap();
        assert_eq!(junc.id, rich.j);
        assert_eq!(conn.lane_links[0].from, rich.l[0]);
        assert!(junc.touches_road(r3));
    }

    #[test]
    fn segment_traversal() {
        let rich = super::helpers::rich();
        let [r1, r2, r3] = rich.r;
        let succ: Vec<RoadId> = rich.net.successors(r1).iter().map(|s| s.id).collect();
        assert_eq!(succ, vec![r2, r3]);
        let pred: Vec<RoadId> = rich.net.predecessors(r3).iter().map(|s| s.id).collect();
        assert_eq!(pred, vec![r1]);
        assert!(rich.net.successors(r2).is_empty());
        assert!(rich.net.successors(RoadId(404)).is_empty());
    }

    #[test]
    fn lane_traversal() {
        let rich = super::helpers::rich();
        let [l1, l2, l3, l4] = rich.l;
        assert_eq!(rich.net.right_lane(l1).unwrap().id, l2);
        assert_eq!(rich.net.left_lane(l2).unwrap().id, l1);
        assert!(rich.net.left_lane(l1).is_none());
        assert_eq!(rich.net.next_lanes(l2)[0].id, l4);
        assert_eq!(rich.net.prev_lanes(l3)[0].id, l1);
    }

    #[test]
    fn signs_on_road() {
        let rich = super::helpers::rich();
        let [r1, r2, _] = rich.r;
        assert_eq!(rich.net.signs_on_road(r1).count(), 1);
        assert_eq!(rich.net.signs_on_road(r2).count(), 0);
        assert_eq!(rich.net.signs_on_road(RoadId::UNSET).count(), 0);
    }

    #[test]
    fn closest_waypoint_and_lane() {
        let rich = super::helpers::rich();
        let [l1, _, _, l4] = rich.l;
        assert!(!rich.net.has_spatial_index());
        let wp = rich.net.closest_waypoint(Point3::xy(9.0, 0.5)).unwrap();
        assert_eq!(wp.pos, Point3::xy(10.0, 0.0));
        assert!(rich.net.has_spatial_index());
        assert_eq!(rich.net.closest_lane(Point3::xy(21.0, 19.0)).unwrap().id, l4);
        assert_eq!(rich.net.closest_lane(Point3::xy(-1.0, 0.0)).unwrap().id, l1);

        let near = rich.net.k_nearest_waypoints(Point3::xy(0.0, 0.0), 2);
        assert_eq!(near[0].pos, Point3::xy(0.0, 0.0));
        assert_eq!(near[1].pos, Point3::xy(0.0, 3.5));
    }

    #[test]
    fn closest_waypoint_on_empty_network() {
        let net = crate::RoadNetwork::new();
        assert!(net.closest_waypoint(Point3::default()).is_none());
    }
}

// ── Id rewrite ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod rewrite {
    use std::collections::HashMap;

    use hd_core::{EntityKind, LaneId, RoadId};

    use super::helpers::{lane_refs, road_refs};
    use crate::TopologyError;

    #[test]
    fn renumbering_scenario() {
        let (mut net, [s1, s2], [l1, _], [w1, _]) = super::helpers::scenario();
        assert_eq!((s1, s2), (RoadId(1), RoadId(2)));

        net.replace_road_id_with(RoadId(1), RoadId(10));

        assert_eq!(net.segments()[0].id, RoadId(10));
        assert_eq!(net.lane_by_id(l1).unwrap().road_id, RoadId(10));
        let seg2 = net.segment_by_id(s2).unwrap();
        assert!(seg2.to_ids.is_empty());
        assert!(!seg2.to_ids.contains(&RoadId(1)));
        assert_eq!(net.lane_by_waypoint_id(w1).unwrap().id, l1);
        assert!(net.segment_by_id(RoadId(1)).is_none());
    }

    #[test]
    fn road_rewrite_is_complete() {
        let mut net = super::helpers::rich().net;
        let old = net.segments()[0].id;
        let new: RoadId = net.allocate().unwrap();

        let before = road_refs(&net);
        let expected = before.iter().filter(|&&x| x == old).count();
        let n = net.replace_road_id_with(old, new);
        let after = road_refs(&net);

        assert_eq!(n, expected);
        assert!(after.iter().all(|&x| x != old));
        for (b, a) in before.iter().zip(&after) {
            if *b == old {
                assert_eq!(*a, new);
            } else {
                assert_eq!(a, b);
            }
        }
        assert!(net.validate().is_ok());
    }

    #[test]
    fn rewrite_reaches_every_collection() {
        let mut net = super::helpers::rich().net;
        let [r1, r2, _] = [net.segments()[0].id, net.segments()[1].id, net.segments()[2].id];
        net.replace_road_id_with(r1, RoadId(100));
        net.replace_road_id_with(r2, RoadId(200));

        assert!(net.lines().iter().all(|x| x.road_id == RoadId(100)));
        assert!(net.markings().iter().all(|x| x.road_id == RoadId(100)));
        assert!(net.signs().iter().all(|x| x.road_id == RoadId(100)));
        assert!(net.curbs().iter().all(|x| x.road_id == RoadId(100)));
        assert!(net.stop_lines().iter().all(|x| x.road_id == RoadId(100)));
        assert!(net.crossings().iter().all(|x| x.road_id == RoadId(200)));
        assert!(net.boundaries().iter().all(|x| x.road_id == RoadId(200)));
        assert!(net.find_junction(RoadId(200), RoadId(100)).is_some());
        assert!(net.find_junction(r2, r1).is_none());
    }

    #[test]
    fn unset_references_stay_unset() {
        let mut b = crate::RoadNetworkBuilder::new();
        let r = b.add_segment().unwrap();
        b.add_stop_line(RoadId::UNSET, LaneId::UNSET, vec![]).unwrap();
        let mut net = b.build().unwrap();

        assert_eq!(net.replace_road_id_with(RoadId::UNSET, r), 0);
        assert_eq!(net.replace_road_id_with(RoadId(-1), r), 0);
        net.replace_road_id_with(r, RoadId(5));
        assert_eq!(net.stop_lines()[0].road_id, RoadId::UNSET);
    }

    #[test]
    fn same_id_is_noop() {
        let (mut net, [s1, _], _, _) = super::helpers::scenario();
        let copy = net.clone();
        assert_eq!(net.replace_road_id_with(s1, s1), 0);
        assert_eq!(net, copy);
    }

    #[test]
    fn remap_swaps_simultaneously() {
        let mut net = super::helpers::rich().net;
        let [r1, r2, r3] = [net.segments()[0].id, net.segments()[1].id, net.segments()[2].id];

        let map = HashMap::from([(r2, r3), (r3, r2)]);
        net.remap_road_ids(&map);

        assert_eq!(net.segments()[1].id, r3);
        assert_eq!(net.segments()[2].id, r2);
        assert_eq!(net.segment_by_id(r1).unwrap().to_ids, vec![r3, r2]);
        assert!(net.validate().is_ok());
    }

    #[test]
    fn chained_replace_collides_where_remap_does_not() {
        let mut net = super::helpers::rich().net;
        let [_, r2, r3] = [net.segments()[0].id, net.segments()[1].id, net.segments()[2].id];

        net.replace_road_id_with(r2, r3);
        net.replace_road_id_with(r3, r2);

        let dup = TopologyError::DuplicateId { kind: EntityKind::Road, id: r2.0 };
        assert!(net.violations().contains(&dup));
    }

    #[test]
    fn lane_rewrite_is_complete() {
        let rich = super::helpers::rich();
        let mut net = rich.net;
        let [l1, l2, l3, _] = rich.l;
        let new: LaneId = net.allocate().unwrap();

        let before = lane_refs(&net);
        let expected = before.iter().filter(|&&x| x == l1).count();
        assert_eq!(net.replace_lane_id_with(l1, new), expected);
        assert!(lane_refs(&net).iter().all(|&x| x != l1));

        assert_eq!(net.left_lane(l2).unwrap().id, new);
        assert_eq!(net.prev_lanes(l3)[0].id, new);
        assert!(net.traffic_light_by_id(rich.tl).unwrap().lane_ids.contains(&new));
        assert_eq!(net.stop_line_by_id(rich.sl).unwrap().lane_id, new);
        assert_eq!(net.find_connection(rich.r[1], rich.r[0]).unwrap().1.lane_links[0].from, new);
        assert!(net.validate().is_ok());
    }

    #[test]
    fn remap_lanes() {
        let rich = super::helpers::rich();
        let mut net = rich.net;
        let [l1, l2, ..] = rich.l;
        let map = HashMap::from([(l1, l2), (l2, l1)]);
        net.remap_lane_ids(&map);
        assert_eq!(net.segments()[0].lanes[0].id, l2);
        assert_eq!(net.right_lane(l2).unwrap().id, l1);
        assert!(net.validate().is_ok());
        assert_eq!(net.remap_lane_ids(&HashMap::new()), 0);
    }
}

// ── Copy semantics ────────────────────────────────────────────────────────────

#[cfg(test)]
mod copy {
    use hd_core::{EntityKind, Point3, RoadId};

    use crate::RoadNetwork;

    #[test]
    fn clone_is_structurally_identical() {
        let rich = super::helpers::rich();
        let copy = rich.net.clone();
        assert_eq!(copy, rich.net);
        assert!(copy.validate().is_ok());
        for lane in copy.lanes() {
            assert_eq!(copy.segment_by_lane_id(lane.id).unwrap().id, lane.road_id);
        }
    }

    #[test]
    fn mutating_copy_leaves_source() {
        let rich = super::helpers::rich();
        let [r1, r2, r3] = rich.r;
        let [l1, ..] = rich.l;
        let mut copy = rich.net.clone();

        copy.lane_by_id_mut(l1).unwrap().road_id = r3;
        copy.replace_road_id_with(r2, RoadId(99));

        assert_eq!(rich.net.lane_by_id(l1).unwrap().road_id, r1);
        assert!(rich.net.segment_by_id(r2).is_some());
        assert!(rich.net.segment_by_id(RoadId(99)).is_none());
        assert_ne!(copy, rich.net);
    }

    #[test]
    fn mutating_source_leaves_copy() {
        let rich = super::helpers::rich();
        let mut src = rich.net;
        let copy = src.clone();
        src.segments_mut().clear();
        assert_eq!(copy.lane_count_total(), 4);
    }

    #[test]
    fn copy_drops_spatial_index() {
        let rich = super::helpers::rich();
        let p = Point3::xy(25.0, 1.0);
        let hit = rich.net.closest_waypoint(p).map(|w| w.id);
        assert!(rich.net.has_spatial_index());

        let copy = rich.net.clone();
        assert!(!copy.has_spatial_index());
        assert_eq!(copy.closest_waypoint(p).map(|w| w.id), hit);
        assert!(copy.has_spatial_index());
    }

    #[test]
    fn mutation_drops_spatial_index() {
        let rich = super::helpers::rich();
        let mut net = rich.net;
        let l4 = rich.l[3];
        net.closest_waypoint(Point3::default());
        assert!(net.has_spatial_index());

        let lane = net.lane_by_id_mut(l4).unwrap();
        lane.points[0].pos = Point3::xy(100.0, 100.0);
        assert!(!net.has_spatial_index());
        assert_eq!(net.closest_lane(Point3::xy(99.0, 99.0)).unwrap().id, l4);
    }

    #[test]
    fn assign_and_clone_from() {
        let rich = super::helpers::rich();
        let mut dst = RoadNetwork::new();
        dst.closest_waypoint(Point3::default());
        dst.assign(&rich.net);
        assert_eq!(dst, rich.net);
        assert!(!dst.has_spatial_index());

        let (mut other, _, _, _) = super::helpers::scenario();
        other.clone_from(&rich.net);
        assert_eq!(other, rich.net);
    }

    #[test]
    fn allocators_copied_by_value() {
        let rich = super::helpers::rich();
        let mut copy = rich.net.clone();
        let next = rich.net.allocators().next(EntityKind::Road);
        assert_eq!(copy.allocators().next(EntityKind::Road), next);
        let fresh: RoadId = copy.allocate().unwrap();
        assert_eq!(i64::from(fresh.0), next);
        assert_eq!(rich.net.allocators().next(EntityKind::Road), next);
    }
}

// ── Validation ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod validate {
    use hd_core::{EntityKind, RoadId, WaypointId};

    use crate::{RoadNetwork, RoadSegment, TopologyError};

    #[test]
    fn built_network_is_consistent() {
        let rich = super::helpers::rich();
        assert!(rich.net.violations().is_empty());
        assert!(rich.net.validate().is_ok());
    }

    #[test]
    fn duplicate_ids_detected() {
        let mut net = super::helpers::rich().net;
        let mut segs = net.segments().to_vec();
        let first = segs[0].clone();
        let (road, lane, wp) = (first.id, first.lanes[0].id, first.lanes[0].points[0].id);
        segs.push(first);
        net.set_segments(segs);

        let v = net.violations();
        assert!(v.contains(&TopologyError::DuplicateId { kind: EntityKind::Road, id: road.0 }));
        assert!(v.contains(&TopologyError::DuplicateId { kind: EntityKind::Lane, id: lane.0 }));
        assert!(v.contains(&TopologyError::DuplicateId { kind: EntityKind::Waypoint, id: wp.0 }));
    }

    #[test]
    fn dangling_reference_detected() {
        let mut net = super::helpers::rich().net;
        let r1 = net.segments()[0].id;
        net.segments_mut()[0].to_ids.push(RoadId(77));
        assert_eq!(
            net.validate(),
            Err(TopologyError::DanglingReference {
                from_kind: EntityKind::Road,
                from_id:   r1.0,
                to_kind:   EntityKind::Road,
                to_id:     77,
            })
        );
    }

    #[test]
    fn dangling_waypoint_link_detected() {
        let rich = super::helpers::rich();
        let l1 = rich.l[0];
        let mut net = rich.net;
        let lane = net.lane_by_id_mut(l1).unwrap();
        let wp = lane.points[0].id;
        lane.points[0].left_point_id = WaypointId(900);
        lane.points[1].to_ids.push(WaypointId(901));

        let v = net.violations();
        assert!(v.contains(&TopologyError::DanglingReference {
            from_kind: EntityKind::Waypoint,
            from_id:   wp.0,
            to_kind:   EntityKind::Waypoint,
            to_id:     900,
        }));
        assert!(v.iter().any(|e| matches!(
            e,
            TopologyError::DanglingReference { to_kind: EntityKind::Waypoint, to_id: 901, .. }
        )));
    }

    #[test]
    fn duplicate_junction_and_connection_ids_detected() {
        let mut net = super::helpers::rich().net;
        let mut junctions = net.junctions().to_vec();
        let dup = junctions[0].clone();
        let (j, c) = (dup.id, dup.connections[0].id);
        junctions.push(dup);
        net.set_junctions(junctions);

        let v = net.violations();
        assert!(v.contains(&TopologyError::DuplicateId { kind: EntityKind::Junction, id: j.0 }));
        assert!(v.contains(&TopologyError::DuplicateId { kind: EntityKind::Connection, id: c.0 }));
    }

    #[test]
    fn lane_road_mismatch_detected() {
        let rich = super::helpers::rich();
        let [r1, r2, _] = rich.r;
        let l1 = rich.l[0];
        let mut net = rich.net;
        net.lane_by_id_mut(l1).unwrap().road_id = r2;
        assert!(net.violations().contains(&TopologyError::LaneRoadMismatch {
            lane:    l1,
            segment: r1,
            claimed: r2,
        }));
    }

    #[test]
    fn allocator_behind_fixed_by_sync() {
        let mut net = RoadNetwork::new();
        net.set_segments(vec![RoadSegment::new(RoadId(5))]);
        assert!(matches!(
            net.validate(),
            Err(TopologyError::AllocatorBehind { kind: EntityKind::Road, id: 5, next: 1 })
        ));
        net.sync_allocators();
        assert!(net.validate().is_ok());
        let id: RoadId = net.allocate().unwrap();
        assert_eq!(id, RoadId(6));
    }
}

// ── Randomised invariants ─────────────────────────────────────────────────────

#[cfg(test)]
mod invariants {
    use std::collections::HashSet;

    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use hd_core::{LaneId, Point3, RoadId};

    use super::helpers::road_refs;
    use crate::RoadNetworkBuilder;

    /// Random interleavings of allocate / extend / copy / renumber never
    /// break id uniqueness or leave a dangling reference.
    #[test]
    fn random_edit_sequences_stay_consistent() {
        let mut rng = SmallRng::seed_from_u64(0x5eed);
        let mut net = super::helpers::rich().net;

        for step in 0..200 {
            match rng.gen_range(0..4) {
                0 => {
                    let ids: Vec<RoadId> = net.segments().iter().map(|s| s.id).collect();
                    let old = ids[rng.gen_range(0..ids.len())];
                    let new: RoadId = net.allocate().unwrap();
                    net.replace_road_id_with(old, new);
                    assert!(road_refs(&net).iter().all(|&x| x != old), "step {step}");
                }
                1 => {
                    let ids: Vec<RoadId> = net.segments().iter().map(|s| s.id).collect();
                    let prev = ids[rng.gen_range(0..ids.len())];
                    let mut b = RoadNetworkBuilder::from_network(net);
                    let r = b.add_segment().unwrap();
                    b.link_roads(prev, r).unwrap();
                    let l = b.add_lane(r).unwrap();
                    let x = rng.gen_range(0.0..500.0);
                    b.add_waypoint(l, Point3::xy(x, x), 0.0).unwrap();
                    net = b.build().unwrap();
                }
                2 => {
                    let copy = net.clone();
                    assert_eq!(copy, net);
                    net = copy;
                }
                _ => {
                    let ids: Vec<LaneId> = net.lanes().map(|l| l.id).collect();
                    let old = ids[rng.gen_range(0..ids.len())];
                    let new: LaneId = net.allocate().unwrap();
                    net.replace_lane_id_with(old, new);
                    assert!(net.lane_by_id(old).is_none(), "step {step}");
                }
            }

            assert!(net.violations().is_empty(), "step {step}: {:?}", net.violations());
            let roads: HashSet<RoadId> = net.segments().iter().map(|s| s.id).collect();
            assert_eq!(roads.len(), net.segments().len());
        }
    }
}
