//! Id rewriting (renumbering) for road and lane references.
//!
//! A rewrite visits every field that can hold a reference of the target kind
//! and replaces it in place.  The scan performs no allocation and cannot fail
//! part-way, so from the caller's point of view it is all-or-nothing.
//!
//! Two forms are provided per kind:
//!
//! - `replace_*_id_with(old, new)`: one exact-match substitution.
//! - `remap_*_ids(&map)`: many substitutions applied **simultaneously**.
//!   Chaining single replacements is wrong when the new ids overlap the old
//!   ones (`1→2` then `2→3` would move both roads to `3`); a merge that
//!   renumbers one side wholesale must use the map form.
//!
//! Neither form validates that the new ids resolve.

use std::collections::HashMap;

use tracing::debug;

use hd_core::{LaneId, RoadId};

use crate::furniture::{LaneRef, RoadRef};
use crate::network::RoadNetwork;

/// Apply `f` to one reference; count it if it changed.  Unset references are
/// never passed to `f`.
#[inline]
fn visit<I: Copy + PartialEq>(
    slot: &mut I,
    is_set: impl Fn(I) -> bool,
    f: &mut impl FnMut(I) -> Option<I>,
) -> usize {
    if !is_set(*slot) {
        return 0;
    }
    match f(*slot) {
        Some(new) => {
            *slot = new;
            1
        }
        None => 0,
    }
}

fn visit_road(slot: &mut RoadId, f: &mut impl FnMut(RoadId) -> Option<RoadId>) -> usize {
    visit(slot, RoadId::is_set, f)
}

fn visit_lane(slot: &mut LaneId, f: &mut impl FnMut(LaneId) -> Option<LaneId>) -> usize {
    visit(slot, LaneId::is_set, f)
}

fn visit_road_refs<T: RoadRef>(
    items: &mut [T],
    f: &mut impl FnMut(RoadId) -> Option<RoadId>,
) -> usize {
    items.iter_mut().map(|x| visit_road(x.road_id_mut(), f)).sum()
}

fn visit_lane_refs<T: LaneRef>(
    items: &mut [T],
    f: &mut impl FnMut(LaneId) -> Option<LaneId>,
) -> usize {
    items.iter_mut().map(|x| visit_lane(x.lane_id_mut(), f)).sum()
}

impl RoadNetwork {
    // ── Road ids ──────────────────────────────────────────────────────────

    /// Replace every occurrence of `old` as a road reference with `new`.
    ///
    /// Touches the segment's own id, every segment's `to_ids`/`from_ids`,
    /// every lane's `road_id`, the `road_id` of lines, crossings, markings,
    /// signs, boundaries, curbs and stop lines, and both road ids of every
    /// junction connection.  Unset references are left alone; an unset
    /// `old` is a no-op.
    ///
    /// Returns the number of fields rewritten.
    pub fn replace_road_id_with(&mut self, old: RoadId, new: RoadId) -> usize {
        if !old.is_set() || old == new {
            return 0;
        }
        let n = self.rewrite_road_refs(|id| (id == old).then_some(new));
        debug!(old = old.0, new = new.0, fields = n, "replaced road id");
        n
    }

    /// Rewrite every road reference found in `map` to its mapped value, in a
    /// single pass.
    pub fn remap_road_ids(&mut self, map: &HashMap<RoadId, RoadId>) -> usize {
        if map.is_empty() {
            return 0;
        }
        let n = self.rewrite_road_refs(|id| map.get(&id).copied());
        debug!(entries = map.len(), fields = n, "remapped road ids");
        n
    }

    fn rewrite_road_refs(&mut self, mut f: impl FnMut(RoadId) -> Option<RoadId>) -> usize {
        self.invalidate_caches();
        let mut n = 0;

        for seg in &mut self.segments {
            n += visit_road(&mut seg.id, &mut f);
            n += seg.to_ids.iter_mut().map(|x| visit_road(x, &mut f)).sum::<usize>();
            n += seg.from_ids.iter_mut().map(|x| visit_road(x, &mut f)).sum::<usize>();
            n += visit_road_refs(&mut seg.lanes, &mut f);
        }

        n += visit_road_refs(&mut self.lines, &mut f);
        n += visit_road_refs(&mut self.crossings, &mut f);
        n += visit_road_refs(&mut self.markings, &mut f);
        n += visit_road_refs(&mut self.signs, &mut f);
        n += visit_road_refs(&mut self.boundaries, &mut f);
        n += visit_road_refs(&mut self.curbs, &mut f);
        n += visit_road_refs(&mut self.stop_lines, &mut f);

        for conn in self.junctions.iter_mut().flat_map(|j| j.connections.iter_mut()) {
            n += visit_road(&mut conn.incoming_road_id, &mut f);
            n += visit_road(&mut conn.connecting_road_id, &mut f);
        }
        n
    }

    // ── Lane ids ──────────────────────────────────────────────────────────

    /// Replace every occurrence of `old` as a lane reference with `new`.
    ///
    /// Touches the lane's own id, each waypoint's `lane_id`, lane
    /// `from_ids`/`to_ids`/left/right links, the `lane_id` of lines, markings,
    /// signs, curbs and stop lines, traffic-light `lane_ids`, and junction
    /// lane links.  Returns the number of fields rewritten.
    pub fn replace_lane_id_with(&mut self, old: LaneId, new: LaneId) -> usize {
        if !old.is_set() || old == new {
            return 0;
        }
        let n = self.rewrite_lane_refs(|id| (id == old).then_some(new));
        debug!(old = old.0, new = new.0, fields = n, "replaced lane id");
        n
    }

    /// Simultaneous form of [`replace_lane_id_with`](Self::replace_lane_id_with).
    pub fn remap_lane_ids(&mut self, map: &HashMap<LaneId, LaneId>) -> usize {
        if map.is_empty() {
            return 0;
        }
        let n = self.rewrite_lane_refs(|id| map.get(&id).copied());
        debug!(entries = map.len(), fields = n, "remapped lane ids");
        n
    }

    fn rewrite_lane_refs(&mut self, mut f: impl FnMut(LaneId) -> Option<LaneId>) -> usize {
        self.invalidate_caches();
        let mut n = 0;

        for lane in self.segments.iter_mut().flat_map(|s| s.lanes.iter_mut()) {
            n += visit_lane(&mut lane.id, &mut f);
            n += visit_lane(&mut lane.left_lane_id, &mut f);
            n += visit_lane(&mut lane.right_lane_id, &mut f);
            n += lane.from_ids.iter_mut().map(|x| visit_lane(x, &mut f)).sum::<usize>();
            n += lane.to_ids.iter_mut().map(|x| visit_lane(x, &mut f)).sum::<usize>();
            n += lane.points.iter_mut().map(|p| visit_lane(&mut p.lane_id, &mut f)).sum::<usize>();
        }

        n += visit_lane_refs(&mut self.lines, &mut f);
        n += visit_lane_refs(&mut self.markings, &mut f);
        n += visit_lane_refs(&mut self.signs, &mut f);
        n += visit_lane_refs(&mut self.curbs, &mut f);
        n += visit_lane_refs(&mut self.stop_lines, &mut f);

        for tl in &mut self.traffic_lights {
            n += tl.lane_ids.iter_mut().map(|x| visit_lane(x, &mut f)).sum::<usize>();
        }

        for link in self
            .junctions
            .iter_mut()
            .flat_map(|j| j.connections.iter_mut())
            .flat_map(|c| c.lane_links.iter_mut())
        {
            n += visit_lane(&mut link.from, &mut f);
            n += visit_lane(&mut link.to, &mut f);
        }
        n
    }
}
