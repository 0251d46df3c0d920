//! The `RoadNetwork` aggregate: every entity collection, the id allocators
//! and map metadata.
//!
//! # Ownership
//!
//! The network exclusively owns all entity storage in flat, insertion-ordered
//! `Vec`s.  Relationships between entities are ids, never references, so the
//! logically cyclic graph (segment ↔ segment, lane ↔ lane) needs no reference
//! counting and a plain deep copy yields an independent graph.
//!
//! # Transient cache
//!
//! A waypoint R-tree (via `rstar`) backs [`RoadNetwork::closest_waypoint`].
//! It stores positions of entities inside the owning `Vec`s, so it is:
//!
//! - built lazily on first spatial query,
//! - dropped by every `&mut` accessor that can move or edit waypoints,
//! - never copied: a clone starts without it and rebuilds on demand,
//! - never serialized.
//!
//! # Concurrency
//!
//! No internal locking beyond the `OnceLock` that guards the cache build.
//! A built network may be shared (`&RoadNetwork`) across reader threads;
//! writers need exclusive access, which the borrow checker enforces.

use std::fmt;
use std::sync::OnceLock;

use rstar::{PointDistance, RTree, RTreeObject, AABB};
use tracing::debug;

use hd_core::{EntityKind, HdResult, IdAllocators, MapConfig, Point3, TypedId};

use crate::furniture::{Boundary, Crossing, Curb, Line, Marking, Sign, StopLine, TrafficLight};
use crate::junction::Junction;
use crate::lane::{RoadSegment, Waypoint};

// ── R-tree waypoint entry ─────────────────────────────────────────────────────

/// Entry stored in the spatial index: a 2-D `[x, y]` point with the position
/// of its waypoint in `segments[seg].lanes[lane].points[point]`.
#[derive(Clone, Debug)]
struct WaypointEntry {
    point: [f64; 2],
    seg:   u32,
    lane:  u32,
    idx:   u32,
}

impl RTreeObject for WaypointEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for WaypointEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

fn build_waypoint_index(segments: &[RoadSegment]) -> RTree<WaypointEntry> {
    let mut entries = Vec::new();
    for (s, seg) in segments.iter().enumerate() {
        for (l, lane) in seg.lanes.iter().enumerate() {
            for (i, wp) in lane.points.iter().enumerate() {
                entries.push(WaypointEntry {
                    point: [wp.pos.x, wp.pos.y],
                    seg:   s as u32,
                    lane:  l as u32,
                    idx:   i as u32,
                });
            }
        }
    }
    debug!(waypoints = entries.len(), "built waypoint spatial index");
    RTree::bulk_load(entries)
}

// ── RoadNetwork ───────────────────────────────────────────────────────────────

/// The HD-map topology store.
///
/// Construct with [`RoadNetwork::new`] and populate through the
/// [`RoadNetworkBuilder`](crate::RoadNetworkBuilder) or the `set_*`
/// accessors.  Lookups live in [`query`](crate::query), renumbering in
/// [`rewrite`](crate::rewrite).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoadNetwork {
    pub(crate) segments:       Vec<RoadSegment>,
    pub(crate) lines:          Vec<Line>,
    pub(crate) crossings:      Vec<Crossing>,
    pub(crate) markings:       Vec<Marking>,
    pub(crate) signs:          Vec<Sign>,
    pub(crate) boundaries:     Vec<Boundary>,
    pub(crate) curbs:          Vec<Curb>,
    pub(crate) stop_lines:     Vec<StopLine>,
    pub(crate) traffic_lights: Vec<TrafficLight>,
    pub(crate) junctions:      Vec<Junction>,

    pub(crate) allocators: IdAllocators,
    pub(crate) config:     MapConfig,

    #[cfg_attr(feature = "serde", serde(skip))]
    waypoint_idx: OnceLock<RTree<WaypointEntry>>,
}

/// Read, edit and replace accessors for one collection.  Every mutable path
/// drops the transient cache.
macro_rules! collection_accessors {
    ($($field:ident, $field_mut:ident, $set:ident: $ty:ty;)+) => {$(
        #[inline]
        pub fn $field(&self) -> &[$ty] {
            &self.$field
        }

        pub fn $field_mut(&mut self) -> &mut Vec<$ty> {
            self.invalidate_caches();
            &mut self.$field
        }

        /// Replace the whole collection.  Call
        /// [`sync_allocators`](Self::sync_allocators) afterwards if the new
        /// entities carry ids minted elsewhere.
        pub fn $set(&mut self, items: Vec<$ty>) {
            self.invalidate_caches();
            self.$field = items;
        }
    )+};
}

impl RoadNetwork {
    /// An empty network: no entities, every allocator at its first id.
    pub fn new() -> Self {
        Self::with_config(MapConfig::default())
    }

    pub fn with_config(config: MapConfig) -> Self {
        Self {
            segments:       Vec::new(),
            lines:          Vec::new(),
            crossings:      Vec::new(),
            markings:       Vec::new(),
            signs:          Vec::new(),
            boundaries:     Vec::new(),
            curbs:          Vec::new(),
            stop_lines:     Vec::new(),
            traffic_lights: Vec::new(),
            junctions:      Vec::new(),
            allocators:     IdAllocators::new(),
            config,
            waypoint_idx:   OnceLock::new(),
        }
    }

    // ── Collections ───────────────────────────────────────────────────────

    collection_accessors! {
        segments, segments_mut, set_segments: RoadSegment;
        lines, lines_mut, set_lines: Line;
        crossings, crossings_mut, set_crossings: Crossing;
        markings, markings_mut, set_markings: Marking;
        signs, signs_mut, set_signs: Sign;
        boundaries, boundaries_mut, set_boundaries: Boundary;
        curbs, curbs_mut, set_curbs: Curb;
        stop_lines, stop_lines_mut, set_stop_lines: StopLine;
        traffic_lights, traffic_lights_mut, set_traffic_lights: TrafficLight;
        junctions, junctions_mut, set_junctions: Junction;
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty() && self.junctions.is_empty()
    }

    // ── Metadata ──────────────────────────────────────────────────────────

    #[inline]
    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut MapConfig {
        &mut self.config
    }

    // ── Id allocation ─────────────────────────────────────────────────────

    #[inline]
    pub fn allocators(&self) -> &IdAllocators {
        &self.allocators
    }

    /// Mint a fresh id of type `I` from this network's allocators.  Fails
    /// only when that kind's id space is used up.
    #[inline]
    pub fn allocate<I: TypedId>(&mut self) -> HdResult<I> {
        self.allocators.allocate()
    }

    /// Raise every allocator past the largest id currently stored.
    ///
    /// Needed after collections were replaced wholesale with entities whose
    /// ids did not come from this network.
    pub fn sync_allocators(&mut self) {
        let mut allocators = std::mem::take(&mut self.allocators);
        self.for_each_id(|kind, raw| allocators.observe_raw(kind, raw));
        debug!(
            roads = allocators.next(EntityKind::Road),
            lanes = allocators.next(EntityKind::Lane),
            waypoints = allocators.next(EntityKind::Waypoint),
            "synced id allocators"
        );
        self.allocators = allocators;
    }

    /// Visit the own id of every stored entity, tagged with its kind.
    /// Order: collection order, segments before their lanes before their
    /// waypoints.
    pub fn for_each_id(&self, mut f: impl FnMut(EntityKind, i32)) {
        for seg in &self.segments {
            f(EntityKind::Road, seg.id.0);
            for lane in &seg.lanes {
                f(EntityKind::Lane, lane.id.0);
                for wp in &lane.points {
                    f(EntityKind::Waypoint, wp.id.0);
                }
            }
        }
        self.lines.iter().for_each(|x| f(EntityKind::Line, x.id.0));
        self.crossings.iter().for_each(|x| f(EntityKind::Crossing, x.id.0));
        self.markings.iter().for_each(|x| f(EntityKind::Marking, x.id.0));
        self.signs.iter().for_each(|x| f(EntityKind::Sign, x.id.0));
        self.boundaries.iter().for_each(|x| f(EntityKind::Boundary, x.id.0));
        self.curbs.iter().for_each(|x| f(EntityKind::Curb, x.id.0));
        self.stop_lines.iter().for_each(|x| f(EntityKind::StopLine, x.id.0));
        self.traffic_lights.iter().for_each(|x| f(EntityKind::TrafficLight, x.id.0));
        for junc in &self.junctions {
            f(EntityKind::Junction, junc.id.0);
            for conn in &junc.connections {
                f(EntityKind::Connection, conn.id.0);
            }
        }
    }

    // ── Copy ──────────────────────────────────────────────────────────────

    /// Overwrite `self` with a deep copy of `other`.
    ///
    /// Collections, allocator counters and metadata are copied by value;
    /// `self`'s transient cache is dropped and rebuilt on next use.  Reuses
    /// `self`'s allocations where possible.
    pub fn assign(&mut self, other: &RoadNetwork) {
        self.segments.clone_from(&other.segments);
        self.lines.clone_from(&other.lines);
        self.crossings.clone_from(&other.crossings);
        self.markings.clone_from(&other.markings);
        self.signs.clone_from(&other.signs);
        self.boundaries.clone_from(&other.boundaries);
        self.curbs.clone_from(&other.curbs);
        self.stop_lines.clone_from(&other.stop_lines);
        self.traffic_lights.clone_from(&other.traffic_lights);
        self.junctions.clone_from(&other.junctions);
        self.allocators.clone_from(&other.allocators);
        self.config.clone_from(&other.config);
        self.invalidate_caches();
    }

    // ── Transient cache ───────────────────────────────────────────────────

    /// Drop every derived structure.  Called by all mutable accessors.
    #[inline]
    pub(crate) fn invalidate_caches(&mut self) {
        self.waypoint_idx = OnceLock::new();
    }

    /// `true` once a spatial query has built the waypoint index.
    pub fn has_spatial_index(&self) -> bool {
        self.waypoint_idx.get().is_some()
    }

    /// The waypoint nearest to `pos` in the x/y plane.
    ///
    /// Returns `None` only if the network has no waypoints.
    pub fn closest_waypoint(&self, pos: Point3) -> Option<&Waypoint> {
        let idx = self
            .waypoint_idx
            .get_or_init(|| build_waypoint_index(&self.segments));
        idx.nearest_neighbor(&[pos.x, pos.y]).map(|e| {
            &self.segments[e.seg as usize].lanes[e.lane as usize].points[e.idx as usize]
        })
    }

    /// Up to `k` waypoints nearest to `pos`, sorted by ascending distance.
    pub fn k_nearest_waypoints(&self, pos: Point3, k: usize) -> Vec<&Waypoint> {
        let idx = self
            .waypoint_idx
            .get_or_init(|| build_waypoint_index(&self.segments));
        idx.nearest_neighbor_iter(&[pos.x, pos.y])
            .take(k)
            .map(|e| &self.segments[e.seg as usize].lanes[e.lane as usize].points[e.idx as usize])
            .collect()
    }
}

impl Default for RoadNetwork {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for RoadNetwork {
    /// Deep copy with an empty transient cache.
    fn clone(&self) -> Self {
        Self {
            segments:       self.segments.clone(),
            lines:          self.lines.clone(),
            crossings:      self.crossings.clone(),
            markings:       self.markings.clone(),
            signs:          self.signs.clone(),
            boundaries:     self.boundaries.clone(),
            curbs:          self.curbs.clone(),
            stop_lines:     self.stop_lines.clone(),
            traffic_lights: self.traffic_lights.clone(),
            junctions:      self.junctions.clone(),
            allocators:     self.allocators.clone(),
            config:         self.config.clone(),
            waypoint_idx:   OnceLock::new(),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.assign(source);
    }
}

impl PartialEq for RoadNetwork {
    /// Structural equality: every collection, allocator and metadata field.
    /// The transient cache is ignored.
    fn eq(&self, other: &Self) -> bool {
        self.segments == other.segments
            && self.lines == other.lines
            && self.crossings == other.crossings
            && self.markings == other.markings
            && self.signs == other.signs
            && self.boundaries == other.boundaries
            && self.curbs == other.curbs
            && self.stop_lines == other.stop_lines
            && self.traffic_lights == other.traffic_lights
            && self.junctions == other.junctions
            && self.allocators == other.allocators
            && self.config == other.config
    }
}

impl fmt::Debug for RoadNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoadNetwork")
            .field("segments", &self.segments.len())
            .field("lanes", &self.lane_count_total())
            .field("lines", &self.lines.len())
            .field("crossings", &self.crossings.len())
            .field("markings", &self.markings.len())
            .field("signs", &self.signs.len())
            .field("boundaries", &self.boundaries.len())
            .field("curbs", &self.curbs.len())
            .field("stop_lines", &self.stop_lines.len())
            .field("traffic_lights", &self.traffic_lights.len())
            .field("junctions", &self.junctions.len())
            .field("spatial_index", &self.has_spatial_index())
            .finish()
    }
}
