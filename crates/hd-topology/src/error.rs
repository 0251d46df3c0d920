//! Topology-store error type.
//!
//! Only construction and validation produce errors.  Lookups report a missing
//! entity as `None`.

use thiserror::Error;

use hd_core::{
    EntityKind, HdError, JunctionId, LaneId, RoadId, StopLineId, TrafficLightId, WaypointId,
};

/// Errors produced by `hd-topology`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TopologyError {
    #[error("duplicate {kind} id {id}")]
    DuplicateId { kind: EntityKind, id: i32 },

    #[error("{from_kind} {from_id} references missing {to_kind} {to_id}")]
    DanglingReference {
        from_kind: EntityKind,
        from_id:   i32,
        to_kind:   EntityKind,
        to_id:     i32,
    },

    #[error("lane {lane} is stored in segment {segment} but claims road {claimed}")]
    LaneRoadMismatch { lane: LaneId, segment: RoadId, claimed: RoadId },

    #[error("waypoint {waypoint} is stored in lane {lane} but claims lane {claimed}")]
    WaypointLaneMismatch { waypoint: WaypointId, lane: LaneId, claimed: LaneId },

    #[error("{kind} allocator would reissue id {id} (next = {next})")]
    AllocatorBehind { kind: EntityKind, id: i32, next: i64 },

    #[error("road {0} not found in network")]
    RoadNotFound(RoadId),

    #[error("lane {0} not found in network")]
    LaneNotFound(LaneId),

    #[error("junction {0} not found in network")]
    JunctionNotFound(JunctionId),

    #[error("stop line {0} not found in network")]
    StopLineNotFound(StopLineId),

    #[error("traffic light {0} not found in network")]
    TrafficLightNotFound(TrafficLightId),

    #[error(transparent)]
    Core(#[from] HdError),
}

pub type TopologyResult<T> = Result<T, TopologyError>;
