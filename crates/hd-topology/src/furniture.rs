//! Road furniture: lines, crossings, markings, signs, boundaries, curbs,
//! stop lines and traffic lights.
//!
//! Each record points at its owning road (and, where relevant, lane) by id
//! only.  The [`RoadRef`] and [`LaneRef`] traits give the id-rewrite and
//! validation passes uniform access to those fields.

use hd_core::{
    BoundaryId, CrossingId, CurbId, LaneId, LineId, MarkingId, Point3, RoadId, SignId,
    StopLineId, TrafficLightId,
};

use crate::lane::Lane;

// ── Reference traits ──────────────────────────────────────────────────────────

/// An entity that records the road segment it belongs to.
pub trait RoadRef {
    fn road_id(&self) -> RoadId;
    fn road_id_mut(&mut self) -> &mut RoadId;
}

/// An entity that records the single lane it is attached to.
pub trait LaneRef {
    fn lane_id(&self) -> LaneId;
    fn lane_id_mut(&mut self) -> &mut LaneId;
}

macro_rules! impl_road_ref {
    ($($ty:ty),+ $(,)?) => {$(
        impl RoadRef for $ty {
            #[inline]
            fn road_id(&self) -> RoadId { self.road_id }
            #[inline]
            fn road_id_mut(&mut self) -> &mut RoadId { &mut self.road_id }
        }
    )+};
}

macro_rules! impl_lane_ref {
    ($($ty:ty),+ $(,)?) => {$(
        impl LaneRef for $ty {
            #[inline]
            fn lane_id(&self) -> LaneId { self.lane_id }
            #[inline]
            fn lane_id_mut(&mut self) -> &mut LaneId { &mut self.lane_id }
        }
    )+};
}

impl_road_ref!(Lane, Line, Crossing, Marking, Sign, Boundary, Curb, StopLine);
impl_lane_ref!(Line, Marking, Sign, Curb, StopLine);

// ── Category enums ────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LineKind {
    #[default]
    Unknown,
    Solid,
    Dashed,
    DoubleSolid,
    SolidDashed,
    DashedSolid,
    /// Not painted; only bounds a lane logically.
    Virtual,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LineColor {
    #[default]
    White,
    Yellow,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CrossingKind {
    #[default]
    Pedestrian,
    Bicycle,
    Railway,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MarkingKind {
    #[default]
    Unknown,
    ForwardArrow,
    LeftArrow,
    RightArrow,
    ForwardLeftArrow,
    ForwardRightArrow,
    LeftRightArrow,
    AllDirectionsArrow,
    NoUTurn,
    IntersectionBox,
    Text,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SignKind {
    #[default]
    Unknown,
    Stop,
    Yield,
    /// `Sign::value` holds the limit in m/s.
    SpeedLimit,
    NoEntry,
    NoUTurn,
    NoParking,
    Pedestrian,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BoundaryKind {
    #[default]
    Unknown,
    Intersection,
    Crossing,
    Parking,
    Restricted,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrafficLightKind {
    #[default]
    Vehicle,
    Arrow,
    Pedestrian,
}

// ── Records ───────────────────────────────────────────────────────────────────

/// A painted or virtual lane line.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Line {
    pub id:      LineId,
    pub road_id: RoadId,
    pub lane_id: LaneId,
    pub kind:    LineKind,
    pub color:   LineColor,
    pub width:   f64,
    pub points:  Vec<Point3>,
}

/// A crossing area (crosswalk, cycle crossing, level crossing).
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Crossing {
    pub id:      CrossingId,
    pub road_id: RoadId,
    pub kind:    CrossingKind,
    /// Closed outline.
    pub points:  Vec<Point3>,
}

/// A road-surface marking such as a turn arrow.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Marking {
    pub id:      MarkingId,
    pub road_id: RoadId,
    pub lane_id: LaneId,
    pub kind:    MarkingKind,
    pub center:  Point3,
    pub heading: f64,
    pub points:  Vec<Point3>,
}

/// A vertical traffic sign.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sign {
    pub id:      SignId,
    pub road_id: RoadId,
    pub lane_id: LaneId,
    pub kind:    SignKind,
    /// Kind-specific value (speed limit, …).  Zero when unused.
    pub value:   f64,
    pub pos:     Point3,
    pub heading: f64,
}

/// A closed area with special rules (intersection box, parking, …).
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Boundary {
    pub id:      BoundaryId,
    pub road_id: RoadId,
    pub kind:    BoundaryKind,
    pub points:  Vec<Point3>,
}

#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Curb {
    pub id:      CurbId,
    pub road_id: RoadId,
    pub lane_id: LaneId,
    pub height:  f64,
    pub width:   f64,
    pub points:  Vec<Point3>,
}

/// The line a vehicle must stop behind, optionally governed by a traffic
/// light or a stop/yield sign.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StopLine {
    pub id:               StopLineId,
    pub road_id:          RoadId,
    pub lane_id:          LaneId,
    pub traffic_light_id: TrafficLightId,
    pub sign_id:          SignId,
    pub points:           Vec<Point3>,
}

/// A signal head.  Controls one or more lanes; has no owning road.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrafficLight {
    pub id:           TrafficLightId,
    pub lane_ids:     Vec<LaneId>,
    pub stop_line_id: StopLineId,
    pub kind:         TrafficLightKind,
    pub pos:          Point3,
    pub heading:      f64,
}
