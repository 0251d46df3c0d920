//! Strongly typed identifier wrappers, one per map entity kind.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  The inner value is a signed integer
//! because map files routinely carry `0` or `-1` for "no reference"; every
//! value `<= 0` is treated as unset.  Allocated IDs start at `1`.

use std::fmt;

/// The kind of map entity an identifier belongs to.
///
/// Each kind has its own id space and its own allocator counter.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntityKind {
    Waypoint,
    Lane,
    Road,
    Line,
    StopLine,
    TrafficLight,
    Sign,
    Boundary,
    Marking,
    Curb,
    Crossing,
    Junction,
    Connection,
}

impl EntityKind {
    /// Every kind, in allocator-slot order.
    pub const ALL: [EntityKind; 13] = [
        EntityKind::Waypoint,
        EntityKind::Lane,
        EntityKind::Road,
        EntityKind::Line,
        EntityKind::StopLine,
        EntityKind::TrafficLight,
        EntityKind::Sign,
        EntityKind::Boundary,
        EntityKind::Marking,
        EntityKind::Curb,
        EntityKind::Crossing,
        EntityKind::Junction,
        EntityKind::Connection,
    ];

    /// Number of distinct kinds (length of [`Self::ALL`]).
    pub const COUNT: usize = Self::ALL.len();

    /// Position of this kind in [`Self::ALL`].
    #[inline]
    pub fn slot(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Waypoint     => "waypoint",
            EntityKind::Lane         => "lane",
            EntityKind::Road         => "road",
            EntityKind::Line         => "line",
            EntityKind::StopLine     => "stop line",
            EntityKind::TrafficLight => "traffic light",
            EntityKind::Sign         => "sign",
            EntityKind::Boundary     => "boundary",
            EntityKind::Marking      => "marking",
            EntityKind::Curb         => "curb",
            EntityKind::Crossing     => "crossing",
            EntityKind::Junction     => "junction",
            EntityKind::Connection   => "connection",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Common behaviour of every typed identifier.
///
/// Lets generic code (allocators, validation) work over any id kind.
pub trait TypedId: Copy + Ord + fmt::Debug + fmt::Display {
    /// The entity kind whose id space this type belongs to.
    const KIND: EntityKind;

    fn from_raw(raw: i32) -> Self;

    fn raw(self) -> i32;

    /// `true` for allocated ids (`> 0`), `false` for the unset sentinel.
    #[inline]
    fn is_set(self) -> bool {
        self.raw() > 0
    }
}

/// Generate a typed ID wrapper around an `i32`.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident => $kind:ident;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        $vis struct $name(pub i32);

        impl $name {
            /// Sentinel meaning "no reference".
            pub const UNSET: $name = $name(0);

            /// `true` for allocated ids.
            #[inline(always)]
            pub fn is_set(self) -> bool {
                self.0 > 0
            }
        }

        impl TypedId for $name {
            const KIND: EntityKind = EntityKind::$kind;

            #[inline(always)]
            fn from_raw(raw: i32) -> Self {
                $name(raw)
            }

            #[inline(always)]
            fn raw(self) -> i32 {
                self.0
            }
        }

        impl Default for $name {
            /// Returns the `UNSET` sentinel so uninitialized references are visibly unset.
            #[inline(always)]
            fn default() -> Self {
                Self::UNSET
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<i32> for $name {
            #[inline(always)]
            fn from(raw: i32) -> $name {
                $name(raw)
            }
        }
    };
}

typed_id! {
    /// A point in a lane's centre-line.  Unique across the whole map.
    pub struct WaypointId => Waypoint;
}

typed_id! {
    pub struct LaneId => Lane;
}

typed_id! {
    /// A road segment.  Lanes, lines, signs and other furniture point back at
    /// their owning segment through this id.
    pub struct RoadId => Road;
}

typed_id! {
    pub struct LineId => Line;
}

typed_id! {
    pub struct StopLineId => StopLine;
}

typed_id! {
    pub struct TrafficLightId => TrafficLight;
}

typed_id! {
    pub struct SignId => Sign;
}

typed_id! {
    pub struct BoundaryId => Boundary;
}

typed_id! {
    pub struct MarkingId => Marking;
}

typed_id! {
    pub struct CurbId => Curb;
}

typed_id! {
    pub struct CrossingId => Crossing;
}

typed_id! {
    pub struct JunctionId => Junction;
}

typed_id! {
    /// One legal movement through a junction.
    pub struct ConnectionId => Connection;
}
