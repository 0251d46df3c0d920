//! `hd-core` — foundational types for the HD-map topology store.
//!
//! This crate is a dependency of every other `hd-*` crate.  It intentionally
//! has no `hd-*` dependencies and minimal external ones (only `thiserror`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module       | Contents                                                 |
//! |--------------|----------------------------------------------------------|
//! | [`ids`]      | `LaneId`, `RoadId`, `WaypointId`, … and `EntityKind`     |
//! | [`alloc`]    | `IdAllocators` — one id counter per entity kind          |
//! | [`geo`]      | `Point3`, `GeoPoint`, polyline helpers                   |
//! | [`config`]   | `MapConfig` — origin, projection, traffic side           |
//! | [`error`]    | `HdError`, `HdResult`                                    |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod alloc;
pub mod config;
pub mod error;
pub mod geo;
pub mod ids;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use alloc::{IdAllocators, FIRST_ID};
pub use config::MapConfig;
pub use error::{HdError, HdResult};
pub use geo::{GeoPoint, Point3};
pub use ids::{
    BoundaryId, ConnectionId, CrossingId, CurbId, EntityKind, JunctionId, LaneId, LineId,
    MarkingId, RoadId, SignId, StopLineId, TrafficLightId, TypedId, WaypointId,
};
