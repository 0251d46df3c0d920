//! `hd-topology` — the HD-map topology store.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`lane`]      | `Waypoint`, `Lane`, `RoadSegment`                          |
//! | [`furniture`] | lines, crossings, markings, signs, boundaries, curbs, stop lines, traffic lights |
//! | [`junction`]  | `Junction`, `Connection`, `LaneLink`                       |
//! | [`network`]   | `RoadNetwork` — collections, allocators, copy, spatial cache |
//! | [`query`]     | id lookups and graph traversal                             |
//! | [`rewrite`]   | road/lane id renumbering                                   |
//! | [`validate`]  | eager invariant check                                      |
//! | [`builder`]   | `RoadNetworkBuilder`                                       |
//! | [`error`]     | `TopologyError`, `TopologyResult<T>`                       |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod builder;
pub mod error;
pub mod furniture;
pub mod junction;
pub mod lane;
pub mod network;
pub mod query;
pub mod rewrite;
pub mod validate;

#[cfg(test)]
mod tests;

pub use builder::RoadNetworkBuilder;
pub use error::{TopologyError, TopologyResult};
pub use furniture::{
    Boundary, BoundaryKind, Crossing, CrossingKind, Curb, LaneRef, Line, LineColor, LineKind,
    Marking, MarkingKind, RoadRef, Sign, SignKind, StopLine, TrafficLight, TrafficLightKind,
};
pub use junction::{Connection, Junction, LaneLink};
pub use lane::{Lane, RoadSegment, Waypoint};
pub use network::RoadNetwork;
