//! `hd-detect` — interface to the vision detector that feeds the planner.
//!
//! The detector itself (a neural-network inference wrapper) lives outside
//! this workspace.  This crate defines what it produces and how it plugs in.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                       |
//! |--------------|----------------------------------------------------------------|
//! | [`class`]    | `ObjectClass` trait, `TrafficLightClass`, `MapClass`           |
//! | [`object`]   | `Frame` input, `DetectedObject<C>` output record               |
//! | [`params`]   | `DetectorParams` — model paths and score threshold             |
//! | [`detector`] | `Detector` trait, `NoopDetector`, `filter_by_score`            |
//! | [`error`]    | `DetectError`, `DetectResult<T>`                               |
//!
//! # Design notes
//!
//! Associating detections with map entities (a detected light with a
//! `TrafficLight`, a stop-line box with a `StopLine`) is the planner's job;
//! nothing here depends on the topology store.

pub mod class;
pub mod detector;
pub mod error;
pub mod object;
pub mod params;


pub use class::{MapClass, ObjectClass, TrafficLightClass};
pub use detector::{filter_by_score, Detector, NoopDetector};
pub use error::{DetectError, DetectResult};
pub use object::{DetectedObject, Frame};
pub use params::{DetectorParams, DEFAULT_THRESHOLD};
