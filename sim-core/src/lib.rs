//! Core of a plant transpiration visualizer: water vapour particles leave the
//! stomata of a leaf at a rate driven by temperature, humidity and light.
//!
//! Main components:
//! - [`params`] — the three bounded user inputs.
//! - [`model`] — transpiration rate and the particle tuning derived from it.
//! - [`particle`] — particles, their read-only views and the live collection.
//! - [`phases`] — spawn, expire and advance steps over the collection.
//! - [`scheduler`] — host frame requests and interval timers.
//! - [`engine`] — the particle engine owning both cadences.
//! - [`simulation`] — controller tying parameters, engine and scheduler together.
//! - [`config`] — scene geometry and attribute ranges.
//! - [`error`] — configuration errors.
//! - [`types`] — shared ids and handles.

pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod params;
pub mod particle;
pub mod phases;
pub mod scheduler;
pub mod simulation;
pub mod types;
