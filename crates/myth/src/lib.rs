//! # MYTH
//!
//! Live-simulation core of a streaming 3D world, wired together.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   position   ┌─────────────────┐
//! │ World        │─────────────▶│ RegionSimulator │──▶ visuals (smoothed)
//! │ + systems    │              └─────────────────┘
//! │              │   position   ┌─────────────────┐
//! │              │─────────────▶│ ChunkStreamer   │──▶ terrain buffer
//! └──────────────┘              └─────────────────┘
//!        ▲
//!   InputState
//! ```
//!
//! [`Simulation`] owns all of it and runs one tick at a time. Rendering,
//! windowing and audio live outside this workspace and only read the
//! buffers exposed here.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! let mut sim = Simulation::new(SimConfig::default());
//! let mut clock = FrameClock::new(sim.config().timing.max_dt);
//! loop {
//!     let report = sim.tick(&input, clock.tick());
//!     input.begin_frame();
//!     if report.terrain_rebuilt {
//!         renderer.upload(sim.terrain().vertex_bytes(), sim.terrain().index_bytes());
//!     }
//! }
//! ```

#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod clock;
pub mod config;
pub mod save;
pub mod simulation;
pub mod telemetry;

pub use clock::FrameClock;
pub use config::{ConfigError, SimConfig};
pub use save::{SaveData, SaveError, SaveManager};
pub use simulation::{Simulation, TickReport};

/// Re-export of the entity store and systems.
pub use myth_core as core;
/// Re-export of terrain generation and streaming.
pub use myth_procedural as procedural;
/// Re-export of the region field.
pub use myth_region as region;
/// Re-export of the shared math types.
pub use myth_shared as shared;
