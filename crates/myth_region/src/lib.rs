//! # MYTH Region Simulation
//!
//! The world is divided into square regions. Each region carries a
//! "narrative pressure" in `[0, 1]` that builds while the observer stands in
//! it and decays, after a grace period, once they leave. Pressure maps to a
//! discrete [`RegionState`], and the occupied region's state drives the
//! fog, sky and color intensity handed to the renderer.
//!
//! ## Example
//!
//! ```rust,ignore
//! use myth_region::{RegionConfig, RegionSimulator};
//!
//! let mut regions = RegionSimulator::new(RegionConfig::default());
//! if let Some(change) = regions.update(player_position, dt) {
//!     tracing::info!(from = %change.from, to = %change.to, "Region shifted");
//! }
//! let visuals = regions.current_visuals();
//! ```

#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod simulator;
pub mod state;
pub mod visuals;

pub use simulator::{RegionConfig, RegionCoord, RegionData, RegionSimulator, StateChange};
pub use state::{InvalidRegionState, RegionState};
pub use visuals::RegionVisuals;
