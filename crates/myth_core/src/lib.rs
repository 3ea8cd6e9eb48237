//! # MYTH Core
//!
//! Entity/component store and the per-tick gameplay systems.
//!
//! ## Architecture Rules
//!
//! 1. **Handles are generational** - a destroyed entity's handle never sees
//!    the components of whoever reuses its slot
//! 2. **Dense iteration** - component values live in packed arrays
//! 3. **Systems are plain functions** - `fn(&mut World, &InputState, dt)`
//!
//! ## Example
//!
//! ```rust,ignore
//! use myth_core::{World, InputState, systems};
//!
//! let mut world = World::new();
//! let player = world.create_player(Vec3::ZERO);
//! world.create_camera(player);
//! systems::update_player_input(&mut world, &InputState::default());
//! ```

#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod ecs;
pub mod error;
pub mod input;
pub mod jobs;
pub mod systems;

pub use ecs::{
    CameraController, CameraTag, ComponentArray, ComponentStore, EntityId, EntityTable,
    LandmarkTag, MeshId, PlayerController, PlayerTag, Renderable, Transform, Velocity, World,
};
pub use error::EcsError;
pub use input::{InputState, Key};
pub use jobs::JobSystem;
