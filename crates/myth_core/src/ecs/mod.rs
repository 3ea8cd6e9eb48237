//! # Entity Component System
//!
//! ## Design Philosophy
//!
//! - Entity IDs are indices with generation counters
//! - Each component type lives in its own sparse set: O(1) add, remove, lookup
//! - Dense arrays stay packed, so iteration touches only live components
//! - The world keeps every array behind [`ComponentStore`] so destroying an
//!   entity strips all of its components in one call

mod component;
mod entity;
mod storage;
mod world;

pub use component::{
    CameraController, CameraTag, LandmarkTag, MeshId, PlayerController, PlayerTag, Renderable,
    Transform, Velocity,
};
pub use entity::{EntityId, EntityTable};
pub use storage::{ComponentArray, ComponentStore};
pub use world::World;
