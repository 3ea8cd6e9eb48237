//! # MYTH Shared
//!
//! Common types used by the simulation crates and the external renderer.
//!
//! ## CRITICAL RULE
//!
//! This crate must NEVER depend on a GPU or window-related crate.
//! The renderer consumes [`Vertex`] buffers and [`Mat4`] model matrices;
//! how they reach the device is not our concern.

#![deny(unsafe_code)]
#![warn(clippy::pedantic)]

pub mod math;
pub mod vertex;

pub use math::{Mat4, Vec2, Vec3};
pub use vertex::Vertex;
