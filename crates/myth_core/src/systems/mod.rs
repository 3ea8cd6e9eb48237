//! # Systems
//!
//! Per-tick functions over the [`World`](crate::World). Run order each tick:
//!
//! 1. [`update_player_input`] - input snapshot to player velocity
//! 2. [`update_movement`] - integrate controllers, gravity, ground clamp
//! 3. [`update_camera`] - orbit and follow

mod camera;
mod movement;
mod player;

pub use camera::{camera_position, camera_view_matrix, orbit_position, update_camera};
pub use movement::update_movement;
pub use player::update_player_input;

/// Wraps an angle in degrees into [0, 360] with a single correction step.
#[inline]
pub(crate) fn wrap_degrees(mut angle: f32) -> f32 {
    if angle < 0.0 {
        angle += 360.0;
    }
    if angle > 360.0 {
        angle -= 360.0;
    }
    angle
}
