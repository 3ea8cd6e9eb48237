//! # Components
//!
//! Components are plain data; behavior lives in [`crate::systems`].
//! Angles are stored in degrees.

use bytemuck::{Pod, Zeroable};
use myth_shared::{Mat4, Vec3};

use super::entity::EntityId;

/// Position, Euler rotation (degrees) and scale.
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Transform {
    /// World space position.
    pub position: Vec3,
    /// Euler angles in degrees; `y` is yaw.
    pub rotation: Vec3,
    /// Per-axis scale.
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Transform at `position` with no rotation and unit scale.
    #[inline]
    #[must_use]
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Model matrix: translate, then yaw (Y), pitch (X), roll (Z), then scale.
    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position)
            * Mat4::from_rotation_y(self.rotation.y.to_radians())
            * Mat4::from_rotation_x(self.rotation.x.to_radians())
            * Mat4::from_rotation_z(self.rotation.z.to_radians())
            * Mat4::from_scale(self.scale)
    }

    /// Horizontal facing direction derived from yaw.
    #[inline]
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        let yaw = self.rotation.y.to_radians();
        Vec3::new(yaw.sin(), 0.0, yaw.cos())
    }
}

/// Linear and angular velocity, in units (degrees) per second.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Velocity {
    /// Linear velocity.
    pub linear: Vec3,
    /// Angular velocity.
    pub angular: Vec3,
}

/// Mesh identifiers understood by the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum MeshId {
    /// Unit cube (landmarks).
    Cube = 0,
    /// Player body.
    Player = 1,
}

/// Reference into renderer-owned mesh data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Renderable {
    /// Which mesh to draw (see [`MeshId`]).
    pub mesh_id: u32,
    /// First index in the mesh's index buffer.
    pub index_start: u32,
    /// Number of indices to draw.
    pub index_count: u32,
    /// Added to every index before vertex fetch.
    pub vertex_offset: i32,
    /// Skip drawing when false.
    pub visible: bool,
}

impl Default for Renderable {
    fn default() -> Self {
        Self {
            mesh_id: 0,
            index_start: 0,
            index_count: 0,
            vertex_offset: 0,
            visible: true,
        }
    }
}

impl Renderable {
    /// Visible renderable for a whole mesh.
    #[must_use]
    pub fn for_mesh(mesh: MeshId) -> Self {
        Self {
            mesh_id: mesh as u32,
            ..Self::default()
        }
    }
}

/// Third-person character movement parameters and state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerController {
    /// Walk speed, units per second.
    pub move_speed: f32,
    /// Yaw smoothing rate.
    pub turn_smoothing: f32,
    /// Upward velocity applied on jump.
    pub jump_force: f32,
    /// Downward acceleration while airborne.
    pub gravity: f32,
    /// Yaw the body turns toward, degrees.
    pub target_yaw: f32,
    /// Standing on the ground plane.
    pub grounded: bool,
}

impl Default for PlayerController {
    fn default() -> Self {
        Self {
            move_speed: 10.0,
            turn_smoothing: 10.0,
            jump_force: 8.0,
            gravity: 20.0,
            target_yaw: 0.0,
            grounded: true,
        }
    }
}

/// Orbiting follow camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraController {
    /// Orbit yaw, degrees in [0, 360].
    pub yaw: f32,
    /// Orbit pitch, degrees.
    pub pitch: f32,
    /// Distance from the target.
    pub distance: f32,
    /// Extra height above the target.
    pub height_offset: f32,
    /// Degrees per mouse count.
    pub mouse_sensitivity: f32,
    /// Lowest pitch.
    pub min_pitch: f32,
    /// Highest pitch.
    pub max_pitch: f32,
    /// Closest zoom.
    pub min_distance: f32,
    /// Farthest zoom.
    pub max_distance: f32,
    /// Distance change per scroll unit.
    pub zoom_step: f32,
    /// Exponential follow rate.
    pub smoothing: f32,
    /// Smoothed eye position.
    pub current_position: Vec3,
    /// Entity being followed, or `NULL`.
    pub target: EntityId,
}

impl Default for CameraController {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: 25.0,
            distance: 8.0,
            height_offset: 2.0,
            mouse_sensitivity: 0.15,
            min_pitch: -30.0,
            max_pitch: 60.0,
            min_distance: 3.0,
            max_distance: 20.0,
            zoom_step: 0.5,
            smoothing: 10.0,
            current_position: Vec3::new(0.0, 5.0, 10.0),
            target: EntityId::NULL,
        }
    }
}

/// Marks the player entity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlayerTag;

/// Marks the camera entity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CameraTag;

/// Marks static landmark props.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LandmarkTag;
