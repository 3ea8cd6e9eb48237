//! Player input: camera-relative walking, sprint and jump.

use myth_shared::Vec3;

use crate::ecs::World;
use crate::input::{InputState, Key};

/// Direction length under which the stick counts as released.
const MOVE_DEADZONE: f32 = 0.01;

/// Horizontal velocity kept per tick with no movement key held.
const IDLE_DAMPING: f32 = 0.85;

/// Sprint speed multiplier.
const SPRINT_MULTIPLIER: f32 = 2.0;

/// Converts the input snapshot into the player's velocity and target yaw.
///
/// Movement is relative to the camera's yaw when a camera exists,
/// otherwise to the world axes. Does nothing without a complete player
/// (transform, velocity and controller).
pub fn update_player_input(world: &mut World, input: &InputState) {
    let player = world.player();
    if !world.transforms.has(player) {
        return;
    }

    let (forward, right) = match world.camera_controllers.try_get(world.camera()) {
        Some(cam) => {
            let yaw = cam.yaw.to_radians();
            let forward = Vec3::new(yaw.sin(), 0.0, yaw.cos()).normalize_or_zero();
            (forward, forward.cross(Vec3::Y).normalize_or_zero())
        }
        None => (Vec3::Z, Vec3::X),
    };

    let (Some(velocity), Some(controller)) = (
        world.velocities.try_get_mut(player),
        world.player_controllers.try_get_mut(player),
    ) else {
        return;
    };

    let mut direction = Vec3::ZERO;
    if input.is_held(Key::Forward) {
        direction += forward;
    }
    if input.is_held(Key::Back) {
        direction -= forward;
    }
    if input.is_held(Key::Left) {
        direction -= right;
    }
    if input.is_held(Key::Right) {
        direction += right;
    }

    let mut speed = controller.move_speed;
    if input.is_held(Key::Sprint) {
        speed *= SPRINT_MULTIPLIER;
    }

    if direction.length() > MOVE_DEADZONE {
        let direction = direction.normalize_or_zero();
        velocity.linear.x = direction.x * speed;
        velocity.linear.z = direction.z * speed;
        controller.target_yaw = direction.x.atan2(direction.z).to_degrees();
    } else {
        velocity.linear.x *= IDLE_DAMPING;
        velocity.linear.z *= IDLE_DAMPING;
    }

    if input.was_pressed(Key::Jump) && controller.grounded {
        velocity.linear.y = controller.jump_force;
        controller.grounded = false;
    }
}
