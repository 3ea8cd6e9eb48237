//! Third-person orbit camera.

use myth_shared::{Mat4, Vec3};

use super::wrap_degrees;
use crate::ecs::{CameraController, World};
use crate::input::InputState;

/// Point the camera looks at, relative to the target's feet.
const LOOK_AT_OFFSET: Vec3 = Vec3::new(0.0, 1.1, 0.0);

/// Eye position reported when there is no camera.
const DEFAULT_EYE: Vec3 = Vec3::new(0.0, 5.0, 10.0);

/// Ideal eye position orbiting `target` at the controller's yaw, pitch and distance.
#[must_use]
pub fn orbit_position(cam: &CameraController, target: Vec3) -> Vec3 {
    let (pitch_sin, pitch_cos) = cam.pitch.to_radians().sin_cos();
    let (yaw_sin, yaw_cos) = cam.yaw.to_radians().sin_cos();
    let horizontal = cam.distance * pitch_cos;
    let vertical = cam.distance * pitch_sin;
    Vec3::new(
        target.x - horizontal * yaw_sin,
        target.y + cam.height_offset + vertical,
        target.z - horizontal * yaw_cos,
    )
}

/// Applies mouse look and zoom, then eases every camera toward its orbit position.
pub fn update_camera(world: &mut World, input: &InputState, dt: f32) {
    let transforms = &world.transforms;
    let (dx, dy) = input.mouse_delta();
    let scroll = input.scroll_delta();

    world.camera_controllers.each_mut(|_, cam| {
        if input.mouse_captured() {
            cam.yaw -= dx * cam.mouse_sensitivity;
            cam.pitch = (cam.pitch + dy * cam.mouse_sensitivity).clamp(cam.min_pitch, cam.max_pitch);
            cam.yaw = wrap_degrees(cam.yaw);
        }

        cam.distance = (cam.distance - scroll * cam.zoom_step).clamp(cam.min_distance, cam.max_distance);

        if let Some(target) = transforms.try_get(cam.target) {
            let ideal = orbit_position(cam, target.position);
            let t = 1.0 - (-cam.smoothing * dt).exp();
            cam.current_position = cam.current_position.lerp(ideal, t);
        }
    });
}

/// View matrix of the world's camera, looking just above its target.
///
/// Identity when there is no camera or its target is gone.
#[must_use]
pub fn camera_view_matrix(world: &World) -> Mat4 {
    let Some(cam) = world.camera_controllers.try_get(world.camera()) else {
        return Mat4::IDENTITY;
    };
    let Some(target) = world.transforms.try_get(cam.target) else {
        return Mat4::IDENTITY;
    };
    Mat4::look_at_rh(cam.current_position, target.position + LOOK_AT_OFFSET, Vec3::Y)
}

/// Smoothed eye position of the world's camera.
#[must_use]
pub fn camera_position(world: &World) -> Vec3 {
    world
        .camera_controllers
        .try_get(world.camera())
        .map_or(DEFAULT_EYE, |cam| cam.current_position)
}
