//! Character integration: yaw smoothing, gravity, flat ground.

use super::wrap_degrees;
use crate::ecs::World;

/// Height of the ground plane.
const GROUND_Y: f32 = 0.0;

/// Integrates every entity that has a controller, a transform and a velocity.
///
/// Yaw turns toward `target_yaw` along the shortest arc. Ground is the
/// `y = 0` plane; terrain height is not sampled.
pub fn update_movement(world: &mut World, dt: f32) {
    let transforms = &mut world.transforms;
    let velocities = &mut world.velocities;

    world.player_controllers.each_mut(|e, controller| {
        let (Some(transform), Some(velocity)) = (transforms.try_get_mut(e), velocities.try_get_mut(e))
        else {
            return;
        };

        let mut yaw_diff = controller.target_yaw - transform.rotation.y;
        if yaw_diff > 180.0 {
            yaw_diff -= 360.0;
        }
        if yaw_diff < -180.0 {
            yaw_diff += 360.0;
        }
        transform.rotation.y =
            wrap_degrees(transform.rotation.y + yaw_diff * controller.turn_smoothing * dt);

        if !controller.grounded {
            velocity.linear.y -= controller.gravity * dt;
        }

        transform.position += velocity.linear * dt;

        if transform.position.y <= GROUND_Y {
            transform.position.y = GROUND_Y;
            velocity.linear.y = 0.0;
            controller.grounded = true;
        }
    });
}
