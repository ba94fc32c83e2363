//! Ground and air locomotion for the player capsule.
//!
//! Input is interpreted in the camera's yaw plane: forward/right come from
//! the boom's yaw only, so pitch never bleeds into ground movement. While
//! the climb controller has movement disabled, these systems stand down and
//! the capsule stays where the controller pinned it.

use avian3d::prelude::*;
use bevy::prelude::*;

use crate::camera::CameraYaw;
use crate::control::MovementMode;
use crate::physics::GameLayer;

use super::input::{ForcePressed, JumpPressed, MoveInput};
use super::state::*;

/// How far below the capsule origin the ground probe reaches past the feet.
const GROUND_PROBE_SLACK: f32 = 10.0;

/// Casts a short ray below the capsule and keeps the movement mode and the
/// [`Grounded`] marker in sync with the result. Hanging from a ledge pins
/// the mode, so the probe stands down entirely while flying.
pub fn update_grounded(
    mut commands: Commands,
    spatial_query: SpatialQuery,
    mut query: Query<
        (Entity, &Transform, &PlayerConfig, &PlayerVelocity, &mut MoveMode),
        With<Player>,
    >,
) {
    for (entity, transform, config, velocity, mut mode) in &mut query {
        if mode.0 == MovementMode::Flying {
            commands.entity(entity).remove::<Grounded>();
            continue;
        }

        let filter = SpatialQueryFilter::default().with_mask(GameLayer::World);
        let grounded = spatial_query
            .cast_ray(
                transform.translation,
                Dir3::NEG_Y,
                config.half_height + GROUND_PROBE_SLACK,
                true,
                &filter,
            )
            .is_some()
            && velocity.y <= 0.0;

        if grounded {
            mode.0 = MovementMode::Walking;
            commands.entity(entity).insert(Grounded);
        } else {
            mode.0 = MovementMode::Falling;
            commands.entity(entity).remove::<Grounded>();
        }
    }
}

/// Applies the force toggle and the per-tick stamina drain/regen, keeping
/// the max walk speed in step with the sprint state.
pub fn update_sprint(
    mut query: Query<
        (&mut Sprint, &mut MaxWalkSpeed, &ForcePressed, &PlayerConfig),
        With<Player>,
    >,
) {
    for (mut sprint, mut max_speed, force, config) in &mut query {
        if force.0 {
            sprint.toggle(&mut max_speed.0);
        }
        sprint.tick(&mut max_speed.0, config.base_max_speed);
    }
}

/// Accelerates the capsule in the camera's yaw plane.
pub fn yaw_plane_movement(
    yaw_query: Query<&Transform, With<CameraYaw>>,
    mut query: Query<
        (
            &MoveInput,
            &MoveMode,
            &MaxWalkSpeed,
            &PlayerConfig,
            &Climber,
            &mut PlayerVelocity,
        ),
        With<Player>,
    >,
    time: Res<Time>,
) {
    let Ok(yaw) = yaw_query.single() else {
        return;
    };
    let dt = time.delta_secs();

    let forward = flatten(yaw.forward().as_vec3());
    let right = flatten(yaw.right().as_vec3());

    for (input, mode, max_speed, config, climber, mut velocity) in &mut query {
        if climber.movement_disabled() {
            continue;
        }

        let desired = (forward * input.y + right * input.x).clamp_length_max(1.0) * max_speed.0;
        let horizontal = Vec3::new(velocity.x, 0.0, velocity.z);

        let accel = match mode.0 {
            MovementMode::Walking if input.0 != Vec2::ZERO => config.ground_accel,
            MovementMode::Walking => config.ground_friction,
            MovementMode::Falling => config.ground_accel * config.air_control,
            MovementMode::Flying => continue,
        };

        let next = horizontal.move_towards(desired, accel * dt);
        velocity.x = next.x;
        velocity.z = next.z;
    }
}

fn flatten(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z).normalize_or_zero()
}

/// Pulls the capsule down while falling. Walking and flying modes manage
/// their own vertical velocity.
pub fn apply_gravity(
    mut query: Query<(&MoveMode, &mut PlayerVelocity), With<Player>>,
    gravity: Res<Gravity>,
    time: Res<Time>,
) {
    let dt = time.delta_secs();
    for (mode, mut velocity) in &mut query {
        if mode.0 == MovementMode::Falling {
            velocity.0 += gravity.0 * dt;
        }
    }
}

/// Launches a grounded jump. Jump presses while latched to a ledge are
/// consumed earlier by the climb action handler.
pub fn handle_jump(
    mut query: Query<
        (&JumpPressed, &PlayerConfig, &Climber, &mut MoveMode, &mut PlayerVelocity),
        (With<Player>, With<Grounded>),
    >,
) {
    for (jump, config, climber, mut mode, mut velocity) in &mut query {
        if jump.0 && climber.movement_allowed() {
            velocity.y = config.jump_velocity;
            mode.0 = MovementMode::Falling;
        }
    }
}

/// Turns the character towards its horizontal velocity at a bounded rate,
/// so the mesh faces where it is going rather than where the camera looks.
pub fn orient_to_movement(
    mut query: Query<
        (&mut Transform, &PlayerVelocity, &PlayerConfig, &Climber),
        With<Player>,
    >,
    time: Res<Time>,
) {
    let dt = time.delta_secs();

    for (mut transform, velocity, config, climber) in &mut query {
        if climber.movement_disabled() {
            continue;
        }

        let horizontal = Vec3::new(velocity.x, 0.0, velocity.z);
        if horizontal.length_squared() < 1.0 {
            continue;
        }

        let target_yaw = f32::atan2(-horizontal.x, -horizontal.z);
        let (current_yaw, ..) = transform.rotation.to_euler(EulerRot::YXZ);

        let mut delta = target_yaw - current_yaw;
        while delta > std::f32::consts::PI {
            delta -= std::f32::consts::TAU;
        }
        while delta < -std::f32::consts::PI {
            delta += std::f32::consts::TAU;
        }

        let max_step = config.rotation_rate.to_radians() * dt;
        let step = delta.clamp(-max_step, max_step);
        transform.rotation = Quat::from_rotation_y(current_yaw + step);
    }
}

/// Hands the tick's velocity to the physics body. While flying the body is
/// held still; the climb controller and the mantle carry own the transform.
pub fn apply_velocity(
    mut query: Query<(&MoveMode, &PlayerVelocity, &mut LinearVelocity), With<Player>>,
) {
    for (mode, velocity, mut linear) in &mut query {
        linear.0 = match mode.0 {
            MovementMode::Flying => Vec3::ZERO,
            _ => velocity.0,
        };
    }
}
