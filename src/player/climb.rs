//! Bevy systems around the climb controller.
//!
//! The controller itself is engine-independent; these systems adapt live
//! Avian and transform state to its collaborator traits, poll the climb-zone
//! overlap sensor, and relay montage completion back into the state machine.

use avian3d::prelude::*;
use bevy::prelude::*;
use rand::prelude::*;

use crate::camera::{CameraPitch, MantleBob};
use crate::control::{MovementDriver, MovementMode, TickContext, TraceHit, TraceWorld, WAKE_UP_MONTAGE};
use crate::physics::GameLayer;

use super::input::{ClimbOutPressed, JumpPressed};
use super::montage::{MantleCarry, MontageFinished, MontageLibrary, MontageQueue};
use super::state::*;

/// Marker for trigger volumes that arm climb detection.
///
/// Climb zones should use `Sensor` colliders on `GameLayer::Trigger` so the
/// player's overlap sensor can see them without colliding.
#[derive(Component)]
pub struct ClimbZone;

/// [`TraceWorld`] over Avian's spatial query, filtered to static world
/// geometry so dynamic obstacles never qualify as climbable.
struct StaticWorld<'a, 'w, 's> {
    spatial: &'a SpatialQuery<'w, 's>,
}

impl TraceWorld for StaticWorld<'_, '_, '_> {
    fn line_trace(&self, start: Vec3, end: Vec3) -> Option<TraceHit> {
        let delta = end - start;
        let distance = delta.length();
        let direction = Dir3::new(delta).ok()?;
        let filter = SpatialQueryFilter::default().with_mask(GameLayer::World);

        self.spatial
            .cast_ray(start, direction, distance, true, &filter)
            .map(|hit| TraceHit::new(start + direction.as_vec3() * hit.distance))
    }
}

/// [`MovementDriver`] over the capsule's mode, velocities and transform.
struct CapsuleMovement<'a> {
    mode: &'a mut MoveMode,
    velocity: &'a mut PlayerVelocity,
    linear: &'a mut LinearVelocity,
    transform: &'a mut Transform,
}

impl MovementDriver for CapsuleMovement<'_> {
    fn mode(&self) -> MovementMode {
        self.mode.0
    }

    fn set_mode(&mut self, mode: MovementMode) {
        self.mode.0 = mode;
    }

    fn stop_immediately(&mut self) {
        self.velocity.0 = Vec3::ZERO;
        self.linear.0 = Vec3::ZERO;
    }

    fn set_position(&mut self, position: Vec3) {
        self.transform.translation = position;
    }
}

/// The character's facing flattened onto the horizontal plane.
fn horizontal_forward(transform: &Transform) -> Vec3 {
    let forward = transform.forward().as_vec3();
    Vec3::new(forward.x, 0.0, forward.z).normalize_or_zero()
}

/// Polls the overlap sensor: a sphere around the character intersected
/// against climb-zone triggers. The trace gate toggles only on enter/leave
/// transitions, so an explicit climb-out stays disarmed while the player
/// remains inside the zone.
pub fn update_climb_sensor(
    spatial_query: SpatialQuery,
    mut query: Query<(&Transform, &PlayerConfig, &mut ZonePresence, &mut Climber), With<Player>>,
    zone_query: Query<(), With<ClimbZone>>,
) {
    for (transform, config, mut presence, mut climber) in &mut query {
        let shape = Collider::sphere(config.sensor_radius);
        let filter = SpatialQueryFilter::default().with_mask(GameLayer::Trigger);

        let intersections = spatial_query.shape_intersections(
            &shape,
            transform.translation,
            Quat::IDENTITY,
            &filter,
        );

        let in_zone = intersections.iter().any(|e| zone_query.get(*e).is_ok());
        if in_zone != presence.0 {
            presence.0 = in_zone;
            climber.set_can_trace(in_zone);
            debug!("climb zone overlap {}", if in_zone { "begin" } else { "end" });
        }
    }
}

/// Runs the throttled climb detection pass against the live world.
pub fn detect_climb(
    spatial_query: SpatialQuery,
    mut query: Query<
        (
            &mut Transform,
            &mut Climber,
            &mut MoveMode,
            &mut PlayerVelocity,
            &mut LinearVelocity,
        ),
        With<Player>,
    >,
    time: Res<Time>,
) {
    let dt = time.delta_secs();

    for (mut transform, mut climber, mut mode, mut velocity, mut linear) in &mut query {
        let ctx = TickContext {
            dt,
            position: transform.translation,
            forward: horizontal_forward(&transform),
        };
        let world = StaticWorld {
            spatial: &spatial_query,
        };
        let mut movement = CapsuleMovement {
            mode: &mut mode,
            velocity: &mut velocity,
            linear: &mut linear,
            transform: &mut transform,
        };
        climber.tick(&ctx, &world, &mut movement);
    }
}

/// Handles climb-out and jump-to-mantle inputs.
pub fn handle_climb_actions(
    mut commands: Commands,
    mut query: Query<
        (
            Entity,
            &mut Transform,
            &mut Climber,
            &mut MoveMode,
            &mut PlayerVelocity,
            &mut LinearVelocity,
            &mut MontageQueue,
            &MontageLibrary,
            &mut JumpPressed,
            &ClimbOutPressed,
        ),
        With<Player>,
    >,
    pitch_query: Query<Entity, With<CameraPitch>>,
) {
    for (
        entity,
        mut transform,
        mut climber,
        mut mode,
        mut velocity,
        mut linear,
        mut queue,
        library,
        mut jump,
        climb_out,
    ) in &mut query
    {
        if climb_out.0 {
            let mut movement = CapsuleMovement {
                mode: &mut mode,
                velocity: &mut velocity,
                linear: &mut linear,
                transform: &mut transform,
            };
            climber.climb_out(&mut movement);
        }

        if jump.0 && climber.is_climbing() {
            jump.0 = false;
            let forward = horizontal_forward(&transform);

            if climber.on_jump(&mut *queue) {
                if let Some(end) = climber.mantle_exit(forward) {
                    commands.entity(entity).insert(MantleCarry {
                        start: transform.translation,
                        end,
                    });
                }

                // Brief camera roll while the clip plays.
                if let Ok(pitch_entity) = pitch_query.single() {
                    let duration = library
                        .get(WAKE_UP_MONTAGE)
                        .map_or(1.0, |montage| montage.duration);
                    let roll_sign = if rand::thread_rng().gen_bool(0.5) { 1.0 } else { -1.0 };
                    commands.entity(pitch_entity).insert(MantleBob {
                        elapsed: 0.0,
                        duration,
                        roll_sign,
                    });
                }
            }
        }
    }
}

/// Feeds montage completion back into the climb controller, which restores
/// walking after the wake-up clip.
pub fn relay_montage_finished(
    mut commands: Commands,
    mut finished: MessageReader<MontageFinished>,
    mut query: Query<
        (
            Entity,
            &mut Transform,
            &mut Climber,
            &mut MoveMode,
            &mut PlayerVelocity,
            &mut LinearVelocity,
        ),
        With<Player>,
    >,
) {
    for message in finished.read() {
        for (entity, mut transform, mut climber, mut mode, mut velocity, mut linear) in &mut query {
            let mut movement = CapsuleMovement {
                mode: &mut mode,
                velocity: &mut velocity,
                linear: &mut linear,
                transform: &mut transform,
            };
            climber.on_montage_ended(&message.montage, message.interrupted, &mut movement);

            if message.montage == WAKE_UP_MONTAGE {
                commands.entity(entity).remove::<MantleCarry>();
            }
        }
    }
}
