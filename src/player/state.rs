use bevy::prelude::*;

use crate::control::{ClimbController, MovementMode, SprintState};

/// Marker component for the player entity (also used as input context)
#[derive(Component, Default)]
pub struct Player;

/// Player movement configuration
#[derive(Component, Clone, Copy)]
pub struct PlayerConfig {
    /// Base max walk speed in units/s (before the sprint multiplier)
    pub base_max_speed: f32,
    /// Ground acceleration towards the desired velocity
    pub ground_accel: f32,
    /// Ground friction/deceleration when there is no input
    pub ground_friction: f32,
    /// Fraction of ground acceleration available while airborne
    pub air_control: f32,
    /// Jump impulse velocity
    pub jump_velocity: f32,
    /// Yaw rate towards the movement direction, in degrees/s
    pub rotation_rate: f32,
    /// Capsule radius
    pub radius: f32,
    /// Capsule half height; the character origin sits this far above the feet
    pub half_height: f32,
    /// Radius of the climb-zone overlap sensor around the character
    pub sensor_radius: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        // Centimetre-scale world units.
        Self {
            base_max_speed: 600.0,
            ground_accel: 2048.0,
            ground_friction: 4096.0,
            air_control: 0.1,
            jump_velocity: 400.0,
            rotation_rate: 540.0,
            radius: 42.0,
            half_height: 96.0,
            sensor_radius: 96.0,
        }
    }
}

/// Current player velocity
#[derive(Component, Default, Deref, DerefMut)]
pub struct PlayerVelocity(pub Vec3);

/// Current max walk speed; multiplied and restored by the sprint toggle
#[derive(Component, Deref, DerefMut)]
pub struct MaxWalkSpeed(pub f32);

/// Discrete locomotion mode of the capsule
#[derive(Component, Default, Deref, DerefMut)]
pub struct MoveMode(pub MovementMode);

/// Stamina-gated sprint state
#[derive(Component, Default, Deref, DerefMut)]
pub struct Sprint(pub SprintState);

/// Climb detection and state machine
#[derive(Component, Default, Deref, DerefMut)]
pub struct Climber(pub ClimbController);

/// Marker: player is on the ground
#[derive(Component)]
#[component(storage = "SparseSet")]
pub struct Grounded;

/// Whether the overlap sensor reported a climb zone last tick. The trace
/// gate toggles only on transitions, so an explicit climb-out stays
/// disarmed until the zone is left and re-entered.
#[derive(Component, Default)]
pub struct ZonePresence(pub bool);
