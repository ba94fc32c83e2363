//! Third-person orbit rig: a yaw pivot following the player, a pitch pivot
//! under it, and the camera held at the end of a zoomable boom.

use bevy::ecs::observer::On;
use bevy::prelude::*;
use bevy_enhanced_input::prelude::*;

use crate::control::CameraArm;
use crate::player::{LookInput, LookRateInput, Player, ZoomAction};

/// Yaw pivot of the camera rig. Follows the player's position; its yaw is
/// the control rotation movement input is interpreted in.
#[derive(Component, Default)]
pub struct CameraYaw;

/// Pitch pivot, child of the yaw pivot.
#[derive(Component, Default)]
pub struct CameraPitch;

/// Current boom pitch in radians, kept separate from the transform so it
/// can be clamped before being applied.
#[derive(Component, Default, Deref, DerefMut)]
pub struct PitchAngle(pub f32);

/// The camera entity at the end of the boom.
#[derive(Component, Default)]
pub struct FollowCamera;

/// Bounded boom length, stepped by the zoom action.
#[derive(Component, Default, Deref, DerefMut)]
pub struct CameraBoom(pub CameraArm);

/// Look tuning for the rig.
#[derive(Component, Clone, Copy)]
pub struct CameraConfig {
    /// Radians of rotation per unit of mouse delta.
    pub sensitivity: f32,
    /// Rate look speed (arrow keys, analog sticks) in degrees/s.
    pub turn_rate: f32,
    /// Pitch clamp in radians.
    pub min_pitch: f32,
    pub max_pitch: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            sensitivity: 0.003,
            turn_rate: 45.0,
            min_pitch: -75f32.to_radians(),
            max_pitch: 60f32.to_radians(),
        }
    }
}

/// Keeps the yaw pivot on the player.
pub fn sync_rig_to_player(
    player_query: Query<&Transform, (With<Player>, Without<CameraYaw>)>,
    mut yaw_query: Query<&mut Transform, With<CameraYaw>>,
) {
    let Ok(player) = player_query.single() else {
        return;
    };
    for mut yaw in &mut yaw_query {
        yaw.translation = player.translation;
    }
}

/// Applies mouse look deltas to the rig.
pub fn apply_mouse_look(
    look_query: Query<&LookInput, With<Player>>,
    mut yaw_query: Query<&mut Transform, With<CameraYaw>>,
    mut pitch_query: Query<(&mut Transform, &mut PitchAngle, &CameraConfig), Without<CameraYaw>>,
) {
    let Ok(look) = look_query.single() else {
        return;
    };
    if look.0 == Vec2::ZERO {
        return;
    }
    let Ok((mut transform, mut pitch, config)) = pitch_query.single_mut() else {
        return;
    };

    for mut yaw in &mut yaw_query {
        yaw.rotate_y(-look.x * config.sensitivity);
    }
    pitch.0 = (pitch.0 - look.y * config.sensitivity).clamp(config.min_pitch, config.max_pitch);
    transform.rotation = Quat::from_rotation_x(pitch.0);
}

/// Applies rate look (arrow keys and analog-style devices), scaled by the
/// configured turn rate and the frame time.
pub fn apply_rate_look(
    look_query: Query<&LookRateInput, With<Player>>,
    mut yaw_query: Query<&mut Transform, With<CameraYaw>>,
    mut pitch_query: Query<(&mut Transform, &mut PitchAngle, &CameraConfig), Without<CameraYaw>>,
    time: Res<Time>,
) {
    let Ok(look) = look_query.single() else {
        return;
    };
    if look.0 == Vec2::ZERO {
        return;
    }
    let Ok((mut transform, mut pitch, config)) = pitch_query.single_mut() else {
        return;
    };
    let rate = config.turn_rate.to_radians() * time.delta_secs();

    for mut yaw in &mut yaw_query {
        yaw.rotate_y(-look.x * rate);
    }
    pitch.0 = (pitch.0 - look.y * rate).clamp(config.min_pitch, config.max_pitch);
    transform.rotation = Quat::from_rotation_x(pitch.0);
}

/// Steps the boom in or out one notch per wheel click, clamped to the
/// configured bounds.
pub fn handle_zoom(trigger: On<Fire<ZoomAction>>, mut boom_query: Query<&mut CameraBoom>) {
    for mut boom in &mut boom_query {
        if trigger.value > 0.0 {
            boom.zoom_in();
        } else if trigger.value < 0.0 {
            boom.zoom_out();
        }
    }
}

/// Holds the camera at the end of the boom.
pub fn apply_boom_length(
    boom_query: Query<&CameraBoom>,
    mut camera_query: Query<&mut Transform, With<FollowCamera>>,
) {
    let Ok(boom) = boom_query.single() else {
        return;
    };
    for mut camera in &mut camera_query {
        camera.translation.z = boom.length;
    }
}
