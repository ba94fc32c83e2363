//! Camera flourishes layered on top of the rig.

use bevy::prelude::*;

use super::rig::FollowCamera;

/// Peak roll of the mantle bob, in radians.
const BOB_ROLL: f32 = 0.05;

/// One-shot camera roll played while the character mantles a ledge. The
/// roll direction is chosen at random when the mantle starts.
#[derive(Component, Debug, Clone, Copy)]
#[component(storage = "SparseSet")]
pub struct MantleBob {
    pub elapsed: f32,
    pub duration: f32,
    /// `1.0` or `-1.0`.
    pub roll_sign: f32,
}

/// Rolls the camera through a half sine over the bob's duration, then
/// settles it back level.
pub fn apply_mantle_bob(
    mut commands: Commands,
    mut bob_query: Query<(Entity, &mut MantleBob)>,
    mut camera_query: Query<&mut Transform, With<FollowCamera>>,
    time: Res<Time>,
) {
    let Ok(mut camera) = camera_query.single_mut() else {
        return;
    };

    for (entity, mut bob) in &mut bob_query {
        bob.elapsed += time.delta_secs();
        let t = (bob.elapsed / bob.duration).clamp(0.0, 1.0);

        let roll = bob.roll_sign * BOB_ROLL * (t * std::f32::consts::PI).sin();
        camera.rotation = Quat::from_rotation_z(roll);

        if t >= 1.0 {
            camera.rotation = Quat::IDENTITY;
            commands.entity(entity).remove::<MantleBob>();
        }
    }
}
