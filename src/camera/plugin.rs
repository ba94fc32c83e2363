use bevy::prelude::*;

use super::effects::apply_mantle_bob;
use super::rig::{
    apply_boom_length, apply_mouse_look, apply_rate_look, handle_zoom, sync_rig_to_player,
};

/// Drives the third-person orbit rig spawned by the player plugin.
pub struct OrbitCameraPlugin;

impl Plugin for OrbitCameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_observer(handle_zoom).add_systems(
            Update,
            (
                sync_rig_to_player,
                apply_mouse_look,
                apply_rate_look,
                apply_boom_length,
                apply_mantle_bob,
            )
                .chain(),
        );
    }
}
