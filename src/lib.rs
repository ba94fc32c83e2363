pub mod camera;
pub mod control;
pub mod physics;
pub mod player;

pub use camera::OrbitCameraPlugin;
pub use physics::WorldPhysicsPlugin;
pub use player::PlayerPlugin;

use bevy::prelude::*;

/// Unified plugin that adds physics, the player character, and the orbit
/// camera rig.
pub struct BevyMantlePlugin;

impl Plugin for BevyMantlePlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<WorldPhysicsPlugin>() {
            app.add_plugins(WorldPhysicsPlugin);
        }
        if !app.is_plugin_added::<PlayerPlugin>() {
            app.add_plugins(PlayerPlugin);
        }
        if !app.is_plugin_added::<OrbitCameraPlugin>() {
            app.add_plugins(OrbitCameraPlugin);
        }
    }
}

pub mod prelude {
    pub use crate::BevyMantlePlugin;
    pub use crate::camera::{CameraBoom, CameraConfig, FollowCamera, OrbitCameraPlugin};
    pub use crate::control::{
        CameraArm, ClimbConfig, ClimbController, MovementMode, SprintConfig, SprintState,
    };
    pub use crate::physics::{GameLayer, WorldPhysicsPlugin};
    pub use crate::player::{
        AnimSignals, Climber, ClimbZone, Grounded, MaxWalkSpeed, MoveMode, PawnBlueprint,
        PawnSelector, Player, PlayerConfig, PlayerPlugin, PlayerVelocity, Sprint,
    };
}
