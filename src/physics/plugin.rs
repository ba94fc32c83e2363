use avian3d::prelude::*;
use bevy::prelude::*;

/// Physics setup for a centimetre-scale world: one metre is 100 units, and
/// gravity is scaled to match.
pub struct WorldPhysicsPlugin;

impl Plugin for WorldPhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(PhysicsPlugins::default().with_length_unit(100.0))
            .insert_resource(Gravity(Vec3::NEG_Y * 980.0));
    }
}
