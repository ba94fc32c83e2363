use avian3d::prelude::PhysicsLayer;

/// Collision layers for the game world.
#[derive(PhysicsLayer, Default, Clone, Copy, Debug)]
pub enum GameLayer {
    #[default]
    Default,
    /// The player capsule.
    Player,
    /// Static level geometry; the only layer climb traces can hit.
    World,
    /// Sensor volumes such as climb zones.
    Trigger,
}
