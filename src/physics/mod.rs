//! Physics configuration and collision layers.

mod layers;
mod plugin;

pub use layers::GameLayer;
pub use plugin::WorldPhysicsPlugin;
