//! Third-person camera rig and effects.

mod effects;
mod plugin;
mod rig;

pub use effects::MantleBob;
pub use plugin::OrbitCameraPlugin;
pub use rig::{CameraBoom, CameraConfig, CameraPitch, CameraYaw, FollowCamera, PitchAngle};
