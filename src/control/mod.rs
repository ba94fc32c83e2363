//! Engine-independent locomotion and climb logic.
//!
//! Everything in this module operates on plain math types and the
//! collaborator traits in [`services`], so the decision logic can be
//! unit-tested without a running app or physics world. The Bevy systems in
//! `player` and `camera` adapt live engine state to these traits.

pub mod camera;
pub mod climb;
pub mod clock;
pub mod services;
pub mod sprint;

pub use camera::CameraArm;
pub use climb::{ClimbConfig, ClimbController, TickContext, WAKE_UP_MONTAGE, WAKE_UP_SECTION};
pub use clock::TraceClock;
pub use services::{
    ClimbObserver, MontagePlayer, MovementDriver, MovementMode, SignalHub, TraceHit, TraceWorld,
};
pub use sprint::{SprintConfig, SprintState};
