//! Collaborator traits between the climb logic and the host engine.
//!
//! The original behavior leans on engine-owned subsystems (world line
//! traces, the character movement component, montage playback, and
//! reflection-dispatched animation events). Each of those becomes a small
//! trait here so the controller can be driven by mocks in tests and by
//! Avian/Bevy adapters at runtime.

use bevy::prelude::*;

/// Discrete locomotion state: whether physics or scripted placement governs
/// the capsule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MovementMode {
    /// Normal grounded locomotion.
    #[default]
    Walking,
    /// Airborne under gravity.
    Falling,
    /// Non-physics scripted placement (used while latched to a ledge and
    /// during the mantle).
    Flying,
}

/// Result of a line trace against static world geometry.
#[derive(Debug, Clone, Copy)]
pub struct TraceHit {
    /// World-space impact point.
    pub point: Vec3,
}

impl TraceHit {
    pub fn new(point: Vec3) -> Self {
        Self { point }
    }
}

/// Synchronous world query service.
pub trait TraceWorld {
    /// Casts a line from `start` to `end` against static world geometry
    /// only; dynamic bodies never qualify. Returns the impact point of the
    /// closest hit, or `None` on a miss.
    fn line_trace(&self, start: Vec3, end: Vec3) -> Option<TraceHit>;
}

/// Movement-mode service owned by the host's movement component.
pub trait MovementDriver {
    fn mode(&self) -> MovementMode;

    fn set_mode(&mut self, mode: MovementMode);

    /// Zeroes velocity and acceleration.
    fn stop_immediately(&mut self);

    /// Teleports the capsule to `position`.
    fn set_position(&mut self, position: Vec3);

    fn is_falling(&self) -> bool {
        self.mode() == MovementMode::Falling
    }
}

/// Animation playback service: plays a named montage from a named entry
/// section. Completion is reported back through
/// [`ClimbController::on_montage_ended`](super::ClimbController::on_montage_ended).
pub trait MontagePlayer {
    fn play(&mut self, montage: &str, section: &str);
}

/// Observer for the capability signals the animation layer consumes.
///
/// Both signals are level-triggered: they are re-emitted with their current
/// value every qualifying detection tick, not only on edges.
pub trait ClimbObserver: Send + Sync {
    /// Wall and ledge probes both hit this qualifying tick.
    fn can_grab(&mut self, can_grab: bool);

    /// The character is latched to a ledge and the wake-up can start.
    fn can_wake_up(&mut self, _can_wake_up: bool) {}
}

/// Registration point for [`ClimbObserver`]s.
///
/// Replaces the original's runtime-reflection event dispatch with explicit
/// typed callbacks registered by the animation layer.
#[derive(Default)]
pub struct SignalHub {
    observers: Vec<Box<dyn ClimbObserver>>,
}

impl SignalHub {
    pub fn register(&mut self, observer: impl ClimbObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub(crate) fn can_grab(&mut self, can_grab: bool) {
        for observer in &mut self.observers {
            observer.can_grab(can_grab);
        }
    }

    pub(crate) fn can_wake_up(&mut self, can_wake_up: bool) {
        for observer in &mut self.observers {
            observer.can_wake_up(can_wake_up);
        }
    }
}
