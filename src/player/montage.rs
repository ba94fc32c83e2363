//! Montage playback and the animation-layer signal surface.
//!
//! A montage is a named, triggerable clip with named entry sections. This
//! module advances the active montage, reports completion (and whether the
//! clip was interrupted), and carries the capsule along the mantle path
//! while the wake-up clip plays. It also owns [`AnimSignals`], the shared
//! flags an animation graph polls for the grab/wake-up capability levels.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use bevy::prelude::*;

use crate::control::{ClimbObserver, MontagePlayer, WAKE_UP_MONTAGE, WAKE_UP_SECTION};

use super::state::{Player, PlayerVelocity};

/// A named animation clip with named entry sections.
#[derive(Debug, Clone)]
pub struct Montage {
    pub name: String,
    /// Clip length in seconds.
    pub duration: f32,
    /// Entry sections as (name, start time) pairs.
    pub sections: Vec<(String, f32)>,
}

impl Montage {
    pub fn section_start(&self, section: &str) -> Option<f32> {
        self.sections
            .iter()
            .find(|(name, _)| name == section)
            .map(|(_, start)| *start)
    }
}

/// The montages available to this character.
#[derive(Component, Debug, Clone)]
pub struct MontageLibrary(pub Vec<Montage>);

impl MontageLibrary {
    pub fn get(&self, name: &str) -> Option<&Montage> {
        self.0.iter().find(|montage| montage.name == name)
    }
}

impl Default for MontageLibrary {
    fn default() -> Self {
        Self(vec![Montage {
            name: WAKE_UP_MONTAGE.to_string(),
            duration: 1.2,
            sections: vec![(WAKE_UP_SECTION.to_string(), 0.0)],
        }])
    }
}

/// The montage currently playing on this character.
#[derive(Component, Debug, Clone)]
#[component(storage = "SparseSet")]
pub struct PlayingMontage {
    pub name: String,
    pub elapsed: f32,
    pub duration: f32,
}

impl PlayingMontage {
    /// Normalized playback position in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }
}

/// Pending play requests, drained once per tick. Doubles as the
/// [`MontagePlayer`] collaborator handed to the climb controller.
#[derive(Component, Default)]
pub struct MontageQueue(pub VecDeque<(String, String)>);

impl MontagePlayer for MontageQueue {
    fn play(&mut self, montage: &str, section: &str) {
        self.0.push_back((montage.to_string(), section.to_string()));
    }
}

/// Completion notice: which montage ended and whether it was cut short by
/// another clip starting.
#[derive(Message, Clone, Debug)]
pub struct MontageFinished {
    pub montage: String,
    pub interrupted: bool,
}

/// Scripted capsule path while the wake-up montage plays: from the hang
/// anchor to the ledge exit point.
#[derive(Component, Debug, Clone, Copy)]
#[component(storage = "SparseSet")]
pub struct MantleCarry {
    pub start: Vec3,
    pub end: Vec3,
}

/// Level-triggered capability flags polled by the animation layer.
///
/// Cloned handles share the same underlying flags; the climb controller
/// writes them through a registered [`ClimbObserver`], replacing the
/// original's reflection-dispatched events.
#[derive(Component, Clone, Default)]
pub struct AnimSignals {
    can_grab: Arc<AtomicBool>,
    can_wake_up: Arc<AtomicBool>,
}

impl AnimSignals {
    pub fn can_grab(&self) -> bool {
        self.can_grab.load(Ordering::Relaxed)
    }

    pub fn can_wake_up(&self) -> bool {
        self.can_wake_up.load(Ordering::Relaxed)
    }

    /// The observer to register with the climb controller's signal hub.
    pub fn relay(&self) -> SignalRelay {
        SignalRelay {
            signals: self.clone(),
        }
    }
}

/// Writes emitted capability levels into shared [`AnimSignals`] flags.
pub struct SignalRelay {
    signals: AnimSignals,
}

impl ClimbObserver for SignalRelay {
    fn can_grab(&mut self, can_grab: bool) {
        self.signals.can_grab.store(can_grab, Ordering::Relaxed);
    }

    fn can_wake_up(&mut self, can_wake_up: bool) {
        self.signals.can_wake_up.store(can_wake_up, Ordering::Relaxed);
    }
}

/// Starts queued montages, interrupting whichever clip is active.
///
/// An unknown montage or section is logged and skipped rather than
/// panicking. The dropped request still gets a completion notice, so state
/// that waits on the clip (the climb controller's movement lock) settles
/// instead of hanging forever on a montage that never plays.
pub fn start_queued_montages(
    mut commands: Commands,
    mut finished: MessageWriter<MontageFinished>,
    mut query: Query<(
        Entity,
        &mut MontageQueue,
        &MontageLibrary,
        Option<&PlayingMontage>,
    )>,
) {
    for (entity, mut queue, library, playing) in &mut query {
        let mut active = playing.cloned();
        while let Some((name, section)) = queue.0.pop_front() {
            let Some(montage) = library.get(&name) else {
                warn!("montage `{name}` is not in this character's library");
                finished.write(MontageFinished {
                    montage: name,
                    interrupted: true,
                });
                continue;
            };
            let Some(start) = montage.section_start(&section) else {
                warn!("montage `{name}` has no section `{section}`");
                finished.write(MontageFinished {
                    montage: name,
                    interrupted: true,
                });
                continue;
            };

            if let Some(previous) = active.take() {
                finished.write(MontageFinished {
                    montage: previous.name,
                    interrupted: true,
                });
            }

            let next = PlayingMontage {
                name: montage.name.clone(),
                elapsed: start,
                duration: montage.duration,
            };
            active = Some(next.clone());
            commands.entity(entity).insert(next);
        }
    }
}

/// Advances the active montage and reports completion.
pub fn advance_montages(
    mut commands: Commands,
    mut finished: MessageWriter<MontageFinished>,
    mut query: Query<(Entity, &mut PlayingMontage)>,
    time: Res<Time>,
) {
    let dt = time.delta_secs();

    for (entity, mut playing) in &mut query {
        playing.elapsed += dt;
        if playing.elapsed >= playing.duration {
            finished.write(MontageFinished {
                montage: playing.name.clone(),
                interrupted: false,
            });
            commands.entity(entity).remove::<PlayingMontage>();
        }
    }
}

/// Carries the capsule from the hang anchor to the ledge exit while the
/// wake-up montage plays: up first, then forward, with cubic easing.
pub fn apply_mantle_carry(
    mut query: Query<
        (&mut Transform, &mut PlayerVelocity, &PlayingMontage, &MantleCarry),
        With<Player>,
    >,
) {
    // cubic ease-in-out
    let ease = |x: f32| {
        if x < 0.5 {
            4.0 * x * x * x
        } else {
            1.0 - (-2.0 * x + 2.0).powi(3) / 2.0
        }
    };

    for (mut transform, mut velocity, playing, carry) in &mut query {
        if playing.name != WAKE_UP_MONTAGE {
            continue;
        }

        let t = playing.progress();
        if t <= 0.5 {
            // Phase 1: rise to the exit height, XZ pinned at the anchor.
            let phase = ease(t * 2.0);
            transform.translation.x = carry.start.x;
            transform.translation.y = carry.start.y + (carry.end.y - carry.start.y) * phase;
            transform.translation.z = carry.start.z;
        } else {
            // Phase 2: slide forward onto the ledge at the exit height.
            let phase = ease((t - 0.5) * 2.0);
            transform.translation.x = carry.start.x + (carry.end.x - carry.start.x) * phase;
            transform.translation.y = carry.end.y;
            transform.translation.z = carry.start.z + (carry.end.z - carry.start.z) * phase;
        }

        velocity.0 = Vec3::ZERO;
    }
}
