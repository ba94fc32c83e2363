//! Ledge detection and the climb state machine.
//!
//! A short forward wall probe and a downward ledge probe run on a throttled
//! cadence. When both hit, the grab signal is raised for the animation
//! layer; if the character is falling it is latched onto the ledge: the
//! movement mode switches to scripted flying, velocity is zeroed, and the
//! capsule snaps to the anchor under the ledge lip. Jumping while latched
//! plays the wake-up montage; montage completion hands control back to
//! normal walking.

use bevy::prelude::*;

use super::clock::{DEFAULT_TRACE_INTERVAL, TraceClock};
use super::services::{
    MontagePlayer, MovementDriver, MovementMode, SignalHub, TraceHit, TraceWorld,
};

/// Montage played when mantling up from the hang.
pub const WAKE_UP_MONTAGE: &str = "wake_up";

/// Entry section of the wake-up montage.
pub const WAKE_UP_SECTION: &str = "start_1";

/// Probe geometry and cadence for climb detection.
#[derive(Debug, Clone, Copy)]
pub struct ClimbConfig {
    /// Forward reach of the wall probe.
    pub wall_reach: f32,
    /// Vertical drop applied to the wall probe so it starts slightly below
    /// the character origin.
    pub height_offset: f32,
    /// Height above the character origin where the ledge probe starts.
    pub ledge_rise: f32,
    /// Forward offset of the ledge probe start.
    pub ledge_forward: f32,
    /// Downward length of the ledge probe.
    pub ledge_drop: f32,
    /// Capsule half height; the hang anchor sits this far below the ledge
    /// surface.
    pub capsule_half_height: f32,
    /// Forward offset past the wall impact for the mantle exit point.
    pub mantle_exit_forward: f32,
    /// Wall-clock seconds between detection passes.
    pub trace_interval: f32,
}

impl Default for ClimbConfig {
    fn default() -> Self {
        Self {
            wall_reach: 150.0,
            height_offset: 0.0,
            ledge_rise: 200.0,
            ledge_forward: 70.0,
            ledge_drop: 250.0,
            capsule_half_height: 96.0,
            mantle_exit_forward: 56.0,
            trace_interval: DEFAULT_TRACE_INTERVAL,
        }
    }
}

/// Per-tick execution context sampled from the host transform system.
#[derive(Debug, Clone, Copy)]
pub struct TickContext {
    /// Seconds since the previous tick.
    pub dt: f32,
    /// Character origin in world space.
    pub position: Vec3,
    /// Character facing, horizontal unit vector.
    pub forward: Vec3,
}

/// Climb detection and state, owned by the player character.
pub struct ClimbController {
    config: ClimbConfig,
    clock: TraceClock,
    can_trace: bool,
    is_climbing: bool,
    disable_movement: bool,
    wall_hit: Option<TraceHit>,
    ledge_hit: Option<TraceHit>,
    /// Capability signals consumed by the animation layer.
    pub signals: SignalHub,
}

impl ClimbController {
    pub fn new(config: ClimbConfig) -> Self {
        Self {
            clock: TraceClock::new(config.trace_interval),
            config,
            can_trace: false,
            is_climbing: false,
            disable_movement: false,
            wall_hit: None,
            ledge_hit: None,
            signals: SignalHub::default(),
        }
    }

    pub fn config(&self) -> &ClimbConfig {
        &self.config
    }

    /// Gate set by the overlap sensor: entering a climb zone enables
    /// detection, leaving it disables detection.
    pub fn set_can_trace(&mut self, can_trace: bool) {
        self.can_trace = can_trace;
    }

    pub fn can_trace(&self) -> bool {
        self.can_trace
    }

    pub fn is_climbing(&self) -> bool {
        self.is_climbing
    }

    /// True while the mantle montage suppresses directional input.
    pub fn movement_disabled(&self) -> bool {
        self.disable_movement
    }

    /// Whether directional movement input may be applied this tick.
    /// Suppressed input is dropped, never queued.
    pub fn movement_allowed(&self) -> bool {
        !self.disable_movement && !self.is_climbing
    }

    /// Last successful wall probe, overwritten each detection pass.
    pub fn wall_hit(&self) -> Option<TraceHit> {
        self.wall_hit
    }

    /// Last successful ledge probe, overwritten each detection pass.
    pub fn ledge_hit(&self) -> Option<TraceHit> {
        self.ledge_hit
    }

    /// Where the capsule ends up after a completed mantle: past the wall
    /// impact along `forward`, standing on the ledge surface.
    pub fn mantle_exit(&self, forward: Vec3) -> Option<Vec3> {
        let wall = self.wall_hit?;
        let ledge = self.ledge_hit?;
        let exit = wall.point + forward * self.config.mantle_exit_forward;
        Some(Vec3::new(
            exit.x,
            ledge.point.y + self.config.capsule_half_height,
            exit.z,
        ))
    }

    /// Runs a detection pass if the throttle fires and tracing is enabled.
    ///
    /// Both probes must hit for the grab signal to rise; the signal is
    /// re-emitted with its current value every qualifying pass. A falling,
    /// not-yet-climbing character latches: flying mode, motion stopped,
    /// capsule snapped to the anchor under the ledge lip.
    pub fn tick(
        &mut self,
        ctx: &TickContext,
        world: &impl TraceWorld,
        movement: &mut impl MovementDriver,
    ) {
        if !self.clock.tick(ctx.dt) {
            return;
        }
        if !self.can_trace {
            return;
        }

        let wall = self.found_wall(world, ctx.position, ctx.forward);
        let ledge = match wall {
            Some(_) => self.found_ledge(world, ctx.position, ctx.forward),
            None => None,
        };

        if let (Some(wall), Some(ledge)) = (wall, ledge) {
            self.wall_hit = Some(wall);
            self.ledge_hit = Some(ledge);
            self.signals.can_grab(true);

            if movement.is_falling() && !self.is_climbing {
                let anchor = Vec3::new(
                    wall.point.x,
                    ledge.point.y - self.config.capsule_half_height,
                    wall.point.z,
                );
                movement.set_mode(MovementMode::Flying);
                movement.set_position(anchor);
                movement.stop_immediately();
                self.is_climbing = true;
                debug!("latched onto ledge at {anchor}");
            }
        } else {
            self.signals.can_grab(false);
        }

        self.signals.can_wake_up(self.is_climbing);
    }

    /// Jump input while latched starts the mantle: the latch clears,
    /// directional input is suppressed, and the wake-up montage plays from
    /// its entry section. The movement mode stays scripted until the
    /// montage completes.
    ///
    /// Returns whether a mantle was started.
    pub fn on_jump(&mut self, anim: &mut impl MontagePlayer) -> bool {
        if !self.is_climbing {
            return false;
        }
        self.is_climbing = false;
        self.disable_movement = true;
        anim.play(WAKE_UP_MONTAGE, WAKE_UP_SECTION);
        true
    }

    /// Montage-complete callback. Only the wake-up montage is of interest:
    /// it restores walking, lowers both signals, and re-enables movement.
    pub fn on_montage_ended(
        &mut self,
        montage: &str,
        _interrupted: bool,
        movement: &mut impl MovementDriver,
    ) {
        if montage != WAKE_UP_MONTAGE {
            return;
        }
        movement.set_mode(MovementMode::Walking);
        self.signals.can_grab(false);
        self.signals.can_wake_up(false);
        self.disable_movement = false;
    }

    /// Escape hatch independent of animation completion: drop the latch,
    /// stop tracing until the sensor re-arms, and restore walking.
    pub fn climb_out(&mut self, movement: &mut impl MovementDriver) {
        if !self.is_climbing {
            return;
        }
        self.can_trace = false;
        self.is_climbing = false;
        self.disable_movement = false;
        movement.set_mode(MovementMode::Walking);
        self.signals.can_grab(false);
        self.signals.can_wake_up(false);
    }

    /// Short forward ray starting slightly below the character origin and
    /// ending at full reach at origin height; hits only static world
    /// geometry.
    fn found_wall(
        &self,
        world: &impl TraceWorld,
        position: Vec3,
        forward: Vec3,
    ) -> Option<TraceHit> {
        let start = position - Vec3::Y * self.config.height_offset;
        let end = position + forward * self.config.wall_reach;
        world.line_trace(start, end)
    }

    /// Downward ray from above and ahead of the character, confirming a
    /// horizontal surface near the top of the wall rather than a sheer,
    /// ledge-less face.
    fn found_ledge(
        &self,
        world: &impl TraceWorld,
        position: Vec3,
        forward: Vec3,
    ) -> Option<TraceHit> {
        let start =
            position + Vec3::Y * self.config.ledge_rise + forward * self.config.ledge_forward;
        let end = start - Vec3::Y * self.config.ledge_drop;
        world.line_trace(start, end)
    }
}

impl Default for ClimbController {
    fn default() -> Self {
        Self::new(ClimbConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::services::ClimbObserver;
    use std::cell::Cell;
    use std::sync::{Arc, Mutex};

    const DT: f32 = 1.0 / 60.0;

    /// Scripted world: answers probes from fixed planes and counts calls.
    struct ScriptedWorld {
        /// X of the wall face, if any.
        wall_x: Option<f32>,
        /// Y of the ledge surface, if any.
        ledge_y: Option<f32>,
        traces: Cell<usize>,
    }

    impl ScriptedWorld {
        fn with_wall_and_ledge(wall_x: f32, ledge_y: f32) -> Self {
            Self {
                wall_x: Some(wall_x),
                ledge_y: Some(ledge_y),
                traces: Cell::new(0),
            }
        }

        fn empty() -> Self {
            Self {
                wall_x: None,
                ledge_y: None,
                traces: Cell::new(0),
            }
        }
    }

    impl TraceWorld for ScriptedWorld {
        fn line_trace(&self, start: Vec3, end: Vec3) -> Option<TraceHit> {
            self.traces.set(self.traces.get() + 1);
            let dir = end - start;
            if dir.y < -1.0 {
                // Downward ledge probe.
                let surface = self.ledge_y?;
                (end.y <= surface && start.y >= surface)
                    .then(|| TraceHit::new(Vec3::new(start.x, surface, start.z)))
            } else {
                // Forward wall probe.
                let face = self.wall_x?;
                (start.x <= face && end.x >= face)
                    .then(|| TraceHit::new(Vec3::new(face, start.y, start.z)))
            }
        }
    }

    #[derive(Default)]
    struct FakeMovement {
        mode: MovementMode,
        position: Option<Vec3>,
        stopped: bool,
    }

    impl MovementDriver for FakeMovement {
        fn mode(&self) -> MovementMode {
            self.mode
        }

        fn set_mode(&mut self, mode: MovementMode) {
            self.mode = mode;
        }

        fn stop_immediately(&mut self) {
            self.stopped = true;
        }

        fn set_position(&mut self, position: Vec3) {
            self.position = Some(position);
        }
    }

    #[derive(Default)]
    struct FakeAnim {
        played: Vec<(String, String)>,
    }

    impl MontagePlayer for FakeAnim {
        fn play(&mut self, montage: &str, section: &str) {
            self.played.push((montage.to_string(), section.to_string()));
        }
    }

    /// Records every emitted level of the grab signal.
    struct GrabLog(Arc<Mutex<Vec<bool>>>);

    impl ClimbObserver for GrabLog {
        fn can_grab(&mut self, can_grab: bool) {
            self.0.lock().unwrap().push(can_grab);
        }
    }

    fn falling_controller() -> (ClimbController, FakeMovement) {
        let mut controller = ClimbController::default();
        controller.set_can_trace(true);
        let movement = FakeMovement {
            mode: MovementMode::Falling,
            ..Default::default()
        };
        (controller, movement)
    }

    fn ctx(position: Vec3) -> TickContext {
        TickContext {
            dt: DT,
            position,
            forward: Vec3::X,
        }
    }

    #[test]
    fn latches_when_both_probes_hit_while_falling() {
        let (mut controller, mut movement) = falling_controller();
        let world = ScriptedWorld::with_wall_and_ledge(100.0, 120.0);

        controller.tick(&ctx(Vec3::ZERO), &world, &mut movement);

        assert!(controller.is_climbing());
        assert_eq!(movement.mode, MovementMode::Flying);
        assert!(movement.stopped);
        // Anchor: wall impact horizontally, ledge surface minus half height
        // vertically.
        assert_eq!(movement.position, Some(Vec3::new(100.0, 120.0 - 96.0, 0.0)));
    }

    #[test]
    fn does_not_latch_when_walking() {
        let (mut controller, _) = falling_controller();
        let mut movement = FakeMovement::default();
        let world = ScriptedWorld::with_wall_and_ledge(100.0, 120.0);

        controller.tick(&ctx(Vec3::ZERO), &world, &mut movement);

        assert!(!controller.is_climbing());
        assert_eq!(movement.mode, MovementMode::Walking);
        assert!(movement.position.is_none());
    }

    #[test]
    fn grab_signal_tracks_probe_outcome_each_qualifying_tick() {
        let (mut controller, mut movement) = falling_controller();
        let log = Arc::new(Mutex::new(Vec::new()));
        controller.signals.register(GrabLog(log.clone()));

        let world = ScriptedWorld::with_wall_and_ledge(100.0, 120.0);
        controller.tick(&ctx(Vec3::ZERO), &world, &mut movement);
        // Nine throttled ticks emit nothing.
        for _ in 0..9 {
            controller.tick(&ctx(Vec3::ZERO), &world, &mut movement);
        }
        // A miss lowers the level; re-emitted, not edge-triggered.
        let empty = ScriptedWorld::empty();
        controller.tick(&ctx(Vec3::ZERO), &empty, &mut movement);
        for _ in 0..9 {
            controller.tick(&ctx(Vec3::ZERO), &empty, &mut movement);
        }
        controller.tick(&ctx(Vec3::ZERO), &empty, &mut movement);

        assert_eq!(*log.lock().unwrap(), vec![true, false, false]);
    }

    #[test]
    fn wall_hit_without_ledge_does_not_raise_grab() {
        let (mut controller, mut movement) = falling_controller();
        let log = Arc::new(Mutex::new(Vec::new()));
        controller.signals.register(GrabLog(log.clone()));

        // Sheer wall: no horizontal surface within the ledge probe.
        let world = ScriptedWorld {
            wall_x: Some(100.0),
            ledge_y: None,
            traces: Cell::new(0),
        };
        controller.tick(&ctx(Vec3::ZERO), &world, &mut movement);

        assert_eq!(*log.lock().unwrap(), vec![false]);
        assert!(!controller.is_climbing());
        // Wall probe ran, ledge probe ran and missed.
        assert_eq!(world.traces.get(), 2);
    }

    #[test]
    fn ledge_probe_is_skipped_when_wall_misses() {
        let (mut controller, mut movement) = falling_controller();
        let world = ScriptedWorld {
            wall_x: None,
            ledge_y: Some(120.0),
            traces: Cell::new(0),
        };

        controller.tick(&ctx(Vec3::ZERO), &world, &mut movement);

        assert_eq!(world.traces.get(), 1);
    }

    #[test]
    fn no_trace_attempted_while_gate_is_closed() {
        let (mut controller, mut movement) = falling_controller();
        controller.set_can_trace(false);
        let world = ScriptedWorld::with_wall_and_ledge(100.0, 120.0);

        for _ in 0..30 {
            controller.tick(&ctx(Vec3::ZERO), &world, &mut movement);
        }

        assert_eq!(world.traces.get(), 0);
        assert!(!controller.is_climbing());
    }

    #[test]
    fn detection_is_throttled_between_passes() {
        let (mut controller, mut movement) = falling_controller();
        let world = ScriptedWorld::with_wall_and_ledge(100.0, 120.0);

        for _ in 0..30 {
            controller.tick(&ctx(Vec3::ZERO), &world, &mut movement);
        }

        // Three qualifying passes (ticks 0, 10, 20), two probes each.
        assert_eq!(world.traces.get(), 6);
    }

    #[test]
    fn jump_while_latched_starts_wake_up_montage() {
        let (mut controller, mut movement) = falling_controller();
        let world = ScriptedWorld::with_wall_and_ledge(100.0, 120.0);
        controller.tick(&ctx(Vec3::ZERO), &world, &mut movement);

        let mut anim = FakeAnim::default();
        assert!(controller.on_jump(&mut anim));

        assert!(!controller.is_climbing());
        assert!(controller.movement_disabled());
        assert!(!controller.movement_allowed());
        // Mode stays scripted until the montage completes.
        assert_eq!(movement.mode, MovementMode::Flying);
        assert_eq!(
            anim.played,
            vec![(WAKE_UP_MONTAGE.to_string(), WAKE_UP_SECTION.to_string())]
        );
    }

    #[test]
    fn jump_without_latch_is_ignored() {
        let mut controller = ClimbController::default();
        let mut anim = FakeAnim::default();
        assert!(!controller.on_jump(&mut anim));
        assert!(anim.played.is_empty());
    }

    #[test]
    fn wake_up_completion_restores_walking() {
        let (mut controller, mut movement) = falling_controller();
        let world = ScriptedWorld::with_wall_and_ledge(100.0, 120.0);
        controller.tick(&ctx(Vec3::ZERO), &world, &mut movement);
        controller.on_jump(&mut FakeAnim::default());

        controller.on_montage_ended(WAKE_UP_MONTAGE, false, &mut movement);

        assert_eq!(movement.mode, MovementMode::Walking);
        assert!(!controller.movement_disabled());
        assert!(controller.movement_allowed());
    }

    #[test]
    fn interrupted_wake_up_completion_also_restores_walking() {
        let (mut controller, mut movement) = falling_controller();
        let world = ScriptedWorld::with_wall_and_ledge(100.0, 120.0);
        controller.tick(&ctx(Vec3::ZERO), &world, &mut movement);
        controller.on_jump(&mut FakeAnim::default());

        // A clip the host never plays is reported as an interrupted
        // completion; the movement lock must still release.
        controller.on_montage_ended(WAKE_UP_MONTAGE, true, &mut movement);

        assert_eq!(movement.mode, MovementMode::Walking);
        assert!(!controller.movement_disabled());
        assert!(controller.movement_allowed());
    }

    #[test]
    fn wall_probe_drops_only_its_start() {
        struct CaptureFirst(Cell<Option<(Vec3, Vec3)>>);

        impl TraceWorld for CaptureFirst {
            fn line_trace(&self, start: Vec3, end: Vec3) -> Option<TraceHit> {
                if self.0.get().is_none() {
                    self.0.set(Some((start, end)));
                }
                None
            }
        }

        let mut controller = ClimbController::new(ClimbConfig {
            height_offset: 20.0,
            ..Default::default()
        });
        controller.set_can_trace(true);
        let mut movement = FakeMovement {
            mode: MovementMode::Falling,
            ..Default::default()
        };
        let world = CaptureFirst(Cell::new(None));

        controller.tick(&ctx(Vec3::new(0.0, 150.0, 0.0)), &world, &mut movement);

        // The offset lowers where the ray starts; it still ends at full
        // reach at origin height.
        let (start, end) = world.0.get().unwrap();
        assert_eq!(start, Vec3::new(0.0, 130.0, 0.0));
        assert_eq!(end, Vec3::new(150.0, 150.0, 0.0));
    }

    #[test]
    fn other_montages_are_ignored_by_the_completion_callback() {
        let (mut controller, mut movement) = falling_controller();
        let world = ScriptedWorld::with_wall_and_ledge(100.0, 120.0);
        controller.tick(&ctx(Vec3::ZERO), &world, &mut movement);
        controller.on_jump(&mut FakeAnim::default());

        controller.on_montage_ended("flourish", false, &mut movement);

        assert_eq!(movement.mode, MovementMode::Flying);
        assert!(controller.movement_disabled());
    }

    #[test]
    fn climb_out_always_leaves_movement_enabled() {
        let (mut controller, mut movement) = falling_controller();
        let world = ScriptedWorld::with_wall_and_ledge(100.0, 120.0);
        controller.tick(&ctx(Vec3::ZERO), &world, &mut movement);
        assert!(controller.is_climbing());

        controller.climb_out(&mut movement);

        assert!(!controller.is_climbing());
        assert!(!controller.movement_disabled());
        assert!(!controller.can_trace());
        assert_eq!(movement.mode, MovementMode::Walking);
    }

    #[test]
    fn full_fall_latch_mantle_flow() {
        let (mut controller, mut movement) = falling_controller();
        let world = ScriptedWorld::with_wall_and_ledge(100.0, 120.0);
        let mut anim = FakeAnim::default();

        // Falling through the zone, the first qualifying pass latches.
        controller.tick(&ctx(Vec3::new(0.0, 150.0, 0.0)), &world, &mut movement);
        assert!(controller.is_climbing());
        assert_eq!(movement.mode, MovementMode::Flying);

        // Hanging; jump starts the mantle and the montage.
        controller.on_jump(&mut anim);
        assert_eq!(anim.played.len(), 1);
        assert!(controller.movement_disabled());

        // Detection keeps running during the mantle without re-latching.
        for _ in 0..10 {
            controller.tick(&ctx(Vec3::new(0.0, 150.0, 0.0)), &world, &mut movement);
        }
        assert!(!controller.is_climbing());
        assert_eq!(movement.mode, MovementMode::Flying);

        // Montage completion hands control back.
        controller.on_montage_ended(WAKE_UP_MONTAGE, false, &mut movement);
        assert_eq!(movement.mode, MovementMode::Walking);
        assert!(controller.movement_allowed());
    }

    #[test]
    fn mantle_exit_sits_on_the_ledge_surface() {
        let (mut controller, mut movement) = falling_controller();
        let world = ScriptedWorld::with_wall_and_ledge(100.0, 120.0);
        controller.tick(&ctx(Vec3::ZERO), &world, &mut movement);

        let exit = controller.mantle_exit(Vec3::X).unwrap();
        assert_eq!(exit, Vec3::new(156.0, 216.0, 0.0));
    }
}
