use avian3d::prelude::*;
use bevy::prelude::*;
use bevy_enhanced_input::prelude::*;

use super::climb::*;
use super::input::{
    ClimbOutAction, ClimbOutPressed, ForceAction, ForcePressed, JumpAction, JumpPressed,
    LookAction, LookInput, LookRateAction, LookRateInput, MoveAction, MoveInput, ZoomAction,
    clear_look_input, clear_tick_inputs, handle_climb_out_start, handle_force_start,
    handle_jump_start, handle_look_input, handle_look_rate_end, handle_look_rate_input,
    handle_move_end, handle_move_input, touch_to_jump,
};
use super::montage::{
    AnimSignals, MontageFinished, MontageLibrary, MontageQueue, advance_montages,
    apply_mantle_carry, start_queued_montages,
};
use super::movement::*;
use super::state::*;
use crate::camera::{
    CameraBoom, CameraConfig, CameraPitch, CameraYaw, FollowCamera, PitchAngle,
};
use crate::control::{CameraArm, ClimbConfig, ClimbController, SprintConfig, SprintState};
use crate::physics::GameLayer;

/// Everything needed to spawn one playable character.
#[derive(Debug, Clone)]
pub struct PawnBlueprint {
    pub name: String,
    pub spawn_point: Vec3,
    pub player: PlayerConfig,
    pub sprint: SprintConfig,
    pub climb: ClimbConfig,
    pub camera_arm: CameraArm,
}

impl Default for PawnBlueprint {
    fn default() -> Self {
        Self {
            name: "adventurer".to_string(),
            spawn_point: Vec3::new(0.0, 96.0, 0.0),
            player: PlayerConfig::default(),
            sprint: SprintConfig::default(),
            climb: ClimbConfig::default(),
            camera_arm: CameraArm::default(),
        }
    }
}

/// Registry of spawnable characters. The selected blueprint is the one the
/// startup spawn uses; hosts can register variants and switch before
/// startup runs.
#[derive(Resource, Debug, Clone)]
pub struct PawnSelector {
    blueprints: Vec<PawnBlueprint>,
    selected: usize,
}

impl PawnSelector {
    pub fn register(&mut self, blueprint: PawnBlueprint) {
        self.blueprints.push(blueprint);
    }

    /// Selects the blueprint with the given name, if registered.
    pub fn select(&mut self, name: &str) -> bool {
        match self.blueprints.iter().position(|b| b.name == name) {
            Some(index) => {
                self.selected = index;
                true
            }
            None => {
                warn!("no pawn blueprint named `{name}`");
                false
            }
        }
    }

    pub fn selected(&self) -> &PawnBlueprint {
        &self.blueprints[self.selected]
    }
}

impl Default for PawnSelector {
    fn default() -> Self {
        Self {
            blueprints: vec![PawnBlueprint::default()],
            selected: 0,
        }
    }
}

/// Plugin for the third-person player character.
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EnhancedInputPlugin);

        // Register input context for player
        app.add_input_context::<Player>();
        app.init_resource::<PawnSelector>();
        app.add_message::<MontageFinished>();

        // Input observers
        app.add_observer(handle_move_input);
        app.add_observer(handle_move_end);
        app.add_observer(handle_look_input);
        app.add_observer(handle_look_rate_input);
        app.add_observer(handle_look_rate_end);
        app.add_observer(handle_jump_start);
        app.add_observer(handle_force_start);
        app.add_observer(handle_climb_out_start);

        // Spawn the selected pawn on startup
        app.add_systems(Startup, spawn_player);

        app.add_systems(Update, touch_to_jump);

        // Fixed update systems for physics and the climb state machine
        app.add_systems(
            FixedUpdate,
            (
                update_climb_sensor,
                detect_climb,
                handle_climb_actions,
                start_queued_montages,
                advance_montages,
                relay_montage_finished,
                apply_mantle_carry,
                update_grounded,
                update_sprint,
                handle_jump,
                yaw_plane_movement,
                apply_gravity,
                orient_to_movement,
                apply_velocity,
                clear_tick_inputs,
            )
                .chain(),
        );

        // Clear look input at end of frame (tick inputs clear in FixedUpdate)
        app.add_systems(Last, clear_look_input);
    }
}

/// Spawns the selected pawn and its camera rig.
fn spawn_player(mut commands: Commands, selector: Res<PawnSelector>) {
    let blueprint = selector.selected();
    let config = blueprint.player;

    // Spawn yaw entity (rotates on Y axis for left/right look)
    let yaw_entity = commands
        .spawn((
            CameraYaw,
            Transform::from_translation(blueprint.spawn_point),
            Visibility::default(),
        ))
        .id();

    // Spawn pitch entity as child (rotates on X axis for up/down look),
    // carrying the boom state
    let pitch_entity = commands
        .spawn((
            CameraPitch,
            PitchAngle::default(),
            CameraConfig::default(),
            CameraBoom(blueprint.camera_arm),
            Transform::default(),
            Visibility::default(),
        ))
        .id();

    // Spawn camera at the end of the boom, looking back at the pivot
    let camera_entity = commands
        .spawn((
            FollowCamera,
            Camera3d::default(),
            Projection::Perspective(PerspectiveProjection {
                fov: 60.0_f32.to_radians(),
                ..default()
            }),
            Transform::from_translation(Vec3::new(0.0, 0.0, blueprint.camera_arm.length)),
        ))
        .id();

    // Set up hierarchy: yaw -> pitch -> camera
    commands.entity(yaw_entity).add_child(pitch_entity);
    commands.entity(pitch_entity).add_child(camera_entity);

    // Wire the animation signal flags into the climb controller
    let signals = AnimSignals::default();
    let mut climber = ClimbController::new(blueprint.climb);
    climber.signals.register(signals.relay());

    // Spawn player body
    let capsule_height = (config.half_height - config.radius) * 2.0;

    commands
        .spawn((
            Player,
            config,
            PlayerVelocity::default(),
            MaxWalkSpeed(config.base_max_speed),
            MoveMode::default(),
            Sprint(SprintState::new(blueprint.sprint)),
            Climber(climber),
            ZonePresence::default(),
            signals,
            MontageLibrary::default(),
            MontageQueue::default(),
        ))
        .insert((
            // Input state
            MoveInput::default(),
            LookInput::default(),
            LookRateInput::default(),
            JumpPressed::default(),
            ForcePressed::default(),
            ClimbOutPressed::default(),
        ))
        .insert((
            // Physics - Dynamic body with locked rotation, let Avian handle collisions
            RigidBody::Dynamic,
            Collider::capsule(config.radius, capsule_height),
            CollisionLayers::new(GameLayer::Player, [GameLayer::World, GameLayer::Trigger]),
            LockedAxes::ROTATION_LOCKED,
            LinearVelocity::default(),
            TranslationInterpolation,
            Friction::new(0.0),
            Restitution::new(0.0),
            GravityScale(0.0), // Gravity is applied by the movement systems
        ))
        .insert((
            // Transform
            Transform::from_translation(blueprint.spawn_point),
            Visibility::default(),
        ))
        .insert(
            // Input bindings
            actions!(Player[
                (
                    Action::<MoveAction>::new(),
                    bindings![
                        (KeyCode::KeyW, SwizzleAxis::YXZ),
                        (KeyCode::KeyS, SwizzleAxis::YXZ, Negate::all()),
                        KeyCode::KeyD,
                        (KeyCode::KeyA, Negate::all()),
                    ],
                ),
                (
                    Action::<LookAction>::new(),
                    bindings![
                        Binding::mouse_motion(),
                    ],
                ),
                (
                    Action::<LookRateAction>::new(),
                    bindings![
                        (KeyCode::ArrowUp, SwizzleAxis::YXZ),
                        (KeyCode::ArrowDown, SwizzleAxis::YXZ, Negate::all()),
                        KeyCode::ArrowRight,
                        (KeyCode::ArrowLeft, Negate::all()),
                    ],
                ),
                (
                    Action::<JumpAction>::new(),
                    bindings![KeyCode::Space, GamepadButton::South],
                ),
                (
                    Action::<ForceAction>::new(),
                    bindings![KeyCode::ShiftLeft, GamepadButton::LeftTrigger],
                ),
                (
                    Action::<ClimbOutAction>::new(),
                    bindings![KeyCode::KeyC, GamepadButton::East],
                ),
                (
                    Action::<ZoomAction>::new(),
                    // Vertical wheel delta arrives on Y; swizzle it into the
                    // action's scalar axis.
                    bindings![(Binding::mouse_wheel(), SwizzleAxis::YXZ)],
                ),
            ]),
        );
}
