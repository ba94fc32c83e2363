use bevy::ecs::observer::On;
use bevy::prelude::{Component, Deref, DerefMut, Query, Res, Touches, Vec2, With};
use bevy_enhanced_input::prelude::*;

use super::state::Player;

/// Move in a direction (WASD)
#[derive(Debug, InputAction)]
#[action_output(Vec2)]
pub struct MoveAction;

/// Look around (mouse delta)
#[derive(Debug, InputAction)]
#[action_output(Vec2)]
pub struct LookAction;

/// Look around at a fixed rate (arrow keys / analog-style devices)
#[derive(Debug, InputAction)]
#[action_output(Vec2)]
pub struct LookRateAction;

/// Jump action; also starts the mantle while latched to a ledge
#[derive(Debug, InputAction)]
#[action_output(bool)]
pub struct JumpAction;

/// Sprint ("force") toggle action
#[derive(Debug, InputAction)]
#[action_output(bool)]
pub struct ForceAction;

/// Bail out of the ledge hang
#[derive(Debug, InputAction)]
#[action_output(bool)]
pub struct ClimbOutAction;

/// Camera zoom; positive values zoom in, negative zoom out
#[derive(Debug, InputAction)]
#[action_output(f32)]
pub struct ZoomAction;

/// Stores the current movement input vector
#[derive(Component, Default, Deref, DerefMut)]
pub struct MoveInput(pub Vec2);

/// Stores the current look input delta
#[derive(Component, Default, Deref, DerefMut)]
pub struct LookInput(pub Vec2);

/// Stores the current rate-look input (normalized, scaled by time)
#[derive(Component, Default, Deref, DerefMut)]
pub struct LookRateInput(pub Vec2);

/// Stores whether jump was pressed this tick
#[derive(Component, Default)]
pub struct JumpPressed(pub bool);

/// Stores whether the force toggle was pressed this tick
#[derive(Component, Default)]
pub struct ForcePressed(pub bool);

/// Stores whether climb-out was pressed this tick
#[derive(Component, Default)]
pub struct ClimbOutPressed(pub bool);

/// System to handle move input via observer
pub fn handle_move_input(trigger: On<Fire<MoveAction>>, mut query: Query<&mut MoveInput>) {
    if let Ok(mut move_input) = query.get_mut(trigger.event_target()) {
        move_input.0 = trigger.value;
    }
}

/// Clear move input when all movement keys are released
pub fn handle_move_end(trigger: On<Complete<MoveAction>>, mut query: Query<&mut MoveInput>) {
    if let Ok(mut move_input) = query.get_mut(trigger.event_target()) {
        move_input.0 = Vec2::ZERO;
    }
}

/// System to handle look input via observer
pub fn handle_look_input(trigger: On<Fire<LookAction>>, mut query: Query<&mut LookInput>) {
    if let Ok(mut look_input) = query.get_mut(trigger.event_target()) {
        look_input.0 = trigger.value;
    }
}

/// System to handle rate-look input via observer
pub fn handle_look_rate_input(
    trigger: On<Fire<LookRateAction>>,
    mut query: Query<&mut LookRateInput>,
) {
    if let Ok(mut look_rate) = query.get_mut(trigger.event_target()) {
        look_rate.0 = trigger.value;
    }
}

/// Clear rate-look input when the keys are released
pub fn handle_look_rate_end(
    trigger: On<Complete<LookRateAction>>,
    mut query: Query<&mut LookRateInput>,
) {
    if let Ok(mut look_rate) = query.get_mut(trigger.event_target()) {
        look_rate.0 = Vec2::ZERO;
    }
}

/// Handle jump press
pub fn handle_jump_start(trigger: On<Start<JumpAction>>, mut query: Query<&mut JumpPressed>) {
    if let Ok(mut jump) = query.get_mut(trigger.event_target()) {
        jump.0 = true;
    }
}

/// Handle force toggle press
pub fn handle_force_start(trigger: On<Start<ForceAction>>, mut query: Query<&mut ForcePressed>) {
    if let Ok(mut force) = query.get_mut(trigger.event_target()) {
        force.0 = true;
    }
}

/// Handle climb-out press
pub fn handle_climb_out_start(
    trigger: On<Start<ClimbOutAction>>,
    mut query: Query<&mut ClimbOutPressed>,
) {
    if let Ok(mut climb_out) = query.get_mut(trigger.event_target()) {
        climb_out.0 = true;
    }
}

/// Touch begin triggers a jump press, mirroring the tap-to-jump binding.
pub fn touch_to_jump(touches: Res<Touches>, mut query: Query<&mut JumpPressed, With<Player>>) {
    if !touches.any_just_pressed() {
        return;
    }
    for mut jump in &mut query {
        jump.0 = true;
    }
}

/// Clears the one-shot pressed flags at the end of the fixed tick.
pub fn clear_tick_inputs(
    mut query: Query<(&mut JumpPressed, &mut ForcePressed, &mut ClimbOutPressed)>,
) {
    for (mut jump, mut force, mut climb_out) in &mut query {
        jump.0 = false;
        force.0 = false;
        climb_out.0 = false;
    }
}

/// Clears look input each frame
pub fn clear_look_input(mut query: Query<&mut LookInput>) {
    for mut look in &mut query {
        look.0 = Vec2::ZERO;
    }
}
