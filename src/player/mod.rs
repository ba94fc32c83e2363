//! Player character: input, locomotion, climb detection, montages.

mod climb;
mod input;
mod montage;
mod movement;
mod plugin;
mod state;

pub use climb::ClimbZone;
pub use input::{
    ClimbOutAction, ForceAction, JumpAction, LookAction, LookInput, LookRateAction,
    LookRateInput, MoveAction, MoveInput, ZoomAction,
};
pub use montage::{
    AnimSignals, MantleCarry, Montage, MontageFinished, MontageLibrary, MontageQueue,
    PlayingMontage,
};
pub use plugin::{PawnBlueprint, PawnSelector, PlayerPlugin};
pub use state::{
    Climber, Grounded, MaxWalkSpeed, MoveMode, Player, PlayerConfig, PlayerVelocity, Sprint,
};
