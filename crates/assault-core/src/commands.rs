//! Player commands sent from the host to the simulation.
//!
//! Commands are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::enums::WeaponKind;

/// All possible player actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    /// Continuous steering signal; clamped to road bounds.
    SetTargetX { x: f64 },
    /// Activate a consumable weapon charge by slot key.
    ActivateWeapon { weapon: WeaponKind },

    /// Buy a tier of the open reinforcement offer with run score.
    BuyReinforcement { tier: usize },
    /// Close the reinforcement offer and resume play.
    CloseReinforcements,

    /// Start a new run (from idle or game over).
    StartRun,
    /// Pause the simulation; the whole tick freezes.
    Pause,
    /// Resume from pause.
    Resume,
}
