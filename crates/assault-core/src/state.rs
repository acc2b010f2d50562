//! Game state snapshot — the complete visible state handed to the host
//! after each tick. Read-only to renderers/UI; mutated only by the tick.

use serde::{Deserialize, Serialize};

use crate::components::GateOption;
use crate::economy::ReinforcementOffer;
use crate::enums::*;
use crate::events::SimEvent;
use crate::types::{Position, SimTime, Velocity};

/// Complete state broadcast to the host after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,

    pub camera_z: f64,
    pub player_x: f64,
    pub wave: u32,
    pub score: u32,
    pub squad_count: u32,
    pub peak_squad: u32,
    pub kill_count: u32,

    pub combo_count: u32,
    pub combo_timer_ms: f64,
    pub best_combo: u32,

    pub weapon: WeaponKind,
    pub weapon_timer_ms: f64,
    pub skill_cooldown_ms: f64,
    pub skill_ready: bool,

    /// Currencies earned this run (already credited to PlayerData).
    pub coins_collected: u32,
    pub gems_collected: u32,

    pub enemies: Vec<EnemyView>,
    pub bullets: Vec<BulletView>,
    pub enemy_bullets: Vec<EnemyBulletView>,
    pub gates: Vec<GateView>,
    pub barrels: Vec<BarrelView>,
    pub pickups: Vec<PickupView>,

    /// Open reinforcement offer, present only in the Reinforcing phase.
    pub reinforcements: Option<ReinforcementView>,

    /// Feedback events emitted during this tick.
    pub events: Vec<SimEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyView {
    pub position: Position,
    pub hp: i32,
    pub max_hp: i32,
    pub class: EnemyClass,
    pub kind: EnemyKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulletView {
    pub position: Position,
    pub velocity: Velocity,
    pub weapon: WeaponKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyBulletView {
    pub position: Position,
    pub velocity: Velocity,
    pub kind: EnemyBulletKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateView {
    pub z: f64,
    pub options: Vec<GateOption>,
    pub triggered: bool,
    pub fade_timer: u32,
    pub chosen: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BarrelView {
    pub position: Position,
    pub hp: i32,
    /// True when a chained detonation is pending.
    pub chained: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickupView {
    pub position: Position,
    pub height: f64,
    pub kind: PickupKind,
    pub value: u32,
}

/// The open mid-run reinforcement offer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReinforcementView {
    pub offers: [ReinforcementOffer; 3],
    /// Tiers already bought this opening.
    pub bought: [bool; 3],
}
