//! Per-run mutable state owned by the engine and threaded through systems.

use assault_core::constants::*;
use assault_core::economy::{PlayerData, ReinforcementOffer};
use assault_core::enums::WeaponKind;

/// The open reinforcement offer, set on mega-boss kill and cleared by
/// `CloseReinforcements`.
#[derive(Debug, Clone)]
pub struct ReinforcementState {
    pub offers: [ReinforcementOffer; 3],
    pub bought: [bool; 3],
}

/// All non-entity run state: camera, player, squad, timers, scoring.
#[derive(Debug, Clone)]
pub struct RunState {
    pub camera_z: f64,
    pub player_x: f64,
    /// Continuous steering target from the host, None until first input.
    pub target_x: Option<f64>,

    pub wave: u32,
    pub score: u32,
    pub kill_count: u32,

    /// Squad size: both health and damage multiplier. Clamped to 0;
    /// reaching 0 ends the run.
    pub squad_count: u32,
    /// Run maximum, feeding adaptive difficulty.
    pub peak_squad: u32,
    /// Set synchronously when squad hits 0; later damage checks skip.
    pub over: bool,

    pub combo_count: u32,
    pub combo_timer_ms: f64,
    pub best_combo: u32,

    pub weapon: WeaponKind,
    pub weapon_timer_ms: f64,
    pub skill_cooldown_ms: f64,
    pub skill_ready: bool,
    pub shoot_timer_ms: f64,

    pub next_wave_z: f64,
    pub next_gate_z: f64,

    pub coins_collected: u32,
    pub gems_collected: u32,

    pub reinforcements: Option<ReinforcementState>,
    /// How many times the reinforcement offer has opened this run.
    pub reinforcement_openings: u32,
}

impl RunState {
    /// Fresh run state, applying the squad talent to the starting squad.
    pub fn new(player_data: &PlayerData) -> Self {
        let squad = STARTING_SQUAD + player_data.squad_bonus();
        Self {
            camera_z: 0.0,
            player_x: 0.0,
            target_x: None,
            wave: 1,
            score: 0,
            kill_count: 0,
            squad_count: squad,
            peak_squad: squad,
            over: false,
            combo_count: 0,
            combo_timer_ms: 0.0,
            best_combo: 0,
            weapon: WeaponKind::Pistol,
            weapon_timer_ms: 0.0,
            skill_cooldown_ms: 0.0,
            skill_ready: player_data.any_charges(),
            shoot_timer_ms: 0.0,
            next_wave_z: SPAWN_DISTANCE,
            next_gate_z: SPAWN_DISTANCE + 150.0,
            coins_collected: 0,
            gems_collected: 0,
            reinforcements: None,
            reinforcement_openings: 0,
        }
    }

    /// The player line's z position.
    pub fn player_z(&self) -> f64 {
        self.camera_z + PLAYER_Z_OFFSET
    }

    /// Record a new squad size, tracking the run peak.
    pub fn set_squad(&mut self, squad: u32) {
        self.squad_count = squad;
        if squad > self.peak_squad {
            self.peak_squad = squad;
        }
    }
}
