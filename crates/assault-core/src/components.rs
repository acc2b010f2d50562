//! ECS components.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems, not components.

use serde::{Deserialize, Serialize};

use crate::enums::*;

/// An enemy unit advancing (or, for bosses, holding) against the player.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub hp: i32,
    pub max_hp: i32,
    /// Squad damage dealt on contact or by this enemy's projectiles.
    pub damage: i32,
    pub class: EnemyClass,
    pub kind: EnemyKind,
}

/// Boss behavior state. Bosses hold at range and fire aimed shots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossBrain {
    /// Z offset ahead of the player line the boss is locked to.
    pub hold_distance: f64,
    /// Ticks since the last shot.
    pub shoot_timer: u32,
    /// Ticks between shots (stretched for multi-boss groups).
    pub shoot_interval: u32,
    /// Boss level = wave / 5 at spawn time.
    pub level: u32,
}

/// Mega-boss skill rotation, carried in addition to `BossBrain`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MegaBrain {
    pub skill_timer: u32,
    pub skill_interval: u32,
    /// Round-robin counter; `MegaSkill::from_index` decodes it.
    pub next_skill: u32,
    /// Summon waves already used this fight.
    pub summons_used: u32,
    /// Cap on summon waves per fight.
    pub summon_cap: u32,
    /// Mega level = wave / 10 at spawn time.
    pub level: u32,
}

/// What happens when a player bullet connects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BulletPayload {
    /// Consumed on first hit.
    Standard,
    /// Passes through, hitting each enemy at most once. The hit-once
    /// list is the sim-side `PierceLog` component.
    Pierce,
    /// Explodes on first contact, radial falloff damage within `radius`.
    Aoe { radius: f64 },
}

/// A player projectile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub weapon: WeaponKind,
    pub damage: i32,
    pub payload: BulletPayload,
    /// Travel limit from `start_z`, None for unlimited.
    pub max_range: Option<f64>,
    pub start_z: f64,
    /// Tick of creation; oldest bullets are truncated when the pool
    /// overflows its hard cap.
    pub spawn_tick: u64,
}

/// A boss/mega-boss projectile aimed at the player.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyBullet {
    pub damage: i32,
    /// Remaining lifetime in ticks.
    pub life: i32,
    pub kind: EnemyBulletKind,
    /// Tick of creation, for oldest-first truncation under the cap.
    pub spawn_tick: u64,
}

/// One selectable panel of a gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateOption {
    /// Panel center, lateral.
    pub x: f64,
    pub width: f64,
    pub effect: GateEffect,
}

/// A branching checkpoint. Immutable once triggered; the fade timer is
/// cosmetic-only before removal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gate {
    pub options: Vec<GateOption>,
    pub triggered: bool,
    pub fade_timer: u32,
    /// Index of the chosen option, None if the gate was missed.
    pub chosen: Option<usize>,
}

/// An explosive barrel. `chain_timer >= 0` counts down to a chained
/// detonation; negative means no chain is pending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Barrel {
    pub hp: i32,
    pub aoe_damage: i32,
    pub chain_timer: i32,
}

/// A coin or gem drop with simple scatter physics and magnet pull.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub kind: PickupKind,
    pub value: u32,
    /// Remaining lifetime in ticks.
    pub life: i32,
    /// Height above the road and vertical velocity for the bounce arc.
    pub height: f64,
    pub vert_vel: f64,
}
