//! Events emitted by the simulation for audio and VFX feedback.
//!
//! The core owns no rendering; hosts drive sounds, screen shake, and
//! particles from this stream instead.

use serde::{Deserialize, Serialize};

use crate::enums::*;

/// One tick's worth of feedback events, in emission order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    /// A weapon volley was fired.
    WeaponFired { weapon: WeaponKind },
    /// A consumable weapon was activated from a charge.
    WeaponActivated { weapon: WeaponKind },
    /// The active consumable expired; the shared cooldown started.
    WeaponExpired { weapon: WeaponKind },
    /// An enemy was killed.
    EnemyKilled { class: EnemyClass, score: u32 },
    /// A combo chain paid out.
    ComboBonus { chain: u32, bonus: u32 },
    /// A barrel detonated (possibly chained).
    BarrelExploded { chained: bool },
    /// A gate resolved. `delta` is the squad change for troop gates.
    GateResolved {
        effect: GateEffect,
        delta: i64,
    },
    /// A gate passed by without any option chosen.
    GateMissed,
    /// The player squad took damage.
    SquadDamaged { amount: u32, remaining: u32 },
    /// Incoming damage was negated by invincibility.
    DamageBlocked,
    /// A new wave began.
    WaveStarted { wave: u32 },
    /// A boss group spawned.
    BossSpawned { count: u32, mega: bool },
    /// A mega-boss used a skill.
    MegaSkillUsed { skill: MegaSkill },
    /// A pickup was collected.
    PickupCollected { kind: PickupKind, value: u32 },
    /// The reinforcement offer opened (after a mega-boss kill).
    ReinforcementsOffered,
    /// The run ended.
    GameOver { score: u32, wave: u32 },
}
