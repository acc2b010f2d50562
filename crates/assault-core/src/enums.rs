//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Weapon archetype. Pistol is the infinite default; the rest are
/// consumable charges activated from the shared skill slots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponKind {
    #[default]
    Pistol,
    Shotgun,
    Laser,
    Rocket,
    /// Fires nothing; suppresses all incoming squad damage while active.
    Invincibility,
}

impl WeaponKind {
    /// The consumable weapons, in hotkey order.
    pub const CONSUMABLES: [WeaponKind; 4] = [
        WeaponKind::Shotgun,
        WeaponKind::Laser,
        WeaponKind::Rocket,
        WeaponKind::Invincibility,
    ];

    /// Active duration in milliseconds, None for the pistol.
    pub fn duration_ms(self) -> Option<f64> {
        match self {
            WeaponKind::Pistol => None,
            WeaponKind::Shotgun => Some(10_000.0),
            WeaponKind::Laser => Some(8_000.0),
            WeaponKind::Rocket => Some(10_000.0),
            WeaponKind::Invincibility => Some(4_000.0),
        }
    }

    /// Fire interval multiplier applied to the base shoot interval.
    pub fn fire_rate_mult(self) -> f64 {
        match self {
            WeaponKind::Pistol => 1.0,
            WeaponKind::Shotgun => 2.0,
            WeaponKind::Laser => 0.55,
            WeaponKind::Rocket => 1.7,
            WeaponKind::Invincibility => 1.0,
        }
    }

    /// Shop price in coins for one charge, None for the pistol.
    pub fn charge_price(self) -> Option<u32> {
        match self {
            WeaponKind::Pistol => None,
            WeaponKind::Shotgun => Some(15),
            WeaponKind::Laser => Some(22),
            WeaponKind::Rocket => Some(32),
            WeaponKind::Invincibility => Some(55),
        }
    }
}

/// Enemy toughness class. Determines kill score, drop behavior, and
/// which AI runs for the entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyClass {
    #[default]
    Normal,
    Heavy,
    Boss,
    MegaBoss,
}

/// Enemy visual/stat variant within a wave. Cosmetic except for the
/// hp multiplier; composition shifts toward tougher kinds as waves rise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    #[default]
    Grunt,
    /// Tougher variant (1.5x hp).
    Soldier,
    Runner,
    /// Elite variant appearing from wave 10.
    FireElite,
}

impl EnemyKind {
    pub fn hp_mult(self) -> f64 {
        match self {
            EnemyKind::Soldier => 1.5,
            EnemyKind::FireElite => 1.8,
            EnemyKind::Grunt | EnemyKind::Runner => 1.0,
        }
    }
}

/// Troop-gate arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateOp {
    Add,
    Sub,
    Mul,
    Div,
    AddPercent,
    SubPercent,
}

impl GateOp {
    /// Whether this operator can only help the player.
    pub fn is_good(self) -> bool {
        matches!(self, GateOp::Add | GateOp::Mul | GateOp::AddPercent)
    }
}

/// What passing through a gate panel does.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GateEffect {
    Troop { op: GateOp, value: u32 },
    Weapon { weapon: WeaponKind },
}

/// Enemy bullet flavor. Purely cosmetic; damage is carried separately.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyBulletKind {
    #[default]
    Aimed,
    Spread,
    Flame,
}

/// Mega-boss skill rotation entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MegaSkill {
    FlameBreath,
    SummonWave,
    GroundSlam,
}

impl MegaSkill {
    /// Round-robin order, indexed by the rotation counter.
    pub fn from_index(idx: u32) -> Self {
        match idx % 3 {
            0 => MegaSkill::FlameBreath,
            1 => MegaSkill::SummonWave,
            _ => MegaSkill::GroundSlam,
        }
    }
}

/// Pickup currency kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickupKind {
    Coin,
    Gem,
}

/// Top-level simulation phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    #[default]
    Idle,
    Playing,
    Paused,
    /// Reinforcement offer open after a mega-boss kill; ticks are frozen.
    Reinforcing,
    GameOver,
}
