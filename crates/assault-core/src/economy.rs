//! Persistent player economy: currencies, talents, armor, weapon charges.
//!
//! The simulation reads this at run start and mutates it in place on
//! pickups and purchases; committing it to storage is the host's job.
//! Corrupt or absent persisted data falls back to defaults rather than
//! raising.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::enums::WeaponKind;

/// Permanent talent levels, purchased with gems.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Talents {
    pub damage: u32,
    pub squad: u32,
    pub fire_rate: u32,
    pub aoe: u32,
}

/// Gem cost tables per talent track.
pub const DAMAGE_GEM_COSTS: [u32; 5] = [1, 2, 3, 5, 8];
pub const SQUAD_GEM_COSTS: [u32; 5] = [1, 2, 3, 5, 8];
pub const FIRE_RATE_GEM_COSTS: [u32; 4] = [2, 3, 5, 8];
pub const AOE_GEM_COSTS: [u32; 4] = [2, 3, 5, 8];
pub const ARMOR_GEM_COSTS: [u32; 3] = [1, 3, 6];

/// Armor levels purchasable with coins (level 1..=3).
pub const ARMOR_COIN_PRICES: [u32; 3] = [25, 60, 120];

/// A talent track selector for purchases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TalentId {
    Damage,
    Squad,
    FireRate,
    Aoe,
    /// Same armor level as the coin shop, priced in gems here.
    Armor,
}

/// Persistent player data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerData {
    pub coins: u32,
    pub gems: u32,
    /// Consumable activation charges per weapon.
    pub weapon_charges: HashMap<WeaponKind, u32>,
    pub talents: Talents,
    /// Armor level 0..=3, flat squad-damage reduction.
    pub armor: u32,
}

impl Default for PlayerData {
    fn default() -> Self {
        Self {
            coins: 0,
            gems: 0,
            weapon_charges: HashMap::new(),
            talents: Talents::default(),
            armor: 0,
        }
    }
}

impl PlayerData {
    /// Parse persisted JSON, falling back to defaults on corrupt input.
    /// Unknown fields are ignored and missing fields take defaults, so
    /// old saves load without migration errors.
    pub fn from_json(raw: &str) -> Self {
        serde_json::from_str(raw).unwrap_or_default()
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    // --- Read-through multipliers (apply retroactively mid-run) ---

    pub fn damage_mult(&self) -> f64 {
        1.0 + self.talents.damage as f64 * 0.15
    }

    pub fn fire_rate_mult(&self) -> f64 {
        1.0 - self.talents.fire_rate as f64 * 0.08
    }

    pub fn aoe_mult(&self) -> f64 {
        1.0 + self.talents.aoe as f64 * 0.25
    }

    pub fn squad_bonus(&self) -> u32 {
        self.talents.squad
    }

    pub fn charges(&self, weapon: WeaponKind) -> u32 {
        self.weapon_charges.get(&weapon).copied().unwrap_or(0)
    }

    pub fn any_charges(&self) -> bool {
        self.weapon_charges.values().any(|&c| c > 0)
    }

    /// Consume one charge of `weapon`. Returns false if none remain.
    pub fn take_charge(&mut self, weapon: WeaponKind) -> bool {
        match self.weapon_charges.get_mut(&weapon) {
            Some(c) if *c > 0 => {
                *c -= 1;
                true
            }
            _ => false,
        }
    }

    // --- Purchases ---

    /// Buy one consumable charge with coins. Returns false if the weapon
    /// has no price (pistol) or coins are insufficient.
    pub fn buy_weapon_charge(&mut self, weapon: WeaponKind) -> bool {
        let Some(price) = weapon.charge_price() else {
            return false;
        };
        if self.coins < price {
            return false;
        }
        self.coins -= price;
        *self.weapon_charges.entry(weapon).or_insert(0) += 1;
        true
    }

    /// Buy the next level of a talent track with gems. Returns false at
    /// max level or with insufficient gems.
    pub fn buy_talent(&mut self, id: TalentId) -> bool {
        let (level, costs): (&mut u32, &[u32]) = match id {
            TalentId::Damage => (&mut self.talents.damage, &DAMAGE_GEM_COSTS),
            TalentId::Squad => (&mut self.talents.squad, &SQUAD_GEM_COSTS),
            TalentId::FireRate => (&mut self.talents.fire_rate, &FIRE_RATE_GEM_COSTS),
            TalentId::Aoe => (&mut self.talents.aoe, &AOE_GEM_COSTS),
            TalentId::Armor => (&mut self.armor, &ARMOR_GEM_COSTS),
        };
        let Some(&cost) = costs.get(*level as usize) else {
            return false; // max level
        };
        if self.gems < cost {
            return false;
        }
        self.gems -= cost;
        *level += 1;
        true
    }

    /// Buy the next armor level with coins. Levels must be bought in order.
    pub fn buy_armor(&mut self) -> bool {
        let Some(&price) = ARMOR_COIN_PRICES.get(self.armor as usize) else {
            return false;
        };
        if self.coins < price {
            return false;
        }
        self.coins -= price;
        self.armor += 1;
        true
    }
}

/// One tier of the mid-run reinforcement offer (opened after a mega-boss
/// kill). Troops are bought with run score, not persistent currency.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ReinforcementOffer {
    pub troops: u32,
    pub cost: u32,
}

/// Base tiers: share of the expected squad restored, and base score cost.
const REINFORCEMENT_TIERS: [(f64, f64); 3] = [(0.15, 400.0), (0.30, 900.0), (0.50, 1800.0)];

/// Price a reinforcement tier. The further behind the expected squad the
/// player is, the more troops per point of score; offers escalate with
/// each opening.
pub fn reinforcement_offer(tier: usize, wave: u32, squad: u32, opening: u32) -> ReinforcementOffer {
    let (share, base_cost) = REINFORCEMENT_TIERS[tier.min(2)];
    let expected = 3.0 + wave as f64 * 1.8;
    let ratio = (squad as f64 / expected.max(1.0)).max(0.1);

    let rescue_mult = (1.0 / ratio.powf(0.6)).clamp(0.5, 2.5);
    let base_troops = (expected * share * rescue_mult).round().max(3.0);
    let troops = (base_troops * (1.0 + (opening.saturating_sub(1)) as f64 * 0.3)).round() as u32;

    let cost_mult = ratio.powf(0.4).clamp(0.6, 1.5);
    let cost =
        (base_cost * (1.0 + (opening.saturating_sub(1)) as f64 * 0.5) * cost_mult).round() as u32;

    ReinforcementOffer { troops, cost }
}
