//! Tests for core vocabulary types and the persistent economy.

use crate::economy::{reinforcement_offer, PlayerData, TalentId};
use crate::enums::{GateOp, WeaponKind};

// ---- Gate operators ----

#[test]
fn test_good_ops() {
    assert!(GateOp::Add.is_good());
    assert!(GateOp::Mul.is_good());
    assert!(GateOp::AddPercent.is_good());
    assert!(!GateOp::Sub.is_good());
    assert!(!GateOp::Div.is_good());
    assert!(!GateOp::SubPercent.is_good());
}

// ---- PlayerData parsing ----

#[test]
fn test_player_data_corrupt_falls_back_to_default() {
    assert_eq!(PlayerData::from_json("not json at all"), PlayerData::default());
    assert_eq!(PlayerData::from_json(""), PlayerData::default());
}

#[test]
fn test_player_data_partial_save_takes_defaults() {
    // Old saves may lack newer fields; missing ones default.
    let data = PlayerData::from_json(r#"{"coins": 40}"#);
    assert_eq!(data.coins, 40);
    assert_eq!(data.gems, 0);
    assert_eq!(data.armor, 0);
    assert_eq!(data.talents.damage, 0);
}

#[test]
fn test_player_data_roundtrip() {
    let mut data = PlayerData::default();
    data.coins = 100;
    data.gems = 7;
    data.weapon_charges.insert(WeaponKind::Laser, 2);
    data.talents.fire_rate = 3;
    data.armor = 2;
    let parsed = PlayerData::from_json(&data.to_json());
    assert_eq!(parsed, data);
}

// ---- Purchases ----

#[test]
fn test_buy_weapon_charge() {
    let mut data = PlayerData::default();
    data.coins = 20;
    assert!(data.buy_weapon_charge(WeaponKind::Shotgun)); // price 15
    assert_eq!(data.coins, 5);
    assert_eq!(data.charges(WeaponKind::Shotgun), 1);
    // Can't afford a second one.
    assert!(!data.buy_weapon_charge(WeaponKind::Shotgun));
    assert_eq!(data.charges(WeaponKind::Shotgun), 1);
    // Pistol has no price.
    assert!(!data.buy_weapon_charge(WeaponKind::Pistol));
}

#[test]
fn test_take_charge_floors_at_zero() {
    let mut data = PlayerData::default();
    data.weapon_charges.insert(WeaponKind::Rocket, 1);
    assert!(data.take_charge(WeaponKind::Rocket));
    assert!(!data.take_charge(WeaponKind::Rocket));
    assert_eq!(data.charges(WeaponKind::Rocket), 0);
}

#[test]
fn test_talent_levels_respect_max() {
    let mut data = PlayerData::default();
    data.gems = 1000;
    // Damage track maxes at 5.
    for _ in 0..10 {
        data.buy_talent(TalentId::Damage);
    }
    assert_eq!(data.talents.damage, 5);
    // Fire rate track maxes at 4.
    for _ in 0..10 {
        data.buy_talent(TalentId::FireRate);
    }
    assert_eq!(data.talents.fire_rate, 4);
}

#[test]
fn test_talent_insufficient_gems() {
    let mut data = PlayerData::default();
    assert!(!data.buy_talent(TalentId::Squad)); // costs 1, has 0
    assert_eq!(data.talents.squad, 0);
}

#[test]
fn test_armor_levels_in_order() {
    let mut data = PlayerData::default();
    data.coins = 500;
    assert!(data.buy_armor()); // 25
    assert!(data.buy_armor()); // 60
    assert!(data.buy_armor()); // 120
    assert!(!data.buy_armor()); // max level
    assert_eq!(data.armor, 3);
    assert_eq!(data.coins, 500 - 25 - 60 - 120);
}

#[test]
fn test_armor_buyable_with_coins_or_gems() {
    // Both currencies advance the same armor level.
    let mut data = PlayerData::default();
    data.coins = 25;
    data.gems = 10;
    assert!(data.buy_armor()); // 25 coins -> level 1
    assert!(data.buy_talent(TalentId::Armor)); // 3 gems -> level 2
    assert_eq!(data.armor, 2);
    assert_eq!(data.coins, 0);
    assert_eq!(data.gems, 7);
    assert!(data.buy_talent(TalentId::Armor)); // 6 gems -> level 3
    assert!(!data.buy_talent(TalentId::Armor), "armor caps at 3");
    assert!(!data.buy_armor());
    assert_eq!(data.armor, 3);
}

// ---- Talent multipliers ----

#[test]
fn test_multipliers_are_read_through() {
    let mut data = PlayerData::default();
    assert_eq!(data.damage_mult(), 1.0);
    data.talents.damage = 2;
    assert!((data.damage_mult() - 1.3).abs() < 1e-9);
    data.talents.fire_rate = 2;
    assert!((data.fire_rate_mult() - 0.84).abs() < 1e-9);
    data.talents.aoe = 1;
    assert!((data.aoe_mult() - 1.25).abs() < 1e-9);
}

// ---- Reinforcements ----

#[test]
fn test_reinforcement_rescue_scaling() {
    // A player far behind schedule gets more troops for less score.
    let behind = reinforcement_offer(0, 20, 5, 1);
    let ahead = reinforcement_offer(0, 20, 80, 1);
    assert!(behind.troops > ahead.troops);
    assert!(behind.cost < ahead.cost);
}

#[test]
fn test_reinforcement_escalates_with_openings() {
    let first = reinforcement_offer(1, 20, 30, 1);
    let third = reinforcement_offer(1, 20, 30, 3);
    assert!(third.troops > first.troops);
    assert!(third.cost > first.cost);
}

#[test]
fn test_reinforcement_minimum_troops() {
    let offer = reinforcement_offer(0, 1, 100, 1);
    assert!(offer.troops >= 3);
}
