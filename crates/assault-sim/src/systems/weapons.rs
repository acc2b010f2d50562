//! Auto-fire dispatch per weapon archetype and consumable activation.

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use assault_core::components::{Bullet, BulletPayload};
use assault_core::constants::*;
use assault_core::economy::PlayerData;
use assault_core::enums::WeaponKind;
use assault_core::events::SimEvent;
use assault_core::types::{Position, Velocity};

use crate::run::RunState;

/// Per-bullet hit-once set for piercing beams. Bounded in practice by
/// the beam's short lifetime; kept sorted-free and scanned linearly.
#[derive(Debug, Default)]
pub struct PierceLog {
    pub hit: Vec<Entity>,
}

impl PierceLog {
    pub fn mark(&mut self, entity: Entity) -> bool {
        if self.hit.contains(&entity) {
            false
        } else {
            self.hit.push(entity);
            true
        }
    }
}

/// Effective fire interval for the current weapon, with the fire-rate
/// talent read through live.
fn fire_interval_ms(weapon: WeaponKind, player_data: &PlayerData) -> f64 {
    let base = match weapon {
        WeaponKind::Pistol => PISTOL_INTERVAL_MS,
        other => SHOOT_INTERVAL_MS * other.fire_rate_mult(),
    };
    base * player_data.fire_rate_mult()
}

/// Burn the fire timer and spawn this tick's volley when it lapses.
pub fn run(
    world: &mut World,
    run: &mut RunState,
    rng: &mut ChaCha8Rng,
    player_data: &PlayerData,
    tick: u64,
    events: &mut Vec<SimEvent>,
) {
    if run.squad_count == 0 {
        return;
    }
    run.shoot_timer_ms -= DT_MS;
    if run.shoot_timer_ms > 0.0 {
        return;
    }
    run.shoot_timer_ms = fire_interval_ms(run.weapon, player_data);

    if fire_volley(world, run, rng, player_data, tick) {
        events.push(SimEvent::WeaponFired { weapon: run.weapon });
    }
}

/// Spawn one volley of the active weapon. Returns false when the weapon
/// fires nothing (invincibility).
fn fire_volley(
    world: &mut World,
    run: &RunState,
    rng: &mut ChaCha8Rng,
    player_data: &PlayerData,
    tick: u64,
) -> bool {
    let squad = run.squad_count;
    let dmg_mult = player_data.damage_mult();
    let muzzle_z = run.player_z();

    match run.weapon {
        WeaponKind::Invincibility => false,
        WeaponKind::Pistol => {
            // Squad grows the volley up to a 3-wide grid of 8.
            let count = squad.min(8);
            let damage = scaled_damage(1 + squad / 6, dmg_mult);
            for i in 0..count {
                let (bx, bz) = if i == 0 {
                    (run.player_x, muzzle_z)
                } else {
                    let row = (i + 2) / 3;
                    let col = ((i - 1) % 3) as f64 - 1.0;
                    (run.player_x + col * 25.0, muzzle_z + row as f64 * 20.0)
                };
                let angle = (bx - run.player_x) * 0.0004;
                spawn_bullet(
                    world,
                    Position { x: bx, z: bz },
                    Velocity {
                        x: angle.sin() * BULLET_SPEED,
                        z: angle.cos() * BULLET_SPEED,
                    },
                    Bullet {
                        weapon: WeaponKind::Pistol,
                        damage,
                        payload: BulletPayload::Standard,
                        max_range: None,
                        start_z: bz,
                        spawn_tick: tick,
                    },
                );
            }
            true
        }
        WeaponKind::Shotgun => {
            let pellets = (5 + squad / 2).min(12);
            let damage = scaled_damage(1 + squad / 4, dmg_mult);
            let range = 250.0 + squad as f64 * 15.0;
            let spread = 0.25 + (squad as f64 * 0.02).min(0.15);
            for i in 0..pellets {
                let t = i as f64 / (pellets - 1).max(1) as f64;
                let angle = -spread + 2.0 * spread * t + (rng.gen::<f64>() - 0.5) * 0.06;
                let speed = BULLET_SPEED * (0.8 + rng.gen::<f64>() * 0.15);
                spawn_bullet(
                    world,
                    Position {
                        x: run.player_x,
                        z: muzzle_z,
                    },
                    Velocity {
                        x: angle.sin() * speed,
                        z: angle.cos() * speed,
                    },
                    Bullet {
                        weapon: WeaponKind::Shotgun,
                        damage,
                        payload: BulletPayload::Standard,
                        max_range: Some(range),
                        start_z: muzzle_z,
                        spawn_tick: tick,
                    },
                );
            }
            true
        }
        WeaponKind::Laser => {
            let beams = (1 + squad / 3).min(3);
            let damage = scaled_damage(1 + squad / 3, dmg_mult);
            for b in 0..beams {
                let offset = if beams == 1 {
                    0.0
                } else {
                    (b as f64 - (beams - 1) as f64 / 2.0) * 30.0
                };
                let entity = spawn_bullet(
                    world,
                    Position {
                        x: run.player_x + offset,
                        z: muzzle_z,
                    },
                    Velocity {
                        x: 0.0,
                        z: BULLET_SPEED * 2.5,
                    },
                    Bullet {
                        weapon: WeaponKind::Laser,
                        damage,
                        payload: BulletPayload::Pierce,
                        max_range: None,
                        start_z: muzzle_z,
                        spawn_tick: tick,
                    },
                );
                let _ = world.insert_one(entity, PierceLog::default());
            }
            true
        }
        WeaponKind::Rocket => {
            let rockets = if squad >= 15 {
                3
            } else if squad >= 6 {
                2
            } else {
                1
            };
            let damage = scaled_damage(3 + squad / 2, dmg_mult);
            let radius = ((50.0 + squad as f64 * 5.0) * player_data.aoe_mult())
                .round()
                .min(150.0);
            for r in 0..rockets {
                let offset = if rockets == 1 {
                    0.0
                } else {
                    (r as f64 - (rockets - 1) as f64 / 2.0) * 30.0
                };
                spawn_bullet(
                    world,
                    Position {
                        x: run.player_x + offset,
                        z: muzzle_z,
                    },
                    Velocity {
                        x: 0.0,
                        z: BULLET_SPEED * 0.8,
                    },
                    Bullet {
                        weapon: WeaponKind::Rocket,
                        damage,
                        payload: BulletPayload::Aoe { radius },
                        max_range: None,
                        start_z: muzzle_z,
                        spawn_tick: tick,
                    },
                );
            }
            true
        }
    }
}

fn scaled_damage(base: u32, dmg_mult: f64) -> i32 {
    ((base as f64 * dmg_mult).round() as i32).max(1)
}

fn spawn_bullet(world: &mut World, pos: Position, vel: Velocity, bullet: Bullet) -> Entity {
    world.spawn((pos, vel, bullet))
}

/// Consume a charge and switch to a consumable weapon. Requires the
/// pistol to be active and the shared cooldown to be clear.
pub fn activate_weapon(
    run: &mut RunState,
    player_data: &mut PlayerData,
    weapon: WeaponKind,
    events: &mut Vec<SimEvent>,
) {
    if run.weapon != WeaponKind::Pistol || run.skill_cooldown_ms > 0.0 {
        return;
    }
    let Some(duration) = weapon.duration_ms() else {
        return;
    };
    if !player_data.take_charge(weapon) {
        return;
    }
    run.weapon = weapon;
    run.weapon_timer_ms = duration;
    run.skill_ready = false;
    // Fire the first volley immediately.
    run.shoot_timer_ms = 0.0;
    events.push(SimEvent::WeaponActivated { weapon });
}

/// Gate-granted weapon: no charge spent, fixed duration, skips the
/// cooldown gate entirely.
pub fn grant_weapon(run: &mut RunState, weapon: WeaponKind) {
    if let Some(duration) = weapon.duration_ms() {
        run.weapon = weapon;
        run.weapon_timer_ms = duration;
        run.shoot_timer_ms = 0.0;
    }
}
