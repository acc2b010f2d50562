//! Collision resolution: player bullets against enemies and barrels,
//! barrel chain reactions, enemy contact with the player line, and
//! enemy bullets against the player. Kill rewards (score, combo,
//! currency drops) are applied here.

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use assault_core::components::{
    Barrel, Bullet, BulletPayload, Enemy, EnemyBullet, Pickup,
};
use assault_core::constants::*;
use assault_core::economy::{reinforcement_offer, PlayerData};
use assault_core::enums::{EnemyClass, PickupKind, WeaponKind};
use assault_core::events::SimEvent;
use assault_core::types::{Position, Velocity};

use crate::run::{ReinforcementState, RunState};
use crate::systems::weapons::PierceLog;

/// A kill pending reward processing, recorded mid-collision and applied
/// after all borrows are released.
struct PendingKill {
    class: EnemyClass,
    x: f64,
    z: f64,
}

/// Player bullets against enemies. Standard bullets consume on first
/// hit, pierce bullets log each enemy once, AoE bullets detonate with
/// radial falloff.
pub fn resolve_bullets(
    world: &mut World,
    run: &mut RunState,
    rng: &mut ChaCha8Rng,
    despawn_buffer: &mut Vec<Entity>,
    events: &mut Vec<SimEvent>,
) {
    let bullets: Vec<Entity> = world
        .query::<(&Bullet, &Position)>()
        .iter()
        .map(|(entity, _)| entity)
        .collect();
    let enemies: Vec<Entity> = world
        .query::<(&Enemy, &Position)>()
        .iter()
        .map(|(entity, _)| entity)
        .collect();

    let mut kills: Vec<PendingKill> = Vec::new();

    'bullets: for bullet_entity in bullets {
        let (bx, bz, damage, payload, weapon) = {
            let Ok(bullet) = world.get::<&Bullet>(bullet_entity) else {
                continue;
            };
            let Ok(pos) = world.get::<&Position>(bullet_entity) else {
                continue;
            };
            (pos.x, pos.z, bullet.damage, bullet.payload, bullet.weapon)
        };
        let (hit_x, hit_z) = if weapon == WeaponKind::Rocket {
            (ROCKET_HIT_X, ROCKET_HIT_Z)
        } else {
            (HIT_X, HIT_Z)
        };

        for &enemy_entity in &enemies {
            let (ex, ez, alive) = {
                let Ok(enemy) = world.get::<&Enemy>(enemy_entity) else {
                    continue;
                };
                let Ok(pos) = world.get::<&Position>(enemy_entity) else {
                    continue;
                };
                (pos.x, pos.z, enemy.hp > 0)
            };
            if !alive {
                continue;
            }
            if (bx - ex).abs() >= hit_x || (bz - ez).abs() >= hit_z {
                continue;
            }
            if payload == BulletPayload::Pierce {
                let Ok(mut log) = world.get::<&mut PierceLog>(bullet_entity) else {
                    continue;
                };
                if !log.mark(enemy_entity) {
                    continue;
                }
            }

            let killed = {
                let Ok(mut enemy) = world.get::<&mut Enemy>(enemy_entity) else {
                    continue;
                };
                enemy.hp -= damage;
                enemy.hp <= 0
            };
            if killed {
                record_kill(world, &mut kills, enemy_entity, despawn_buffer);
            }

            match payload {
                BulletPayload::Pierce => {
                    // Beam continues through; next enemy.
                }
                BulletPayload::Aoe { radius } => {
                    despawn_buffer.push(bullet_entity);
                    splash_enemies(
                        world,
                        &enemies,
                        &mut kills,
                        despawn_buffer,
                        enemy_entity,
                        bx,
                        bz,
                        radius,
                        damage,
                    );
                    continue 'bullets;
                }
                BulletPayload::Standard => {
                    despawn_buffer.push(bullet_entity);
                    continue 'bullets;
                }
            }
        }
    }

    flush_despawns(world, despawn_buffer);
    apply_kills(world, run, rng, kills, despawn_buffer, events);
}

/// Radial falloff damage around an AoE impact, skipping the direct hit.
#[allow(clippy::too_many_arguments)]
fn splash_enemies(
    world: &mut World,
    enemies: &[Entity],
    kills: &mut Vec<PendingKill>,
    despawn_buffer: &mut Vec<Entity>,
    direct_hit: Entity,
    bx: f64,
    bz: f64,
    radius: f64,
    damage: i32,
) {
    for &enemy_entity in enemies {
        if enemy_entity == direct_hit {
            continue;
        }
        let (ex, ez, alive) = {
            let Ok(enemy) = world.get::<&Enemy>(enemy_entity) else {
                continue;
            };
            let Ok(pos) = world.get::<&Position>(enemy_entity) else {
                continue;
            };
            (pos.x, pos.z, enemy.hp > 0)
        };
        if !alive {
            continue;
        }
        let dx = (ex - bx).abs();
        let dz = (ez - bz).abs();
        if dx >= radius || dz >= radius {
            continue;
        }
        let dist = (dx * dx + dz * dz).sqrt();
        let splash = ((damage as f64 * aoe_falloff(dist, radius)).floor() as i32).max(1);
        let killed = {
            let Ok(mut enemy) = world.get::<&mut Enemy>(enemy_entity) else {
                continue;
            };
            enemy.hp -= splash;
            enemy.hp <= 0
        };
        if killed {
            record_kill(world, kills, enemy_entity, despawn_buffer);
        }
    }
}

/// Splash multiplier at `dist` from the blast center: full at the
/// center, floored at the blast edge.
pub fn aoe_falloff(dist: f64, radius: f64) -> f64 {
    (1.0 - dist / radius * 0.7).max(AOE_FALLOFF_FLOOR)
}

fn record_kill(
    world: &World,
    kills: &mut Vec<PendingKill>,
    entity: Entity,
    despawn_buffer: &mut Vec<Entity>,
) {
    let Ok(enemy) = world.get::<&Enemy>(entity) else {
        return;
    };
    let Ok(pos) = world.get::<&Position>(entity) else {
        return;
    };
    kills.push(PendingKill {
        class: enemy.class,
        x: pos.x,
        z: pos.z,
    });
    despawn_buffer.push(entity);
}

/// Score, combo, drop, and reinforcement bookkeeping for this tick's
/// kills. Runs after collision borrows are released.
fn apply_kills(
    world: &mut World,
    run: &mut RunState,
    rng: &mut ChaCha8Rng,
    kills: Vec<PendingKill>,
    despawn_buffer: &mut Vec<Entity>,
    events: &mut Vec<SimEvent>,
) {
    // Kills were flushed before this loop, so the live query no longer
    // sees this batch; add it back and count down per boss kill so a
    // multi-boss wipe in one tick drops gems exactly once.
    let boss_kills = kills
        .iter()
        .filter(|k| matches!(k.class, EnemyClass::Boss | EnemyClass::MegaBoss))
        .count();
    let mut bosses_left = world
        .query::<&Enemy>()
        .iter()
        .filter(|(_, enemy)| matches!(enemy.class, EnemyClass::Boss | EnemyClass::MegaBoss))
        .count()
        + boss_kills;

    for kill in kills {
        let score = match kill.class {
            EnemyClass::Normal => SCORE_NORMAL,
            EnemyClass::Heavy => SCORE_HEAVY,
            EnemyClass::Boss => SCORE_BOSS,
            EnemyClass::MegaBoss => SCORE_MEGA_BOSS,
        };
        run.score += score;
        run.kill_count += 1;
        run.combo_count += 1;
        run.combo_timer_ms = COMBO_TIMEOUT_MS;
        if run.combo_count > run.best_combo {
            run.best_combo = run.combo_count;
        }
        events.push(SimEvent::EnemyKilled {
            class: kill.class,
            score,
        });

        if matches!(kill.class, EnemyClass::Boss | EnemyClass::MegaBoss) {
            spawn_boss_coins(world, run, rng, kill.x, kill.z);
            if kill.class == EnemyClass::MegaBoss {
                // Mega-bosses pay double coins.
                spawn_boss_coins(world, run, rng, kill.x, kill.z);
            }
            bosses_left -= 1;
            if bosses_left == 0 {
                spawn_boss_gems(world, run, rng, kill.x, kill.z);
                clear_enemy_bullets(world, despawn_buffer);
            }
            if kill.class == EnemyClass::MegaBoss {
                open_reinforcements(run, events);
            }
        }
    }
    flush_despawns(world, despawn_buffer);
}

/// Open the post-mega reinforcement offer.
fn open_reinforcements(run: &mut RunState, events: &mut Vec<SimEvent>) {
    run.reinforcement_openings += 1;
    let opening = run.reinforcement_openings;
    let offers = [
        reinforcement_offer(0, run.wave, run.squad_count, opening),
        reinforcement_offer(1, run.wave, run.squad_count, opening),
        reinforcement_offer(2, run.wave, run.squad_count, opening),
    ];
    run.reinforcements = Some(ReinforcementState {
        offers,
        bought: [false; 3],
    });
    events.push(SimEvent::ReinforcementsOffered);
}

/// Wave-scaled probabilistic coin shower, thrown toward the player so
/// it lands within magnet range. Per-boss amounts shrink in groups.
fn spawn_boss_coins(world: &mut World, run: &RunState, rng: &mut ChaCha8Rng, x: f64, z: f64) {
    let boss_level = run.wave / 5;
    let chance = (0.3 + boss_level as f64 * 0.2).min(0.90);
    if rng.gen::<f64>() > chance {
        return;
    }
    let boss_count = (1 + boss_level.saturating_sub(1) / 2).min(MAX_BOSS_GROUP);
    let per_boss = if boss_count == 1 {
        1.0
    } else {
        (0.7 / boss_count as f64).max(0.3)
    };
    let base = COIN_DROP_BASE + (boss_level * COIN_DROP_PER_LEVEL).min(COIN_DROP_LEVEL_CAP);
    let count = ((base as f64 * per_boss).round() as u32).max(1);
    let player_z = run.player_z();
    for _ in 0..count {
        let target_x = run.player_x + (rng.gen::<f64>() - 0.5) * 80.0;
        let target_z = player_z + 20.0 + rng.gen::<f64>() * 60.0;
        let px = x + (rng.gen::<f64>() - 0.5) * 30.0;
        world.spawn((
            Position { x: px, z },
            Velocity {
                x: (target_x - x) * 0.03 + (rng.gen::<f64>() - 0.5),
                z: (target_z - z) * 0.04,
            },
            Pickup {
                kind: PickupKind::Coin,
                value: 1,
                life: COIN_LIFE_TICKS,
                height: 0.0,
                vert_vel: -3.0 - rng.gen::<f64>() * 3.0,
            },
        ));
    }
}

/// Gems drop only once per boss fight, from the last boss down.
fn spawn_boss_gems(world: &mut World, run: &RunState, rng: &mut ChaCha8Rng, x: f64, z: f64) {
    let boss_level = run.wave / 5;
    let chance = (boss_level as f64 * 0.2).min(0.75);
    if rng.gen::<f64>() > chance {
        return;
    }
    let count = if boss_level <= 2 {
        1
    } else if rng.gen::<f64>() < 0.65 {
        1
    } else {
        2
    };
    let player_z = run.player_z();
    for _ in 0..count {
        let target_x = run.player_x + (rng.gen::<f64>() - 0.5) * 50.0;
        let target_z = player_z + 10.0 + rng.gen::<f64>() * 40.0;
        let px = x + (rng.gen::<f64>() - 0.5) * 20.0;
        world.spawn((
            Position { x: px, z },
            Velocity {
                x: (target_x - x) * 0.03 + (rng.gen::<f64>() - 0.5) * 0.5,
                z: (target_z - z) * 0.04,
            },
            Pickup {
                kind: PickupKind::Gem,
                value: 1,
                life: GEM_LIFE_TICKS,
                height: 0.0,
                vert_vel: -6.0 - rng.gen::<f64>() * 3.0,
            },
        ));
    }
}

/// No ghost projectiles after the last boss of a group dies.
fn clear_enemy_bullets(world: &World, despawn_buffer: &mut Vec<Entity>) {
    for (entity, _) in world.query::<&EnemyBullet>().iter() {
        despawn_buffer.push(entity);
    }
}

/// Player bullets against barrels. Pierce beams pass through.
pub fn resolve_barrels(
    world: &mut World,
    run: &mut RunState,
    rng: &mut ChaCha8Rng,
    despawn_buffer: &mut Vec<Entity>,
    events: &mut Vec<SimEvent>,
) {
    let bullets: Vec<Entity> = world
        .query::<(&Bullet, &Position)>()
        .iter()
        .map(|(entity, _)| entity)
        .collect();
    let barrels: Vec<Entity> = world
        .query::<(&Barrel, &Position)>()
        .iter()
        .map(|(entity, _)| entity)
        .collect();

    let mut detonate: Vec<Entity> = Vec::new();

    'bullets: for bullet_entity in bullets {
        let (bx, bz, pierce) = {
            let Ok(bullet) = world.get::<&Bullet>(bullet_entity) else {
                continue;
            };
            let Ok(pos) = world.get::<&Position>(bullet_entity) else {
                continue;
            };
            (pos.x, pos.z, bullet.payload == BulletPayload::Pierce)
        };
        for &barrel_entity in &barrels {
            if detonate.contains(&barrel_entity) {
                continue;
            }
            let (brx, brz) = {
                let Ok(pos) = world.get::<&Position>(barrel_entity) else {
                    continue;
                };
                (pos.x, pos.z)
            };
            if (bx - brx).abs() >= 18.0 || (bz - brz).abs() >= 15.0 {
                continue;
            }
            let exploded = {
                let Ok(mut barrel) = world.get::<&mut Barrel>(barrel_entity) else {
                    continue;
                };
                barrel.hp -= 1;
                barrel.hp <= 0
            };
            if exploded {
                detonate.push(barrel_entity);
            }
            if !pierce {
                despawn_buffer.push(bullet_entity);
                continue 'bullets;
            }
        }
    }

    flush_despawns(world, despawn_buffer);
    for barrel_entity in detonate {
        explode_barrel(world, run, rng, despawn_buffer, events, barrel_entity, false);
    }
}

/// Burn chain fuses and detonate barrels that reach zero.
pub fn tick_barrel_chains(
    world: &mut World,
    run: &mut RunState,
    rng: &mut ChaCha8Rng,
    despawn_buffer: &mut Vec<Entity>,
    events: &mut Vec<SimEvent>,
) {
    let mut ready: Vec<Entity> = Vec::new();
    for (entity, barrel) in world.query_mut::<&mut Barrel>() {
        if barrel.chain_timer < 0 {
            continue;
        }
        barrel.chain_timer -= 1;
        // Detonates the tick the fuse reaches zero.
        if barrel.chain_timer <= 0 {
            ready.push(entity);
        }
    }
    for entity in ready {
        explode_barrel(world, run, rng, despawn_buffer, events, entity, true);
    }
}

/// Fixed-radius blast: damages enemies, schedules chains on nearby
/// barrels, and removes the barrel itself.
fn explode_barrel(
    world: &mut World,
    run: &mut RunState,
    rng: &mut ChaCha8Rng,
    despawn_buffer: &mut Vec<Entity>,
    events: &mut Vec<SimEvent>,
    barrel_entity: Entity,
    chained: bool,
) {
    let (bx, bz, aoe_damage) = {
        let Ok(barrel) = world.get::<&Barrel>(barrel_entity) else {
            return;
        };
        let Ok(pos) = world.get::<&Position>(barrel_entity) else {
            return;
        };
        (pos.x, pos.z, barrel.aoe_damage)
    };
    despawn_buffer.push(barrel_entity);
    run.score += SCORE_BARREL;
    events.push(SimEvent::BarrelExploded { chained });

    let enemies: Vec<Entity> = world
        .query::<(&Enemy, &Position)>()
        .iter()
        .map(|(entity, _)| entity)
        .collect();
    let mut kills: Vec<PendingKill> = Vec::new();
    for &enemy_entity in &enemies {
        let (ex, ez, alive) = {
            let Ok(enemy) = world.get::<&Enemy>(enemy_entity) else {
                continue;
            };
            let Ok(pos) = world.get::<&Position>(enemy_entity) else {
                continue;
            };
            (pos.x, pos.z, enemy.hp > 0)
        };
        if !alive || (ex - bx).abs() >= BARREL_AOE_RADIUS || (ez - bz).abs() >= BARREL_AOE_RADIUS {
            continue;
        }
        let killed = {
            let Ok(mut enemy) = world.get::<&mut Enemy>(enemy_entity) else {
                continue;
            };
            enemy.hp -= aoe_damage;
            enemy.hp <= 0
        };
        if killed {
            record_kill(world, &mut kills, enemy_entity, despawn_buffer);
        }
    }

    // Chain to neighbors that are not already fused.
    for (_, (barrel, pos)) in world.query_mut::<(&mut Barrel, &Position)>() {
        if barrel.chain_timer >= 0 {
            continue;
        }
        if (pos.x - bx).abs() < BARREL_AOE_RADIUS && (pos.z - bz).abs() < BARREL_AOE_RADIUS {
            barrel.chain_timer = BARREL_CHAIN_FUSE;
        }
    }

    flush_despawns(world, despawn_buffer);
    apply_kills(world, run, rng, kills, despawn_buffer, events);
}

/// Enemies touching or breaching the player line die and cost squad.
pub fn enemy_contact(
    world: &mut World,
    run: &mut RunState,
    player_data: &PlayerData,
    despawn_buffer: &mut Vec<Entity>,
    events: &mut Vec<SimEvent>,
) {
    let player_z = run.player_z();
    let mut contacts: Vec<(Entity, i32)> = Vec::new();
    for (entity, (enemy, pos)) in world.query::<(&Enemy, &Position)>().iter() {
        if matches!(enemy.class, EnemyClass::Boss | EnemyClass::MegaBoss) {
            continue; // bosses hold range and never reach the line
        }
        let dz = pos.z - player_z;
        let dx = (pos.x - run.player_x).abs();
        let close_contact = dz < 15.0 && dz > -30.0 && dx < 40.0;
        let breached = pos.z <= run.camera_z - 20.0;
        if close_contact || breached {
            contacts.push((entity, enemy.damage));
        }
    }
    for (entity, damage) in contacts {
        despawn_buffer.push(entity);
        apply_squad_damage(run, player_data, damage, events);
    }
    flush_despawns(world, despawn_buffer);
}

/// Enemy bullets against the player band.
pub fn enemy_bullet_hits(
    world: &mut World,
    run: &mut RunState,
    player_data: &PlayerData,
    despawn_buffer: &mut Vec<Entity>,
    events: &mut Vec<SimEvent>,
) {
    let player_z = run.player_z();
    let mut hits: Vec<(Entity, i32)> = Vec::new();
    for (entity, (eb, pos)) in world.query::<(&EnemyBullet, &Position)>().iter() {
        if (pos.z - player_z).abs() < 18.0 && (pos.x - run.player_x).abs() < 30.0 {
            hits.push((entity, eb.damage));
        }
    }
    for (entity, damage) in hits {
        despawn_buffer.push(entity);
        apply_squad_damage(run, player_data, damage, events);
    }
    flush_despawns(world, despawn_buffer);
}

/// Apply damage to the squad through armor, synchronously ending the
/// run when the squad hits zero. Invincibility negates it entirely.
pub fn apply_squad_damage(
    run: &mut RunState,
    player_data: &PlayerData,
    raw: i32,
    events: &mut Vec<SimEvent>,
) {
    if run.over {
        return;
    }
    if run.weapon == WeaponKind::Invincibility {
        events.push(SimEvent::DamageBlocked);
        return;
    }
    let squad_armor = ((run.squad_count / SQUAD_ARMOR_DIVISOR) as i32).min(SQUAD_ARMOR_CAP);
    let damage = (raw - player_data.armor as i32 - squad_armor).max(1) as u32;
    let remaining = run.squad_count.saturating_sub(damage);
    run.squad_count = remaining;
    events.push(SimEvent::SquadDamaged {
        amount: damage,
        remaining,
    });
    if remaining == 0 {
        run.over = true;
    }
}

fn flush_despawns(world: &mut World, despawn_buffer: &mut Vec<Entity>) {
    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
