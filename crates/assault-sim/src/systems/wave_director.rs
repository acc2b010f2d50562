//! Wave composition and boss/barrel spawning.
//!
//! Enemy toughness is the product of a wave term, the adaptive
//! difficulty factor, and per-class/kind multipliers, with a dampener
//! on the first two waves.

use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use assault_core::components::{Barrel, BossBrain, Enemy, MegaBrain};
use assault_core::constants::*;
use assault_core::enums::{EnemyClass, EnemyKind};
use assault_core::events::SimEvent;
use assault_core::types::Position;

use crate::difficulty;
use crate::run::RunState;

/// Spawn checks, run once per tick. A new wave starts when the camera
/// closes on the wave mark; every 5th wave brings a boss group and
/// every 10th a mega-boss.
pub fn run(
    world: &mut World,
    run: &mut RunState,
    rng: &mut ChaCha8Rng,
    events: &mut Vec<SimEvent>,
) {
    if run.camera_z + SPAWN_DISTANCE <= run.next_wave_z {
        return;
    }
    let boss_z = run.next_wave_z - 80.0;
    spawn_enemy_wave(world, run, rng);
    if rng.gen::<f64>() < 0.7 {
        spawn_barrels(world, run, rng);
    }
    run.wave += 1;
    events.push(SimEvent::WaveStarted { wave: run.wave });
    if run.wave % 10 == 0 {
        spawn_mega_boss(world, run, rng, boss_z, events);
    } else if run.wave % 5 == 0 {
        spawn_boss_group(world, run, rng, boss_z, events);
    }
}

/// One wave of normal/heavy enemies in rows across the road.
pub fn spawn_enemy_wave(world: &mut World, run: &mut RunState, rng: &mut ChaCha8Rng) {
    let factor = difficulty::adaptive_factor(run.squad_count, run.peak_squad, run.wave);
    let wave = run.wave;
    let dampener = if wave <= 2 { EARLY_WAVE_DAMPENER } else { 1.0 };
    let count = (3 + (wave as f64 * 1.5).ceil() as u32).min(MAX_WAVE_ENEMIES);
    let rows = count.div_ceil(WAVE_ROW_WIDTH);
    let base_z = run.camera_z + SPAWN_DISTANCE;

    let raw_hp = ENEMY_BASE_HP + wave as f64 + (wave * wave / 40) as f64;
    let base_hp = (raw_hp * factor * dampener).ceil();
    let base_damage = (((1 + wave / 5) as f64 * factor.sqrt() * dampener).ceil() as i32).max(1);
    let heavy_chance = if wave >= 6 {
        (0.12 + wave as f64 * 0.006) * factor.min(1.5)
    } else {
        0.0
    };

    for r in 0..rows {
        let cols = (count - r * WAVE_ROW_WIDTH).min(WAVE_ROW_WIDTH);
        for c in 0..cols {
            let spread = ROAD_HALF_WIDTH * 0.7;
            let x = if cols == 1 {
                0.0
            } else {
                -spread + spread * 2.0 * c as f64 / (cols - 1) as f64
            };
            let heavy = rng.gen::<f64>() < heavy_chance;
            let kind = sample_kind(wave, rng);
            let hp_mult = if heavy { 2.0 } else { 1.0 };
            let hp = (base_hp * hp_mult * 1.2 * kind.hp_mult()).ceil() as i32;
            let damage_mult = if heavy { 1.5 } else { 1.0 };
            let damage = ((base_damage as f64 * damage_mult * 1.2).ceil() as i32).max(1);
            world.spawn((
                Position {
                    x: x + (rng.gen::<f64>() - 0.5) * 20.0,
                    z: base_z + r as f64 * 45.0 + rng.gen::<f64>() * 15.0,
                },
                Enemy {
                    hp,
                    max_hp: hp,
                    damage,
                    class: if heavy {
                        EnemyClass::Heavy
                    } else {
                        EnemyClass::Normal
                    },
                    kind,
                },
            ));
        }
    }
    run.next_wave_z = base_z + rows as f64 * 35.0 + 200.0;
}

/// Weighted kind draw. Composition shifts toward tougher kinds as
/// waves rise; fire elites only from wave 10.
fn sample_kind(wave: u32, rng: &mut ChaCha8Rng) -> EnemyKind {
    let w = wave as f64;
    let weights = [
        (EnemyKind::Grunt, (3.0 - 0.1 * w).max(1.0)),
        (EnemyKind::Soldier, (0.5 + 0.1 * w).min(2.5)),
        (EnemyKind::Runner, 1.0),
        (
            EnemyKind::FireElite,
            if wave >= 10 {
                (0.3 + 0.08 * (w - 10.0)).min(1.5)
            } else {
                0.0
            },
        ),
    ];
    let total: f64 = weights.iter().map(|&(_, w)| w).sum();
    let mut r = rng.gen::<f64>() * total;
    for &(kind, weight) in &weights {
        r -= weight;
        if r <= 0.0 {
            return kind;
        }
    }
    EnemyKind::Grunt
}

/// Bosses per group for a boss level (wave / 5).
pub fn boss_group_size(level: u32) -> u32 {
    (1 + level.saturating_sub(1) / 2).min(MAX_BOSS_GROUP)
}

/// Per-boss stat split for a group; a lone boss keeps full stats.
pub fn boss_stat_mult(count: u32) -> f64 {
    if count <= 1 {
        1.0
    } else {
        (1.0 / (count as f64 * 0.85).sqrt()).max(0.45)
    }
}

/// Boss group sized by boss level, with per-boss stats split so the
/// aggregate stays beatable.
pub fn spawn_boss_group(
    world: &mut World,
    run: &mut RunState,
    rng: &mut ChaCha8Rng,
    z: f64,
    events: &mut Vec<SimEvent>,
) {
    let level = run.wave / 5;
    let count = boss_group_size(level);
    let stat_mult = boss_stat_mult(count);
    let interval_stretch = 1.0 + (count - 1) as f64 * 0.2;
    for i in 0..count {
        spawn_boss(
            world, run, rng, z, level, count, i, stat_mult, interval_stretch, false,
        );
    }
    events.push(SimEvent::BossSpawned { count, mega: false });
}

fn spawn_mega_boss(
    world: &mut World,
    run: &mut RunState,
    rng: &mut ChaCha8Rng,
    z: f64,
    events: &mut Vec<SimEvent>,
) {
    let level = run.wave / 5;
    spawn_boss(world, run, rng, z, level, 1, 0, 1.0, 1.0, true);
    events.push(SimEvent::BossSpawned {
        count: 1,
        mega: true,
    });
}

/// One boss. HP is keyed to the player's current pistol volley so the
/// fight length stays roughly constant across squad sizes.
#[allow(clippy::too_many_arguments)]
fn spawn_boss(
    world: &mut World,
    run: &RunState,
    rng: &mut ChaCha8Rng,
    z: f64,
    level: u32,
    count: u32,
    index: u32,
    stat_mult: f64,
    interval_stretch: f64,
    mega: bool,
) {
    let factor = difficulty::adaptive_factor(run.squad_count, run.peak_squad, run.wave);
    let volley = run.squad_count.min(8) * (1 + run.squad_count / 6);
    let hp_scale = if mega { 2.2 } else { 1.0 };
    let hp = (((volley.max(1) as f64 * (12.0 + level as f64 * 5.0)).ceil() * stat_mult * hp_scale)
        as i32)
        .max(40);
    let base_damage = 1 + run.wave / 8;
    let damage = ((base_damage as f64 * factor.sqrt()).ceil() as i32).max(1)
        + if mega { 1 } else { 0 };
    let interval =
        (((160_i64 - level as i64 * 15).max(BOSS_MIN_SHOOT_INTERVAL as i64) as f64)
            * interval_stretch) as u32;

    // Spread group members laterally so repulsion settles fast.
    let slot = if count == 1 {
        (rng.gen::<f64>() - 0.5) * ROAD_HALF_WIDTH * 0.6
    } else {
        let t = index as f64 / (count - 1) as f64;
        (-0.6 + 1.2 * t) * ROAD_HALF_WIDTH * 0.7 + (rng.gen::<f64>() - 0.5) * 20.0
    };

    let entity = world.spawn((
        Position { x: slot, z },
        Enemy {
            hp,
            max_hp: hp,
            damage,
            class: if mega {
                EnemyClass::MegaBoss
            } else {
                EnemyClass::Boss
            },
            kind: EnemyKind::Grunt,
        },
        BossBrain {
            hold_distance: BOSS_HOLD_DISTANCE,
            shoot_timer: 0,
            shoot_interval: interval,
            level,
        },
    ));
    if mega {
        let mega_level = run.wave / 10;
        let skill_interval = MEGA_SKILL_INTERVAL_BASE
            .saturating_sub(mega_level * 20)
            .max(MEGA_SKILL_INTERVAL_MIN);
        let _ = world.insert_one(
            entity,
            MegaBrain {
                skill_timer: 0,
                skill_interval,
                next_skill: 0,
                summons_used: 0,
                summon_cap: 3 + mega_level,
                level: mega_level,
            },
        );
    }
}

/// 1-3 barrels staggered around the wave line, keeping spacing from
/// barrels already on the road.
fn spawn_barrels(world: &mut World, run: &RunState, rng: &mut ChaCha8Rng) {
    let base_z = run.next_wave_z - 100.0;
    let count = 1 + rng.gen_range(0..(1 + run.wave / 3).clamp(1, 3));
    let half = ROAD_HALF_WIDTH * 0.85;
    for _ in 0..count {
        let x = -half + rng.gen::<f64>() * half * 2.0;
        let z = base_z + (rng.gen::<f64>() - 0.5) * 80.0;
        let too_close = world
            .query::<(&Barrel, &Position)>()
            .iter()
            .any(|(_, (_, pos))| (pos.x - x).abs() < 30.0 && (pos.z - z).abs() < 40.0);
        if too_close {
            continue;
        }
        world.spawn((
            Position { x, z },
            Barrel {
                hp: BARREL_HP,
                aoe_damage: BARREL_AOE_DAMAGE,
                chain_timer: -1,
            },
        ));
    }
}
