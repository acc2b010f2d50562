//! Boss hold-and-shoot behavior and the mega-boss skill rotation.
//!
//! Bosses never advance: z is hard-locked to their hold distance ahead
//! of the player line, and all pressure comes from projectiles.

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use assault_core::components::{BossBrain, Enemy, EnemyBullet, MegaBrain};
use assault_core::constants::*;
use assault_core::economy::PlayerData;
use assault_core::enums::{EnemyBulletKind, EnemyClass, EnemyKind, MegaSkill};
use assault_core::events::SimEvent;
use assault_core::types::{Position, Velocity};

use crate::difficulty;
use crate::run::RunState;
use crate::systems::combat;

struct Shot {
    pos: Position,
    vel: Velocity,
    damage: i32,
    life: i32,
    kind: EnemyBulletKind,
}

struct Summon {
    pos: Position,
    hp: i32,
    damage: i32,
}

pub fn run(
    world: &mut World,
    run: &mut RunState,
    rng: &mut ChaCha8Rng,
    player_data: &PlayerData,
    tick: u64,
    events: &mut Vec<SimEvent>,
) {
    let bosses: Vec<Entity> = world
        .query::<(&Enemy, &BossBrain)>()
        .iter()
        .map(|(entity, _)| entity)
        .collect();
    if bosses.is_empty() {
        return;
    }
    let player_z = run.player_z();

    let mut shots: Vec<Shot> = Vec::new();
    let mut summons: Vec<Summon> = Vec::new();

    for &boss_entity in &bosses {
        hold_and_track(world, run, rng, &bosses, boss_entity, player_z);
        ranged_attack(world, run, boss_entity, player_z, &mut shots);
        mega_skills(
            world,
            run,
            rng,
            player_data,
            boss_entity,
            player_z,
            &mut shots,
            &mut summons,
            events,
        );
        if run.over {
            break;
        }
    }

    for shot in shots {
        world.spawn((
            shot.pos,
            shot.vel,
            EnemyBullet {
                damage: shot.damage,
                life: shot.life,
                kind: shot.kind,
                spawn_tick: tick,
            },
        ));
    }
    for summon in summons {
        let hp = summon.hp;
        world.spawn((
            summon.pos,
            Enemy {
                hp,
                max_hp: hp,
                damage: summon.damage,
                class: EnemyClass::Normal,
                kind: if rng.gen::<bool>() {
                    EnemyKind::Grunt
                } else {
                    EnemyKind::Soldier
                },
            },
        ));
    }
}

/// Z hard-lock plus loose lateral tracking with inter-boss repulsion.
fn hold_and_track(
    world: &mut World,
    run: &RunState,
    rng: &mut ChaCha8Rng,
    bosses: &[Entity],
    boss_entity: Entity,
    player_z: f64,
) {
    let hold_distance = match world.get::<&BossBrain>(boss_entity) {
        Ok(brain) => brain.hold_distance,
        Err(_) => return,
    };
    let others: Vec<f64> = bosses
        .iter()
        .filter(|&&e| e != boss_entity)
        .filter_map(|&e| world.get::<&Position>(e).ok().map(|p| p.x))
        .collect();

    let Ok(mut pos) = world.get::<&mut Position>(boss_entity) else {
        return;
    };
    pos.z = player_z + hold_distance;

    let mut repel = 0.0;
    for &other_x in &others {
        let sep = pos.x - other_x;
        if sep.abs() < BOSS_MIN_SEPARATION {
            let force = (BOSS_MIN_SEPARATION - sep.abs()) / BOSS_MIN_SEPARATION * 0.6;
            let dir = if sep == 0.0 {
                rng.gen::<f64>() - 0.5
            } else {
                sep.signum()
            };
            repel += dir * force;
        }
    }

    let grouped = !others.is_empty();
    let dead_zone = if grouped { 40.0 } else { 25.0 };
    let track_speed = if grouped { 0.2 } else { 0.3 };
    let dx = run.player_x - pos.x;
    let tracking = if dx.abs() > dead_zone {
        dx.signum() * track_speed
    } else {
        0.0
    };
    pos.x = (pos.x + tracking + repel).clamp(-ROAD_HALF_WIDTH * 0.85, ROAD_HALF_WIDTH * 0.85);
}

/// Aimed shot on the interval; level 3+ bosses add a flanking spread.
fn ranged_attack(
    world: &mut World,
    run: &RunState,
    boss_entity: Entity,
    player_z: f64,
    shots: &mut Vec<Shot>,
) {
    let (x, z, damage, level) = {
        let Ok(pos) = world.get::<&Position>(boss_entity) else {
            return;
        };
        let Ok(enemy) = world.get::<&Enemy>(boss_entity) else {
            return;
        };
        let Ok(brain) = world.get::<&BossBrain>(boss_entity) else {
            return;
        };
        (pos.x, pos.z, enemy.damage, brain.level)
    };
    let fired = {
        let Ok(mut brain) = world.get::<&mut BossBrain>(boss_entity) else {
            return;
        };
        brain.shoot_timer += 1;
        if brain.shoot_timer >= brain.shoot_interval {
            brain.shoot_timer = 0;
            true
        } else {
            false
        }
    };
    if !fired {
        return;
    }

    let dx = run.player_x - x;
    let dz = player_z - z;
    let dist = (dx * dx + dz * dz).sqrt().max(1.0);
    let speed = (2.6 + level as f64 * 0.52).min(5.2);
    shots.push(Shot {
        pos: Position { x, z },
        vel: Velocity {
            x: dx / dist * speed,
            z: dz / dist * speed,
        },
        damage,
        life: 300,
        kind: EnemyBulletKind::Aimed,
    });
    if level >= 3 {
        for flank in [-1.0, 1.0] {
            let angle = dz.atan2(dx) + flank * 0.25;
            shots.push(Shot {
                pos: Position { x, z },
                vel: Velocity {
                    x: angle.cos() * speed * 0.85,
                    z: angle.sin() * speed * 0.85,
                },
                damage: (damage - 1).max(1),
                life: 250,
                kind: EnemyBulletKind::Spread,
            });
        }
    }
}

/// Mega-boss round-robin: flame breath, summon wave, ground slam.
#[allow(clippy::too_many_arguments)]
fn mega_skills(
    world: &mut World,
    run: &mut RunState,
    rng: &mut ChaCha8Rng,
    player_data: &PlayerData,
    boss_entity: Entity,
    player_z: f64,
    shots: &mut Vec<Shot>,
    summons: &mut Vec<Summon>,
    events: &mut Vec<SimEvent>,
) {
    let (x, z, damage) = {
        let Ok(pos) = world.get::<&Position>(boss_entity) else {
            return;
        };
        let Ok(enemy) = world.get::<&Enemy>(boss_entity) else {
            return;
        };
        if enemy.class != EnemyClass::MegaBoss {
            return;
        }
        (pos.x, pos.z, enemy.damage)
    };

    let skill = {
        let Ok(mut brain) = world.get::<&mut MegaBrain>(boss_entity) else {
            return;
        };
        brain.skill_timer += 1;
        if brain.skill_timer < brain.skill_interval {
            return;
        }
        brain.skill_timer = 0;
        let skill = MegaSkill::from_index(brain.next_skill);
        brain.next_skill += 1;
        if skill == MegaSkill::SummonWave {
            if brain.summons_used >= brain.summon_cap {
                // Capped: retry soon, rotation already advanced.
                brain.skill_timer = brain.skill_interval.saturating_sub(20);
                return;
            }
            brain.summons_used += 1;
        }
        skill
    };
    let level = match world.get::<&MegaBrain>(boss_entity) {
        Ok(brain) => brain.level,
        Err(_) => return,
    };

    match skill {
        MegaSkill::FlameBreath => {
            let count = 7 + level.min(5) * 2;
            let spread = 0.6 + level as f64 * 0.05;
            let speed = (2.2 + level as f64 * 0.3).min(4.5);
            let base_angle = (player_z - z).atan2(run.player_x - x);
            for i in 0..count {
                let t = i as f64 / (count - 1).max(1) as f64;
                let angle = base_angle - spread + 2.0 * spread * t;
                shots.push(Shot {
                    pos: Position { x, z },
                    vel: Velocity {
                        x: angle.cos() * speed,
                        z: angle.sin() * speed,
                    },
                    damage: (damage - 1).max(1),
                    life: 200,
                    kind: EnemyBulletKind::Flame,
                });
            }
        }
        MegaSkill::SummonWave => {
            let count = 3 + level.min(4);
            let factor = difficulty::adaptive_factor(run.squad_count, run.peak_squad, run.wave);
            let raw_hp = ENEMY_BASE_HP + run.wave as f64 * 0.6;
            let hp = (raw_hp * factor * 0.7 * 1.38).ceil() as i32;
            let minion_damage = (((1 + run.wave / 8) as f64 * 0.8).ceil() as i32).max(1);
            for i in 0..count {
                let sx = x + (i as f64 - (count - 1) as f64 / 2.0) * 40.0
                    + (rng.gen::<f64>() - 0.5) * 15.0;
                summons.push(Summon {
                    pos: Position {
                        x: sx,
                        z: z - 30.0 + (rng.gen::<f64>() - 0.5) * 20.0,
                    },
                    hp,
                    damage: minion_damage,
                });
            }
        }
        MegaSkill::GroundSlam => {
            // Unavoidable shockwave, negated only by invincibility.
            let slam = ((damage as f64 * 0.6).ceil() as i32).max(1);
            combat::apply_squad_damage(run, player_data, slam, events);
        }
    }
    events.push(SimEvent::MegaSkillUsed { skill });
}
