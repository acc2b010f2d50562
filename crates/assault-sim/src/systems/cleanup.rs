//! End-of-tick pruning: expired or off-screen entities and the hard
//! caps on projectile pools.

use hecs::{Entity, World};

use assault_core::components::{Bullet, EnemyBullet, Gate, Pickup};
use assault_core::constants::*;
use assault_core::types::Position;

use crate::run::RunState;

pub fn run(world: &mut World, run: &RunState, despawn_buffer: &mut Vec<Entity>) {
    prune_bullets(world, run, despawn_buffer);
    prune_enemy_bullets(world, run, despawn_buffer);

    for (entity, gate) in world.query::<&Gate>().iter() {
        if gate.triggered && gate.fade_timer == 0 {
            despawn_buffer.push(entity);
        }
    }
    for (entity, pickup) in world.query::<&Pickup>().iter() {
        if pickup.life <= 0 {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}

fn prune_bullets(world: &mut World, run: &RunState, despawn_buffer: &mut Vec<Entity>) {
    let mut live: Vec<(Entity, u64)> = Vec::new();
    for (entity, (bullet, pos)) in world.query::<(&Bullet, &Position)>().iter() {
        let rel_z = pos.z - run.camera_z;
        let spent = rel_z > SPAWN_DISTANCE + 100.0
            || pos.z < run.camera_z - 10.0
            || bullet
                .max_range
                .is_some_and(|range| pos.z - bullet.start_z > range);
        if spent {
            despawn_buffer.push(entity);
        } else {
            live.push((entity, bullet.spawn_tick));
        }
    }
    truncate_oldest(&mut live, MAX_BULLETS, despawn_buffer);
}

fn prune_enemy_bullets(world: &mut World, run: &RunState, despawn_buffer: &mut Vec<Entity>) {
    let mut live: Vec<(Entity, u64)> = Vec::new();
    for (entity, (eb, pos)) in world.query::<(&EnemyBullet, &Position)>().iter() {
        let rel_z = pos.z - run.camera_z;
        let spent = eb.life <= 0
            || rel_z < -50.0
            || rel_z > SPAWN_DISTANCE + 100.0
            || pos.x.abs() > ROAD_HALF_WIDTH + 50.0;
        if spent {
            despawn_buffer.push(entity);
        } else {
            live.push((entity, eb.spawn_tick));
        }
    }
    truncate_oldest(&mut live, MAX_ENEMY_BULLETS, despawn_buffer);
}

/// Load shedding, not correctness: on overflow, drop the oldest entries
/// down to a fraction of the cap so truncation is not re-triggered
/// every tick.
fn truncate_oldest(live: &mut Vec<(Entity, u64)>, cap: usize, despawn_buffer: &mut Vec<Entity>) {
    if live.len() <= cap {
        return;
    }
    let keep = (cap as f64 * BULLET_TRUNCATE_RATIO) as usize;
    live.sort_by_key(|&(_, spawn_tick)| spawn_tick);
    for &(entity, _) in &live[..live.len() - keep] {
        despawn_buffer.push(entity);
    }
}
