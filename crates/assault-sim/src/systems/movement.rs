//! Kinematic integration: player easing, camera advance, bullet and
//! pickup motion. Contact/hit resolution lives in `combat`.

use hecs::World;

use assault_core::components::{Bullet, Enemy, EnemyBullet, Pickup};
use assault_core::constants::*;
use assault_core::economy::PlayerData;
use assault_core::enums::{EnemyClass, PickupKind};
use assault_core::events::SimEvent;
use assault_core::types::{Position, Velocity};

use crate::difficulty;
use crate::run::RunState;

/// Ease the player toward the target x and clamp to the road.
pub fn update_player(run: &mut RunState) {
    if let Some(target) = run.target_x {
        run.player_x += (target - run.player_x) * PLAYER_EASE;
    }
    let bound = ROAD_HALF_WIDTH - PLAYER_EDGE_MARGIN;
    run.player_x = run.player_x.clamp(-bound, bound);
}

/// Advance the camera unless a boss is alive — the fight happens before
/// the run moves on.
pub fn advance_camera(world: &World, run: &mut RunState) {
    if !any_boss_alive(world) {
        run.camera_z += CAMERA_SPEED;
    }
}

/// Whether any boss or mega-boss entity is live.
pub fn any_boss_alive(world: &World) -> bool {
    world
        .query::<&Enemy>()
        .iter()
        .any(|(_, e)| matches!(e.class, EnemyClass::Boss | EnemyClass::MegaBoss))
}

/// Integrate player bullets.
pub fn integrate_bullets(world: &mut World) {
    for (_entity, (pos, vel, _bullet)) in world.query_mut::<(&mut Position, &Velocity, &Bullet)>() {
        pos.x += vel.x;
        pos.z += vel.z;
    }
}

/// Integrate enemy bullets and burn their lifetime.
pub fn integrate_enemy_bullets(world: &mut World) {
    for (_entity, (pos, vel, eb)) in
        world.query_mut::<(&mut Position, &Velocity, &mut EnemyBullet)>()
    {
        pos.x += vel.x;
        pos.z += vel.z;
        eb.life -= 1;
    }
}

/// Advance non-boss enemies toward the player line with lateral tracking.
/// An enemy holds its lane when another live enemy is directly ahead of it.
pub fn move_enemies(world: &mut World, run: &RunState) {
    let factor = difficulty::adaptive_factor(run.squad_count, run.peak_squad, run.wave);
    let speed_mult = difficulty::speed_mult(factor);
    let advance = (ENEMY_SPEED + run.wave as f64 * 0.012) * speed_mult;
    let lateral = ENEMY_LATERAL_SPEED + run.wave as f64 * 0.008;

    // Position snapshot for the blocked-lane check.
    let others: Vec<(hecs::Entity, f64, f64)> = world
        .query::<(&Enemy, &Position)>()
        .iter()
        .map(|(entity, (_, pos))| (entity, pos.x, pos.z))
        .collect();

    for (entity, (enemy, pos)) in world.query_mut::<(&Enemy, &mut Position)>() {
        if !matches!(enemy.class, EnemyClass::Normal | EnemyClass::Heavy) {
            continue; // bosses hold range in boss_ai
        }
        pos.z -= advance;

        let dx = run.player_x - pos.x;
        if dx.abs() > 15.0 {
            let blocked = others.iter().any(|&(other, ox, oz)| {
                other != entity && (ox - pos.x).abs() < 35.0 && oz < pos.z && oz > pos.z - 60.0
            });
            if !blocked {
                pos.x += dx.signum() * lateral;
            }
        }
        pos.x = pos.x.clamp(-ROAD_HALF_WIDTH + 10.0, ROAD_HALF_WIDTH - 10.0);
    }
}

/// Pickup physics: scatter, bounce, magnet pull, and collection.
/// Collected pickups credit `PlayerData` in place and are despawned by
/// cleanup via `life = 0`.
pub fn update_pickups(
    world: &mut World,
    run: &mut RunState,
    player_data: &mut PlayerData,
    events: &mut Vec<SimEvent>,
) {
    let player_x = run.player_x;
    let player_z = run.player_z();
    let mut collected: Vec<(PickupKind, u32)> = Vec::new();

    for (_entity, (pos, vel, pickup)) in
        world.query_mut::<(&mut Position, &mut Velocity, &mut Pickup)>()
    {
        if pickup.life <= 0 {
            continue;
        }
        pos.x += vel.x;
        pos.z += vel.z;
        pickup.height += pickup.vert_vel;
        pickup.vert_vel += PICKUP_GRAVITY;
        if pickup.height > 0.0 {
            // Bounce off the road and bleed momentum.
            pickup.height = 0.0;
            pickup.vert_vel = -pickup.vert_vel * 0.3;
            vel.x *= 0.8;
            vel.z *= 0.8;
        }
        vel.x *= 0.97;
        vel.z *= 0.97;
        pickup.life -= 1;

        let dx = player_x - pos.x;
        let dz = player_z - pos.z;
        let dist = (dx * dx + dz * dz).sqrt();
        let magnet_range = match pickup.kind {
            PickupKind::Coin => COIN_MAGNET_RANGE,
            PickupKind::Gem => GEM_MAGNET_RANGE,
        };
        if dist < magnet_range {
            let pull = match pickup.kind {
                PickupKind::Coin => 0.15,
                PickupKind::Gem => 0.12,
            } * (1.0 - dist / magnet_range);
            pos.x += dx * pull;
            pos.z += dz * pull;
        }
        if dist < PICKUP_RADIUS {
            collected.push((pickup.kind, pickup.value));
            pickup.life = 0;
        }
    }

    for (kind, value) in collected {
        match kind {
            PickupKind::Coin => {
                player_data.coins += value;
                run.coins_collected += value;
            }
            PickupKind::Gem => {
                player_data.gems += value;
                run.gems_collected += value;
            }
        }
        events.push(SimEvent::PickupCollected { kind, value });
    }
}
