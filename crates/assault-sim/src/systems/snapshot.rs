//! Snapshot assembly at the end of each tick.

use hecs::World;

use assault_core::components::{Barrel, Bullet, Enemy, EnemyBullet, Gate, Pickup};
use assault_core::enums::GamePhase;
use assault_core::events::SimEvent;
use assault_core::state::{
    BarrelView, BulletView, EnemyBulletView, EnemyView, GameSnapshot, GateView, PickupView,
    ReinforcementView,
};
use assault_core::types::{Position, SimTime, Velocity};

use crate::run::RunState;

pub fn build(
    world: &World,
    run: &RunState,
    time: SimTime,
    phase: GamePhase,
    events: Vec<SimEvent>,
) -> GameSnapshot {
    GameSnapshot {
        time,
        phase,
        camera_z: run.camera_z,
        player_x: run.player_x,
        wave: run.wave,
        score: run.score,
        squad_count: run.squad_count,
        peak_squad: run.peak_squad,
        kill_count: run.kill_count,
        combo_count: run.combo_count,
        combo_timer_ms: run.combo_timer_ms,
        best_combo: run.best_combo,
        weapon: run.weapon,
        weapon_timer_ms: run.weapon_timer_ms,
        skill_cooldown_ms: run.skill_cooldown_ms,
        skill_ready: run.skill_ready,
        coins_collected: run.coins_collected,
        gems_collected: run.gems_collected,
        enemies: world
            .query::<(&Enemy, &Position)>()
            .iter()
            .map(|(_, (enemy, pos))| EnemyView {
                position: *pos,
                hp: enemy.hp,
                max_hp: enemy.max_hp,
                class: enemy.class,
                kind: enemy.kind,
            })
            .collect(),
        bullets: world
            .query::<(&Bullet, &Position, &Velocity)>()
            .iter()
            .map(|(_, (bullet, pos, vel))| BulletView {
                position: *pos,
                velocity: *vel,
                weapon: bullet.weapon,
            })
            .collect(),
        enemy_bullets: world
            .query::<(&EnemyBullet, &Position, &Velocity)>()
            .iter()
            .map(|(_, (eb, pos, vel))| EnemyBulletView {
                position: *pos,
                velocity: *vel,
                kind: eb.kind,
            })
            .collect(),
        gates: world
            .query::<(&Gate, &Position)>()
            .iter()
            .map(|(_, (gate, pos))| GateView {
                z: pos.z,
                options: gate.options.clone(),
                triggered: gate.triggered,
                fade_timer: gate.fade_timer,
                chosen: gate.chosen,
            })
            .collect(),
        barrels: world
            .query::<(&Barrel, &Position)>()
            .iter()
            .map(|(_, (barrel, pos))| BarrelView {
                position: *pos,
                hp: barrel.hp,
                chained: barrel.chain_timer >= 0,
            })
            .collect(),
        pickups: world
            .query::<(&Pickup, &Position)>()
            .iter()
            .map(|(_, (pickup, pos))| PickupView {
                position: *pos,
                height: pickup.height,
                kind: pickup.kind,
                value: pickup.value,
            })
            .collect(),
        reinforcements: run.reinforcements.as_ref().map(|r| ReinforcementView {
            offers: r.offers.clone(),
            bought: r.bought,
        }),
        events,
    }
}
