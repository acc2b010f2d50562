//! Tests for the simulation engine: determinism, combat resolution,
//! gate generation, difficulty scaling, and the weapon/reinforcement
//! state machines.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use assault_core::commands::PlayerCommand;
use assault_core::components::{
    Barrel, Bullet, BulletPayload, Enemy, Gate, GateOption, Pickup,
};
use assault_core::constants::*;
use assault_core::economy::PlayerData;
use assault_core::enums::*;
use assault_core::events::SimEvent;
use assault_core::types::{Position, Velocity};

use crate::difficulty;
use crate::engine::{SimConfig, SimulationEngine};
use crate::run::RunState;
use crate::systems::weapons::PierceLog;
use crate::systems::{cleanup, combat, gates, wave_director};

fn start_engine(seed: u64) -> SimulationEngine {
    let mut engine = SimulationEngine::new(SimConfig {
        seed,
        ..Default::default()
    });
    engine.queue_command(PlayerCommand::StartRun);
    engine.tick();
    engine
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let mut engine_a = SimulationEngine::new(SimConfig {
        seed: 12345,
        ..Default::default()
    });
    let mut engine_b = SimulationEngine::new(SimConfig {
        seed: 12345,
        ..Default::default()
    });

    engine_a.queue_command(PlayerCommand::StartRun);
    engine_b.queue_command(PlayerCommand::StartRun);

    for _ in 0..600 {
        let snap_a = engine_a.tick();
        let snap_b = engine_b.tick();
        let json_a = serde_json::to_string(&snap_a).unwrap();
        let json_b = serde_json::to_string(&snap_b).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}

// ---- Wave composition ----

#[test]
fn test_opening_wave_is_five_enemies_one_row() {
    let engine = start_engine(1);
    // wave=1, squad=3: count = min(3 + ceil(1.5), 25) = 5, single row.
    let enemies: Vec<Position> = {
        let mut q = engine.world().query::<(&Enemy, &Position)>();
        q.iter().map(|(_, (_, pos))| *pos).collect()
    };
    assert_eq!(enemies.len(), 5);
    let min_z = enemies.iter().map(|p| p.z).fold(f64::MAX, f64::min);
    let max_z = enemies.iter().map(|p| p.z).fold(f64::MIN, f64::max);
    assert!(
        max_z - min_z < 45.0,
        "5 enemies should fit a single row, z spread was {}",
        max_z - min_z
    );
}

#[test]
fn test_wave_spawn_is_bounded() {
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    let mut world = hecs::World::new();
    let mut run = RunState::new(&PlayerData::default());
    run.wave = 40;
    wave_director::spawn_enemy_wave(&mut world, &mut run, &mut rng);
    let count = world.query::<&Enemy>().iter().count();
    assert!(count > 0 && count as u32 <= MAX_WAVE_ENEMIES);
}

// ---- Boss group sizing ----

#[test]
fn test_boss_group_wave_5() {
    // Boss level 1: one boss at full stats.
    assert_eq!(wave_director::boss_group_size(1), 1);
    assert_eq!(wave_director::boss_stat_mult(1), 1.0);
}

#[test]
fn test_boss_group_wave_15() {
    // Boss level 3: two bosses at ~0.767 stats each.
    assert_eq!(wave_director::boss_group_size(3), 2);
    let mult = wave_director::boss_stat_mult(2);
    assert!((mult - 1.0 / (2.0 * 0.85_f64).sqrt()).abs() < 1e-9);
    assert!((mult - 0.767).abs() < 0.01);
}

#[test]
fn test_boss_group_capped_at_four() {
    assert_eq!(wave_director::boss_group_size(100), MAX_BOSS_GROUP);
    assert!(wave_director::boss_stat_mult(MAX_BOSS_GROUP) >= 0.45);
}

// ---- Adaptive difficulty ----

#[test]
fn test_adaptive_factor_monotone_and_clamped() {
    let mut prev = 0.0;
    for squad in 1..200 {
        let factor = difficulty::adaptive_factor(squad, squad, 10);
        assert!((0.5..=2.5).contains(&factor));
        assert!(factor >= prev, "factor must not decrease as squad grows");
        prev = factor;
    }
}

#[test]
fn test_adaptive_factor_peak_dampening() {
    // A run that peaked at 60 and fell to 5 is scaled off peak * 0.6,
    // not the raw current squad.
    let fallen = difficulty::adaptive_factor(5, 60, 10);
    let honest = difficulty::adaptive_factor(5, 5, 10);
    assert!(fallen > honest);
}

// ---- Gate generation and resolution ----

#[test]
fn test_generated_gates_always_have_good_and_bad_option() {
    let mut rng = ChaCha8Rng::seed_from_u64(77);
    let mut run = RunState::new(&PlayerData::default());
    for wave in 1..40 {
        run.wave = wave;
        run.squad_count = 1 + wave % 30;
        let options = gates::troop_options(&run, &mut rng);
        assert!(!options.is_empty());
        let good = options.iter().any(|o| match o.effect {
            GateEffect::Troop { op, .. } => op.is_good(),
            GateEffect::Weapon { .. } => true,
        });
        let bad = options.iter().any(|o| match o.effect {
            GateEffect::Troop { op, .. } => !op.is_good(),
            GateEffect::Weapon { .. } => false,
        });
        assert!(good, "wave {wave}: no good option");
        assert!(bad, "wave {wave}: no bad option");
    }
}

#[test]
fn test_large_squad_gates_use_percentages() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let mut run = RunState::new(&PlayerData::default());
    run.wave = 20;
    run.squad_count = 25;
    for _ in 0..100 {
        for option in gates::troop_options(&run, &mut rng) {
            let GateEffect::Troop { op, .. } = option.effect else {
                panic!("troop gate produced a weapon option");
            };
            assert!(
                !matches!(op, GateOp::Mul | GateOp::Div),
                "multiplier op appeared at squad >= {PERCENT_GATE_THRESHOLD}"
            );
        }
    }
}

#[test]
fn test_apply_op_division_rounds_up() {
    assert_eq!(gates::apply_op(7, GateOp::Div, 2), 4);
    // Ceiling division means divide-then-multiply overshoots. Intended.
    let round_trip = gates::apply_op(gates::apply_op(7, GateOp::Div, 2), GateOp::Mul, 2);
    assert_eq!(round_trip, 8);
}

#[test]
fn test_apply_op_percent_and_floors() {
    assert_eq!(gates::apply_op(25, GateOp::AddPercent, 20), 30);
    // +% grants at least 1 even when the rounded share is 0.
    assert_eq!(gates::apply_op(2, GateOp::AddPercent, 15), 3);
    assert_eq!(gates::apply_op(25, GateOp::SubPercent, 10), 22);
    assert_eq!(gates::apply_op(1, GateOp::Sub, 10), 1);
    assert_eq!(gates::apply_op(3, GateOp::Div, 100), 1);
}

#[test]
fn test_gate_resolves_once_against_player_x() {
    let mut world = hecs::World::new();
    let mut run = RunState::new(&PlayerData::default());
    let mut events = Vec::new();
    run.player_x = 0.0;
    world.spawn((
        Position {
            x: 0.0,
            z: run.camera_z,
        },
        Gate {
            options: vec![GateOption {
                x: 0.0,
                width: 100.0,
                effect: GateEffect::Troop {
                    op: GateOp::Add,
                    value: 5,
                },
            }],
            triggered: false,
            fade_timer: 0,
            chosen: None,
        },
    ));

    gates::resolve(&mut world, &mut run, &mut events);
    assert_eq!(run.squad_count, 8);
    assert!(matches!(
        events.as_slice(),
        [SimEvent::GateResolved { delta: 5, .. }]
    ));

    // Immutable once triggered: resolving again is a no-op.
    gates::resolve(&mut world, &mut run, &mut events);
    assert_eq!(run.squad_count, 8);
    let (_, gate) = world.query_mut::<&Gate>().into_iter().next().unwrap();
    assert!(gate.triggered);
    assert_eq!(gate.chosen, Some(0));
}

// ---- Combat ----

#[test]
fn test_pierce_bullet_hits_each_enemy_once() {
    let mut world = hecs::World::new();
    let mut run = RunState::new(&PlayerData::default());
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let mut buffer = Vec::new();
    let mut events = Vec::new();

    let enemy = world.spawn((
        Position { x: 0.0, z: 50.0 },
        Enemy {
            hp: 100,
            max_hp: 100,
            damage: 1,
            class: EnemyClass::Normal,
            kind: EnemyKind::Grunt,
        },
    ));
    world.spawn((
        Position { x: 0.0, z: 50.0 },
        Velocity { x: 0.0, z: 0.0 },
        Bullet {
            weapon: WeaponKind::Laser,
            damage: 5,
            payload: BulletPayload::Pierce,
            max_range: None,
            start_z: 0.0,
            spawn_tick: 0,
        },
        PierceLog::default(),
    ));

    combat::resolve_bullets(&mut world, &mut run, &mut rng, &mut buffer, &mut events);
    combat::resolve_bullets(&mut world, &mut run, &mut rng, &mut buffer, &mut events);

    let enemy = world.get::<&Enemy>(enemy).unwrap();
    assert_eq!(enemy.hp, 95, "pierce bullet must hit an enemy only once");
}

#[test]
fn test_aoe_falloff_endpoints() {
    assert!((combat::aoe_falloff(0.0, 100.0) - 1.0).abs() < 1e-9);
    assert!((combat::aoe_falloff(100.0, 100.0) - AOE_FALLOFF_FLOOR).abs() < 1e-9);
    // Monotone in between.
    assert!(combat::aoe_falloff(30.0, 100.0) > combat::aoe_falloff(60.0, 100.0));
}

#[test]
fn test_aoe_bullet_splashes_neighbors() {
    let mut world = hecs::World::new();
    let mut run = RunState::new(&PlayerData::default());
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let mut buffer = Vec::new();
    let mut events = Vec::new();

    let direct = world.spawn((
        Position { x: 0.0, z: 50.0 },
        Enemy {
            hp: 100,
            max_hp: 100,
            damage: 1,
            class: EnemyClass::Normal,
            kind: EnemyKind::Grunt,
        },
    ));
    let neighbor = world.spawn((
        Position { x: 40.0, z: 50.0 },
        Enemy {
            hp: 100,
            max_hp: 100,
            damage: 1,
            class: EnemyClass::Normal,
            kind: EnemyKind::Grunt,
        },
    ));
    world.spawn((
        Position { x: 0.0, z: 50.0 },
        Velocity { x: 0.0, z: 0.0 },
        Bullet {
            weapon: WeaponKind::Rocket,
            damage: 10,
            payload: BulletPayload::Aoe { radius: 100.0 },
            max_range: None,
            start_z: 0.0,
            spawn_tick: 0,
        },
    ));

    combat::resolve_bullets(&mut world, &mut run, &mut rng, &mut buffer, &mut events);

    assert_eq!(world.get::<&Enemy>(direct).unwrap().hp, 90);
    // dist 40, radius 100: falloff 1 - 0.4*0.7 = 0.72, floor(7.2) = 7.
    assert_eq!(world.get::<&Enemy>(neighbor).unwrap().hp, 93);
    // The rocket is consumed on first contact.
    assert_eq!(world.query::<&Bullet>().iter().count(), 0);
}

#[test]
fn test_simultaneous_boss_kills_drop_gems_once() {
    let mut world = hecs::World::new();
    let mut run = RunState::new(&PlayerData::default());
    run.wave = 20; // boss level 4: gems are likely to roll
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    let mut buffer = Vec::new();
    let mut events = Vec::new();

    // Two 1 hp bosses inside one rocket's blast.
    for x in [0.0, 40.0] {
        world.spawn((
            Position { x, z: 50.0 },
            Enemy {
                hp: 1,
                max_hp: 1,
                damage: 1,
                class: EnemyClass::Boss,
                kind: EnemyKind::Grunt,
            },
        ));
    }
    world.spawn((
        Position { x: 0.0, z: 50.0 },
        Velocity { x: 0.0, z: 0.0 },
        Bullet {
            weapon: WeaponKind::Rocket,
            damage: 10,
            payload: BulletPayload::Aoe { radius: 100.0 },
            max_range: None,
            start_z: 0.0,
            spawn_tick: 0,
        },
    ));

    combat::resolve_bullets(&mut world, &mut run, &mut rng, &mut buffer, &mut events);

    assert_eq!(world.query::<&Enemy>().iter().count(), 0, "blast kills both");
    assert_eq!(run.score, 2 * SCORE_BOSS);
    // Gems come from the last boss down only; one drop is 1 or 2 gems.
    let gems = world
        .query::<&Pickup>()
        .iter()
        .filter(|(_, p)| p.kind == PickupKind::Gem)
        .count();
    assert!(gems <= 2, "a group wipe must pay out gems once, got {gems}");
}

#[test]
fn test_barrel_chain_reaction() {
    let mut world = hecs::World::new();
    let mut run = RunState::new(&PlayerData::default());
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let mut buffer = Vec::new();
    let mut events = Vec::new();

    let first = world.spawn((
        Position { x: 0.0, z: 50.0 },
        Barrel {
            hp: 1,
            aoe_damage: BARREL_AOE_DAMAGE,
            chain_timer: -1,
        },
    ));
    let second = world.spawn((
        Position { x: 30.0, z: 50.0 },
        Barrel {
            hp: BARREL_HP,
            aoe_damage: BARREL_AOE_DAMAGE,
            chain_timer: -1,
        },
    ));
    world.spawn((
        Position { x: 0.0, z: 50.0 },
        Velocity { x: 0.0, z: 0.0 },
        Bullet {
            weapon: WeaponKind::Pistol,
            damage: 1,
            payload: BulletPayload::Standard,
            max_range: None,
            start_z: 0.0,
            spawn_tick: 0,
        },
    ));

    combat::resolve_barrels(&mut world, &mut run, &mut rng, &mut buffer, &mut events);
    assert!(world.get::<&Barrel>(first).is_err(), "hit barrel detonates");
    assert!(
        world.get::<&Barrel>(second).unwrap().chain_timer >= 0,
        "neighbor barrel should be fused"
    );
    assert!(events
        .iter()
        .any(|e| matches!(e, SimEvent::BarrelExploded { chained: false })));

    // The fuse burns for exactly BARREL_CHAIN_FUSE ticks.
    for _ in 0..BARREL_CHAIN_FUSE - 1 {
        combat::tick_barrel_chains(&mut world, &mut run, &mut rng, &mut buffer, &mut events);
    }
    assert!(
        world.get::<&Barrel>(second).is_ok(),
        "fused barrel holds until the fuse reaches zero"
    );
    combat::tick_barrel_chains(&mut world, &mut run, &mut rng, &mut buffer, &mut events);
    assert!(world.get::<&Barrel>(second).is_err());
    assert!(events
        .iter()
        .any(|e| matches!(e, SimEvent::BarrelExploded { chained: true })));
    assert_eq!(run.score, 2 * SCORE_BARREL);
}

// ---- Squad damage ----

#[test]
fn test_squad_damage_clamps_at_zero_and_ends_run() {
    let mut run = RunState::new(&PlayerData::default());
    let mut events = Vec::new();
    let player_data = PlayerData::default();

    combat::apply_squad_damage(&mut run, &player_data, 99, &mut events);
    assert_eq!(run.squad_count, 0);
    assert!(run.over, "squad hitting zero must end the run synchronously");
    assert!(matches!(
        events.as_slice(),
        [SimEvent::SquadDamaged { remaining: 0, .. }]
    ));

    // After game over, further damage is ignored.
    combat::apply_squad_damage(&mut run, &player_data, 5, &mut events);
    assert_eq!(events.len(), 1);
}

#[test]
fn test_squad_damage_reduced_by_armor() {
    let mut run = RunState::new(&PlayerData::default());
    run.set_squad(30);
    let mut events = Vec::new();
    let mut player_data = PlayerData::default();
    player_data.armor = 2;

    // armor 2 + squad armor min(2, 30/15) = 4 reduction, floor 1.
    combat::apply_squad_damage(&mut run, &player_data, 6, &mut events);
    assert_eq!(run.squad_count, 28);
    combat::apply_squad_damage(&mut run, &player_data, 2, &mut events);
    assert_eq!(run.squad_count, 27, "damage floors at 1");
}

#[test]
fn test_invincibility_blocks_all_damage() {
    let mut run = RunState::new(&PlayerData::default());
    run.weapon = WeaponKind::Invincibility;
    let mut events = Vec::new();

    combat::apply_squad_damage(&mut run, &PlayerData::default(), 50, &mut events);
    assert_eq!(run.squad_count, 3);
    assert!(!run.over);
    assert!(matches!(events.as_slice(), [SimEvent::DamageBlocked]));
}

// ---- Weapon state machine ----

#[test]
fn test_shotgun_expiry_starts_shared_cooldown() {
    let mut player_data = PlayerData::default();
    player_data.weapon_charges.insert(WeaponKind::Shotgun, 2);
    let mut engine = SimulationEngine::new(SimConfig {
        seed: 5,
        player_data,
    });
    engine.queue_command(PlayerCommand::StartRun);
    engine.tick();
    // A large squad keeps the run safely alive for the whole test.
    engine.run_state_mut().set_squad(50);

    engine.queue_command(PlayerCommand::ActivateWeapon {
        weapon: WeaponKind::Shotgun,
    });
    let snap = engine.tick();
    assert_eq!(snap.weapon, WeaponKind::Shotgun);
    assert_eq!(engine.player_data().charges(WeaponKind::Shotgun), 1);

    // Fast-forward to the end of the duration.
    engine.run_state_mut().weapon_timer_ms = 1.0;
    let snap = engine.tick();
    assert_eq!(snap.weapon, WeaponKind::Pistol);
    assert!(
        snap.skill_cooldown_ms > SKILL_SHARED_COOLDOWN_MS - 100.0,
        "shared cooldown should start at expiry"
    );
    assert!(!snap.skill_ready);
    assert!(snap
        .events
        .iter()
        .any(|e| matches!(e, SimEvent::WeaponExpired { weapon: WeaponKind::Shotgun })));

    // Once the cooldown lapses, the remaining charge re-arms the slot.
    let mut snap = engine.tick();
    for _ in 0..400 {
        if snap.skill_cooldown_ms <= 0.0 {
            break;
        }
        snap = engine.tick();
    }
    assert!(snap.skill_ready, "one charge left, cooldown elapsed");
}

#[test]
fn test_activation_requires_pistol_cooldown_and_charge() {
    let mut engine = start_engine(5);
    // No charges: the command is a silent no-op.
    engine.queue_command(PlayerCommand::ActivateWeapon {
        weapon: WeaponKind::Rocket,
    });
    let snap = engine.tick();
    assert_eq!(snap.weapon, WeaponKind::Pistol);
}

// ---- Camera and bosses ----

#[test]
fn test_camera_freezes_while_boss_alive() {
    let mut engine = start_engine(11);
    let before = engine.tick().camera_z;
    let z = before + 400.0;
    engine.world_mut().spawn((
        Position { x: 0.0, z },
        Enemy {
            hp: 10_000,
            max_hp: 10_000,
            damage: 1,
            class: EnemyClass::Boss,
            kind: EnemyKind::Grunt,
        },
    ));
    let frozen = engine.tick().camera_z;
    assert_eq!(before, frozen, "camera must not advance during a boss fight");
}

// ---- Reinforcements ----

#[test]
fn test_mega_kill_opens_reinforcement_shop() {
    let mut engine = start_engine(21);
    // Clear the opening wave so only the mega-boss is in play.
    let enemies: Vec<hecs::Entity> = {
        let mut q = engine.world_mut().query::<&Enemy>();
        q.iter().map(|(e, _)| e).collect()
    };
    for entity in enemies {
        let _ = engine.world_mut().despawn(entity);
    }
    // A 1 hp mega-boss right in front of the pistol line.
    let z = engine.run_state().player_z() + 20.0;
    engine.world_mut().spawn((
        Position { x: 0.0, z },
        Enemy {
            hp: 1,
            max_hp: 1,
            damage: 1,
            class: EnemyClass::MegaBoss,
            kind: EnemyKind::Grunt,
        },
    ));

    let mut phase = engine.phase();
    for _ in 0..60 {
        let snap = engine.tick();
        phase = snap.phase;
        if phase == GamePhase::Reinforcing {
            assert!(snap.reinforcements.is_some());
            break;
        }
    }
    assert_eq!(phase, GamePhase::Reinforcing);

    let offer = engine.run_state().reinforcements.as_ref().unwrap().offers[0];
    engine.run_state_mut().score = offer.cost + 50;
    let squad_before = engine.run_state().squad_count;

    engine.queue_command(PlayerCommand::BuyReinforcement { tier: 0 });
    engine.queue_command(PlayerCommand::CloseReinforcements);
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::Playing);
    assert_eq!(snap.squad_count, squad_before + offer.troops);
    assert_eq!(snap.score, 50);
}

// ---- Pools and cleanup ----

#[test]
fn test_bullet_pool_truncates_oldest() {
    let mut engine = start_engine(13);
    let camera_z = engine.run_state().camera_z;
    for i in 0..(MAX_BULLETS as u64 + 100) {
        engine.world_mut().spawn((
            Position {
                x: 0.0,
                z: camera_z + 50.0,
            },
            Velocity { x: 0.0, z: 0.0 },
            Bullet {
                weapon: WeaponKind::Pistol,
                damage: 1,
                payload: BulletPayload::Standard,
                max_range: None,
                start_z: camera_z + 50.0,
                spawn_tick: i,
            },
        ));
    }
    let mut buffer = Vec::new();
    let run = engine.run_state().clone();
    cleanup::run(engine.world_mut(), &run, &mut buffer);

    let survivors: Vec<u64> = {
        let mut q = engine.world_mut().query::<&Bullet>();
        q.iter().map(|(_, b)| b.spawn_tick).collect()
    };
    let keep = (MAX_BULLETS as f64 * BULLET_TRUNCATE_RATIO) as usize;
    assert_eq!(survivors.len(), keep);
    let oldest_kept = survivors.iter().min().copied().unwrap();
    assert!(
        oldest_kept >= MAX_BULLETS as u64 + 100 - keep as u64,
        "truncation must shed the oldest bullets first"
    );
}

#[test]
fn test_expired_pickups_are_removed() {
    let mut engine = start_engine(17);
    let camera_z = engine.run_state().camera_z;
    engine.world_mut().spawn((
        Position {
            x: 0.0,
            z: camera_z + 40.0,
        },
        Velocity { x: 0.0, z: 0.0 },
        Pickup {
            kind: PickupKind::Coin,
            value: 1,
            life: 0,
            height: 0.0,
            vert_vel: 0.0,
        },
    ));
    let mut buffer = Vec::new();
    let run = engine.run_state().clone();
    cleanup::run(engine.world_mut(), &run, &mut buffer);
    assert_eq!(engine.world().query::<&Pickup>().iter().count(), 0);
}

// ---- Persistence economy through the engine ----

#[test]
fn test_pickup_collection_credits_player_data() {
    let mut engine = start_engine(23);
    let run = engine.run_state();
    let (player_x, player_z) = (run.player_x, run.player_z());
    engine.world_mut().spawn((
        Position {
            x: player_x,
            z: player_z,
        },
        Velocity { x: 0.0, z: 0.0 },
        Pickup {
            kind: PickupKind::Gem,
            value: 2,
            life: 100,
            height: 0.0,
            vert_vel: 0.0,
        },
    ));
    let snap = engine.tick();
    assert_eq!(snap.gems_collected, 2);
    assert_eq!(engine.player_data().gems, 2);
    assert!(snap
        .events
        .iter()
        .any(|e| matches!(e, SimEvent::PickupCollected { kind: PickupKind::Gem, value: 2 })));
}

// ---- Run lifecycle ----

#[test]
fn test_game_over_freezes_simulation() {
    let mut engine = start_engine(29);
    engine.run_state_mut().set_squad(1);
    // Drop an enemy right on the player line.
    let run = engine.run_state();
    let (player_x, player_z) = (run.player_x, run.player_z());
    engine.world_mut().spawn((
        Position {
            x: player_x,
            z: player_z,
        },
        Enemy {
            hp: 10,
            max_hp: 10,
            damage: 5,
            class: EnemyClass::Normal,
            kind: EnemyKind::Grunt,
        },
    ));
    let mut over = false;
    for _ in 0..30 {
        let snap = engine.tick();
        if snap.phase == GamePhase::GameOver {
            over = true;
            assert_eq!(snap.squad_count, 0);
            assert!(snap
                .events
                .iter()
                .any(|e| matches!(e, SimEvent::GameOver { .. })));
            break;
        }
    }
    assert!(over, "contact damage at squad 1 must end the run");

    // The tick is frozen after game over.
    let tick = engine.time().tick;
    engine.tick();
    assert_eq!(engine.time().tick, tick);

    // StartRun from game over begins a fresh run.
    engine.queue_command(PlayerCommand::StartRun);
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::Playing);
    assert_eq!(snap.wave, 1);
    assert!(snap.squad_count >= 3);
}

#[test]
fn test_pause_freezes_tick() {
    let mut engine = start_engine(31);
    engine.queue_command(PlayerCommand::Pause);
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::Paused);
    let tick = engine.time().tick;
    engine.tick();
    assert_eq!(engine.time().tick, tick);
    engine.queue_command(PlayerCommand::Resume);
    engine.tick();
    assert_eq!(engine.time().tick, tick + 1);
}

#[test]
fn test_target_x_clamped_to_road() {
    let mut engine = start_engine(37);
    engine.run_state_mut().set_squad(50);
    engine.queue_command(PlayerCommand::SetTargetX { x: 10_000.0 });
    let mut snap = engine.tick();
    for _ in 0..300 {
        snap = engine.tick();
    }
    assert!(snap.player_x <= ROAD_HALF_WIDTH - PLAYER_EDGE_MARGIN + 1e-9);
}
