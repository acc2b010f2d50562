//! Gate generation and resolution.
//!
//! Gates spawn on a fixed z cadence. Troop gates draw operators from a
//! weighted pool keyed off squad size; weapon gates appear on even
//! waves. Generation always yields at least one good and one bad
//! option.

use hecs::{Entity, World};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use assault_core::components::{Gate, GateOption};
use assault_core::constants::*;
use assault_core::enums::{GateEffect, GateOp, WeaponKind};
use assault_core::events::SimEvent;
use assault_core::types::Position;

use crate::run::RunState;
use crate::systems::weapons;

/// Spawn the next gate once the camera closes on the cadence mark.
pub fn maybe_spawn(world: &mut World, run: &mut RunState, rng: &mut ChaCha8Rng) {
    if run.camera_z + SPAWN_DISTANCE <= run.next_gate_z {
        return;
    }
    let z = run.next_gate_z;
    run.next_gate_z += GATE_SPACING;

    let weapon_gate = run.wave % 2 == 0 && run.wave >= 2 && rng.gen::<f64>() < 0.7;
    let options = if weapon_gate {
        weapon_options(rng)
    } else {
        troop_options(run, rng)
    };
    world.spawn((
        Position { x: 0.0, z },
        Gate {
            options,
            triggered: false,
            fade_timer: 0,
            chosen: None,
        },
    ));
}

/// 1-2 weapon panels, randomly placed with a passable gap guaranteed.
fn weapon_options(rng: &mut ChaCha8Rng) -> Vec<GateOption> {
    let count = if rng.gen::<f64>() < 0.4 { 1 } else { 2 };
    let mut weapons = [WeaponKind::Shotgun, WeaponKind::Laser, WeaponKind::Rocket];
    weapons.shuffle(rng);

    let mut options = Vec::with_capacity(count);
    let mut placed: Vec<f64> = Vec::new();
    for i in 0..count {
        let width = 55.0 + rng.gen::<f64>() * 35.0;
        let margin = width / 2.0 + 15.0;
        let mut x = 0.0;
        for _ in 0..20 {
            x = -ROAD_HALF_WIDTH + margin + rng.gen::<f64>() * (ROAD_HALF_WIDTH * 2.0 - margin * 2.0);
            if placed.iter().all(|&prev| (prev - x).abs() >= 80.0) {
                break;
            }
        }
        placed.push(x);
        options.push(GateOption {
            x,
            width,
            effect: GateEffect::Weapon {
                weapon: weapons[i % weapons.len()],
            },
        });
    }
    options
}

/// Full-row troop panels with randomized widths and gaps.
pub(crate) fn troop_options(run: &RunState, rng: &mut ChaCha8Rng) -> Vec<GateOption> {
    let count = if rng.gen::<f64>() < 0.3 { 2 } else { 3 };

    // Panel widths from random factors normalized over the usable road.
    let factors: Vec<f64> = (0..count).map(|_| 0.7 + rng.gen::<f64>() * 0.6).collect();
    let factor_sum: f64 = factors.iter().sum();
    let road = ROAD_HALF_WIDTH * 2.0;
    let usable = road * 0.82;
    let widths: Vec<f64> = factors.iter().map(|f| f / factor_sum * usable).collect();

    let slack = road - widths.iter().sum::<f64>();
    let gaps: Vec<f64> = (0..=count).map(|_| rng.gen::<f64>() + 0.2).collect();
    let gap_sum: f64 = gaps.iter().sum();

    let mut effects: Vec<(GateOp, u32)> = (0..count).map(|_| sample_troop_op(run, rng)).collect();
    if !effects.iter().any(|&(op, _)| op.is_good()) {
        effects[0] = (GateOp::Add, 2 + run.wave / 4);
    }
    if effects.iter().all(|&(op, _)| op.is_good()) {
        effects[count - 1] = bad_troop_op(run, rng);
    }
    effects.shuffle(rng);

    let mut options = Vec::with_capacity(count);
    let mut cur_x = -ROAD_HALF_WIDTH;
    for (i, (op, value)) in effects.into_iter().enumerate() {
        cur_x += gaps[i] / gap_sum * slack;
        options.push(GateOption {
            x: cur_x + widths[i] / 2.0,
            width: widths[i] * 0.9,
            effect: GateEffect::Troop { op, value },
        });
        cur_x += widths[i];
    }
    options
}

/// Cumulative-weight draw from the pool for the current squad regime.
fn sample_troop_op(run: &RunState, rng: &mut ChaCha8Rng) -> (GateOp, u32) {
    let wave = run.wave;
    let mut pool: Vec<(GateOp, u32, f64)> = Vec::with_capacity(6);
    // Fixed +/- pair, always present.
    pool.push((GateOp::Add, 2 + rng.gen_range(0..2) + wave / 4, 3.0));
    pool.push((GateOp::Sub, 1 + rng.gen_range(0..(wave.div_ceil(5)).clamp(1, 3)), 2.0));

    if run.squad_count < PERCENT_GATE_THRESHOLD {
        // Small squad: multipliers as the comeback/setback mechanic.
        if wave >= 3 {
            pool.push((GateOp::Mul, 2, 1.2));
            if wave >= 8 {
                pool.push((GateOp::Mul, 3, 0.4));
            }
        }
        if wave >= 4 {
            pool.push((GateOp::Div, 2, 1.5));
            if wave >= 8 {
                pool.push((GateOp::Div, 3, 0.6));
            }
        }
    } else {
        // Large squad: smoother percentage scaling.
        let mut good = vec![15, 20];
        if wave >= 6 {
            good.push(25);
        }
        if wave >= 12 {
            good.push(30);
        }
        pool.push((GateOp::AddPercent, good[rng.gen_range(0..good.len())], 1.5));

        let mut bad = vec![10, 15];
        if wave >= 8 {
            bad.push(20);
        }
        if wave >= 15 {
            bad.push(25);
        }
        pool.push((GateOp::SubPercent, bad[rng.gen_range(0..bad.len())], 1.2));
    }

    let total: f64 = pool.iter().map(|&(_, _, w)| w).sum();
    let mut r = rng.gen::<f64>() * total;
    for &(op, value, w) in &pool {
        r -= w;
        if r <= 0.0 {
            return (op, value);
        }
    }
    let (op, value, _) = pool[0];
    (op, value)
}

fn bad_troop_op(run: &RunState, rng: &mut ChaCha8Rng) -> (GateOp, u32) {
    if run.squad_count >= PERCENT_GATE_THRESHOLD {
        let mut pcts = vec![10, 15];
        if run.wave >= 8 {
            pcts.push(20);
        }
        return (GateOp::SubPercent, pcts[rng.gen_range(0..pcts.len())]);
    }
    let mut pool = vec![(
        GateOp::Sub,
        1 + rng.gen_range(0..(run.wave.div_ceil(4)).clamp(1, 3)),
    )];
    if run.wave >= 4 {
        pool.push((GateOp::Div, 2));
    }
    if run.wave >= 8 {
        pool.push((GateOp::Div, 3));
    }
    pool[rng.gen_range(0..pool.len())]
}

/// One troop-gate operator application. Division rounds up, which
/// slightly favors the player; intended behavior.
pub fn apply_op(squad: u32, op: GateOp, value: u32) -> u32 {
    match op {
        GateOp::Add => squad + value,
        GateOp::Sub => squad.saturating_sub(value).max(1),
        GateOp::Mul => squad * value,
        GateOp::Div => squad.div_ceil(value.max(1)).max(1),
        GateOp::AddPercent => {
            squad + (((squad * value) as f64 / 100.0).round() as u32).max(1)
        }
        GateOp::SubPercent => squad
            .saturating_sub(((squad * value) as f64 / 100.0).round() as u32)
            .max(1),
    }
}

/// Resolve gates in the trigger band against the player's post-move x.
pub fn resolve(world: &mut World, run: &mut RunState, events: &mut Vec<SimEvent>) {
    let gates: Vec<Entity> = world
        .query::<(&Gate, &Position)>()
        .iter()
        .map(|(entity, _)| entity)
        .collect();

    for gate_entity in gates {
        let rel_z = {
            let Ok(pos) = world.get::<&Position>(gate_entity) else {
                continue;
            };
            pos.z - run.camera_z
        };
        let mut resolved: Option<GateEffect> = None;
        {
            let Ok(mut gate) = world.get::<&mut Gate>(gate_entity) else {
                continue;
            };
            // Reborrow so the options iteration and the field writes
            // below borrow disjoint fields.
            let gate = &mut *gate;
            if gate.triggered {
                if gate.fade_timer > 0 {
                    gate.fade_timer -= 1;
                }
                continue;
            }
            if rel_z <= GATE_BAND_HI && rel_z > GATE_BAND_LO {
                for (i, opt) in gate.options.iter().enumerate() {
                    let half = opt.width / 2.0 + GATE_X_MARGIN;
                    if run.player_x > opt.x - half && run.player_x < opt.x + half {
                        gate.triggered = true;
                        gate.fade_timer = GATE_FADE_TICKS;
                        gate.chosen = Some(i);
                        resolved = Some(opt.effect);
                        break;
                    }
                }
                if resolved.is_none() && rel_z < -8.0 {
                    // Passed through the gap; gate lapses untouched.
                    gate.triggered = true;
                    gate.fade_timer = 0;
                    events.push(SimEvent::GateMissed);
                }
            }
        }
        if let Some(effect) = resolved {
            apply_effect(run, effect, events);
        }
    }
}

fn apply_effect(run: &mut RunState, effect: GateEffect, events: &mut Vec<SimEvent>) {
    match effect {
        GateEffect::Troop { op, value } => {
            let before = run.squad_count;
            let after = apply_op(before, op, value);
            run.set_squad(after);
            events.push(SimEvent::GateResolved {
                effect,
                delta: after as i64 - before as i64,
            });
        }
        GateEffect::Weapon { weapon } => {
            weapons::grant_weapon(run, weapon);
            events.push(SimEvent::GateResolved { effect, delta: 0 });
        }
    }
}
