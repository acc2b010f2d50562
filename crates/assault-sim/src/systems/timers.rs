//! Single sweep over the run's millisecond timers: weapon duration,
//! shared skill cooldown, and the combo window.

use assault_core::constants::*;
use assault_core::economy::PlayerData;
use assault_core::enums::WeaponKind;
use assault_core::events::SimEvent;

use crate::run::RunState;

pub fn run(run: &mut RunState, player_data: &PlayerData, events: &mut Vec<SimEvent>) {
    // Active consumable burning down.
    if run.weapon != WeaponKind::Pistol {
        run.weapon_timer_ms -= DT_MS;
        if run.weapon_timer_ms <= 0.0 {
            let expired = run.weapon;
            run.weapon = WeaponKind::Pistol;
            run.weapon_timer_ms = 0.0;
            run.skill_cooldown_ms = SKILL_SHARED_COOLDOWN_MS;
            run.skill_ready = false;
            events.push(SimEvent::WeaponExpired { weapon: expired });
        }
    }

    // Shared cooldown gating the next activation.
    if run.skill_cooldown_ms > 0.0 {
        run.skill_cooldown_ms -= DT_MS;
        if run.skill_cooldown_ms < 0.0 {
            run.skill_cooldown_ms = 0.0;
        }
    }
    if run.skill_cooldown_ms <= 0.0 && run.weapon == WeaponKind::Pistol {
        // Read through live so charges bought mid-run arm the slot.
        run.skill_ready = player_data.any_charges();
    }

    // Combo window. A chain that reaches the minimum length pays a
    // score bonus when the window lapses.
    if run.combo_timer_ms > 0.0 {
        run.combo_timer_ms -= DT_MS;
        if run.combo_timer_ms <= 0.0 {
            run.combo_timer_ms = 0.0;
            if run.combo_count >= COMBO_MIN_CHAIN {
                let bonus = run.combo_count * COMBO_BONUS_PER_KILL;
                run.score += bonus;
                events.push(SimEvent::ComboBonus {
                    chain: run.combo_count,
                    bonus,
                });
            }
            if run.combo_count > run.best_combo {
                run.best_combo = run.combo_count;
            }
            run.combo_count = 0;
        }
    }
}
