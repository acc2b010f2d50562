//! Simulation engine — the core of the game.
//!
//! `SimulationEngine` owns the hecs ECS world, the per-run state, and
//! the persistent player data. It drains player commands at tick
//! boundaries, runs all systems in a fixed order, and produces
//! `GameSnapshot`s. Completely headless, enabling deterministic tests.

use std::collections::VecDeque;

use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use assault_core::commands::PlayerCommand;
use assault_core::constants::*;
use assault_core::economy::PlayerData;
use assault_core::enums::GamePhase;
use assault_core::events::SimEvent;
use assault_core::state::GameSnapshot;
use assault_core::types::SimTime;

use crate::run::RunState;
use crate::systems;

/// Configuration for starting a new simulation.
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Persistent progress loaded by the host at startup.
    pub player_data: PlayerData,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            player_data: PlayerData::default(),
        }
    }
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    phase: GamePhase,
    rng: ChaCha8Rng,
    run: RunState,
    player_data: PlayerData,
    command_queue: VecDeque<PlayerCommand>,
    despawn_buffer: Vec<hecs::Entity>,
    events: Vec<SimEvent>,
}

impl SimulationEngine {
    /// Create a new simulation engine with the given config.
    pub fn new(config: SimConfig) -> Self {
        let run = RunState::new(&config.player_data);
        Self {
            world: World::new(),
            time: SimTime::default(),
            phase: GamePhase::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            run,
            player_data: config.player_data,
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one tick and return the resulting
    /// snapshot. Paused, reinforcing, idle, and game-over phases freeze
    /// the whole tick.
    pub fn tick(&mut self) -> GameSnapshot {
        self.process_commands();

        if self.phase == GamePhase::Playing {
            self.run_systems();
            self.time.advance();

            if self.run.over {
                self.phase = GamePhase::GameOver;
                self.events.push(SimEvent::GameOver {
                    score: self.run.score,
                    wave: self.run.wave,
                });
            } else if self.run.reinforcements.is_some() {
                self.phase = GamePhase::Reinforcing;
            }
        }

        let events = std::mem::take(&mut self.events);
        systems::snapshot::build(&self.world, &self.run, self.time, self.phase, events)
    }

    /// Get the current game phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Read-only view of the per-run state.
    pub fn run_state(&self) -> &RunState {
        &self.run
    }

    /// The persistent player data, mutated in place by pickups and
    /// purchases. Committing it to storage is the host's job.
    pub fn player_data(&self) -> &PlayerData {
        &self.player_data
    }

    /// Mutable player data access for between-run shop purchases.
    pub fn player_data_mut(&mut self) -> &mut PlayerData {
        &mut self.player_data
    }

    #[cfg(test)]
    pub fn run_state_mut(&mut self) -> &mut RunState {
        &mut self.run
    }

    #[cfg(test)]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::StartRun => {
                if matches!(self.phase, GamePhase::Idle | GamePhase::GameOver) {
                    self.world.clear();
                    self.run = RunState::new(&self.player_data);
                    self.time = SimTime::default();
                    // The opening wave spawns immediately; later waves
                    // come from the in-loop spawn check.
                    systems::wave_director::spawn_enemy_wave(
                        &mut self.world,
                        &mut self.run,
                        &mut self.rng,
                    );
                    self.phase = GamePhase::Playing;
                }
            }
            PlayerCommand::Pause => {
                if self.phase == GamePhase::Playing {
                    self.phase = GamePhase::Paused;
                }
            }
            PlayerCommand::Resume => {
                if self.phase == GamePhase::Paused {
                    self.phase = GamePhase::Playing;
                }
            }
            PlayerCommand::SetTargetX { x } => {
                let bound = ROAD_HALF_WIDTH - PLAYER_EDGE_MARGIN;
                self.run.target_x = Some(x.clamp(-bound, bound));
            }
            PlayerCommand::ActivateWeapon { weapon } => {
                if self.phase == GamePhase::Playing {
                    systems::weapons::activate_weapon(
                        &mut self.run,
                        &mut self.player_data,
                        weapon,
                        &mut self.events,
                    );
                }
            }
            PlayerCommand::BuyReinforcement { tier } => {
                if self.phase == GamePhase::Reinforcing {
                    self.buy_reinforcement(tier);
                }
            }
            PlayerCommand::CloseReinforcements => {
                if self.phase == GamePhase::Reinforcing {
                    self.run.reinforcements = None;
                    self.phase = GamePhase::Playing;
                }
            }
        }
    }

    /// Spend score on a reinforcement tier, once per opening.
    fn buy_reinforcement(&mut self, tier: usize) {
        let Some(state) = self.run.reinforcements.as_mut() else {
            return;
        };
        let Some(offer) = state.offers.get(tier) else {
            return;
        };
        if state.bought[tier] || self.run.score < offer.cost {
            return;
        }
        let troops = offer.troops;
        self.run.score -= offer.cost;
        state.bought[tier] = true;
        let squad = self.run.squad_count + troops;
        self.run.set_squad(squad);
    }

    /// Run all systems in order. The intra-tick ordering is load-bearing:
    /// this tick's bullets can kill an enemy before its contact check,
    /// and gates resolve against the player's post-move position.
    fn run_systems(&mut self) {
        // 1. Player easing toward the drained target, camera advance.
        systems::movement::update_player(&mut self.run);
        systems::movement::advance_camera(&self.world, &mut self.run);
        // 2. Timer sweep: weapon expiry, shared cooldown, combo payout.
        systems::timers::run(&mut self.run, &self.player_data, &mut self.events);
        // 3. Auto-fire.
        systems::weapons::run(
            &mut self.world,
            &mut self.run,
            &mut self.rng,
            &self.player_data,
            self.time.tick,
            &mut self.events,
        );
        // 4. Bullet integration and combat resolution.
        systems::movement::integrate_bullets(&mut self.world);
        systems::combat::resolve_bullets(
            &mut self.world,
            &mut self.run,
            &mut self.rng,
            &mut self.despawn_buffer,
            &mut self.events,
        );
        systems::combat::resolve_barrels(
            &mut self.world,
            &mut self.run,
            &mut self.rng,
            &mut self.despawn_buffer,
            &mut self.events,
        );
        systems::combat::tick_barrel_chains(
            &mut self.world,
            &mut self.run,
            &mut self.rng,
            &mut self.despawn_buffer,
            &mut self.events,
        );
        // 5. Enemy advance, boss AI, contact damage.
        systems::movement::move_enemies(&mut self.world, &self.run);
        systems::boss_ai::run(
            &mut self.world,
            &mut self.run,
            &mut self.rng,
            &self.player_data,
            self.time.tick,
            &mut self.events,
        );
        systems::combat::enemy_contact(
            &mut self.world,
            &mut self.run,
            &self.player_data,
            &mut self.despawn_buffer,
            &mut self.events,
        );
        // 6. Enemy bullet flight and player hits.
        systems::movement::integrate_enemy_bullets(&mut self.world);
        systems::combat::enemy_bullet_hits(
            &mut self.world,
            &mut self.run,
            &self.player_data,
            &mut self.despawn_buffer,
            &mut self.events,
        );
        // 7. Gate resolution against the post-move player x.
        systems::gates::resolve(&mut self.world, &mut self.run, &mut self.events);
        // 8. Spawn checks: waves, bosses, barrels, gates.
        systems::wave_director::run(
            &mut self.world,
            &mut self.run,
            &mut self.rng,
            &mut self.events,
        );
        systems::gates::maybe_spawn(&mut self.world, &mut self.run, &mut self.rng);
        // 9. Pickup physics and collection.
        systems::movement::update_pickups(
            &mut self.world,
            &mut self.run,
            &mut self.player_data,
            &mut self.events,
        );
        // 10. Cleanup and pool caps.
        systems::cleanup::run(&mut self.world, &self.run, &mut self.despawn_buffer);
    }
}
