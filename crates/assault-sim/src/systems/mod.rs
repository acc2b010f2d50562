//! Per-tick simulation systems, run in a fixed order by the engine.

pub mod boss_ai;
pub mod cleanup;
pub mod combat;
pub mod gates;
pub mod movement;
pub mod snapshot;
pub mod timers;
pub mod wave_director;
pub mod weapons;
