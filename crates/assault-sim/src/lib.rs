//! Headless simulation engine for the bridge-assault core.
//!
//! Owns the hecs ECS world, processes player commands, runs all systems
//! in a fixed per-tick order, and produces `GameSnapshot`s. No rendering,
//! audio, or I/O — hosts drive those from snapshots and events.

pub mod difficulty;
pub mod engine;
pub mod run;
pub mod systems;

#[cfg(test)]
mod tests;
