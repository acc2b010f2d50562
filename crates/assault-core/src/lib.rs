//! Core types and definitions for the bridge-assault simulation.
//!
//! This crate defines the vocabulary shared across the workspace:
//! components, commands, state snapshots, events, economy data, and
//! constants. It has no dependency on any ECS or runtime framework.

pub mod commands;
pub mod components;
pub mod constants;
pub mod economy;
pub mod enums;
pub mod events;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;
