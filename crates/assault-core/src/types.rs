//! Fundamental geometric and simulation types.

use serde::{Deserialize, Serialize};

/// 2D position in lane space. x = lateral offset from the road center,
/// z = depth along the road (monotonically increasing ahead of the camera).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub z: f64,
}

/// 2D velocity in lane space (world units per tick).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub x: f64,
    pub z: f64,
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in milliseconds.
    pub elapsed_ms: f64,
}

impl Position {
    pub fn new(x: f64, z: f64) -> Self {
        Self { x, z }
    }

    /// Euclidean distance to another position.
    pub fn distance_to(&self, other: &Position) -> f64 {
        let dx = other.x - self.x;
        let dz = other.z - self.z;
        (dx * dx + dz * dz).sqrt()
    }
}

impl Velocity {
    pub fn new(x: f64, z: f64) -> Self {
        Self { x, z }
    }
}

impl SimTime {
    /// Advance by one tick.
    pub fn advance(&mut self) {
        self.tick += 1;
        self.elapsed_ms += crate::constants::DT_MS;
    }
}
