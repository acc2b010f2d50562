//! Adaptive difficulty — scales enemy toughness to the squad trajectory.
//!
//! Pure functions, no ECS dependency. The factor compares the player's
//! effective squad against an expected baseline for the wave and feeds
//! enemy hp/damage multiplicatively. Speed uses a sub-linear mapping so
//! movement never trivializes or brick-walls.

/// Expected squad size for a given wave with average gate luck:
/// start at 3, roughly +1.8 per wave.
pub fn expected_squad(wave: u32) -> f64 {
    3.0 + wave as f64 * 1.8
}

/// Compute the adaptive difficulty factor, always within [0.5, 2.5].
///
/// The effective squad is the larger of the current squad and 60% of the
/// run peak, so shedding troops only eases the pressure partially.
/// pow(0.55) compresses the ratio: a 4x power advantage becomes roughly
/// a 2x enemy buff.
pub fn adaptive_factor(squad: u32, peak_squad: u32, wave: u32) -> f64 {
    let effective = (squad as f64).max(peak_squad as f64 * 0.6);
    let ratio = effective / expected_squad(wave).max(1.0);
    ratio.max(0.25).powf(0.55).clamp(0.5, 2.5)
}

/// Enemy speed multiplier derived from the factor: sub-linear, so
/// factor 2.0 only yields 1.25x movement.
pub fn speed_mult(factor: f64) -> f64 {
    1.0 + (factor - 1.0) * 0.25
}
