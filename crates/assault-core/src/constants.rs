//! Simulation constants and tuning parameters.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Milliseconds per tick. Countdown timers (weapon duration, shared
/// cooldown, combo window) burn down by this amount each tick.
pub const DT_MS: f64 = 1000.0 / TICK_RATE as f64;

// --- Road geometry ---

/// Half the playable road width (world units, lateral axis).
pub const ROAD_HALF_WIDTH: f64 = 220.0;

/// Player lateral margin kept from the road edge.
pub const PLAYER_EDGE_MARGIN: f64 = 15.0;

/// Player z offset ahead of the camera.
pub const PLAYER_Z_OFFSET: f64 = 10.0;

/// Easing factor applied per tick toward the target x.
pub const PLAYER_EASE: f64 = 0.12;

// --- Motion (per tick) ---

/// Camera advance per tick while no boss is alive.
pub const CAMERA_SPEED: f64 = 0.8;

/// Player bullet speed per tick.
pub const BULLET_SPEED: f64 = 10.0;

/// Base enemy advance per tick (before wave and difficulty scaling).
pub const ENEMY_SPEED: f64 = 0.12;

/// Base enemy lateral tracking speed per tick.
pub const ENEMY_LATERAL_SPEED: f64 = 0.15;

// --- Spawning ---

/// Distance ahead of the camera at which entities spawn.
pub const SPAWN_DISTANCE: f64 = 500.0;

/// Z cadence between consecutive gates.
pub const GATE_SPACING: f64 = 350.0;

/// Base hp of a normal enemy before wave scaling.
pub const ENEMY_BASE_HP: f64 = 3.0;

/// Hard cap on enemies per wave.
pub const MAX_WAVE_ENEMIES: u32 = 25;

/// Enemies per row in a wave layout.
pub const WAVE_ROW_WIDTH: u32 = 5;

/// Hp/damage dampener applied to the first two waves.
pub const EARLY_WAVE_DAMPENER: f64 = 0.5;

// --- Weapons ---

/// Base fire interval for non-pistol weapons (ms).
pub const SHOOT_INTERVAL_MS: f64 = 120.0;

/// Pistol fire interval (ms).
pub const PISTOL_INTERVAL_MS: f64 = 90.0;

/// Shared cooldown after any consumable weapon expires (ms).
pub const SKILL_SHARED_COOLDOWN_MS: f64 = 5000.0;

/// Hard cap on live player bullets. Oldest are truncated on overflow.
pub const MAX_BULLETS: usize = 300;

/// Share of the bullet cap kept after truncation.
pub const BULLET_TRUNCATE_RATIO: f64 = 0.7;

/// Hard cap on live enemy bullets.
pub const MAX_ENEMY_BULLETS: usize = 200;

// --- Gates ---

/// Squad size at which troop gates switch from ×/÷ to percentage operators.
pub const PERCENT_GATE_THRESHOLD: u32 = 20;

/// Extra forgiving lateral margin on each side of a gate panel.
pub const GATE_X_MARGIN: f64 = 12.0;

/// Gate resolution z-band relative to the camera: (lo, hi].
pub const GATE_BAND_LO: f64 = -25.0;
pub const GATE_BAND_HI: f64 = 8.0;

/// Cosmetic fade duration after a gate triggers (ticks).
pub const GATE_FADE_TICKS: u32 = 60;

// --- Bosses ---

/// Boss hold distance ahead of the player line.
pub const BOSS_HOLD_DISTANCE: f64 = SPAWN_DISTANCE - 60.0;

/// Minimum boss shoot interval (ticks).
pub const BOSS_MIN_SHOOT_INTERVAL: u32 = 55;

/// Minimum lateral separation maintained between bosses.
pub const BOSS_MIN_SEPARATION: f64 = 80.0;

/// Maximum bosses in one spawn group.
pub const MAX_BOSS_GROUP: u32 = 4;

/// Mega-boss base skill interval (ticks), shrinking with mega level.
pub const MEGA_SKILL_INTERVAL_BASE: u32 = 240;
pub const MEGA_SKILL_INTERVAL_MIN: u32 = 150;

// --- Combat ---

/// Bullet-enemy hitbox half extents (lateral, depth).
pub const HIT_X: f64 = 22.0;
pub const HIT_Z: f64 = 16.0;

/// Wider hitbox for rockets.
pub const ROCKET_HIT_X: f64 = 28.0;
pub const ROCKET_HIT_Z: f64 = 20.0;

/// AoE damage floor at the edge of the blast radius.
pub const AOE_FALLOFF_FLOOR: f64 = 0.3;

/// Barrel hit points.
pub const BARREL_HP: i32 = 2;

/// Barrel blast damage and radius.
pub const BARREL_AOE_DAMAGE: i32 = 5;
pub const BARREL_AOE_RADIUS: f64 = 55.0;

/// Fuse ticks between a barrel catching a chain and detonating.
pub const BARREL_CHAIN_FUSE: i32 = 8;

/// Extra squad damage reduction per 15 troops, capped.
pub const SQUAD_ARMOR_DIVISOR: u32 = 15;
pub const SQUAD_ARMOR_CAP: i32 = 2;

// --- Scoring ---

/// Kill score by enemy class.
pub const SCORE_NORMAL: u32 = 10;
pub const SCORE_HEAVY: u32 = 25;
pub const SCORE_BOSS: u32 = 100;
pub const SCORE_MEGA_BOSS: u32 = 300;
pub const SCORE_BARREL: u32 = 25;

/// Combo window (ms) and minimum chain length that pays a bonus.
pub const COMBO_TIMEOUT_MS: f64 = 2000.0;
pub const COMBO_MIN_CHAIN: u32 = 3;
pub const COMBO_BONUS_PER_KILL: u32 = 5;

// --- Pickups ---

/// Base coins dropped by a boss and extra per boss level.
pub const COIN_DROP_BASE: u32 = 5;
pub const COIN_DROP_PER_LEVEL: u32 = 3;
pub const COIN_DROP_LEVEL_CAP: u32 = 15;

/// Auto-pickup pull ranges.
pub const COIN_MAGNET_RANGE: f64 = 80.0;
pub const GEM_MAGNET_RANGE: f64 = 120.0;

/// Collection radius around the player.
pub const PICKUP_RADIUS: f64 = 25.0;

/// Pickup lifetimes (ticks).
pub const COIN_LIFE_TICKS: i32 = 600;
pub const GEM_LIFE_TICKS: i32 = 800;

/// Vertical gravity applied to airborne pickups per tick.
pub const PICKUP_GRAVITY: f64 = 0.25;

// --- Run setup ---

/// Starting squad before the squad talent is applied.
pub const STARTING_SQUAD: u32 = 3;
