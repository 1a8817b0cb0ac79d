//! Difficulty tables.  Only the loop interval scales with level; the
//! hardcore spawner keeps a fixed period.

pub const DEFAULT_BASE_INTERVAL_MS: u64 = 20;

pub const HARDCORE_SPAWN_MS: u64 = 3_000;

/// Score increments needed per level.
pub const SCORE_PER_LEVEL: u32 = 5;

const MIN_INTERVAL_MS: u64 = 1;

/// Main loop period for `level`: `base - level`, never below 1 ms.
pub fn loop_interval_ms(base_ms: u64, level: u32) -> u64 {
    base_ms.saturating_sub(level as u64).max(MIN_INTERVAL_MS)
}

/// True when reaching `score` should bump the level.
pub fn is_level_up(score: u32) -> bool {
    score > 0 && score % SCORE_PER_LEVEL == 0
}
