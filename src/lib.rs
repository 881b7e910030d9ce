// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app_dirs;
pub mod config;
pub mod events;
pub mod runtime;
pub mod scores;
pub mod session;
pub mod spawner;
pub mod vocab;
pub mod word;

/// Period of the movement tick, in milliseconds. Every active word advances
/// by its fall speed once per tick; the spawn countdown is multiplexed onto
/// the same tick.
pub const TICK_RATE_MS: u64 = 30;
