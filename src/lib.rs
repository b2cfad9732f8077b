pub mod config;
pub mod domain;
pub mod dto;
pub mod engine;
pub mod error;
pub mod hosting;
pub mod snapshot;
pub mod social;
pub mod store;

pub use error::AppError;

/// number of rounds a room plays, fixed by the ruleset
pub const TOTAL_ROUNDS: i32 = 10;
/// rounds during which players may exchange a message with their opponent
pub const MESSAGE_ROUNDS: [i32; 2] = [5, 6];
/// earliest round after which indicators may be assigned
pub const MIN_INDICATOR_ROUND: i32 = 6;

/// finished rooms older than this are reclaimed by the cleanup task
pub const FINISHED_ROOM_TTL: std::time::Duration = std::time::Duration::from_secs(24 * 60 * 60);
/// waiting/playing rooms idle longer than this are reclaimed by the cleanup task
pub const IDLE_ROOM_TTL: std::time::Duration = std::time::Duration::from_secs(2 * 60 * 60);
/// how often the cleanup task sweeps for stale rooms
pub const CLEANUP_INTERVAL: std::time::Duration = std::time::Duration::from_secs(6 * 60 * 60);
