mod cleanup;
#[cfg(test)]
mod memory;
mod pool;
mod postgres;
pub mod schema;

pub use cleanup::Cleanup;
#[cfg(test)]
pub use memory::MemStore;
pub use pool::Pool;
pub use postgres::PgStore;

use crate::domain::Action;
use crate::domain::Choice;
use crate::domain::Id;
use crate::domain::Indicator;
use crate::domain::Message;
use crate::domain::Pair;
use crate::domain::Player;
use crate::domain::Room;
use crate::domain::RoomStatus;
use crate::domain::Round;
use crate::dto::RoundResultResponse;
use crate::error::AppResult;
use async_trait::async_trait;
use std::time::Duration;

/// Persistent CRUD over every entity in §3, plus the row-level locking and
/// transactional atomicity the round/room orchestration above it relies on.
///
/// Each mutating method here *is* a single atomic unit of work: it opens a
/// transaction (acquiring whatever row locks it needs), applies the rule
/// (delegating to `crate::engine` for the parts that are pure functions —
/// pairing, payoffs, state transitions), bumps `state_version` when the
/// change is externally visible, and commits. Callers never see a partial
/// write. [`PgStore`] is the production implementation; [`MemStore`] is an
/// in-memory stand-in used by tests that would otherwise need a live
/// Postgres to exercise the concurrency core.
#[async_trait]
pub trait Store: Send + Sync {
    // --- Room lifecycle -----------------------------------------------
    async fn create_room(&self) -> AppResult<(Room, Player)>;
    async fn get_room_by_code(&self, code: &str) -> AppResult<Room>;
    async fn get_room(&self, room_id: Id) -> AppResult<Room>;
    async fn list_rooms(
        &self,
        status: Option<RoomStatus>,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<Room>, i64)>;
    async fn delete_room(&self, room_id: Id) -> AppResult<()>;
    async fn join_room(&self, code: &str, nickname: &str) -> AppResult<Player>;
    async fn list_players(&self, room_id: Id) -> AppResult<Vec<Player>>;

    async fn start_game(&self, room_id: Id) -> AppResult<Round>;
    async fn next_round(&self, room_id: Id) -> AppResult<Round>;
    async fn end_game(&self, room_id: Id) -> AppResult<()>;

    // --- Round / concurrency core ---------------------------------------
    async fn current_round(&self, room_id: Id) -> AppResult<Option<Round>>;
    async fn get_round(&self, room_id: Id, round_number: i32) -> AppResult<Round>;
    async fn list_rounds(&self, room_id: Id) -> AppResult<Vec<Round>>;
    async fn get_pair_for(&self, room_id: Id, round_number: i32, player_id: Id) -> AppResult<Pair>;
    async fn list_pairs(&self, room_id: Id, round_number: i32) -> AppResult<Vec<Pair>>;

    async fn submit_action(
        &self,
        room_id: Id,
        round_number: i32,
        player_id: Id,
        choice: Choice,
    ) -> AppResult<()>;
    async fn publish_round(&self, room_id: Id, round_number: i32) -> AppResult<()>;
    async fn skip_round(&self, room_id: Id, round_number: i32) -> AppResult<()>;
    async fn list_round_actions(&self, room_id: Id, round_number: i32) -> AppResult<Vec<Action>>;
    async fn get_result(
        &self,
        room_id: Id,
        round_number: i32,
        player_id: Id,
    ) -> AppResult<RoundResultResponse>;

    // --- Social -----------------------------------------------------------
    async fn send_message(
        &self,
        room_id: Id,
        round_number: i32,
        sender_id: Id,
        content: &str,
    ) -> AppResult<()>;
    async fn get_message_for(
        &self,
        room_id: Id,
        round_number: i32,
        player_id: Id,
    ) -> AppResult<Option<Message>>;

    async fn assign_indicators(&self, room_id: Id) -> AppResult<()>;
    async fn get_indicator(&self, room_id: Id, player_id: Id) -> AppResult<Indicator>;
    async fn indicators_assigned(&self, room_id: Id) -> AppResult<bool>;
    async fn list_indicators(&self, room_id: Id) -> AppResult<Vec<Indicator>>;

    // --- Maintenance --------------------------------------------------
    async fn sweep_stale_rooms(&self, finished_ttl: Duration, idle_ttl: Duration) -> AppResult<usize>;
}
