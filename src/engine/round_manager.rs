use crate::domain::Choice;
use crate::domain::Id;
use crate::domain::Pair;
use crate::domain::Round;
use crate::dto::RoundResultResponse;
use crate::error::AppResult;
use crate::store::Store;
use std::sync::Arc;

/// Action submission, finalization, publication and skip — the concurrency
/// core. Every method here is a thin pass-through to [`Store`], which is
/// where the row lock, the idempotency check and the version bump actually
/// live; this layer exists so handlers never talk to `Store` directly.
pub struct RoundManager {
    store: Arc<dyn Store>,
}

impl RoundManager {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn current_round(&self, room_id: Id) -> AppResult<Option<Round>> {
        self.store.current_round(room_id).await
    }

    pub async fn get_round(&self, room_id: Id, round_number: i32) -> AppResult<Round> {
        self.store.get_round(room_id, round_number).await
    }

    pub async fn get_pair(&self, room_id: Id, round_number: i32, player_id: Id) -> AppResult<Pair> {
        self.store.get_pair_for(room_id, round_number, player_id).await
    }

    pub async fn submit_action(
        &self,
        room_id: Id,
        round_number: i32,
        player_id: Id,
        choice: Choice,
    ) -> AppResult<()> {
        self.store.submit_action(room_id, round_number, player_id, choice).await
    }

    pub async fn publish_round(&self, room_id: Id, round_number: i32) -> AppResult<()> {
        self.store.publish_round(room_id, round_number).await
    }

    pub async fn skip_round(&self, room_id: Id, round_number: i32) -> AppResult<()> {
        self.store.skip_round(room_id, round_number).await
    }

    pub async fn get_result(&self, room_id: Id, round_number: i32, player_id: Id) -> AppResult<RoundResultResponse> {
        self.store.get_result(room_id, round_number, player_id).await
    }
}
