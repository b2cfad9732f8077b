use crate::domain::Player;
use crate::domain::Room;
use crate::domain::RoomStatus;
use crate::domain::Round;
use crate::error::AppError;
use crate::error::AppResult;
use crate::store::Store;
use std::sync::Arc;

const MAX_NICKNAME_LEN: usize = 50;

/// Create/start/next/end/delete and host-player creation — everything about
/// a Room's own lifecycle, as opposed to what happens inside a single round.
/// Thin by design: every rule that needs a lock or a transaction lives in
/// the [`Store`] implementation; this layer only rejects input that is
/// malformed before it ever reaches the database.
pub struct RoomManager {
    store: Arc<dyn Store>,
}

impl RoomManager {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn create_room(&self) -> AppResult<(Room, Player)> {
        self.store.create_room().await
    }

    pub async fn join_room(&self, code: &str, nickname: &str) -> AppResult<Player> {
        let nickname = nickname.trim();
        if nickname.is_empty() || nickname.chars().count() > MAX_NICKNAME_LEN {
            return Err(AppError::invalid_input(format!(
                "nickname must be 1-{MAX_NICKNAME_LEN} characters"
            )));
        }
        self.store.join_room(code, nickname).await
    }

    pub async fn get_room_by_code(&self, code: &str) -> AppResult<Room> {
        self.store.get_room_by_code(code).await
    }

    pub async fn get_room(&self, room_id: crate::domain::Id) -> AppResult<Room> {
        self.store.get_room(room_id).await
    }

    pub async fn list_rooms(
        &self,
        status: Option<RoomStatus>,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<Room>, i64)> {
        self.store.list_rooms(status, limit, offset).await
    }

    pub async fn list_players(&self, room_id: crate::domain::Id) -> AppResult<Vec<Player>> {
        self.store.list_players(room_id).await
    }

    pub async fn start_game(&self, room_id: crate::domain::Id) -> AppResult<Round> {
        self.store.start_game(room_id).await
    }

    pub async fn next_round(&self, room_id: crate::domain::Id) -> AppResult<Round> {
        self.store.next_round(room_id).await
    }

    pub async fn end_game(&self, room_id: crate::domain::Id) -> AppResult<()> {
        self.store.end_game(room_id).await
    }

    pub async fn delete_room(&self, room_id: crate::domain::Id) -> AppResult<()> {
        self.store.delete_room(room_id).await
    }
}
