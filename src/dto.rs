//! Request and response payload shapes for the HTTP interface. Kept separate
//! from `domain` so persisted entities and wire formats can evolve independently.
use crate::domain::Choice;
use crate::domain::Id;
use crate::domain::Phase;
use crate::domain::Room;
use crate::domain::RoomStatus;
use crate::domain::RoundStatus;
use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CreateRoomResponse {
    pub room_id: Id,
    pub code: String,
    pub host_player_id: Id,
}

#[derive(Debug, Deserialize)]
pub struct JoinRequest {
    pub nickname: String,
}

#[derive(Debug, Serialize)]
pub struct JoinResponse {
    pub player_id: Id,
    pub room_id: Id,
    pub display_name: String,
}

#[derive(Debug, Deserialize)]
pub struct RoomListQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct RoomListResponse {
    pub rooms: Vec<Room>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Serialize)]
pub struct RoomLookupResponse {
    pub room_id: Id,
    pub code: String,
    pub status: RoomStatus,
    pub current_round: i32,
    pub player_count: i64,
}

#[derive(Debug, Serialize)]
pub struct StatusOk {
    pub status: &'static str,
}

impl StatusOk {
    pub fn ok() -> Self {
        Self { status: "ok" }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub status: &'static str,
    pub room_id: Id,
}

#[derive(Debug, Serialize)]
pub struct NextRoundResponse {
    pub status: &'static str,
    pub round_number: i32,
}

#[derive(Debug, Serialize)]
pub struct CurrentRoundResponse {
    pub round_number: i32,
    pub phase: Phase,
    pub status: RoundStatus,
}

#[derive(Debug, Serialize)]
pub struct PairResponse {
    pub opponent_id: Id,
    pub opponent_display_name: String,
}

#[derive(Debug, Deserialize)]
pub struct ActionRequest {
    pub player_id: Id,
    pub choice: Choice,
}

#[derive(Debug, Serialize)]
pub struct RoundResultResponse {
    pub opponent_display_name: String,
    pub your_choice: Choice,
    pub opponent_choice: Choice,
    pub your_payoff: i32,
    pub opponent_payoff: i32,
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub sender_id: Id,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub content: String,
    pub from_opponent: bool,
}

#[derive(Debug, Serialize)]
pub struct IndicatorResponse {
    pub symbol: String,
}

#[derive(Debug, Serialize)]
pub struct PlayerView {
    pub id: Id,
    pub nickname: String,
    pub is_host: bool,
}

#[derive(Debug, Serialize)]
pub struct RoundView {
    pub round_number: i32,
    pub phase: Phase,
    pub status: RoundStatus,
    pub skipped: bool,
    pub your_choice: Option<Choice>,
    pub opponent_choice: Option<Choice>,
    pub opponent_display_name: Option<String>,
    pub your_payoff: Option<i32>,
    pub opponent_payoff: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct SnapshotData {
    pub room: Room,
    pub players: Vec<PlayerView>,
    pub round: Option<RoundView>,
    pub message: Option<MessageResponse>,
    pub indicator_symbol: Option<String>,
    pub indicators_assigned: bool,
}

#[derive(Debug, Serialize)]
pub struct SnapshotResponse {
    pub version: i64,
    pub has_update: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<SnapshotData>,
}

#[derive(Debug, Serialize)]
pub struct PlayerSummary {
    pub player_id: Id,
    pub nickname: String,
    pub total_payoff: i32,
    pub choices: Vec<Option<Choice>>,
    pub indicator_symbol: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub room_id: Id,
    pub rounds_completed: i32,
    pub mutual_turn: i32,
    pub mutual_accelerate: i32,
    pub split: i32,
    pub players: Vec<PlayerSummary>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct PlayerIdQuery {
    pub player_id: Id,
}

#[derive(Debug, Deserialize)]
pub struct StateQuery {
    #[serde(default)]
    pub version: i64,
    pub player_id: Option<Id>,
}
