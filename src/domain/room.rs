use super::Id;
use serde::Deserialize;
use serde::Serialize;
use std::time::SystemTime;

/// Lifecycle state of a Room. No back-transitions: WAITING -> PLAYING -> FINISHED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomStatus {
    #[serde(rename = "WAITING")]
    Waiting,
    #[serde(rename = "PLAYING")]
    Playing,
    #[serde(rename = "FINISHED")]
    Finished,
}

impl RoomStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Waiting => "WAITING",
            Self::Playing => "PLAYING",
            Self::Finished => "FINISHED",
        }
    }
}

impl std::str::FromStr for RoomStatus {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WAITING" => Ok(Self::Waiting),
            "PLAYING" => Ok(Self::Playing),
            "FINISHED" => Ok(Self::Finished),
            other => Err(anyhow::anyhow!("unknown room status {other}")),
        }
    }
}

/// A classroom session. The root of the containment tree; deleting a Room
/// cascades to every Player, Round, Pair, Action, Message and Indicator below it.
#[derive(Debug, Clone, Serialize)]
pub struct Room {
    pub id: Id,
    pub code: String,
    pub status: RoomStatus,
    pub current_round: i32,
    pub state_version: i64,
    pub created_at: SystemTime,
    pub updated_at: SystemTime,
}
