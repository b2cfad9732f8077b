use super::Id;
use serde::Deserialize;
use serde::Serialize;
use std::time::SystemTime;

/// A player's move for a round. The Chicken game's only two pure strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Choice {
    #[serde(rename = "TURN")]
    Turn,
    #[serde(rename = "ACCELERATE")]
    Accelerate,
}

impl Choice {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Turn => "TURN",
            Self::Accelerate => "ACCELERATE",
        }
    }
}

impl std::str::FromStr for Choice {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TURN" => Ok(Self::Turn),
            "ACCELERATE" => Ok(Self::Accelerate),
            other => Err(anyhow::anyhow!("unknown choice {other}")),
        }
    }
}

/// A submitted move, owned by exactly one (round, player) pair. `payoff` is
/// filled in once, at finalization, and never overwritten afterward.
#[derive(Debug, Clone, Serialize)]
pub struct Action {
    pub id: Id,
    pub round_id: Id,
    pub player_id: Id,
    pub choice: Choice,
    pub payoff: Option<i32>,
    pub created_at: SystemTime,
}
