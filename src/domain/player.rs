use super::Id;
use serde::Serialize;
use std::time::SystemTime;

/// A participant in a Room. The host is stored as a Player to unify membership
/// queries but must be filtered out of every pairing and payoff computation.
#[derive(Debug, Clone, Serialize)]
pub struct Player {
    pub id: Id,
    pub room_id: Id,
    pub nickname: String,
    pub is_host: bool,
    pub joined_at: SystemTime,
}

impl Player {
    /// `display_name` is contractually equal to `nickname`; no auto-generated
    /// names. See the resolved open question in the design notes.
    pub fn display_name(&self) -> &str {
        &self.nickname
    }
}
