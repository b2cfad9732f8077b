use super::Id;
use serde::Serialize;
use std::time::SystemTime;

/// A one-shot note a player sends to their round-5/6 opponent. Immutable once
/// created; at most one per (round, sender).
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub id: Id,
    pub round_id: Id,
    pub sender_id: Id,
    pub receiver_id: Id,
    pub content: String,
    pub created_at: SystemTime,
}
