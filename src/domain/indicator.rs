use super::Id;

/// Closed whitelist of symbols an Indicator may carry. Drawn from evenly
/// after Round 6, one per non-host player, to reveal in-game identity groups.
pub const INDICATOR_WHITELIST: &[&str] = &["🦊", "🐢", "🦉", "🐺", "🐬", "🦁", "🐝", "🐙"];

/// An emoji symbol assigned once per non-host player. Immutable; created in
/// one atomic batch by AssignIndicators.
#[derive(Debug, Clone)]
pub struct Indicator {
    pub id: Id,
    pub room_id: Id,
    pub player_id: Id,
    pub symbol: String,
}
