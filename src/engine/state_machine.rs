use crate::domain::RoomStatus;
use crate::domain::RoundStatus;
use crate::error::AppError;
use crate::error::AppResult;

/// Validates Room transitions. WAITING -> PLAYING -> FINISHED, no back-transitions.
pub fn validate_room_transition(from: RoomStatus, to: RoomStatus) -> AppResult<()> {
    match (from, to) {
        (RoomStatus::Waiting, RoomStatus::Playing) => Ok(()),
        (RoomStatus::Playing, RoomStatus::Finished) => Ok(()),
        _ => Err(AppError::invalid_state(format!(
            "invalid_state_transition: room cannot move from {:?} to {:?}",
            from, to
        ))),
    }
}

/// Validates Round transitions: waiting_actions -> ready_to_publish -> completed,
/// plus the emergency waiting_actions -> completed skip. No back-transitions.
pub fn validate_round_transition(from: RoundStatus, to: RoundStatus) -> AppResult<()> {
    match (from, to) {
        (RoundStatus::WaitingActions, RoundStatus::ReadyToPublish) => Ok(()),
        (RoundStatus::WaitingActions, RoundStatus::Completed) => Ok(()),
        (RoundStatus::ReadyToPublish, RoundStatus::Completed) => Ok(()),
        _ => Err(AppError::invalid_state(format!(
            "invalid_state_transition: round cannot move from {:?} to {:?}",
            from, to
        ))),
    }
}
