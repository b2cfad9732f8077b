pub mod pairing;
pub mod payoff;
pub mod state_machine;

mod room_manager;
mod round_manager;

pub use room_manager::RoomManager;
pub use round_manager::RoundManager;
