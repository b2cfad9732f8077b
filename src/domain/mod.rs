mod action;
mod indicator;
mod message;
mod pair;
mod player;
mod room;
mod round;

pub use action::Action;
pub use action::Choice;
pub use indicator::INDICATOR_WHITELIST;
pub use indicator::Indicator;
pub use message::Message;
pub use pair::Pair;
pub use player::Player;
pub use room::Room;
pub use room::RoomStatus;
pub use round::Phase;
pub use round::Round;
pub use round::RoundStatus;

/// Surrogate key type shared by every entity; Postgres `BIGSERIAL` on the wire,
/// matching the source's preference for integer keys (`abstraction.abs`,
/// `blueprint.past`, ...) over UUIDs.
pub type Id = i64;
