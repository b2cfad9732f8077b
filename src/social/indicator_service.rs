use crate::domain::Id;
use crate::domain::Indicator;
use crate::error::AppResult;
use crate::store::Store;
use std::sync::Arc;

/// One-shot post-Round-6 emoji assignment. The `current_round >= 6` gate and
/// the `already_assigned` uniqueness check both need a consistent read of
/// the room, so both live in [`Store::assign_indicators`]; this layer is a
/// pure pass-through.
pub struct IndicatorService {
    store: Arc<dyn Store>,
}

impl IndicatorService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn assign_indicators(&self, room_id: Id) -> AppResult<()> {
        self.store.assign_indicators(room_id).await
    }

    pub async fn get_indicator(&self, room_id: Id, player_id: Id) -> AppResult<Indicator> {
        self.store.get_indicator(room_id, player_id).await
    }

    pub async fn indicators_assigned(&self, room_id: Id) -> AppResult<bool> {
        self.store.indicators_assigned(room_id).await
    }
}
