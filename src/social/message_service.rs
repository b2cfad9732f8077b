use crate::domain::Id;
use crate::domain::Message;
use crate::error::AppError;
use crate::error::AppResult;
use crate::store::Store;
use std::sync::Arc;

const MIN_CONTENT_LEN: usize = 1;
const MAX_CONTENT_LEN: usize = 100;

/// Round-5/6 message send/fetch. `already_sent` and the round-number gate
/// are enforced by [`Store::send_message`] since they need a consistent
/// view of the database; this layer only rejects a content length the
/// database would never need to look anything up to reject.
pub struct MessageService {
    store: Arc<dyn Store>,
}

impl MessageService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn send_message(
        &self,
        room_id: Id,
        round_number: i32,
        sender_id: Id,
        content: &str,
    ) -> AppResult<()> {
        let content = content.trim();
        if content.chars().count() < MIN_CONTENT_LEN || content.chars().count() > MAX_CONTENT_LEN {
            return Err(AppError::invalid_input(format!(
                "message must be {MIN_CONTENT_LEN}-{MAX_CONTENT_LEN} characters"
            )));
        }
        self.store.send_message(room_id, round_number, sender_id, content).await
    }

    pub async fn get_message_for(
        &self,
        room_id: Id,
        round_number: i32,
        player_id: Id,
    ) -> AppResult<Option<Message>> {
        self.store.get_message_for(room_id, round_number, player_id).await
    }
}
