use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::{ModelError, ModelResult};
use crate::messages::repo_types::{Message, MAX_MESSAGE_LEN};
use crate::storage::Store;
use crate::users::repo_types::User;

impl Message {
    #[instrument(skip(store, text))]
    pub async fn create(store: &dyn Store, user_id: Uuid, text: &str) -> ModelResult<Message> {
        let text = text.trim();
        if text.is_empty() || text.chars().count() > MAX_MESSAGE_LEN {
            return Err(ModelError::InvalidMessage);
        }
        let msg = store.insert_message(user_id, text).await?;
        info!(message_id = %msg.id, "message created");
        Ok(msg)
    }
}

impl User {
    /// This user's messages, newest first.
    pub async fn messages(&self, store: &dyn Store) -> ModelResult<Vec<Message>> {
        store.messages_of(self.id).await
    }
}
