use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        conversation::schema::{ConversationEntity, ParticipantRole},
        message::{
            model::{InsertMessage, MessageQuery},
            schema::MessageEntity,
        },
    },
};

#[async_trait::async_trait]
pub trait MessageRepository {
    /// Inserts the message and, in the same transaction, bumps the counterpart's
    /// unread count, refreshes the conversation preview and clears the
    /// counterpart's archive flag.
    async fn append(
        &self,
        sender_role: ParticipantRole,
        message: &InsertMessage,
        preview: &str,
    ) -> Result<(MessageEntity, ConversationEntity), error::SystemError>;

    /// Newest first, at most `limit` rows.
    async fn find_by_query(
        &self,
        query: &MessageQuery,
        limit: i64,
    ) -> Result<Vec<MessageEntity>, error::SystemError>;

    /// Resets the reader's unread count and marks the counterpart's messages read.
    async fn mark_read(
        &self,
        conversation_id: &Uuid,
        reader_id: &Uuid,
        reader_role: ParticipantRole,
    ) -> Result<ConversationEntity, error::SystemError>;
}
