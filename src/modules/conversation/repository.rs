use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        conversation::{
            model::{ConversationQuery, NewConversation},
            schema::{ConversationEntity, ParticipantRole},
        },
        message::{model::MessageDraft, schema::MessageEntity},
    },
};

#[async_trait::async_trait]
pub trait ConversationRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<ConversationEntity>, error::SystemError>;

    async fn find_by_listing_and_buyer(
        &self,
        listing_id: &Uuid,
        buyer_id: &Uuid,
    ) -> Result<Option<ConversationEntity>, error::SystemError>;

    /// Creates the conversation and posts its first message in one
    /// transaction. A second conversation for the same listing and buyer is
    /// rejected as a conflict.
    async fn open(
        &self,
        conversation: &NewConversation,
        first_message: &MessageDraft,
    ) -> Result<(MessageEntity, ConversationEntity), error::SystemError>;

    /// Most recently active first.
    async fn find_by_user(
        &self,
        user_id: &Uuid,
        query: &ConversationQuery,
    ) -> Result<Vec<ConversationEntity>, error::SystemError>;

    async fn set_archived(
        &self,
        id: &Uuid,
        role: ParticipantRole,
        archived: bool,
    ) -> Result<Option<ConversationEntity>, error::SystemError>;

    async fn total_unread(&self, user_id: &Uuid) -> Result<i64, error::SystemError>;
}
