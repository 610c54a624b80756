use std::sync::Arc;
use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        conversation::{
            model::{ConversationQuery, ConversationResponse, NewConversation},
            repository::ConversationRepository,
            schema::{ConversationEntity, ParticipantRole},
        },
        listing::repository::ListingRepository,
        message::{
            model::{MessageCursor, MessageDraft, MessageQuery},
            repository::MessageRepository,
            schema::{MessageEntity, MessageKind},
        },
        realtime::{Broadcaster, RealtimeEvent},
    },
};

#[derive(Clone)]
pub struct ConversationService {
    conversation_repo: Arc<dyn ConversationRepository + Send + Sync>,
    message_repo: Arc<dyn MessageRepository + Send + Sync>,
    listing_repo: Arc<dyn ListingRepository + Send + Sync>,
    broadcaster: Arc<dyn Broadcaster>,
}

impl ConversationService {
    pub fn with_dependencies(
        conversation_repo: Arc<dyn ConversationRepository + Send + Sync>,
        message_repo: Arc<dyn MessageRepository + Send + Sync>,
        listing_repo: Arc<dyn ListingRepository + Send + Sync>,
        broadcaster: Arc<dyn Broadcaster>,
    ) -> Self {
        ConversationService { conversation_repo, message_repo, listing_repo, broadcaster }
    }

    /// Loads a conversation and the caller's role in it.
    pub async fn load_for_participant(
        &self,
        user_id: Uuid,
        conversation_id: Uuid,
    ) -> Result<(ConversationEntity, ParticipantRole), error::SystemError> {
        let conversation = self
            .conversation_repo
            .find_by_id(&conversation_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Conversation not found"))?;

        let role = conversation.role_of(&user_id).ok_or_else(|| {
            error::SystemError::forbidden("You are not a participant of this conversation")
        })?;

        Ok((conversation, role))
    }

    pub async fn list(
        &self,
        user_id: Uuid,
        query: ConversationQuery,
    ) -> Result<Vec<ConversationResponse>, error::SystemError> {
        let conversations = self.conversation_repo.find_by_user(&user_id, &query).await?;

        Ok(conversations
            .into_iter()
            .filter_map(|c| c.role_of(&user_id).map(|role| ConversationResponse::for_role(c, role)))
            .collect())
    }

    pub async fn get(
        &self,
        user_id: Uuid,
        conversation_id: Uuid,
    ) -> Result<ConversationResponse, error::SystemError> {
        let (conversation, role) = self.load_for_participant(user_id, conversation_id).await?;
        Ok(ConversationResponse::for_role(conversation, role))
    }

    /// Returns the buyer's conversation about a listing. A conversation is only
    /// created together with its first message, so opening a new one needs
    /// `first_message`. The boolean is true when this call created it.
    pub async fn start(
        &self,
        buyer_id: Uuid,
        listing_id: Uuid,
        first_message: Option<String>,
    ) -> Result<(ConversationResponse, bool), error::SystemError> {
        let listing = self
            .listing_repo
            .find_by_id(&listing_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Listing not found"))?;

        if listing.is_owned_by(&buyer_id) {
            return Err(error::SystemError::bad_request(
                "You cannot start a conversation about your own listing",
            ));
        }

        let content = first_message.map(|m| m.trim().to_string()).filter(|m| !m.is_empty());

        if let Some(existing) =
            self.conversation_repo.find_by_listing_and_buyer(&listing_id, &buyer_id).await?
        {
            let conversation = match content {
                Some(content) => {
                    self.append_message(&existing, ParticipantRole::Buyer, MessageKind::Text, content, None)
                        .await?
                        .1
                }
                None => existing,
            };
            return Ok((ConversationResponse::for_role(conversation, ParticipantRole::Buyer), false));
        }

        let Some(content) = content else {
            return Err(error::SystemError::bad_request(
                "A message is required to start a conversation",
            ));
        };

        let new = NewConversation { listing_id, buyer_id, seller_id: listing.seller_id };
        let draft = MessageDraft::new(ParticipantRole::Buyer, MessageKind::Text, content);

        match self.conversation_repo.open(&new, &draft).await {
            Ok((message, conversation)) => {
                log::info!("Conversation {} opened on listing {}", conversation.id, listing_id);
                self.publish_posted(&message, &conversation);
                Ok((ConversationResponse::for_role(conversation, ParticipantRole::Buyer), true))
            }
            // Another request opened it first; post into that one instead.
            Err(e) if e.is_conflict() => {
                let existing = self
                    .conversation_repo
                    .find_by_listing_and_buyer(&listing_id, &buyer_id)
                    .await?
                    .ok_or_else(|| error::SystemError::not_found("Conversation not found"))?;
                let (_, conversation) = self
                    .append_message(&existing, ParticipantRole::Buyer, MessageKind::Text, draft.content, None)
                    .await?;
                Ok((ConversationResponse::for_role(conversation, ParticipantRole::Buyer), false))
            }
            Err(e) => Err(e),
        }
    }

    /// Tells both participants about a message that has already been committed.
    pub fn publish_posted(&self, message: &MessageEntity, conversation: &ConversationEntity) {
        let recipients = conversation.participants();
        self.broadcaster.publish(
            &recipients,
            RealtimeEvent::MessageCreated { conversation_id: conversation.id, message: message.clone() },
        );
        self.broadcaster.publish(
            &recipients,
            RealtimeEvent::ConversationUpdated { conversation: conversation.clone() },
        );
    }

    async fn append_message(
        &self,
        conversation: &ConversationEntity,
        sender_role: ParticipantRole,
        kind: MessageKind,
        content: String,
        reference_id: Option<Uuid>,
    ) -> Result<(MessageEntity, ConversationEntity), error::SystemError> {
        let draft = MessageDraft::new(sender_role, kind, content);
        let insert = draft.to_insert(
            conversation.id,
            conversation.buyer_id,
            conversation.seller_id,
            reference_id,
        );

        let (message, updated) =
            self.message_repo.append(sender_role, &insert, &draft.preview).await?;
        self.publish_posted(&message, &updated);

        Ok((message, updated))
    }

    pub async fn send_message(
        &self,
        user_id: Uuid,
        conversation_id: Uuid,
        content: String,
    ) -> Result<MessageEntity, error::SystemError> {
        let content = content.trim().to_string();
        if content.is_empty() {
            return Err(error::SystemError::bad_request("Message cannot be empty"));
        }

        let (conversation, role) = self.load_for_participant(user_id, conversation_id).await?;
        let (message, _) =
            self.append_message(&conversation, role, MessageKind::Text, content, None).await?;

        Ok(message)
    }

    /// Returns messages oldest to newest and the cursor for the next older page.
    pub async fn get_messages(
        &self,
        user_id: Uuid,
        conversation_id: Uuid,
        limit: i64,
        cursor: Option<String>,
    ) -> Result<(Vec<MessageEntity>, Option<String>), error::SystemError> {
        self.load_for_participant(user_id, conversation_id).await?;

        let before = match cursor {
            Some(c) => Some(
                MessageCursor::parse(&c)
                    .ok_or_else(|| error::SystemError::bad_request("Invalid cursor format"))?,
            ),
            None => None,
        };

        // One extra row tells whether an older page exists.
        let mut messages = self
            .message_repo
            .find_by_query(&MessageQuery { conversation_id, before }, limit + 1)
            .await?;

        let next_cursor = if messages.len() > limit as usize {
            messages.truncate(limit as usize);
            messages.last().map(MessageCursor::of)
        } else {
            None
        };

        messages.reverse();
        Ok((messages, next_cursor.map(|c| c.encode())))
    }

    pub async fn mark_read(
        &self,
        user_id: Uuid,
        conversation_id: Uuid,
    ) -> Result<ConversationResponse, error::SystemError> {
        let (_, role) = self.load_for_participant(user_id, conversation_id).await?;

        let conversation = self.message_repo.mark_read(&conversation_id, &user_id, role).await?;

        self.broadcaster.publish(
            &conversation.participants(),
            RealtimeEvent::ConversationUpdated { conversation: conversation.clone() },
        );

        Ok(ConversationResponse::for_role(conversation, role))
    }

    pub async fn set_archived(
        &self,
        user_id: Uuid,
        conversation_id: Uuid,
        archived: bool,
    ) -> Result<ConversationResponse, error::SystemError> {
        let (_, role) = self.load_for_participant(user_id, conversation_id).await?;

        let conversation = self
            .conversation_repo
            .set_archived(&conversation_id, role, archived)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Conversation not found"))?;

        Ok(ConversationResponse::for_role(conversation, role))
    }

    pub async fn unread_count(&self, user_id: Uuid) -> Result<i64, error::SystemError> {
        self.conversation_repo.total_unread(&user_id).await
    }
}
