use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    constants::{DEFAULT_MESSAGE_PAGE_SIZE, MESSAGE_PREVIEW_CHARS},
    modules::{
        conversation::schema::{ConversationEntity, ParticipantRole},
        message::schema::{MessageEntity, MessageKind},
    },
    utils::preview,
};

#[derive(Debug, Clone)]
pub struct InsertMessage {
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub kind: MessageKind,
    pub content: String,
    pub reference_id: Option<Uuid>,
}

/// A message that is written in the same transaction as another row. The
/// repository doing the write fills in the conversation and reference ids.
#[derive(Debug, Clone)]
pub struct MessageDraft {
    pub sender_role: ParticipantRole,
    pub kind: MessageKind,
    pub content: String,
    pub preview: String,
}

impl MessageDraft {
    pub fn new(sender_role: ParticipantRole, kind: MessageKind, content: String) -> Self {
        let preview = preview(&content, MESSAGE_PREVIEW_CHARS);
        MessageDraft { sender_role, kind, content, preview }
    }

    pub fn to_insert(
        &self,
        conversation_id: Uuid,
        buyer_id: Uuid,
        seller_id: Uuid,
        reference_id: Option<Uuid>,
    ) -> InsertMessage {
        let sender_id = match self.sender_role {
            ParticipantRole::Buyer => buyer_id,
            ParticipantRole::Seller => seller_id,
        };
        InsertMessage {
            conversation_id,
            sender_id,
            kind: self.kind,
            content: self.content.clone(),
            reference_id,
        }
    }
}

/// A row together with the message that announced it and the conversation
/// as it stands after that message.
#[derive(Debug, Clone)]
pub struct Posted<T> {
    pub row: T,
    pub message: MessageEntity,
    pub conversation: ConversationEntity,
}

/// Position of the oldest message a client has seen. Messages sharing a
/// timestamp are ordered by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageCursor {
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub id: Option<Uuid>,
}

impl MessageCursor {
    pub fn of(message: &MessageEntity) -> Self {
        MessageCursor { created_at: message.created_at, id: Some(message.id) }
    }

    /// Accepts `<rfc3339>,<id>` or a bare RFC3339 timestamp.
    pub fn parse(raw: &str) -> Option<Self> {
        let (timestamp, id) = match raw.split_once(',') {
            Some((timestamp, id)) => (timestamp, Some(Uuid::parse_str(id.trim()).ok()?)),
            None => (raw, None),
        };
        let created_at = chrono::DateTime::parse_from_rfc3339(timestamp.trim())
            .ok()?
            .with_timezone(&chrono::Utc);
        Some(MessageCursor { created_at, id })
    }

    pub fn encode(&self) -> String {
        let timestamp = self.created_at.to_rfc3339_opts(chrono::SecondsFormat::Micros, true);
        match self.id {
            Some(id) => format!("{timestamp},{id}"),
            None => timestamp,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MessageQuery {
    pub conversation_id: Uuid,
    pub before: Option<MessageCursor>,
}

fn default_limit() -> i64 {
    DEFAULT_MESSAGE_PAGE_SIZE
}

#[derive(Debug, Deserialize, Validate)]
pub struct MessagePageQuery {
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100))]
    pub limit: i64,
    pub cursor: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SendMessageModel {
    #[validate(length(min = 1, max = 4000, message = "Message must be between 1 and 4000 characters"))]
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GetMessageResponse {
    pub messages: Vec<MessageEntity>,
    pub cursor: Option<String>,
}
