use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::modules::conversation::schema::{ConversationEntity, ParticipantRole};

#[derive(Debug, Deserialize, Validate)]
pub struct StartConversationModel {
    pub listing_id: Uuid,
    #[validate(length(min = 1, max = 4000, message = "Message must be between 1 and 4000 characters"))]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleFilter {
    #[default]
    All,
    Buying,
    Selling,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ConversationQuery {
    #[serde(default)]
    pub role: RoleFilter,
    #[serde(default)]
    pub archived: bool,
}

#[derive(Debug, Clone)]
pub struct NewConversation {
    pub listing_id: Uuid,
    pub buyer_id: Uuid,
    pub seller_id: Uuid,
}

/// A conversation as seen by one of its participants.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationResponse {
    #[serde(flatten)]
    pub conversation: ConversationEntity,
    pub role: ParticipantRole,
    pub counterpart_id: Uuid,
    pub unread_count: i32,
    pub archived: bool,
}

impl ConversationResponse {
    pub fn for_role(conversation: ConversationEntity, role: ParticipantRole) -> Self {
        Self {
            role,
            counterpart_id: conversation.counterpart(role),
            unread_count: conversation.unread_for(role),
            archived: conversation.archived_for(role),
            conversation,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UnreadCountResponse {
    pub unread_count: i64,
}
