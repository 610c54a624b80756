use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

/// Which side of a conversation a user is on.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantRole {
    Buyer,
    Seller,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ConversationEntity {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub buyer_id: Uuid,
    pub seller_id: Uuid,
    pub buyer_unread_count: i32,
    pub seller_unread_count: i32,
    pub buyer_archived: bool,
    pub seller_archived: bool,
    pub last_message_preview: Option<String>,
    pub last_message_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl ConversationEntity {
    pub fn role_of(&self, user_id: &Uuid) -> Option<ParticipantRole> {
        if &self.buyer_id == user_id {
            Some(ParticipantRole::Buyer)
        } else if &self.seller_id == user_id {
            Some(ParticipantRole::Seller)
        } else {
            None
        }
    }

    pub fn counterpart(&self, role: ParticipantRole) -> Uuid {
        match role {
            ParticipantRole::Buyer => self.seller_id,
            ParticipantRole::Seller => self.buyer_id,
        }
    }

    pub fn unread_for(&self, role: ParticipantRole) -> i32 {
        match role {
            ParticipantRole::Buyer => self.buyer_unread_count,
            ParticipantRole::Seller => self.seller_unread_count,
        }
    }

    pub fn archived_for(&self, role: ParticipantRole) -> bool {
        match role {
            ParticipantRole::Buyer => self.buyer_archived,
            ParticipantRole::Seller => self.seller_archived,
        }
    }

    pub fn participants(&self) -> [Uuid; 2] {
        [self.buyer_id, self.seller_id]
    }
}
