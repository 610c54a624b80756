use serde::{Deserialize, Serialize};
use sqlx::prelude::{FromRow, Type};
use uuid::Uuid;

use crate::modules::conversation::schema::ParticipantRole;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Type, Serialize, Deserialize)]
#[sqlx(type_name = "offer_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OfferStatus {
    Pending,
    Accepted,
    Rejected,
    Countered,
    Withdrawn,
}

impl OfferStatus {
    /// Statuses the participant in `role` may move an offer to from `self`.
    /// A pending offer waits on the seller, a countered one on the buyer.
    pub fn allowed_next(self, role: ParticipantRole) -> &'static [OfferStatus] {
        use OfferStatus::*;
        use ParticipantRole::*;

        match (self, role) {
            (Pending, Seller) => &[Accepted, Rejected, Countered],
            (Pending, Buyer) => &[Withdrawn],
            (Countered, Buyer) => &[Accepted, Rejected, Withdrawn],
            (Countered, Seller) => &[Withdrawn],
            _ => &[],
        }
    }

    pub fn can_transition(self, next: OfferStatus, role: ParticipantRole) -> bool {
        self.allowed_next(role).contains(&next)
    }

    pub fn is_open(self) -> bool {
        matches!(self, OfferStatus::Pending | OfferStatus::Countered)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OfferStatus::Pending => "pending",
            OfferStatus::Accepted => "accepted",
            OfferStatus::Rejected => "rejected",
            OfferStatus::Countered => "countered",
            OfferStatus::Withdrawn => "withdrawn",
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OfferEntity {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub listing_id: Uuid,
    pub buyer_id: Uuid,
    pub seller_id: Uuid,
    pub amount: i64,
    pub counter_amount: Option<i64>,
    pub message: Option<String>,
    pub status: OfferStatus,
    pub responded_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl OfferEntity {
    pub fn role_of(&self, user_id: &Uuid) -> Option<ParticipantRole> {
        if &self.buyer_id == user_id {
            Some(ParticipantRole::Buyer)
        } else if &self.seller_id == user_id {
            Some(ParticipantRole::Seller)
        } else {
            None
        }
    }
}
