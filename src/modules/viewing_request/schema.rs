use serde::{Deserialize, Serialize};
use sqlx::prelude::{FromRow, Type};
use uuid::Uuid;

use crate::modules::conversation::schema::ParticipantRole;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Type, Serialize, Deserialize)]
#[sqlx(type_name = "viewing_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ViewingStatus {
    Pending,
    Confirmed,
    Rejected,
    Cancelled,
    Completed,
    Superseded,
}

impl ViewingStatus {
    /// Statuses the participant in `role` may move a request to from `self`.
    /// `Superseded` is only ever set when a newer request replaces a pending one.
    pub fn allowed_next(self, role: ParticipantRole) -> &'static [ViewingStatus] {
        use ParticipantRole::*;
        use ViewingStatus::*;

        match (self, role) {
            (Pending, Buyer) => &[Cancelled],
            (Pending, Seller) => &[Confirmed, Rejected],
            (Confirmed, Buyer) => &[Cancelled],
            (Confirmed, Seller) => &[Cancelled, Completed],
            _ => &[],
        }
    }

    pub fn can_transition(self, next: ViewingStatus, role: ParticipantRole) -> bool {
        self.allowed_next(role).contains(&next)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ViewingStatus::Pending => "pending",
            ViewingStatus::Confirmed => "confirmed",
            ViewingStatus::Rejected => "rejected",
            ViewingStatus::Cancelled => "cancelled",
            ViewingStatus::Completed => "completed",
            ViewingStatus::Superseded => "superseded",
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ViewingRequestEntity {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub listing_id: Uuid,
    pub buyer_id: Uuid,
    pub seller_id: Uuid,
    pub proposed_at: chrono::DateTime<chrono::Utc>,
    pub note: Option<String>,
    pub response_note: Option<String>,
    pub status: ViewingStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl ViewingRequestEntity {
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
