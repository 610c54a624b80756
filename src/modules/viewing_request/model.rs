use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::modules::viewing_request::schema::ViewingStatus;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateViewingRequestModel {
    pub conversation_id: Uuid,
    pub proposed_at: chrono::DateTime<chrono::Utc>,
    #[validate(length(max = 1000, message = "Note is too long"))]
    pub note: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateViewingStatusModel {
    pub status: ViewingStatus,
    #[validate(length(max = 1000, message = "Response note is too long"))]
    pub response_note: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ViewingRequestQuery {
    pub status: Option<ViewingStatus>,
}

#[derive(Debug, Clone)]
pub struct InsertViewingRequest {
    pub conversation_id: Uuid,
    pub listing_id: Uuid,
    pub buyer_id: Uuid,
    pub seller_id: Uuid,
    pub proposed_at: chrono::DateTime<chrono::Utc>,
    pub note: Option<String>,
}
