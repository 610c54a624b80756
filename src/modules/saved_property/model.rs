use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct SavePropertyModel {
    pub listing_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct SavedStatusResponse {
    pub listing_id: Uuid,
    pub saved: bool,
}
