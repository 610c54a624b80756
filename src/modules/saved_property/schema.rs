use serde::Serialize;
use sqlx::prelude::FromRow;
use uuid::Uuid;

use crate::modules::listing::schema::ListingEntity;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SavedPropertyEntity {
    pub user_id: Uuid,
    pub listing_id: Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SavedListingRow {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub listing: ListingEntity,
    pub saved_at: chrono::DateTime<chrono::Utc>,
}
