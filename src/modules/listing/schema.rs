use serde::{Deserialize, Serialize};
use sqlx::prelude::{FromRow, Type};
use uuid::Uuid;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Type, Serialize, Deserialize)]
#[sqlx(type_name = "listing_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    Active,
    UnderOffer,
    Sold,
}

impl ListingStatus {
    /// A sold listing is final; every other status can be set freely by the owner.
    pub fn can_change_to(self, next: ListingStatus) -> bool {
        self != ListingStatus::Sold || next == ListingStatus::Sold
    }

    pub fn accepts_offers(self) -> bool {
        self != ListingStatus::Sold
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Type, Serialize, Deserialize)]
#[sqlx(type_name = "property_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    House,
    Flat,
    Bungalow,
    Land,
    Other,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ListingEntity {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub title: String,
    pub description: String,
    pub price: i64,
    pub address: String,
    pub city: String,
    pub postcode: Option<String>,
    pub property_type: PropertyType,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub square_feet: Option<i32>,
    pub images: Vec<String>,
    pub status: ListingStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl ListingEntity {
    pub fn is_owned_by(&self, user_id: &Uuid) -> bool {
        &self.seller_id == user_id
    }
}
