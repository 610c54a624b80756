use uuid::Uuid;

use crate::{
    api::error,
    modules::saved_property::schema::{SavedListingRow, SavedPropertyEntity},
};

#[async_trait::async_trait]
pub trait SavedPropertyRepository {
    async fn create(
        &self,
        user_id: &Uuid,
        listing_id: &Uuid,
    ) -> Result<SavedPropertyEntity, error::SystemError>;

    async fn delete(&self, user_id: &Uuid, listing_id: &Uuid) -> Result<bool, error::SystemError>;

    async fn exists(&self, user_id: &Uuid, listing_id: &Uuid) -> Result<bool, error::SystemError>;

    /// Most recently saved first.
    async fn find_listings_by_user(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<SavedListingRow>, error::SystemError>;
}
