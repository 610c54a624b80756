use uuid::Uuid;

use crate::{
    api::error,
    modules::listing::{
        model::{InsertListing, ListingQuery, UpdateListing},
        schema::ListingEntity,
    },
};

#[async_trait::async_trait]
pub trait ListingRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<ListingEntity>, error::SystemError>;

    async fn search(&self, query: &ListingQuery) -> Result<Vec<ListingEntity>, error::SystemError>;

    async fn find_by_seller(
        &self,
        seller_id: &Uuid,
    ) -> Result<Vec<ListingEntity>, error::SystemError>;

    async fn create(&self, listing: &InsertListing) -> Result<ListingEntity, error::SystemError>;

    async fn update(
        &self,
        id: &Uuid,
        listing: &UpdateListing,
    ) -> Result<Option<ListingEntity>, error::SystemError>;

    /// True once any buyer has opened a conversation about the listing.
    async fn has_conversations(&self, id: &Uuid) -> Result<bool, error::SystemError>;

    async fn delete(&self, id: &Uuid) -> Result<bool, error::SystemError>;

    async fn append_image(
        &self,
        id: &Uuid,
        url: &str,
    ) -> Result<Option<ListingEntity>, error::SystemError>;

    async fn remove_image(
        &self,
        id: &Uuid,
        url: &str,
    ) -> Result<Option<ListingEntity>, error::SystemError>;
}
