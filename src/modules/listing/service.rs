use std::sync::Arc;
use uuid::Uuid;

use crate::{
    api::error,
    modules::listing::{
        model::{
            CreateListingModel, ImageUploadResponse, InsertListing, ListingQuery,
            UpdateListingModel,
        },
        repository::ListingRepository,
        schema::ListingEntity,
        storage::StorageBucket,
    },
};

#[derive(Clone)]
pub struct ListingService {
    repo: Arc<dyn ListingRepository + Send + Sync>,
    storage: Arc<StorageBucket>,
}

impl ListingService {
    pub fn with_dependencies(
        repo: Arc<dyn ListingRepository + Send + Sync>,
        storage: Arc<StorageBucket>,
    ) -> Self {
        ListingService { repo, storage }
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.storage.config().max_file_size
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<ListingEntity, error::SystemError> {
        self.repo.find_by_id(&id).await?.ok_or_else(|| error::SystemError::not_found("Listing not found"))
    }

    async fn get_owned(&self, user_id: Uuid, id: Uuid) -> Result<ListingEntity, error::SystemError> {
        let listing = self.get_by_id(id).await?;
        if !listing.is_owned_by(&user_id) {
            return Err(error::SystemError::forbidden("You do not own this listing"));
        }
        Ok(listing)
    }

    pub async fn search(&self, query: ListingQuery) -> Result<Vec<ListingEntity>, error::SystemError> {
        if let (Some(min), Some(max)) = (query.min_price, query.max_price) {
            if min > max {
                return Err(error::SystemError::bad_request(
                    "min_price cannot be greater than max_price",
                ));
            }
        }
        self.repo.search(&query).await
    }

    pub async fn list_by_seller(
        &self,
        seller_id: Uuid,
    ) -> Result<Vec<ListingEntity>, error::SystemError> {
        self.repo.find_by_seller(&seller_id).await
    }

    pub async fn create(
        &self,
        seller_id: Uuid,
        model: CreateListingModel,
    ) -> Result<ListingEntity, error::SystemError> {
        let listing = self.repo.create(&InsertListing::from_model(seller_id, model)).await?;
        log::info!("Listing {} created by {}", listing.id, seller_id);
        Ok(listing)
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        model: UpdateListingModel,
    ) -> Result<ListingEntity, error::SystemError> {
        if model.is_empty() {
            return Err(error::SystemError::bad_request("No fields to update"));
        }

        let current = self.get_owned(user_id, id).await?;

        if let Some(next) = model.status {
            if !current.status.can_change_to(next) {
                return Err(error::SystemError::bad_request(
                    "A sold listing cannot change status",
                ));
            }
        }

        self.repo
            .update(&id, &model.into())
            .await?
            .ok_or_else(|| error::SystemError::not_found("Listing not found"))
    }

    /// Removes a listing nobody has contacted the seller about. Conversations
    /// are kept forever, so a listing that has any stays in place.
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), error::SystemError> {
        let listing = self.get_owned(user_id, id).await?;

        if self.repo.has_conversations(&id).await? {
            return Err(error::SystemError::conflict(
                "This listing has conversations and cannot be deleted",
            ));
        }

        if !self.repo.delete(&id).await? {
            return Err(error::SystemError::not_found("Listing not found"));
        }

        for url in &listing.images {
            if let Err(e) = self.storage.remove(url).await {
                log::warn!("Failed to remove image {} of deleted listing {}: {:?}", url, id, e);
            }
        }

        log::info!("Listing {} deleted by {}", id, user_id);
        Ok(())
    }

    pub async fn add_image(
        &self,
        user_id: Uuid,
        id: Uuid,
        filename: &str,
        bytes: &[u8],
        mime_type: &str,
    ) -> Result<ImageUploadResponse, error::SystemError> {
        self.get_owned(user_id, id).await?;

        let url = self.storage.put(filename, bytes, mime_type).await?;

        let listing = match self.repo.append_image(&id, &url).await {
            Ok(Some(listing)) => listing,
            Ok(None) => {
                self.storage.remove(&url).await?;
                return Err(error::SystemError::not_found("Listing not found"));
            }
            Err(e) => {
                self.storage.remove(&url).await?;
                return Err(e);
            }
        };

        Ok(ImageUploadResponse { url, images: listing.images })
    }

    pub async fn remove_image(
        &self,
        user_id: Uuid,
        id: Uuid,
        url: &str,
    ) -> Result<ListingEntity, error::SystemError> {
        let listing = self.get_owned(user_id, id).await?;

        if !listing.images.iter().any(|i| i == url) {
            return Err(error::SystemError::not_found("Image not found on this listing"));
        }

        let listing = self
            .repo
            .remove_image(&id, url)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Listing not found"))?;

        self.storage.remove(url).await?;
        Ok(listing)
    }

    pub async fn read_object(&self, name: &str) -> Result<(Vec<u8>, String), error::SystemError> {
        self.storage.read(name).await
    }
}
