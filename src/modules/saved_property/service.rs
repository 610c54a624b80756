use std::sync::Arc;
use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        listing::repository::ListingRepository,
        saved_property::{
            repository::SavedPropertyRepository,
            schema::{SavedListingRow, SavedPropertyEntity},
        },
    },
};

#[derive(Clone)]
pub struct SavedPropertyService {
    saved_repo: Arc<dyn SavedPropertyRepository + Send + Sync>,
    listing_repo: Arc<dyn ListingRepository + Send + Sync>,
}

impl SavedPropertyService {
    pub fn with_dependencies(
        saved_repo: Arc<dyn SavedPropertyRepository + Send + Sync>,
        listing_repo: Arc<dyn ListingRepository + Send + Sync>,
    ) -> Self {
        SavedPropertyService { saved_repo, listing_repo }
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<SavedListingRow>, error::SystemError> {
        self.saved_repo.find_listings_by_user(&user_id).await
    }

    pub async fn save(
        &self,
        user_id: Uuid,
        listing_id: Uuid,
    ) -> Result<SavedPropertyEntity, error::SystemError> {
        if self.listing_repo.find_by_id(&listing_id).await?.is_none() {
            return Err(error::SystemError::not_found("Listing not found"));
        }

        // The primary key still rejects a save that races this check.
        if self.saved_repo.exists(&user_id, &listing_id).await? {
            return Err(error::SystemError::conflict("Property already saved"));
        }

        self.saved_repo.create(&user_id, &listing_id).await
    }

    pub async fn unsave(&self, user_id: Uuid, listing_id: Uuid) -> Result<(), error::SystemError> {
        if !self.saved_repo.delete(&user_id, &listing_id).await? {
            return Err(error::SystemError::not_found("Saved property not found"));
        }
        Ok(())
    }

    pub async fn is_saved(&self, user_id: Uuid, listing_id: Uuid) -> Result<bool, error::SystemError> {
        self.saved_repo.exists(&user_id, &listing_id).await
    }
}
