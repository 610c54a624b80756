use uuid::Uuid;

use crate::{
    api::error,
    modules::saved_property::{
        repository::SavedPropertyRepository,
        schema::{SavedListingRow, SavedPropertyEntity},
    },
};

#[derive(Clone)]
pub struct SavedPropertyRepositoryPg {
    pool: sqlx::PgPool,
}

impl SavedPropertyRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl SavedPropertyRepository for SavedPropertyRepositoryPg {
    async fn create(
        &self,
        user_id: &Uuid,
        listing_id: &Uuid,
    ) -> Result<SavedPropertyEntity, error::SystemError> {
        let saved = sqlx::query_as::<_, SavedPropertyEntity>(
            "INSERT INTO saved_properties (user_id, listing_id) VALUES ($1, $2) RETURNING *",
        )
        .bind(user_id)
        .bind(listing_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(saved)
    }

    async fn delete(&self, user_id: &Uuid, listing_id: &Uuid) -> Result<bool, error::SystemError> {
        let rows =
            sqlx::query("DELETE FROM saved_properties WHERE user_id = $1 AND listing_id = $2")
                .bind(user_id)
                .bind(listing_id)
                .execute(&self.pool)
                .await?
                .rows_affected();
        Ok(rows > 0)
    }

    async fn exists(&self, user_id: &Uuid, listing_id: &Uuid) -> Result<bool, error::SystemError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM saved_properties WHERE user_id = $1 AND listing_id = $2)",
        )
        .bind(user_id)
        .bind(listing_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn find_listings_by_user(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<SavedListingRow>, error::SystemError> {
        let rows = sqlx::query_as::<_, SavedListingRow>(
            r#"
            SELECT l.*, s.created_at AS saved_at
            FROM saved_properties s
            JOIN listings l ON l.id = s.listing_id
            WHERE s.user_id = $1
            ORDER BY s.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
