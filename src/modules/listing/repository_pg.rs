use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    api::error,
    modules::listing::{
        model::{InsertListing, ListingQuery, ListingSort, UpdateListing},
        repository::ListingRepository,
        schema::{ListingEntity, ListingStatus},
    },
};

#[derive(Clone)]
pub struct ListingRepositoryPg {
    pool: sqlx::PgPool,
}

impl ListingRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

fn search_query(query: &ListingQuery) -> QueryBuilder<'_, Postgres> {
    let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM listings WHERE status = ");
    qb.push_bind(query.status.unwrap_or(ListingStatus::Active));

    if let Some(city) = query.city.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        qb.push(" AND lower(city) = lower(").push_bind(city).push(")");
    }
    if let Some(property_type) = query.property_type {
        qb.push(" AND property_type = ").push_bind(property_type);
    }
    if let Some(min_price) = query.min_price {
        qb.push(" AND price >= ").push_bind(min_price);
    }
    if let Some(max_price) = query.max_price {
        qb.push(" AND price <= ").push_bind(max_price);
    }
    if let Some(min_bedrooms) = query.min_bedrooms {
        qb.push(" AND bedrooms >= ").push_bind(min_bedrooms);
    }
    if let Some(seller_id) = query.seller_id {
        qb.push(" AND seller_id = ").push_bind(seller_id);
    }

    qb.push(match query.sort {
        ListingSort::Newest => " ORDER BY created_at DESC, id DESC",
        ListingSort::PriceAsc => " ORDER BY price ASC, created_at DESC",
        ListingSort::PriceDesc => " ORDER BY price DESC, created_at DESC",
    });
    qb.push(" LIMIT ").push_bind(query.limit);
    qb.push(" OFFSET ").push_bind(query.offset);
    qb
}

#[async_trait::async_trait]
impl ListingRepository for ListingRepositoryPg {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<ListingEntity>, error::SystemError> {
        let listing = sqlx::query_as::<_, ListingEntity>("SELECT * FROM listings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(listing)
    }

    async fn search(&self, query: &ListingQuery) -> Result<Vec<ListingEntity>, error::SystemError> {
        let mut qb = search_query(query);
        let listings = qb.build_query_as::<ListingEntity>().fetch_all(&self.pool).await?;
        Ok(listings)
    }

    async fn find_by_seller(
        &self,
        seller_id: &Uuid,
    ) -> Result<Vec<ListingEntity>, error::SystemError> {
        let listings = sqlx::query_as::<_, ListingEntity>(
            "SELECT * FROM listings WHERE seller_id = $1 ORDER BY created_at DESC",
        )
        .bind(seller_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(listings)
    }

    async fn create(&self, listing: &InsertListing) -> Result<ListingEntity, error::SystemError> {
        let id = Uuid::now_v7();
        let listing = sqlx::query_as::<_, ListingEntity>(
            r#"
            INSERT INTO listings (
                id, seller_id, title, description, price, address, city, postcode,
                property_type, bedrooms, bathrooms, square_feet
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(listing.seller_id)
        .bind(&listing.title)
        .bind(&listing.description)
        .bind(listing.price)
        .bind(&listing.address)
        .bind(&listing.city)
        .bind(&listing.postcode)
        .bind(listing.property_type)
        .bind(listing.bedrooms)
        .bind(listing.bathrooms)
        .bind(listing.square_feet)
        .fetch_one(&self.pool)
        .await?;
        Ok(listing)
    }

    async fn update(
        &self,
        id: &Uuid,
        listing: &UpdateListing,
    ) -> Result<Option<ListingEntity>, error::SystemError> {
        let listing = sqlx::query_as::<_, ListingEntity>(
            r#"
            UPDATE listings
            SET
                title         = COALESCE($2, title),
                description   = COALESCE($3, description),
                price         = COALESCE($4, price),
                address       = COALESCE($5, address),
                city          = COALESCE($6, city),
                postcode      = CASE WHEN $7::boolean THEN $8 ELSE postcode END,
                property_type = COALESCE($9, property_type),
                bedrooms      = COALESCE($10, bedrooms),
                bathrooms     = COALESCE($11, bathrooms),
                square_feet   = CASE WHEN $12::boolean THEN $13 ELSE square_feet END,
                status        = COALESCE($14, status),
                updated_at    = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&listing.title)
        .bind(&listing.description)
        .bind(listing.price)
        .bind(&listing.address)
        .bind(&listing.city)
        .bind(listing.postcode.is_some())
        .bind(listing.postcode.as_ref().and_then(|v| v.as_ref()))
        .bind(listing.property_type)
        .bind(listing.bedrooms)
        .bind(listing.bathrooms)
        .bind(listing.square_feet.is_some())
        .bind(listing.square_feet.flatten())
        .bind(listing.status)
        .fetch_optional(&self.pool)
        .await?;
        Ok(listing)
    }

    async fn has_conversations(&self, id: &Uuid) -> Result<bool, error::SystemError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM conversations WHERE listing_id = $1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, error::SystemError> {
        let rows = sqlx::query("DELETE FROM listings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(rows > 0)
    }

    async fn append_image(
        &self,
        id: &Uuid,
        url: &str,
    ) -> Result<Option<ListingEntity>, error::SystemError> {
        let listing = sqlx::query_as::<_, ListingEntity>(
            r#"
            UPDATE listings SET images = array_append(images, $2), updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(url)
        .fetch_optional(&self.pool)
        .await?;
        Ok(listing)
    }

    async fn remove_image(
        &self,
        id: &Uuid,
        url: &str,
    ) -> Result<Option<ListingEntity>, error::SystemError> {
        let listing = sqlx::query_as::<_, ListingEntity>(
            r#"
            UPDATE listings SET images = array_remove(images, $2), updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(url)
        .fetch_optional(&self.pool)
        .await?;
        Ok(listing)
    }
}
