use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        listing::schema::ListingStatus,
        message::{
            model::{MessageDraft, Posted},
            repository_pg::append_in_tx,
        },
        offer::{
            model::InsertOffer,
            repository::OfferRepository,
            schema::{OfferEntity, OfferStatus},
        },
    },
};

#[derive(Clone)]
pub struct OfferRepositoryPg {
    pool: sqlx::PgPool,
}

impl OfferRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl OfferRepository for OfferRepositoryPg {
    async fn create(
        &self,
        offer: &InsertOffer,
        announcement: &MessageDraft,
    ) -> Result<Posted<OfferEntity>, error::SystemError> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, OfferEntity>(
            r#"
            INSERT INTO offers (id, conversation_id, listing_id, buyer_id, seller_id, amount, message)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(offer.conversation_id)
        .bind(offer.listing_id)
        .bind(offer.buyer_id)
        .bind(offer.seller_id)
        .bind(offer.amount)
        .bind(&offer.message)
        .fetch_one(tx.as_mut())
        .await?;

        let insert = announcement.to_insert(
            created.conversation_id,
            created.buyer_id,
            created.seller_id,
            Some(created.id),
        );
        let (message, conversation) =
            append_in_tx(tx.as_mut(), announcement.sender_role, &insert, &announcement.preview)
                .await?;

        tx.commit().await?;

        Ok(Posted { row: created, message, conversation })
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<OfferEntity>, error::SystemError> {
        let offer = sqlx::query_as::<_, OfferEntity>("SELECT * FROM offers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(offer)
    }

    async fn find_open_by_conversation(
        &self,
        conversation_id: &Uuid,
    ) -> Result<Option<OfferEntity>, error::SystemError> {
        let offer = sqlx::query_as::<_, OfferEntity>(
            r#"
            SELECT * FROM offers
            WHERE conversation_id = $1 AND status IN ('pending', 'countered')
            LIMIT 1
            "#,
        )
        .bind(conversation_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(offer)
    }

    async fn find_by_conversation(
        &self,
        conversation_id: &Uuid,
    ) -> Result<Vec<OfferEntity>, error::SystemError> {
        let offers = sqlx::query_as::<_, OfferEntity>(
            "SELECT * FROM offers WHERE conversation_id = $1 ORDER BY created_at DESC",
        )
        .bind(conversation_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(offers)
    }

    async fn find_by_user(
        &self,
        user_id: &Uuid,
        status: Option<OfferStatus>,
    ) -> Result<Vec<OfferEntity>, error::SystemError> {
        let offers = sqlx::query_as::<_, OfferEntity>(
            r#"
            SELECT * FROM offers
            WHERE (buyer_id = $1 OR seller_id = $1)
              AND ($2::offer_status IS NULL OR status = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;
        Ok(offers)
    }

    async fn update_status(
        &self,
        id: &Uuid,
        current: OfferStatus,
        next: OfferStatus,
        counter_amount: Option<i64>,
        announcement: &MessageDraft,
    ) -> Result<Option<Posted<OfferEntity>>, error::SystemError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query_as::<_, OfferEntity>(
            r#"
            UPDATE offers
            SET status = $3,
                counter_amount = COALESCE($4, counter_amount),
                responded_at = NOW(),
                updated_at = NOW()
            WHERE id = $1 AND status = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(current)
        .bind(next)
        .bind(counter_amount)
        .fetch_optional(tx.as_mut())
        .await?;

        // Dropping the transaction rolls it back.
        let Some(offer) = updated else {
            return Ok(None);
        };

        if next == OfferStatus::Accepted {
            sqlx::query(
                r#"
                UPDATE listings SET status = $2, updated_at = NOW()
                WHERE id = $1 AND status = $3
                "#,
            )
            .bind(offer.listing_id)
            .bind(ListingStatus::UnderOffer)
            .bind(ListingStatus::Active)
            .execute(tx.as_mut())
            .await?;
        }

        let insert = announcement.to_insert(
            offer.conversation_id,
            offer.buyer_id,
            offer.seller_id,
            Some(offer.id),
        );
        let (message, conversation) =
            append_in_tx(tx.as_mut(), announcement.sender_role, &insert, &announcement.preview)
                .await?;

        tx.commit().await?;

        Ok(Some(Posted { row: offer, message, conversation }))
    }
}
