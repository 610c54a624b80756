use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        message::{
            model::{MessageDraft, Posted},
            repository_pg::append_in_tx,
        },
        viewing_request::{
            model::InsertViewingRequest,
            repository::ViewingRequestRepository,
            schema::{ViewingRequestEntity, ViewingStatus},
        },
    },
};

#[derive(Clone)]
pub struct ViewingRequestRepositoryPg {
    pool: sqlx::PgPool,
}

impl ViewingRequestRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ViewingRequestRepository for ViewingRequestRepositoryPg {
    async fn supersede_and_insert(
        &self,
        request: &InsertViewingRequest,
        announcement: &MessageDraft,
    ) -> Result<(Posted<ViewingRequestEntity>, Vec<ViewingRequestEntity>), error::SystemError> {
        let mut tx = self.pool.begin().await?;

        let superseded = sqlx::query_as::<_, ViewingRequestEntity>(
            r#"
            UPDATE viewing_requests
            SET status = 'superseded', updated_at = NOW()
            WHERE conversation_id = $1 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(request.conversation_id)
        .fetch_all(tx.as_mut())
        .await?;

        let created = sqlx::query_as::<_, ViewingRequestEntity>(
            r#"
            INSERT INTO viewing_requests (
                id, conversation_id, listing_id, buyer_id, seller_id, proposed_at, note
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(request.conversation_id)
        .bind(request.listing_id)
        .bind(request.buyer_id)
        .bind(request.seller_id)
        .bind(request.proposed_at)
        .bind(&request.note)
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

        Ok((Posted { row: created, message, conversation }, superseded))
    }

    async fn find_by_id(
        &self,
        id: &Uuid,
    ) -> Result<Option<ViewingRequestEntity>, error::SystemError> {
        let request = sqlx::query_as::<_, ViewingRequestEntity>(
            "SELECT * FROM viewing_requests WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(request)
    }

    async fn find_by_conversation(
        &self,
        conversation_id: &Uuid,
    ) -> Result<Vec<ViewingRequestEntity>, error::SystemError> {
        let requests = sqlx::query_as::<_, ViewingRequestEntity>(
            "SELECT * FROM viewing_requests WHERE conversation_id = $1 ORDER BY created_at DESC",
        )
        .bind(conversation_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(requests)
    }

    async fn find_by_user(
        &self,
        user_id: &Uuid,
        status: Option<ViewingStatus>,
    ) -> Result<Vec<ViewingRequestEntity>, error::SystemError> {
        let requests = sqlx::query_as::<_, ViewingRequestEntity>(
            r#"
            SELECT * FROM viewing_requests
            WHERE (buyer_id = $1 OR seller_id = $1)
              AND ($2::viewing_status IS NULL OR status = $2)
            ORDER BY proposed_at ASC
            "#,
        )
        .bind(user_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;
        Ok(requests)
    }

    async fn update_status(
        &self,
        id: &Uuid,
        current: ViewingStatus,
        next: ViewingStatus,
        response_note: Option<&str>,
        announcement: &MessageDraft,
    ) -> Result<Option<Posted<ViewingRequestEntity>>, error::SystemError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query_as::<_, ViewingRequestEntity>(
            r#"
            UPDATE viewing_requests
            SET status = $3,
                response_note = COALESCE($4, response_note),
                updated_at = NOW()
            WHERE id = $1 AND status = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(current)
        .bind(next)
        .bind(response_note)
        .fetch_optional(tx.as_mut())
        .await?;

        let Some(request) = updated else {
            return Ok(None);
        };

        let insert = announcement.to_insert(
            request.conversation_id,
            request.buyer_id,
            request.seller_id,
            Some(request.id),
        );
        let (message, conversation) =
            append_in_tx(tx.as_mut(), announcement.sender_role, &insert, &announcement.preview)
                .await?;

        tx.commit().await?;

        Ok(Some(Posted { row: request, message, conversation }))
    }
}
