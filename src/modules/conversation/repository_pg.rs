use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        conversation::{
            model::{ConversationQuery, NewConversation, RoleFilter},
            repository::ConversationRepository,
            schema::{ConversationEntity, ParticipantRole},
        },
        message::{model::MessageDraft, repository_pg::append_in_tx, schema::MessageEntity},
    },
};

#[derive(Clone)]
pub struct ConversationRepositoryPg {
    pool: sqlx::PgPool,
}

impl ConversationRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ConversationRepository for ConversationRepositoryPg {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<ConversationEntity>, error::SystemError> {
        let conversation =
            sqlx::query_as::<_, ConversationEntity>("SELECT * FROM conversations WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(conversation)
    }

    async fn find_by_listing_and_buyer(
        &self,
        listing_id: &Uuid,
        buyer_id: &Uuid,
    ) -> Result<Option<ConversationEntity>, error::SystemError> {
        let conversation = sqlx::query_as::<_, ConversationEntity>(
            "SELECT * FROM conversations WHERE listing_id = $1 AND buyer_id = $2",
        )
        .bind(listing_id)
        .bind(buyer_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(conversation)
    }

    async fn open(
        &self,
        conversation: &NewConversation,
        first_message: &MessageDraft,
    ) -> Result<(MessageEntity, ConversationEntity), error::SystemError> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, ConversationEntity>(
            r#"
            INSERT INTO conversations (id, listing_id, buyer_id, seller_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(conversation.listing_id)
        .bind(conversation.buyer_id)
        .bind(conversation.seller_id)
        .fetch_one(tx.as_mut())
        .await?;

        let insert = first_message.to_insert(created.id, created.buyer_id, created.seller_id, None);
        let posted =
            append_in_tx(tx.as_mut(), first_message.sender_role, &insert, &first_message.preview)
                .await?;

        tx.commit().await?;

        Ok(posted)
    }

    async fn find_by_user(
        &self,
        user_id: &Uuid,
        query: &ConversationQuery,
    ) -> Result<Vec<ConversationEntity>, error::SystemError> {
        let (as_buyer, as_seller) = match query.role {
            RoleFilter::All => (true, true),
            RoleFilter::Buying => (true, false),
            RoleFilter::Selling => (false, true),
        };

        let conversations = sqlx::query_as::<_, ConversationEntity>(
            r#"
            SELECT * FROM conversations
            WHERE ($2 AND buyer_id = $1 AND buyer_archived = $4)
               OR ($3 AND seller_id = $1 AND seller_archived = $4)
            ORDER BY COALESCE(last_message_at, created_at) DESC
            "#,
        )
        .bind(user_id)
        .bind(as_buyer)
        .bind(as_seller)
        .bind(query.archived)
        .fetch_all(&self.pool)
        .await?;
        Ok(conversations)
    }

    async fn set_archived(
        &self,
        id: &Uuid,
        role: ParticipantRole,
        archived: bool,
    ) -> Result<Option<ConversationEntity>, error::SystemError> {
        let sql = match role {
            ParticipantRole::Buyer => {
                "UPDATE conversations SET buyer_archived = $2 WHERE id = $1 RETURNING *"
            }
            ParticipantRole::Seller => {
                "UPDATE conversations SET seller_archived = $2 WHERE id = $1 RETURNING *"
            }
        };
        let conversation = sqlx::query_as::<_, ConversationEntity>(sql)
            .bind(id)
            .bind(archived)
            .fetch_optional(&self.pool)
            .await?;
        Ok(conversation)
    }

    async fn total_unread(&self, user_id: &Uuid) -> Result<i64, error::SystemError> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(
                CASE WHEN buyer_id = $1 THEN buyer_unread_count ELSE seller_unread_count END
            ), 0)::BIGINT
            FROM conversations
            WHERE buyer_id = $1 OR seller_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }
}
