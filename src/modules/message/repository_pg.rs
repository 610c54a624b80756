use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        conversation::schema::{ConversationEntity, ParticipantRole},
        message::{
            model::{InsertMessage, MessageQuery},
            repository::MessageRepository,
            schema::MessageEntity,
        },
    },
};

#[derive(Clone)]
pub struct MessageRepositoryPg {
    pool: sqlx::PgPool,
}

impl MessageRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

/// Inserts the message inside the caller's transaction, then bumps the
/// counterpart's unread count, refreshes the preview and clears the
/// counterpart's archive flag.
pub async fn append_in_tx(
    conn: &mut sqlx::PgConnection,
    sender_role: ParticipantRole,
    message: &InsertMessage,
    preview: &str,
) -> Result<(MessageEntity, ConversationEntity), error::SystemError> {
    let created = sqlx::query_as::<_, MessageEntity>(
        r#"
        INSERT INTO messages (id, conversation_id, sender_id, kind, content, reference_id)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::now_v7())
    .bind(message.conversation_id)
    .bind(message.sender_id)
    .bind(message.kind)
    .bind(&message.content)
    .bind(message.reference_id)
    .fetch_one(&mut *conn)
    .await?;

    let update = match sender_role {
        ParticipantRole::Buyer => {
            r#"
            UPDATE conversations
            SET seller_unread_count = seller_unread_count + 1,
                seller_archived = FALSE,
                last_message_preview = $2,
                last_message_at = $3,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#
        }
        ParticipantRole::Seller => {
            r#"
            UPDATE conversations
            SET buyer_unread_count = buyer_unread_count + 1,
                buyer_archived = FALSE,
                last_message_preview = $2,
                last_message_at = $3,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#
        }
    };

    let conversation = sqlx::query_as::<_, ConversationEntity>(update)
        .bind(message.conversation_id)
        .bind(preview)
        .bind(created.created_at)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| error::SystemError::not_found("Conversation not found"))?;

    Ok((created, conversation))
}

#[async_trait::async_trait]
impl MessageRepository for MessageRepositoryPg {
    async fn append(
        &self,
        sender_role: ParticipantRole,
        message: &InsertMessage,
        preview: &str,
    ) -> Result<(MessageEntity, ConversationEntity), error::SystemError> {
        let mut tx = self.pool.begin().await?;
        let posted = append_in_tx(tx.as_mut(), sender_role, message, preview).await?;
        tx.commit().await?;

        Ok(posted)
    }

    async fn find_by_query(
        &self,
        query: &MessageQuery,
        limit: i64,
    ) -> Result<Vec<MessageEntity>, error::SystemError> {
        let messages = sqlx::query_as::<_, MessageEntity>(
            r#"
            SELECT * FROM messages
            WHERE conversation_id = $1
              AND (
                $2::timestamptz IS NULL
                OR created_at < $2
                OR (created_at = $2 AND $3::uuid IS NOT NULL AND id < $3)
              )
            ORDER BY created_at DESC, id DESC
            LIMIT $4
            "#,
        )
        .bind(query.conversation_id)
        .bind(query.before.map(|c| c.created_at))
        .bind(query.before.and_then(|c| c.id))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    async fn mark_read(
        &self,
        conversation_id: &Uuid,
        reader_id: &Uuid,
        reader_role: ParticipantRole,
    ) -> Result<ConversationEntity, error::SystemError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE messages SET is_read = TRUE, read_at = NOW()
            WHERE conversation_id = $1 AND sender_id <> $2 AND is_read = FALSE
            "#,
        )
        .bind(conversation_id)
        .bind(reader_id)
        .execute(tx.as_mut())
        .await?;

        let reset = match reader_role {
            ParticipantRole::Buyer => {
                "UPDATE conversations SET buyer_unread_count = 0 WHERE id = $1 RETURNING *"
            }
            ParticipantRole::Seller => {
                "UPDATE conversations SET seller_unread_count = 0 WHERE id = $1 RETURNING *"
            }
        };

        let conversation = sqlx::query_as::<_, ConversationEntity>(reset)
            .bind(conversation_id)
            .fetch_optional(tx.as_mut())
            .await?
            .ok_or_else(|| error::SystemError::not_found("Conversation not found"))?;

        tx.commit().await?;

        Ok(conversation)
    }
}
