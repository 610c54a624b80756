use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        message::model::{MessageDraft, Posted},
        viewing_request::{
            model::InsertViewingRequest,
            schema::{ViewingRequestEntity, ViewingStatus},
        },
    },
};

#[async_trait::async_trait]
pub trait ViewingRequestRepository {
    /// In one transaction: marks every pending request of the conversation
    /// superseded, inserts the new pending one and posts `announcement`.
    /// Returns the new row and the rows that were superseded. A concurrent
    /// insert surfaces as a conflict.
    async fn supersede_and_insert(
        &self,
        request: &InsertViewingRequest,
        announcement: &MessageDraft,
    ) -> Result<(Posted<ViewingRequestEntity>, Vec<ViewingRequestEntity>), error::SystemError>;

    async fn find_by_id(&self, id: &Uuid)
        -> Result<Option<ViewingRequestEntity>, error::SystemError>;

    /// Newest first.
    async fn find_by_conversation(
        &self,
        conversation_id: &Uuid,
    ) -> Result<Vec<ViewingRequestEntity>, error::SystemError>;

    /// Requests where the user is buyer or seller, soonest viewing first.
    async fn find_by_user(
        &self,
        user_id: &Uuid,
        status: Option<ViewingStatus>,
    ) -> Result<Vec<ViewingRequestEntity>, error::SystemError>;

    /// Applies the change only while the row is still in `current` and posts
    /// `announcement` in the same transaction. `None` when the row had
    /// already moved on.
    async fn update_status(
        &self,
        id: &Uuid,
        current: ViewingStatus,
        next: ViewingStatus,
        response_note: Option<&str>,
        announcement: &MessageDraft,
    ) -> Result<Option<Posted<ViewingRequestEntity>>, error::SystemError>;
}
