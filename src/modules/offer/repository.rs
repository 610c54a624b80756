use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        message::model::{MessageDraft, Posted},
        offer::{
            model::InsertOffer,
            schema::{OfferEntity, OfferStatus},
        },
    },
};

#[async_trait::async_trait]
pub trait OfferRepository {
    /// Inserts a pending offer and posts `announcement` into its conversation
    /// in one transaction. A second open offer in the same conversation is
    /// rejected by the store as a conflict.
    async fn create(
        &self,
        offer: &InsertOffer,
        announcement: &MessageDraft,
    ) -> Result<Posted<OfferEntity>, error::SystemError>;

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<OfferEntity>, error::SystemError>;

    async fn find_open_by_conversation(
        &self,
        conversation_id: &Uuid,
    ) -> Result<Option<OfferEntity>, error::SystemError>;

    /// Newest first.
    async fn find_by_conversation(
        &self,
        conversation_id: &Uuid,
    ) -> Result<Vec<OfferEntity>, error::SystemError>;

    /// Offers where the user is buyer or seller, newest first.
    async fn find_by_user(
        &self,
        user_id: &Uuid,
        status: Option<OfferStatus>,
    ) -> Result<Vec<OfferEntity>, error::SystemError>;

    /// Applies the change only while the row is still in `current`, stamps
    /// `responded_at` and posts `announcement`, all in one transaction.
    /// Accepting also moves an active listing under offer. Returns `None`, with
    /// nothing written, when the row had already moved on.
    async fn update_status(
        &self,
        id: &Uuid,
        current: OfferStatus,
        next: OfferStatus,
        counter_amount: Option<i64>,
        announcement: &MessageDraft,
    ) -> Result<Option<Posted<OfferEntity>>, error::SystemError>;
}
