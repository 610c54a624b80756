use std::sync::Arc;
use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        conversation::{schema::ParticipantRole, service::ConversationService},
        listing::repository::ListingRepository,
        message::{model::MessageDraft, schema::MessageKind},
        offer::{
            model::{CreateOfferModel, InsertOffer, UpdateOfferStatusModel},
            repository::OfferRepository,
            schema::{OfferEntity, OfferStatus},
        },
        realtime::{Broadcaster, RealtimeEvent},
    },
};

/// Conversation text for an offer reaching `status`.
fn describe(status: OfferStatus, amount: i64, counter_amount: Option<i64>) -> String {
    match status {
        OfferStatus::Pending => format!("Made an offer of {amount}"),
        OfferStatus::Accepted => match counter_amount {
            Some(counter) => format!("Accepted the counter-offer of {counter}"),
            None => format!("Accepted the offer of {amount}"),
        },
        OfferStatus::Rejected => match counter_amount {
            Some(counter) => format!("Declined the counter-offer of {counter}"),
            None => format!("Declined the offer of {amount}"),
        },
        OfferStatus::Countered => {
            format!("Countered the offer of {amount} with {}", counter_amount.unwrap_or(amount))
        }
        OfferStatus::Withdrawn => format!("Withdrew the offer of {amount}"),
    }
}

#[derive(Clone)]
pub struct OfferService {
    repo: Arc<dyn OfferRepository + Send + Sync>,
    listing_repo: Arc<dyn ListingRepository + Send + Sync>,
    conversation_svc: ConversationService,
    broadcaster: Arc<dyn Broadcaster>,
}

impl OfferService {
    pub fn with_dependencies(
        repo: Arc<dyn OfferRepository + Send + Sync>,
        listing_repo: Arc<dyn ListingRepository + Send + Sync>,
        conversation_svc: ConversationService,
        broadcaster: Arc<dyn Broadcaster>,
    ) -> Self {
        OfferService { repo, listing_repo, conversation_svc, broadcaster }
    }

    fn notify(&self, offer: &OfferEntity) {
        self.broadcaster.publish(
            &[offer.buyer_id, offer.seller_id],
            RealtimeEvent::OfferUpdated { offer: offer.clone() },
        );
    }

    async fn get_for_participant(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<(OfferEntity, ParticipantRole), error::SystemError> {
        let offer = self
            .repo
            .find_by_id(&id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Offer not found"))?;

        let role = offer.role_of(&user_id).ok_or_else(|| {
            error::SystemError::forbidden("You are not a participant of this offer")
        })?;

        Ok((offer, role))
    }

    pub async fn get(&self, user_id: Uuid, id: Uuid) -> Result<OfferEntity, error::SystemError> {
        self.get_for_participant(user_id, id).await.map(|(offer, _)| offer)
    }

    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        status: Option<OfferStatus>,
    ) -> Result<Vec<OfferEntity>, error::SystemError> {
        self.repo.find_by_user(&user_id, status).await
    }

    pub async fn list_for_conversation(
        &self,
        user_id: Uuid,
        conversation_id: Uuid,
    ) -> Result<Vec<OfferEntity>, error::SystemError> {
        self.conversation_svc.load_for_participant(user_id, conversation_id).await?;
        self.repo.find_by_conversation(&conversation_id).await
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        model: CreateOfferModel,
    ) -> Result<OfferEntity, error::SystemError> {
        let (conversation, role) =
            self.conversation_svc.load_for_participant(user_id, model.conversation_id).await?;

        if role != ParticipantRole::Buyer {
            return Err(error::SystemError::forbidden("Only the buyer can make an offer"));
        }

        if model.amount <= 0 {
            return Err(error::SystemError::bad_request("Amount must be greater than zero"));
        }

        let listing = self
            .listing_repo
            .find_by_id(&conversation.listing_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Listing not found"))?;

        if !listing.status.accepts_offers() {
            return Err(error::SystemError::bad_request("This property has already been sold"));
        }

        if self.repo.find_open_by_conversation(&conversation.id).await?.is_some() {
            return Err(error::SystemError::conflict(
                "There is already an open offer in this conversation",
            ));
        }

        let insert = InsertOffer {
            conversation_id: conversation.id,
            listing_id: conversation.listing_id,
            buyer_id: conversation.buyer_id,
            seller_id: conversation.seller_id,
            amount: model.amount,
            message: model.message.map(|m| m.trim().to_string()).filter(|m| !m.is_empty()),
        };
        let announcement = MessageDraft::new(
            role,
            MessageKind::Offer,
            describe(OfferStatus::Pending, insert.amount, None),
        );

        // The offer and its message commit together or not at all.
        let posted = self.repo.create(&insert, &announcement).await?;
        let offer = posted.row;

        self.conversation_svc.publish_posted(&posted.message, &posted.conversation);
        self.notify(&offer);
        log::info!("Offer {} of {} created in conversation {}", offer.id, offer.amount, conversation.id);

        Ok(offer)
    }

    /// Moves an offer along the negotiation table on behalf of whichever side
    /// `user_id` is on.
    pub async fn update_status(
        &self,
        user_id: Uuid,
        id: Uuid,
        model: UpdateOfferStatusModel,
    ) -> Result<OfferEntity, error::SystemError> {
        let (offer, role) = self.get_for_participant(user_id, id).await?;
        let next = model.status;

        if !offer.status.can_transition(next, role) {
            return Err(error::SystemError::bad_request(format!(
                "Cannot change offer from {} to {}",
                offer.status.as_str(),
                next.as_str()
            )));
        }

        // Also checked by the request validator; services can be called directly.
        let counter_amount = match (next, model.counter_amount) {
            (OfferStatus::Countered, Some(amount)) if amount > 0 => Some(amount),
            (OfferStatus::Countered, _) => {
                return Err(error::SystemError::bad_request(
                    "counter_amount is required when countering an offer",
                ))
            }
            (_, Some(_)) => {
                return Err(error::SystemError::bad_request(
                    "counter_amount is only allowed when countering an offer",
                ))
            }
            (_, None) => None,
        };

        let announcement = MessageDraft::new(
            role,
            MessageKind::Offer,
            describe(next, offer.amount, counter_amount.or(offer.counter_amount)),
        );

        let posted = self
            .repo
            .update_status(&id, offer.status, next, counter_amount, &announcement)
            .await?
            .ok_or_else(|| error::SystemError::conflict("Offer was changed by another request"))?;
        let updated = posted.row;

        self.conversation_svc.publish_posted(&posted.message, &posted.conversation);
        self.notify(&updated);
        log::info!("Offer {} moved from {} to {}", id, offer.status.as_str(), next.as_str());

        Ok(updated)
    }
}
