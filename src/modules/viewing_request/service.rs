use std::{sync::Arc, time::Duration};
use uuid::Uuid;

use crate::{
    api::error,
    constants::{VIEWING_INSERT_ATTEMPTS, VIEWING_RETRY_DELAY_MS},
    modules::{
        conversation::{schema::ParticipantRole, service::ConversationService},
        listing::repository::ListingRepository,
        message::{model::MessageDraft, schema::MessageKind},
        realtime::{Broadcaster, RealtimeEvent},
        viewing_request::{
            model::{CreateViewingRequestModel, InsertViewingRequest, UpdateViewingStatusModel},
            repository::ViewingRequestRepository,
            schema::{ViewingRequestEntity, ViewingStatus},
        },
    },
};

fn describe(status: ViewingStatus, proposed_at: &chrono::DateTime<chrono::Utc>) -> String {
    let when = proposed_at.format("%a %d %b %Y, %H:%M UTC");
    match status {
        ViewingStatus::Pending => format!("Viewing requested for {when}"),
        ViewingStatus::Confirmed => format!("Viewing confirmed for {when}"),
        ViewingStatus::Rejected => format!("Viewing request for {when} was declined"),
        ViewingStatus::Cancelled => format!("Viewing on {when} was cancelled"),
        ViewingStatus::Completed => format!("Viewing on {when} marked as completed"),
        ViewingStatus::Superseded => format!("Viewing request for {when} was replaced"),
    }
}

#[derive(Clone)]
pub struct ViewingRequestService {
    repo: Arc<dyn ViewingRequestRepository + Send + Sync>,
    listing_repo: Arc<dyn ListingRepository + Send + Sync>,
    conversation_svc: ConversationService,
    broadcaster: Arc<dyn Broadcaster>,
    retry_delay: Duration,
}

impl ViewingRequestService {
    pub fn with_dependencies(
        repo: Arc<dyn ViewingRequestRepository + Send + Sync>,
        listing_repo: Arc<dyn ListingRepository + Send + Sync>,
        conversation_svc: ConversationService,
        broadcaster: Arc<dyn Broadcaster>,
    ) -> Self {
        ViewingRequestService {
            repo,
            listing_repo,
            conversation_svc,
            broadcaster,
            retry_delay: Duration::from_millis(VIEWING_RETRY_DELAY_MS),
        }
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    fn notify(&self, request: &ViewingRequestEntity) {
        self.broadcaster.publish(
            &[request.buyer_id, request.seller_id],
            RealtimeEvent::ViewingRequestUpdated { viewing_request: request.clone() },
        );
    }

    async fn get_for_participant(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<(ViewingRequestEntity, ParticipantRole), error::SystemError> {
        let request = self
            .repo
            .find_by_id(&id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Viewing request not found"))?;

        let role = request.role_of(&user_id).ok_or_else(|| {
            error::SystemError::forbidden("You are not a participant of this viewing request")
        })?;

        Ok((request, role))
    }

    pub async fn get(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<ViewingRequestEntity, error::SystemError> {
        self.get_for_participant(user_id, id).await.map(|(request, _)| request)
    }

    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        status: Option<ViewingStatus>,
    ) -> Result<Vec<ViewingRequestEntity>, error::SystemError> {
        self.repo.find_by_user(&user_id, status).await
    }

    pub async fn list_for_conversation(
        &self,
        user_id: Uuid,
        conversation_id: Uuid,
    ) -> Result<Vec<ViewingRequestEntity>, error::SystemError> {
        self.conversation_svc.load_for_participant(user_id, conversation_id).await?;
        self.repo.find_by_conversation(&conversation_id).await
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        model: CreateViewingRequestModel,
    ) -> Result<ViewingRequestEntity, error::SystemError> {
        let (conversation, role) =
            self.conversation_svc.load_for_participant(user_id, model.conversation_id).await?;

        if role != ParticipantRole::Buyer {
            return Err(error::SystemError::forbidden("Only the buyer can request a viewing"));
        }

        if model.proposed_at <= chrono::Utc::now() {
            return Err(error::SystemError::bad_request("Proposed time must be in the future"));
        }

        let listing = self
            .listing_repo
            .find_by_id(&conversation.listing_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Listing not found"))?;

        if !listing.status.accepts_offers() {
            return Err(error::SystemError::bad_request("This property has already been sold"));
        }

        let insert = InsertViewingRequest {
            conversation_id: conversation.id,
            listing_id: conversation.listing_id,
            buyer_id: conversation.buyer_id,
            seller_id: conversation.seller_id,
            proposed_at: model.proposed_at,
            note: model.note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
        };

        let announcement = MessageDraft::new(
            role,
            MessageKind::ViewingRequest,
            describe(ViewingStatus::Pending, &insert.proposed_at),
        );

        let mut attempt = 1;
        let (posted, superseded) = loop {
            match self.repo.supersede_and_insert(&insert, &announcement).await {
                Ok(result) => break result,
                // A concurrent request inserted its own pending row first.
                Err(e) if e.is_conflict() && attempt < VIEWING_INSERT_ATTEMPTS => {
                    log::warn!(
                        "Viewing request insert for conversation {} conflicted (attempt {}), retrying",
                        conversation.id,
                        attempt
                    );
                    attempt += 1;
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(e) => return Err(e),
            }
        };
        let created = posted.row;

        for old in &superseded {
            self.notify(old);
        }
        self.conversation_svc.publish_posted(&posted.message, &posted.conversation);
        self.notify(&created);
        log::info!("Viewing request {} created in conversation {}", created.id, conversation.id);

        Ok(created)
    }

    pub async fn update_status(
        &self,
        user_id: Uuid,
        id: Uuid,
        model: UpdateViewingStatusModel,
    ) -> Result<ViewingRequestEntity, error::SystemError> {
        let (request, role) = self.get_for_participant(user_id, id).await?;
        let next = model.status;

        if !request.status.can_transition(next, role) {
            return Err(error::SystemError::bad_request(format!(
                "Cannot change viewing request from {} to {}",
                request.status.as_str(),
                next.as_str()
            )));
        }

        let response_note =
            model.response_note.as_deref().map(str::trim).filter(|n| !n.is_empty());
        let announcement = MessageDraft::new(
            role,
            MessageKind::ViewingRequest,
            describe(next, &request.proposed_at),
        );

        let posted = self
            .repo
            .update_status(&id, request.status, next, response_note, &announcement)
            .await?
            .ok_or_else(|| {
                error::SystemError::conflict("Viewing request was changed by another request")
            })?;
        let updated = posted.row;

        self.conversation_svc.publish_posted(&posted.message, &posted.conversation);
        self.notify(&updated);
        log::info!(
            "Viewing request {} moved from {} to {}",
            id,
            request.status.as_str(),
            next.as_str()
        );

        Ok(updated)
    }
}
