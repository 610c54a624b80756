use serde::Deserialize;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::modules::offer::schema::OfferStatus;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateOfferModel {
    pub conversation_id: Uuid,
    #[validate(range(min = 1, message = "Amount must be greater than zero"))]
    pub amount: i64,
    #[validate(length(max = 1000, message = "Message is too long"))]
    pub message: Option<String>,
}

fn validate_counter_amount(model: &UpdateOfferStatusModel) -> Result<(), ValidationError> {
    match (model.status, model.counter_amount) {
        (OfferStatus::Countered, None) => Err(ValidationError::new("counter_amount")
            .with_message("counter_amount is required when countering an offer".into())),
        (OfferStatus::Countered, Some(amount)) if amount <= 0 => {
            Err(ValidationError::new("counter_amount")
                .with_message("counter_amount must be greater than zero".into()))
        }
        (OfferStatus::Countered, Some(_)) => Ok(()),
        (_, Some(_)) => Err(ValidationError::new("counter_amount")
            .with_message("counter_amount is only allowed when countering an offer".into())),
        (_, None) => Ok(()),
    }
}

#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "validate_counter_amount"))]
pub struct UpdateOfferStatusModel {
    pub status: OfferStatus,
    pub counter_amount: Option<i64>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct OfferQuery {
    pub status: Option<OfferStatus>,
}

#[derive(Debug, Clone)]
pub struct InsertOffer {
    pub conversation_id: Uuid,
    pub listing_id: Uuid,
    pub buyer_id: Uuid,
    pub seller_id: Uuid,
    pub amount: i64,
    pub message: Option<String>,
}
