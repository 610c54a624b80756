use actix_web::{get, patch, post, web, HttpRequest};
use uuid::Uuid;

use crate::{
    api::{error, success},
    middlewares::{get_extensions, AuthUser},
    modules::offer::{
        model::{CreateOfferModel, OfferQuery, UpdateOfferStatusModel},
        schema::OfferEntity,
        service::OfferService,
    },
    utils::ValidatedJson,
};

/// Make an offer on the listing behind a conversation.
#[post("")]
pub async fn create_offer(
    offer_svc: web::Data<OfferService>,
    body: ValidatedJson<CreateOfferModel>,
    req: HttpRequest,
) -> Result<success::Success<OfferEntity>, error::Error> {
    let user_id = get_extensions::<AuthUser>(&req)?.id;
    let offer = offer_svc.create(user_id, body.0).await?;
    Ok(success::Success::created(Some(offer)).message("Offer created"))
}

#[get("")]
pub async fn list_offers(
    offer_svc: web::Data<OfferService>,
    query: web::Query<OfferQuery>,
    req: HttpRequest,
) -> Result<success::Success<Vec<OfferEntity>>, error::Error> {
    let user_id = get_extensions::<AuthUser>(&req)?.id;
    let offers = offer_svc.list_for_user(user_id, query.status).await?;
    Ok(success::Success::ok(Some(offers)).message("Offers retrieved successfully"))
}

#[get("/conversation/{conversation_id}")]
pub async fn list_for_conversation(
    offer_svc: web::Data<OfferService>,
    conversation_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<Vec<OfferEntity>>, error::Error> {
    let user_id = get_extensions::<AuthUser>(&req)?.id;
    let offers = offer_svc.list_for_conversation(user_id, *conversation_id).await?;
    Ok(success::Success::ok(Some(offers)).message("Offers retrieved successfully"))
}

#[get("/{id}")]
pub async fn get_offer(
    offer_svc: web::Data<OfferService>,
    id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<OfferEntity>, error::Error> {
    let user_id = get_extensions::<AuthUser>(&req)?.id;
    let offer = offer_svc.get(user_id, *id).await?;
    Ok(success::Success::ok(Some(offer)))
}

/// Accept, reject, counter or withdraw an offer.
#[patch("/{id}/status")]
pub async fn update_offer_status(
    offer_svc: web::Data<OfferService>,
    id: web::Path<Uuid>,
    body: ValidatedJson<UpdateOfferStatusModel>,
    req: HttpRequest,
) -> Result<success::Success<OfferEntity>, error::Error> {
    let user_id = get_extensions::<AuthUser>(&req)?.id;
    let offer = offer_svc.update_status(user_id, *id, body.0).await?;
    Ok(success::Success::ok(Some(offer)).message("Offer updated"))
}
