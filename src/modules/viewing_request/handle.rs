use actix_web::{get, patch, post, web, HttpRequest};
use uuid::Uuid;

use crate::{
    api::{error, success},
    middlewares::{get_extensions, AuthUser},
    modules::viewing_request::{
        model::{CreateViewingRequestModel, UpdateViewingStatusModel, ViewingRequestQuery},
        schema::ViewingRequestEntity,
        service::ViewingRequestService,
    },
    utils::ValidatedJson,
};

/// Propose a viewing time. Replaces any request still pending.
#[post("")]
pub async fn create_viewing_request(
    viewing_svc: web::Data<ViewingRequestService>,
    body: ValidatedJson<CreateViewingRequestModel>,
    req: HttpRequest,
) -> Result<success::Success<ViewingRequestEntity>, error::Error> {
    let user_id = get_extensions::<AuthUser>(&req)?.id;
    let request = viewing_svc.create(user_id, body.0).await?;
    Ok(success::Success::created(Some(request)).message("Viewing request created"))
}

/// The caller's viewing requests, soonest first.
#[get("")]
pub async fn list_viewing_requests(
    viewing_svc: web::Data<ViewingRequestService>,
    query: web::Query<ViewingRequestQuery>,
    req: HttpRequest,
) -> Result<success::Success<Vec<ViewingRequestEntity>>, error::Error> {
    let user_id = get_extensions::<AuthUser>(&req)?.id;
    let requests = viewing_svc.list_for_user(user_id, query.status).await?;
    Ok(success::Success::ok(Some(requests)).message("Viewing requests retrieved successfully"))
}

#[get("/conversation/{conversation_id}")]
pub async fn list_for_conversation(
    viewing_svc: web::Data<ViewingRequestService>,
    conversation_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<Vec<ViewingRequestEntity>>, error::Error> {
    let user_id = get_extensions::<AuthUser>(&req)?.id;
    let requests = viewing_svc.list_for_conversation(user_id, *conversation_id).await?;
    Ok(success::Success::ok(Some(requests)).message("Viewing requests retrieved successfully"))
}

#[get("/{id}")]
pub async fn get_viewing_request(
    viewing_svc: web::Data<ViewingRequestService>,
    id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<ViewingRequestEntity>, error::Error> {
    let user_id = get_extensions::<AuthUser>(&req)?.id;
    let request = viewing_svc.get(user_id, *id).await?;
    Ok(success::Success::ok(Some(request)))
}

#[patch("/{id}/status")]
pub async fn update_viewing_status(
    viewing_svc: web::Data<ViewingRequestService>,
    id: web::Path<Uuid>,
    body: ValidatedJson<UpdateViewingStatusModel>,
    req: HttpRequest,
) -> Result<success::Success<ViewingRequestEntity>, error::Error> {
    let user_id = get_extensions::<AuthUser>(&req)?.id;
    let request = viewing_svc.update_status(user_id, *id, body.0).await?;
    Ok(success::Success::ok(Some(request)).message("Viewing request updated"))
}
