use actix_web::{delete, get, post, web, HttpRequest};
use uuid::Uuid;

use crate::{
    api::{error, success},
    middlewares::{get_extensions, AuthUser},
    modules::saved_property::{
        model::{SavePropertyModel, SavedStatusResponse},
        schema::{SavedListingRow, SavedPropertyEntity},
        service::SavedPropertyService,
    },
    utils::ValidatedJson,
};

#[get("")]
pub async fn list_saved(
    saved_svc: web::Data<SavedPropertyService>,
    req: HttpRequest,
) -> Result<success::Success<Vec<SavedListingRow>>, error::Error> {
    let user_id = get_extensions::<AuthUser>(&req)?.id;
    let saved = saved_svc.list(user_id).await?;
    Ok(success::Success::ok(Some(saved)).message("Saved properties retrieved successfully"))
}

#[post("")]
pub async fn save_property(
    saved_svc: web::Data<SavedPropertyService>,
    body: ValidatedJson<SavePropertyModel>,
    req: HttpRequest,
) -> Result<success::Success<SavedPropertyEntity>, error::Error> {
    let user_id = get_extensions::<AuthUser>(&req)?.id;
    let saved = saved_svc.save(user_id, body.0.listing_id).await?;
    Ok(success::Success::created(Some(saved)).message("Property saved"))
}

/// Whether the caller has saved a listing.
#[get("/{listing_id}")]
pub async fn saved_status(
    saved_svc: web::Data<SavedPropertyService>,
    listing_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<SavedStatusResponse>, error::Error> {
    let user_id = get_extensions::<AuthUser>(&req)?.id;
    let listing_id = listing_id.into_inner();
    let saved = saved_svc.is_saved(user_id, listing_id).await?;
    Ok(success::Success::ok(Some(SavedStatusResponse { listing_id, saved })))
}

#[delete("/{listing_id}")]
pub async fn unsave_property(
    saved_svc: web::Data<SavedPropertyService>,
    listing_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let user_id = get_extensions::<AuthUser>(&req)?.id;
    saved_svc.unsave(user_id, listing_id.into_inner()).await?;
    Ok(success::Success::no_content())
}
