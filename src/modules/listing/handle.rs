use actix_multipart::Multipart;
use actix_web::{delete, get, patch, post, web, HttpRequest, HttpResponse};
use futures_util::TryStreamExt;
use uuid::Uuid;

use crate::{
    api::{error, success},
    middlewares::{get_extensions, AuthUser},
    modules::listing::{
        model::{
            CreateListingModel, ImageUploadResponse, ListingQuery, RemoveImageModel,
            UpdateListingModel,
        },
        schema::ListingEntity,
        service::ListingService,
    },
    utils::{ValidatedJson, ValidatedQuery},
};

/// Search active listings (or another status) with filters and sorting.
#[get("")]
pub async fn search_listings(
    listing_svc: web::Data<ListingService>,
    query: ValidatedQuery<ListingQuery>,
) -> Result<success::Success<Vec<ListingEntity>>, error::Error> {
    let listings = listing_svc.search(query.0).await?;
    Ok(success::Success::ok(Some(listings)).message("Listings retrieved successfully"))
}

#[get("/mine")]
pub async fn my_listings(
    listing_svc: web::Data<ListingService>,
    req: HttpRequest,
) -> Result<success::Success<Vec<ListingEntity>>, error::Error> {
    let user_id = get_extensions::<AuthUser>(&req)?.id;
    let listings = listing_svc.list_by_seller(user_id).await?;
    Ok(success::Success::ok(Some(listings)).message("Listings retrieved successfully"))
}

#[get("/{id:[0-9a-fA-F-]{36}}")]
pub async fn get_listing(
    listing_svc: web::Data<ListingService>,
    id: web::Path<Uuid>,
) -> Result<success::Success<ListingEntity>, error::Error> {
    let listing = listing_svc.get_by_id(id.into_inner()).await?;
    Ok(success::Success::ok(Some(listing)).message("Listing retrieved successfully"))
}

#[post("")]
pub async fn create_listing(
    listing_svc: web::Data<ListingService>,
    body: ValidatedJson<CreateListingModel>,
    req: HttpRequest,
) -> Result<success::Success<ListingEntity>, error::Error> {
    let user_id = get_extensions::<AuthUser>(&req)?.id;
    let listing = listing_svc.create(user_id, body.0).await?;
    Ok(success::Success::created(Some(listing)).message("Listing created successfully"))
}

#[patch("/{id:[0-9a-fA-F-]{36}}")]
pub async fn update_listing(
    listing_svc: web::Data<ListingService>,
    id: web::Path<Uuid>,
    body: ValidatedJson<UpdateListingModel>,
    req: HttpRequest,
) -> Result<success::Success<ListingEntity>, error::Error> {
    let user_id = get_extensions::<AuthUser>(&req)?.id;
    let listing = listing_svc.update(user_id, id.into_inner(), body.0).await?;
    Ok(success::Success::ok(Some(listing)).message("Listing updated successfully"))
}

#[delete("/{id:[0-9a-fA-F-]{36}}")]
pub async fn delete_listing(
    listing_svc: web::Data<ListingService>,
    id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let user_id = get_extensions::<AuthUser>(&req)?.id;
    listing_svc.delete(user_id, id.into_inner()).await?;
    Ok(success::Success::no_content())
}

/// Upload one image for a listing (multipart, first field only).
#[post("/{id:[0-9a-fA-F-]{36}}/images")]
pub async fn upload_image(
    listing_svc: web::Data<ListingService>,
    id: web::Path<Uuid>,
    mut payload: Multipart,
    req: HttpRequest,
) -> Result<success::Success<ImageUploadResponse>, error::Error> {
    let user_id = get_extensions::<AuthUser>(&req)?.id;

    let mut field = payload
        .try_next()
        .await
        .map_err(|e| error::Error::bad_request(format!("Invalid multipart body: {e}")))?
        .ok_or_else(|| error::Error::bad_request("No file found in request"))?;

    let filename = field
        .content_disposition()
        .and_then(|cd| cd.get_filename())
        .map(str::to_string)
        .ok_or_else(|| error::Error::bad_request("Missing filename"))?;

    let mime_type = field
        .content_type()
        .map(|m| m.essence_str().to_string())
        .unwrap_or_else(|| mime_guess::from_path(&filename).first_or_octet_stream().to_string());

    // Stop reading as soon as the body outgrows the limit.
    let max_bytes = listing_svc.max_upload_bytes();
    let mut bytes = Vec::new();
    while let Some(chunk) = field
        .try_next()
        .await
        .map_err(|e| error::Error::bad_request(format!("Invalid multipart body: {e}")))?
    {
        if bytes.len() + chunk.len() > max_bytes {
            return Err(error::Error::bad_request(format!(
                "File size exceeds maximum allowed size of {max_bytes} bytes"
            )));
        }
        bytes.extend_from_slice(&chunk);
    }

    let response =
        listing_svc.add_image(user_id, id.into_inner(), &filename, &bytes, &mime_type).await?;
    Ok(success::Success::created(Some(response)).message("Image uploaded successfully"))
}

/// Remove one image by its public URL.
#[delete("/{id:[0-9a-fA-F-]{36}}/images")]
pub async fn remove_image(
    listing_svc: web::Data<ListingService>,
    id: web::Path<Uuid>,
    body: ValidatedJson<RemoveImageModel>,
    req: HttpRequest,
) -> Result<success::Success<ListingEntity>, error::Error> {
    let user_id = get_extensions::<AuthUser>(&req)?.id;
    let listing = listing_svc.remove_image(user_id, id.into_inner(), &body.0.url).await?;
    Ok(success::Success::ok(Some(listing)).message("Image removed successfully"))
}

/// Serves objects from the storage bucket. Public, like the bucket URLs it backs.
pub async fn serve_object(
    listing_svc: web::Data<ListingService>,
    name: web::Path<String>,
) -> Result<HttpResponse, error::Error> {
    let (bytes, mime) = listing_svc.read_object(&name).await?;
    Ok(HttpResponse::Ok()
        .insert_header(("Content-Type", mime))
        .insert_header(("Cache-Control", "public, max-age=31536000, immutable"))
        .body(bytes))
}
