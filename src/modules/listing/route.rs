use actix_web::web::{self, scope, ServiceConfig};

use crate::modules::listing::handle::*;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/listings")
            .service(search_listings)
            .service(my_listings)
            .service(get_listing)
            .service(create_listing)
            .service(update_listing)
            .service(delete_listing)
            .service(upload_image)
            .service(remove_image),
    );
}

/// Public routes for the storage bucket, mounted at its base URL.
pub fn storage_configure(cfg: &mut ServiceConfig) {
    cfg.route("/{name}", web::get().to(serve_object));
}
