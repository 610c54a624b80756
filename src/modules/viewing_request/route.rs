use actix_web::web::{scope, ServiceConfig};

use crate::modules::viewing_request::handle::*;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/viewing-requests")
            .service(create_viewing_request)
            .service(list_viewing_requests)
            .service(list_for_conversation)
            .service(get_viewing_request)
            .service(update_viewing_status),
    );
}
