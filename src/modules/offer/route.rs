use actix_web::web::{scope, ServiceConfig};

use crate::modules::offer::handle::*;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/offers")
            .service(create_offer)
            .service(list_offers)
            .service(list_for_conversation)
            .service(get_offer)
            .service(update_offer_status),
    );
}
