use actix_web::web::{scope, ServiceConfig};

use crate::modules::saved_property::handle::*;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/saved-properties")
            .service(list_saved)
            .service(save_property)
            .service(saved_status)
            .service(unsave_property),
    );
}
