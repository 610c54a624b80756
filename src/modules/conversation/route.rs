use actix_web::web::{scope, ServiceConfig};

use crate::modules::conversation::handle::*;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/conversations")
            .service(list_conversations)
            .service(start_conversation)
            .service(unread_count)
            .service(get_conversation)
            .service(get_messages)
            .service(send_message)
            .service(mark_read)
            .service(archive)
            .service(unarchive),
    );
}
