use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::modules::{
    conversation::schema::ConversationEntity, message::schema::MessageEntity,
    offer::schema::OfferEntity, viewing_request::schema::ViewingRequestEntity,
};

/// Events sent from the server to connected clients.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RealtimeEvent {
    #[serde(rename_all = "camelCase")]
    MessageCreated { conversation_id: Uuid, message: MessageEntity },

    ConversationUpdated { conversation: ConversationEntity },

    OfferUpdated { offer: OfferEntity },

    #[serde(rename_all = "camelCase")]
    ViewingRequestUpdated { viewing_request: ViewingRequestEntity },

    Pong,
}

/// Frames accepted from clients.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientFrame {
    Ping,
}
