use actix_web::{get, post, web, HttpRequest};
use uuid::Uuid;

use crate::{
    api::{error, success},
    middlewares::{get_extensions, AuthUser},
    modules::{
        conversation::{
            model::{
                ConversationQuery, ConversationResponse, StartConversationModel,
                UnreadCountResponse,
            },
            service::ConversationService,
        },
        message::{
            model::{GetMessageResponse, MessagePageQuery, SendMessageModel},
            schema::MessageEntity,
        },
    },
    utils::{ValidatedJson, ValidatedQuery},
};

/// Conversations the caller takes part in, filtered by side and archive flag.
#[get("")]
pub async fn list_conversations(
    conversation_svc: web::Data<ConversationService>,
    query: web::Query<ConversationQuery>,
    req: HttpRequest,
) -> Result<success::Success<Vec<ConversationResponse>>, error::Error> {
    let user_id = get_extensions::<AuthUser>(&req)?.id;
    let conversations = conversation_svc.list(user_id, query.into_inner()).await?;
    Ok(success::Success::ok(Some(conversations)).message("Successfully retrieved conversations"))
}

/// Open (or reopen) the caller's conversation about a listing.
#[post("")]
pub async fn start_conversation(
    conversation_svc: web::Data<ConversationService>,
    body: ValidatedJson<StartConversationModel>,
    req: HttpRequest,
) -> Result<success::Success<ConversationResponse>, error::Error> {
    let user_id = get_extensions::<AuthUser>(&req)?.id;
    let body = body.0;
    let (conversation, created) =
        conversation_svc.start(user_id, body.listing_id, body.message).await?;

    let response = if created {
        success::Success::created(Some(conversation)).message("Conversation created")
    } else {
        success::Success::ok(Some(conversation)).message("Conversation retrieved")
    };
    Ok(response)
}

#[get("/unread-count")]
pub async fn unread_count(
    conversation_svc: web::Data<ConversationService>,
    req: HttpRequest,
) -> Result<success::Success<UnreadCountResponse>, error::Error> {
    let user_id = get_extensions::<AuthUser>(&req)?.id;
    let unread_count = conversation_svc.unread_count(user_id).await?;
    Ok(success::Success::ok(Some(UnreadCountResponse { unread_count })))
}

#[get("/{conversation_id}")]
pub async fn get_conversation(
    conversation_svc: web::Data<ConversationService>,
    conversation_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<ConversationResponse>, error::Error> {
    let user_id = get_extensions::<AuthUser>(&req)?.id;
    let conversation = conversation_svc.get(user_id, *conversation_id).await?;
    Ok(success::Success::ok(Some(conversation)))
}

/// One page of messages, oldest first, plus the cursor for the page before it.
#[get("/{conversation_id}/messages")]
pub async fn get_messages(
    conversation_svc: web::Data<ConversationService>,
    conversation_id: web::Path<Uuid>,
    query: ValidatedQuery<MessagePageQuery>,
    req: HttpRequest,
) -> Result<success::Success<GetMessageResponse>, error::Error> {
    let user_id = get_extensions::<AuthUser>(&req)?.id;
    let query = query.0;
    let (messages, cursor) = conversation_svc
        .get_messages(user_id, *conversation_id, query.limit, query.cursor)
        .await?;
    Ok(success::Success::ok(Some(GetMessageResponse { messages, cursor }))
        .message("Successfully retrieved messages"))
}

#[post("/{conversation_id}/messages")]
pub async fn send_message(
    conversation_svc: web::Data<ConversationService>,
    conversation_id: web::Path<Uuid>,
    body: ValidatedJson<SendMessageModel>,
    req: HttpRequest,
) -> Result<success::Success<MessageEntity>, error::Error> {
    let user_id = get_extensions::<AuthUser>(&req)?.id;
    let message =
        conversation_svc.send_message(user_id, *conversation_id, body.0.content).await?;
    Ok(success::Success::created(Some(message)).message("Message sent"))
}

/// Mark everything the counterpart sent as read.
#[post("/{conversation_id}/read")]
pub async fn mark_read(
    conversation_svc: web::Data<ConversationService>,
    conversation_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<ConversationResponse>, error::Error> {
    let user_id = get_extensions::<AuthUser>(&req)?.id;
    let conversation = conversation_svc.mark_read(user_id, *conversation_id).await?;
    Ok(success::Success::ok(Some(conversation)).message("Conversation marked as read"))
}

#[post("/{conversation_id}/archive")]
pub async fn archive(
    conversation_svc: web::Data<ConversationService>,
    conversation_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<ConversationResponse>, error::Error> {
    let user_id = get_extensions::<AuthUser>(&req)?.id;
    let conversation = conversation_svc.set_archived(user_id, *conversation_id, true).await?;
    Ok(success::Success::ok(Some(conversation)).message("Conversation archived"))
}

#[post("/{conversation_id}/unarchive")]
pub async fn unarchive(
    conversation_svc: web::Data<ConversationService>,
    conversation_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<ConversationResponse>, error::Error> {
    let user_id = get_extensions::<AuthUser>(&req)?.id;
    let conversation = conversation_svc.set_archived(user_id, *conversation_id, false).await?;
    Ok(success::Success::ok(Some(conversation)).message("Conversation unarchived"))
}
