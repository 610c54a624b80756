use actix::Addr;
use actix_web::{get, web, Error, HttpRequest, HttpResponse};
use actix_ws::Message;
use tokio::sync::mpsc;
use uuid::Uuid;

use super::events::{ClientFrame, RealtimeEvent};
use super::hub::{Connect, Disconnect, RealtimeHub};
use crate::middlewares::{get_extensions, AuthUser};

/// Upgrades an authenticated request to a WebSocket subscribed to the caller's events.
#[get("/realtime")]
pub async fn subscribe(
    req: HttpRequest,
    stream: web::Payload,
    hub: web::Data<Addr<RealtimeHub>>,
) -> Result<HttpResponse, Error> {
    let user = get_extensions::<AuthUser>(&req)?;
    let (response, mut ws_session, mut msg_stream) = actix_ws::handle(&req, stream)?;

    let session_id = Uuid::new_v4();
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    hub.do_send(Connect { session_id, user_id: user.id, outbound: tx.clone() });

    let hub = hub.get_ref().clone();
    actix_web::rt::spawn(async move {
        loop {
            tokio::select! {
                msg = msg_stream.recv() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            match serde_json::from_str::<ClientFrame>(&text) {
                                Ok(ClientFrame::Ping) => {
                                    if let Ok(json) = serde_json::to_string(&RealtimeEvent::Pong) {
                                        let _ = tx.send(json);
                                    }
                                }
                                Err(e) => {
                                    tracing::warn!("Ignoring client frame: {}", e);
                                }
                            }
                        }
                        Some(Ok(Message::Ping(data))) => {
                            if ws_session.pong(&data).await.is_err() {
                                break;
                            }
                        }
                        Some(Ok(Message::Close(reason))) => {
                            tracing::debug!("WebSocket close frame: {:?}", reason);
                            break;
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            tracing::error!("WebSocket protocol error: {}", e);
                            break;
                        }
                        None => break,
                    }
                }

                Some(json) = rx.recv() => {
                    if ws_session.text(json).await.is_err() {
                        break;
                    }
                }
            }
        }

        hub.do_send(Disconnect { session_id });
        let _ = ws_session.close(None).await;
    });

    tracing::info!("Realtime session {} opened for user {}", session_id, user.id);
    Ok(response)
}
