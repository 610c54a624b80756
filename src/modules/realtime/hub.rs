use actix::prelude::*;
use std::collections::{HashMap, HashSet};
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

use super::events::RealtimeEvent;

#[derive(Message)]
#[rtype(result = "()")]
pub struct Connect {
    pub session_id: Uuid,
    pub user_id: Uuid,
    pub outbound: UnboundedSender<String>,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct Disconnect {
    pub session_id: Uuid,
}

#[derive(Message, Clone)]
#[rtype(result = "()")]
pub struct SendToUsers {
    pub user_ids: Vec<Uuid>,
    pub event: RealtimeEvent,
}

#[cfg(test)]
#[derive(Message)]
#[rtype(result = "usize")]
pub struct SessionCount {
    pub user_id: Uuid,
}

struct Session {
    user_id: Uuid,
    outbound: UnboundedSender<String>,
}

/// Tracks open sessions per user. A user may be connected from several devices.
#[derive(Default)]
pub struct RealtimeHub {
    sessions: HashMap<Uuid, Session>,
    users: HashMap<Uuid, HashSet<Uuid>>,
}

impl RealtimeHub {
    pub fn new() -> Self {
        Self::default()
    }

    fn drop_session(&mut self, session_id: &Uuid) {
        let Some(session) = self.sessions.remove(session_id) else {
            return;
        };
        if let Some(ids) = self.users.get_mut(&session.user_id) {
            ids.remove(session_id);
            if ids.is_empty() {
                self.users.remove(&session.user_id);
                tracing::debug!("User {} has no open sessions", session.user_id);
            }
        }
    }
}

impl Actor for RealtimeHub {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        tracing::info!("Realtime hub started");
    }
}

impl Handler<Connect> for RealtimeHub {
    type Result = ();

    fn handle(&mut self, msg: Connect, _: &mut Context<Self>) {
        self.users.entry(msg.user_id).or_default().insert(msg.session_id);
        self.sessions
            .insert(msg.session_id, Session { user_id: msg.user_id, outbound: msg.outbound });
        tracing::debug!("Session {} connected for user {}", msg.session_id, msg.user_id);
    }
}

impl Handler<Disconnect> for RealtimeHub {
    type Result = ();

    fn handle(&mut self, msg: Disconnect, _: &mut Context<Self>) {
        self.drop_session(&msg.session_id);
        tracing::debug!("Session {} disconnected", msg.session_id);
    }
}

impl Handler<SendToUsers> for RealtimeHub {
    type Result = ();

    fn handle(&mut self, msg: SendToUsers, _: &mut Context<Self>) {
        let payload = match serde_json::to_string(&msg.event) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Failed to serialize realtime event: {}", e);
                return;
            }
        };

        let mut recipients: Vec<Uuid> = msg.user_ids;
        recipients.sort_unstable();
        recipients.dedup();

        let mut closed = Vec::new();
        for user_id in &recipients {
            let Some(session_ids) = self.users.get(user_id) else {
                continue;
            };
            for session_id in session_ids {
                if let Some(session) = self.sessions.get(session_id) {
                    if session.outbound.send(payload.clone()).is_err() {
                        closed.push(*session_id);
                    }
                }
            }
        }

        for session_id in closed {
            self.drop_session(&session_id);
        }
    }
}

#[cfg(test)]
impl Handler<SessionCount> for RealtimeHub {
    type Result = usize;

    fn handle(&mut self, msg: SessionCount, _: &mut Context<Self>) -> usize {
        self.users.get(&msg.user_id).map_or(0, HashSet::len)
    }
}
