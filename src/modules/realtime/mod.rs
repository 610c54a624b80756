//! Change feed pushed to participants over WebSocket.
//!
//! Services publish through the [`Broadcaster`] seam; in production that is the
//! address of the [`hub::RealtimeHub`] actor, which fans events out to every
//! session a user has open.
pub mod events;
pub mod handler;
pub mod hub;

use uuid::Uuid;

pub use events::RealtimeEvent;

pub trait Broadcaster: Send + Sync {
    fn publish(&self, recipients: &[Uuid], event: RealtimeEvent);
}

impl Broadcaster for actix::Addr<hub::RealtimeHub> {
    fn publish(&self, recipients: &[Uuid], event: RealtimeEvent) {
        self.do_send(hub::SendToUsers { user_ids: recipients.to_vec(), event });
    }
}
