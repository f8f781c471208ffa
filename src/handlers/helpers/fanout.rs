//! Fan-out delivery to many sessions.
//!
//! One logical message is shared behind an `Arc` and queued on every target
//! concurrently. A recipient that is gone or too slow is logged and skipped;
//! it never stops delivery to the others.

use crate::state::{SessionId, SessionRegistry};
use chat_proto::Message;
use futures_util::future::join_all;
use std::sync::Arc;
use tracing::warn;

/// Deliver `msg` to every online session except `skip`.
///
/// Sessions already on their close path are passed over.
///
/// Returns the number of sessions it was queued on.
pub async fn broadcast(registry: &SessionRegistry, msg: Message, skip: Option<SessionId>) -> usize {
    let msg = Arc::new(msg);
    let targets: Vec<_> = registry
        .sessions()
        .into_iter()
        .filter(|session| Some(session.id) != skip && !session.is_closed())
        .collect();

    let results = join_all(
        targets
            .iter()
            .map(|session| session.deliver(Arc::clone(&msg))),
    )
    .await;

    let mut delivered = 0;
    for (session, result) in targets.iter().zip(results) {
        match result {
            Ok(()) => delivered += 1,
            Err(e) => warn!(
                session = session.id,
                username = session.username(),
                kind = %msg.tag(),
                error = %e,
                "Delivery failed"
            ),
        }
    }
    delivered
}

/// Send a fresh `USER_LIST` snapshot to everyone online.
pub async fn broadcast_user_list(registry: &SessionRegistry) -> usize {
    broadcast(registry, Message::UserList(registry.snapshot()), None).await
}
