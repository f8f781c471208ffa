//! Chat traffic handlers.
//!
//! Handles BROADCAST and PRIVATE.

use super::core::context::unexpected;
use super::helpers::fanout;
use super::{Context, Handler};
use crate::error::{HandlerError, HandlerResult};
use async_trait::async_trait;
use chat_proto::Message;
use chrono::Utc;
use tracing::debug;

/// Handler for BROADCAST.
///
/// The server re-renders the message with sender and timestamp and delivers
/// it to every online user, the sender included.
pub struct BroadcastHandler;

#[async_trait]
impl Handler for BroadcastHandler {
    async fn handle(&self, ctx: &Context<'_>, msg: &Message) -> HandlerResult {
        let Message::Broadcast(body) = msg else {
            return Err(unexpected("broadcast", msg));
        };

        let sender = ctx.username()?;
        if body.trim().is_empty() {
            return Err(HandlerError::EmptyMessage);
        }

        let relayed = Message::Relayed {
            timestamp: Utc::now().timestamp_millis(),
            sender: sender.to_string(),
            body: body.clone(),
        };
        let delivered = fanout::broadcast(ctx.registry, relayed, None).await;
        debug!(sender = %sender, delivered, "Broadcast delivered");
        Ok(())
    }
}

/// Handler for PRIVATE.
///
/// Delivery is attempted once; an absent target is reported to the sender
/// and the message is dropped.
pub struct PrivateHandler;

#[async_trait]
impl Handler for PrivateHandler {
    async fn handle(&self, ctx: &Context<'_>, msg: &Message) -> HandlerResult {
        let Message::Private { target, body } = msg else {
            return Err(unexpected("private", msg));
        };

        let sender = ctx.username()?;
        let target = target.trim();
        if target.is_empty() {
            return Err(HandlerError::EmptyTarget);
        }
        if body.trim().is_empty() {
            return Err(HandlerError::EmptyMessage);
        }

        let Some(recipient) = ctx.registry.lookup(target) else {
            return Err(HandlerError::UserOffline(target.to_string()));
        };

        let whisper = Message::Whisper {
            sender: sender.to_string(),
            body: body.clone(),
        };
        if let Err(e) = recipient.send(whisper).await {
            debug!(target = %target, error = %e, "Private delivery failed");
            return Err(HandlerError::UserOffline(target.to_string()));
        }

        ctx.reply(Message::Success(format!("private message sent to {target}")))
            .await
    }
}
