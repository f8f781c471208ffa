//! Session lifecycle handlers.
//!
//! Handles LOGIN and LOGOUT.

use super::core::context::unexpected;
use super::helpers::{fanout, validate_username};
use super::{Context, Handler};
use crate::error::{HandlerError, HandlerResult};
use async_trait::async_trait;
use chat_proto::Message;
use tracing::{debug, info};

/// Handler for LOGIN.
///
/// Claims the name in the registry before binding it to the session, so a
/// lost race leaves the session unauthenticated and the winner untouched.
pub struct LoginHandler;

#[async_trait]
impl Handler for LoginHandler {
    async fn handle(&self, ctx: &Context<'_>, msg: &Message) -> HandlerResult {
        let Message::Login(name) = msg else {
            return Err(unexpected("login", msg));
        };

        if ctx.session.is_authenticated() {
            return Err(HandlerError::AlreadyLoggedIn);
        }
        let name = name.trim();
        validate_username(name, ctx.limits.max_username_len)?;

        if !ctx.registry.try_register(name, ctx.session) {
            return Err(HandlerError::NameTaken(name.to_string()));
        }
        if !ctx.session.bind_username(name.to_string()) {
            ctx.registry.remove(name);
            return Err(HandlerError::AlreadyLoggedIn);
        }

        let online = ctx.registry.len();
        info!(username = %name, addr = %ctx.session.addr, online, "User logged in");

        // The name is registered now, so the others hear about the join even
        // if the replies to the new user cannot be queued.
        let replied = match ctx.reply(Message::Success("login ok".to_string())).await {
            Ok(()) => {
                ctx.reply(Message::SystemNotice(format!("{online} user(s) online")))
                    .await
            }
            Err(e) => Err(e),
        };

        fanout::broadcast(
            ctx.registry,
            Message::UserJoined(name.to_string()),
            Some(ctx.session.id),
        )
        .await;
        fanout::broadcast_user_list(ctx.registry).await;
        replied
    }
}

/// Handler for LOGOUT.
///
/// Always ends the connection; the close path does the bookkeeping.
pub struct LogoutHandler;

#[async_trait]
impl Handler for LogoutHandler {
    async fn handle(&self, ctx: &Context<'_>, msg: &Message) -> HandlerResult {
        let Message::Logout(name) = msg else {
            return Err(unexpected("logout", msg));
        };

        match ctx.session.username() {
            Some(current) if current != name => {
                debug!(current = %current, requested = %name, "Logout name mismatch");
            }
            Some(current) => info!(username = %current, "Logout requested"),
            None => debug!("Logout before login"),
        }
        Err(HandlerError::Quit)
    }
}
