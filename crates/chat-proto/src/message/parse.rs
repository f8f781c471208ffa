//! Line decoding.

use super::{Direction, LIST_SEPARATOR, Message, MessageKind, SEPARATOR};
use crate::error::{MalformedCause, ProtocolError, Result};

impl Message {
    /// Decode one line.
    ///
    /// A trailing `\r\n` or `\n` is ignored. Only the leading fixed fields of
    /// a message type are split; the final field is returned verbatim, so user
    /// text containing `:` survives intact.
    ///
    /// ```
    /// use chat_proto::{Direction, Message};
    ///
    /// let msg = Message::decode("PRIVATE:bob:meet at 10:30", Direction::Inbound).unwrap();
    /// assert_eq!(
    ///     msg,
    ///     Message::Private { target: "bob".into(), body: "meet at 10:30".into() }
    /// );
    /// ```
    pub fn decode(line: &str, direction: Direction) -> Result<Message> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return Err(MalformedCause::Empty.into());
        }

        let (tag, payload) = line
            .split_once(SEPARATOR)
            .ok_or(ProtocolError::from(MalformedCause::MissingSeparator))?;

        let Some(kind) = MessageKind::from_tag(tag) else {
            if tag.trim().is_empty() {
                return Err(MalformedCause::BlankField { field: "tag" }.into());
            }
            return Ok(Message::Unknown {
                tag: tag.to_string(),
                payload: payload.to_string(),
            });
        };

        let msg = match (kind, direction) {
            (MessageKind::Login, _) => Message::Login(required_name(payload)?),
            (MessageKind::Logout, _) => Message::Logout(required_name(payload)?),
            (MessageKind::Broadcast, Direction::Inbound) => Message::Broadcast(payload.to_string()),
            (MessageKind::Broadcast, Direction::Outbound) => {
                let [timestamp, sender, body] = fields::<3>(payload)?;
                let timestamp = timestamp
                    .parse()
                    .map_err(|_| ProtocolError::from(MalformedCause::InvalidTimestamp))?;
                Message::Relayed {
                    timestamp,
                    sender: sender.to_string(),
                    body: body.to_string(),
                }
            }
            (MessageKind::Private, Direction::Inbound) => {
                let [target, body] = fields::<2>(payload)?;
                Message::Private {
                    target: target.to_string(),
                    body: body.to_string(),
                }
            }
            (MessageKind::Private, Direction::Outbound) => {
                let [sender, body] = fields::<2>(payload)?;
                Message::Whisper {
                    sender: sender.to_string(),
                    body: body.to_string(),
                }
            }
            (MessageKind::UserList, _) => Message::UserList(
                payload
                    .split(LIST_SEPARATOR)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
            (MessageKind::Error, _) => Message::Error(payload.to_string()),
            (MessageKind::Success, _) => Message::Success(payload.to_string()),
            (MessageKind::SystemNotice, _) => Message::SystemNotice(payload.to_string()),
            (MessageKind::UserJoined, _) => Message::UserJoined(payload.to_string()),
            (MessageKind::UserLeft, _) => Message::UserLeft(payload.to_string()),
        };

        Ok(msg)
    }
}

/// A single name field: trimmed, must not be blank.
fn required_name(payload: &str) -> Result<String> {
    let name = payload.trim();
    if name.is_empty() {
        return Err(MalformedCause::BlankField { field: "username" }.into());
    }
    Ok(name.to_string())
}

/// Split `payload` into exactly `N` fields; the last one keeps any separators.
fn fields<const N: usize>(payload: &str) -> Result<[&str; N]> {
    let mut out = [""; N];
    let mut parts = payload.splitn(N, SEPARATOR);
    for slot in out.iter_mut() {
        *slot = parts
            .next()
            .ok_or(ProtocolError::from(MalformedCause::MissingFields { expected: N }))?;
    }
    Ok(out)
}
