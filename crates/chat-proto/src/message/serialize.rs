//! Line encoding.

use super::{LIST_SEPARATOR, Message, MessageKind, SEPARATOR};
use crate::error::{MalformedCause, ProtocolError, Result};
use std::fmt::Write as _;

impl Message {
    /// Encode this message as one line, without the trailing newline.
    ///
    /// Fails rather than producing a line that would decode to something
    /// else. No field may contain a line break and no leading field may
    /// contain `:`. `USER_LIST` names must be non-empty and free of `,`.
    /// `LOGIN`/`LOGOUT` names must be non-blank with no surrounding
    /// whitespace, since decoding trims them. An unknown message may not
    /// reuse a known tag.
    ///
    /// ```
    /// use chat_proto::Message;
    ///
    /// let line = Message::UserList(vec!["alice".into(), "bob".into()]).encode().unwrap();
    /// assert_eq!(line, "USER_LIST:alice,bob");
    /// assert!(Message::Private { target: "a:b".into(), body: "hi".into() }.encode().is_err());
    /// ```
    pub fn encode(&self) -> Result<String> {
        let tag = self.tag();
        if tag.trim().is_empty() {
            return Err(MalformedCause::BlankField { field: "tag" }.into());
        }
        if tag.contains(SEPARATOR) {
            return Err(ProtocolError::UnencodableField {
                field: "tag",
                ch: SEPARATOR,
            });
        }
        check_line("tag", tag)?;

        let mut out = String::with_capacity(64);
        out.push_str(tag);
        out.push(SEPARATOR);

        match self {
            Self::Login(name) | Self::Logout(name) => push_name(&mut out, name)?,
            Self::Broadcast(body) => push_last(&mut out, "body", body)?,
            Self::Relayed {
                timestamp,
                sender,
                body,
            } => {
                // Integers never contain the separator.
                let _ = write!(out, "{timestamp}{SEPARATOR}");
                push_leading(&mut out, "sender", sender)?;
                push_last(&mut out, "body", body)?;
            }
            Self::Private { target, body } => {
                push_leading(&mut out, "target", target)?;
                push_last(&mut out, "body", body)?;
            }
            Self::Whisper { sender, body } => {
                push_leading(&mut out, "sender", sender)?;
                push_last(&mut out, "body", body)?;
            }
            Self::UserList(names) => {
                for (i, name) in names.iter().enumerate() {
                    check_line("user list", name)?;
                    if name.is_empty() {
                        return Err(MalformedCause::BlankField { field: "user list" }.into());
                    }
                    if name.contains(LIST_SEPARATOR) {
                        return Err(ProtocolError::UnencodableField {
                            field: "user list",
                            ch: LIST_SEPARATOR,
                        });
                    }
                    if i > 0 {
                        out.push(LIST_SEPARATOR);
                    }
                    out.push_str(name);
                }
            }
            Self::Error(text) | Self::Success(text) | Self::SystemNotice(text) => {
                push_last(&mut out, "text", text)?
            }
            Self::UserJoined(name) | Self::UserLeft(name) => push_last(&mut out, "username", name)?,
            Self::Unknown { tag, payload } => {
                if MessageKind::from_tag(tag).is_some() {
                    return Err(ProtocolError::ReservedTag { tag: tag.clone() });
                }
                push_last(&mut out, "payload", payload)?
            }
        }

        Ok(out)
    }
}

fn check_line(field: &'static str, value: &str) -> Result<()> {
    match value.chars().find(|c| matches!(c, '\r' | '\n')) {
        Some(ch) => Err(ProtocolError::UnencodableField { field, ch }),
        None => Ok(()),
    }
}

/// A non-terminal field followed by a separator.
fn push_leading(out: &mut String, field: &'static str, value: &str) -> Result<()> {
    check_line(field, value)?;
    if value.contains(SEPARATOR) {
        return Err(ProtocolError::UnencodableField {
            field,
            ch: SEPARATOR,
        });
    }
    out.push_str(value);
    out.push(SEPARATOR);
    Ok(())
}

/// A `LOGIN`/`LOGOUT` name, which the decoder trims.
fn push_name(out: &mut String, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(MalformedCause::BlankField { field: "username" }.into());
    }
    let edge = name.chars().next().filter(|c| c.is_whitespace()).or_else(|| {
        name.chars().next_back().filter(|c| c.is_whitespace())
    });
    if let Some(ch) = edge {
        return Err(ProtocolError::UnencodableField {
            field: "username",
            ch,
        });
    }
    push_last(out, "username", name)
}

/// The terminal field, which may hold separators verbatim.
fn push_last(out: &mut String, field: &'static str, value: &str) -> Result<()> {
    check_line(field, value)?;
    out.push_str(value);
    Ok(())
}
