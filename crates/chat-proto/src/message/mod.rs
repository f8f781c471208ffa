//! Chat message types.
//!
//! Every message is a single line: a type tag, a `:` separator, then a fixed
//! number of fields. Only the last field may contain `:` verbatim.
//!
//! The same tag can carry different shapes depending on who wrote the line:
//!
//! | Tag         | Inbound (client → server) | Outbound (server → client)        |
//! |-------------|---------------------------|-----------------------------------|
//! | `BROADCAST` | `BROADCAST:<body>`        | `BROADCAST:<ts>:<sender>:<body>`  |
//! | `PRIVATE`   | `PRIVATE:<target>:<body>` | `PRIVATE:<sender>:<body>`         |
//!
//! so decoding takes a [`Direction`].

mod parse;
mod serialize;

/// Field separator.
pub const SEPARATOR: char = ':';

/// Separator between names inside a `USER_LIST` payload.
pub const LIST_SEPARATOR: char = ',';

/// Which side authored a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Written by a client, read by the server.
    Inbound,
    /// Written by the server, read by a client.
    Outbound,
}

/// The known message type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MessageKind {
    /// `LOGIN`
    Login,
    /// `LOGOUT`
    Logout,
    /// `BROADCAST`
    Broadcast,
    /// `PRIVATE`
    Private,
    /// `USER_LIST`
    UserList,
    /// `ERROR`
    Error,
    /// `SUCCESS`
    Success,
    /// `SYSTEM_NOTIFICATION`
    SystemNotice,
    /// `USER_JOINED`
    UserJoined,
    /// `USER_LEFT`
    UserLeft,
}

impl MessageKind {
    /// All known kinds, in tag order.
    pub const ALL: [MessageKind; 10] = [
        MessageKind::Login,
        MessageKind::Logout,
        MessageKind::Broadcast,
        MessageKind::Private,
        MessageKind::UserList,
        MessageKind::Error,
        MessageKind::Success,
        MessageKind::SystemNotice,
        MessageKind::UserJoined,
        MessageKind::UserLeft,
    ];

    /// The wire tag.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Login => "LOGIN",
            Self::Logout => "LOGOUT",
            Self::Broadcast => "BROADCAST",
            Self::Private => "PRIVATE",
            Self::UserList => "USER_LIST",
            Self::Error => "ERROR",
            Self::Success => "SUCCESS",
            Self::SystemNotice => "SYSTEM_NOTIFICATION",
            Self::UserJoined => "USER_JOINED",
            Self::UserLeft => "USER_LEFT",
        }
    }

    /// Look up a kind by its wire tag. Tags are case-sensitive.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }
}

/// A decoded protocol message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// `LOGIN:<username>`
    Login(String),
    /// `LOGOUT:<username>`
    Logout(String),
    /// `BROADCAST:<body>` as sent by a client.
    Broadcast(String),
    /// `BROADCAST:<timestamp>:<sender>:<body>` as relayed by the server.
    ///
    /// `timestamp` is Unix epoch milliseconds.
    Relayed {
        /// Server receive time.
        timestamp: i64,
        /// Username of the author.
        sender: String,
        /// Message text, may contain `:`.
        body: String,
    },
    /// `PRIVATE:<target>:<body>` as sent by a client.
    Private {
        /// Username of the recipient.
        target: String,
        /// Message text, may contain `:`.
        body: String,
    },
    /// `PRIVATE:<sender>:<body>` as delivered to the target.
    Whisper {
        /// Username of the author.
        sender: String,
        /// Message text, may contain `:`.
        body: String,
    },
    /// `USER_LIST:<name>,<name>,...`
    UserList(Vec<String>),
    /// `ERROR:<text>`
    Error(String),
    /// `SUCCESS:<text>`
    Success(String),
    /// `SYSTEM_NOTIFICATION:<text>`
    SystemNotice(String),
    /// `USER_JOINED:<name>`
    UserJoined(String),
    /// `USER_LEFT:<name>`
    UserLeft(String),
    /// A line with an unrecognized tag, kept opaque for forward compatibility.
    Unknown {
        /// The unrecognized tag.
        tag: String,
        /// Everything after the first separator.
        payload: String,
    },
}

impl Message {
    /// The known kind of this message, or `None` for [`Message::Unknown`].
    pub fn kind(&self) -> Option<MessageKind> {
        let kind = match self {
            Self::Login(_) => MessageKind::Login,
            Self::Logout(_) => MessageKind::Logout,
            Self::Broadcast(_) | Self::Relayed { .. } => MessageKind::Broadcast,
            Self::Private { .. } | Self::Whisper { .. } => MessageKind::Private,
            Self::UserList(_) => MessageKind::UserList,
            Self::Error(_) => MessageKind::Error,
            Self::Success(_) => MessageKind::Success,
            Self::SystemNotice(_) => MessageKind::SystemNotice,
            Self::UserJoined(_) => MessageKind::UserJoined,
            Self::UserLeft(_) => MessageKind::UserLeft,
            Self::Unknown { .. } => return None,
        };
        Some(kind)
    }

    /// The wire tag of this message.
    pub fn tag(&self) -> &str {
        match self {
            Self::Unknown { tag, .. } => tag,
            other => other.kind().map_or("", MessageKind::tag),
        }
    }

    /// The direction in which this variant travels.
    ///
    /// Unknown messages are treated as inbound; they decode the same way in
    /// both directions.
    pub fn direction(&self) -> Direction {
        match self {
            Self::Login(_)
            | Self::Logout(_)
            | Self::Broadcast(_)
            | Self::Private { .. }
            | Self::Unknown { .. } => Direction::Inbound,
            _ => Direction::Outbound,
        }
    }
}
