//! Reference message schema with hand-written codec impls.
//!
//! The runtime treats per-type codec derivation as an external
//! collaborator: a derive macro or generator receives a record's field
//! list (name, type, order) or a union's case list and produces the
//! `Encode`/`Decode` impls. The impls in this module are written by hand
//! in exactly the shape that layer generates, so every integration test
//! and fuzz target exercises the runtime through realistic generated
//! code rather than through ad-hoc byte poking.
//!
//! `ClientActionV1` deliberately lags `ClientAction` by one case: it is
//! the "older reader" in the forward-compatibility tests, the decoder
//! whose type definition was frozen before `Reacted` was appended.

use vellum_wire::tagged::{decode_frozen, decode_open, encode_case};
use vellum_wire::{ByteCursor, ByteSink, Decode, Encode, Result, WireError};

/// Something a client did during a session. Open union: markers are
/// declaration-order indices, and new cases may be appended (never
/// inserted, reordered, or removed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientAction {
    /// Client joined the session (marker 0, no associated values)
    Joined,
    /// Client changed display name (marker 1)
    Renamed(String),
    /// Client reacted to a message (marker 2): emoji, message index
    Reacted(String, u64),
    /// Decode-side fallback for a marker this reader does not know.
    /// Never encoded: a value holding `Unknown` cannot be re-serialized
    /// because the original case's payload was skipped, not captured.
    Unknown,
}

impl Encode for ClientAction {
    fn encode(&self, sink: &mut ByteSink<'_>) -> Result<()> {
        match self {
            Self::Joined => encode_case(sink, 0, |_| Ok(())),
            Self::Renamed(name) => encode_case(sink, 1, |body| name.encode(body)),
            Self::Reacted(emoji, message_index) => encode_case(sink, 2, |body| {
                emoji.encode(body)?;
                message_index.encode(body)
            }),
            Self::Unknown => Err(WireError::UnknownValue { value: u64::from(u16::MAX) }),
        }
    }
}

impl Decode for ClientAction {
    fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        decode_open(
            cursor,
            |marker, body| match marker {
                0 => Ok(Some(Self::Joined)),
                1 => Ok(Some(Self::Renamed(String::decode(body)?))),
                2 => Ok(Some(Self::Reacted(String::decode(body)?, u64::decode(body)?))),
                _ => Ok(None),
            },
            || Self::Unknown,
        )
    }
}

/// The same union as [`ClientAction`], as an older reader knew it:
/// its definition was fixed before `Reacted` existed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientActionV1 {
    /// Marker 0
    Joined,
    /// Marker 1
    Renamed(String),
    /// Fallback for markers appended after this definition was fixed
    Unknown,
}

impl Decode for ClientActionV1 {
    fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        decode_open(
            cursor,
            |marker, body| match marker {
                0 => Ok(Some(Self::Joined)),
                1 => Ok(Some(Self::Renamed(String::decode(body)?))),
                _ => Ok(None),
            },
            || Self::Unknown,
        )
    }
}

/// Which path a client's traffic takes. Frozen union: the case set is
/// closed, an unrecognized marker rejects the decode outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Channel {
    /// Marker 0: direct connection
    Direct,
    /// Marker 1: relayed through the named hub
    Relayed(String),
}

impl Encode for Channel {
    fn encode(&self, sink: &mut ByteSink<'_>) -> Result<()> {
        match self {
            Self::Direct => encode_case(sink, 0, |_| Ok(())),
            Self::Relayed(hub) => encode_case(sink, 1, |body| hub.encode(body)),
        }
    }
}

impl Decode for Channel {
    fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        decode_frozen(cursor, |marker, body| match marker {
            0 => Ok(Some(Self::Direct)),
            1 => Ok(Some(Self::Relayed(String::decode(body)?))),
            _ => Ok(None),
        })
    }
}

/// A client's session profile: the record codec is field concatenation
/// in declaration order, nothing more.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientProfile {
    /// Client app version
    pub app_version: u32,
    /// Display name
    pub username: String,
    /// Everything the client did, in order
    pub actions: Vec<ClientAction>,
}

impl Encode for ClientProfile {
    fn encode(&self, sink: &mut ByteSink<'_>) -> Result<()> {
        self.app_version.encode(sink)?;
        self.username.encode(sink)?;
        self.actions.encode(sink)
    }
}

impl Decode for ClientProfile {
    fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let app_version = u32::decode(cursor)?;
        let username = String::decode(cursor)?;
        let actions = Vec::decode(cursor)?;
        Ok(Self { app_version, username, actions })
    }
}

/// [`ClientProfile`] as the older reader sees it, paired with
/// [`ClientActionV1`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientProfileV1 {
    /// Client app version
    pub app_version: u32,
    /// Display name
    pub username: String,
    /// Actions, with unrecognized ones collapsed to `Unknown`
    pub actions: Vec<ClientActionV1>,
}

impl Decode for ClientProfileV1 {
    fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let app_version = u32::decode(cursor)?;
        let username = String::decode(cursor)?;
        let actions = Vec::decode(cursor)?;
        Ok(Self { app_version, username, actions })
    }
}
