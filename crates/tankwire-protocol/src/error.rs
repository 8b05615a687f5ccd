//! Error types for the protocol layer.
//!
//! Every failure here is local to a single wire message: the session loop
//! decides whether to drop the message, re-request, or disconnect. The
//! protocol layer itself never retries and never substitutes defaults for
//! required fields.

use crate::packet::PacketKind;

/// Errors that can occur while classifying packets or decoding payloads.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// An inbound packet-type code does not decode to any registered kind.
    ///
    /// Fatal for the message: without a kind there is no way to know the
    /// payload shape, so the payload cannot be safely interpreted.
    #[error("unknown packet type code {code:#04x}")]
    UnknownPacketType {
        /// The raw 8-bit code as received.
        code: u8,
    },

    /// A tile-object type tag has no registered entity decoder.
    ///
    /// Fatal for the whole tick: silently omitting a wall or a tank would
    /// corrupt every navigation and combat decision made from that snapshot.
    #[error("unknown tile entity tag `{tag}`")]
    UnknownTileEntity {
        /// The wire type tag that failed to resolve.
        tag: String,
    },

    /// The payload does not match the shape its packet kind requires —
    /// a missing field, a wrong type, or a malformed subtree.
    ///
    /// The inner `serde_json::Error` carries the offending field path,
    /// which is enough to reproduce the failure from a captured message.
    #[error("malformed {kind:?} payload: {source}")]
    MalformedPayload {
        /// The packet kind whose payload failed to parse.
        kind: PacketKind,
        /// The underlying deserialization error.
        #[source]
        source: serde_json::Error,
    },

    /// A packet whose kind sets the has-payload flag arrived without one.
    #[error("{kind:?} packet is missing its payload")]
    MissingPayload {
        /// The packet kind that requires a payload.
        kind: PacketKind,
    },

    /// Serializing an outbound packet failed.
    #[error("encode failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// Deserializing an inbound packet envelope failed.
    #[error("decode failed: {0}")]
    Decode(#[source] serde_json::Error),
}

impl ProtocolError {
    /// Wraps a serde error as a [`ProtocolError::MalformedPayload`] for
    /// the given packet kind.
    pub(crate) fn malformed(kind: PacketKind, source: serde_json::Error) -> Self {
        Self::MalformedPayload { kind, source }
    }
}
