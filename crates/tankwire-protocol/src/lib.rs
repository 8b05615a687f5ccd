//! Wire protocol for Tankwire.
//!
//! This crate defines the "language" spoken between a bot and the game
//! server:
//!
//! - **Packet registry** ([`PacketKind`], [`Packet`]) — the closed set of
//!   message kinds, their bit-packed 8-bit codes, and the wire envelope.
//! - **Raw payloads** ([`GameStatePayload`], [`LobbyDataPayload`], the
//!   `Raw*` records) — wire-shaped records parsed from the untyped JSON
//!   trees that packets carry, including the tag-dispatched tile entities.
//! - **Outbound payloads** ([`ResponseActionPayload`] and friends) — the
//!   exact shapes the server expects for a bot's per-tick response.
//! - **Codec** ([`Codec`], [`JsonCodec`]) — envelope ↔ bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong while decoding.
//!
//! # Architecture
//!
//! The protocol layer sits between the transport (raw frames) and the
//! domain model (typed snapshots). It knows nothing about sockets or
//! game rules — only codes, shapes, and how to fail precisely:
//!
//! ```text
//! Transport (bytes) → Packet (code + JSON tree) → Raw records → model
//! ```
//!
//! Raw records deliberately stay wire-shaped (integer codes, camelCase
//! names, explicit `Option`s). Enum coercion, coordinate transposition,
//! and zone attachment all happen one layer up, in `tankwire-model`.

mod codec;
mod error;
mod packet;
mod payload;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use packet::{
    Packet, PacketGroup, PacketKind, GROUP_MASK, HAS_PAYLOAD, SUBTYPE_MASK,
};
pub use payload::{
    custom_warning_from_value, AbilityUsePayload, CaptureZonePayload,
    ConnectionRejectedPayload, GameEndPayload, GameStatePayload, GoToCosts,
    GoToPayload, GoToPenalties, LobbyDataPayload, MovementPayload,
    PassPayload, RawBullet, RawLaser, RawMap, RawMine, RawPlayer, RawTank,
    RawTeam, RawTileEntity, RawTileObject, RawTurret, RawWall, RawZone,
    ResponseActionPayload, RotationPayload, ServerSettings, TilePenalty,
};
