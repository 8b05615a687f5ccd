//! The packet-type registry and the wire envelope.
//!
//! Every message on the wire is a [`Packet`]: an 8-bit type code plus an
//! optional JSON payload. The code packs three fields, MSB to LSB:
//!
//! ```text
//! ┌─────────────┬─────────────┬──────────────┐
//! │ 4-bit group │ payload bit │ 3-bit subtype│
//! └─────────────┴─────────────┴──────────────┘
//!   0x10..=0xF0      0x08          0x01..=0x07
//! ```
//!
//! [`PacketKind`] is the closed set of semantic kinds. Codes are built
//! additively (`group | HAS_PAYLOAD | subtype`) and decoded through a
//! lookup table that is collision-checked when it is first built — a
//! duplicate code is a programmer error and fails there, not per message.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

/// Mask of the 4-bit group field.
pub const GROUP_MASK: u8 = 0xF0;

/// Flag bit set on kinds that carry a payload.
pub const HAS_PAYLOAD: u8 = 0x08;

/// Mask of the 3-bit subtype field.
pub const SUBTYPE_MASK: u8 = 0x07;

// ---------------------------------------------------------------------------
// PacketGroup
// ---------------------------------------------------------------------------

/// The 4-bit group a packet kind belongs to.
///
/// Groups partition the code space by concern; a kind's subtype is only
/// unique within its group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PacketGroup {
    /// Connection-level chatter: ping/pong and connect results.
    Communication = 0x10,
    /// Lobby data and lobby data requests.
    Lobby = 0x20,
    /// Per-tick game-state broadcasts and readiness signals.
    GameState = 0x30,
    /// The bot's response actions, one per tick.
    PlayerResponseAction = 0x40,
    /// Match lifecycle status.
    GameStatus = 0x50,
    /// Server warnings about the bot's behavior.
    Warning = 0xE0,
    /// Reserved for server error packets. No kinds are registered in this
    /// group yet; codes in it decode as unknown.
    Error = 0xF0,
}

// ---------------------------------------------------------------------------
// PacketKind
// ---------------------------------------------------------------------------

/// The closed set of semantic packet kinds.
///
/// `group + payload flag + subtype` uniquely determines each kind; the
/// registry rejects any raw code outside this set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PacketKind {
    // -- Communication --
    /// Server → client keep-alive probe.
    Ping,
    /// Client → server keep-alive reply.
    Pong,
    /// Server → client: the join request was accepted.
    ConnectionAccepted,
    /// Server → client: the join request was refused. Payload: reason.
    ConnectionRejected,

    // -- Lobby --
    /// Server → client lobby snapshot. Payload: teams + server settings.
    LobbyData,
    /// Client → server request for a fresh lobby snapshot.
    LobbyDataRequest,

    // -- Game state --
    /// Server → client per-tick world snapshot. Payload: the full tick.
    GameState,
    /// Client → server: ready to start receiving game-state broadcasts.
    ReadyToReceiveGameState,

    // -- Player response actions (all carry a payload) --
    /// Move forward or backward.
    Movement,
    /// Rotate the hull and/or the turret.
    Rotation,
    /// Use one of the tank's abilities.
    AbilityUse,
    /// Capture the zone the tank is standing in.
    CaptureZone,
    /// Ask the server to path toward a target tile.
    GoTo,
    /// Explicitly do nothing this tick.
    Pass,

    // -- Game status --
    /// The match has not started yet.
    GameNotStarted,
    /// The match is about to start.
    GameStarting,
    /// The match just started.
    GameStarted,
    /// The match is running.
    GameInProgress,
    /// The match finished. Payload: final team scores.
    GameEnded,
    /// Client → server request for the current status.
    GameStatusRequest,

    // -- Warnings --
    /// Free-form warning text from the server. Payload: message.
    CustomWarning,
    /// The bot already responded to this tick.
    PlayerAlreadyMadeAction,
    /// The bot's action was ignored because its tank is dead.
    ActionIgnoredDueToDead,
    /// The bot's response arrived after the tick deadline.
    SlowResponse,
}

impl PacketKind {
    /// Every registered kind, in code order. Drives the registry table and
    /// the exhaustive uniqueness test.
    pub const ALL: [PacketKind; 24] = [
        Self::Ping,
        Self::Pong,
        Self::ConnectionAccepted,
        Self::ConnectionRejected,
        Self::LobbyData,
        Self::LobbyDataRequest,
        Self::GameState,
        Self::ReadyToReceiveGameState,
        Self::Movement,
        Self::Rotation,
        Self::AbilityUse,
        Self::CaptureZone,
        Self::GoTo,
        Self::Pass,
        Self::GameNotStarted,
        Self::GameStarting,
        Self::GameStarted,
        Self::GameInProgress,
        Self::GameEnded,
        Self::GameStatusRequest,
        Self::CustomWarning,
        Self::PlayerAlreadyMadeAction,
        Self::ActionIgnoredDueToDead,
        Self::SlowResponse,
    ];

    /// The group this kind belongs to.
    pub const fn group(self) -> PacketGroup {
        match self {
            Self::Ping
            | Self::Pong
            | Self::ConnectionAccepted
            | Self::ConnectionRejected => PacketGroup::Communication,
            Self::LobbyData | Self::LobbyDataRequest => PacketGroup::Lobby,
            Self::GameState | Self::ReadyToReceiveGameState => {
                PacketGroup::GameState
            }
            Self::Movement
            | Self::Rotation
            | Self::AbilityUse
            | Self::CaptureZone
            | Self::GoTo
            | Self::Pass => PacketGroup::PlayerResponseAction,
            Self::GameNotStarted
            | Self::GameStarting
            | Self::GameStarted
            | Self::GameInProgress
            | Self::GameEnded
            | Self::GameStatusRequest => PacketGroup::GameStatus,
            Self::CustomWarning
            | Self::PlayerAlreadyMadeAction
            | Self::ActionIgnoredDueToDead
            | Self::SlowResponse => PacketGroup::Warning,
        }
    }

    /// Whether this kind carries a payload (the 5th bit of its code).
    pub const fn has_payload(self) -> bool {
        matches!(
            self,
            Self::ConnectionRejected
                | Self::LobbyData
                | Self::GameState
                | Self::Movement
                | Self::Rotation
                | Self::AbilityUse
                | Self::CaptureZone
                | Self::GoTo
                | Self::Pass
                | Self::GameEnded
                | Self::CustomWarning
        )
    }

    /// The 3-bit subtype, unique within the kind's group.
    pub const fn subtype(self) -> u8 {
        match self {
            Self::Ping => 0x1,
            Self::Pong => 0x2,
            Self::ConnectionAccepted => 0x3,
            Self::ConnectionRejected => 0x4,

            Self::LobbyData => 0x1,
            Self::LobbyDataRequest => 0x2,

            Self::GameState => 0x2,
            Self::ReadyToReceiveGameState => 0x5,

            Self::Movement => 0x1,
            Self::Rotation => 0x2,
            Self::AbilityUse => 0x3,
            Self::CaptureZone => 0x4,
            Self::GoTo => 0x6,
            Self::Pass => 0x7,

            Self::GameNotStarted => 0x1,
            Self::GameStarting => 0x2,
            Self::GameStarted => 0x3,
            Self::GameInProgress => 0x4,
            Self::GameEnded => 0x5,
            Self::GameStatusRequest => 0x7,

            Self::CustomWarning => 0x1,
            Self::PlayerAlreadyMadeAction => 0x2,
            Self::ActionIgnoredDueToDead => 0x3,
            Self::SlowResponse => 0x4,
        }
    }

    /// The canonical 8-bit code, built additively from the three fields.
    pub const fn code(self) -> u8 {
        let payload_bit = if self.has_payload() { HAS_PAYLOAD } else { 0 };
        self.group() as u8 | payload_bit | self.subtype()
    }

    /// Classifies a raw 8-bit code into its registered kind.
    ///
    /// # Errors
    /// Returns [`ProtocolError::UnknownPacketType`] for any code outside
    /// the registry.
    pub fn from_code(code: u8) -> Result<Self, ProtocolError> {
        CODE_TABLE
            .get(&code)
            .copied()
            .ok_or(ProtocolError::UnknownPacketType { code })
    }
}

/// Code → kind lookup table, built once and collision-checked.
///
/// The check runs at table construction (first use), so a code collision
/// introduced by a future variant fails immediately rather than corrupting
/// per-message classification.
static CODE_TABLE: LazyLock<HashMap<u8, PacketKind>> = LazyLock::new(|| {
    let mut table = HashMap::with_capacity(PacketKind::ALL.len());
    for kind in PacketKind::ALL {
        if let Some(previous) = table.insert(kind.code(), kind) {
            panic!(
                "packet code {:#04x} registered for both {previous:?} and {kind:?}",
                kind.code(),
            );
        }
    }
    table
});

// ---------------------------------------------------------------------------
// Packet — the wire envelope
// ---------------------------------------------------------------------------

/// The top-level wire message: a packet-type code plus an optional payload.
///
/// On the wire this is a JSON object; a ping is `{"type": 17}` and a
/// game state is `{"type": 58, "payload": {...}}`. The `payload` key is
/// omitted entirely for kinds without one.
///
/// The payload is kept as an untyped JSON tree here; interpreting it is
/// the payload parser's job, and only after the code has been classified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Packet {
    /// The raw 8-bit packet-type code.
    #[serde(rename = "type")]
    pub packet_type: u8,

    /// The untyped payload tree, if the packet carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
}

impl Packet {
    /// Builds a payload-less packet for the given kind.
    pub fn new(kind: PacketKind) -> Self {
        Self {
            packet_type: kind.code(),
            payload: None,
        }
    }

    /// Builds a packet carrying the given payload.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Encode`] if the payload fails to serialize.
    pub fn with_payload<T: Serialize>(
        kind: PacketKind,
        payload: &T,
    ) -> Result<Self, ProtocolError> {
        Ok(Self {
            packet_type: kind.code(),
            payload: Some(
                serde_json::to_value(payload).map_err(ProtocolError::Encode)?,
            ),
        })
    }

    /// Classifies this packet's raw code.
    ///
    /// # Errors
    /// Returns [`ProtocolError::UnknownPacketType`] for unregistered codes.
    pub fn kind(&self) -> Result<PacketKind, ProtocolError> {
        PacketKind::from_code(self.packet_type)
    }

    /// Takes the payload out, failing if the kind requires one and it is
    /// absent.
    ///
    /// # Errors
    /// Returns [`ProtocolError::MissingPayload`] when `kind.has_payload()`
    /// but no payload arrived.
    pub fn take_payload(
        &mut self,
        kind: PacketKind,
    ) -> Result<serde_json::Value, ProtocolError> {
        self.payload
            .take()
            .ok_or(ProtocolError::MissingPayload { kind })
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_round_trips_for_every_kind() {
        // Decoding a kind's canonical code must yield the kind back.
        for kind in PacketKind::ALL {
            assert_eq!(PacketKind::from_code(kind.code()).unwrap(), kind);
        }
    }

    #[test]
    fn test_no_two_kinds_share_a_code() {
        let mut seen = std::collections::HashMap::new();
        for kind in PacketKind::ALL {
            if let Some(other) = seen.insert(kind.code(), kind) {
                panic!("{kind:?} and {other:?} share code {:#04x}", kind.code());
            }
        }
        assert_eq!(seen.len(), PacketKind::ALL.len());
    }

    #[test]
    fn test_code_fields_recompose_additively() {
        // group | payload flag | subtype must reconstruct the code exactly.
        for kind in PacketKind::ALL {
            let flag = if kind.has_payload() { HAS_PAYLOAD } else { 0 };
            assert_eq!(kind.code(), kind.group() as u8 | flag | kind.subtype());
            assert_eq!(kind.code() & GROUP_MASK, kind.group() as u8);
            assert_eq!(kind.code() & HAS_PAYLOAD != 0, kind.has_payload());
            assert_eq!(kind.code() & SUBTYPE_MASK, kind.subtype());
        }
    }

    #[test]
    fn test_known_codes_match_the_published_table() {
        // Spot checks against the server's published code table.
        assert_eq!(PacketKind::Ping.code(), 0x11);
        assert_eq!(PacketKind::ConnectionRejected.code(), 0x1C);
        assert_eq!(PacketKind::LobbyData.code(), 0x29);
        assert_eq!(PacketKind::GameState.code(), 0x3A);
        assert_eq!(PacketKind::ReadyToReceiveGameState.code(), 0x35);
        assert_eq!(PacketKind::Movement.code(), 0x49);
        assert_eq!(PacketKind::GoTo.code(), 0x4E);
        assert_eq!(PacketKind::Pass.code(), 0x4F);
        assert_eq!(PacketKind::GameEnded.code(), 0x5D);
        assert_eq!(PacketKind::CustomWarning.code(), 0xE9);
    }

    #[test]
    fn test_unknown_codes_are_rejected() {
        for code in [0x00, 0x08, 0x15, 0x4D, 0xF1, 0xFF] {
            assert!(matches!(
                PacketKind::from_code(code),
                Err(ProtocolError::UnknownPacketType { code: c }) if c == code
            ));
        }
    }

    #[test]
    fn test_subtypes_fit_in_three_bits() {
        for kind in PacketKind::ALL {
            assert!(kind.subtype() <= SUBTYPE_MASK, "{kind:?}");
            assert!(kind.subtype() > 0, "{kind:?}");
        }
    }

    #[test]
    fn test_envelope_omits_absent_payload() {
        let json = serde_json::to_value(Packet::new(PacketKind::Pong)).unwrap();
        assert_eq!(json, serde_json::json!({ "type": 0x12 }));
    }

    #[test]
    fn test_envelope_round_trips_with_payload() {
        let packet = Packet::with_payload(
            PacketKind::CustomWarning,
            &"low on fuel".to_string(),
        )
        .unwrap();
        let bytes = serde_json::to_vec(&packet).unwrap();
        let decoded: Packet = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(decoded, packet);
        assert_eq!(decoded.kind().unwrap(), PacketKind::CustomWarning);
    }

    #[test]
    fn test_envelope_accepts_null_payload() {
        // Some servers send an explicit null instead of omitting the key.
        let packet: Packet =
            serde_json::from_str(r#"{"type": 17, "payload": null}"#).unwrap();
        assert_eq!(packet.kind().unwrap(), PacketKind::Ping);
        assert!(packet.payload.is_none());
    }

    #[test]
    fn test_take_payload_fails_when_required_and_absent() {
        let mut packet = Packet::new(PacketKind::GameState);
        assert!(matches!(
            packet.take_payload(PacketKind::GameState),
            Err(ProtocolError::MissingPayload { kind: PacketKind::GameState })
        ));
    }
}
