//! Codec trait and implementations for the wire envelope.
//!
//! The session loop doesn't care how envelopes become bytes — it goes
//! through the [`Codec`] trait. [`JsonCodec`] is the format the game
//! server actually speaks; the trait seam exists so tests can substitute
//! a recording codec and a future binary format can slot in unchanged.

use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// Encodes values to bytes and decodes bytes back.
///
/// `Send + Sync + 'static` because the codec is shared with the session
/// task; `DeserializeOwned` because decoded values must not borrow the
/// receive buffer, which is dropped right after decoding.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Encode`] if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Decode`] if the bytes are malformed or do
    /// not match the expected shape.
    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError>;
}

/// A [`Codec`] speaking JSON via `serde_json` — the server's wire format.
///
/// Messages travel as UTF-8 JSON text, which also makes captured traffic
/// directly readable when debugging a misbehaving bot.
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::packet::{Packet, PacketKind};

    #[test]
    fn test_json_codec_round_trips_an_envelope() {
        let codec = JsonCodec;
        let packet = Packet::new(PacketKind::LobbyDataRequest);
        let bytes = codec.encode(&packet).unwrap();
        let decoded: Packet = codec.decode(&bytes).unwrap();
        assert_eq!(decoded, packet);
    }

    #[test]
    fn test_json_codec_rejects_garbage() {
        let codec = JsonCodec;
        let result: Result<Packet, _> = codec.decode(b"not json");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }
}
