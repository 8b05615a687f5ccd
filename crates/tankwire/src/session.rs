//! The session loop: receive → build model → ask the bot → encode → send.
//!
//! One logical request/response cycle per tick:
//!
//! ```text
//! GameState packet ─→ raw payload ─→ snapshot ─→ Bot::next_move
//!                                                     │
//! server ←── response packet ←── payload ←── ResponseAction
//! ```
//!
//! Decode and model-build failures are local to one message: the session
//! logs them with enough context to reproduce from a capture (packet
//! kind, tick when known, offending field or tag) and drops the message.
//! It never retries and it keeps no game state of its own; everything a
//! bot wants to remember across ticks lives in the bot.

use serde_json::Value;
use tankwire_model::{
    GameResult, GameState, LobbyData, ModelError, WarningKind,
};
use tankwire_protocol::{
    custom_warning_from_value, Codec, ConnectionRejectedPayload,
    GameEndPayload, GameStatePayload, JsonCodec, LobbyDataPayload, Packet,
    PacketKind, ProtocolError,
};
use tankwire_transport::{Connection, TransportError, WebSocketConnection};

use crate::{Bot, ConnectOptions, TankwireError};

/// What the loop does after handling one inbound packet.
enum Flow {
    Continue,
    Finished,
}

/// A connected game session driving one [`Bot`].
pub struct Session<C> {
    conn: C,
    codec: JsonCodec,
}

impl Session<WebSocketConnection> {
    /// Connects to the server described by `options`.
    ///
    /// # Errors
    /// [`TankwireError::Transport`] when the connection cannot be
    /// established.
    pub async fn connect(options: &ConnectOptions) -> Result<Self, TankwireError> {
        let conn = WebSocketConnection::connect(&options.url()).await?;
        Ok(Self::new(conn))
    }
}

impl<C> Session<C>
where
    C: Connection<Error = TransportError>,
{
    /// Wraps an already-established connection.
    pub fn new(conn: C) -> Self {
        Self {
            conn,
            codec: JsonCodec,
        }
    }

    /// Runs the session until the match ends or the connection closes.
    ///
    /// # Errors
    /// - [`TankwireError::Transport`] on connection failures,
    /// - [`TankwireError::ConnectionRejected`] when the server refuses
    ///   the join,
    /// - [`TankwireError::Protocol`] only for outbound encode failures;
    ///   inbound decode failures are logged and skipped.
    pub async fn run<B: Bot>(self, bot: &mut B) -> Result<(), TankwireError> {
        loop {
            let Some(frame) = self.conn.recv().await? else {
                tracing::info!("server closed the connection");
                return Ok(());
            };

            let packet: Packet = match self.codec.decode(&frame) {
                Ok(packet) => packet,
                Err(e) => {
                    tracing::warn!(error = %e, "undecodable frame dropped");
                    continue;
                }
            };

            match self.handle_packet(bot, packet).await? {
                Flow::Continue => {}
                Flow::Finished => return Ok(()),
            }
        }
    }

    /// Dispatches one classified packet.
    async fn handle_packet<B: Bot>(
        &self,
        bot: &mut B,
        mut packet: Packet,
    ) -> Result<Flow, TankwireError> {
        let kind = match packet.kind() {
            Ok(kind) => kind,
            Err(e) => {
                // Without a kind the payload shape is unknowable; the
                // message cannot be interpreted safely.
                tracing::warn!(
                    code = packet.packet_type,
                    error = %e,
                    "unknown packet type dropped"
                );
                return Ok(Flow::Continue);
            }
        };

        match kind {
            PacketKind::Ping => {
                self.send(Packet::new(PacketKind::Pong)).await?;
            }
            PacketKind::Pong => {
                tracing::trace!("pong received");
            }

            PacketKind::ConnectionAccepted => {
                tracing::info!("connection accepted, requesting lobby data");
                self.send(Packet::new(PacketKind::LobbyDataRequest)).await?;
            }
            PacketKind::ConnectionRejected => {
                let reason = packet
                    .take_payload(kind)
                    .and_then(ConnectionRejectedPayload::from_value)
                    .map(|p| p.reason)
                    .unwrap_or_else(|_| "no reason given".to_string());
                return Err(TankwireError::ConnectionRejected { reason });
            }

            PacketKind::LobbyData => {
                let Some(lobby) = self.build_lobby(&mut packet) else {
                    return Ok(Flow::Continue);
                };
                bot.on_lobby_data(&lobby);
                self.send(Packet::new(PacketKind::ReadyToReceiveGameState))
                    .await?;
            }

            PacketKind::GameState => {
                let Some(state) = self.build_game_state(&mut packet) else {
                    return Ok(Flow::Continue);
                };
                let action = bot.next_move(&state);
                tracing::debug!(
                    tick = state.tick(),
                    kind = ?action.packet_kind(),
                    "responding"
                );
                let response = action.to_payload(state.id()).to_packet()?;
                self.send(response).await?;
            }

            PacketKind::GameEnded => {
                let Some(result) = self.build_result(&mut packet) else {
                    return Ok(Flow::Continue);
                };
                bot.on_game_ended(&result);
                return Ok(Flow::Finished);
            }

            PacketKind::GameNotStarted
            | PacketKind::GameStarting
            | PacketKind::GameStarted
            | PacketKind::GameInProgress => {
                tracing::debug!(status = ?kind, "game status");
            }

            PacketKind::CustomWarning => {
                let message = packet
                    .take_payload(kind)
                    .and_then(custom_warning_from_value)
                    .ok();
                bot.on_warning(WarningKind::Custom, message.as_deref());
            }
            PacketKind::PlayerAlreadyMadeAction
            | PacketKind::ActionIgnoredDueToDead
            | PacketKind::SlowResponse => {
                // The classification above guarantees a warning kind here.
                if let Some(warning) = WarningKind::from_packet_kind(kind) {
                    bot.on_warning(warning, None);
                }
            }

            // Client-to-server kinds have no business arriving inbound.
            PacketKind::LobbyDataRequest
            | PacketKind::ReadyToReceiveGameState
            | PacketKind::GameStatusRequest
            | PacketKind::Movement
            | PacketKind::Rotation
            | PacketKind::AbilityUse
            | PacketKind::CaptureZone
            | PacketKind::GoTo
            | PacketKind::Pass => {
                tracing::warn!(kind = ?kind, "unexpected inbound packet dropped");
            }
        }

        Ok(Flow::Continue)
    }

    /// Parses and builds the lobby snapshot, or logs why it couldn't.
    fn build_lobby(&self, packet: &mut Packet) -> Option<LobbyData> {
        let value = self.required_payload(packet, PacketKind::LobbyData)?;
        let payload = LobbyDataPayload::from_value(value)
            .map_err(|e| log_protocol_failure(PacketKind::LobbyData, None, &e))
            .ok()?;
        LobbyData::from_payload(payload)
            .map_err(|e| log_model_failure(PacketKind::LobbyData, None, &e))
            .ok()
    }

    /// Parses and builds one tick's snapshot, or logs why it couldn't.
    ///
    /// The payload parse fully materializes the tick before any model
    /// building starts; a failure in either stage rejects the whole tick.
    fn build_game_state(&self, packet: &mut Packet) -> Option<GameState> {
        let value = self.required_payload(packet, PacketKind::GameState)?;
        // The tick number, when decodable, makes the log reproducible
        // against a capture even if the full parse fails.
        let tick = value.get("tick").and_then(Value::as_u64);
        let payload = GameStatePayload::from_value(value)
            .map_err(|e| log_protocol_failure(PacketKind::GameState, tick, &e))
            .ok()?;
        GameState::from_payload(payload)
            .map_err(|e| log_model_failure(PacketKind::GameState, tick, &e))
            .ok()
    }

    /// Parses and builds the final result, or logs why it couldn't.
    fn build_result(&self, packet: &mut Packet) -> Option<GameResult> {
        let value = self.required_payload(packet, PacketKind::GameEnded)?;
        let payload = GameEndPayload::from_value(value)
            .map_err(|e| log_protocol_failure(PacketKind::GameEnded, None, &e))
            .ok()?;
        GameResult::from_payload(payload)
            .map_err(|e| log_model_failure(PacketKind::GameEnded, None, &e))
            .ok()
    }

    /// Takes the payload a kind requires, logging its absence.
    fn required_payload(
        &self,
        packet: &mut Packet,
        kind: PacketKind,
    ) -> Option<Value> {
        packet
            .take_payload(kind)
            .map_err(|e| log_protocol_failure(kind, None, &e))
            .ok()
    }

    /// Encodes and sends one outbound packet.
    async fn send(&self, packet: Packet) -> Result<(), TankwireError> {
        let bytes = self.codec.encode(&packet)?;
        self.conn.send(&bytes).await?;
        Ok(())
    }
}

fn log_protocol_failure(kind: PacketKind, tick: Option<u64>, error: &ProtocolError) {
    tracing::error!(kind = ?kind, tick, error = %error, "payload rejected");
}

fn log_model_failure(kind: PacketKind, tick: Option<u64>, error: &ModelError) {
    tracing::error!(kind = ?kind, tick, error = %error, "snapshot rejected");
}
