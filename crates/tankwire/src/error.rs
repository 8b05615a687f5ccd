//! Unified error type for the Tankwire client.

use tankwire_model::ModelError;
use tankwire_protocol::ProtocolError;
use tankwire_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// Bot authors deal with this single type; the `#[from]` attributes let
/// the session propagate sub-crate errors with `?`.
#[derive(Debug, thiserror::Error)]
pub enum TankwireError {
    /// A transport-level error (connect, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (classification, payload decode, encode).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A model-building error (enum coercion, zone layout, grid shape).
    #[error(transparent)]
    Model(#[from] ModelError),

    /// The server refused the join request.
    #[error("connection rejected: {reason}")]
    ConnectionRejected {
        /// The server's stated reason.
        reason: String,
    },
}
