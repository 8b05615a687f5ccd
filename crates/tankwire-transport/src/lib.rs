//! Transport abstraction layer for Tankwire.
//!
//! Provides the [`Connection`] trait the session loop speaks through, and
//! a WebSocket implementation for the game server's actual endpoint.
//!
//! The session never sees sockets — only `send`/`recv` of opaque frames.
//! That seam is what lets the session tests drive a whole game through an
//! in-memory connection.
//!
//! # Feature Flags
//!
//! - `websocket` (default) — WebSocket client via `tokio-tungstenite`

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
#[cfg(feature = "websocket")]
pub use websocket::WebSocketConnection;

/// A single connection that can send and receive message frames.
pub trait Connection: Send + Sync + 'static {
    /// The error type for connection operations.
    type Error: std::error::Error + Send + Sync;

    /// Sends one message to the server.
    async fn send(&self, data: &[u8]) -> Result<(), Self::Error>;

    /// Receives the next message from the server.
    ///
    /// Returns `Ok(None)` when the connection is cleanly closed.
    async fn recv(&self) -> Result<Option<Vec<u8>>, Self::Error>;

    /// Closes the connection.
    async fn close(&self) -> Result<(), Self::Error>;
}
