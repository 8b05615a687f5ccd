//! # Tankwire
//!
//! Client library for a turn-based, grid-based multiplayer tank game.
//!
//! Tankwire decodes the server's wire packets into typed snapshots
//! ([`LobbyData`], [`GameState`], [`GameResult`]), hands them to a
//! [`Bot`] implementation, and encodes the bot's [`ResponseAction`]
//! back into the exact payload the server expects for that tick.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use tankwire::prelude::*;
//!
//! struct MyBot;
//!
//! impl Bot for MyBot {
//!     fn next_move(&mut self, state: &GameState) -> ResponseAction {
//!         if state.my_tank().is_none() {
//!             // Dead tanks pass to avoid server warnings.
//!             return ResponseAction::Pass;
//!         }
//!         ResponseAction::Movement(MovementDirection::Forward)
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), TankwireError> {
//!     let options = ConnectOptions::new("crimson", TankType::Light);
//!     let session = Session::connect(&options).await?;
//!     session.run(&mut MyBot).await
//! }
//! ```

mod bot;
mod error;
mod options;
mod session;

pub use bot::Bot;
pub use error::TankwireError;
pub use options::ConnectOptions;
pub use session::Session;

/// Everything a typical bot needs, in one import.
pub mod prelude {
    pub use crate::{Bot, ConnectOptions, Session, TankwireError};
    pub use tankwire_model::{
        Ability, Bullet, BulletType, Direction, GameMap, GameResult,
        GameState, GoToCosts, GoToPenalties, Laser, LobbyData, Mine,
        MovementDirection, Orientation, Player, ResponseAction,
        RotationDirection, ServerSettings, Tank, TankType, Team, Tile,
        TileEntity, TilePenalty, Turret, Wall, WallType, WarningKind, Zone,
    };
}
