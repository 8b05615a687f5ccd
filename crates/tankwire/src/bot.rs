//! The `Bot` trait — the single extension point bot authors implement.
//!
//! The session calls these methods at the right times; the author only
//! writes decision logic. Any memory a bot keeps across ticks (a
//! remembered objective, a teammate id) lives in the implementing type;
//! the snapshots themselves are rebuilt from scratch every tick.

use tankwire_model::{GameResult, GameState, LobbyData, ResponseAction, WarningKind};

/// Decision logic for one connected bot.
pub trait Bot: Send {
    /// Called with the lobby snapshot, before the match and again
    /// whenever the server re-broadcasts lobby data. Default: no-op.
    fn on_lobby_data(&mut self, _lobby: &LobbyData) {}

    /// Called once per tick with that tick's snapshot. The returned
    /// action is encoded against this snapshot's state id and sent
    /// before the next tick arrives.
    ///
    /// Return [`ResponseAction::Pass`] when there is nothing to do (for
    /// example while the own tank is dead) to avoid server
    /// warnings about missing responses.
    fn next_move(&mut self, state: &GameState) -> ResponseAction;

    /// Called with the final standings when the match ends. Default: no-op.
    fn on_game_ended(&mut self, _result: &GameResult) {}

    /// Called when the server warns about this bot's behavior. Only
    /// [`WarningKind::Custom`] carries a message. Default: no-op.
    fn on_warning(&mut self, _kind: WarningKind, _message: Option<&str>) {}
}
