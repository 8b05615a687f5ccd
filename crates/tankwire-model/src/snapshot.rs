//! Top-level snapshots: lobby data, per-tick game state, and the final
//! result.
//!
//! Each snapshot is built exactly once from a fully-parsed payload and is
//! read-only from then on; the next tick replaces it wholesale. Nothing
//! here caches across ticks — cross-tick memory belongs to the bot, not
//! the model.

use tankwire_protocol::{
    GameEndPayload, GameStatePayload, LobbyDataPayload, ServerSettings,
};

use crate::entity::Tank;
use crate::map::GameMap;
use crate::team::Team;
use crate::ModelError;

/// The lobby snapshot, received once per lobby phase.
#[derive(Debug, Clone, PartialEq)]
pub struct LobbyData {
    player_id: String,
    team_name: String,
    teams: Vec<Team>,
    server_settings: ServerSettings,
}

impl LobbyData {
    /// Builds the lobby snapshot from its payload.
    ///
    /// # Errors
    /// [`ModelError::InvalidEnumValue`] for an out-of-range tank type.
    pub fn from_payload(payload: LobbyDataPayload) -> Result<Self, ModelError> {
        Ok(Self {
            player_id: payload.player_id,
            team_name: payload.team_name,
            teams: payload
                .teams
                .into_iter()
                .map(Team::from_raw)
                .collect::<Result<Vec<_>, _>>()?,
            server_settings: payload.server_settings,
        })
    }

    /// Your own player id.
    pub fn my_id(&self) -> &str {
        &self.player_id
    }

    /// Your own team name.
    pub fn team_name(&self) -> &str {
        &self.team_name
    }

    /// All teams, in transmission order.
    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    /// The match settings the server announced.
    pub fn server_settings(&self) -> &ServerSettings {
        &self.server_settings
    }
}

/// One tick's world snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    id: String,
    tick: u64,
    player_id: String,
    teams: Vec<Team>,
    map: GameMap,
}

impl GameState {
    /// Builds the tick snapshot from its fully-parsed payload.
    ///
    /// The payload is already completely materialized at this point, so
    /// a failure here never leaves a half-built snapshot behind.
    ///
    /// # Errors
    /// Any [`ModelError`] from enum coercion, zone attachment, or the
    /// grid transpose.
    pub fn from_payload(payload: GameStatePayload) -> Result<Self, ModelError> {
        Ok(Self {
            id: payload.id,
            tick: payload.tick,
            player_id: payload.player_id,
            teams: payload
                .teams
                .into_iter()
                .map(Team::from_raw)
                .collect::<Result<Vec<_>, _>>()?,
            map: GameMap::from_raw(payload.map)?,
        })
    }

    /// Id of this game state. Response actions must echo it.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Tick number of this snapshot.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Your own player id.
    pub fn my_id(&self) -> &str {
        &self.player_id
    }

    /// All teams, in transmission order.
    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    /// The assembled grid.
    pub fn map(&self) -> &GameMap {
        &self.map
    }

    /// The tank owned by the given player, scanning every entity of every
    /// tile. `None` when that tank is dead or out of sight.
    pub fn tank_of(&self, player_id: &str) -> Option<&Tank> {
        self.map.tiles().iter().flatten().find_map(|tile| {
            tile.entities()
                .iter()
                .filter_map(|e| e.as_tank())
                .find(|tank| tank.owner_id == player_id)
        })
    }

    /// Your own tank, when alive and visible.
    pub fn my_tank(&self) -> Option<&Tank> {
        self.tank_of(&self.player_id)
    }

    /// The team you are on, if the teams list names you.
    pub fn my_team(&self) -> Option<&Team> {
        self.teams
            .iter()
            .find(|team| team.player(&self.player_id).is_some())
    }
}

/// The final standings, received once when the match ends.
#[derive(Debug, Clone, PartialEq)]
pub struct GameResult {
    teams: Vec<Team>,
}

impl GameResult {
    /// Builds the result snapshot from its payload.
    ///
    /// # Errors
    /// [`ModelError::InvalidEnumValue`] for an out-of-range tank type.
    pub fn from_payload(payload: GameEndPayload) -> Result<Self, ModelError> {
        Ok(Self {
            teams: payload
                .teams
                .into_iter()
                .map(Team::from_raw)
                .collect::<Result<Vec<_>, _>>()?,
        })
    }

    /// Final team standings, in transmission order, scores populated.
    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    /// The team with the highest score, if any team carries one.
    pub fn winner(&self) -> Option<&Team> {
        self.teams
            .iter()
            .filter(|t| t.score.is_some())
            .max_by_key(|t| t.score)
    }
}
