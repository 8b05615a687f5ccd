//! Teams and players as the domain model sees them.

use tankwire_protocol::{RawPlayer, RawTeam};

use crate::enums::TankType;
use crate::ModelError;

/// A player, as much of them as the current payload reveals.
///
/// Which fields are populated depends on where the player appeared:
/// lobby players carry their tank type, own-team game-state players
/// their ping and regeneration countdown, game-end players their kills.
/// Opponent fields the server withholds stay `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub id: String,
    pub tank_type: Option<TankType>,
    pub kills: Option<u32>,
    pub ping: Option<u32>,
    /// Ticks until this player's tank respawns, when dead.
    pub ticks_to_regenerate: Option<u32>,
}

impl Player {
    pub(crate) fn from_raw(raw: RawPlayer) -> Result<Self, ModelError> {
        Ok(Self {
            id: raw.id,
            tank_type: raw.tank_type.map(TankType::try_from).transpose()?,
            kills: raw.kills,
            ping: raw.ping,
            ticks_to_regenerate: raw.ticks_to_regen,
        })
    }
}

/// A team and its players, in transmission order.
#[derive(Debug, Clone, PartialEq)]
pub struct Team {
    pub name: String,
    /// Team color, packed `0xAABBGGRR`.
    pub color: u32,
    /// Final score; populated in game-end payloads only.
    pub score: Option<u32>,
    pub players: Vec<Player>,
}

impl Team {
    pub(crate) fn from_raw(raw: RawTeam) -> Result<Self, ModelError> {
        Ok(Self {
            name: raw.name,
            color: raw.color,
            score: raw.score,
            players: raw
                .players
                .into_iter()
                .map(Player::from_raw)
                .collect::<Result<Vec<_>, _>>()?,
        })
    }

    /// The player with the given id, if on this team.
    pub fn player(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_conversion_keeps_absent_fields_absent() {
        let player = Player::from_raw(RawPlayer {
            id: "p-1".into(),
            kills: None,
            ping: Some(23),
            ticks_to_regen: None,
            tank_type: None,
        })
        .unwrap();
        assert_eq!(player.ping, Some(23));
        assert_eq!(player.kills, None);
        assert_eq!(player.tank_type, None);
    }

    #[test]
    fn test_player_with_bad_tank_type_fails() {
        let err = Player::from_raw(RawPlayer {
            id: "p-1".into(),
            kills: None,
            ping: None,
            ticks_to_regen: None,
            tank_type: Some(9),
        })
        .unwrap_err();
        assert!(matches!(
            err,
            ModelError::InvalidEnumValue { what: "tank type", value: 9 }
        ));
    }

    #[test]
    fn test_team_preserves_player_order() {
        let team = Team::from_raw(RawTeam {
            name: "crimson".into(),
            color: 0xFF0000FF,
            score: None,
            players: vec![
                RawPlayer {
                    id: "first".into(),
                    kills: None,
                    ping: None,
                    ticks_to_regen: None,
                    tank_type: Some(0),
                },
                RawPlayer {
                    id: "second".into(),
                    kills: None,
                    ping: None,
                    ticks_to_regen: None,
                    tank_type: Some(1),
                },
            ],
        })
        .unwrap();
        assert_eq!(team.players[0].id, "first");
        assert_eq!(team.players[1].id, "second");
        assert_eq!(team.player("second").unwrap().tank_type, Some(TankType::Heavy));
        assert!(team.player("nobody").is_none());
    }
}
