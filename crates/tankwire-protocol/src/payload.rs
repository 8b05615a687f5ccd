//! Raw payload records and their parsers.
//!
//! Everything in this module is *wire-shaped*: camelCase field names,
//! integer codes instead of enums, and explicit `Option`s wherever the
//! server may omit a value. A `null`/absent numeric field means "this
//! value is inapplicable for my visibility of this entity", never zero.
//! The distinction is preserved all the way into the domain model.
//!
//! Parsing is all-or-nothing per message: a payload either materializes
//! fully into its raw record or fails with a [`ProtocolError`]; nothing
//! downstream ever sees a half-built tick.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::packet::PacketKind;
use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Server settings
// ---------------------------------------------------------------------------

/// Match configuration broadcast with the lobby data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerSettings {
    /// Side length of the square grid.
    pub grid_dimension: u32,
    /// Number of players in the match.
    pub number_of_players: u32,
    /// Seed the server generated the map from.
    pub seed: i64,
    /// Total tick count of the match. Absent in sandbox mode, where the
    /// match runs until stopped.
    pub ticks: Option<u32>,
    /// Interval between game-state broadcasts, in milliseconds.
    pub broadcast_interval: u32,
    /// Whether the server runs in sandbox mode.
    pub sandbox_mode: bool,
    /// Whether the server broadcasts the next tick as soon as every
    /// player has responded, instead of waiting out the interval.
    pub eager_broadcast: bool,
    /// Optional human-readable match name.
    pub match_name: Option<String>,
    /// Server protocol version string.
    pub version: String,
}

// ---------------------------------------------------------------------------
// Teams and players
// ---------------------------------------------------------------------------

/// Wire shape of a team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTeam {
    /// Team name, also the key of zone share maps.
    pub name: String,
    /// Team color, packed `0xAABBGGRR`.
    pub color: u32,
    /// Final score. Only present in game-end payloads.
    #[serde(default)]
    pub score: Option<u32>,
    /// The team's players.
    #[serde(default)]
    pub players: Vec<RawPlayer>,
}

/// Wire shape of a player.
///
/// Which optional fields are populated depends on the payload: lobby
/// players carry `tank_type`, own-team game-state players carry `ping`
/// and `ticks_to_regen`, game-end players carry `kills`. Fields the
/// server withholds for opponents stay `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPlayer {
    /// Server-assigned player id.
    pub id: String,
    #[serde(default)]
    pub kills: Option<u32>,
    #[serde(default)]
    pub ping: Option<u32>,
    #[serde(default)]
    pub ticks_to_regen: Option<u32>,
    #[serde(default)]
    pub tank_type: Option<u8>,
}

// ---------------------------------------------------------------------------
// Tile entities
// ---------------------------------------------------------------------------

/// Wire shape of one tile entity, discriminated by its type tag.
///
/// Variants carry only transport-level data; enum coercion and derived
/// state belong to the domain model.
#[derive(Debug, Clone, PartialEq)]
pub enum RawTileEntity {
    Wall(RawWall),
    Bullet(RawBullet),
    Laser(RawLaser),
    Mine(RawMine),
    Tank(RawTank),
}

/// Wire shape of a wall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawWall {
    /// Wall type code (solid / penetrable).
    #[serde(rename = "type")]
    pub wall_type: u8,
}

/// Wire shape of a bullet in flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBullet {
    pub id: u64,
    /// Tiles per tick. Absent when the observer cannot judge it.
    #[serde(default)]
    pub speed: Option<f64>,
    /// Direction code. Absent when the observer cannot judge it.
    #[serde(default)]
    pub direction: Option<u8>,
    /// Bullet type code.
    #[serde(rename = "type")]
    pub bullet_type: u8,
}

/// Wire shape of a laser beam segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLaser {
    pub id: u64,
    /// Orientation code (horizontal / vertical).
    pub orientation: u8,
}

/// Wire shape of a mine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMine {
    pub id: u64,
    /// Remaining explosion animation ticks. Present only once the mine
    /// has gone off; its presence *is* the exploded flag.
    #[serde(default)]
    pub explosion_remaining_ticks: Option<u32>,
}

/// Wire shape of a tank.
///
/// Own-team tanks carry the full record; opposing tanks arrive with the
/// own-team-only fields absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTank {
    pub owner_id: String,
    /// Tank type code (light / heavy).
    #[serde(rename = "type")]
    pub tank_type: u8,
    /// Hull direction code.
    pub direction: u8,
    pub turret: RawTurret,
    #[serde(default)]
    pub health: Option<u32>,
    #[serde(default)]
    pub ticks_to_radar: Option<u32>,
    #[serde(default)]
    pub is_using_radar: Option<bool>,
    #[serde(default)]
    pub ticks_to_mine: Option<u32>,
    /// Visibility mask, one row per grid row in row order. Decoded here
    /// from the wire's '0'/'1' character rows.
    #[serde(default, deserialize_with = "visibility_mask")]
    pub visibility: Option<Vec<Vec<bool>>>,
}

/// Wire shape of a turret, nested inside its tank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTurret {
    /// Turret direction code.
    pub direction: u8,
    #[serde(default)]
    pub bullet_count: Option<u32>,
    #[serde(default)]
    pub ticks_to_bullet: Option<u32>,
    #[serde(default)]
    pub ticks_to_double_bullet: Option<u32>,
    #[serde(default)]
    pub ticks_to_laser: Option<u32>,
    #[serde(default)]
    pub ticks_to_healing_bullet: Option<u32>,
    #[serde(default)]
    pub ticks_to_stun_bullet: Option<u32>,
}

/// Decodes a visibility mask from rows of '0'/'1' characters, keeping
/// row order. Any character other than '1' reads as not-visible.
fn visibility_mask<'de, D>(
    deserializer: D,
) -> Result<Option<Vec<Vec<bool>>>, D::Error>
where
    D: Deserializer<'de>,
{
    let rows: Option<Vec<String>> = Option::deserialize(deserializer)?;
    Ok(rows.map(|rows| {
        rows.iter()
            .map(|row| row.chars().map(|c| c == '1').collect())
            .collect()
    }))
}

// ---------------------------------------------------------------------------
// Tile-object dispatch
// ---------------------------------------------------------------------------

/// One entry of a tile's entity list: the wire tag plus the decoded entity.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTileObject {
    /// The wire type tag, e.g. `"tank"`.
    pub tag: String,
    /// The decoded entity.
    pub entity: RawTileEntity,
}

/// A tile-entity payload decoder, one per registered tag.
type EntityDecoder = fn(Value) -> Result<RawTileEntity, ProtocolError>;

/// The tag → decoder registry. This is the single polymorphic dispatch
/// point of the protocol: supporting a new entity kind means one new
/// [`RawTileEntity`] variant and one row here.
static ENTITY_DECODERS: &[(&str, EntityDecoder)] = &[
    ("wall", |v| Ok(RawTileEntity::Wall(entity_record(v)?))),
    ("bullet", |v| Ok(RawTileEntity::Bullet(entity_record(v)?))),
    ("laser", |v| Ok(RawTileEntity::Laser(entity_record(v)?))),
    ("mine", |v| Ok(RawTileEntity::Mine(entity_record(v)?))),
    ("tank", |v| Ok(RawTileEntity::Tank(entity_record(v)?))),
];

/// Deserializes one entity record, attributing failures to the game-state
/// payload they arrived in.
fn entity_record<T: serde::de::DeserializeOwned>(
    value: Value,
) -> Result<T, ProtocolError> {
    serde_json::from_value(value)
        .map_err(|e| ProtocolError::malformed(PacketKind::GameState, e))
}

impl RawTileObject {
    /// Decodes one tile object from its wire tree.
    ///
    /// # Errors
    /// [`ProtocolError::UnknownTileEntity`] when the tag has no registered
    /// decoder, and only then; a registered tag with a bad payload fails
    /// with [`ProtocolError::MalformedPayload`] instead.
    pub fn from_value(value: Value) -> Result<Self, ProtocolError> {
        #[derive(Deserialize)]
        struct Wire {
            #[serde(rename = "type")]
            tag: String,
            #[serde(default)]
            payload: Value,
        }

        let wire: Wire = serde_json::from_value(value)
            .map_err(|e| ProtocolError::malformed(PacketKind::GameState, e))?;

        let decoder = ENTITY_DECODERS
            .iter()
            .find(|(tag, _)| *tag == wire.tag)
            .map(|(_, decoder)| decoder)
            .ok_or_else(|| ProtocolError::UnknownTileEntity {
                tag: wire.tag.clone(),
            })?;

        let entity = decoder(wire.payload)?;
        Ok(Self {
            tag: wire.tag,
            entity,
        })
    }
}

// ---------------------------------------------------------------------------
// Map and zones
// ---------------------------------------------------------------------------

/// Wire shape of a capturable zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawZone {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Zone identifier, the character code of its display letter.
    pub index: u8,
    /// Captured share per team name, each in `0.0..=1.0`. Shares need not
    /// sum to 1; contested and unclaimed area is unowned.
    #[serde(default)]
    pub shares: HashMap<String, f64>,
}

/// Wire shape of the map: tile-object lists addressed `tiles[x][y]`
/// (column-major, as transmitted) plus the zone list.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMap {
    /// Outer index is **x**. The domain model transposes this.
    pub tiles: Vec<Vec<Vec<RawTileObject>>>,
    pub zones: Vec<RawZone>,
}

impl RawMap {
    /// Decodes the map subtree of a game-state payload.
    ///
    /// # Errors
    /// Any tile object failing to decode fails the whole map: a silently
    /// dropped wall or tank would corrupt every decision made downstream.
    pub fn from_value(value: Value) -> Result<Self, ProtocolError> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Wire {
            tiles: Vec<Vec<Vec<Value>>>,
            #[serde(default)]
            zones: Vec<RawZone>,
        }

        let wire: Wire = serde_json::from_value(value)
            .map_err(|e| ProtocolError::malformed(PacketKind::GameState, e))?;

        let tiles = wire
            .tiles
            .into_iter()
            .map(|column| {
                column
                    .into_iter()
                    .map(|cell| {
                        cell.into_iter()
                            .map(RawTileObject::from_value)
                            .collect::<Result<Vec<_>, _>>()
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            tiles,
            zones: wire.zones,
        })
    }
}

// ---------------------------------------------------------------------------
// Top-level inbound payloads
// ---------------------------------------------------------------------------

/// Payload of a [`PacketKind::ConnectionRejected`] packet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionRejectedPayload {
    /// Human-readable rejection reason.
    pub reason: String,
}

impl ConnectionRejectedPayload {
    /// # Errors
    /// [`ProtocolError::MalformedPayload`] on structural mismatch.
    pub fn from_value(value: Value) -> Result<Self, ProtocolError> {
        serde_json::from_value(value).map_err(|e| {
            ProtocolError::malformed(PacketKind::ConnectionRejected, e)
        })
    }
}

/// Payload of a [`PacketKind::LobbyData`] packet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LobbyDataPayload {
    /// The receiving bot's own player id.
    pub player_id: String,
    /// The receiving bot's team name.
    pub team_name: String,
    pub teams: Vec<RawTeam>,
    pub server_settings: ServerSettings,
}

impl LobbyDataPayload {
    /// # Errors
    /// [`ProtocolError::MalformedPayload`] on structural mismatch.
    pub fn from_value(value: Value) -> Result<Self, ProtocolError> {
        serde_json::from_value(value)
            .map_err(|e| ProtocolError::malformed(PacketKind::LobbyData, e))
    }
}

/// Payload of a [`PacketKind::GameState`] packet — one full tick.
#[derive(Debug, Clone, PartialEq)]
pub struct GameStatePayload {
    /// Id of this game state; the response action must echo it.
    pub id: String,
    /// Tick number of this snapshot.
    pub tick: u64,
    /// The receiving bot's own player id.
    pub player_id: String,
    pub teams: Vec<RawTeam>,
    pub map: RawMap,
}

impl GameStatePayload {
    /// Decodes a full tick. The record is fully materialized and validated
    /// before it is returned; model building never sees partial data.
    ///
    /// # Errors
    /// [`ProtocolError::MalformedPayload`] on structural mismatch,
    /// [`ProtocolError::UnknownTileEntity`] for an unregistered tile tag.
    pub fn from_value(value: Value) -> Result<Self, ProtocolError> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Wire {
            id: String,
            tick: u64,
            player_id: String,
            teams: Vec<RawTeam>,
            map: Value,
        }

        let wire: Wire = serde_json::from_value(value)
            .map_err(|e| ProtocolError::malformed(PacketKind::GameState, e))?;

        Ok(Self {
            id: wire.id,
            tick: wire.tick,
            player_id: wire.player_id,
            teams: wire.teams,
            map: RawMap::from_value(wire.map)?,
        })
    }
}

/// Payload of a [`PacketKind::GameEnded`] packet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameEndPayload {
    /// Final team standings, scores populated.
    pub teams: Vec<RawTeam>,
}

impl GameEndPayload {
    /// # Errors
    /// [`ProtocolError::MalformedPayload`] on structural mismatch.
    pub fn from_value(value: Value) -> Result<Self, ProtocolError> {
        serde_json::from_value(value)
            .map_err(|e| ProtocolError::malformed(PacketKind::GameEnded, e))
    }
}

/// Payload of a [`PacketKind::CustomWarning`] packet: a bare message string.
pub fn custom_warning_from_value(value: Value) -> Result<String, ProtocolError> {
    serde_json::from_value(value)
        .map_err(|e| ProtocolError::malformed(PacketKind::CustomWarning, e))
}

// ---------------------------------------------------------------------------
// Outbound response-action payloads
// ---------------------------------------------------------------------------

/// Payload of a [`PacketKind::Movement`] response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementPayload {
    /// Id of the game state this action answers.
    pub game_state_id: String,
    /// Movement direction code (forward / backward).
    pub direction: u8,
}

/// Payload of a [`PacketKind::Rotation`] response.
///
/// Either rotation, both, or neither may be set; an absent field means
/// "leave it as it is". Both-absent is valid and encodes a no-op.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RotationPayload {
    pub game_state_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tank_rotation: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turret_rotation: Option<u8>,
}

/// Payload of a [`PacketKind::AbilityUse`] response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbilityUsePayload {
    pub game_state_id: String,
    /// Ability selector code.
    pub ability_type: u8,
}

/// Payload of a [`PacketKind::CaptureZone`] response. Carries nothing
/// beyond the state id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureZonePayload {
    pub game_state_id: String,
}

/// Movement cost weights of a go-to request. The server's pathfinder
/// interprets them; this client only serializes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoToCosts {
    pub forward: f64,
    pub backward: f64,
    pub rotate: f64,
}

impl Default for GoToCosts {
    fn default() -> Self {
        // Protocol-defined defaults.
        Self {
            forward: 1.0,
            backward: 1.5,
            rotate: 1.5,
        }
    }
}

/// Penalty weights of a go-to request. `None` means "unconstrained".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoToPenalties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blindly: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tank: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bullet: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mine: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub laser: Option<f64>,
    /// Explicit per-tile penalty overrides.
    #[serde(default)]
    pub per_tile: Vec<TilePenalty>,
}

/// One per-tile penalty override, keyed by tile coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TilePenalty {
    pub x: u32,
    pub y: u32,
    pub penalty: f64,
}

/// Payload of a [`PacketKind::GoTo`] response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoToPayload {
    pub game_state_id: String,
    /// Target tile.
    pub x: u32,
    pub y: u32,
    pub costs: GoToCosts,
    pub penalties: GoToPenalties,
}

/// Payload of a [`PacketKind::Pass`] response. Carries nothing beyond
/// the state id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassPayload {
    pub game_state_id: String,
}

/// A fully-built response-action payload, paired with its packet kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseActionPayload {
    Movement(MovementPayload),
    Rotation(RotationPayload),
    AbilityUse(AbilityUsePayload),
    CaptureZone(CaptureZonePayload),
    GoTo(GoToPayload),
    Pass(PassPayload),
}

impl ResponseActionPayload {
    /// The packet kind this payload travels under.
    pub fn kind(&self) -> PacketKind {
        match self {
            Self::Movement(_) => PacketKind::Movement,
            Self::Rotation(_) => PacketKind::Rotation,
            Self::AbilityUse(_) => PacketKind::AbilityUse,
            Self::CaptureZone(_) => PacketKind::CaptureZone,
            Self::GoTo(_) => PacketKind::GoTo,
            Self::Pass(_) => PacketKind::Pass,
        }
    }

    /// Wraps this payload in its wire envelope.
    ///
    /// # Errors
    /// [`ProtocolError::Encode`] if serialization fails.
    pub fn to_packet(&self) -> Result<crate::packet::Packet, ProtocolError> {
        use crate::packet::Packet;
        match self {
            Self::Movement(p) => Packet::with_payload(self.kind(), p),
            Self::Rotation(p) => Packet::with_payload(self.kind(), p),
            Self::AbilityUse(p) => Packet::with_payload(self.kind(), p),
            Self::CaptureZone(p) => Packet::with_payload(self.kind(), p),
            Self::GoTo(p) => Packet::with_payload(self.kind(), p),
            Self::Pass(p) => Packet::with_payload(self.kind(), p),
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // =====================================================================
    // Tile-object dispatch
    // =====================================================================

    #[test]
    fn test_tile_object_dispatches_by_tag() {
        let obj = RawTileObject::from_value(json!({
            "type": "wall",
            "payload": { "type": 1 }
        }))
        .unwrap();
        assert_eq!(obj.tag, "wall");
        assert_eq!(
            obj.entity,
            RawTileEntity::Wall(RawWall { wall_type: 1 })
        );
    }

    #[test]
    fn test_unknown_tag_fails_with_unknown_tile_entity_only() {
        let err = RawTileObject::from_value(json!({
            "type": "teleporter",
            "payload": {}
        }))
        .unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::UnknownTileEntity { tag } if tag == "teleporter"
        ));
    }

    #[test]
    fn test_registered_tag_with_bad_payload_is_malformed_not_unknown() {
        let err = RawTileObject::from_value(json!({
            "type": "wall",
            "payload": { "type": "solid" }
        }))
        .unwrap_err();
        assert!(matches!(err, ProtocolError::MalformedPayload { .. }));
    }

    #[test]
    fn test_tank_entity_decodes_with_nested_turret() {
        let obj = RawTileObject::from_value(json!({
            "type": "tank",
            "payload": {
                "ownerId": "p-1",
                "type": 0,
                "direction": 2,
                "turret": { "direction": 1, "bulletCount": 3 },
                "health": 80,
                "visibility": ["101", "010"]
            }
        }))
        .unwrap();
        let RawTileEntity::Tank(tank) = obj.entity else {
            panic!("expected a tank");
        };
        assert_eq!(tank.owner_id, "p-1");
        assert_eq!(tank.turret.direction, 1);
        assert_eq!(tank.turret.bullet_count, Some(3));
        assert_eq!(tank.turret.ticks_to_laser, None);
        assert_eq!(
            tank.visibility,
            Some(vec![
                vec![true, false, true],
                vec![false, true, false]
            ])
        );
    }

    #[test]
    fn test_opponent_tank_keeps_withheld_fields_absent() {
        // An enemy tank arrives without health/visibility/cooldowns.
        // Absent must stay None; zero would mean something else entirely.
        let obj = RawTileObject::from_value(json!({
            "type": "tank",
            "payload": {
                "ownerId": "p-9",
                "type": 1,
                "direction": 0,
                "turret": { "direction": 3 }
            }
        }))
        .unwrap();
        let RawTileEntity::Tank(tank) = obj.entity else {
            panic!("expected a tank");
        };
        assert_eq!(tank.health, None);
        assert_eq!(tank.visibility, None);
        assert_eq!(tank.is_using_radar, None);
        assert_eq!(tank.turret.bullet_count, None);
    }

    #[test]
    fn test_mine_explosion_ticks_absent_vs_present() {
        let armed = RawTileObject::from_value(json!({
            "type": "mine",
            "payload": { "id": 7 }
        }))
        .unwrap();
        let RawTileEntity::Mine(armed) = armed.entity else {
            panic!("expected a mine");
        };
        assert_eq!(armed.explosion_remaining_ticks, None);

        let exploded = RawTileObject::from_value(json!({
            "type": "mine",
            "payload": { "id": 7, "explosionRemainingTicks": 4 }
        }))
        .unwrap();
        let RawTileEntity::Mine(exploded) = exploded.entity else {
            panic!("expected a mine");
        };
        assert_eq!(exploded.explosion_remaining_ticks, Some(4));
    }

    // =====================================================================
    // Map
    // =====================================================================

    #[test]
    fn test_map_decodes_tiles_and_zones() {
        let map = RawMap::from_value(json!({
            "tiles": [
                [[{ "type": "wall", "payload": { "type": 0 } }], []],
                [[], [{ "type": "mine", "payload": { "id": 1 } }]]
            ],
            "zones": [{
                "x": 0, "y": 0, "width": 2, "height": 2, "index": 65,
                "shares": { "red": 0.25 }
            }]
        }))
        .unwrap();
        assert_eq!(map.tiles.len(), 2);
        assert_eq!(map.tiles[0][0].len(), 1);
        assert_eq!(map.tiles[0][1].len(), 0);
        assert_eq!(map.zones[0].index, b'A');
        assert_eq!(map.zones[0].shares["red"], 0.25);
    }

    #[test]
    fn test_map_with_unknown_entity_rejects_the_whole_tick() {
        let err = RawMap::from_value(json!({
            "tiles": [[[
                { "type": "wall", "payload": { "type": 0 } },
                { "type": "portal", "payload": {} }
            ]]],
            "zones": []
        }))
        .unwrap_err();
        assert!(matches!(err, ProtocolError::UnknownTileEntity { .. }));
    }

    // =====================================================================
    // Top-level payloads
    // =====================================================================

    fn lobby_fixture() -> Value {
        json!({
            "playerId": "me",
            "teamName": "crimson",
            "teams": [
                {
                    "name": "crimson",
                    "color": 0xFF0000FFu32,
                    "players": [
                        { "id": "me", "tankType": 0 },
                        { "id": "mate", "tankType": 1 }
                    ]
                },
                {
                    "name": "azure",
                    "color": 0xFFFF0000u32,
                    "players": [
                        { "id": "a", "tankType": 0 },
                        { "id": "b", "tankType": 1 }
                    ]
                }
            ],
            "serverSettings": {
                "gridDimension": 24,
                "numberOfPlayers": 4,
                "seed": 1337,
                "ticks": 2000,
                "broadcastInterval": 100,
                "sandboxMode": false,
                "eagerBroadcast": true,
                "matchName": "finals",
                "version": "2.5.0"
            }
        })
    }

    #[test]
    fn test_lobby_payload_preserves_team_and_player_order() {
        let lobby = LobbyDataPayload::from_value(lobby_fixture()).unwrap();
        assert_eq!(lobby.player_id, "me");
        assert_eq!(lobby.teams.len(), 2);
        assert_eq!(lobby.teams[0].players.len(), 2);
        assert_eq!(lobby.teams[1].players.len(), 2);
        assert_eq!(lobby.teams[0].name, "crimson");
        assert_eq!(lobby.teams[0].players[0].id, "me");
        assert_eq!(lobby.teams[0].players[1].id, "mate");
        assert_eq!(lobby.server_settings.grid_dimension, 24);
        assert_eq!(lobby.server_settings.ticks, Some(2000));
    }

    #[test]
    fn test_sandbox_settings_have_no_tick_limit() {
        let mut fixture = lobby_fixture();
        let settings = &mut fixture["serverSettings"];
        settings["ticks"] = Value::Null;
        settings["sandboxMode"] = Value::Bool(true);
        settings["matchName"] = Value::Null;
        let lobby = LobbyDataPayload::from_value(fixture).unwrap();
        assert_eq!(lobby.server_settings.ticks, None);
        assert!(lobby.server_settings.sandbox_mode);
        assert_eq!(lobby.server_settings.match_name, None);
    }

    #[test]
    fn test_lobby_payload_missing_field_is_malformed() {
        let err =
            LobbyDataPayload::from_value(json!({ "playerId": "me" })).unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::MalformedPayload { kind: PacketKind::LobbyData, .. }
        ));
    }

    #[test]
    fn test_game_state_payload_decodes_end_to_end() {
        let state = GameStatePayload::from_value(json!({
            "id": "state-42",
            "tick": 42,
            "playerId": "me",
            "teams": [
                { "name": "crimson", "color": 1, "players": [{ "id": "me" }] }
            ],
            "map": {
                "tiles": [[[]]],
                "zones": []
            }
        }))
        .unwrap();
        assert_eq!(state.id, "state-42");
        assert_eq!(state.tick, 42);
        assert_eq!(state.teams[0].players[0].ping, None);
    }

    #[test]
    fn test_game_end_payload_carries_scores() {
        let end = GameEndPayload::from_value(json!({
            "teams": [
                { "name": "crimson", "color": 1, "score": 150, "players": [] },
                { "name": "azure", "color": 2, "score": 80, "players": [] }
            ]
        }))
        .unwrap();
        assert_eq!(end.teams[0].score, Some(150));
        assert_eq!(end.teams[1].score, Some(80));
    }

    // =====================================================================
    // Outbound payloads
    // =====================================================================

    #[test]
    fn test_rotation_payload_skips_absent_directions() {
        let payload = RotationPayload {
            game_state_id: "s".into(),
            tank_rotation: Some(0),
            turret_rotation: None,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            json,
            json!({ "gameStateId": "s", "tankRotation": 0 })
        );

        let neither = RotationPayload {
            game_state_id: "s".into(),
            tank_rotation: None,
            turret_rotation: None,
        };
        let json = serde_json::to_value(&neither).unwrap();
        assert_eq!(json, json!({ "gameStateId": "s" }));
    }

    #[test]
    fn test_go_to_payload_defaults_match_the_protocol() {
        let payload = GoToPayload {
            game_state_id: "s".into(),
            x: 5,
            y: 10,
            costs: GoToCosts::default(),
            penalties: GoToPenalties::default(),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            json,
            json!({
                "gameStateId": "s",
                "x": 5,
                "y": 10,
                "costs": { "forward": 1.0, "backward": 1.5, "rotate": 1.5 },
                "penalties": { "perTile": [] }
            })
        );
    }

    #[test]
    fn test_go_to_payload_serializes_explicit_penalties() {
        let payload = GoToPayload {
            game_state_id: "s".into(),
            x: 1,
            y: 2,
            costs: GoToCosts::default(),
            penalties: GoToPenalties {
                blindly: Some(1.0),
                mine: Some(999.0),
                per_tile: vec![TilePenalty { x: 5, y: 10, penalty: 5.0 }],
                ..GoToPenalties::default()
            },
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["penalties"]["blindly"], 1.0);
        assert_eq!(json["penalties"]["mine"], 999.0);
        assert!(json["penalties"].get("tank").is_none());
        assert_eq!(json["penalties"]["perTile"][0]["penalty"], 5.0);
    }

    #[test]
    fn test_response_payload_wraps_into_tagged_packet() {
        let payload = ResponseActionPayload::Pass(PassPayload {
            game_state_id: "s-1".into(),
        });
        let packet = payload.to_packet().unwrap();
        assert_eq!(packet.packet_type, PacketKind::Pass.code());
        assert_eq!(
            packet.payload.unwrap(),
            json!({ "gameStateId": "s-1" })
        );
    }

    #[test]
    fn test_encoding_is_pure_and_repeatable() {
        let payload = ResponseActionPayload::Movement(MovementPayload {
            game_state_id: "s-2".into(),
            direction: 1,
        });
        let first = payload.to_packet().unwrap();
        let second = payload.to_packet().unwrap();
        assert_eq!(first, second);
    }
}
