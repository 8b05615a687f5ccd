//! Response actions: what a bot answers a game state with.
//!
//! A [`ResponseAction`] is built by the bot, then encoded against the id
//! of the game state it answers. Encoding is a pure function of
//! `(action, state id)` — it neither mutates nor retains the action, so
//! encoding twice yields identical payloads.

use tankwire_protocol::{
    AbilityUsePayload, CaptureZonePayload, GoToCosts, GoToPayload,
    GoToPenalties, MovementPayload, PacketKind, PassPayload,
    ResponseActionPayload, RotationPayload,
};

use crate::enums::{Ability, MovementDirection, RotationDirection};

/// The bot's chosen action for one tick.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseAction {
    /// Drive forward or backward.
    Movement(MovementDirection),

    /// Rotate the hull and/or the turret. Either, both, or neither may be
    /// set; neither is valid but a no-op — prefer [`ResponseAction::Pass`]
    /// when no rotation is intended.
    Rotation {
        tank: Option<RotationDirection>,
        turret: Option<RotationDirection>,
    },

    /// Trigger one of the tank's abilities.
    AbilityUse(Ability),

    /// Capture the zone the tank is standing in.
    CaptureZone,

    /// Ask the server to path toward `(x, y)`. The cost and penalty
    /// models are passed through opaquely — pathfinding runs server-side.
    GoTo {
        x: u32,
        y: u32,
        costs: GoToCosts,
        penalties: GoToPenalties,
    },

    /// Explicitly do nothing this tick.
    Pass,
}

impl ResponseAction {
    /// A go-to with protocol-default costs and unconstrained penalties.
    pub fn go_to(x: u32, y: u32) -> Self {
        Self::GoTo {
            x,
            y,
            costs: GoToCosts::default(),
            penalties: GoToPenalties::default(),
        }
    }

    /// The packet kind this action travels under.
    pub fn packet_kind(&self) -> PacketKind {
        match self {
            Self::Movement(_) => PacketKind::Movement,
            Self::Rotation { .. } => PacketKind::Rotation,
            Self::AbilityUse(_) => PacketKind::AbilityUse,
            Self::CaptureZone => PacketKind::CaptureZone,
            Self::GoTo { .. } => PacketKind::GoTo,
            Self::Pass => PacketKind::Pass,
        }
    }

    /// Encodes this action into the payload answering `game_state_id`.
    pub fn to_payload(&self, game_state_id: &str) -> ResponseActionPayload {
        let game_state_id = game_state_id.to_string();
        match self {
            Self::Movement(direction) => {
                ResponseActionPayload::Movement(MovementPayload {
                    game_state_id,
                    direction: *direction as u8,
                })
            }
            Self::Rotation { tank, turret } => {
                ResponseActionPayload::Rotation(RotationPayload {
                    game_state_id,
                    tank_rotation: tank.map(|d| d as u8),
                    turret_rotation: turret.map(|d| d as u8),
                })
            }
            Self::AbilityUse(ability) => {
                ResponseActionPayload::AbilityUse(AbilityUsePayload {
                    game_state_id,
                    ability_type: *ability as u8,
                })
            }
            Self::CaptureZone => {
                ResponseActionPayload::CaptureZone(CaptureZonePayload {
                    game_state_id,
                })
            }
            Self::GoTo {
                x,
                y,
                costs,
                penalties,
            } => ResponseActionPayload::GoTo(GoToPayload {
                game_state_id,
                x: *x,
                y: *y,
                costs: costs.clone(),
                penalties: penalties.clone(),
            }),
            Self::Pass => {
                ResponseActionPayload::Pass(PassPayload { game_state_id })
            }
        }
    }
}
