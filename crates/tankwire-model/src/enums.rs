//! Closed enums for every integer code the wire protocol carries.
//!
//! Raw records keep the integers; these enums are the domain-side
//! vocabulary. Coercion goes through `TryFrom<u8>` and fails with
//! [`ModelError::InvalidEnumValue`] on any out-of-range code — there is
//! no catch-all variant anywhere.

use tankwire_protocol::PacketKind;

use crate::ModelError;

/// A tank chassis type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TankType {
    Light = 0,
    Heavy = 1,
}

impl TryFrom<u8> for TankType {
    type Error = ModelError;

    fn try_from(value: u8) -> Result<Self, ModelError> {
        match value {
            0 => Ok(Self::Light),
            1 => Ok(Self::Heavy),
            _ => Err(ModelError::InvalidEnumValue {
                what: "tank type",
                value,
            }),
        }
    }
}

/// A facing on the grid. `Up` is toward row 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Direction {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

impl TryFrom<u8> for Direction {
    type Error = ModelError;

    fn try_from(value: u8) -> Result<Self, ModelError> {
        match value {
            0 => Ok(Self::Up),
            1 => Ok(Self::Right),
            2 => Ok(Self::Down),
            3 => Ok(Self::Left),
            _ => Err(ModelError::InvalidEnumValue {
                what: "direction",
                value,
            }),
        }
    }
}

/// Direction of a movement action, relative to the hull.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MovementDirection {
    Forward = 0,
    Backward = 1,
}

/// Direction of a rotation action. `Left` is counter-clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RotationDirection {
    Left = 0,
    Right = 1,
}

/// Orientation of a laser beam segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Orientation {
    Horizontal = 0,
    Vertical = 1,
}

impl TryFrom<u8> for Orientation {
    type Error = ModelError;

    fn try_from(value: u8) -> Result<Self, ModelError> {
        match value {
            0 => Ok(Self::Horizontal),
            1 => Ok(Self::Vertical),
            _ => Err(ModelError::InvalidEnumValue {
                what: "orientation",
                value,
            }),
        }
    }
}

/// A wall type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum WallType {
    Solid = 0,
    /// Bullets pass through, tanks do not.
    Penetrable = 1,
}

impl TryFrom<u8> for WallType {
    type Error = ModelError;

    fn try_from(value: u8) -> Result<Self, ModelError> {
        match value {
            0 => Ok(Self::Solid),
            1 => Ok(Self::Penetrable),
            _ => Err(ModelError::InvalidEnumValue {
                what: "wall type",
                value,
            }),
        }
    }
}

/// A bullet type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BulletType {
    Basic = 0,
    Double = 1,
    Healing = 2,
    Stun = 3,
}

impl TryFrom<u8> for BulletType {
    type Error = ModelError;

    fn try_from(value: u8) -> Result<Self, ModelError> {
        match value {
            0 => Ok(Self::Basic),
            1 => Ok(Self::Double),
            2 => Ok(Self::Healing),
            3 => Ok(Self::Stun),
            _ => Err(ModelError::InvalidEnumValue {
                what: "bullet type",
                value,
            }),
        }
    }
}

/// The closed set of tank abilities a bot can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Ability {
    FireBullet = 0,
    UseLaser = 1,
    FireDoubleBullet = 2,
    UseRadar = 3,
    DropMine = 4,
    FireHealingBullet = 5,
    FireStunBullet = 6,
}

/// The kind of a server warning, derived from its packet kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningKind {
    /// Free-form warning with a message payload.
    Custom,
    /// The bot already responded to this tick.
    PlayerAlreadyMadeAction,
    /// The action was ignored because the bot's tank is dead.
    ActionIgnoredDueToDead,
    /// The response arrived after the tick deadline.
    SlowResponse,
}

impl WarningKind {
    /// Maps a warning-group packet kind to its warning kind. Returns
    /// `None` for packets outside the warning group.
    pub fn from_packet_kind(kind: PacketKind) -> Option<Self> {
        match kind {
            PacketKind::CustomWarning => Some(Self::Custom),
            PacketKind::PlayerAlreadyMadeAction => {
                Some(Self::PlayerAlreadyMadeAction)
            }
            PacketKind::ActionIgnoredDueToDead => {
                Some(Self::ActionIgnoredDueToDead)
            }
            PacketKind::SlowResponse => Some(Self::SlowResponse),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_coercion_covers_all_codes() {
        assert_eq!(Direction::try_from(0).unwrap(), Direction::Up);
        assert_eq!(Direction::try_from(3).unwrap(), Direction::Left);
        assert!(matches!(
            Direction::try_from(4),
            Err(ModelError::InvalidEnumValue { what: "direction", value: 4 })
        ));
    }

    #[test]
    fn test_bullet_type_rejects_out_of_range() {
        assert_eq!(BulletType::try_from(3).unwrap(), BulletType::Stun);
        assert!(BulletType::try_from(4).is_err());
    }

    #[test]
    fn test_wall_type_rejects_out_of_range() {
        assert_eq!(WallType::try_from(1).unwrap(), WallType::Penetrable);
        assert!(WallType::try_from(2).is_err());
    }

    #[test]
    fn test_warning_kind_only_maps_warning_packets() {
        assert_eq!(
            WarningKind::from_packet_kind(PacketKind::SlowResponse),
            Some(WarningKind::SlowResponse)
        );
        assert_eq!(WarningKind::from_packet_kind(PacketKind::Ping), None);
    }

    #[test]
    fn test_ability_codes_match_the_wire() {
        assert_eq!(Ability::FireBullet as u8, 0);
        assert_eq!(Ability::UseLaser as u8, 1);
        assert_eq!(Ability::FireDoubleBullet as u8, 2);
        assert_eq!(Ability::UseRadar as u8, 3);
        assert_eq!(Ability::DropMine as u8, 4);
        assert_eq!(Ability::FireHealingBullet as u8, 5);
        assert_eq!(Ability::FireStunBullet as u8, 6);
    }
}
