//! Domain tile entities: the enriched counterparts of the raw records.
//!
//! Integer codes become closed enums here, the turret merges into its
//! tank, and own-team-only fields stay `None` for opponents; absent
//! means "unknowable from my side of the fog", never zero.

use tankwire_protocol::{
    RawBullet, RawLaser, RawMine, RawTank, RawTileEntity, RawTurret, RawWall,
};

use crate::enums::{BulletType, Direction, Orientation, TankType, WallType};
use crate::ModelError;

/// A wall segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Wall {
    pub wall_type: WallType,
}

impl Wall {
    pub(crate) fn from_raw(raw: RawWall) -> Result<Self, ModelError> {
        Ok(Self {
            wall_type: WallType::try_from(raw.wall_type)?,
        })
    }
}

/// A bullet in flight.
///
/// Speed and direction are `None` when the observer's visibility cannot
/// establish them.
#[derive(Debug, Clone, PartialEq)]
pub struct Bullet {
    pub id: u64,
    pub speed: Option<f64>,
    pub direction: Option<Direction>,
    pub bullet_type: BulletType,
}

impl Bullet {
    pub(crate) fn from_raw(raw: RawBullet) -> Result<Self, ModelError> {
        Ok(Self {
            id: raw.id,
            speed: raw.speed,
            direction: raw.direction.map(Direction::try_from).transpose()?,
            bullet_type: BulletType::try_from(raw.bullet_type)?,
        })
    }
}

/// A laser beam segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Laser {
    pub id: u64,
    pub orientation: Orientation,
}

impl Laser {
    pub(crate) fn from_raw(raw: RawLaser) -> Result<Self, ModelError> {
        Ok(Self {
            id: raw.id,
            orientation: Orientation::try_from(raw.orientation)?,
        })
    }
}

/// A mine lying on a tile.
#[derive(Debug, Clone, PartialEq)]
pub struct Mine {
    pub id: u64,
    /// Remaining explosion animation ticks; present only after the mine
    /// has gone off.
    pub explosion_remaining_ticks: Option<u32>,
}

impl Mine {
    /// Whether the mine has exploded.
    ///
    /// Derived from the presence of the remaining-ticks field on every
    /// call — it only ever changes through a new snapshot.
    pub fn exploded(&self) -> bool {
        self.explosion_remaining_ticks.is_some()
    }

    pub(crate) fn from_raw(raw: RawMine) -> Result<Self, ModelError> {
        Ok(Self {
            id: raw.id,
            explosion_remaining_ticks: raw.explosion_remaining_ticks,
        })
    }
}

/// A tank's turret, converted before the tank it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct Turret {
    pub direction: Direction,
    /// Loaded bullets. Own team only.
    pub bullet_count: Option<u32>,
    pub ticks_to_bullet: Option<u32>,
    pub ticks_to_double_bullet: Option<u32>,
    pub ticks_to_laser: Option<u32>,
    pub ticks_to_healing_bullet: Option<u32>,
    pub ticks_to_stun_bullet: Option<u32>,
}

impl Turret {
    pub(crate) fn from_raw(raw: RawTurret) -> Result<Self, ModelError> {
        Ok(Self {
            direction: Direction::try_from(raw.direction)?,
            bullet_count: raw.bullet_count,
            ticks_to_bullet: raw.ticks_to_bullet,
            ticks_to_double_bullet: raw.ticks_to_double_bullet,
            ticks_to_laser: raw.ticks_to_laser,
            ticks_to_healing_bullet: raw.ticks_to_healing_bullet,
            ticks_to_stun_bullet: raw.ticks_to_stun_bullet,
        })
    }
}

/// A tank on the grid, with its turret merged in.
///
/// `health`, the cooldowns, and `visibility` are populated for the own
/// team only; opposing tanks keep them `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Tank {
    pub owner_id: String,
    pub tank_type: TankType,
    pub direction: Direction,
    pub turret: Turret,
    pub health: Option<u32>,
    pub ticks_to_radar: Option<u32>,
    pub is_using_radar: Option<bool>,
    pub ticks_to_mine: Option<u32>,
    /// Per-tile visibility, indexed `[y][x]` like the domain map.
    pub visibility: Option<Vec<Vec<bool>>>,
}

impl Tank {
    pub(crate) fn from_raw(raw: RawTank) -> Result<Self, ModelError> {
        // The turret converts first; its failure fails the tank.
        let turret = Turret::from_raw(raw.turret)?;
        Ok(Self {
            owner_id: raw.owner_id,
            tank_type: TankType::try_from(raw.tank_type)?,
            direction: Direction::try_from(raw.direction)?,
            turret,
            health: raw.health,
            ticks_to_radar: raw.ticks_to_radar,
            is_using_radar: raw.is_using_radar,
            ticks_to_mine: raw.ticks_to_mine,
            visibility: raw.visibility,
        })
    }
}

/// One entity occupying a tile.
#[derive(Debug, Clone, PartialEq)]
pub enum TileEntity {
    Wall(Wall),
    Bullet(Bullet),
    Laser(Laser),
    Mine(Mine),
    Tank(Tank),
}

impl TileEntity {
    /// Converts a raw entity, coercing every integer code it carries.
    pub(crate) fn from_raw(raw: RawTileEntity) -> Result<Self, ModelError> {
        Ok(match raw {
            RawTileEntity::Wall(w) => Self::Wall(Wall::from_raw(w)?),
            RawTileEntity::Bullet(b) => Self::Bullet(Bullet::from_raw(b)?),
            RawTileEntity::Laser(l) => Self::Laser(Laser::from_raw(l)?),
            RawTileEntity::Mine(m) => Self::Mine(Mine::from_raw(m)?),
            RawTileEntity::Tank(t) => Self::Tank(Tank::from_raw(t)?),
        })
    }

    /// The tank inside, if this entity is one.
    pub fn as_tank(&self) -> Option<&Tank> {
        match self {
            Self::Tank(tank) => Some(tank),
            _ => None,
        }
    }

    /// The wall inside, if this entity is one.
    pub fn as_wall(&self) -> Option<&Wall> {
        match self {
            Self::Wall(wall) => Some(wall),
            _ => None,
        }
    }

    /// The bullet inside, if this entity is one.
    pub fn as_bullet(&self) -> Option<&Bullet> {
        match self {
            Self::Bullet(bullet) => Some(bullet),
            _ => None,
        }
    }

    /// The laser inside, if this entity is one.
    pub fn as_laser(&self) -> Option<&Laser> {
        match self {
            Self::Laser(laser) => Some(laser),
            _ => None,
        }
    }

    /// The mine inside, if this entity is one.
    pub fn as_mine(&self) -> Option<&Mine> {
        match self {
            Self::Mine(mine) => Some(mine),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_turret(direction: u8) -> RawTurret {
        RawTurret {
            direction,
            bullet_count: None,
            ticks_to_bullet: None,
            ticks_to_double_bullet: None,
            ticks_to_laser: None,
            ticks_to_healing_bullet: None,
            ticks_to_stun_bullet: None,
        }
    }

    #[test]
    fn test_mine_exploded_is_derived_from_tick_presence() {
        let armed = Mine {
            id: 1,
            explosion_remaining_ticks: None,
        };
        assert!(!armed.exploded());

        let exploded = Mine {
            id: 1,
            explosion_remaining_ticks: Some(0),
        };
        // Present-with-zero still means exploded; presence is the flag.
        assert!(exploded.exploded());
        // Idempotent across repeated reads of the same snapshot.
        assert!(exploded.exploded());
    }

    #[test]
    fn test_tank_conversion_merges_turret_and_coerces_codes() {
        let tank = Tank::from_raw(RawTank {
            owner_id: "p-1".into(),
            tank_type: 1,
            direction: 2,
            turret: raw_turret(3),
            health: Some(55),
            ticks_to_radar: None,
            is_using_radar: None,
            ticks_to_mine: None,
            visibility: None,
        })
        .unwrap();
        assert_eq!(tank.tank_type, TankType::Heavy);
        assert_eq!(tank.direction, Direction::Down);
        assert_eq!(tank.turret.direction, Direction::Left);
        assert_eq!(tank.health, Some(55));
    }

    #[test]
    fn test_out_of_range_turret_direction_fails_the_tank() {
        let err = Tank::from_raw(RawTank {
            owner_id: "p-1".into(),
            tank_type: 0,
            direction: 0,
            turret: raw_turret(7),
            health: None,
            ticks_to_radar: None,
            is_using_radar: None,
            ticks_to_mine: None,
            visibility: None,
        })
        .unwrap_err();
        assert!(matches!(
            err,
            ModelError::InvalidEnumValue { what: "direction", value: 7 }
        ));
    }

    #[test]
    fn test_bullet_keeps_unknown_speed_and_direction_absent() {
        let bullet = Bullet::from_raw(RawBullet {
            id: 3,
            speed: None,
            direction: None,
            bullet_type: 2,
        })
        .unwrap();
        assert_eq!(bullet.speed, None);
        assert_eq!(bullet.direction, None);
        assert_eq!(bullet.bullet_type, BulletType::Healing);
    }
}
