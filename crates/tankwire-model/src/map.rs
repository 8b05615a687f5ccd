//! The domain map: tiles, zones, and the raw→domain assembly pass.
//!
//! The wire transmits tiles column-major (`tiles[x][y]`); the domain map
//! is row-major (`tiles[y][x]`) so "row" and "y" coincide for every
//! consumer. The transpose is a deliberate build step, performed once per
//! tick in O(n²), and tested as such.

use std::collections::HashMap;

use tankwire_protocol::{RawMap, RawZone};

use crate::entity::{Tank, TileEntity};
use crate::ModelError;

// ---------------------------------------------------------------------------
// Zone
// ---------------------------------------------------------------------------

/// A rectangular capturable area.
#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Zone identifier, the character code of its display letter.
    pub index: u8,
    /// Captured share per team name, each in `0.0..=1.0`. Shares need not
    /// sum to 1 across teams — contested and unclaimed area is unowned.
    pub shares: HashMap<String, f64>,
}

impl Zone {
    /// Whether the tile at `(x, y)` lies inside this zone's rectangle.
    /// Bounds are half-open: `x ∈ [self.x, self.x + width)`.
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x
            && x < self.x + self.width
            && y >= self.y
            && y < self.y + self.height
    }
}

impl From<RawZone> for Zone {
    fn from(raw: RawZone) -> Self {
        Self {
            x: raw.x,
            y: raw.y,
            width: raw.width,
            height: raw.height,
            index: raw.index,
            shares: raw.shares,
        }
    }
}

// ---------------------------------------------------------------------------
// Tile
// ---------------------------------------------------------------------------

/// One grid cell: every entity occupying it, plus the zone covering it.
///
/// Entities keep their wire transmission order, which is *not* physically
/// meaningful: a tank and a bullet can share a tile in either order.
/// Consumers must scan the whole list for the kind they care about; the
/// accessors here do exactly that.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    entities: Vec<TileEntity>,
    zone: Option<Zone>,
}

impl Tile {
    /// All entities on this tile, in transmission order.
    pub fn entities(&self) -> &[TileEntity] {
        &self.entities
    }

    /// The zone covering this tile, if any.
    pub fn zone(&self) -> Option<&Zone> {
        self.zone.as_ref()
    }

    /// The first tank on this tile, scanning every entity.
    pub fn tank(&self) -> Option<&Tank> {
        self.entities.iter().find_map(TileEntity::as_tank)
    }

    /// Whether any entity on this tile is a solid or penetrable wall.
    pub fn has_wall(&self) -> bool {
        self.entities.iter().any(|e| e.as_wall().is_some())
    }

    /// Whether no entity occupies this tile.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

// ---------------------------------------------------------------------------
// GameMap
// ---------------------------------------------------------------------------

/// The assembled grid for one tick: row-major tiles plus the zone list.
#[derive(Debug, Clone, PartialEq)]
pub struct GameMap {
    /// Rows of tiles; `tiles[y][x]` addresses column x of row y.
    tiles: Vec<Vec<Tile>>,
    zones: Vec<Zone>,
}

impl GameMap {
    /// Builds the domain map from its raw counterpart.
    ///
    /// Build order per tick: zones convert first, then every tile's
    /// entities (enum coercion) and its zone attachment, then the grid is
    /// transposed from wire `[x][y]` to domain `[y][x]`.
    ///
    /// # Errors
    /// - [`ModelError::InvalidEnumValue`] for an out-of-range entity code,
    /// - [`ModelError::ZoneOverlapViolation`] when two zones cover one tile,
    /// - [`ModelError::RaggedTileGrid`] when columns differ in length.
    pub fn from_raw(raw: RawMap) -> Result<Self, ModelError> {
        let zones: Vec<Zone> = raw.zones.into_iter().map(Zone::from).collect();

        let height = raw.tiles.first().map_or(0, Vec::len);

        // Convert in wire order first: columns[x][y].
        let mut columns: Vec<Vec<Tile>> = Vec::with_capacity(raw.tiles.len());
        for (x, raw_column) in raw.tiles.into_iter().enumerate() {
            if raw_column.len() != height {
                return Err(ModelError::RaggedTileGrid {
                    column: x,
                    expected: height,
                    found: raw_column.len(),
                });
            }
            let mut column = Vec::with_capacity(height);
            for (y, raw_tile) in raw_column.into_iter().enumerate() {
                let entities = raw_tile
                    .into_iter()
                    .map(|obj| TileEntity::from_raw(obj.entity))
                    .collect::<Result<Vec<_>, _>>()?;
                let zone = zone_at(&zones, x as u32, y as u32)?.cloned();
                column.push(Tile { entities, zone });
            }
            columns.push(column);
        }

        Ok(Self {
            tiles: transpose(columns),
            zones,
        })
    }

    /// Rows of tiles, outer index y.
    pub fn tiles(&self) -> &[Vec<Tile>] {
        &self.tiles
    }

    /// All zones on the map.
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    /// Side length of the (square) grid.
    pub fn dimension(&self) -> usize {
        self.tiles.len()
    }

    /// The tile at `(x, y)`, or `None` outside the grid.
    pub fn tile(&self, x: u32, y: u32) -> Option<&Tile> {
        self.tiles.get(y as usize)?.get(x as usize)
    }
}

/// Finds the single zone containing `(x, y)`.
///
/// # Errors
/// [`ModelError::ZoneOverlapViolation`] when a second zone also contains
/// the tile — the invariant says at most one may, and picking one silently
/// would hide corrupt data.
fn zone_at(zones: &[Zone], x: u32, y: u32) -> Result<Option<&Zone>, ModelError> {
    let mut found: Option<&Zone> = None;
    for zone in zones {
        if zone.contains(x, y) {
            if let Some(first) = found {
                return Err(ModelError::ZoneOverlapViolation {
                    x,
                    y,
                    first: first.index,
                    second: zone.index,
                });
            }
            found = Some(zone);
        }
    }
    Ok(found)
}

/// Transposes `columns[x][y]` into `rows[y][x]`, moving every tile once.
fn transpose(columns: Vec<Vec<Tile>>) -> Vec<Vec<Tile>> {
    let width = columns.len();
    let height = columns.first().map_or(0, Vec::len);
    let mut rows: Vec<Vec<Tile>> =
        (0..height).map(|_| Vec::with_capacity(width)).collect();
    for column in columns {
        for (y, tile) in column.into_iter().enumerate() {
            rows[y].push(tile);
        }
    }
    rows
}
