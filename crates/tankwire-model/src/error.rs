//! Error types for domain-model building.
//!
//! Like protocol errors, these are local to one message: the session
//! decides what to do with a tick that failed to build. The builder never
//! guesses: an out-of-range code or an impossible zone layout fails the
//! whole snapshot rather than producing a subtly wrong world.

/// Errors that can occur while building a domain snapshot from raw records.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// A raw integer code does not map to any member of its closed enum.
    #[error("invalid {what} code {value}")]
    InvalidEnumValue {
        /// Which enum the code was meant for, e.g. `"direction"`.
        what: &'static str,
        /// The out-of-range code as received.
        value: u8,
    },

    /// A tile is covered by two zone rectangles. At most one zone may
    /// contain any tile; picking one silently would corrupt zone logic.
    #[error("tile ({x}, {y}) lies in both zone {first} and zone {second}")]
    ZoneOverlapViolation {
        x: u32,
        y: u32,
        /// Index of the zone found first.
        first: u8,
        /// Index of the second zone containing the same tile.
        second: u8,
    },

    /// The raw tile grid is not rectangular — a column is shorter or
    /// longer than the first one, so the transpose would be undefined.
    #[error(
        "tile grid is not rectangular: column {column} has {found} tiles, expected {expected}"
    )]
    RaggedTileGrid {
        column: usize,
        expected: usize,
        found: usize,
    },
}
