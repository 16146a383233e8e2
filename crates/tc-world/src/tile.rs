//! Tile contents.

use std::fmt;

/// What occupies a map tile.
///
/// The numeric ids returned by [`TileContent::id`] are part of the save
/// format and must never be renumbered.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TileContent {
    #[default]
    Grass,
    Road,
    House,
    Business,
    TaxiStation,
}

impl TileContent {
    pub const ALL: [TileContent; 5] = [
        TileContent::Grass,
        TileContent::Road,
        TileContent::House,
        TileContent::Business,
        TileContent::TaxiStation,
    ];

    /// Stable persistence id.
    pub fn id(self) -> u8 {
        match self {
            TileContent::Grass       => 0,
            TileContent::Road        => 1,
            TileContent::House       => 2,
            TileContent::Business    => 3,
            TileContent::TaxiStation => 4,
        }
    }

    pub fn from_id(id: u8) -> Option<TileContent> {
        TileContent::ALL.into_iter().find(|c| c.id() == id)
    }

    /// Whether route searches may expand through this tile.
    #[inline]
    pub fn can_car_go(self) -> bool {
        matches!(self, TileContent::Road | TileContent::Business | TileContent::TaxiStation)
    }
}

impl fmt::Display for TileContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TileContent::Grass       => "grass",
            TileContent::Road        => "road",
            TileContent::House       => "house",
            TileContent::Business    => "business",
            TileContent::TaxiStation => "taxi station",
        };
        f.write_str(name)
    }
}
