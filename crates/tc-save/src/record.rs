//! Plain-data records that make up a saved game.
//!
//! Field names are camelCase on the wire.  Tiles are stored row-major as
//! their stable [`TileContent::id`][tc_world::TileContent::id] values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use tc_core::{CarId, PassengerId, Pos, SimTime};
use tc_spatial::CellCoord;
use tc_world::TILE_SIZE;

/// Current on-disk format version.
pub const SAVE_FORMAT_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedGame {
    pub version:   u32,
    pub player:    SavedPlayer,
    pub city:      SavedCity,
    /// Elapsed simulated time.
    pub game_time: SimTime,
    #[serde(default)]
    pub growth:    SavedGrowth,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedPlayer {
    pub money:                i64,
    pub delivered_passengers: u32,
    pub missed_passengers:    u32,
    /// Distance driven since the last fuel charge.
    #[serde(default)]
    pub pending_distance:     f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedCity {
    pub last_generated_id:     u32,
    pub width:                 u32,
    pub height:                u32,
    /// World units per tile edge; older saves used the default size.
    #[serde(default = "default_tile_size")]
    pub tile_size:             f32,
    pub tiles:                 Vec<u8>,
    /// Car → passenger it is carrying.
    pub car_passenger_mapping: BTreeMap<CarId, PassengerId>,
    pub passengers:            Vec<SavedPassenger>,
    pub cars:                  Vec<SavedCar>,
}

fn default_tile_size() -> f32 {
    TILE_SIZE
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedPassenger {
    pub id:            PassengerId,
    pub initial_pos:   Pos,
    /// Current position; older saves only have `initial_pos`.
    #[serde(default)]
    pub pos:           Option<Pos>,
    pub target:        CellCoord,
    pub creation_time: SimTime,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedCar {
    pub id:           CarId,
    pub pos:          Pos,
    pub taxi_station: CellCoord,
}

/// Last-fire times of the city's building generators.  `None` means the
/// generator never fired and will fire on the first AI tick.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedGrowth {
    pub last_business: Option<SimTime>,
    pub last_house:    Option<SimTime>,
}
