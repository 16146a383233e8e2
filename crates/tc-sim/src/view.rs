//! Read-only copy of the world published to front-ends.

use tc_core::{CarId, GameSpeed, PassengerId, Pos, SimTime};
use tc_spatial::{CellCoord, Grid};
use tc_world::{Mood, Notification, TileContent, World};

#[derive(Clone, Debug, PartialEq)]
pub struct CarView {
    pub id:          CarId,
    pub pos:         Pos,
    /// Heading in degrees.
    pub orientation: f32,
    pub station:     CellCoord,
    pub passenger:   Option<PassengerId>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PassengerView {
    pub id:     PassengerId,
    pub pos:    Pos,
    pub target: CellCoord,
    pub mood:   Mood,
    pub riding: bool,
}

/// Everything a renderer needs for one frame.
///
/// Published by the game loop whenever [`World::version`] changes; compare
/// `version` to skip redundant redraws.
#[derive(Clone, Debug)]
pub struct WorldView {
    pub version:       u64,
    pub now:           SimTime,
    pub speed:         GameSpeed,
    pub money:         i64,
    pub delivered:     u32,
    pub missed:        u32,
    pub tiles:         Grid<TileContent>,
    pub cars:          Vec<CarView>,
    pub passengers:    Vec<PassengerView>,
    pub notifications: Vec<Notification>,
}

impl WorldView {
    pub fn of(world: &World) -> Self {
        let player = world.player();
        Self {
            version:   world.version(),
            now:       world.now(),
            speed:     world.speed(),
            money:     player.money(),
            delivered: player.delivered(),
            missed:    player.missed(),
            tiles:     world.tiles().clone(),
            cars: world
                .cars()
                .iter()
                .map(|c| CarView {
                    id:          c.id(),
                    pos:         c.pos(),
                    orientation: c.orientation(),
                    station:     c.station(),
                    passenger:   c.passenger(),
                })
                .collect(),
            passengers: world
                .passengers()
                .iter()
                .map(|p| PassengerView {
                    id:     p.id(),
                    pos:    p.pos(),
                    target: p.target(),
                    mood:   p.mood(),
                    riding: !p.is_waiting(),
                })
                .collect(),
            notifications: world.notifications().as_slice().to_vec(),
        }
    }

    pub fn content(&self, cell: CellCoord) -> Option<TileContent> {
        self.tiles.contains(cell).then(|| *self.tiles.get(cell))
    }
}
