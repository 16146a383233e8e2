//! Immutable per-AI-tick copy of the world.
//!
//! A [`Snapshot`] is captured once per AI tick by whoever owns the world
//! (the event consumer), handed to every [`AiSystem`][crate::AiSystem], and
//! dropped once their events have been produced.  Nothing in it refers back
//! into the live world, so AI work can run on another thread while the
//! world keeps moving.

use tc_core::{CarId, PassengerId, Pos, SimTime};
use tc_spatial::{CellCoord, Grid};
use tc_world::{Mood, TileContent, World};

#[derive(Clone, Debug, PartialEq)]
pub struct TileSnapshot {
    pub coord:      CellCoord,
    pub content:    TileContent,
    /// Waiting passengers whose nearest tile is this one.
    pub passengers: Vec<PassengerId>,
    /// Cars whose nearest tile is this one.
    pub cars:       Vec<CarId>,
}

impl TileSnapshot {
    #[inline]
    pub fn has_passenger(&self) -> bool {
        !self.passengers.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CarSnapshot {
    pub id:               CarId,
    pub pos:              Pos,
    /// Destination of the passenger on board, if any.
    pub committed_target: Option<CellCoord>,
    /// Home taxi station.
    pub base:             CellCoord,
}

/// A passenger still waiting to be picked up.
#[derive(Clone, Debug, PartialEq)]
pub struct PassengerSnapshot {
    pub id:            PassengerId,
    pub pos:           Pos,
    pub mood:          Mood,
    pub creation_time: SimTime,
}

#[derive(Clone, Debug)]
pub struct Snapshot {
    pub grid:           Grid<TileSnapshot>,
    pub cars:           Vec<CarSnapshot>,
    pub waiting:        Vec<PassengerSnapshot>,
    pub house_tiles:    Vec<CellCoord>,
    pub business_tiles: Vec<CellCoord>,
    pub now:            SimTime,
    /// [`World::version`] at capture time.
    pub version:        u64,
}

impl Snapshot {
    pub fn capture(world: &World) -> Snapshot {
        let mut grid = world.tiles().map(|coord, &content| TileSnapshot {
            coord,
            content,
            passengers: Vec::new(),
            cars: Vec::new(),
        });

        let cars = world
            .cars()
            .iter()
            .map(|car| {
                grid.get_mut(grid.nearest_cell(car.pos())).cars.push(car.id());
                CarSnapshot {
                    id:               car.id(),
                    pos:              car.pos(),
                    committed_target: car.passenger().and_then(|p| world.passenger(p)).map(|p| p.target()),
                    base:             car.station(),
                }
            })
            .collect();

        let waiting = world
            .passengers()
            .iter()
            .filter(|p| p.is_waiting())
            .map(|p| {
                grid.get_mut(grid.nearest_cell(p.pos())).passengers.push(p.id());
                PassengerSnapshot {
                    id:            p.id(),
                    pos:           p.pos(),
                    mood:          p.mood(),
                    creation_time: p.creation_time(),
                }
            })
            .collect();

        Snapshot {
            grid,
            cars,
            waiting,
            house_tiles: world.house_tiles().to_vec(),
            business_tiles: world.business_tiles().to_vec(),
            now: world.now(),
            version: world.version(),
        }
    }

    #[inline]
    pub fn tile(&self, cell: CellCoord) -> &TileSnapshot {
        self.grid.get(cell)
    }

    #[inline]
    pub fn nearest_tile(&self, pos: Pos) -> &TileSnapshot {
        self.grid.get(self.grid.nearest_cell(pos))
    }

    #[inline]
    pub fn has_waiting_passengers(&self) -> bool {
        !self.waiting.is_empty()
    }
}
