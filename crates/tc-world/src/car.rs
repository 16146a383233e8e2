//! Taxis and their movement.

use tc_core::{CarId, PassengerId, Pos, SimTime};
use tc_spatial::{CellCoord, Grid};

use crate::{Path, TileContent};

/// World units a car covers per simulated minute.
pub const CAR_SPEED_PER_MINUTE: f64 = 20.0;

/// Movement loop stops once less than this much distance is left in a tick.
const MIN_REMAINING: f64 = 1.0;

/// A taxi based at a taxi-station tile.
#[derive(Clone, Debug, PartialEq)]
pub struct Car {
    pub(crate) id:          CarId,
    pub(crate) pos:         Pos,
    pub(crate) orientation: f32,
    pub(crate) station:     CellCoord,
    pub(crate) passenger:   Option<PassengerId>,
    pub(crate) path:        Option<Path>,
    speed_per_minute:       f64,
}

impl Car {
    pub fn new(id: CarId, pos: Pos, station: CellCoord) -> Self {
        Self {
            id,
            pos,
            orientation: 0.0,
            station,
            passenger: None,
            path: None,
            speed_per_minute: CAR_SPEED_PER_MINUTE,
        }
    }

    #[inline]
    pub fn id(&self) -> CarId {
        self.id
    }

    #[inline]
    pub fn pos(&self) -> Pos {
        self.pos
    }

    /// Heading in degrees, 0° north, clockwise.
    #[inline]
    pub fn orientation(&self) -> f32 {
        self.orientation
    }

    /// The taxi station this car belongs to.
    #[inline]
    pub fn station(&self) -> CellCoord {
        self.station
    }

    #[inline]
    pub fn passenger(&self) -> Option<PassengerId> {
        self.passenger
    }

    #[inline]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_ref()
    }

    /// No path, or the path has been driven to its end.
    pub fn is_idle(&self) -> bool {
        self.path.as_ref().is_none_or(Path::is_finished)
    }

    /// Drive along the current path for `delta` of simulated time.
    ///
    /// A waypoint whose tile is neither drivable (road, business) nor this
    /// car's own station drops the path and stops the car.  Returns the
    /// distance actually covered.
    pub fn advance(&mut self, tiles: &Grid<TileContent>, delta: SimTime) -> f32 {
        let Some(path) = self.path.as_mut() else {
            return 0.0;
        };
        let mut remaining = self.speed_per_minute * delta.in_minutes_f64();
        let mut travelled = 0.0;
        loop {
            let Some(target) = path.target(self.pos) else {
                break;
            };
            let cell = tiles.nearest_cell(target);
            let content = *tiles.get(cell);
            if !matches!(content, TileContent::Road | TileContent::Business) && cell != self.station {
                self.path = None;
                break;
            }
            if target != self.pos {
                self.orientation = self.pos.heading_to(target);
            }
            let next = self.pos.step_towards(target, remaining);
            let consumed = next.dist(self.pos);
            self.pos = next;
            travelled += consumed;
            remaining -= consumed as f64;
            if remaining <= MIN_REMAINING {
                break;
            }
        }
        travelled
    }
}
