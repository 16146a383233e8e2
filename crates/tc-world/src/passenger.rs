//! Passengers waiting for, or riding in, a taxi.

use std::fmt;

use tc_core::{CarId, PassengerId, Pos, SimTime};
use tc_spatial::CellCoord;

/// How a waiting passenger feels about the wait so far.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mood {
    #[default]
    New,
    Ok,
    GettingUpset,
    Upset,
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mood::New          => "new",
            Mood::Ok           => "ok",
            Mood::GettingUpset => "getting upset",
            Mood::Upset        => "upset",
        };
        f.write_str(name)
    }
}

/// A passenger heading for a business tile.
#[derive(Clone, Debug, PartialEq)]
pub struct Passenger {
    pub(crate) id:            PassengerId,
    pub(crate) pos:           Pos,
    pub(crate) initial_pos:   Pos,
    pub(crate) target:        CellCoord,
    pub(crate) creation_time: SimTime,
    pub(crate) car:           Option<CarId>,
    pub(crate) mood:          Mood,
}

impl Passenger {
    pub fn new(id: PassengerId, pos: Pos, target: CellCoord, creation_time: SimTime) -> Self {
        Self {
            id,
            pos,
            initial_pos: pos,
            target,
            creation_time,
            car: None,
            mood: Mood::New,
        }
    }

    /// The same passenger, currently at `pos`.  The spawn point is kept.
    pub fn with_pos(mut self, pos: Pos) -> Self {
        self.pos = pos;
        self
    }

    #[inline]
    pub fn id(&self) -> PassengerId {
        self.id
    }

    #[inline]
    pub fn pos(&self) -> Pos {
        self.pos
    }

    /// Where the passenger spawned; the delivery fee is based on the
    /// distance from here.
    #[inline]
    pub fn initial_pos(&self) -> Pos {
        self.initial_pos
    }

    /// Destination business tile.
    #[inline]
    pub fn target(&self) -> CellCoord {
        self.target
    }

    #[inline]
    pub fn creation_time(&self) -> SimTime {
        self.creation_time
    }

    #[inline]
    pub fn car(&self) -> Option<CarId> {
        self.car
    }

    #[inline]
    pub fn mood(&self) -> Mood {
        self.mood
    }

    #[inline]
    pub fn is_waiting(&self) -> bool {
        self.car.is_none()
    }

    /// Time spent since spawning.
    pub fn waited(&self, now: SimTime) -> SimTime {
        now.saturating_since(self.creation_time)
    }
}
