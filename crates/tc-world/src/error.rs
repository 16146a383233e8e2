use tc_core::{CarId, PassengerId};
use tc_spatial::{CellCoord, SpatialError};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum WorldError {
    #[error("invalid world config: {0}")]
    Config(String),

    #[error("car {0} does not exist")]
    UnknownCar(CarId),

    #[error("passenger {0} does not exist")]
    UnknownPassenger(PassengerId),

    #[error("cell {0} is outside the map")]
    OutOfBounds(CellCoord),

    #[error("{0} already exists")]
    DuplicateId(String),

    #[error("car {car} already carries passenger {passenger}")]
    CarOccupied { car: CarId, passenger: PassengerId },

    #[error("grid error: {0}")]
    Spatial(#[from] SpatialError),
}

pub type WorldResult<T> = Result<T, WorldError>;
