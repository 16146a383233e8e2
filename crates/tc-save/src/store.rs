//! World ⇄ record conversion and save files.
//!
//! Restoring re-seats every passenger listed in the car → passenger mapping
//! and resumes id generation above the highest id in the file.  Any
//! inconsistency (bad tile id, wrong tile count, dangling reference) fails
//! the whole load; callers fall back to a fresh world.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use rustc_hash::FxHashSet;
use tracing::{debug, info};

use tc_core::IdGenerator;
use tc_spatial::Grid;
use tc_world::{Car, Passenger, Player, TileContent, World, WorldError};

use crate::record::{SavedCar, SavedCity, SavedGame, SavedGrowth, SavedPassenger, SavedPlayer, SAVE_FORMAT_VERSION};
use crate::{SaveCodec, SaveError, SaveResult};

/// A world rebuilt from a save, plus the generator state stored beside it.
#[derive(Debug)]
pub struct RestoredGame {
    pub world:  World,
    pub growth: SavedGrowth,
}

// ── Capture ───────────────────────────────────────────────────────────────────

pub fn capture(world: &World, growth: SavedGrowth) -> SavedGame {
    let player = world.player();
    let tiles = world.tiles();
    SavedGame {
        version: SAVE_FORMAT_VERSION,
        player: SavedPlayer {
            money:                player.money(),
            delivered_passengers: player.delivered(),
            missed_passengers:    player.missed(),
            pending_distance:     player.pending_distance(),
        },
        city: SavedCity {
            last_generated_id: world.ids().last_issued(),
            width:             tiles.width(),
            height:            tiles.height(),
            tile_size:         tiles.unit_size(),
            tiles:             tiles.cells().iter().map(|t| t.id()).collect(),
            car_passenger_mapping: world
                .cars()
                .iter()
                .filter_map(|car| car.passenger().map(|p| (car.id(), p)))
                .collect(),
            passengers: world
                .passengers()
                .iter()
                .map(|p| SavedPassenger {
                    id:            p.id(),
                    initial_pos:   p.initial_pos(),
                    pos:           Some(p.pos()),
                    target:        p.target(),
                    creation_time: p.creation_time(),
                })
                .collect(),
            cars: world
                .cars()
                .iter()
                .map(|car| SavedCar { id: car.id(), pos: car.pos(), taxi_station: car.station() })
                .collect(),
        },
        game_time: world.now(),
        growth,
    }
}

// ── Restore ───────────────────────────────────────────────────────────────────

/// Rebuild a paused world from `game`.  `seed` seeds the world's placement
/// RNG, which is not part of the save.
pub fn restore(game: &SavedGame, seed: u64) -> SaveResult<RestoredGame> {
    if game.version != SAVE_FORMAT_VERSION {
        return Err(SaveError::UnsupportedVersion { found: game.version, expected: SAVE_FORMAT_VERSION });
    }
    let city = &game.city;

    let contents = city
        .tiles
        .iter()
        .enumerate()
        .map(|(i, &id)| {
            TileContent::from_id(id).ok_or_else(|| SaveError::Corrupt(format!("unknown tile id {id} at index {i}")))
        })
        .collect::<SaveResult<Vec<_>>>()?;
    if !city.tile_size.is_finite() || city.tile_size <= 0.0 {
        return Err(SaveError::Corrupt(format!("tile size must be positive, got {}", city.tile_size)));
    }
    let tiles = Grid::new(city.width, city.height, city.tile_size, contents).map_err(WorldError::from)?;

    let saved = &game.player;
    let player = Player::with_counters(saved.money, saved.delivered_passengers, saved.missed_passengers)
        .with_pending_distance(saved.pending_distance);

    let mut world = World::from_parts(tiles, player, game.game_time, IdGenerator::new(city.last_generated_id), seed);
    for p in &city.passengers {
        let passenger = Passenger::new(p.id, p.initial_pos, p.target, p.creation_time)
            .with_pos(p.pos.unwrap_or(p.initial_pos));
        world.insert_passenger(passenger)?;
    }
    for c in &city.cars {
        world.insert_car(Car::new(c.id, c.pos, c.taxi_station))?;
    }

    let mut seated = FxHashSet::default();
    for (&car, &passenger) in &city.car_passenger_mapping {
        if !seated.insert(passenger) {
            return Err(SaveError::Corrupt(format!("passenger {passenger} is in more than one car")));
        }
        world.associate(passenger, car)?;
    }

    debug!(
        cars = city.cars.len(),
        passengers = city.passengers.len(),
        last_id = world.ids().last_issued(),
        "world restored"
    );
    Ok(RestoredGame { world, growth: game.growth })
}

// ── Files ─────────────────────────────────────────────────────────────────────

/// Encode `game` and write it to `path`, replacing any previous save.
///
/// The bytes go to a sibling temp file first and are renamed into place, so
/// an interrupted save leaves the old file intact.
pub fn save_to_path<C: SaveCodec + ?Sized>(codec: &C, game: &SavedGame, path: &Path) -> SaveResult<()> {
    let bytes = codec.encode(game)?;
    let tmp = path.with_extension(format!("{}.tmp", codec.extension()));
    fs::write(&tmp, &bytes)?;
    fs::rename(&tmp, path)?;
    info!(path = %path.display(), bytes = bytes.len(), "game saved");
    Ok(())
}

/// Read and decode the save at `path`.  `Ok(None)` if there is no file.
pub fn load_from_path<C: SaveCodec + ?Sized>(codec: &C, path: &Path) -> SaveResult<Option<SavedGame>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    let game = codec.decode(&bytes)?;
    info!(path = %path.display(), bytes = bytes.len(), "game loaded");
    Ok(Some(game))
}
