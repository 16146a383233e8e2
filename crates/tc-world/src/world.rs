//! The mutable world: map, entities, economy, and clock.
//!
//! # Ownership
//!
//! A `World` has exactly one writer at a time.  In the real-time loop that
//! is the event consumer task; everything else reads snapshots or published
//! views.  All mutation goes through the methods below, each of which bumps
//! [`World::version`] when it changes anything.
//!
//! # Physics tick
//!
//! [`World::advance_physics`] is the fast-tick body:
//!
//! 1. advance the clock by the current speed's step (nothing at all while
//!    paused),
//! 2. drive every car along its path,
//! 3. carried passengers follow their car,
//! 4. idle cars pick up waiting passengers on the same tile,
//! 5. carried passengers within half a tile of their destination are
//!    delivered and paid for,
//! 6. fuel is charged for the distance driven.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace};

use tc_core::{CarId, GameClock, GameSpeed, IdGenerator, NotificationId, PassengerId, Pos, SimRng, SimTime};
use tc_spatial::{CellCoord, Grid};

use crate::notification::{NotificationKind, Notifications};
use crate::player::{COST_OF_CAR, COST_OF_ROAD, COST_OF_TAXI_STATION};
use crate::{Car, Mood, Passenger, Path, Player, TileContent, WorldError, WorldResult};

/// Default edge length of a tile in world units.
pub const TILE_SIZE: f32 = 64.0;

/// Attempts made by [`World::try_random_tile`] before giving up.
const RANDOM_TILE_TRIES: usize = 10;

// ── WorldConfig ───────────────────────────────────────────────────────────────

/// Initial map and economy settings for a fresh world.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WorldConfig {
    pub width:          u32,
    pub height:         u32,
    pub tile_size:      f32,
    pub starting_money: i64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width:          20,
            height:         20,
            tile_size:      TILE_SIZE,
            starting_money: 2_000,
        }
    }
}

impl WorldConfig {
    pub fn validate(&self) -> WorldResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(WorldError::Config(format!(
                "map must be at least 1x1, got {}x{}",
                self.width, self.height
            )));
        }
        if !self.tile_size.is_finite() || self.tile_size <= 0.0 {
            return Err(WorldError::Config(format!("tile_size must be positive, got {}", self.tile_size)));
        }
        Ok(())
    }
}

// ── PhysicsReport ─────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Delivery {
    pub passenger: PassengerId,
    pub car:       Option<CarId>,
    pub fee:       i64,
}

/// What one fast tick did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PhysicsReport {
    /// Simulated time advanced; zero while paused.
    pub advanced:  SimTime,
    /// Total distance driven by all cars.
    pub distance:  f32,
    pub picked_up: Vec<(PassengerId, CarId)>,
    pub delivered: Vec<Delivery>,
    pub fuel_cost: i64,
}

// ── World ─────────────────────────────────────────────────────────────────────

pub struct World {
    tiles:          Grid<TileContent>,
    cars:           Vec<Car>,
    passengers:     Vec<Passenger>,
    house_tiles:    Vec<CellCoord>,
    business_tiles: Vec<CellCoord>,
    ids:            IdGenerator,
    player:         Player,
    clock:          GameClock,
    notifications:  Notifications,
    rng:            SimRng,
    version:        u64,
}

impl World {
    /// An all-grass map sized by `config`, clock paused at zero.
    pub fn new(config: &WorldConfig, seed: u64) -> WorldResult<Self> {
        config.validate()?;
        let tiles = Grid::filled(config.width, config.height, config.tile_size, TileContent::Grass)?;
        Ok(Self::from_parts(
            tiles,
            Player::new(config.starting_money),
            SimTime::ZERO,
            IdGenerator::default(),
            seed,
        ))
    }

    /// Assemble a world around an existing map, e.g. when loading a save.
    /// Cars and passengers are added afterwards with
    /// [`insert_car`][Self::insert_car] / [`insert_passenger`][Self::insert_passenger].
    pub fn from_parts(
        tiles:  Grid<TileContent>,
        player: Player,
        now:    SimTime,
        ids:    IdGenerator,
        seed:   u64,
    ) -> Self {
        let house_tiles = cells_with(&tiles, TileContent::House);
        let business_tiles = cells_with(&tiles, TileContent::Business);
        Self {
            tiles,
            cars: Vec::new(),
            passengers: Vec::new(),
            house_tiles,
            business_tiles,
            ids,
            player,
            clock: GameClock::starting_at(now),
            notifications: Notifications::default(),
            rng: SimRng::new(seed),
            version: 0,
        }
    }

    // ── Read access ───────────────────────────────────────────────────────

    #[inline]
    pub fn tiles(&self) -> &Grid<TileContent> {
        &self.tiles
    }

    /// Content of `cell`, `None` outside the map.
    pub fn content(&self, cell: CellCoord) -> Option<TileContent> {
        self.tiles.contains(cell).then(|| *self.tiles.get(cell))
    }

    #[inline]
    pub fn cars(&self) -> &[Car] {
        &self.cars
    }

    #[inline]
    pub fn passengers(&self) -> &[Passenger] {
        &self.passengers
    }

    pub fn car(&self, id: CarId) -> Option<&Car> {
        self.cars.iter().find(|c| c.id == id)
    }

    pub fn passenger(&self, id: PassengerId) -> Option<&Passenger> {
        self.passengers.iter().find(|p| p.id == id)
    }

    #[inline]
    pub fn house_tiles(&self) -> &[CellCoord] {
        &self.house_tiles
    }

    #[inline]
    pub fn business_tiles(&self) -> &[CellCoord] {
        &self.business_tiles
    }

    #[inline]
    pub fn player(&self) -> &Player {
        &self.player
    }

    #[inline]
    pub fn clock(&self) -> &GameClock {
        &self.clock
    }

    #[inline]
    pub fn now(&self) -> SimTime {
        self.clock.now()
    }

    #[inline]
    pub fn speed(&self) -> GameSpeed {
        self.clock.speed()
    }

    #[inline]
    pub fn ids(&self) -> &IdGenerator {
        &self.ids
    }

    #[inline]
    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    /// Bumped by every mutation; two equal versions mean an unchanged world.
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// World-space center of `cell`.
    #[inline]
    pub fn center_of(&self, cell: CellCoord) -> Pos {
        self.tiles.center_of(cell)
    }

    // ── Entity insertion (load path) ──────────────────────────────────────

    /// Add a fully built car.  Future ids are kept above its id.
    pub fn insert_car(&mut self, car: Car) -> WorldResult<()> {
        if !self.tiles.contains(car.station) {
            return Err(WorldError::OutOfBounds(car.station));
        }
        if self.car(car.id).is_some() {
            return Err(WorldError::DuplicateId(car.id.to_string()));
        }
        self.ids.observe(car.id.raw());
        self.cars.push(car);
        self.touch();
        Ok(())
    }

    /// Add a fully built passenger.  Future ids are kept above its id.
    pub fn insert_passenger(&mut self, passenger: Passenger) -> WorldResult<()> {
        if !self.tiles.contains(passenger.target) {
            return Err(WorldError::OutOfBounds(passenger.target));
        }
        if self.passenger(passenger.id).is_some() {
            return Err(WorldError::DuplicateId(passenger.id.to_string()));
        }
        self.ids.observe(passenger.id.raw());
        self.passengers.push(passenger);
        self.touch();
        Ok(())
    }

    /// Seat `passenger` in `car`.  The passenger moves to the car's position.
    pub fn associate(&mut self, passenger: PassengerId, car: CarId) -> WorldResult<()> {
        let car_index = self.car_index(car).ok_or(WorldError::UnknownCar(car))?;
        let passenger_index = self.passenger_index(passenger).ok_or(WorldError::UnknownPassenger(passenger))?;
        if let Some(existing) = self.cars[car_index].passenger {
            if existing != passenger {
                return Err(WorldError::CarOccupied { car, passenger: existing });
            }
        }
        self.seat(passenger_index, car_index);
        self.touch();
        Ok(())
    }

    // ── Placement ─────────────────────────────────────────────────────────

    /// Set a tile's content for free, keeping the house/business indexes in
    /// step.  Used to lay out maps; gameplay edits go through the priced
    /// methods below.
    pub fn place(&mut self, cell: CellCoord, content: TileContent) -> WorldResult<()> {
        if !self.tiles.contains(cell) {
            return Err(WorldError::OutOfBounds(cell));
        }
        self.set_content(cell, content);
        self.touch();
        Ok(())
    }

    /// Turn a grass tile into a house.
    pub fn add_house(&mut self, cell: CellCoord) -> bool {
        self.grow_on_grass(cell, TileContent::House)
    }

    /// Turn a grass tile into a business.
    pub fn add_business(&mut self, cell: CellCoord) -> bool {
        self.grow_on_grass(cell, TileContent::Business)
    }

    /// Try up to ten random tiles with `attempt`, returning the first
    /// success.
    pub fn try_random_tile<R, F>(&mut self, mut attempt: F) -> Option<R>
    where
        F: FnMut(&mut World, CellCoord) -> Option<R>,
    {
        for _ in 0..RANDOM_TILE_TRIES {
            let row = self.rng.gen_range(0..self.tiles.height());
            let col = self.rng.gen_range(0..self.tiles.width());
            if let Some(result) = attempt(self, CellCoord::new(row, col)) {
                return Some(result);
            }
        }
        None
    }

    /// Place a house on a random grass tile.  Returns the placement time.
    pub fn add_random_house(&mut self) -> Option<SimTime> {
        self.try_random_tile(|world, cell| world.add_house(cell).then(|| world.now()))
    }

    /// Place a business on a random grass tile.  Returns the placement time.
    pub fn add_random_business(&mut self) -> Option<SimTime> {
        self.try_random_tile(|world, cell| world.add_business(cell).then(|| world.now()))
    }

    // ── Player edits ──────────────────────────────────────────────────────

    /// Grass becomes road (if affordable); road becomes grass for free.
    /// Anything else is left alone.
    pub fn toggle_tile(&mut self, cell: CellCoord) {
        match self.content(cell) {
            Some(TileContent::Grass) => {
                if self.player.try_spend(COST_OF_ROAD) {
                    self.set_content(cell, TileContent::Road);
                    self.notify_lost(COST_OF_ROAD, cell);
                    self.touch();
                }
            }
            Some(TileContent::Road) => {
                self.set_content(cell, TileContent::Grass);
                self.touch();
            }
            _ => {}
        }
    }

    /// Pave every grass tile in `cells`, all or nothing on the total cost.
    /// Returns the number of tiles paved.
    pub fn set_tiles_to_road(&mut self, cells: &[CellCoord]) -> usize {
        let mut seen = FxHashSet::default();
        let valid: Vec<CellCoord> = cells
            .iter()
            .copied()
            .filter(|&c| self.content(c) == Some(TileContent::Grass) && seen.insert(c))
            .collect();
        let Some(&last) = valid.last() else {
            return 0;
        };
        let cost = COST_OF_ROAD * valid.len() as i64;
        if !self.player.try_spend(cost) {
            return 0;
        }
        for &cell in &valid {
            self.set_content(cell, TileContent::Road);
        }
        self.notify_lost(cost, last);
        self.touch();
        valid.len()
    }

    /// Build a taxi station on grass and base a new car there.
    pub fn add_taxi_station(&mut self, cell: CellCoord) -> Option<CarId> {
        if self.content(cell) != Some(TileContent::Grass) {
            return None;
        }
        if !self.player.try_spend(COST_OF_TAXI_STATION) {
            return None;
        }
        self.set_content(cell, TileContent::TaxiStation);
        let car = self.spawn_car(cell);
        self.notify_lost(COST_OF_TAXI_STATION, cell);
        debug!(%cell, %car, "taxi station built");
        Some(car)
    }

    /// Buy another car for an existing taxi station.
    pub fn add_car_to_station(&mut self, cell: CellCoord) -> Option<CarId> {
        if self.content(cell) != Some(TileContent::TaxiStation) {
            return None;
        }
        if !self.player.try_spend(COST_OF_CAR) {
            return None;
        }
        let car = self.spawn_car(cell);
        self.notify_lost(COST_OF_CAR, cell);
        debug!(%cell, %car, "car added to station");
        Some(car)
    }

    /// Grow the map to at least `width × height`.  Existing tiles keep their
    /// coordinates; new tiles are grass.  Returns `false` if the map already
    /// covers the requested size.
    pub fn expand_to(&mut self, width: u32, height: u32) -> WorldResult<bool> {
        if self.tiles.width() >= width && self.tiles.height() >= height {
            return Ok(false);
        }
        let width = width.max(self.tiles.width());
        let height = height.max(self.tiles.height());
        self.tiles = self.tiles.expanded(width, height, |_| TileContent::Grass)?;
        debug!(width, height, "map expanded");
        self.touch();
        Ok(true)
    }

    pub fn set_speed(&mut self, speed: GameSpeed) {
        if self.clock.speed() != speed {
            self.clock.set_speed(speed);
            self.touch();
        }
    }

    pub fn adjust_money(&mut self, delta: i64) {
        self.player.adjust(delta);
        self.touch();
    }

    pub fn remove_notification(&mut self, id: NotificationId) -> bool {
        let removed = self.notifications.remove(id);
        if removed {
            self.touch();
        }
        removed
    }

    // ── Passengers ────────────────────────────────────────────────────────

    /// Spawn a passenger at the center of `cell`, bound for a random
    /// business.  Needs at least one business and a road or grass tile.
    pub fn add_passenger_at(&mut self, cell: CellCoord) -> Option<PassengerId> {
        if !matches!(self.content(cell), Some(TileContent::Road | TileContent::Grass)) {
            return None;
        }
        let target = *self.rng.choose(&self.business_tiles)?;
        let id = self.ids.next_passenger();
        let pos = self.tiles.center_of(cell);
        self.passengers.push(Passenger::new(id, pos, target, self.now()));
        trace!(passenger = %id, %cell, %target, "passenger spawned");
        self.touch();
        Some(id)
    }

    /// Update a waiting passenger's mood.  Riding passengers are left alone.
    pub fn set_passenger_mood(&mut self, id: PassengerId, mood: Mood) -> bool {
        let Some(p) = self.passengers.iter_mut().find(|p| p.id == id) else {
            return false;
        };
        if p.car.is_some() || p.mood == mood {
            return false;
        }
        p.mood = mood;
        self.touch();
        true
    }

    /// A waiting passenger gives up: removed and counted as missed.
    pub fn remove_upset_passenger(&mut self, id: PassengerId) -> bool {
        let Some(index) = self.passenger_index(id) else {
            return false;
        };
        if self.passengers[index].car.is_some() {
            return false;
        }
        self.passengers.remove(index);
        self.player.on_missed();
        trace!(passenger = %id, "passenger left");
        self.touch();
        true
    }

    // ── Car routing ───────────────────────────────────────────────────────

    /// Give `car` a path through the centers of `cells`.
    pub fn set_car_path(&mut self, car: CarId, cells: &[CellCoord]) -> bool {
        let waypoints = cells.iter().map(|&c| self.tiles.center_of(c)).collect();
        let Some(car) = self.cars.iter_mut().find(|c| c.id == car) else {
            return false;
        };
        car.path = Some(Path::new(waypoints));
        self.touch();
        true
    }

    pub fn clear_car_path(&mut self, car: CarId) -> bool {
        let Some(car) = self.cars.iter_mut().find(|c| c.id == car) else {
            return false;
        };
        if car.path.take().is_none() {
            return false;
        }
        self.touch();
        true
    }

    // ── Physics ───────────────────────────────────────────────────────────

    /// One fast tick.  See the module docs for the order of work.
    pub fn advance_physics(&mut self) -> PhysicsReport {
        let mut report = PhysicsReport::default();
        if self.clock.speed().is_paused() {
            return report;
        }
        let delta = self.clock.tick();
        report.advanced = delta;

        for car in &mut self.cars {
            report.distance += car.advance(&self.tiles, delta);
        }
        self.follow_cars();
        report.picked_up = self.pick_up_passengers();
        report.delivered = self.deliver_passengers();
        report.fuel_cost = self.player.on_distance_travelled(report.distance);

        self.touch();
        report
    }

    fn follow_cars(&mut self) {
        let positions: FxHashMap<CarId, Pos> = self.cars.iter().map(|c| (c.id, c.pos)).collect();
        for p in &mut self.passengers {
            if let Some(pos) = p.car.and_then(|car| positions.get(&car)) {
                p.pos = *pos;
            }
        }
    }

    /// Free cars and waiting passengers on the same tile pair up in list
    /// order: the n-th free car on a tile takes the n-th waiting passenger.
    fn pick_up_passengers(&mut self) -> Vec<(PassengerId, CarId)> {
        let mut waiting: FxHashMap<CellCoord, Vec<usize>> = FxHashMap::default();
        for (i, p) in self.passengers.iter().enumerate() {
            if p.car.is_none() {
                waiting.entry(self.tiles.nearest_cell(p.pos)).or_default().push(i);
            }
        }
        if waiting.is_empty() {
            return Vec::new();
        }

        let mut taken: FxHashMap<CellCoord, usize> = FxHashMap::default();
        let mut pairs = Vec::new();
        for car_index in 0..self.cars.len() {
            if self.cars[car_index].passenger.is_some() {
                continue;
            }
            let cell = self.tiles.nearest_cell(self.cars[car_index].pos);
            let Some(queue) = waiting.get(&cell) else {
                continue;
            };
            let next = taken.entry(cell).or_insert(0);
            let Some(&passenger_index) = queue.get(*next) else {
                continue;
            };
            *next += 1;
            pairs.push((passenger_index, car_index));
        }

        pairs
            .into_iter()
            .map(|(pi, ci)| {
                self.cars[ci].passenger = Some(self.passengers[pi].id);
                self.passengers[pi].car = Some(self.cars[ci].id);
                (self.passengers[pi].id, self.cars[ci].id)
            })
            .collect()
    }

    fn deliver_passengers(&mut self) -> Vec<Delivery> {
        let arrival_radius = self.tiles.unit_size() / 2.0;
        let arrived: Vec<usize> = self
            .passengers
            .iter()
            .enumerate()
            .filter(|(_, p)| {
                p.car.is_some() && self.tiles.center_of(p.target).dist(p.pos) < arrival_radius
            })
            .map(|(i, _)| i)
            .collect();

        let mut deliveries = Vec::with_capacity(arrived.len());
        for &i in arrived.iter().rev() {
            let p = self.passengers.remove(i);
            if let Some(car) = p.car.and_then(|id| self.cars.iter_mut().find(|c| c.id == id)) {
                car.passenger = None;
            }
            let fee = self.player.on_delivered(p.initial_pos, p.pos);
            self.notifications.push(NotificationKind::MoneyMade, fee, p.pos);
            trace!(passenger = %p.id, fee, "passenger delivered");
            deliveries.push(Delivery { passenger: p.id, car: p.car, fee });
        }
        deliveries.reverse();
        deliveries
    }

    // ── Internals ─────────────────────────────────────────────────────────

    #[inline]
    fn touch(&mut self) {
        self.version += 1;
    }

    fn car_index(&self, id: CarId) -> Option<usize> {
        self.cars.iter().position(|c| c.id == id)
    }

    fn passenger_index(&self, id: PassengerId) -> Option<usize> {
        self.passengers.iter().position(|p| p.id == id)
    }

    fn seat(&mut self, passenger_index: usize, car_index: usize) {
        let car = &mut self.cars[car_index];
        let passenger = &mut self.passengers[passenger_index];
        car.passenger = Some(passenger.id);
        passenger.car = Some(car.id);
        passenger.pos = car.pos;
    }

    fn spawn_car(&mut self, station: CellCoord) -> CarId {
        let id = self.ids.next_car();
        self.cars.push(Car::new(id, self.tiles.center_of(station), station));
        self.touch();
        id
    }

    fn grow_on_grass(&mut self, cell: CellCoord, content: TileContent) -> bool {
        if self.content(cell) != Some(TileContent::Grass) {
            return false;
        }
        self.set_content(cell, content);
        debug!(%cell, %content, "city grew");
        self.touch();
        true
    }

    fn notify_lost(&mut self, amount: i64, cell: CellCoord) {
        let pos = self.tiles.center_of(cell);
        self.notifications.push(NotificationKind::MoneyLost, amount, pos);
    }

    /// Raw content write that keeps the house/business indexes consistent.
    fn set_content(&mut self, cell: CellCoord, content: TileContent) {
        let previous = std::mem::replace(self.tiles.get_mut(cell), content);
        if previous == content {
            return;
        }
        match previous {
            TileContent::House => self.house_tiles.retain(|&c| c != cell),
            TileContent::Business => self.business_tiles.retain(|&c| c != cell),
            _ => {}
        }
        match content {
            TileContent::House => self.house_tiles.push(cell),
            TileContent::Business => self.business_tiles.push(cell),
            _ => {}
        }
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("size", &(self.tiles.width(), self.tiles.height()))
            .field("cars", &self.cars.len())
            .field("passengers", &self.passengers.len())
            .field("clock", &self.clock)
            .field("money", &self.player.money())
            .field("version", &self.version)
            .finish()
    }
}

fn cells_with(tiles: &Grid<TileContent>, content: TileContent) -> Vec<CellCoord> {
    tiles.iter().filter(|&(_, &c)| c == content).map(|(coord, _)| coord).collect()
}
