//! Unit tests for tc-world.

#[cfg(test)]
mod helpers {
    use tc_core::GameSpeed;
    use tc_spatial::CellCoord;

    use crate::{TileContent, World, WorldConfig};

    pub fn cell(row: u32, col: u32) -> CellCoord {
        CellCoord::new(row, col)
    }

    pub fn world(width: u32, height: u32) -> World {
        let config = WorldConfig { width, height, ..WorldConfig::default() };
        World::new(&config, 7).unwrap()
    }

    /// One-row street: station at col 0, road on cols 1..=3, business at col 4.
    /// Running at fast speed.
    pub fn street() -> World {
        let mut w = world(5, 1);
        w.add_taxi_station(cell(0, 0)).unwrap();
        for col in 1..=3 {
            w.place(cell(0, col), TileContent::Road).unwrap();
        }
        w.place(cell(0, 4), TileContent::Business).unwrap();
        w.set_speed(GameSpeed::Fast);
        w
    }
}

// ── Tiles, paths, cars ────────────────────────────────────────────────────────

#[cfg(test)]
mod entity_tests {
    use tc_core::{CarId, Pos, SimTime};
    use tc_spatial::Grid;

    use super::helpers::cell;
    use crate::{Car, Path, TileContent};

    #[test]
    fn tile_ids_are_stable() {
        for content in TileContent::ALL {
            assert_eq!(TileContent::from_id(content.id()), Some(content));
        }
        assert_eq!(TileContent::Road.id(), 1);
        assert_eq!(TileContent::from_id(9), None);
    }

    #[test]
    fn drivable_tiles() {
        assert!(TileContent::Road.can_car_go());
        assert!(TileContent::Business.can_car_go());
        assert!(TileContent::TaxiStation.can_car_go());
        assert!(!TileContent::Grass.can_car_go());
        assert!(!TileContent::House.can_car_go());
    }

    #[test]
    fn path_advances_when_close() {
        let a = Pos::new(0.0, 10.0);
        let b = Pos::new(0.0, 20.0);
        let mut path = Path::new(vec![a, b]);
        assert_eq!(path.target(Pos::ORIGIN), Some(a));
        assert_eq!(path.target(Pos::new(0.0, 9.5)), Some(a));
        assert_eq!(path.target(Pos::new(0.0, 9.5)), Some(b));
        assert_eq!(path.remaining(), &[b]);
        assert_eq!(path.target(b), Some(b));
        assert!(path.is_finished());
        assert_eq!(path.target(b), None);
    }

    fn road_row() -> Grid<TileContent> {
        Grid::new(
            4,
            1,
            64.0,
            vec![TileContent::TaxiStation, TileContent::Road, TileContent::Road, TileContent::Grass],
        )
        .unwrap()
    }

    #[test]
    fn car_drives_east_at_speed() {
        let tiles = road_row();
        let start = tiles.center_of(cell(0, 0));
        let mut car = Car::new(CarId(1), start, cell(0, 0));
        car.path = Some(Path::new(vec![tiles.center_of(cell(0, 2))]));

        let travelled = car.advance(&tiles, SimTime::minutes(1));
        assert!((travelled - 20.0).abs() < 1e-3);
        assert!((car.pos().col - (start.col + 20.0)).abs() < 1e-3);
        assert!((car.orientation() - 90.0).abs() < 1e-3);
        assert!(!car.is_idle());
    }

    #[test]
    fn car_stops_at_path_end() {
        let tiles = road_row();
        let mut car = Car::new(CarId(1), tiles.center_of(cell(0, 0)), cell(0, 0));
        car.path = Some(Path::new(vec![tiles.center_of(cell(0, 1))]));

        car.advance(&tiles, SimTime::hours(1));
        assert_eq!(car.pos(), tiles.center_of(cell(0, 1)));
        assert!(car.is_idle());
        assert_eq!(car.advance(&tiles, SimTime::hours(1)), 0.0);
    }

    #[test]
    fn waypoint_on_grass_drops_path() {
        let tiles = road_row();
        let start = tiles.center_of(cell(0, 2));
        let mut car = Car::new(CarId(1), start, cell(0, 0));
        car.path = Some(Path::new(vec![tiles.center_of(cell(0, 3))]));

        assert_eq!(car.advance(&tiles, SimTime::minutes(5)), 0.0);
        assert!(car.path().is_none());
        assert_eq!(car.pos(), start);
    }
}

// ── Player economy ────────────────────────────────────────────────────────────

#[cfg(test)]
mod player_tests {
    use tc_core::Pos;

    use crate::Player;

    #[test]
    fn spend_only_when_affordable() {
        let mut p = Player::new(10);
        assert!(!p.try_spend(11));
        assert_eq!(p.money(), 10);
        assert!(p.try_spend(10));
        assert_eq!(p.money(), 0);
    }

    #[test]
    fn delivery_fee_has_minimum() {
        let here = Pos::new(0.0, 0.0);
        assert_eq!(Player::delivery_fee(here, here), 6);
        assert_eq!(Player::delivery_fee(here, Pos::new(0.0, 200.0)), 25);
    }

    #[test]
    fn fuel_charged_in_buckets() {
        let mut p = Player::new(100);
        assert_eq!(p.on_distance_travelled(30.0), 0);
        assert_eq!(p.on_distance_travelled(10.0), 1); // 40 rounds to one bucket
        assert_eq!(p.money(), 99);
        assert_eq!(p.on_distance_travelled(150.0), 2);
        assert_eq!(p.money(), 97);
    }

    #[test]
    fn counters() {
        let mut p = Player::with_counters(0, 3, 1);
        p.on_missed();
        let fee = p.on_delivered(Pos::ORIGIN, Pos::new(100.0, 0.0));
        assert_eq!(fee, 15);
        assert_eq!((p.money(), p.delivered(), p.missed()), (15, 4, 2));
    }
}

// ── World editing ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod edit_tests {
    use tc_core::{CarId, Pos, SimTime};

    use super::helpers::{cell, world};
    use crate::player::{COST_OF_CAR, COST_OF_ROAD, COST_OF_TAXI_STATION};
    use crate::{Car, NotificationKind, Passenger, TileContent, WorldConfig, WorldError};

    #[test]
    fn config_validation() {
        assert!(WorldConfig::default().validate().is_ok());
        let bad = WorldConfig { width: 0, ..WorldConfig::default() };
        assert!(matches!(bad.validate(), Err(WorldError::Config(_))));
    }

    #[test]
    fn toggle_grass_road_grass() {
        let mut w = world(3, 3);
        let money = w.player().money();
        w.toggle_tile(cell(1, 1));
        assert_eq!(w.content(cell(1, 1)), Some(TileContent::Road));
        assert_eq!(w.player().money(), money - COST_OF_ROAD);
        assert_eq!(w.notifications().len(), 1);
        assert_eq!(w.notifications().as_slice()[0].kind, NotificationKind::MoneyLost);

        w.toggle_tile(cell(1, 1));
        assert_eq!(w.content(cell(1, 1)), Some(TileContent::Grass));
        assert_eq!(w.player().money(), money - COST_OF_ROAD);
    }

    #[test]
    fn toggle_without_money_is_noop() {
        let config = WorldConfig { width: 2, height: 2, starting_money: 0, ..WorldConfig::default() };
        let mut w = crate::World::new(&config, 1).unwrap();
        let v = w.version();
        w.toggle_tile(cell(0, 0));
        assert_eq!(w.content(cell(0, 0)), Some(TileContent::Grass));
        assert_eq!(w.version(), v);
    }

    #[test]
    fn set_tiles_to_road_all_or_nothing() {
        let config = WorldConfig { width: 4, height: 1, starting_money: 2 * COST_OF_ROAD, ..WorldConfig::default() };
        let mut w = crate::World::new(&config, 1).unwrap();
        let three = [cell(0, 0), cell(0, 1), cell(0, 2)];
        assert_eq!(w.set_tiles_to_road(&three), 0);
        assert_eq!(w.content(cell(0, 0)), Some(TileContent::Grass));

        // Duplicates and non-grass tiles are not charged.
        w.place(cell(0, 2), TileContent::House).unwrap();
        assert_eq!(w.set_tiles_to_road(&[cell(0, 0), cell(0, 0), cell(0, 1), cell(0, 2)]), 2);
        assert_eq!(w.player().money(), 0);
        assert_eq!(w.content(cell(0, 2)), Some(TileContent::House));
    }

    #[test]
    fn taxi_station_spawns_car() {
        let mut w = world(3, 3);
        let money = w.player().money();
        let car = w.add_taxi_station(cell(2, 2)).unwrap();
        assert_eq!(w.content(cell(2, 2)), Some(TileContent::TaxiStation));
        assert_eq!(w.player().money(), money - COST_OF_TAXI_STATION);
        let car = w.car(car).unwrap();
        assert_eq!(car.station(), cell(2, 2));
        assert_eq!(car.pos(), w.center_of(cell(2, 2)));

        // Not on grass any more.
        assert!(w.add_taxi_station(cell(2, 2)).is_none());
        assert!(w.add_car_to_station(cell(2, 2)).is_some());
        assert_eq!(w.cars().len(), 2);
        assert_eq!(w.player().money(), money - COST_OF_TAXI_STATION - COST_OF_CAR);
        assert!(w.add_car_to_station(cell(0, 0)).is_none());
    }

    #[test]
    fn growth_only_on_grass() {
        let mut w = world(3, 3);
        assert!(w.add_house(cell(0, 0)));
        assert!(!w.add_business(cell(0, 0)));
        assert!(w.add_business(cell(0, 1)));
        assert_eq!(w.house_tiles(), &[cell(0, 0)]);
        assert_eq!(w.business_tiles(), &[cell(0, 1)]);

        w.place(cell(0, 0), TileContent::Road).unwrap();
        assert!(w.house_tiles().is_empty());
        assert!(w.place(cell(9, 9), TileContent::Road).is_err());
    }

    #[test]
    fn random_growth_gives_up_on_full_map() {
        let mut w = world(2, 2);
        for (coord, _) in w.tiles().clone().iter() {
            w.place(coord, TileContent::Road).unwrap();
        }
        assert_eq!(w.add_random_house(), None);

        let mut w = world(1, 1);
        assert_eq!(w.add_random_business(), Some(SimTime::ZERO));
        assert_eq!(w.business_tiles(), &[cell(0, 0)]);
    }

    #[test]
    fn expand_keeps_tiles() {
        let mut w = world(2, 2);
        w.place(cell(1, 1), TileContent::House).unwrap();
        assert_eq!(w.expand_to(2, 2), Ok(false));
        assert_eq!(w.expand_to(4, 3), Ok(true));
        assert_eq!((w.tiles().width(), w.tiles().height()), (4, 3));
        assert_eq!(w.content(cell(1, 1)), Some(TileContent::House));
        assert_eq!(w.content(cell(2, 3)), Some(TileContent::Grass));
        // Only grows.
        assert_eq!(w.expand_to(1, 5), Ok(true));
        assert_eq!((w.tiles().width(), w.tiles().height()), (4, 5));
    }

    #[test]
    fn passenger_needs_business_and_open_tile() {
        let mut w = world(3, 3);
        assert!(w.add_passenger_at(cell(0, 0)).is_none());
        w.add_business(cell(2, 2));
        w.add_house(cell(1, 1));
        assert!(w.add_passenger_at(cell(1, 1)).is_none());
        let id = w.add_passenger_at(cell(0, 0)).unwrap();
        let p = w.passenger(id).unwrap();
        assert_eq!(p.target(), cell(2, 2));
        assert_eq!(p.pos(), w.center_of(cell(0, 0)));
        assert!(p.is_waiting());
    }

    #[test]
    fn upset_passenger_leaves_and_counts_missed() {
        let mut w = world(3, 3);
        w.add_business(cell(2, 2));
        let id = w.add_passenger_at(cell(0, 0)).unwrap();
        assert!(w.set_passenger_mood(id, crate::Mood::Upset));
        assert!(w.remove_upset_passenger(id));
        assert!(w.passenger(id).is_none());
        assert_eq!(w.player().missed(), 1);
        assert!(!w.remove_upset_passenger(id));
    }

    #[test]
    fn insert_and_associate_for_loading() {
        let mut w = world(3, 3);
        w.place(cell(0, 0), TileContent::TaxiStation).unwrap();
        w.insert_car(Car::new(CarId(40), Pos::new(10.0, 10.0), cell(0, 0))).unwrap();
        let pid = tc_core::PassengerId(41);
        w.insert_passenger(Passenger::new(pid, Pos::ORIGIN, cell(2, 2), SimTime::ZERO)).unwrap();
        w.associate(pid, CarId(40)).unwrap();

        assert_eq!(w.car(CarId(40)).unwrap().passenger(), Some(pid));
        assert_eq!(w.passenger(pid).unwrap().pos(), Pos::new(10.0, 10.0));
        assert_eq!(w.ids().last_issued(), 41);
        assert!(matches!(
            w.insert_car(Car::new(CarId(40), Pos::ORIGIN, cell(0, 0))),
            Err(WorldError::DuplicateId(_))
        ));
        assert_eq!(
            w.associate(pid, CarId(99)),
            Err(WorldError::UnknownCar(CarId(99)))
        );
    }
}

// ── Physics ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod physics_tests {
    use tc_core::{GameSpeed, SimTime};

    use super::helpers::{cell, street, world};

    #[test]
    fn paused_world_does_not_move() {
        let mut w = world(2, 2);
        let v = w.version();
        let report = w.advance_physics();
        assert_eq!(report.advanced, SimTime::ZERO);
        assert_eq!(w.now(), SimTime::ZERO);
        assert_eq!(w.version(), v);

        w.set_speed(GameSpeed::Normal);
        assert_eq!(w.advance_physics().advanced, SimTime::secs(10));
        assert_eq!(w.now(), SimTime::secs(10));
    }

    #[test]
    fn pickup_then_delivery() {
        let mut w = street();
        let car = w.cars()[0].id();
        let passenger = w.add_passenger_at(cell(0, 1)).unwrap();
        assert!(w.set_car_path(car, &[cell(0, 1)]));

        let mut picked = false;
        for _ in 0..100 {
            let report = w.advance_physics();
            if report.picked_up.contains(&(passenger, car)) {
                picked = true;
                break;
            }
        }
        assert!(picked);
        assert_eq!(w.car(car).unwrap().passenger(), Some(passenger));
        assert_eq!(w.passenger(passenger).unwrap().car(), Some(car));

        let money_before = w.player().money();
        assert!(w.set_car_path(car, &[cell(0, 2), cell(0, 3), cell(0, 4)]));
        let mut delivered = None;
        for _ in 0..500 {
            let report = w.advance_physics();
            if let Some(d) = report.delivered.first() {
                delivered = Some(*d);
                break;
            }
        }
        let delivery = delivered.unwrap();
        assert_eq!(delivery.passenger, passenger);
        assert_eq!(delivery.car, Some(car));
        // Spawned at col 1, delivered within half a tile of col 4.
        assert!(delivery.fee >= 5 + 16);
        assert!(w.passenger(passenger).is_none());
        assert_eq!(w.car(car).unwrap().passenger(), None);
        assert_eq!(w.player().delivered(), 1);
        assert!(w.player().money() > money_before);
    }

    #[test]
    fn riding_passenger_follows_car() {
        let mut w = street();
        let car = w.cars()[0].id();
        let passenger = w.add_passenger_at(cell(0, 1)).unwrap();
        w.associate(passenger, car).unwrap();
        w.set_car_path(car, &[cell(0, 2)]);
        for _ in 0..5 {
            w.advance_physics();
        }
        assert_eq!(w.passenger(passenger).unwrap().pos(), w.car(car).unwrap().pos());
    }

    #[test]
    fn two_cars_one_passenger() {
        let mut w = street();
        w.add_car_to_station(cell(0, 0)).unwrap();
        let passenger = w.add_passenger_at(cell(0, 1)).unwrap();
        let (a, b) = (w.cars()[0].id(), w.cars()[1].id());
        w.set_car_path(a, &[cell(0, 1)]);
        w.set_car_path(b, &[cell(0, 1)]);
        let mut pairs = Vec::new();
        for _ in 0..100 {
            pairs.extend(w.advance_physics().picked_up);
        }
        assert_eq!(pairs, vec![(passenger, a)]);
        assert_eq!(w.car(b).unwrap().passenger(), None);
    }
}
