//! Unit tests for tc-behavior.

#[cfg(test)]
mod helpers {
    use tc_core::{IdGenerator, SimTime};
    use tc_spatial::{CellCoord, Grid};
    use tc_world::{Player, TileContent, World, WorldConfig};

    pub fn cell(row: u32, col: u32) -> CellCoord {
        CellCoord::new(row, col)
    }

    pub fn world(width: u32, height: u32) -> World {
        let config = WorldConfig { width, height, ..WorldConfig::default() };
        World::new(&config, 11).unwrap()
    }

    /// All-grass map whose clock starts at `now`.
    pub fn world_at(width: u32, height: u32, now: SimTime) -> World {
        let tiles = Grid::filled(width, height, 64.0, TileContent::Grass).unwrap();
        World::from_parts(tiles, Player::new(0), now, IdGenerator::default(), 11)
    }

    /// One-row street: station at col 0, road on cols 1..=3, business at col 4.
    pub fn street() -> World {
        let mut w = world(5, 1);
        w.add_taxi_station(cell(0, 0)).unwrap();
        for col in 1..=3 {
            w.place(cell(0, col), TileContent::Road).unwrap();
        }
        w.place(cell(0, 4), TileContent::Business).unwrap();
        w
    }
}

// ── Events ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod event_tests {
    use std::sync::{Arc, Mutex};

    use tc_core::{GameSpeed, SimTime};
    use tc_world::TileContent;

    use super::helpers::{cell, street, world};
    use crate::{outcome_channel, Event, Inspector, OutcomeState};

    #[test]
    fn composite_applies_in_order() {
        let mut w = world(3, 1);
        let money = w.player().money();
        Event::Composite(vec![
            Event::ToggleTile(cell(0, 0)),
            Event::ToggleTile(cell(0, 0)),
            Event::ToggleTile(cell(0, 1)),
            Event::AdjustMoney(100),
        ])
        .apply(&mut w);
        assert_eq!(w.content(cell(0, 0)), Some(TileContent::Grass));
        assert_eq!(w.content(cell(0, 1)), Some(TileContent::Road));
        assert_eq!(w.player().money(), money - 10 + 100);
    }

    #[test]
    fn composite_helper() {
        assert_eq!(Event::composite(vec![Event::AdvanceTime]).kind(), "advance_time");
        assert!(Event::composite(vec![]).is_empty());
        assert!(Event::Composite(vec![Event::Composite(vec![])]).is_empty());
        assert!(!Event::composite(vec![Event::AdvanceTime, Event::AdvanceTime]).is_empty());
    }

    #[test]
    fn passenger_outcome_reports_time() {
        let mut w = street();
        let (tx, mut rx) = outcome_channel();
        assert_eq!(rx.poll(), OutcomeState::Pending);
        Event::AddPassenger { at: cell(0, 2), outcome: Some(tx) }.apply(&mut w);
        assert_eq!(rx.poll(), OutcomeState::Resolved(Some(SimTime::ZERO)));
        assert_eq!(w.passengers().len(), 1);
    }

    #[test]
    fn failed_placement_reports_none() {
        let mut w = street();
        let (tx, mut rx) = outcome_channel();
        // Station tile: neither road nor grass.
        Event::AddPassenger { at: cell(0, 0), outcome: Some(tx) }.apply(&mut w);
        assert_eq!(rx.poll(), OutcomeState::Resolved(None));

        let (tx, mut rx) = outcome_channel();
        Event::AddHouse { outcome: Some(tx) }.apply(&mut w); // no grass left
        assert_eq!(rx.poll(), OutcomeState::Resolved(None));
    }

    #[test]
    fn dropped_event_reports_dropped() {
        let (tx, mut rx) = outcome_channel();
        drop(Event::AddBusiness { outcome: Some(tx) });
        assert_eq!(rx.poll(), OutcomeState::Dropped);
    }

    #[test]
    fn advance_time_reports_physics() {
        let mut w = world(2, 2);
        Event::SetGameSpeed(GameSpeed::Slow).apply(&mut w);
        let mut reports = Vec::new();
        Event::Composite(vec![Event::AdvanceTime, Event::AdvanceTime])
            .apply_observed(&mut w, &mut |r| reports.push(r.advanced));
        assert_eq!(reports, vec![SimTime::secs(5), SimTime::secs(5)]);
        assert_eq!(w.now(), SimTime::secs(10));
    }

    #[test]
    fn inspector_sees_world_between_events() {
        let mut w = world(2, 2);
        let seen = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&seen);
        Event::Composite(vec![
            Event::ToggleTile(cell(1, 1)),
            Event::Inspect(Inspector::new(move |w| {
                *slot.lock().unwrap() = w.content(cell(1, 1));
            })),
            Event::ToggleTile(cell(1, 1)),
        ])
        .apply(&mut w);
        assert_eq!(*seen.lock().unwrap(), Some(TileContent::Road));
        assert_eq!(w.content(cell(1, 1)), Some(TileContent::Grass));
    }

    #[test]
    fn stale_ids_are_ignored() {
        let mut w = street();
        let v = w.version();
        Event::ClearPath(tc_core::CarId(999)).apply(&mut w);
        Event::RemoveUpsetPassenger(tc_core::PassengerId(999)).apply(&mut w);
        assert_eq!(w.version(), v);
    }
}

// ── Snapshot ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod snapshot_tests {
    use tc_core::{PassengerId, SimTime};
    use tc_world::{Passenger, TileContent};

    use super::helpers::{cell, street};
    use crate::Snapshot;

    #[test]
    fn capture_indexes_cars_and_waiting_passengers() {
        let mut w = street();
        let car = w.cars()[0].id();
        let waiting = w.add_passenger_at(cell(0, 2)).unwrap();

        let snap = Snapshot::capture(&w);
        assert_eq!(snap.tile(cell(0, 0)).cars, vec![car]);
        assert_eq!(snap.tile(cell(0, 2)).passengers, vec![waiting]);
        assert!(snap.tile(cell(0, 2)).has_passenger());
        assert!(!snap.tile(cell(0, 1)).has_passenger());
        assert_eq!(snap.tile(cell(0, 4)).content, TileContent::Business);
        assert_eq!(snap.business_tiles, vec![cell(0, 4)]);
        assert_eq!(snap.cars[0].base, cell(0, 0));
        assert_eq!(snap.cars[0].committed_target, None);
        assert_eq!(snap.waiting.len(), 1);
        assert_eq!(snap.now, SimTime::ZERO);
        assert_eq!(snap.version, w.version());
        assert_eq!(snap.nearest_tile(w.center_of(cell(0, 2))).coord, cell(0, 2));
    }

    #[test]
    fn riding_passenger_is_not_waiting() {
        let mut w = street();
        let car = w.cars()[0].id();
        let pid = PassengerId(77);
        w.insert_passenger(Passenger::new(pid, w.center_of(cell(0, 1)), cell(0, 4), SimTime::ZERO))
            .unwrap();
        w.associate(pid, car).unwrap();

        let snap = Snapshot::capture(&w);
        assert!(!snap.has_waiting_passengers());
        assert!(!snap.tile(cell(0, 0)).has_passenger());
        assert_eq!(snap.cars[0].committed_target, Some(cell(0, 4)));
    }
}

// ── Taxi dispatch ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod dispatch_tests {
    use tc_core::{CarId, PassengerId, SimTime};
    use tc_world::{Car, Passenger, TileContent};

    use super::helpers::{cell, street, world};
    use crate::{AiSystem, Event, Snapshot, TaxiDispatch};

    fn paths(events: &[Event]) -> Vec<(CarId, Option<Vec<tc_spatial::CellCoord>>)> {
        events
            .iter()
            .map(|e| match e {
                Event::SetPath { car, path } => (*car, Some(path.clone())),
                Event::ClearPath(car) => (*car, None),
                other => panic!("unexpected event {}", other.kind()),
            })
            .collect()
    }

    #[test]
    fn no_cars_no_events() {
        let w = world(3, 3);
        assert!(TaxiDispatch::new().plan(&Snapshot::capture(&w)).is_empty());
    }

    #[test]
    fn one_passenger_two_cars_only_one_claims() {
        let mut w = street();
        let a = w.cars()[0].id();
        let b = w.add_car_to_station(cell(0, 0)).unwrap();
        w.add_passenger_at(cell(0, 2)).unwrap();

        let events = TaxiDispatch::new().decide(&Snapshot::capture(&w));
        assert_eq!(
            paths(&events),
            vec![(a, Some(vec![cell(0, 1), cell(0, 2)])), (b, None)]
        );
    }

    #[test]
    fn two_passengers_are_split() {
        let mut w = street();
        let a = w.cars()[0].id();
        let b = w.add_car_to_station(cell(0, 0)).unwrap();
        w.add_passenger_at(cell(0, 1)).unwrap();
        w.add_passenger_at(cell(0, 3)).unwrap();

        let events = TaxiDispatch::new().plan(&Snapshot::capture(&w));
        assert_eq!(
            paths(&events),
            vec![
                (a, Some(vec![cell(0, 1)])),
                (b, Some(vec![cell(0, 1), cell(0, 2), cell(0, 3)])),
            ]
        );
    }

    #[test]
    fn loaded_car_heads_for_destination() {
        let mut w = street();
        let car = w.cars()[0].id();
        let pid = PassengerId(50);
        w.insert_passenger(Passenger::new(pid, w.center_of(cell(0, 0)), cell(0, 4), SimTime::ZERO))
            .unwrap();
        w.associate(pid, car).unwrap();
        // A waiting passenger elsewhere must not distract it.
        w.add_passenger_at(cell(0, 1)).unwrap();

        let events = TaxiDispatch::new().plan(&Snapshot::capture(&w));
        assert_eq!(
            paths(&events),
            vec![(car, Some(vec![cell(0, 1), cell(0, 2), cell(0, 3), cell(0, 4)]))]
        );
    }

    #[test]
    fn idle_car_returns_to_station() {
        let mut w = street();
        let home = w.cars()[0].id();
        let away = CarId(60);
        w.insert_car(Car::new(away, w.center_of(cell(0, 3)), cell(0, 0))).unwrap();

        let events = TaxiDispatch::new().plan(&Snapshot::capture(&w));
        assert_eq!(
            paths(&events),
            vec![(home, None), (away, Some(vec![cell(0, 2), cell(0, 1), cell(0, 0)]))]
        );
    }

    #[test]
    fn stranded_car_gets_cleared() {
        let mut w = world(3, 3);
        w.add_taxi_station(cell(0, 0)).unwrap();
        w.place(cell(2, 2), TileContent::Road).unwrap();
        let stranded = CarId(70);
        w.insert_car(Car::new(stranded, w.center_of(cell(2, 2)), cell(0, 0))).unwrap();

        let events = TaxiDispatch::new().plan(&Snapshot::capture(&w));
        assert_eq!(paths(&events)[1], (stranded, None));
    }
}

// ── Growth ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod growth_tests {
    use tc_core::{PassengerId, Pos, SimRng, SimTime};
    use tc_world::{Mood, Passenger, TileContent};

    use super::helpers::{cell, world, world_at};
    use crate::{AiSystem, BehaviorError, CityGrowth, DurationConstraint, Event, GrowthConfig, OutcomeSender, Snapshot};

    fn fire(c: &mut DurationConstraint, now: SimTime, rng: &mut SimRng) -> Option<OutcomeSender> {
        match c.consider(now, rng, |_, tx| Some(Event::AddHouse { outcome: Some(tx) }))? {
            Event::AddHouse { outcome } => outcome,
            other => panic!("unexpected event {}", other.kind()),
        }
    }

    fn hourly(last: Option<SimTime>) -> DurationConstraint {
        DurationConstraint::new(SimTime::hours(1), SimTime::hours(1), last)
    }

    #[test]
    fn never_fired_fires_at_once() {
        let mut rng = SimRng::new(1);
        let mut c = hourly(None);
        assert!(fire(&mut c, SimTime::ZERO, &mut rng).is_some());
        assert!(c.is_waiting());
    }

    #[test]
    fn no_second_fire_while_waiting() {
        let mut rng = SimRng::new(1);
        let mut c = hourly(Some(SimTime::ZERO));
        let tx = fire(&mut c, SimTime::hours(1), &mut rng).unwrap();
        for minutes in [60, 61, 600, 6_000] {
            assert!(fire(&mut c, SimTime::minutes(minutes), &mut rng).is_none());
        }
        drop(tx);
    }

    #[test]
    fn clock_restarts_from_completion_time() {
        let mut rng = SimRng::new(1);
        let mut c = hourly(Some(SimTime::ZERO));
        let tx = fire(&mut c, SimTime::hours(1), &mut rng).unwrap();
        // Applied later than it was emitted.
        tx.send(Some(SimTime::hours(3)));
        assert!(fire(&mut c, SimTime::hours(3) + SimTime::minutes(59), &mut rng).is_none());
        assert_eq!(c.last_fired(), Some(SimTime::hours(3)));
        assert!(!c.is_waiting());
        assert!(fire(&mut c, SimTime::hours(4), &mut rng).is_some());
    }

    #[test]
    fn failed_placement_keeps_clock() {
        let mut rng = SimRng::new(1);
        let mut c = hourly(Some(SimTime::ZERO));
        let tx = fire(&mut c, SimTime::hours(1), &mut rng).unwrap();
        tx.send(None);
        assert!(fire(&mut c, SimTime::hours(1), &mut rng).is_some());
        assert_eq!(c.last_fired(), Some(SimTime::ZERO));
    }

    #[test]
    fn dropped_event_frees_constraint() {
        let mut rng = SimRng::new(1);
        let mut c = hourly(Some(SimTime::ZERO));
        drop(fire(&mut c, SimTime::hours(1), &mut rng));
        assert!(fire(&mut c, SimTime::hours(1), &mut rng).is_some());
    }

    #[test]
    fn declined_event_leaves_nothing_pending() {
        let mut rng = SimRng::new(1);
        let mut c = hourly(None);
        assert!(c.consider(SimTime::ZERO, &mut rng, |_, _| None).is_none());
        assert!(!c.is_waiting());
        assert_eq!(c.last_fired(), None);
    }

    #[test]
    fn draws_stay_within_bounds() {
        let mut rng = SimRng::new(3);
        for _ in 0..50 {
            let mut c = DurationConstraint::new(SimTime::minutes(10), SimTime::minutes(20), Some(SimTime::ZERO));
            assert!(fire(&mut c, SimTime::minutes(9), &mut rng).is_none());
            let mut c = DurationConstraint::new(SimTime::minutes(10), SimTime::minutes(20), Some(SimTime::ZERO));
            assert!(fire(&mut c, SimTime::minutes(20), &mut rng).is_some());
        }
    }

    #[test]
    fn mood_thresholds() {
        let config = GrowthConfig::default();
        assert_eq!(config.expected_mood(SimTime::minutes(44)), Mood::New);
        assert_eq!(config.expected_mood(SimTime::minutes(45)), Mood::Ok);
        assert_eq!(config.expected_mood(SimTime::hours(2)), Mood::GettingUpset);
        assert_eq!(config.expected_mood(SimTime::hours(4)), Mood::Upset);
    }

    #[test]
    fn config_validation() {
        assert!(GrowthConfig::default().validate().is_ok());
        let bad = GrowthConfig { min_house_interval: SimTime::days(2), ..GrowthConfig::default() };
        assert!(matches!(bad.validate(), Err(BehaviorError::Config(_))));
        let bad = GrowthConfig { ok_after: SimTime::hours(3), ..GrowthConfig::default() };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn fresh_city_grows_buildings_once() {
        let mut w = world(4, 4);
        let mut growth = CityGrowth::new(GrowthConfig::default(), SimRng::new(5));

        let events = growth.decide(&Snapshot::capture(&w));
        let kinds: Vec<&str> = events.iter().map(Event::kind).collect();
        assert_eq!(kinds, vec!["add_business", "add_house"]);
        for event in events {
            event.apply(&mut w);
        }
        assert_eq!(w.business_tiles().len(), 1);
        assert_eq!(w.house_tiles().len(), 1);

        // Same instant: buildings wait for their interval, the new house
        // spawns its first passenger.
        let events = growth.decide(&Snapshot::capture(&w));
        let kinds: Vec<&str> = events.iter().map(Event::kind).collect();
        assert_eq!(kinds, vec!["add_passenger"]);
        assert_eq!(growth.last_business(), Some(SimTime::ZERO));
        assert_eq!(growth.last_house(), Some(SimTime::ZERO));
    }

    #[test]
    fn passenger_prefers_free_road_next_to_house() {
        let mut w = world(3, 3);
        w.place(cell(1, 1), TileContent::House).unwrap();
        w.place(cell(0, 1), TileContent::Road).unwrap();
        w.place(cell(1, 0), TileContent::Road).unwrap();
        w.place(cell(2, 2), TileContent::Business).unwrap();
        w.add_passenger_at(cell(0, 1)).unwrap();

        let now = w.now();
        let mut growth = CityGrowth::resume(GrowthConfig::default(), SimRng::new(9), Some(now), Some(now));
        let events = growth.decide(&Snapshot::capture(&w));
        assert_eq!(events.len(), 1);
        match &events[0] {
            Event::AddPassenger { at, outcome } => {
                assert_eq!(*at, cell(1, 0));
                assert!(outcome.is_some());
            }
            other => panic!("unexpected event {}", other.kind()),
        }
    }

    #[test]
    fn moods_follow_waiting_time_and_long_waits_leave() {
        let now = SimTime::hours(7);
        let mut w = world_at(3, 3, now);
        let target = cell(2, 2);
        let ok = PassengerId(1);
        let gone = PassengerId(2);
        let fresh = PassengerId(3);
        w.insert_passenger(Passenger::new(ok, Pos::ORIGIN, target, SimTime::hours(6))).unwrap();
        w.insert_passenger(Passenger::new(gone, Pos::ORIGIN, target, SimTime::ZERO)).unwrap();
        w.insert_passenger(Passenger::new(fresh, Pos::ORIGIN, target, SimTime::minutes(390))).unwrap();

        let mut growth = CityGrowth::resume(GrowthConfig::default(), SimRng::new(2), Some(now), Some(now));
        let events = growth.decide(&Snapshot::capture(&w));
        let summary: Vec<String> = events
            .iter()
            .map(|e| match e {
                Event::SetPassengerMood { passenger, mood } => format!("{passenger}:{mood}"),
                Event::RemoveUpsetPassenger(passenger) => format!("{passenger}:leave"),
                other => panic!("unexpected event {}", other.kind()),
            })
            .collect();
        assert_eq!(
            summary,
            vec![
                format!("{ok}:{}", Mood::Ok),
                format!("{gone}:{}", Mood::Upset),
                format!("{gone}:leave"),
            ]
        );

        for event in events {
            event.apply(&mut w);
        }
        assert!(w.passenger(gone).is_none());
        assert_eq!(w.passenger(ok).unwrap().mood(), Mood::Ok);
        assert_eq!(w.player().missed(), 1);
    }
}
