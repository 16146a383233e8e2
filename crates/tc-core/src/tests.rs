//! Unit tests for tc-core primitives.

#[cfg(test)]
mod ids {
    use crate::{CarId, IdGenerator, PassengerId};

    #[test]
    fn generator_shares_one_counter() {
        let mut ids = IdGenerator::new(0);
        assert_eq!(ids.next_car(), CarId(1));
        assert_eq!(ids.next_passenger(), PassengerId(2));
        assert_eq!(ids.next_car(), CarId(3));
        assert_eq!(ids.last_issued(), 3);
    }

    #[test]
    fn observe_only_moves_forward() {
        let mut ids = IdGenerator::new(10);
        ids.observe(4);
        assert_eq!(ids.last_issued(), 10);
        ids.observe(42);
        assert_eq!(ids.next_passenger(), PassengerId(43));
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(CarId::INVALID.0, u32::MAX);
        assert_eq!(PassengerId::default(), PassengerId::INVALID);
    }

    #[test]
    fn display() {
        assert_eq!(CarId(7).to_string(), "CarId(7)");
    }
}

#[cfg(test)]
mod geo {
    use crate::Pos;

    #[test]
    fn distance() {
        let a = Pos::new(0.0, 0.0);
        let b = Pos::new(3.0, 4.0);
        assert!((a.dist(b) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn step_never_overshoots() {
        let a = Pos::new(0.0, 0.0);
        let b = Pos::new(0.0, 10.0);
        assert_eq!(a.step_towards(b, 100.0), b);
        let mid = a.step_towards(b, 4.0);
        assert!((mid.col - 4.0).abs() < 1e-5);
        assert_eq!(mid.row, 0.0);
    }

    #[test]
    fn tiny_steps_stay_put() {
        let a = Pos::new(1.0, 1.0);
        assert_eq!(a.step_towards(Pos::new(1.0, 1.1), 5.0), a);
        assert_eq!(a.step_towards(Pos::new(9.0, 9.0), 0.1), a);
    }

    #[test]
    fn heading_is_clockwise_from_north() {
        let o = Pos::ORIGIN;
        assert!((o.heading_to(Pos::new(-1.0, 0.0)) - 0.0).abs() < 1e-4);
        assert!((o.heading_to(Pos::new(0.0, 1.0)) - 90.0).abs() < 1e-4);
        assert!((o.heading_to(Pos::new(1.0, 0.0)) - 180.0).abs() < 1e-4);
    }
}

#[cfg(test)]
mod time {
    use crate::{GameClock, GameSpeed, SimConfig, SimTime};

    #[test]
    fn constructors() {
        assert_eq!(SimTime::minutes(2), SimTime(120));
        assert_eq!(SimTime::hours(1), SimTime::minutes(60));
        assert_eq!(SimTime::days(1).whole_minutes(), 1_440);
    }

    #[test]
    fn saturating_since() {
        assert_eq!(SimTime(100).saturating_since(SimTime(40)), SimTime(60));
        assert_eq!(SimTime(40).saturating_since(SimTime(100)), SimTime::ZERO);
    }

    #[test]
    fn clock_starts_paused_and_does_not_advance() {
        let mut clock = GameClock::default();
        assert_eq!(clock.speed(), GameSpeed::Paused);
        assert_eq!(clock.tick(), SimTime::ZERO);
        assert_eq!(clock.now(), SimTime::ZERO);
    }

    #[test]
    fn each_speed_advances_fixed_amount() {
        let mut clock = GameClock::starting_at(SimTime(100));
        clock.set_speed(GameSpeed::Slow);
        clock.tick();
        clock.set_speed(GameSpeed::Normal);
        clock.tick();
        clock.set_speed(GameSpeed::Fast);
        clock.tick();
        assert_eq!(clock.now(), SimTime(135));
    }

    #[test]
    fn display() {
        assert_eq!(SimTime(86_400 + 3_600 * 2 + 60 * 5).to_string(), "day 1 02:05");
    }

    #[test]
    fn config_rejects_zero_periods() {
        let mut config = SimConfig::default();
        assert!(config.validate().is_ok());
        config.ai_period_ms = 0;
        assert!(config.validate().is_err());
    }
}

#[cfg(test)]
mod rng {
    use crate::SimRng;

    #[test]
    fn same_seed_same_stream() {
        let mut a = SimRng::new(7);
        let mut b = SimRng::new(7);
        let xs: Vec<u32> = (0..8).map(|_| a.gen_range(0..1000)).collect();
        let ys: Vec<u32> = (0..8).map(|_| b.gen_range(0..1000)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn choose_empty_is_none() {
        let mut rng = SimRng::new(1);
        let empty: [u8; 0] = [];
        assert!(rng.choose(&empty).is_none());
        assert_eq!(rng.choose(&[5]), Some(&5));
    }
}
