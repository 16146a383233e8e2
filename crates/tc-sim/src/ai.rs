//! The pair of AI systems run on every slow tick.

use tracing::trace;

use tc_behavior::{AiSystem, CityGrowth, Event, Snapshot};
use tc_save::SavedGrowth;

/// Car AI plus city growth, run against the same [`Snapshot`].
///
/// Car events come first in the returned batch, then city events.  With the
/// `parallel` feature both systems decide concurrently via `rayon::join`;
/// each still owns its own search drain and RNG, so the result is the same
/// as running them one after the other.
pub struct AiRunner {
    cars: Box<dyn AiSystem>,
    city: CityGrowth,
}

impl AiRunner {
    pub fn new(cars: Box<dyn AiSystem>, city: CityGrowth) -> Self {
        Self { cars, city }
    }

    pub fn city(&self) -> &CityGrowth {
        &self.city
    }

    /// Growth clocks to store in a save.
    pub fn growth_state(&self) -> SavedGrowth {
        SavedGrowth {
            last_business: self.city.last_business(),
            last_house:    self.city.last_house(),
        }
    }

    pub fn decide(&mut self, snapshot: &Snapshot) -> Vec<Event> {
        let Self { cars, city } = self;

        #[cfg(feature = "parallel")]
        let (mut events, city_events) = rayon::join(|| cars.decide(snapshot), || city.decide(snapshot));

        #[cfg(not(feature = "parallel"))]
        let (mut events, city_events) = (cars.decide(snapshot), city.decide(snapshot));

        trace!(
            car_ai = cars.name(),
            car_events = events.len(),
            city_events = city_events.len(),
            now = %snapshot.now,
            "ai tick"
        );
        events.extend(city_events);
        events
    }
}
