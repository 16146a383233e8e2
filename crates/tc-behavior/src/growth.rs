//! City growth: rate-limited emitters of houses, businesses, and passengers,
//! plus passenger mood and departure.
//!
//! # DurationConstraint
//!
//! Each growth source owns a [`DurationConstraint`], a small state machine:
//!
//! ```text
//!            consider(now)
//!   Idle ───────────────────────► draw threshold T ∈ [min, max] (minutes)
//!    ▲                               │ never fired, or elapsed ≥ T
//!    │                               ▼
//!    │ outcome resolved          emit event ──► Waiting(outcome)
//!    │ Some(t) → last_fired = t      │
//!    │ None    → clock unchanged     │ consider(now) while unresolved
//!    └───────────────────────────────┘   → nothing (no second fire)
//! ```
//!
//! The clock restarts from the time the world reports the placement
//! happened, not from when the constraint notices.  A failed placement
//! (no free tile) leaves the clock alone so the next tick may try again.
//!
//! Sources: one constraint for businesses, one for houses, one per house
//! tile for that house's passengers.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use tc_core::{SimRng, SimTime};
use tc_spatial::CellCoord;
use tc_world::{Mood, TileContent};

use crate::event::{outcome_channel, OutcomeSender, OutcomeState, PendingOutcome};
use crate::{AiSystem, BehaviorError, BehaviorResult, Event, Snapshot};

// ── GrowthConfig ──────────────────────────────────────────────────────────────

/// Growth rates and passenger patience.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GrowthConfig {
    pub min_passenger_interval: SimTime,
    pub max_passenger_interval: SimTime,
    pub min_business_interval:  SimTime,
    pub max_business_interval:  SimTime,
    pub min_house_interval:     SimTime,
    pub max_house_interval:     SimTime,
    /// Waiting longer than this makes a passenger leave.
    pub max_passenger_wait:     SimTime,
    /// Waits shorter than this are [`Mood::New`].
    pub ok_after:               SimTime,
    /// Waits shorter than this (and at least `ok_after`) are [`Mood::Ok`].
    pub getting_upset_after:    SimTime,
    /// Waits at least this long are [`Mood::Upset`].
    pub upset_after:            SimTime,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            min_passenger_interval: SimTime::hours(1),
            max_passenger_interval: SimTime::hours(2),
            min_business_interval:  SimTime::hours(8),
            max_business_interval:  SimTime::days(1),
            min_house_interval:     SimTime::hours(4),
            max_house_interval:     SimTime::days(1),
            max_passenger_wait:     SimTime::hours(6),
            ok_after:               SimTime::minutes(45),
            getting_upset_after:    SimTime::hours(2),
            upset_after:            SimTime::hours(4),
        }
    }
}

impl GrowthConfig {
    pub fn validate(&self) -> BehaviorResult<()> {
        let pairs = [
            ("passenger", self.min_passenger_interval, self.max_passenger_interval),
            ("business", self.min_business_interval, self.max_business_interval),
            ("house", self.min_house_interval, self.max_house_interval),
        ];
        for (name, min, max) in pairs {
            if min > max {
                return Err(BehaviorError::Config(format!(
                    "{name} interval: min {} exceeds max {}",
                    min.as_secs(),
                    max.as_secs()
                )));
            }
        }
        if !(self.ok_after <= self.getting_upset_after && self.getting_upset_after <= self.upset_after) {
            return Err(BehaviorError::Config("mood thresholds must be non-decreasing".into()));
        }
        Ok(())
    }

    /// Mood a passenger should have after waiting `waited`.
    pub fn expected_mood(&self, waited: SimTime) -> Mood {
        if waited < self.ok_after {
            Mood::New
        } else if waited < self.getting_upset_after {
            Mood::Ok
        } else if waited < self.upset_after {
            Mood::GettingUpset
        } else {
            Mood::Upset
        }
    }
}

// ── DurationConstraint ────────────────────────────────────────────────────────

/// Rate limiter firing roughly once per `[min, max]` interval with at most
/// one event in flight.  See the module docs.
#[derive(Debug)]
pub struct DurationConstraint {
    min_minutes: u64,
    max_minutes: u64,
    last_fired:  Option<SimTime>,
    pending:     Option<PendingOutcome>,
}

impl DurationConstraint {
    /// `last_fired == None` means "never fired": the first evaluation fires.
    pub fn new(min: SimTime, max: SimTime, last_fired: Option<SimTime>) -> Self {
        let min_minutes = min.whole_minutes();
        Self {
            min_minutes,
            max_minutes: max.whole_minutes().max(min_minutes),
            last_fired,
            pending: None,
        }
    }

    #[inline]
    pub fn last_fired(&self) -> Option<SimTime> {
        self.last_fired
    }

    /// `true` while a fired event has not reported back.
    #[inline]
    pub fn is_waiting(&self) -> bool {
        self.pending.is_some()
    }

    /// Maybe fire.  `create` builds the event around the outcome sender it
    /// is given and may decline by returning `None`.
    pub fn consider<F>(&mut self, now: SimTime, rng: &mut SimRng, create: F) -> Option<Event>
    where
        F: FnOnce(&mut SimRng, OutcomeSender) -> Option<Event>,
    {
        if let Some(pending) = self.pending.as_mut() {
            match pending.poll() {
                OutcomeState::Pending => return None,
                OutcomeState::Resolved(Some(at)) => self.last_fired = Some(at),
                OutcomeState::Resolved(None) | OutcomeState::Dropped => {}
            }
            self.pending = None;
        }

        if let Some(last) = self.last_fired {
            let threshold = rng.gen_range(self.min_minutes..=self.max_minutes);
            if threshold > now.saturating_since(last).whole_minutes() {
                return None;
            }
        }

        let (tx, rx) = outcome_channel();
        let event = create(rng, tx)?;
        self.pending = Some(rx);
        Some(event)
    }
}

// ── CityGrowth ────────────────────────────────────────────────────────────────

/// City AI: grows houses and businesses, spawns passengers next to houses,
/// updates moods, and sends away passengers who waited too long.
#[derive(Debug)]
pub struct CityGrowth {
    config:    GrowthConfig,
    rng:       SimRng,
    business:  DurationConstraint,
    house:     DurationConstraint,
    per_house: FxHashMap<CellCoord, DurationConstraint>,
}

impl CityGrowth {
    pub fn new(config: GrowthConfig, rng: SimRng) -> Self {
        Self::resume(config, rng, None, None)
    }

    /// Continue a saved game: growth clocks restart from the saved
    /// last-fire times.
    pub fn resume(
        config:        GrowthConfig,
        rng:           SimRng,
        last_business: Option<SimTime>,
        last_house:    Option<SimTime>,
    ) -> Self {
        let business = DurationConstraint::new(config.min_business_interval, config.max_business_interval, last_business);
        let house = DurationConstraint::new(config.min_house_interval, config.max_house_interval, last_house);
        Self { config, rng, business, house, per_house: FxHashMap::default() }
    }

    #[inline]
    pub fn config(&self) -> &GrowthConfig {
        &self.config
    }

    pub fn last_business(&self) -> Option<SimTime> {
        self.business.last_fired()
    }

    pub fn last_house(&self) -> Option<SimTime> {
        self.house.last_fired()
    }

    fn grow_buildings(&mut self, now: SimTime, events: &mut Vec<Event>) {
        if let Some(event) = self.business.consider(now, &mut self.rng, |_, tx| {
            Some(Event::AddBusiness { outcome: Some(tx) })
        }) {
            debug!(%now, "business growth fired");
            events.push(event);
        }
        if let Some(event) = self.house.consider(now, &mut self.rng, |_, tx| {
            Some(Event::AddHouse { outcome: Some(tx) })
        }) {
            debug!(%now, "house growth fired");
            events.push(event);
        }
    }

    /// One constraint per house.  A new passenger prefers a road next to the
    /// house that has nobody waiting on it, and otherwise any neighbour; the
    /// world rejects tiles that are neither road nor grass.
    fn spawn_passengers(&mut self, snapshot: &Snapshot, events: &mut Vec<Event>) {
        let occupied: FxHashSet<CellCoord> =
            snapshot.waiting.iter().map(|p| snapshot.grid.nearest_cell(p.pos)).collect();
        let houses: FxHashSet<CellCoord> = snapshot.house_tiles.iter().copied().collect();
        self.per_house.retain(|cell, _| houses.contains(cell));

        let Self { config, rng, per_house, .. } = self;
        for &house in &snapshot.house_tiles {
            let constraint = per_house.entry(house).or_insert_with(|| {
                DurationConstraint::new(config.min_passenger_interval, config.max_passenger_interval, None)
            });
            let fired = constraint.consider(snapshot.now, rng, |rng, tx| {
                let (good, other): (Vec<CellCoord>, Vec<CellCoord>) = snapshot
                    .grid
                    .neighbors(house)
                    .partition(|&n| snapshot.tile(n).content == TileContent::Road && !occupied.contains(&n));
                let candidates = if good.is_empty() { other } else { good };
                let at = *rng.choose(&candidates)?;
                Some(Event::AddPassenger { at, outcome: Some(tx) })
            });
            if let Some(event) = fired {
                debug!(%house, now = %snapshot.now, "passenger spawn fired");
                events.push(event);
            }
        }
    }

    fn update_waiting(&self, snapshot: &Snapshot, events: &mut Vec<Event>) {
        for p in &snapshot.waiting {
            let waited = snapshot.now.saturating_since(p.creation_time);
            let mood = self.config.expected_mood(waited);
            if mood != p.mood {
                events.push(Event::SetPassengerMood { passenger: p.id, mood });
            }
        }
        for p in &snapshot.waiting {
            if snapshot.now.saturating_since(p.creation_time) > self.config.max_passenger_wait {
                debug!(passenger = %p.id, "passenger gave up waiting");
                events.push(Event::RemoveUpsetPassenger(p.id));
            }
        }
    }
}

impl AiSystem for CityGrowth {
    fn name(&self) -> &'static str {
        "city_growth"
    }

    fn decide(&mut self, snapshot: &Snapshot) -> Vec<Event> {
        let mut events = Vec::new();
        self.grow_buildings(snapshot.now, &mut events);
        self.spawn_passengers(snapshot, &mut events);
        self.update_waiting(snapshot, &mut events);
        events
    }
}
