//! Simulated time model.
//!
//! # Design
//!
//! Simulated time is a whole number of seconds since the game started
//! ([`SimTime`]).  It is advanced only by the fast (physics) tick, by an
//! amount fixed per [`GameSpeed`]:
//!
//! | Speed    | Simulated time per fast tick |
//! |----------|------------------------------|
//! | `Paused` | 0 s                          |
//! | `Slow`   | 5 s                          |
//! | `Normal` | 10 s                         |
//! | `Fast`   | 20 s                         |
//!
//! Wall-clock cadence lives in [`SimConfig`] and never feeds back into
//! simulated time, so a run replays identically regardless of host load.

use std::fmt;
use std::time::Duration;

use crate::{CoreError, CoreResult};

// ── SimTime ───────────────────────────────────────────────────────────────────

/// Seconds of simulated time.  Used both as an instant (time since start) and
/// as a span.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SimTime(pub u64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0);

    #[inline]
    pub const fn secs(s: u64) -> SimTime {
        SimTime(s)
    }

    #[inline]
    pub const fn minutes(m: u64) -> SimTime {
        SimTime(m * 60)
    }

    #[inline]
    pub const fn hours(h: u64) -> SimTime {
        SimTime(h * 3_600)
    }

    #[inline]
    pub const fn days(d: u64) -> SimTime {
        SimTime(d * 86_400)
    }

    #[inline]
    pub fn as_secs(self) -> u64 {
        self.0
    }

    #[inline]
    pub fn whole_minutes(self) -> u64 {
        self.0 / 60
    }

    /// Span from `earlier` to `self`, zero if `earlier` is in the future.
    #[inline]
    pub fn saturating_since(self, earlier: SimTime) -> SimTime {
        SimTime(self.0.saturating_sub(earlier.0))
    }

    /// Fraction of a simulated minute this span represents.
    #[inline]
    pub fn in_minutes_f64(self) -> f64 {
        self.0 as f64 / 60.0
    }
}

impl std::ops::Add for SimTime {
    type Output = SimTime;
    #[inline]
    fn add(self, rhs: SimTime) -> SimTime {
        SimTime(self.0 + rhs.0)
    }
}

impl std::ops::AddAssign for SimTime {
    #[inline]
    fn add_assign(&mut self, rhs: SimTime) {
        self.0 += rhs.0;
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let days = self.0 / 86_400;
        let hours = (self.0 % 86_400) / 3_600;
        let minutes = (self.0 % 3_600) / 60;
        write!(f, "day {} {:02}:{:02}", days, hours, minutes)
    }
}

// ── GameSpeed ─────────────────────────────────────────────────────────────────

/// Simulation speed.  Each state is bound to a fixed amount of simulated time
/// advanced per fast tick.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameSpeed {
    #[default]
    Paused,
    Slow,
    Normal,
    Fast,
}

impl GameSpeed {
    /// Simulated time advanced by one fast tick at this speed.
    pub fn tick_advance(self) -> SimTime {
        match self {
            GameSpeed::Paused => SimTime::ZERO,
            GameSpeed::Slow   => SimTime::secs(5),
            GameSpeed::Normal => SimTime::secs(10),
            GameSpeed::Fast   => SimTime::secs(20),
        }
    }

    #[inline]
    pub fn is_paused(self) -> bool {
        self == GameSpeed::Paused
    }
}

impl fmt::Display for GameSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GameSpeed::Paused => "paused",
            GameSpeed::Slow   => "slow",
            GameSpeed::Normal => "normal",
            GameSpeed::Fast   => "fast",
        };
        f.write_str(name)
    }
}

// ── GameClock ─────────────────────────────────────────────────────────────────

/// Current simulated time plus the speed state machine.  Starts paused.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GameClock {
    now:   SimTime,
    speed: GameSpeed,
}

impl GameClock {
    /// A paused clock resuming at `now` (e.g. after a load).
    pub fn starting_at(now: SimTime) -> Self {
        Self { now, speed: GameSpeed::Paused }
    }

    #[inline]
    pub fn now(&self) -> SimTime {
        self.now
    }

    #[inline]
    pub fn speed(&self) -> GameSpeed {
        self.speed
    }

    pub fn set_speed(&mut self, speed: GameSpeed) {
        self.speed = speed;
    }

    /// Advance by one fast tick and return the simulated time that passed.
    pub fn tick(&mut self) -> SimTime {
        let delta = self.speed.tick_advance();
        self.now += delta;
        delta
    }
}

impl fmt::Display for GameClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.now, self.speed)
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Wall-clock cadence and seeding for a run.
///
/// Typically loaded from a TOML file by the application and handed to the
/// game loop builder.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Fast (physics/economy) tick period in milliseconds.
    pub physics_period_ms: u64,

    /// Slow (AI) tick period in milliseconds.
    pub ai_period_ms: u64,

    /// Master RNG seed.  The same seed and the same event stream always give
    /// the same world.
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            physics_period_ms: 16,
            ai_period_ms:      250,
            seed:              0x7a71_c17e,
        }
    }
}

impl SimConfig {
    pub fn physics_period(&self) -> Duration {
        Duration::from_millis(self.physics_period_ms)
    }

    pub fn ai_period(&self) -> Duration {
        Duration::from_millis(self.ai_period_ms)
    }

    /// Reject zero periods (a zero-period `tokio` interval panics).
    pub fn validate(&self) -> CoreResult<()> {
        if self.physics_period_ms == 0 {
            return Err(CoreError::Config("physics_period_ms must be > 0".into()));
        }
        if self.ai_period_ms == 0 {
            return Err(CoreError::Config("ai_period_ms must be > 0".into()));
        }
        Ok(())
    }
}
