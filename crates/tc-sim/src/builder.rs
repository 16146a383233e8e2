//! Fluent builder for constructing a [`Sim`] or a [`GameLoop`].

use tracing::info;

use tc_behavior::{AiSystem, CityGrowth, GrowthConfig, TaxiDispatch};
use tc_core::{SimConfig, SimRng};
use tc_save::{SavedGame, SavedGrowth};
use tc_world::{World, WorldConfig};

use crate::{AiRunner, GameLoop, NoopObserver, Sim, SimResult, WorldObserver};

/// Offset of the city-growth RNG stream derived from the master seed.
const GROWTH_STREAM: u64 = 1;

enum WorldSource {
    Fresh(WorldConfig),
    Given(World),
    Saved(Box<SavedGame>),
}

/// Fluent builder for [`Sim<O>`] and [`GameLoop`].
///
/// # Optional inputs (have defaults)
///
/// | Method                | Default                                |
/// |-----------------------|----------------------------------------|
/// | `.world_config(c)`    | `WorldConfig::default()` (fresh map)   |
/// | `.world(w)`           | —                                      |
/// | `.saved_game(g)`      | —                                      |
/// | `.growth_config(c)`   | `GrowthConfig::default()`              |
/// | `.growth_clocks(s)`   | never fired (or the save's clocks)     |
/// | `.car_ai(a)`          | `TaxiDispatch`                         |
/// | `.observer(o)`        | `NoopObserver`                         |
///
/// The last of `.world_config`, `.world`, and `.saved_game` wins.
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(SimConfig::default())
///     .world_config(WorldConfig { width: 12, height: 12, ..WorldConfig::default() })
///     .build()?;
/// sim.apply(Event::SetGameSpeed(GameSpeed::Fast));
/// sim.run_ticks(1_000);
/// ```
pub struct SimBuilder<O: WorldObserver = NoopObserver> {
    config:   SimConfig,
    source:   WorldSource,
    growth:   GrowthConfig,
    clocks:   Option<SavedGrowth>,
    car_ai:   Box<dyn AiSystem>,
    observer: O,
}

impl SimBuilder<NoopObserver> {
    pub fn new(config: SimConfig) -> Self {
        Self {
            config,
            source:   WorldSource::Fresh(WorldConfig::default()),
            growth:   GrowthConfig::default(),
            clocks:   None,
            car_ai:   Box::new(TaxiDispatch::new()),
            observer: NoopObserver,
        }
    }
}

impl<O: WorldObserver> SimBuilder<O> {
    /// Start from an empty map of this size.
    pub fn world_config(mut self, config: WorldConfig) -> Self {
        self.source = WorldSource::Fresh(config);
        self
    }

    /// Start from an existing world.
    pub fn world(mut self, world: World) -> Self {
        self.source = WorldSource::Given(world);
        self
    }

    /// Start from a saved game.  Its growth clocks are used unless
    /// [`growth_clocks`][Self::growth_clocks] overrides them.
    pub fn saved_game(mut self, game: SavedGame) -> Self {
        self.source = WorldSource::Saved(Box::new(game));
        self
    }

    pub fn growth_config(mut self, growth: GrowthConfig) -> Self {
        self.growth = growth;
        self
    }

    /// Last-fire times of the business and house generators.
    pub fn growth_clocks(mut self, clocks: SavedGrowth) -> Self {
        self.clocks = Some(clocks);
        self
    }

    /// Replace the car AI (e.g. with `NoopAi` to keep cars still).
    pub fn car_ai<A: AiSystem>(mut self, ai: A) -> Self {
        self.car_ai = Box::new(ai);
        self
    }

    pub fn observer<P: WorldObserver>(self, observer: P) -> SimBuilder<P> {
        SimBuilder {
            config:   self.config,
            source:   self.source,
            growth:   self.growth,
            clocks:   self.clocks,
            car_ai:   self.car_ai,
            observer,
        }
    }

    /// Validate inputs and return a ready-to-step [`Sim`].
    pub fn build(self) -> SimResult<Sim<O>> {
        let (config, world, ai, observer) = self.assemble()?;
        Ok(Sim::new(config, world, ai, observer))
    }

    fn assemble(self) -> SimResult<(SimConfig, World, AiRunner, O)> {
        self.config.validate()?;
        self.growth.validate()?;

        let (world, saved_clocks) = match self.source {
            WorldSource::Fresh(config) => (World::new(&config, self.config.seed)?, SavedGrowth::default()),
            WorldSource::Given(world) => (world, SavedGrowth::default()),
            WorldSource::Saved(game) => {
                let restored = tc_save::restore(&game, self.config.seed)?;
                info!(now = %restored.world.now(), "resuming saved game");
                (restored.world, restored.growth)
            }
        };
        let clocks = self.clocks.unwrap_or(saved_clocks);

        let mut root = SimRng::new(self.config.seed);
        let city = CityGrowth::resume(self.growth, root.child(GROWTH_STREAM), clocks.last_business, clocks.last_house);
        Ok((self.config, world, AiRunner::new(self.car_ai, city), self.observer))
    }
}

impl<O: WorldObserver + 'static> SimBuilder<O> {
    /// Validate inputs and return a [`GameLoop`] ready to be spawned.
    pub fn build_loop(self) -> SimResult<GameLoop> {
        let (config, world, ai, observer) = self.assemble()?;
        Ok(GameLoop::new(config, world, ai, Box::new(observer)))
    }
}
