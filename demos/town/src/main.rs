//! town — a small taxi town run in real time, saved, and reloaded.
//!
//! Lays out a cross of roads with one taxi station, lets the city grow on
//! FAST speed for a few wall-clock seconds, then writes a JSON save and
//! resumes from it.
//!
//! ```text
//! cargo run -p town                          # built-in settings
//! cargo run -p town -- demos/town/town.toml  # settings from TOML
//! RUST_LOG=tc_behavior=debug cargo run -p town
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tc_behavior::{Event, GrowthConfig};
use tc_core::{GameSpeed, SimConfig};
use tc_save::{JsonCodec, load_from_path, save_to_path};
use tc_sim::{SimBuilder, WorldView};
use tc_spatial::CellCoord;
use tc_world::{TileContent, World, WorldConfig};

// ── Settings ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Settings {
    /// Wall-clock seconds to run before saving.
    run_secs:  u64,
    save_path: PathBuf,
    sim:       SimConfig,
    world:     WorldConfig,
    growth:    GrowthConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            run_secs:  5,
            save_path: PathBuf::from("target/town-save.json"),
            sim:       SimConfig::default(),
            world:     WorldConfig { width: 12, height: 8, ..WorldConfig::default() },
            growth:    GrowthConfig::default(),
        }
    }
}

fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let Some(path) = path else {
        return Ok(Settings::default());
    };
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

// ── Map ───────────────────────────────────────────────────────────────────────

/// A road along the middle row and one down the middle column, with the
/// taxi station just above the west end of the east-west road.
fn lay_out(config: &WorldConfig, seed: u64) -> Result<(World, CellCoord)> {
    ensure!(config.width >= 3 && config.height >= 3, "town needs at least a 3x3 map");
    let mut world = World::new(config, seed)?;

    let mid_row = config.height / 2;
    let mid_col = config.width / 2;
    for col in 0..config.width {
        world.place(CellCoord::new(mid_row, col), TileContent::Road)?;
    }
    for row in 0..config.height {
        world.place(CellCoord::new(row, mid_col), TileContent::Road)?;
    }

    let station = CellCoord::new(mid_row - 1, 0);
    world.add_taxi_station(station).context("cannot afford the taxi station")?;
    Ok((world, station))
}

fn summary(view: &WorldView) {
    info!(
        now = %view.now,
        money = view.money,
        delivered = view.delivered,
        missed = view.missed,
        cars = view.cars.len(),
        waiting = view.passengers.iter().filter(|p| !p.riding).count(),
        "town"
    );
}

// ── main ──────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = std::env::args().collect();
    let settings = load_settings(args.get(1).map(Path::new))?;
    info!(?settings, "settings");

    // 1. Lay out the map and start the loop.
    let (world, station) = lay_out(&settings.world, settings.sim.seed)?;
    let handle = SimBuilder::new(settings.sim.clone())
        .world(world)
        .growth_config(settings.growth.clone())
        .build_loop()?
        .spawn();

    // 2. Player input: a second car, then full speed.
    handle.add_event(Event::AddCarToStation(station))?;
    handle.add_event(Event::SetGameSpeed(GameSpeed::Fast))?;

    // 3. Report once a wall-clock second.
    let mut report = tokio::time::interval(Duration::from_secs(1));
    report.tick().await;
    for _ in 0..settings.run_secs {
        report.tick().await;
        summary(&handle.view());
    }

    // 4. Stop, save, reload.
    let stopped = handle.shutdown().await?;
    let codec = JsonCodec::pretty();
    if let Some(dir) = settings.save_path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    save_to_path(&codec, &stopped.save(), &settings.save_path)?;

    let saved = load_from_path(&codec, &settings.save_path)?
        .with_context(|| format!("{} vanished after saving", settings.save_path.display()))?;
    let resumed = SimBuilder::new(settings.sim).growth_config(settings.growth).saved_game(saved).build()?;
    info!(
        now = %resumed.world().now(),
        houses = resumed.world().house_tiles().len(),
        businesses = resumed.world().business_tiles().len(),
        passengers = resumed.world().passengers().len(),
        "reloaded save"
    );
    Ok(())
}
