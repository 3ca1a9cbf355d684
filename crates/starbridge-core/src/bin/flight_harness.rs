//! Headless flight runner.
//!
//! Loads a scenario file, runs it for the requested number of ticks and
//! prints the state hash, so two builds (or two machines) can be checked
//! for identical behavior.
//!
//! ```text
//! flight_harness <scenario.json> [--snapshot]
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

use std::collections::BTreeMap;
use std::fs;
use std::sync::mpsc;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use starbridge_core::hash::snapshot_json;
use starbridge_core::{hash_world, Command, Entity, Notification, World, WorldConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Scenario file layout.
#[derive(Debug, Deserialize)]
struct Scenario {
    #[serde(default)]
    config: WorldConfig,
    entities: Vec<Entity>,
    /// Commands keyed by the tick before which they are applied.
    #[serde(default)]
    commands: BTreeMap<u64, Vec<Command>>,
    ticks: u64,
    #[serde(default = "default_tick_ms")]
    tick_ms: f64,
}

fn default_tick_ms() -> f64 {
    100.0
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        bail!("usage: flight_harness <scenario.json> [--snapshot]");
    };
    let snapshot = args.any(|arg| arg == "--snapshot");

    let text = fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    let scenario: Scenario =
        serde_json::from_str(&text).with_context(|| format!("parsing {path}"))?;

    let mut world = World::from_config(&scenario.config).context("building world")?;
    for entity in scenario.entities {
        world.add_entity(entity).context("loading entities")?;
    }
    let (tx, rx) = mpsc::channel::<Notification>();
    world.set_notifier(Box::new(tx));

    info!(
        path = %path,
        entities = world.store().len(),
        ticks = scenario.ticks,
        tick_ms = scenario.tick_ms,
        "scenario loaded"
    );

    for tick in 0..scenario.ticks {
        for command in scenario.commands.get(&tick).into_iter().flatten() {
            if let Err(err) = world.apply(command.clone()) {
                warn!(tick, error = %err, "command rejected");
            }
        }
        world.update(scenario.tick_ms);
        for notification in rx.try_iter() {
            info!(tick, topic = notification.topic(), entity = %notification.primary_entity(), "notification");
        }
    }

    let hash = hash_world(&world)?;
    info!(tick = world.tick(), hash = %format!("{hash:016x}"), "run complete");
    println!("{hash:016x}");

    if snapshot {
        println!("{}", snapshot_json(&world)?);
    }
    Ok(())
}
