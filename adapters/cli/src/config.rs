use std::{fs, path::Path, time::Duration};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use snake_duel_core::{EdgePolicy, GridDimensions};
use snake_duel_world::{
    Rules, DEFAULT_BARRIER_OFFSET, DEFAULT_FOOD_RESPAWN_DELAY, DEFAULT_FOOD_SPAWN_ATTEMPTS,
    DEFAULT_TICK_INTERVAL,
};

const DEFAULT_WINDOW_WIDTH: u32 = 1000;
const DEFAULT_WINDOW_HEIGHT: u32 = 600;
const DEFAULT_CELL_SIZE: u32 = 20;

/// Session settings read from a TOML file. Every key is optional.
///
/// ```toml
/// [grid]
/// width = 1000
/// height = 600
/// cell_size = 20
/// barrier_offset = 10
///
/// [rules]
/// edge_policy = "bounded"
/// tick_interval_ms = 100
/// food_respawn_ms = 5000
/// food_spawn_attempts = 1000
/// seed = 7
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SessionConfig {
    grid: GridSection,
    rules: RulesSection,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct GridSection {
    width: u32,
    height: u32,
    cell_size: u32,
    barrier_offset: u32,
}

impl Default for GridSection {
    fn default() -> Self {
        Self {
            width: DEFAULT_WINDOW_WIDTH,
            height: DEFAULT_WINDOW_HEIGHT,
            cell_size: DEFAULT_CELL_SIZE,
            barrier_offset: DEFAULT_BARRIER_OFFSET,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RulesSection {
    edge_policy: EdgePolicy,
    tick_interval_ms: u64,
    food_respawn_ms: u64,
    food_spawn_attempts: u32,
    seed: Option<u64>,
}

impl Default for RulesSection {
    fn default() -> Self {
        Self {
            edge_policy: EdgePolicy::default(),
            tick_interval_ms: duration_millis(DEFAULT_TICK_INTERVAL),
            food_respawn_ms: duration_millis(DEFAULT_FOOD_RESPAWN_DELAY),
            food_spawn_attempts: DEFAULT_FOOD_SPAWN_ATTEMPTS,
            seed: None,
        }
    }
}

/// Validated settings ready to boot a world.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Session {
    pub(crate) rules: Rules,
    pub(crate) grid: GridDimensions,
    pub(crate) barrier_offset: u32,
}

impl SessionConfig {
    /// Reads and parses the configuration file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read session config at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid session config at {}", path.display()))
    }

    pub(crate) fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse session config toml contents")
    }

    /// Validates the settings. `seed_override` takes precedence over the file.
    pub(crate) fn resolve(&self, seed_override: Option<u64>) -> Result<Session> {
        let grid = GridDimensions::from_pixels(
            self.grid.width,
            self.grid.height,
            self.grid.cell_size,
        )
        .with_context(|| {
            format!(
                "a {}x{} window with {} pixel cells does not fit a single cell",
                self.grid.width, self.grid.height, self.grid.cell_size
            )
        })?;

        if self.rules.tick_interval_ms == 0 {
            bail!("tick_interval_ms must be greater than zero");
        }

        let defaults = Rules::default();
        let rules = Rules {
            edge_policy: self.rules.edge_policy,
            tick_interval: Duration::from_millis(self.rules.tick_interval_ms),
            food_respawn_delay: Duration::from_millis(self.rules.food_respawn_ms),
            food_spawn_attempts: self.rules.food_spawn_attempts,
            rng_seed: seed_override
                .or(self.rules.seed)
                .unwrap_or(defaults.rng_seed),
        };

        Ok(Session {
            rules,
            grid,
            barrier_offset: self.grid.barrier_offset,
        })
    }
}

fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
