#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Snake Duel engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values that systems
//! consume to keep their own view of the round in sync. Renderers never touch
//! the world directly; they read a [`RoundSnapshot`] instead.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Snake Duel.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Reconfigures the grid and barrier offset, then starts a fresh round.
    Configure {
        /// Validated grid dimensions measured in cells.
        grid: GridDimensions,
        /// Distance of each barrier line from its grid edge.
        barrier_offset: u32,
    },
    /// Replaces the fixed starting layout of both snakes and starts a fresh round.
    ConfigureSpawns {
        /// Starting layout for snake one and snake two, in that order.
        spawns: [SnakeSpawn; 2],
    },
    /// Queues a heading change that the snake commits on its next tick.
    SetHeading {
        /// Snake receiving the new heading.
        snake: SnakeId,
        /// Requested direction of travel.
        heading: Heading,
    },
    /// Advances the simulation clock by the provided delta time.
    Advance {
        /// Duration of real time that elapsed since the previous frame.
        dt: Duration,
    },
    /// Requests a fresh round. Honoured only once the current round has ended.
    RequestRestart,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Announces that a new round was laid out and is accepting input.
    RoundStarted {
        /// Dimensions of the grid the round plays on.
        grid: GridDimensions,
        /// Number of barrier cells placed for the round.
        barrier_cells: usize,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of time that elapsed in the frame.
        dt: Duration,
    },
    /// Confirms that a heading was accepted as the snake's pending heading.
    HeadingQueued {
        /// Snake whose pending heading changed.
        snake: SnakeId,
        /// Heading that will be committed on the next tick.
        heading: Heading,
    },
    /// Reports that a heading reversing the snake's committed heading was ignored.
    HeadingRejected {
        /// Snake that received the request.
        snake: SnakeId,
        /// Heading that was rejected.
        heading: Heading,
    },
    /// Announces that the fixed-interval scheduler fired a movement tick.
    TickFired {
        /// Monotonic index of the tick within the round, starting at one.
        tick: u64,
    },
    /// Reports the result of stepping a snake during a tick.
    SnakeStepped {
        /// Snake that was stepped.
        snake: SnakeId,
        /// Result of the step.
        outcome: StepOutcome,
    },
    /// Confirms that a snake ate the food in a region.
    FoodConsumed {
        /// Snake that ate the food.
        snake: SnakeId,
        /// Region the food belonged to.
        region: FoodRegion,
        /// Cell the food occupied.
        cell: CellCoord,
    },
    /// Confirms that food appeared in a region.
    FoodSpawned {
        /// Region that received the food.
        region: FoodRegion,
        /// Cell the food occupies.
        cell: CellCoord,
    },
    /// Reports that a placement attempt found no free cell in the region.
    FoodPlacementFailed {
        /// Region whose attempt was exhausted.
        region: FoodRegion,
    },
    /// Announces that the round reached its terminal state.
    RoundEnded {
        /// Snake whose failed step ended the round.
        snake: SnakeId,
        /// Failing outcome that ended the round.
        outcome: StepOutcome,
    },
}

/// Identifies one of the two snakes taking part in a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SnakeId {
    /// The first snake; stepped first on every tick.
    One,
    /// The second snake; stepped after snake one.
    Two,
}

impl SnakeId {
    /// Both snakes in the fixed order they are stepped within a tick.
    pub const ALL: [SnakeId; 2] = [SnakeId::One, SnakeId::Two];

    /// Zero-based index of the snake within [`SnakeId::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
        }
    }

    /// One-based player number, as shown to players.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }
}

/// Cardinal directions a snake may travel in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Heading {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Heading {
    /// Every heading, in a stable order.
    pub const ALL: [Heading; 4] = [Heading::Up, Heading::Down, Heading::Left, Heading::Right];

    /// Column and row delta applied by a single step in this heading.
    #[must_use]
    pub const fn unit_vector(self) -> (i64, i64) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    /// Heading that reverses this one along the same axis.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Reports whether `other` reverses this heading.
    #[must_use]
    pub fn is_opposite(self, other: Heading) -> bool {
        self.opposite() == other
    }
}

/// Rule applied when a snake's head would leave the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgePolicy {
    /// The head re-enters on the opposite edge; bounds never end the round.
    Wrap,
    /// Leaving the grid or entering a barrier kills the snake.
    #[default]
    Bounded,
}

/// Side region of the grid in which one food item may spawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoodRegion {
    /// Columns strictly left of the left barrier line.
    Left,
    /// Columns strictly right of the right barrier line.
    Right,
}

impl FoodRegion {
    /// Both regions in the order food is checked and spawned.
    pub const ALL: [FoodRegion; 2] = [FoodRegion::Left, FoodRegion::Right];

    /// Zero-based index of the region within [`FoodRegion::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => 1,
        }
    }

    /// The region on the other side of the barrier pair.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Result of stepping a single snake by one cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StepOutcome {
    /// The snake moved; `grew` is set when food was eaten on this step.
    Advanced {
        /// Cell the head occupies after the step.
        head: CellCoord,
        /// Whether the tail was kept because food was consumed.
        grew: bool,
    },
    /// The head would have left the bounded grid.
    OutOfBounds,
    /// The head would have entered a barrier cell.
    HitBarrier,
}

impl StepOutcome {
    /// Reports whether the snake survived the step.
    #[must_use]
    pub const fn is_advanced(&self) -> bool {
        matches!(self, Self::Advanced { .. })
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Reasons a grid configuration may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The grid would contain no columns.
    #[error("grid must contain at least one column")]
    ZeroColumns,
    /// The grid would contain no rows.
    #[error("grid must contain at least one row")]
    ZeroRows,
    /// Pixel dimensions cannot be divided into zero-sized cells.
    #[error("cell size must be at least one pixel")]
    ZeroCellSize,
}

/// Immutable dimensions of the simulation grid measured in cells.
///
/// Both dimensions are guaranteed to be non-zero; construction fails with a
/// [`ConfigError`] otherwise. The grid itself is agnostic of the active
/// [`EdgePolicy`] and only supplies the bounds test and the wrap helper that
/// each policy builds on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct GridDimensions {
    columns: u32,
    rows: u32,
}

impl GridDimensions {
    /// Creates grid dimensions, rejecting empty grids.
    pub const fn new(columns: u32, rows: u32) -> Result<Self, ConfigError> {
        if columns == 0 {
            return Err(ConfigError::ZeroColumns);
        }
        if rows == 0 {
            return Err(ConfigError::ZeroRows);
        }
        Ok(Self { columns, rows })
    }

    /// Derives the grid that fits a pixel area, truncating partial cells.
    pub const fn from_pixels(width: u32, height: u32, cell_size: u32) -> Result<Self, ConfigError> {
        if cell_size == 0 {
            return Err(ConfigError::ZeroCellSize);
        }
        Self::new(width / cell_size, height / cell_size)
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Total number of cells in the grid.
    #[must_use]
    pub const fn cell_count(&self) -> u64 {
        self.columns as u64 * self.rows as u64
    }

    /// Reports whether the signed coordinate lies inside the grid.
    #[must_use]
    pub fn contains(&self, column: i64, row: i64) -> bool {
        (0..i64::from(self.columns)).contains(&column) && (0..i64::from(self.rows)).contains(&row)
    }

    /// Neighbouring cell in `heading`, wrapping across the grid edges.
    #[must_use]
    pub fn wrapped_neighbor(&self, cell: CellCoord, heading: Heading) -> CellCoord {
        let (column, row) = offset(cell, heading);
        CellCoord::new(wrap(column, self.columns), wrap(row, self.rows))
    }

    /// Neighbouring cell in `heading`, or `None` when it lies outside the grid.
    #[must_use]
    pub fn bounded_neighbor(&self, cell: CellCoord, heading: Heading) -> Option<CellCoord> {
        let (column, row) = offset(cell, heading);
        if !self.contains(column, row) {
            return None;
        }
        Some(CellCoord::new(
            u32::try_from(column).ok()?,
            u32::try_from(row).ok()?,
        ))
    }

    /// Moves the provided cell onto the nearest cell inside the grid.
    #[must_use]
    pub fn clamp(&self, cell: CellCoord) -> CellCoord {
        CellCoord::new(
            cell.column().min(self.columns - 1),
            cell.row().min(self.rows - 1),
        )
    }
}

/// Wraps a signed coordinate into `0..modulus`.
///
/// Unlike the `%` operator this stays non-negative for negative inputs, so a
/// step left from column zero lands on the last column. A zero modulus yields
/// zero.
#[must_use]
pub fn wrap(value: i64, modulus: u32) -> u32 {
    let modulus = i64::from(modulus);
    if modulus == 0 {
        return 0;
    }
    let wrapped = ((value % modulus) + modulus) % modulus;
    u32::try_from(wrapped).unwrap_or(0)
}

fn offset(cell: CellCoord, heading: Heading) -> (i64, i64) {
    let (dx, dy) = heading.unit_vector();
    (i64::from(cell.column()) + dx, i64::from(cell.row()) + dy)
}

/// Fixed starting layout applied to a snake whenever a round begins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SnakeSpawn {
    head: CellCoord,
    heading: Heading,
    length: u32,
}

impl SnakeSpawn {
    /// Creates a spawn whose body trails behind `head`, away from `heading`.
    ///
    /// Lengths below one are raised to one so snakes are never empty.
    #[must_use]
    pub const fn new(head: CellCoord, heading: Heading, length: u32) -> Self {
        let length = if length == 0 { 1 } else { length };
        Self {
            head,
            heading,
            length,
        }
    }

    /// Cell occupied by the head at the start of the round.
    #[must_use]
    pub const fn head(&self) -> CellCoord {
        self.head
    }

    /// Committed heading at the start of the round.
    #[must_use]
    pub const fn heading(&self) -> Heading {
        self.heading
    }

    /// Requested number of body segments, head included.
    #[must_use]
    pub const fn length(&self) -> u32 {
        self.length
    }
}

/// Immutable representation of a single snake used for rendering.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnakeSnapshot {
    /// Identifier of the snake.
    pub id: SnakeId,
    /// Body segments, head first.
    pub segments: Vec<CellCoord>,
    /// Committed heading.
    pub heading: Heading,
    /// Whether the snake survived every step so far this round.
    pub alive: bool,
}

impl SnakeSnapshot {
    /// Cell occupied by the head.
    #[must_use]
    pub fn head(&self) -> Option<CellCoord> {
        self.segments.first().copied()
    }
}

/// Food item currently visible in a region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodSnapshot {
    /// Region the food belongs to.
    pub region: FoodRegion,
    /// Cell the food occupies.
    pub cell: CellCoord,
}

/// Read-only copy of everything a renderer needs to draw a frame.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RoundSnapshot {
    /// Dimensions of the grid.
    pub grid: GridDimensions,
    /// Both snakes in [`SnakeId::ALL`] order.
    pub snakes: Vec<SnakeSnapshot>,
    /// Static barrier cells, ordered by column and row.
    pub barrier: Vec<CellCoord>,
    /// Active food items in [`FoodRegion::ALL`] order.
    pub food: Vec<FoodSnapshot>,
    /// Whether the round has ended.
    pub terminal: bool,
}

impl RoundSnapshot {
    /// Looks up the snapshot of a single snake.
    #[must_use]
    pub fn snake(&self, id: SnakeId) -> Option<&SnakeSnapshot> {
        self.snakes.iter().find(|snake| snake.id == id)
    }
}
