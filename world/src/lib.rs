#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Snake Duel.
//!
//! The [`World`] owns every entity of a round: the grid, the barrier layout,
//! both snakes, the food regions, the movement clock and the terminal flag.
//! Adapters mutate it exclusively through [`apply`] and observe it through
//! the [`query`] module.

mod barrier;
mod clock;
mod food;
mod snake;

use std::time::Duration;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use snake_duel_core::{
    CellCoord, Command, EdgePolicy, Event, FoodRegion, GridDimensions, Heading, SnakeId,
    SnakeSpawn, WELCOME_BANNER,
};
use tracing::{debug, info};

use crate::{barrier::BarrierLayout, clock::TickClock, food::FoodSpawner, snake::Snake};

/// Grid derived from the default 1000x600 pixel window at 20 pixels per cell.
pub const DEFAULT_GRID: GridDimensions = match GridDimensions::from_pixels(1000, 600, 20) {
    Ok(grid) => grid,
    Err(_) => panic!("default grid must not be empty"),
};
/// Default distance of each barrier line from its grid edge.
pub const DEFAULT_BARRIER_OFFSET: u32 = 10;
/// Default interval between movement ticks.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(100);
/// Default delay before eaten food respawns.
pub const DEFAULT_FOOD_RESPAWN_DELAY: Duration = Duration::from_secs(5);
/// Default number of random draws made per food placement attempt.
pub const DEFAULT_FOOD_SPAWN_ATTEMPTS: u32 = 1000;

const DEFAULT_SNAKE_LENGTH: u32 = 5;
const DEFAULT_RNG_SEED: u64 = 0x5eed_d0e1_7a11_c0de;

/// Rules that stay fixed for the lifetime of a world.
#[derive(Clone, Debug, PartialEq)]
pub struct Rules {
    /// What happens when a snake's head would leave the grid.
    pub edge_policy: EdgePolicy,
    /// Simulated time between movement ticks.
    pub tick_interval: Duration,
    /// Delay between eating a region's food and its next placement attempt.
    pub food_respawn_delay: Duration,
    /// Random draws made before a placement attempt gives up.
    pub food_spawn_attempts: u32,
    /// Seed of the generator used for food placement.
    pub rng_seed: u64,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            edge_policy: EdgePolicy::Bounded,
            tick_interval: DEFAULT_TICK_INTERVAL,
            food_respawn_delay: DEFAULT_FOOD_RESPAWN_DELAY,
            food_spawn_attempts: DEFAULT_FOOD_SPAWN_ATTEMPTS,
            rng_seed: DEFAULT_RNG_SEED,
        }
    }
}

/// Represents the authoritative Snake Duel world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    rules: Rules,
    grid: GridDimensions,
    barrier_offset: u32,
    custom_spawns: Option<[SnakeSpawn; 2]>,
    rng: ChaCha8Rng,
    round_index: u64,
    round: Round,
}

impl World {
    /// Creates a world on the default grid with a round ready to play.
    ///
    /// The events of the first round start are discarded; use
    /// [`World::start`] to observe them.
    #[must_use]
    pub fn new(rules: Rules) -> Self {
        let mut events = Vec::new();
        Self::start(rules, &mut events)
    }

    /// Creates a world and reports the events of its first round start.
    #[must_use]
    pub fn start(rules: Rules, out_events: &mut Vec<Event>) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(rules.rng_seed);
        let round = Round::start(
            &rules,
            DEFAULT_GRID,
            DEFAULT_BARRIER_OFFSET,
            None,
            &mut rng,
            out_events,
        );
        let world = Self {
            banner: WELCOME_BANNER,
            rules,
            grid: DEFAULT_GRID,
            barrier_offset: DEFAULT_BARRIER_OFFSET,
            custom_spawns: None,
            rng,
            round_index: 1,
            round,
        };
        world.log_round_started();
        world
    }

    fn restart(&mut self, out_events: &mut Vec<Event>) {
        self.round_index = self.round_index.saturating_add(1);
        self.round = Round::start(
            &self.rules,
            self.grid,
            self.barrier_offset,
            self.custom_spawns,
            &mut self.rng,
            out_events,
        );
        self.log_round_started();
    }

    fn log_round_started(&self) {
        info!(
            round = self.round_index,
            columns = self.grid.columns(),
            rows = self.grid.rows(),
            "round started"
        );
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(Rules::default())
    }
}

/// Entities that are replaced wholesale whenever a round starts.
#[derive(Debug)]
struct Round {
    barrier: BarrierLayout,
    snakes: [Snake; 2],
    food: FoodSpawner,
    clock: TickClock,
    terminal: bool,
    tick_index: u64,
}

impl Round {
    fn start(
        rules: &Rules,
        grid: GridDimensions,
        barrier_offset: u32,
        custom_spawns: Option<[SnakeSpawn; 2]>,
        rng: &mut ChaCha8Rng,
        out_events: &mut Vec<Event>,
    ) -> Self {
        let barrier = BarrierLayout::build(grid, barrier_offset);
        let spawns = custom_spawns.unwrap_or_else(|| default_spawns(grid, &barrier));
        let snakes = SnakeId::ALL
            .map(|id| Snake::spawn(id, spawns[id.index()], grid, rules.edge_policy));
        let mut food = FoodSpawner::new(
            &barrier,
            grid.rows(),
            rules.food_respawn_delay,
            rules.food_spawn_attempts,
        );

        out_events.push(Event::RoundStarted {
            grid,
            barrier_cells: barrier.cells().len(),
        });
        food.seed(rng, |cell| is_blocked(&barrier, &snakes, cell), out_events);

        Self {
            barrier,
            snakes,
            food,
            clock: TickClock::new(rules.tick_interval),
            terminal: false,
            tick_index: 0,
        }
    }

    fn set_heading(&mut self, snake: SnakeId, heading: Heading, out_events: &mut Vec<Event>) {
        if self.terminal {
            return;
        }
        if self.snakes[snake.index()].set_pending_heading(heading) {
            out_events.push(Event::HeadingQueued { snake, heading });
        } else {
            out_events.push(Event::HeadingRejected { snake, heading });
        }
    }

    fn advance(
        &mut self,
        dt: Duration,
        rules: &Rules,
        grid: GridDimensions,
        rng: &mut ChaCha8Rng,
        out_events: &mut Vec<Event>,
    ) {
        if self.terminal {
            return;
        }
        out_events.push(Event::TimeAdvanced { dt });

        let Self {
            barrier,
            snakes,
            food,
            ..
        } = &mut *self;
        food.update(dt, rng, |cell| is_blocked(barrier, snakes, cell), out_events);

        if self.clock.advance(dt) {
            self.fire_tick(rules.edge_policy, grid, out_events);
        }
    }

    fn fire_tick(&mut self, policy: EdgePolicy, grid: GridDimensions, out_events: &mut Vec<Event>) {
        self.tick_index = self.tick_index.saturating_add(1);
        out_events.push(Event::TickFired {
            tick: self.tick_index,
        });

        for id in SnakeId::ALL {
            let food = &mut self.food;
            let mut eaten = None;
            let outcome = self.snakes[id.index()].step(grid, &self.barrier, policy, |cell| {
                eaten = food.consume_at(cell).map(|region| (region, cell));
                eaten.is_some()
            });
            out_events.push(Event::SnakeStepped {
                snake: id,
                outcome,
            });

            if let Some((region, cell)) = eaten {
                out_events.push(Event::FoodConsumed {
                    snake: id,
                    region,
                    cell,
                });
            }

            if !outcome.is_advanced() {
                self.terminal = true;
                info!(snake = id.number(), ?outcome, tick = self.tick_index, "round ended");
                out_events.push(Event::RoundEnded { snake: id, outcome });
                break;
            }
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Configure {
            grid,
            barrier_offset,
        } => {
            world.grid = grid;
            world.barrier_offset = barrier_offset;
            world.restart(out_events);
        }
        Command::ConfigureSpawns { spawns } => {
            world.custom_spawns = Some(spawns);
            world.restart(out_events);
        }
        Command::SetHeading { snake, heading } => {
            world.round.set_heading(snake, heading, out_events);
        }
        Command::Advance { dt } => {
            let World {
                rules,
                grid,
                rng,
                round,
                ..
            } = world;
            round.advance(dt, rules, *grid, rng, out_events);
        }
        Command::RequestRestart => {
            if world.round.terminal {
                world.restart(out_events);
            } else {
                debug!("restart requested while round is active; ignoring");
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use snake_duel_core::{
        CellCoord, FoodRegion, GridDimensions, RoundSnapshot, SnakeId, SnakeSnapshot,
    };

    use super::{Rules, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides the rules the world was created with.
    #[must_use]
    pub fn rules(world: &World) -> &Rules {
        &world.rules
    }

    /// Dimensions of the grid the current round plays on.
    #[must_use]
    pub fn grid(world: &World) -> GridDimensions {
        world.grid
    }

    /// Reports whether the current round has ended.
    #[must_use]
    pub fn is_terminal(world: &World) -> bool {
        world.round.terminal
    }

    /// One-based index of the current round.
    #[must_use]
    pub fn round_index(world: &World) -> u64 {
        world.round_index
    }

    /// Number of movement ticks fired during the current round.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.round.tick_index
    }

    /// Frame time accumulated toward the next movement tick.
    #[must_use]
    pub fn tick_backlog(world: &World) -> Duration {
        world.round.clock.accumulated()
    }

    /// Static barrier cells of the current round.
    #[must_use]
    pub fn barrier_cells(world: &World) -> &[CellCoord] {
        world.round.barrier.cells()
    }

    /// Captures the current state of a single snake.
    #[must_use]
    pub fn snake(world: &World, id: SnakeId) -> SnakeSnapshot {
        world.round.snakes[id.index()].snapshot()
    }

    /// Active food cell of a region, if any.
    #[must_use]
    pub fn food(world: &World, region: FoodRegion) -> Option<CellCoord> {
        world.round.food.active(region)
    }

    /// Remaining respawn delay of a region; zero while disarmed.
    #[must_use]
    pub fn food_cooldown(world: &World, region: FoodRegion) -> Duration {
        world.round.food.cooldown(region)
    }

    /// Captures everything a renderer needs to draw the current frame.
    #[must_use]
    pub fn snapshot(world: &World) -> RoundSnapshot {
        RoundSnapshot {
            grid: world.grid,
            snakes: SnakeId::ALL
                .into_iter()
                .map(|id| snake(world, id))
                .collect(),
            barrier: world.round.barrier.cells().to_vec(),
            food: world.round.food.snapshots(),
            terminal: world.round.terminal,
        }
    }
}

fn is_blocked(barrier: &BarrierLayout, snakes: &[Snake; 2], cell: CellCoord) -> bool {
    barrier.contains(cell) || snakes.iter().any(|snake| snake.occupies(cell))
}

/// Centres snake one in the left region heading up and snake two in the right
/// region heading down, mirrored across the grid.
fn default_spawns(grid: GridDimensions, barrier: &BarrierLayout) -> [SnakeSpawn; 2] {
    let left = barrier.region_columns(FoodRegion::Left);
    let right = barrier.region_columns(FoodRegion::Right);
    let quarter = grid.columns() / 4;

    let left_column = if left.is_empty() {
        quarter
    } else {
        left.start + left.len() as u32 / 2
    };
    let right_column = if right.is_empty() {
        grid.columns() - 1 - quarter
    } else {
        right.end - 1 - right.len() as u32 / 2
    };
    let row = grid.rows() / 2;

    [
        SnakeSpawn::new(
            CellCoord::new(left_column, row),
            Heading::Up,
            DEFAULT_SNAKE_LENGTH,
        ),
        SnakeSpawn::new(
            CellCoord::new(right_column, row),
            Heading::Down,
            DEFAULT_SNAKE_LENGTH,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use snake_duel_core::StepOutcome;

    const TICK: Duration = DEFAULT_TICK_INTERVAL;

    fn quiet_rules() -> Rules {
        Rules {
            food_spawn_attempts: 0,
            ..Rules::default()
        }
    }

    fn grid(columns: u32, rows: u32) -> GridDimensions {
        GridDimensions::new(columns, rows).expect("valid grid")
    }

    fn world_with(
        rules: Rules,
        grid: GridDimensions,
        barrier_offset: u32,
        spawns: [SnakeSpawn; 2],
    ) -> World {
        let mut world = World::new(rules);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::Configure {
                grid,
                barrier_offset,
            },
            &mut events,
        );
        apply(&mut world, Command::ConfigureSpawns { spawns }, &mut events);
        world
    }

    fn spawn(column: u32, row: u32, heading: Heading, length: u32) -> SnakeSpawn {
        SnakeSpawn::new(CellCoord::new(column, row), heading, length)
    }

    #[test]
    fn new_world_uses_default_layout() {
        let world = World::default();
        let snapshot = query::snapshot(&world);

        assert_eq!(snapshot.grid, grid(50, 30));
        assert_eq!(snapshot.barrier.len(), 60);
        assert!(!snapshot.terminal);
        assert_eq!(query::round_index(&world), 1);

        let one = snapshot.snake(SnakeId::One).expect("snake one");
        let two = snapshot.snake(SnakeId::Two).expect("snake two");
        assert_eq!(one.head(), Some(CellCoord::new(5, 15)));
        assert_eq!(one.heading, Heading::Up);
        assert_eq!(one.segments.len(), 5);
        assert_eq!(two.head(), Some(CellCoord::new(44, 15)));
        assert_eq!(two.heading, Heading::Down);
        assert_eq!(two.segments.len(), 5);

        assert_eq!(snapshot.food.len(), 2);
        for food in &snapshot.food {
            assert!(!one.segments.contains(&food.cell));
            assert!(!two.segments.contains(&food.cell));
            assert!(!snapshot.barrier.contains(&food.cell));
        }
    }

    #[test]
    fn start_reports_first_round_events() {
        let mut events = Vec::new();
        let world = World::start(Rules::default(), &mut events);

        assert_eq!(
            events.first(),
            Some(&Event::RoundStarted {
                grid: DEFAULT_GRID,
                barrier_cells: 60
            })
        );
        for region in FoodRegion::ALL {
            let cell = query::food(&world, region).expect("default board has room for food");
            assert!(events.contains(&Event::FoodSpawned { region, cell }));
        }
        assert_eq!(query::round_index(&world), 1);
    }

    #[test]
    fn configure_restarts_round_with_new_grid() {
        let mut world = World::new(quiet_rules());
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::Configure {
                grid: grid(12, 6),
                barrier_offset: 3,
            },
            &mut events,
        );

        assert_eq!(query::grid(&world), grid(12, 6));
        assert_eq!(query::barrier_cells(&world).len(), 12);
        assert_eq!(query::round_index(&world), 2);
        assert_eq!(
            events[0],
            Event::RoundStarted {
                grid: grid(12, 6),
                barrier_cells: 12
            }
        );
        assert_eq!(
            &events[1..],
            &[
                Event::FoodPlacementFailed {
                    region: FoodRegion::Left
                },
                Event::FoodPlacementFailed {
                    region: FoodRegion::Right
                },
            ]
        );
    }

    #[test]
    fn eating_food_grows_and_arms_cooldown() {
        let mut world = world_with(
            quiet_rules(),
            grid(10, 10),
            5,
            [spawn(5, 5, Heading::Right, 2), spawn(1, 1, Heading::Down, 1)],
        );
        world.round.food.place(FoodRegion::Right, CellCoord::new(6, 5));

        let mut events = Vec::new();
        apply(&mut world, Command::Advance { dt: TICK }, &mut events);

        let one = query::snake(&world, SnakeId::One);
        assert_eq!(
            one.segments,
            vec![
                CellCoord::new(6, 5),
                CellCoord::new(5, 5),
                CellCoord::new(4, 5)
            ]
        );
        assert_eq!(query::food(&world, FoodRegion::Right), None);
        assert_eq!(
            query::food_cooldown(&world, FoodRegion::Right),
            DEFAULT_FOOD_RESPAWN_DELAY
        );
        assert!(events.contains(&Event::FoodConsumed {
            snake: SnakeId::One,
            region: FoodRegion::Right,
            cell: CellCoord::new(6, 5),
        }));
        assert!(events.contains(&Event::SnakeStepped {
            snake: SnakeId::One,
            outcome: StepOutcome::Advanced {
                head: CellCoord::new(6, 5),
                grew: true
            },
        }));
    }

    #[test]
    fn snakes_eat_food_from_either_region() {
        let mut world = world_with(
            Rules {
                edge_policy: EdgePolicy::Wrap,
                ..quiet_rules()
            },
            grid(10, 4),
            2,
            [spawn(0, 1, Heading::Left, 1), spawn(5, 1, Heading::Up, 1)],
        );
        world.round.food.place(FoodRegion::Right, CellCoord::new(9, 1));

        let mut events = Vec::new();
        apply(&mut world, Command::Advance { dt: TICK }, &mut events);

        assert_eq!(query::snake(&world, SnakeId::One).segments.len(), 2);
        assert_eq!(query::food(&world, FoodRegion::Right), None);
    }

    #[test]
    fn cooldown_respawns_food_on_frame_time() {
        let mut world = world_with(
            quiet_rules(),
            grid(10, 10),
            5,
            [spawn(5, 5, Heading::Right, 1), spawn(1, 1, Heading::Down, 1)],
        );
        world.round.food.place(FoodRegion::Right, CellCoord::new(6, 5));
        let mut events = Vec::new();
        apply(&mut world, Command::Advance { dt: TICK }, &mut events);

        events.clear();
        apply(
            &mut world,
            Command::Advance {
                dt: Duration::from_millis(2500),
            },
            &mut events,
        );
        assert!(!events.iter().any(|event| matches!(
            event,
            Event::FoodPlacementFailed {
                region: FoodRegion::Right
            }
        )));

        events.clear();
        apply(
            &mut world,
            Command::Advance {
                dt: Duration::from_millis(2500),
            },
            &mut events,
        );
        let attempts: Vec<_> = events
            .iter()
            .filter(|event| {
                matches!(
                    event,
                    Event::FoodPlacementFailed {
                        region: FoodRegion::Right
                    } | Event::FoodSpawned {
                        region: FoodRegion::Right,
                        ..
                    }
                )
            })
            .collect();
        assert_eq!(
            attempts,
            vec![&Event::FoodPlacementFailed {
                region: FoodRegion::Right
            }]
        );
        assert_eq!(
            query::food_cooldown(&world, FoodRegion::Right),
            DEFAULT_FOOD_RESPAWN_DELAY
        );
    }

    #[test]
    fn headings_commit_on_tick() {
        let mut world = world_with(
            quiet_rules(),
            grid(10, 10),
            5,
            [spawn(5, 5, Heading::Right, 3), spawn(1, 1, Heading::Down, 1)],
        );
        let mut events = Vec::new();
        for heading in [Heading::Left, Heading::Up] {
            apply(
                &mut world,
                Command::SetHeading {
                    snake: SnakeId::One,
                    heading,
                },
                &mut events,
            );
        }
        assert_eq!(
            events,
            vec![
                Event::HeadingRejected {
                    snake: SnakeId::One,
                    heading: Heading::Left
                },
                Event::HeadingQueued {
                    snake: SnakeId::One,
                    heading: Heading::Up
                },
            ]
        );

        apply(&mut world, Command::Advance { dt: TICK }, &mut events);
        let one = query::snake(&world, SnakeId::One);
        assert_eq!(one.head(), Some(CellCoord::new(5, 4)));
        assert_eq!(one.heading, Heading::Up);
    }

    #[test]
    fn barrier_ends_round_under_bounded_policy() {
        let mut world = world_with(
            quiet_rules(),
            grid(10, 6),
            2,
            [spawn(4, 2, Heading::Up, 1), spawn(3, 3, Heading::Left, 2)],
        );
        let mut events = Vec::new();
        apply(&mut world, Command::Advance { dt: TICK }, &mut events);

        assert!(query::is_terminal(&world));
        assert_eq!(
            events.last(),
            Some(&Event::RoundEnded {
                snake: SnakeId::Two,
                outcome: StepOutcome::HitBarrier
            })
        );
        let two = query::snake(&world, SnakeId::Two);
        assert!(!two.alive);
        assert_eq!(two.segments, vec![CellCoord::new(3, 3), CellCoord::new(4, 3)]);
    }

    #[test]
    fn snakes_pass_through_each_other() {
        let mut world = world_with(
            quiet_rules(),
            grid(10, 10),
            5,
            [spawn(4, 5, Heading::Right, 3), spawn(5, 5, Heading::Left, 3)],
        );
        let mut events = Vec::new();
        for _ in 0..3 {
            apply(&mut world, Command::Advance { dt: TICK }, &mut events);
        }
        assert!(!query::is_terminal(&world));
        assert_eq!(
            query::snake(&world, SnakeId::One).head(),
            Some(CellCoord::new(7, 5))
        );
        assert_eq!(
            query::snake(&world, SnakeId::Two).head(),
            Some(CellCoord::new(2, 5))
        );
    }

    #[test]
    fn terminal_round_ignores_everything_but_restart() {
        let mut world = world_with(
            quiet_rules(),
            grid(10, 10),
            5,
            [spawn(9, 5, Heading::Right, 2), spawn(1, 1, Heading::Down, 1)],
        );
        let mut events = Vec::new();
        apply(&mut world, Command::Advance { dt: TICK }, &mut events);
        assert!(query::is_terminal(&world));
        let frozen = query::snapshot(&world);

        events.clear();
        apply(&mut world, Command::Advance { dt: TICK }, &mut events);
        apply(
            &mut world,
            Command::SetHeading {
                snake: SnakeId::One,
                heading: Heading::Up,
            },
            &mut events,
        );
        assert!(events.is_empty());
        assert_eq!(query::snapshot(&world), frozen);

        apply(&mut world, Command::RequestRestart, &mut events);
        assert!(!query::is_terminal(&world));
        assert_eq!(query::tick_index(&world), 0);
        assert_eq!(query::tick_backlog(&world), Duration::ZERO);
        let one = query::snake(&world, SnakeId::One);
        assert!(one.alive);
        assert_eq!(one.segments, vec![CellCoord::new(9, 5), CellCoord::new(8, 5)]);
        assert_eq!(one.heading, Heading::Right);
        assert!(matches!(events.first(), Some(Event::RoundStarted { .. })));
    }

    #[test]
    fn restart_is_ignored_while_round_is_active() {
        let mut world = World::new(quiet_rules());
        let mut events = Vec::new();
        apply(&mut world, Command::RequestRestart, &mut events);
        assert!(events.is_empty());
        assert_eq!(query::round_index(&world), 1);
    }

    #[test]
    fn restart_reseeds_food_and_clears_cooldowns() {
        let mut world = world_with(
            Rules::default(),
            grid(10, 10),
            5,
            [spawn(9, 5, Heading::Right, 1), spawn(1, 1, Heading::Down, 1)],
        );
        if let Some(cell) = query::food(&world, FoodRegion::Right) {
            let _ = world.round.food.consume_at(cell);
        }
        let mut events = Vec::new();
        apply(&mut world, Command::Advance { dt: TICK }, &mut events);
        assert!(query::is_terminal(&world));

        events.clear();
        apply(&mut world, Command::RequestRestart, &mut events);
        for region in FoodRegion::ALL {
            assert!(query::food(&world, region).is_some());
            assert_eq!(query::food_cooldown(&world, region), Duration::ZERO);
        }
        let spawned = events
            .iter()
            .filter(|event| matches!(event, Event::FoodSpawned { .. }))
            .count();
        assert_eq!(spawned, 2);
    }
}
