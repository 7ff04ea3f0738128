use std::{ops::Range, time::Duration};

use rand::Rng;
use snake_duel_core::{CellCoord, Event, FoodRegion, FoodSnapshot};
use tracing::debug;

use crate::barrier::BarrierLayout;

#[derive(Clone, Debug)]
struct RegionState {
    columns: Range<u32>,
    active: Option<CellCoord>,
    /// Remaining respawn delay; `None` while disarmed.
    cooldown: Option<Duration>,
}

/// Food lifecycle for the two side regions.
///
/// A region holds at most one food item. Eating it disarms the region for
/// `respawn_delay`; the countdown runs on frame time rather than movement
/// ticks, and reaching zero triggers a single placement attempt. A failed
/// attempt re-arms the countdown so the region retries on the next cycle,
/// unless the region has no columns at all.
#[derive(Clone, Debug)]
pub(crate) struct FoodSpawner {
    regions: [RegionState; 2],
    rows: u32,
    respawn_delay: Duration,
    max_attempts: u32,
}

impl FoodSpawner {
    pub(crate) fn new(
        barrier: &BarrierLayout,
        rows: u32,
        respawn_delay: Duration,
        max_attempts: u32,
    ) -> Self {
        let region = |region| RegionState {
            columns: barrier.region_columns(region),
            active: None,
            cooldown: None,
        };
        Self {
            regions: [region(FoodRegion::Left), region(FoodRegion::Right)],
            rows,
            respawn_delay,
            max_attempts,
        }
    }

    /// Makes the immediate placement attempt every round starts with.
    pub(crate) fn seed<R, F>(&mut self, rng: &mut R, is_blocked: F, out: &mut Vec<Event>)
    where
        R: Rng,
        F: Fn(CellCoord) -> bool,
    {
        for region in FoodRegion::ALL {
            self.attempt(region, rng, &is_blocked, out);
        }
    }

    /// Runs the respawn countdown of every empty, armed region.
    pub(crate) fn update<R, F>(
        &mut self,
        dt: Duration,
        rng: &mut R,
        is_blocked: F,
        out: &mut Vec<Event>,
    ) where
        R: Rng,
        F: Fn(CellCoord) -> bool,
    {
        for region in FoodRegion::ALL {
            let state = &mut self.regions[region.index()];
            if state.active.is_some() {
                continue;
            }
            let Some(remaining) = state.cooldown else {
                continue;
            };

            let remaining = remaining.saturating_sub(dt);
            if remaining.is_zero() {
                state.cooldown = None;
                self.attempt(region, rng, &is_blocked, out);
            } else {
                state.cooldown = Some(remaining);
            }
        }
    }

    /// Eats the food at `cell`, if any, and arms that region's countdown.
    pub(crate) fn consume_at(&mut self, cell: CellCoord) -> Option<FoodRegion> {
        let respawn_delay = self.respawn_delay;
        for region in FoodRegion::ALL {
            let state = &mut self.regions[region.index()];
            if state.active == Some(cell) {
                state.active = None;
                state.cooldown = Some(respawn_delay);
                debug!(?region, column = cell.column(), row = cell.row(), "food consumed");
                return Some(region);
            }
        }
        None
    }

    pub(crate) fn active(&self, region: FoodRegion) -> Option<CellCoord> {
        self.regions[region.index()].active
    }

    pub(crate) fn cooldown(&self, region: FoodRegion) -> Duration {
        self.regions[region.index()]
            .cooldown
            .unwrap_or(Duration::ZERO)
    }

    pub(crate) fn snapshots(&self) -> Vec<FoodSnapshot> {
        FoodRegion::ALL
            .into_iter()
            .filter_map(|region| {
                self.active(region)
                    .map(|cell| FoodSnapshot { region, cell })
            })
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn place(&mut self, region: FoodRegion, cell: CellCoord) {
        let state = &mut self.regions[region.index()];
        state.active = Some(cell);
        state.cooldown = None;
    }

    fn attempt<R, F>(
        &mut self,
        region: FoodRegion,
        rng: &mut R,
        is_blocked: &F,
        out: &mut Vec<Event>,
    ) where
        R: Rng,
        F: Fn(CellCoord) -> bool,
    {
        let other = self.active(region.other());
        let rows = self.rows;
        let max_attempts = self.max_attempts;
        let respawn_delay = self.respawn_delay;
        let state = &mut self.regions[region.index()];

        match try_spawn(rng, state.columns.clone(), rows, other, max_attempts, is_blocked) {
            Some(cell) => {
                state.active = Some(cell);
                debug!(?region, column = cell.column(), row = cell.row(), "food spawned");
                out.push(Event::FoodSpawned { region, cell });
            }
            None => {
                // A region without columns can never hold food.
                if !state.columns.is_empty() {
                    state.cooldown = Some(respawn_delay);
                }
                debug!(?region, max_attempts, "food placement exhausted");
                out.push(Event::FoodPlacementFailed { region });
            }
        }
    }
}

/// Draws random cells from the region until one is free.
///
/// A cell is rejected when `is_blocked` reports it (barriers and snake
/// segments) or when it holds the other region's food. Gives up after
/// `max_attempts` draws so crowded boards cannot stall a frame.
pub(crate) fn try_spawn<R, F>(
    rng: &mut R,
    columns: Range<u32>,
    rows: u32,
    other_food: Option<CellCoord>,
    max_attempts: u32,
    is_blocked: F,
) -> Option<CellCoord>
where
    R: Rng,
    F: Fn(CellCoord) -> bool,
{
    if columns.is_empty() || rows == 0 {
        return None;
    }

    for _ in 0..max_attempts {
        let cell = CellCoord::new(rng.gen_range(columns.clone()), rng.gen_range(0..rows));
        if other_food == Some(cell) || is_blocked(cell) {
            continue;
        }
        return Some(cell);
    }
    None
}
