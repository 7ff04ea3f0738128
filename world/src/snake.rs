use std::collections::VecDeque;

use snake_duel_core::{
    CellCoord, EdgePolicy, GridDimensions, Heading, SnakeId, SnakeSnapshot, SnakeSpawn,
    StepOutcome,
};

use crate::barrier::BarrierLayout;

/// A single snake. The head is stored apart from the trailing body so the
/// snake can never become empty.
#[derive(Clone, Debug)]
pub(crate) struct Snake {
    id: SnakeId,
    head: CellCoord,
    body: VecDeque<CellCoord>,
    heading: Heading,
    pending: Heading,
    alive: bool,
}

impl Snake {
    /// Lays the snake out from its spawn, trailing away from the heading.
    ///
    /// Segments that would leave a bounded grid or overlap the snake itself
    /// are dropped, so the snake may start shorter than requested.
    pub(crate) fn spawn(
        id: SnakeId,
        spawn: SnakeSpawn,
        grid: GridDimensions,
        policy: EdgePolicy,
    ) -> Self {
        let head = grid.clamp(spawn.head());
        let trailing = spawn.heading().opposite();
        let cap = grid.cell_count().saturating_sub(1);
        let wanted = u64::from(spawn.length().saturating_sub(1)).min(cap) as usize;

        let mut body = VecDeque::with_capacity(wanted);
        let mut cursor = head;
        while body.len() < wanted {
            let next = match policy {
                EdgePolicy::Wrap => Some(grid.wrapped_neighbor(cursor, trailing)),
                EdgePolicy::Bounded => grid.bounded_neighbor(cursor, trailing),
            };
            let Some(next) = next else {
                break;
            };
            if next == head || body.contains(&next) {
                break;
            }
            body.push_back(next);
            cursor = next;
        }

        Self {
            id,
            head,
            body,
            heading: spawn.heading(),
            pending: spawn.heading(),
            alive: true,
        }
    }

    /// Queues a heading for the next tick unless it reverses the committed one.
    pub(crate) fn set_pending_heading(&mut self, heading: Heading) -> bool {
        if self.heading.is_opposite(heading) {
            return false;
        }
        self.pending = heading;
        true
    }

    /// Commits the pending heading and moves the snake one cell.
    ///
    /// `consume` is offered the new head once the move is known to succeed and
    /// reports whether food was eaten there, in which case the tail is kept.
    /// Failed steps leave the body untouched.
    pub(crate) fn step<F>(
        &mut self,
        grid: GridDimensions,
        barrier: &BarrierLayout,
        policy: EdgePolicy,
        consume: F,
    ) -> StepOutcome
    where
        F: FnOnce(CellCoord) -> bool,
    {
        self.heading = self.pending;

        let target = match policy {
            EdgePolicy::Wrap => grid.wrapped_neighbor(self.head, self.heading),
            EdgePolicy::Bounded => {
                let Some(target) = grid.bounded_neighbor(self.head, self.heading) else {
                    self.alive = false;
                    return StepOutcome::OutOfBounds;
                };
                if barrier.contains(target) {
                    self.alive = false;
                    return StepOutcome::HitBarrier;
                }
                target
            }
        };

        let grew = consume(target);
        self.body.push_front(self.head);
        self.head = target;
        if !grew {
            let _ = self.body.pop_back();
        }

        StepOutcome::Advanced { head: target, grew }
    }

    pub(crate) fn occupies(&self, cell: CellCoord) -> bool {
        self.head == cell || self.body.contains(&cell)
    }

    pub(crate) fn snapshot(&self) -> SnakeSnapshot {
        let mut segments = Vec::with_capacity(self.body.len() + 1);
        segments.push(self.head);
        segments.extend(self.body.iter().copied());
        SnakeSnapshot {
            id: self.id,
            segments,
            heading: self.heading,
            alive: self.alive,
        }
    }
}
