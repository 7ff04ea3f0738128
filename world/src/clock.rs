use std::time::Duration;

/// Fixed-interval movement scheduler.
///
/// Frame time accumulates until one interval is available, at which point a
/// single tick fires and one interval is removed. Only one interval is removed
/// per advance even if several are owed; the backlog carries over instead of
/// being drained in a burst.
#[derive(Clone, Copy, Debug)]
pub(crate) struct TickClock {
    interval: Duration,
    accumulated: Duration,
}

impl TickClock {
    pub(crate) const fn new(interval: Duration) -> Self {
        Self {
            interval,
            accumulated: Duration::ZERO,
        }
    }

    /// Adds frame time and reports whether a tick fires.
    pub(crate) fn advance(&mut self, dt: Duration) -> bool {
        self.accumulated = self.accumulated.saturating_add(dt);
        if self.accumulated < self.interval {
            return false;
        }
        self.accumulated -= self.interval;
        true
    }

    pub(crate) const fn accumulated(&self) -> Duration {
        self.accumulated
    }
}
