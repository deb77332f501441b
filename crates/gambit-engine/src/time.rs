//! Time management: clocks and per-move budgets.

use std::time::{Duration, Instant};

/// Moves assumed to remain in the game when the clock does not say.
pub const DEFAULT_MOVES_TO_GO: u32 = 30;

/// Safety margin subtracted from the remaining time.
pub const DEFAULT_OVERHEAD: Duration = Duration::from_millis(10);

/// The clock the search is played against.
///
/// `elapsed` runs from the start of the current move; `remaining` is what is
/// left on the mover's game clock.
pub trait Timer {
    fn elapsed(&self) -> Duration;

    fn remaining(&self) -> Duration;

    fn increment(&self) -> Duration {
        Duration::ZERO
    }

    fn moves_to_go(&self) -> Option<u32> {
        None
    }

    /// Soft and hard limits for the current move.
    fn budget(&self) -> TimeBudget {
        TimeBudget::compute(
            self.remaining(),
            self.increment(),
            self.moves_to_go(),
            DEFAULT_OVERHEAD,
        )
    }
}

/// Soft and hard time limits for one move.
///
/// Past `soft` no new iteration is started; past `hard` the running
/// iteration is abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeBudget {
    pub soft: Duration,
    pub hard: Duration,
}

impl TimeBudget {
    /// Both limits set to `limit`.
    pub const fn fixed(limit: Duration) -> TimeBudget {
        TimeBudget {
            soft: limit,
            hard: limit,
        }
    }

    /// Compute limits from the game clock.
    ///
    /// | Parameter           | No increment | With increment       |
    /// |---------------------|--------------|----------------------|
    /// | Soft limit          | `base`       | `base + inc * 0.75`  |
    /// | Hard cap (% usable) | 12%          | 25%                  |
    /// | Hard/soft ratio cap | 2.5x         | 3.0x                 |
    ///
    /// `base` is the usable time divided by `moves_to_go`
    /// ([`DEFAULT_MOVES_TO_GO`] when unknown).
    pub fn compute(
        remaining: Duration,
        increment: Duration,
        moves_to_go: Option<u32>,
        overhead: Duration,
    ) -> TimeBudget {
        let remaining_ms = remaining.as_millis() as f64;
        if remaining_ms < 10.0 {
            return TimeBudget::fixed(Duration::from_millis(1));
        }

        let usable = (remaining_ms - overhead.as_millis() as f64).max(1.0);
        let inc_ms = increment.as_millis() as f64;
        let has_increment = inc_ms > 0.0;

        let mtg = moves_to_go.unwrap_or(DEFAULT_MOVES_TO_GO).max(1) as f64;
        let base = usable / mtg;
        let soft = if has_increment { base + inc_ms * 0.75 } else { base };

        let hard_cap_pct = if has_increment { 0.25 } else { 0.12 };
        let hard_ratio_cap = if has_increment { 3.0 } else { 2.5 };
        let hard = (usable * hard_cap_pct).min(soft * hard_ratio_cap);

        let soft = soft.min(usable).max(1.0);
        let hard = hard.min(usable).max(soft);

        TimeBudget {
            soft: Duration::from_millis(soft as u64),
            hard: Duration::from_millis(hard as u64),
        }
    }
}

/// Wall clock for a game played on `wtime`/`btime`.
#[derive(Debug, Clone)]
pub struct GameClock {
    started: Instant,
    remaining: Duration,
    increment: Duration,
    moves_to_go: Option<u32>,
    overhead: Duration,
}

impl GameClock {
    /// Start the clock now with `remaining` on it.
    pub fn start(remaining: Duration, increment: Duration, moves_to_go: Option<u32>) -> GameClock {
        GameClock {
            started: Instant::now(),
            remaining,
            increment,
            moves_to_go,
            overhead: DEFAULT_OVERHEAD,
        }
    }

    /// Replace the safety margin.
    pub fn with_overhead(mut self, overhead: Duration) -> GameClock {
        self.overhead = overhead;
        self
    }
}

impl Timer for GameClock {
    fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    fn remaining(&self) -> Duration {
        self.remaining.saturating_sub(self.elapsed())
    }

    fn increment(&self) -> Duration {
        self.increment
    }

    fn moves_to_go(&self) -> Option<u32> {
        self.moves_to_go
    }

    fn budget(&self) -> TimeBudget {
        TimeBudget::compute(self.remaining, self.increment, self.moves_to_go, self.overhead)
    }
}

/// A fixed amount of time for this move (`go movetime`).
#[derive(Debug, Clone)]
pub struct FixedTimer {
    started: Instant,
    limit: Duration,
}

impl FixedTimer {
    pub fn start(limit: Duration) -> FixedTimer {
        FixedTimer {
            started: Instant::now(),
            limit,
        }
    }
}

impl Timer for FixedTimer {
    fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    fn remaining(&self) -> Duration {
        self.limit.saturating_sub(self.elapsed())
    }

    fn budget(&self) -> TimeBudget {
        TimeBudget::fixed(self.limit)
    }
}
