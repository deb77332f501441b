//! Search control: the cooperative time governor.

use std::time::{Duration, Instant};

use crate::time::{TimeBudget, Timer};

/// Decides when a search must stop.
///
/// Polled by the searcher before every move it expands ([`check`](Self::check),
/// hard limit) and by the iterative-deepening driver between depths
/// ([`should_stop_iterating`](Self::should_stop_iterating), soft limit). Without a
/// timer the governor never expires.
pub struct TimeGovernor<'a> {
    timer: Option<&'a dyn Timer>,
    budget: Option<TimeBudget>,
    started: Instant,
    expired: bool,
}

impl<'a> TimeGovernor<'a> {
    /// A governor with no time limit (fixed-depth searches).
    pub fn unlimited() -> Self {
        TimeGovernor {
            timer: None,
            budget: None,
            started: Instant::now(),
            expired: false,
        }
    }

    /// Govern by `timer`, using the timer's own budget for this move.
    pub fn new(timer: &'a dyn Timer) -> TimeGovernor<'a> {
        Self::with_budget(timer, timer.budget())
    }

    /// Govern by `timer` with an explicit budget.
    pub fn with_budget(timer: &'a dyn Timer, budget: TimeBudget) -> TimeGovernor<'a> {
        TimeGovernor {
            timer: Some(timer),
            budget: Some(budget),
            started: Instant::now(),
            expired: false,
        }
    }

    /// `true` once the hard limit has passed.
    ///
    /// Expiry latches: after the first `true` the clock is not read again.
    pub fn check(&mut self) -> bool {
        if self.expired {
            return true;
        }
        if let Some(budget) = self.budget
            && self.elapsed() >= budget.hard
        {
            self.expired = true;
        }
        self.expired
    }

    /// `true` if there is no time left to start another iteration.
    pub fn should_stop_iterating(&self) -> bool {
        if self.expired {
            return true;
        }
        self.budget.is_some_and(|budget| self.elapsed() >= budget.soft)
    }

    /// `true` if [`check`](Self::check) has fired.
    pub fn is_expired(&self) -> bool {
        self.expired
    }

    /// Time spent on the current move.
    pub fn elapsed(&self) -> Duration {
        match self.timer {
            Some(timer) => timer.elapsed(),
            None => self.started.elapsed(),
        }
    }

    pub fn budget(&self) -> Option<TimeBudget> {
        self.budget
    }
}

impl std::fmt::Debug for TimeGovernor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimeGovernor")
            .field("budget", &self.budget)
            .field("elapsed", &self.elapsed())
            .field("expired", &self.expired)
            .finish()
    }
}
