//! # Attempt Budgets
//!
//! Every placement routine in the generator tries a bounded number of times
//! and then settles for what it managed. [`place_with_budget`] runs that loop
//! and reports how far it got, so callers can tell a degraded result from a
//! complete one.

use serde::{Deserialize, Serialize};

/// How a budgeted placement loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlacementOutcome {
    /// Items the stage wanted to place
    pub requested: u32,
    /// Items actually placed
    pub achieved: u32,
    /// Attempts spent
    pub attempts: u32,
}

impl PlacementOutcome {
    /// Creates an outcome with nothing achieved yet.
    pub fn new(requested: u32) -> Self {
        Self {
            requested,
            achieved: 0,
            attempts: 0,
        }
    }

    /// Whether every requested item was placed.
    pub fn is_complete(&self) -> bool {
        self.achieved >= self.requested
    }

    /// Number of requested items that were not placed.
    pub fn shortfall(&self) -> u32 {
        self.requested.saturating_sub(self.achieved)
    }

    /// Folds another outcome into this one.
    pub fn absorb(&mut self, other: PlacementOutcome) {
        self.requested += other.requested;
        self.achieved += other.achieved;
        self.attempts += other.attempts;
    }
}

/// Calls `attempt` until it has succeeded `requested` times or `budget`
/// attempts are spent.
///
/// The closure receives the number of successes so far and returns whether
/// this attempt placed something.
///
/// # Examples
///
/// ```
/// use deluge::place_with_budget;
///
/// let mut tries = 0;
/// let outcome = place_with_budget(3, 10, |_| {
///     tries += 1;
///     tries % 2 == 0
/// });
/// assert!(outcome.is_complete());
/// assert_eq!(outcome.attempts, 6);
/// ```
pub fn place_with_budget<F>(requested: u32, budget: u32, mut attempt: F) -> PlacementOutcome
where
    F: FnMut(u32) -> bool,
{
    let mut outcome = PlacementOutcome::new(requested);

    while outcome.achieved < requested && outcome.attempts < budget {
        outcome.attempts += 1;
        if attempt(outcome.achieved) {
            outcome.achieved += 1;
        }
    }

    outcome
}
