//! Variable Neighborhood Search engine.
//!
//! Starting from the incumbent, each iteration perturbs it with the current
//! neighborhood `N_k`, polishes the result with [`LocalSearch`] and keeps it
//! only if it is strictly cheaper. An improvement restarts the escalation at
//! the first neighborhood; otherwise `k` advances and wraps around after the
//! last one. The loop only ends when the [`StopCondition`] fires.

use crate::instance::Instance;
use crate::local_search::LocalSearch;
use crate::neighborhoods::{default_neighborhoods, Neighborhood};
use crate::solution::Solution;
use crate::SearchRng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Candidates must beat the incumbent by more than this to be accepted.
const ACCEPTANCE_EPSILON: f64 = 1e-9;

/// When a search should stop. Checked once at the top of every iteration.
#[derive(Debug, Clone, Default)]
pub struct StopCondition {
    deadline: Option<Instant>,
    max_iterations: Option<u64>,
    cancelled: Arc<AtomicBool>,
}

impl StopCondition {
    /// A condition that only fires when cancelled.
    pub fn new() -> Self {
        StopCondition::default()
    }

    /// Stop at a fixed point in time.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Stop once `limit` has elapsed from now.
    pub fn with_time_limit(self, limit: Duration) -> Self {
        self.with_deadline(Instant::now() + limit)
    }

    /// Stop after a fixed number of iterations.
    pub fn with_max_iterations(mut self, iterations: u64) -> Self {
        self.max_iterations = Some(iterations);
        self
    }

    /// Share an external cancellation flag.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancelled = flag;
        self
    }

    /// Ask every search observing this condition to stop.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Check whether a search that has run `iterations` iterations must stop.
    pub fn should_stop(&self, iterations: u64) -> bool {
        if self.is_cancelled() {
            return true;
        }

        if let Some(max) = self.max_iterations {
            if iterations >= max {
                return true;
            }
        }

        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return true;
            }
        }

        false
    }
}

/// Result of one VNS run.
#[derive(Debug, Clone)]
pub struct VnsOutcome {
    /// Best solution found
    pub best: Solution,
    /// Cost of the best solution
    pub best_cost: f64,
    /// Number of perturb/improve iterations executed
    pub iterations: u64,
    /// Number of accepted improvements
    pub improvements: u64,
    /// Best cost after the initial local search and after every improvement
    pub cost_history: Vec<f64>,
}

/// The VNS engine: an ordered list of neighborhoods and a local search.
pub struct Vns {
    neighborhoods: Vec<Box<dyn Neighborhood>>,
    local_search: LocalSearch,
}

impl Vns {
    /// Create an engine escalating through `neighborhoods` in order.
    pub fn new(neighborhoods: Vec<Box<dyn Neighborhood>>, local_search: LocalSearch) -> Self {
        Vns {
            neighborhoods,
            local_search,
        }
    }

    /// Engine using shift, remove-hub, add-hub and swap-function.
    pub fn with_default_neighborhoods(local_search: LocalSearch) -> Self {
        Vns::new(default_neighborhoods(), local_search)
    }

    pub fn neighborhood_names(&self) -> Vec<&'static str> {
        self.neighborhoods.iter().map(|n| n.name()).collect()
    }

    /// Search from `initial` until `stop` fires.
    pub fn run(
        &self,
        instance: &Instance,
        initial: Solution,
        rng: &mut SearchRng,
        stop: &StopCondition,
    ) -> VnsOutcome {
        let mut best = initial;
        self.local_search.improve(&mut best, instance);
        let mut best_cost = best.cost(instance);

        let mut cost_history = vec![best_cost];
        let mut iterations = 0;
        let mut improvements = 0;

        if self.neighborhoods.is_empty() {
            return VnsOutcome {
                best,
                best_cost,
                iterations,
                improvements,
                cost_history,
            };
        }

        let mut k = 0;
        while !stop.should_stop(iterations) {
            let neighborhood = &self.neighborhoods[k];

            let mut candidate = neighborhood.apply(instance, &best, rng);
            self.local_search.improve(&mut candidate, instance);
            let candidate_cost = candidate.cost(instance);

            if candidate_cost < best_cost - ACCEPTANCE_EPSILON {
                log::debug!(
                    "iteration {}: {} improved {:.4} -> {:.4}",
                    iterations,
                    neighborhood.name(),
                    best_cost,
                    candidate_cost
                );
                best = candidate;
                best_cost = candidate_cost;
                cost_history.push(best_cost);
                improvements += 1;
                k = 0;
            } else {
                k += 1;
                if k == self.neighborhoods.len() {
                    k = 0;
                }
            }

            iterations += 1;
        }

        VnsOutcome {
            best,
            best_cost,
            iterations,
            improvements,
            cost_history,
        }
    }
}
