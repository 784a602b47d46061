//! Configuration parameters for the hub location search.

use crate::error::{HubError, Result};
use crate::solution::Solution;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration settings for a search run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Number of independent workers searching in parallel
    pub workers: usize,
    /// Wall-clock budget shared by all workers
    pub time_limit: Option<Duration>,
    /// Number of VNS iterations per worker, independent of wall-clock time
    pub max_iterations: Option<u64>,
    /// Maximum number of improving moves applied by one local search pass
    pub max_local_search_iterations: usize,
    /// Greediness of the construction: 0 picks only the best candidate,
    /// 1 picks uniformly among all candidates
    pub grasp_alpha: f64,
    /// Base seed; worker `w` uses `seed + w`
    pub seed: Option<u64>,
    /// Known reference cost used for gap reporting
    pub target_cost: Option<f64>,
    /// Starting solution that replaces the construction phase
    pub initial_solution: Option<Solution>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            workers: 1,
            time_limit: Some(Duration::from_secs(10)),
            max_iterations: None,
            max_local_search_iterations: 1000,
            grasp_alpha: 0.3,
            seed: None,
            target_cost: None,
            initial_solution: None,
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Config::default()
    }

    /// Set the number of parallel workers.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Set the time limit.
    pub fn with_time_limit(mut self, duration: Duration) -> Self {
        self.time_limit = Some(duration);
        self
    }

    /// Remove the time limit, leaving the iteration budget or a stop signal
    /// to end the run.
    pub fn without_time_limit(mut self) -> Self {
        self.time_limit = None;
        self
    }

    /// Set the number of VNS iterations per worker.
    pub fn with_max_iterations(mut self, iterations: u64) -> Self {
        self.max_iterations = Some(iterations);
        self
    }

    /// Set the bound on improving moves per local search pass.
    pub fn with_max_local_search_iterations(mut self, iterations: usize) -> Self {
        self.max_local_search_iterations = iterations;
        self
    }

    /// Set the GRASP greediness parameter.
    pub fn with_grasp_alpha(mut self, alpha: f64) -> Self {
        self.grasp_alpha = alpha;
        self
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the target cost for gap reporting. Non-positive values are ignored.
    pub fn with_target_cost(mut self, target: f64) -> Self {
        if target > 0.0 {
            self.target_cost = Some(target);
        }
        self
    }

    /// Start every worker from `solution` instead of running the construction.
    pub fn with_initial_solution(mut self, solution: Solution) -> Self {
        self.initial_solution = Some(solution);
        self
    }

    /// Reject settings the solver cannot run with.
    ///
    /// `has_stop_signal` tells whether an external cancellation flag will end
    /// the run, which makes an unbounded configuration acceptable.
    pub fn validate(&self, has_stop_signal: bool) -> Result<()> {
        if self.workers == 0 {
            return Err(HubError::InvalidConfig(
                "at least one worker is required".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.grasp_alpha) {
            return Err(HubError::InvalidConfig(format!(
                "grasp_alpha must lie in [0, 1], got {}",
                self.grasp_alpha
            )));
        }
        if let Some(target) = self.target_cost {
            if target <= 0.0 {
                return Err(HubError::InvalidConfig(format!(
                    "target cost must be positive, got {}",
                    target
                )));
            }
        }
        if self.time_limit.is_none() && self.max_iterations.is_none() && !has_stop_signal {
            return Err(HubError::InvalidConfig(
                "no stopping condition: set a time limit, an iteration budget or a stop signal"
                    .to_string(),
            ));
        }
        Ok(())
    }
}
