//! # Hub VNS
//!
//! A GRASP + Variable Neighborhood Search heuristic for the uncapacitated
//! single-allocation hub location problem.
//!
//! Given candidate nodes with installation costs, pairwise distances and
//! pairwise flows, the solver opens a subset of nodes as hubs and routes all
//! flow through them (hub-to-hub legs discounted by a scale factor) so that
//! installation plus routing cost is as small as possible.
//!
//! Each worker builds a starting solution with a greedy randomized
//! construction and improves it with VNS over four structural moves (shift,
//! remove hub, add hub, swap function). Workers run in parallel on a shared,
//! read-only [`Instance`] and the cheapest result wins.

pub mod config;
pub mod construction;
pub mod error;
pub mod instance;
pub mod local_search;
pub mod neighborhoods;
pub mod report;
pub mod solution;
pub mod vns;

use crate::config::Config;
use crate::construction::GraspConstructor;
use crate::error::{HubError, Result};
use crate::instance::Instance;
use crate::local_search::LocalSearch;
use crate::solution::Solution;
use crate::vns::{StopCondition, Vns, VnsOutcome};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;
use std::cmp::Ordering;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Random stream owned by one search worker.
pub type SearchRng = ChaCha8Rng;

/// Final result of a solver run.
#[derive(Debug, Clone, Serialize)]
pub struct SolveResult {
    /// Open hubs of the best solution, ascending
    pub hubs: Vec<usize>,
    /// Hub serving each node
    pub assignment: Vec<usize>,
    /// Total cost of the best solution
    pub cost: f64,
    /// Wall-clock time of the whole run
    pub elapsed: Duration,
    /// VNS iterations summed over all workers
    pub iterations: u64,
    /// Index of the worker that found the best solution
    pub best_worker: usize,
    /// Best cost reached by each worker
    pub worker_costs: Vec<f64>,
    /// Relative gap to the target cost in percent, if a target was given
    pub gap: Option<f64>,
    /// The best solution itself
    pub solution: Solution,
}

/// Percentage by which `cost` exceeds `target`.
pub fn gap_percent(cost: f64, target: f64) -> f64 {
    (cost - target) / target * 100.0
}

/// What one worker hands back to the orchestrator.
struct WorkerReport {
    worker: usize,
    outcome: VnsOutcome,
    finished_at: Instant,
}

/// Orchestrates independent parallel searches over a shared instance.
pub struct Solver {
    pub instance: Arc<Instance>,
    pub config: Config,
    stop_signal: Option<Arc<AtomicBool>>,
}

impl Solver {
    /// Create a solver for the given instance and configuration.
    pub fn new(instance: Arc<Instance>, config: Config) -> Self {
        Solver {
            instance,
            config,
            stop_signal: None,
        }
    }

    /// Let an external flag cancel the run. Setting it to `true` stops every
    /// worker at the start of its next iteration.
    pub fn with_stop_signal(mut self, flag: Arc<AtomicBool>) -> Self {
        self.stop_signal = Some(flag);
        self
    }

    /// Run every worker to completion and return the best solution.
    pub fn solve(&self) -> Result<SolveResult> {
        self.config.validate(self.stop_signal.is_some())?;

        let initial = match &self.config.initial_solution {
            Some(solution) => Some(Solution::from_parts(
                &self.instance,
                solution.hubs().iter().copied(),
                solution.assignment().to_vec(),
            )?),
            None => None,
        };

        let start_time = Instant::now();
        let stop = self.stop_condition(start_time);

        log::info!(
            "solving {} ({} nodes) with {} worker(s)",
            self.instance.name(),
            self.instance.size(),
            self.config.workers
        );

        let reports = (0..self.config.workers)
            .into_par_iter()
            .map(|worker| self.run_worker(worker, initial.as_ref(), &stop))
            .collect::<Result<Vec<WorkerReport>>>()?;

        let elapsed = start_time.elapsed();
        let iterations: u64 = reports.iter().map(|r| r.outcome.iterations).sum();
        let worker_costs: Vec<f64> = reports.iter().map(|r| r.outcome.best_cost).collect();

        let best = reports
            .into_iter()
            .min_by(|a, b| {
                a.outcome
                    .best_cost
                    .partial_cmp(&b.outcome.best_cost)
                    .unwrap_or(Ordering::Equal)
                    .then(a.finished_at.cmp(&b.finished_at))
                    .then(a.worker.cmp(&b.worker))
            })
            .ok_or_else(|| HubError::InvalidConfig("no worker produced a solution".to_string()))?;

        let cost = best.outcome.best_cost;
        let gap = self.config.target_cost.map(|target| gap_percent(cost, target));

        log::info!(
            "best cost {:.4} from worker {} after {} iterations in {:.3}s",
            cost,
            best.worker,
            iterations,
            elapsed.as_secs_f64()
        );

        let solution = best.outcome.best;
        Ok(SolveResult {
            hubs: solution.hubs().iter().copied().collect(),
            assignment: solution.assignment().to_vec(),
            cost,
            elapsed,
            iterations,
            best_worker: best.worker,
            worker_costs,
            gap,
            solution,
        })
    }

    /// The stop condition shared by all workers of one run.
    fn stop_condition(&self, start_time: Instant) -> StopCondition {
        let mut stop = StopCondition::new();

        if let Some(flag) = &self.stop_signal {
            stop = stop.with_cancel_flag(Arc::clone(flag));
        }
        if let Some(limit) = self.config.time_limit {
            stop = stop.with_deadline(start_time + limit);
        }
        if let Some(iterations) = self.config.max_iterations {
            stop = stop.with_max_iterations(iterations);
        }

        stop
    }

    /// Construction plus VNS for a single worker.
    fn run_worker(
        &self,
        worker: usize,
        initial: Option<&Solution>,
        stop: &StopCondition,
    ) -> Result<WorkerReport> {
        let mut rng = match self.config.seed {
            Some(seed) => SearchRng::seed_from_u64(seed.wrapping_add(worker as u64)),
            None => SearchRng::from_entropy(),
        };

        let start = match initial {
            Some(solution) => solution.clone(),
            None => {
                GraspConstructor::new(self.config.grasp_alpha).construct(&self.instance, &mut rng)?
            }
        };

        let vns = Vns::with_default_neighborhoods(LocalSearch::new(
            self.config.max_local_search_iterations,
        ));
        let outcome = vns.run(&self.instance, start, &mut rng, stop);

        log::info!(
            "worker {} finished: cost {:.4}, {} hubs, {} iterations, {} improvements",
            worker,
            outcome.best_cost,
            outcome.best.hub_count(),
            outcome.iterations,
            outcome.improvements
        );

        Ok(WorkerReport {
            worker,
            outcome,
            finished_at: Instant::now(),
        })
    }
}

/// Solve `instance` with `config`.
pub fn solve(instance: Arc<Instance>, config: &Config) -> Result<SolveResult> {
    Solver::new(instance, config.clone()).solve()
}
