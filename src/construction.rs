//! Greedy randomized (GRASP) construction of an initial solution.

use crate::error::{HubError, Result};
use crate::instance::Instance;
use crate::solution::Solution;
use crate::SearchRng;
use itertools::Itertools;
use rand::seq::SliceRandom;

/// Improvements smaller than this are treated as ties.
const EPSILON: f64 = 1e-9;

/// Builds a feasible starting solution by opening hubs one at a time.
///
/// Candidates are ranked by installation cost plus the cost of hauling every
/// node's traffic to them. Each step draws uniformly from the restricted
/// candidate list (scores within `alpha` of the best) and keeps the new hub
/// only while the total cost keeps dropping.
#[derive(Debug, Clone, Copy)]
pub struct GraspConstructor {
    pub alpha: f64,
}

impl GraspConstructor {
    pub fn new(alpha: f64) -> Self {
        GraspConstructor {
            alpha: alpha.clamp(0.0, 1.0),
        }
    }

    /// Static desirability of opening each node as a hub (lower is better).
    pub fn hub_scores(instance: &Instance) -> Vec<f64> {
        let n = instance.size();
        let traffic: Vec<f64> = (0..n)
            .map(|j| instance.outgoing_flow(j) + instance.incoming_flow(j))
            .collect();

        (0..n)
            .map(|i| {
                let haul: f64 = (0..n).map(|j| traffic[j] * instance.distance(j, i)).sum();
                instance.installation_cost(i) + haul
            })
            .collect()
    }

    /// Run the construction.
    pub fn construct(&self, instance: &Instance, rng: &mut SearchRng) -> Result<Solution> {
        if instance.size() == 0 {
            return Err(HubError::InvalidInstance(
                "cannot construct a solution for an empty instance".to_string(),
            ));
        }

        let scores = Self::hub_scores(instance);
        let mut closed: Vec<usize> = (0..instance.size()).collect();
        let mut current: Option<Solution> = None;

        while !closed.is_empty() {
            let pick = match self.pick_candidate(&closed, &scores, rng) {
                Some(pick) => pick,
                None => break,
            };

            let next = match current.as_mut() {
                None => Solution::from_hubs(instance, [pick])?,
                Some(solution) => {
                    let mut trial = solution.clone();
                    trial.open_hub(pick);
                    trial.reassign_to_nearest(instance);

                    if trial.cost(instance) < solution.cost(instance) - EPSILON {
                        trial
                    } else {
                        break;
                    }
                }
            };

            log::trace!("construction opened hub {}", pick);
            closed.retain(|&node| node != pick);
            current = Some(next);
        }

        let mut solution = match current {
            Some(solution) => solution,
            None => Solution::from_hubs(instance, [0])?,
        };

        log::debug!(
            "construction finished with {} hubs, cost {:.4}",
            solution.hub_count(),
            solution.cost(instance)
        );

        Ok(solution)
    }

    /// Draw a node from the restricted candidate list.
    fn pick_candidate(
        &self,
        closed: &[usize],
        scores: &[f64],
        rng: &mut SearchRng,
    ) -> Option<usize> {
        let (min, max) = closed
            .iter()
            .map(|&node| scores[node])
            .minmax()
            .into_option()?;

        let threshold = min + self.alpha * (max - min) + EPSILON;
        let rcl: Vec<usize> = closed
            .iter()
            .copied()
            .filter(|&node| scores[node] <= threshold)
            .collect();

        rcl.choose(rng).copied()
    }
}
