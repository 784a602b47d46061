//! Solution representation and cost model for the hub location problem.

use crate::error::{HubError, Result};
use crate::instance::Instance;
use itertools::{iproduct, Itertools};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A candidate solution: a set of open hubs and the hub serving every node.
///
/// Every structural mutation clears the cached cost, so `cost` always agrees
/// with `compute_cost`.
#[derive(Clone, Serialize, Deserialize)]
pub struct Solution {
    /// Open hubs, ordered so iteration is reproducible under a fixed seed
    hubs: BTreeSet<usize>,
    /// `assignment[n]` is the hub serving node `n`; hubs serve themselves
    assignment: Vec<usize>,
    /// Lazily computed total cost
    #[serde(skip_deserializing)]
    cost: Option<f64>,
}

impl Solution {
    /// Open the given hubs and serve every other node from its nearest hub.
    pub fn from_hubs<I>(instance: &Instance, hubs: I) -> Result<Self>
    where
        I: IntoIterator<Item = usize>,
    {
        let hubs: BTreeSet<usize> = hubs.into_iter().collect();
        if hubs.is_empty() {
            return Err(HubError::InvalidSolution(
                "at least one hub must be open".to_string(),
            ));
        }
        if let Some(&bad) = hubs.iter().find(|&&h| h >= instance.size()) {
            return Err(HubError::InvalidSolution(format!(
                "hub {} is outside 0..{}",
                bad,
                instance.size()
            )));
        }

        let mut solution = Solution {
            hubs,
            assignment: vec![0; instance.size()],
            cost: None,
        };
        solution.reassign_to_nearest(instance);
        Ok(solution)
    }

    /// Build a solution from an explicit hub set and assignment.
    pub fn from_parts<I>(instance: &Instance, hubs: I, assignment: Vec<usize>) -> Result<Self>
    where
        I: IntoIterator<Item = usize>,
    {
        let solution = Solution {
            hubs: hubs.into_iter().collect(),
            assignment,
            cost: None,
        };
        solution.validate(instance)?;
        Ok(solution)
    }

    /// Check the hub/assignment invariants against an instance.
    pub fn validate(&self, instance: &Instance) -> Result<()> {
        if self.hubs.is_empty() {
            return Err(HubError::InvalidSolution(
                "at least one hub must be open".to_string(),
            ));
        }
        if self.assignment.len() != instance.size() {
            return Err(HubError::DimensionMismatch {
                what: "assignment",
                expected: instance.size(),
                found: self.assignment.len(),
            });
        }
        if let Some(&bad) = self.hubs.iter().find(|&&h| h >= instance.size()) {
            return Err(HubError::InvalidSolution(format!(
                "hub {} is outside 0..{}",
                bad,
                instance.size()
            )));
        }
        for (node, &hub) in self.assignment.iter().enumerate() {
            if !self.hubs.contains(&hub) {
                return Err(HubError::InvalidSolution(format!(
                    "node {} is assigned to {} which is not an open hub",
                    node, hub
                )));
            }
            if self.hubs.contains(&node) && hub != node {
                return Err(HubError::InvalidSolution(format!(
                    "hub {} must serve itself, found {}",
                    node, hub
                )));
            }
        }
        Ok(())
    }

    /// Check whether every invariant holds.
    pub fn is_feasible(&self, instance: &Instance) -> bool {
        self.validate(instance).is_ok()
    }

    pub fn hubs(&self) -> &BTreeSet<usize> {
        &self.hubs
    }

    pub fn assignment(&self) -> &[usize] {
        &self.assignment
    }

    pub fn hub_count(&self) -> usize {
        self.hubs.len()
    }

    pub fn hub_of(&self, node: usize) -> usize {
        self.assignment[node]
    }

    pub fn is_hub(&self, node: usize) -> bool {
        self.hubs.contains(&node)
    }

    /// Nodes that are not open hubs, in index order.
    pub fn non_hubs(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.assignment.len()).filter(move |n| !self.hubs.contains(n))
    }

    /// The open hub closest to `node`, ties going to the lowest index.
    ///
    /// Distance stands in for service cost here; `LocalSearch` refines the
    /// assignment against the exact routing cost afterwards.
    pub fn nearest_hub(&self, instance: &Instance, node: usize) -> usize {
        let mut best = None;
        let mut best_distance = f64::INFINITY;

        for &hub in &self.hubs {
            let d = instance.distance(node, hub);
            if best.is_none() || d < best_distance {
                best = Some(hub);
                best_distance = d;
            }
        }

        // `hubs` is never empty
        best.unwrap_or(node)
    }

    /// Open `node` as a hub. Other assignments are untouched.
    pub fn open_hub(&mut self, node: usize) -> bool {
        if node >= self.assignment.len() || !self.hubs.insert(node) {
            return false;
        }
        self.assignment[node] = node;
        self.cost = None;
        true
    }

    /// Close `hub` and move every node it served to its nearest remaining hub.
    ///
    /// Refused when `hub` is not open or is the last open hub.
    pub fn close_hub(&mut self, instance: &Instance, hub: usize) -> bool {
        if self.hubs.len() <= 1 || !self.hubs.remove(&hub) {
            return false;
        }

        for node in 0..self.assignment.len() {
            if self.assignment[node] == hub {
                let nearest = self.nearest_hub(instance, node);
                self.assignment[node] = nearest;
            }
        }
        self.cost = None;
        true
    }

    /// Serve non-hub `node` from the open hub `hub`.
    pub fn assign(&mut self, node: usize, hub: usize) -> bool {
        if self.is_hub(node) || !self.is_hub(hub) {
            return false;
        }
        if self.assignment[node] != hub {
            self.assignment[node] = hub;
            self.cost = None;
        }
        true
    }

    /// Move to `hub` every non-hub node strictly closer to it than to its
    /// current hub. Returns the number of moved nodes.
    pub fn attract_to(&mut self, instance: &Instance, hub: usize) -> usize {
        if !self.is_hub(hub) {
            return 0;
        }

        let mut moved = 0;
        for node in 0..self.assignment.len() {
            if self.hubs.contains(&node) {
                continue;
            }
            let current = self.assignment[node];
            if instance.distance(node, hub) < instance.distance(node, current) {
                self.assignment[node] = hub;
                moved += 1;
            }
        }
        if moved > 0 {
            self.cost = None;
        }
        moved
    }

    /// Serve every node from its nearest open hub.
    pub fn reassign_to_nearest(&mut self, instance: &Instance) {
        for node in 0..self.assignment.len() {
            let hub = if self.hubs.contains(&node) {
                node
            } else {
                self.nearest_hub(instance, node)
            };
            self.assignment[node] = hub;
        }
        self.cost = None;
    }

    /// Total cost, computed on first use and cached until the next mutation.
    pub fn cost(&mut self, instance: &Instance) -> f64 {
        match self.cost {
            Some(cost) => cost,
            None => {
                let cost = self.compute_cost(instance);
                self.cost = Some(cost);
                cost
            }
        }
    }

    /// The cached cost, if it is still valid.
    pub fn cached_cost(&self) -> Option<f64> {
        self.cost
    }

    /// Recompute the total cost from scratch: installation plus routing.
    pub fn compute_cost(&self, instance: &Instance) -> f64 {
        let installation: f64 = self
            .hubs
            .iter()
            .map(|&h| instance.installation_cost(h))
            .sum();

        let n = self.assignment.len();
        let routing: f64 = iproduct!(0..n, 0..n)
            .map(|(i, j)| {
                let flow = instance.flow(i, j);
                if flow == 0.0 {
                    return 0.0;
                }
                flow * routing_distance(instance, i, self.assignment[i], j, self.assignment[j])
            })
            .sum();

        installation + routing
    }

    /// Routing cost of every flow that starts or ends at `node`, assuming
    /// `node` is served by `hub` and every other node keeps its assignment.
    pub fn node_cost(&self, instance: &Instance, node: usize, hub: usize) -> f64 {
        let mut total =
            instance.flow(node, node) * routing_distance(instance, node, hub, node, hub);

        for (other, &other_hub) in self.assignment.iter().enumerate() {
            if other == node {
                continue;
            }
            let out = instance.flow(node, other);
            if out != 0.0 {
                total += out * routing_distance(instance, node, hub, other, other_hub);
            }
            let inc = instance.flow(other, node);
            if inc != 0.0 {
                total += inc * routing_distance(instance, other, other_hub, node, hub);
            }
        }

        total
    }

    /// Change in total cost if non-hub `node` were served by `hub` instead.
    pub fn shift_delta(&self, instance: &Instance, node: usize, hub: usize) -> f64 {
        let current = self.assignment[node];
        if current == hub {
            return 0.0;
        }
        self.node_cost(instance, node, hub) - self.node_cost(instance, node, current)
    }
}

/// Distance of a flow from `from` to `to` collected at `from_hub` and
/// distributed from `to_hub`. The hub-to-hub leg is discounted by the scale
/// factor only when the two hubs differ.
pub fn routing_distance(
    instance: &Instance,
    from: usize,
    from_hub: usize,
    to: usize,
    to_hub: usize,
) -> f64 {
    let trunk = if from_hub == to_hub {
        instance.distance(from_hub, to_hub)
    } else {
        instance.scale_factor() * instance.distance(from_hub, to_hub)
    };
    instance.distance(from, from_hub) + trunk + instance.distance(to_hub, to)
}

impl PartialEq for Solution {
    fn eq(&self, other: &Self) -> bool {
        self.hubs == other.hubs && self.assignment == other.assignment
    }
}

impl fmt::Debug for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Solution:")?;
        match self.cost {
            Some(cost) => writeln!(f, "  Cost: {:.4}", cost)?,
            None => writeln!(f, "  Cost: <not evaluated>")?,
        }
        writeln!(f, "  Hubs: [{}]", self.hubs.iter().join(", "))?;

        for &hub in &self.hubs {
            let served = self
                .assignment
                .iter()
                .positions(|&h| h == hub)
                .join(", ");
            writeln!(f, "  Hub {}: {}", hub, served)?;
        }

        Ok(())
    }
}
