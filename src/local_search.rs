//! Shift-based descent used to polish every perturbed solution.

use crate::instance::Instance;
use crate::solution::Solution;

/// Moves with a delta above this are not counted as improvements.
const IMPROVEMENT_EPSILON: f64 = -1e-9;

/// First-improvement local search over single-node reassignments.
///
/// Nodes are scanned in index order and each non-hub node is tried against
/// every other open hub. The first improving move is applied and the scan
/// starts over, until a full scan finds nothing or the move budget is spent.
/// The hub set is never changed, so feasibility is preserved.
#[derive(Debug, Clone, Copy)]
pub struct LocalSearch {
    /// Maximum number of improving moves applied in one pass
    pub max_moves: usize,
}

impl LocalSearch {
    /// Create a new local search with the given move budget.
    pub fn new(max_moves: usize) -> Self {
        LocalSearch { max_moves }
    }

    /// Improve `solution` in place. Returns the number of applied moves.
    pub fn improve(&self, solution: &mut Solution, instance: &Instance) -> usize {
        let mut moves = 0;

        while moves < self.max_moves {
            match Self::first_improving_shift(solution, instance) {
                Some((node, hub, delta)) => {
                    log::trace!(
                        "local search: node {} to hub {} ({:+.4})",
                        node,
                        hub,
                        delta
                    );
                    solution.assign(node, hub);
                    moves += 1;
                }
                None => break,
            }
        }

        moves
    }

    /// Find the first reassignment that lowers the cost.
    fn first_improving_shift(
        solution: &Solution,
        instance: &Instance,
    ) -> Option<(usize, usize, f64)> {
        if solution.hub_count() < 2 {
            return None;
        }

        for node in solution.non_hubs() {
            let current = solution.hub_of(node);
            let current_cost = solution.node_cost(instance, node, current);

            for &hub in solution.hubs() {
                if hub == current {
                    continue;
                }
                let delta = solution.node_cost(instance, node, hub) - current_cost;
                if delta < IMPROVEMENT_EPSILON {
                    return Some((node, hub, delta));
                }
            }
        }

        None
    }
}
