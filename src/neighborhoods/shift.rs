//! Shift neighborhood: serve one node from a different open hub.

use super::{random_closed_node, Neighborhood};
use crate::instance::Instance;
use crate::solution::Solution;
use crate::SearchRng;
use rand::seq::IteratorRandom;

/// Reassigns a random non-hub node to another random open hub.
#[derive(Debug, Clone, Copy, Default)]
pub struct Shift;

impl Neighborhood for Shift {
    fn name(&self) -> &'static str {
        "shift"
    }

    fn apply(&self, _instance: &Instance, solution: &Solution, rng: &mut SearchRng) -> Solution {
        let mut neighbor = solution.clone();

        if neighbor.hub_count() < 2 {
            return neighbor;
        }
        let node = match random_closed_node(&neighbor, rng) {
            Some(node) => node,
            None => return neighbor,
        };

        let current = neighbor.hub_of(node);
        let target = neighbor
            .hubs()
            .iter()
            .copied()
            .filter(|&hub| hub != current)
            .choose(rng);

        if let Some(hub) = target {
            log::trace!("shift: node {} from hub {} to hub {}", node, current, hub);
            neighbor.assign(node, hub);
        }

        neighbor
    }
}
