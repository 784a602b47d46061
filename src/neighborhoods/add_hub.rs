//! AddHub neighborhood: open a closed node.

use super::{random_closed_node, Neighborhood};
use crate::instance::Instance;
use crate::solution::Solution;
use crate::SearchRng;

/// Opens a random closed node as a hub. Nodes strictly closer to the new hub
/// than to their current one are moved to it.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddHub;

impl Neighborhood for AddHub {
    fn name(&self) -> &'static str {
        "add-hub"
    }

    fn apply(&self, instance: &Instance, solution: &Solution, rng: &mut SearchRng) -> Solution {
        let mut neighbor = solution.clone();

        if let Some(node) = random_closed_node(&neighbor, rng) {
            neighbor.open_hub(node);
            let moved = neighbor.attract_to(instance, node);
            log::trace!("add-hub: opened {} serving {} nodes", node, moved);
        }

        neighbor
    }
}
