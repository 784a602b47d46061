//! RemoveHub neighborhood: close an open hub.

use super::{random_hub, Neighborhood};
use crate::instance::Instance;
use crate::solution::Solution;
use crate::SearchRng;

/// Closes a random hub; its nodes move to their nearest remaining hub.
/// The last open hub is never closed.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveHub;

impl Neighborhood for RemoveHub {
    fn name(&self) -> &'static str {
        "remove-hub"
    }

    fn apply(&self, instance: &Instance, solution: &Solution, rng: &mut SearchRng) -> Solution {
        let mut neighbor = solution.clone();

        if neighbor.hub_count() < 2 {
            return neighbor;
        }

        if let Some(hub) = random_hub(&neighbor, rng) {
            log::trace!("remove-hub: closing {}", hub);
            neighbor.close_hub(instance, hub);
        }

        neighbor
    }
}
