//! SwapFunction neighborhood: exchange the role of a hub and a closed node.

use super::{random_closed_node, random_hub, Neighborhood};
use crate::instance::Instance;
use crate::solution::Solution;
use crate::SearchRng;

/// Closes a random hub and opens a random closed node in its place.
///
/// The new hub is opened before the old one is closed so the solution never
/// runs out of hubs; nodes of the closed hub go to their nearest remaining
/// hub and every node strictly closer to the new hub moves to it.
#[derive(Debug, Clone, Copy, Default)]
pub struct SwapFunction;

impl Neighborhood for SwapFunction {
    fn name(&self) -> &'static str {
        "swap-function"
    }

    fn apply(&self, instance: &Instance, solution: &Solution, rng: &mut SearchRng) -> Solution {
        let mut neighbor = solution.clone();

        let (closing, opening) = match (
            random_hub(&neighbor, rng),
            random_closed_node(&neighbor, rng),
        ) {
            (Some(closing), Some(opening)) => (closing, opening),
            _ => return neighbor,
        };

        log::trace!("swap-function: {} closes, {} opens", closing, opening);
        neighbor.open_hub(opening);
        neighbor.close_hub(instance, closing);
        neighbor.attract_to(instance, opening);

        neighbor
    }
}
