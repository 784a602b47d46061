//! Perturbation neighborhoods used by the VNS engine.
//!
//! Every neighborhood works copy-on-write: the incumbent is cloned, the clone
//! is modified and returned. A move whose preconditions do not hold (closing
//! the last hub, opening a hub when every node already is one, ...) returns
//! the clone unchanged instead of failing.

pub mod add_hub;
pub mod remove_hub;
pub mod shift;
pub mod swap_function;

pub use add_hub::AddHub;
pub use remove_hub::RemoveHub;
pub use shift::Shift;
pub use swap_function::SwapFunction;

use crate::instance::Instance;
use crate::solution::Solution;
use crate::SearchRng;
use rand::seq::IteratorRandom;

/// A structural move class explored by the VNS engine.
pub trait Neighborhood: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Produce a random neighbor of `solution`, leaving `solution` untouched.
    fn apply(&self, instance: &Instance, solution: &Solution, rng: &mut SearchRng) -> Solution;
}

/// The escalation order used by the solver: shift, remove, add, swap.
pub fn default_neighborhoods() -> Vec<Box<dyn Neighborhood>> {
    vec![
        Box::new(Shift),
        Box::new(RemoveHub),
        Box::new(AddHub),
        Box::new(SwapFunction),
    ]
}

/// Pick a random node that is currently closed.
pub(crate) fn random_closed_node(solution: &Solution, rng: &mut SearchRng) -> Option<usize> {
    solution.non_hubs().choose(rng)
}

/// Pick a random open hub.
pub(crate) fn random_hub(solution: &Solution, rng: &mut SearchRng) -> Option<usize> {
    solution.hubs().iter().copied().choose(rng)
}
