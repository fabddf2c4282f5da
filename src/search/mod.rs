//! Search drivers that propose desired tours and rank them by simulated
//! distance.
//!
//! Every driver works against the same oracle, [`crate::simulator::Vehicle`],
//! and returns a [`SolutionSet`] of scored tours. Drivers differ only in how
//! they explore the permutation space: evolutionary recombination
//! ([`ga::GeneticAlgorithm`]), uniform sampling ([`random::RandomSearch`]),
//! or deterministic construction ([`neh::NehNearestNeighbor`]).

pub mod ga;
pub mod neh;
pub mod random;

pub use ga::{GaConfig, GeneticAlgorithm};
pub use neh::NehNearestNeighbor;
pub use random::{RandomSearch, RandomSearchConfig};

use crate::models::{ProblemDefinition, SolutionSet};

/// A tour search strategy.
///
/// Implementations carry their own configuration and randomness; the problem
/// definition is shared and immutable.
pub trait Optimizer {
    /// Short human-readable name, used in run logs.
    fn name(&self) -> &str;

    /// The driver's settings as `key:value` strings, for run logs.
    fn hyperparameters(&self) -> Vec<String>;

    /// Runs the search to completion and returns the scored solutions found.
    fn optimize(&mut self, problem: &ProblemDefinition) -> SolutionSet;
}
