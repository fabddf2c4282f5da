//! Domain model types for the electric vehicle routing problem.
//!
//! Provides the core abstractions: graph nodes (depot, chargers, customers),
//! problem-wide vehicle parameters, the immutable problem definition shared
//! across searches, and scored solutions.

mod node;
mod params;
mod problem;
mod solution;

pub use node::{Node, NodeType};
pub use params::VehicleParameters;
pub use problem::{ProblemDefinition, ProblemError};
pub use solution::{Solution, SolutionSet};
