//! # ev-routing
//!
//! Electric vehicle routing: a single-vehicle route feasibility simulator
//! with battery and load constraints, plus the search drivers that use it
//! to find short tours.
//!
//! A desired tour names only customers; the simulator turns it into the
//! concrete route the vehicle physically drives, inserting depot restocks
//! and charging stops where the constraints demand them, and scores the
//! tour by the true traveled distance.
//!
//! ## Modules
//!
//! - [`models`] — Domain model types (Node, VehicleParameters, ProblemDefinition, SolutionSet)
//! - [`simulator`] — Route feasibility simulation and charger-relay pathfinding
//! - [`search`] — Search drivers (genetic algorithm, random search, NEH nearest neighbor)
//! - [`io`] — Instance file loading and run-result logging
//! - [`solver`] — Driver orchestration with timing and logging

pub mod io;
pub mod models;
pub mod search;
pub mod simulator;
pub mod solver;

pub use solver::{EvrpSolver, SeedAlgorithm, SolverConfig};
