//! Top-level solver: wires instances, search drivers, and run logging
//! together.
//!
//! A solver owns one problem instance and a [`SolverConfig`]. It can either
//! run every driver independently ([`EvrpSolver::solve`]) or run a cheap
//! driver first and feed its tours to the genetic algorithm as seeds
//! ([`EvrpSolver::solve_seeded`]). Every run is timed and appended to the
//! shared [`RunLogger`].

use std::io::{self, Write};
use std::path::Path;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::io::{load_instance, LoadError, OptimizationResult, RunLogger};
use crate::models::ProblemDefinition;
use crate::search::{
    GaConfig, GeneticAlgorithm, NehNearestNeighbor, Optimizer, RandomSearch, RandomSearchConfig,
};

/// Driver settings for a solver, loadable from JSON.
///
/// # Examples
///
/// ```
/// use ev_routing::SolverConfig;
///
/// let config = SolverConfig::from_json(
///     r#"{
///         "ga": {
///             "population_size": 50,
///             "generations": 100,
///             "tournament_size": 5,
///             "mutation_rate": 0.2
///         },
///         "random_search": {
///             "generations": 10,
///             "samples_per_generation": 1000
///         }
///     }"#,
/// )
/// .unwrap();
/// assert_eq!(config.ga.population_size, 50);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Genetic algorithm settings.
    #[serde(default)]
    pub ga: GaConfig,
    /// Random search settings.
    #[serde(default)]
    pub random_search: RandomSearchConfig,
}

impl SolverConfig {
    /// Parses a configuration from JSON text. Omitted sections take their
    /// defaults.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Which driver produces seed tours for a seeded genetic algorithm run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedAlgorithm {
    /// Deterministic nearest-neighbor + NEH construction.
    Neh,
    /// Uniform random sampling.
    Random,
}

/// Solves one problem instance with the configured drivers.
pub struct EvrpSolver {
    problem: ProblemDefinition,
    problem_name: String,
    config: SolverConfig,
}

impl EvrpSolver {
    /// Creates a solver for an already-loaded instance.
    pub fn new(problem: ProblemDefinition, problem_name: impl Into<String>, config: SolverConfig) -> Self {
        Self {
            problem,
            problem_name: problem_name.into(),
            config,
        }
    }

    /// Loads an instance file and creates a solver for it. The problem name
    /// in run records is the file name.
    pub fn from_file<P: AsRef<Path>>(path: P, config: SolverConfig) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let problem = load_instance(path)?;
        let problem_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(problem, problem_name, config))
    }

    /// The instance this solver works on.
    pub fn problem(&self) -> &ProblemDefinition {
        &self.problem
    }

    /// Runs every configured driver independently, logging one record each.
    ///
    /// Returns the records in run order: genetic algorithm, random search,
    /// NEH nearest neighbor.
    pub fn solve<W: Write>(&self, logger: &RunLogger<W>) -> io::Result<Vec<OptimizationResult>> {
        let mut records = Vec::new();
        let mut drivers: Vec<Box<dyn Optimizer>> = vec![
            Box::new(GeneticAlgorithm::new(self.config.ga.clone())),
            Box::new(RandomSearch::new(self.config.random_search.clone())),
            Box::new(NehNearestNeighbor::new()),
        ];
        for driver in &mut drivers {
            records.push(self.run_driver(driver.as_mut(), logger)?);
        }
        Ok(records)
    }

    /// Runs the seed driver, then a genetic algorithm whose initial
    /// population starts from the seed driver's tours.
    ///
    /// Both runs are logged; the returned record is the seeded genetic
    /// algorithm's.
    pub fn solve_seeded<W: Write>(
        &self,
        seed: SeedAlgorithm,
        logger: &RunLogger<W>,
    ) -> io::Result<OptimizationResult> {
        let mut seed_driver: Box<dyn Optimizer> = match seed {
            SeedAlgorithm::Neh => Box::new(NehNearestNeighbor::new()),
            SeedAlgorithm::Random => Box::new(RandomSearch::new(self.config.random_search.clone())),
        };
        info!(
            problem = %self.problem_name,
            seed = seed_driver.name(),
            "seeded solve"
        );

        let start = Instant::now();
        let solutions = seed_driver.optimize(&self.problem);
        let execution_time = start.elapsed().as_secs_f64();
        let (tour, distance) = match solutions.best() {
            Some(best) => (best.tour().to_vec(), best.distance()),
            None => (Vec::new(), f64::INFINITY),
        };
        logger.record(&OptimizationResult {
            distance,
            problem: self.problem_name.clone(),
            algorithm: seed_driver.name().to_string(),
            execution_time,
            tour,
            hyperparameters: seed_driver.hyperparameters(),
        })?;

        // Every tour the seed driver found enters the initial population,
        // best first.
        let mut ga = GeneticAlgorithm::new(self.config.ga.clone()).with_seeds(solutions.tours());
        self.run_driver(&mut ga, logger)
    }

    fn run_driver<W: Write>(
        &self,
        driver: &mut dyn Optimizer,
        logger: &RunLogger<W>,
    ) -> io::Result<OptimizationResult> {
        info!(problem = %self.problem_name, algorithm = driver.name(), "search started");
        let start = Instant::now();
        let solutions = driver.optimize(&self.problem);
        let execution_time = start.elapsed().as_secs_f64();

        let (tour, distance) = match solutions.best() {
            Some(best) => (best.tour().to_vec(), best.distance()),
            None => (Vec::new(), f64::INFINITY),
        };
        info!(
            problem = %self.problem_name,
            algorithm = driver.name(),
            distance,
            execution_time,
            "search finished"
        );

        let result = OptimizationResult {
            distance,
            problem: self.problem_name.clone(),
            algorithm: driver.name().to_string(),
            execution_time,
            tour,
            hyperparameters: driver.hyperparameters(),
        };
        logger.record(&result)?;
        Ok(result)
    }
}
