//! Uniform random search.
//!
//! The simplest baseline: sample random permutations in batches, keep each
//! batch's best. Useful both as a control for the other drivers and as a
//! cheap source of seed tours.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{ProblemDefinition, Solution, SolutionSet};
use crate::simulator::Vehicle;

use super::Optimizer;

/// Random search settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomSearchConfig {
    /// Number of sampling batches; the best of each batch is kept.
    pub generations: usize,
    /// Permutations drawn per batch.
    pub samples_per_generation: usize,
}

impl Default for RandomSearchConfig {
    fn default() -> Self {
        Self {
            generations: 100,
            samples_per_generation: 10_000,
        }
    }
}

/// Tour search by uniform permutation sampling.
pub struct RandomSearch {
    config: RandomSearchConfig,
    rng: StdRng,
}

impl RandomSearch {
    /// Creates a driver with the given settings and OS-seeded randomness.
    pub fn new(config: RandomSearchConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Creates a reproducible driver from an explicit seed.
    pub fn seeded(config: RandomSearchConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Optimizer for RandomSearch {
    fn name(&self) -> &str {
        "random_search"
    }

    fn hyperparameters(&self) -> Vec<String> {
        vec![
            format!("generations:{}", self.config.generations),
            format!(
                "samples_per_generation:{}",
                self.config.samples_per_generation
            ),
        ]
    }

    fn optimize(&mut self, problem: &ProblemDefinition) -> SolutionSet {
        let mut results = SolutionSet::new();

        for generation in 0..self.config.generations {
            // Sampling stays on the driver's rng for reproducibility; only
            // the simulation fans out across workers.
            let samples: Vec<Vec<usize>> = (0..self.config.samples_per_generation)
                .map(|_| problem.random_tour(&mut self.rng))
                .collect();

            let distances: Vec<f64> = samples
                .par_iter()
                .map_init(
                    || Vehicle::new(problem),
                    |vehicle, tour| vehicle.simulate_drive(tour),
                )
                .collect();

            // Reduced sequentially so tie-breaking between equal distances
            // does not depend on worker scheduling.
            let best = distances
                .iter()
                .enumerate()
                .min_by(|(_, a), (_, b)| a.total_cmp(b));
            if let Some((index, &distance)) = best {
                debug!(generation, distance, "generation best");
                results.insert(Solution::new(samples[index].clone(), distance));
            }
        }

        results
    }
}
