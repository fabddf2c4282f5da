//! Genetic algorithm over customer permutations.
//!
//! Each chromosome is a desired tour. Fitness is the true simulated distance
//! from [`Vehicle::simulate_drive`], so infeasible tours are never pruned,
//! just out-scored by the sentinel penalty. Generations are evaluated in
//! parallel with one simulator per worker thread.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{ProblemDefinition, Solution, SolutionSet};
use crate::simulator::Vehicle;

use super::Optimizer;

/// Genetic algorithm settings.
///
/// # Examples
///
/// ```
/// use ev_routing::search::GaConfig;
///
/// let config = GaConfig::default();
/// assert_eq!(config.population_size, 100);
/// assert_eq!(config.generations, 500);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GaConfig {
    /// Chromosomes per generation.
    pub population_size: usize,
    /// Number of generations to evolve.
    pub generations: usize,
    /// Contestants per tournament. Values below 2 are treated as 2.
    pub tournament_size: usize,
    /// Probability that an offspring undergoes a swap mutation.
    pub mutation_rate: f64,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            generations: 500,
            tournament_size: 5,
            mutation_rate: 0.2,
        }
    }
}

/// Tour search by evolutionary recombination.
///
/// The initial population is random permutations, optionally seeded with
/// tours from another driver via [`GeneticAlgorithm::with_seeds`].
pub struct GeneticAlgorithm {
    config: GaConfig,
    seeds: Vec<Vec<usize>>,
    rng: StdRng,
}

impl GeneticAlgorithm {
    /// Creates a driver with the given settings and OS-seeded randomness.
    pub fn new(config: GaConfig) -> Self {
        Self {
            config,
            seeds: Vec::new(),
            rng: StdRng::from_os_rng(),
        }
    }

    /// Creates a reproducible driver from an explicit seed.
    pub fn seeded(config: GaConfig, seed: u64) -> Self {
        Self {
            config,
            seeds: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Injects starting tours into the initial population.
    ///
    /// At most `population_size` seeds are used; the remainder of the
    /// population is random permutations.
    pub fn with_seeds(mut self, seeds: Vec<Vec<usize>>) -> Self {
        self.seeds = seeds;
        self
    }

    fn initial_population(&mut self, problem: &ProblemDefinition) -> Vec<Vec<usize>> {
        let mut population: Vec<Vec<usize>> = self
            .seeds
            .iter()
            .take(self.config.population_size)
            .cloned()
            .collect();
        while population.len() < self.config.population_size {
            population.push(problem.random_tour(&mut self.rng));
        }
        population
    }

    /// Best-of-k tournament, sampling contestants with replacement.
    fn select(&mut self, fitness: &[f64]) -> usize {
        let k = self.config.tournament_size.max(2);
        let mut winner = self.rng.random_range(0..fitness.len());
        for _ in 1..k {
            let contender = self.rng.random_range(0..fitness.len());
            if fitness[contender] < fitness[winner] {
                winner = contender;
            }
        }
        winner
    }

    /// Single-point crossover that preserves permutation validity: the
    /// child takes the head of `a` up to the cut, then the remaining
    /// customers in the order `b` visits them.
    fn crossover(&mut self, a: &[usize], b: &[usize]) -> Vec<usize> {
        if a.len() < 2 {
            return a.to_vec();
        }
        let cut = self.rng.random_range(1..a.len());
        let mut child = a[..cut].to_vec();
        child.extend(b.iter().copied().filter(|c| !a[..cut].contains(c)));
        child
    }

    fn mutate(&mut self, tour: &mut [usize]) {
        if tour.len() < 2 || !self.rng.random_bool(self.config.mutation_rate) {
            return;
        }
        let i = self.rng.random_range(0..tour.len());
        let j = self.rng.random_range(0..tour.len());
        tour.swap(i, j);
    }
}

impl Optimizer for GeneticAlgorithm {
    fn name(&self) -> &str {
        "genetic_algorithm"
    }

    fn hyperparameters(&self) -> Vec<String> {
        vec![
            format!("population_size:{}", self.config.population_size),
            format!("generations:{}", self.config.generations),
            format!("tournament_size:{}", self.config.tournament_size),
            format!("mutation_rate:{}", self.config.mutation_rate),
            format!("seed_tours:{}", self.seeds.len()),
        ]
    }

    fn optimize(&mut self, problem: &ProblemDefinition) -> SolutionSet {
        let mut results = SolutionSet::new();
        let mut population = self.initial_population(problem);

        for generation in 0..self.config.generations {
            let fitness: Vec<f64> = population
                .par_iter()
                .map_init(
                    || Vehicle::new(problem),
                    |vehicle, tour| vehicle.simulate_drive(tour),
                )
                .collect();

            let best = fitness
                .iter()
                .enumerate()
                .min_by(|(_, a), (_, b)| a.total_cmp(b))
                .map(|(i, &d)| (i, d));
            if let Some((index, distance)) = best {
                debug!(generation, distance, "generation best");
                results.insert(Solution::new(population[index].clone(), distance));
            }

            let mut next = Vec::with_capacity(population.len());
            while next.len() < population.len() {
                let a = self.select(&fitness);
                let b = self.select(&fitness);
                let mut child = self.crossover(&population[a], &population[b]);
                self.mutate(&mut child);
                next.push(child);
            }
            population = next;
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Node, VehicleParameters};
    use crate::simulator::IMPOSSIBLE_ROUTE_PENALTY;

    fn small_problem() -> ProblemDefinition {
        let nodes = vec![
            Node::depot(0.0, 0.0),
            Node::charger(1, 0.0, 0.0),
            Node::customer(2, 10.0, 0.0, 1),
            Node::customer(3, 0.0, 10.0, 1),
            Node::customer(4, 10.0, 10.0, 1),
            Node::customer(5, 5.0, 5.0, 1),
        ];
        ProblemDefinition::new(nodes, VehicleParameters::new(10, 1000.0, 1.0)).expect("valid")
    }

    fn small_config() -> GaConfig {
        GaConfig {
            population_size: 10,
            generations: 20,
            tournament_size: 3,
            mutation_rate: 0.2,
        }
    }

    #[test]
    fn test_best_tour_is_feasible_permutation() {
        let p = small_problem();
        let results = GeneticAlgorithm::seeded(small_config(), 7).optimize(&p);
        let best = results.best().expect("nonempty");
        assert!(best.distance() < IMPOSSIBLE_ROUTE_PENALTY);

        let mut tour = best.tour().to_vec();
        tour.sort_unstable();
        assert_eq!(tour, vec![2, 3, 4, 5]);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let p = small_problem();
        let a = GeneticAlgorithm::seeded(small_config(), 42).optimize(&p);
        let b = GeneticAlgorithm::seeded(small_config(), 42).optimize(&p);
        assert_eq!(
            a.best().expect("nonempty").distance(),
            b.best().expect("nonempty").distance()
        );
        assert_eq!(a.best().expect("nonempty").tour(), b.best().expect("nonempty").tour());
    }

    #[test]
    fn test_seed_tours_enter_population() {
        let p = small_problem();
        let seed_tour = vec![5, 4, 3, 2];
        let mut ga = GeneticAlgorithm::seeded(small_config(), 1).with_seeds(vec![seed_tour.clone()]);
        let population = ga.initial_population(&p);
        assert_eq!(population[0], seed_tour);
        assert_eq!(population.len(), 10);
    }

    #[test]
    fn test_crossover_preserves_permutation() {
        let mut ga = GeneticAlgorithm::seeded(small_config(), 3);
        let a = vec![2, 3, 4, 5];
        let b = vec![5, 2, 3, 4];
        for _ in 0..20 {
            let mut child = ga.crossover(&a, &b);
            child.sort_unstable();
            assert_eq!(child, vec![2, 3, 4, 5]);
        }
    }

    #[test]
    fn test_one_solution_per_generation() {
        let p = small_problem();
        let results = GeneticAlgorithm::seeded(small_config(), 9).optimize(&p);
        assert_eq!(results.len(), small_config().generations);
    }

    #[test]
    fn test_hyperparameters_reported() {
        let ga = GeneticAlgorithm::new(GaConfig::default());
        let params = ga.hyperparameters();
        assert!(params.contains(&"population_size:100".to_string()));
        assert!(params.contains(&"mutation_rate:0.2".to_string()));
    }
}
