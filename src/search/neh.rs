//! Deterministic constructive search: nearest-neighbor subtours refined by
//! NEH insertion.
//!
//! Customers are first grouped into capacity-bounded subtours by repeatedly
//! walking to the nearest unvisited customer. Each subtour is then reordered
//! with the NEH heuristic, inserting one customer at a time at the position
//! that minimizes the simulated distance of the partial subtour. The
//! concatenated subtours form the final desired tour.
//!
//! No randomness is involved, so this driver doubles as a cheap seed-tour
//! source for the genetic algorithm.

use tracing::debug;

use crate::models::{ProblemDefinition, Solution, SolutionSet};
use crate::simulator::Vehicle;

use super::Optimizer;

/// Nearest-neighbor + NEH constructive driver.
#[derive(Debug, Default)]
pub struct NehNearestNeighbor;

impl NehNearestNeighbor {
    /// Creates the driver. It carries no configuration.
    pub fn new() -> Self {
        Self
    }

    /// Groups customers into subtours bounded by the load capacity.
    ///
    /// Each subtour walks greedily to the nearest unvisited customer and
    /// ends when the next nearest customer's demand no longer fits the
    /// remaining load. A customer whose demand exceeds even a full load is
    /// taken as its own subtour so construction always terminates; the
    /// simulator scores the resulting tour infeasible.
    fn nearest_neighbor_subtours(&self, problem: &ProblemDefinition) -> Vec<Vec<usize>> {
        let capacity = problem.vehicle_parameters().load_capacity();
        let mut visited = vec![false; problem.nodes().len()];
        let mut remaining = problem.customers().len();
        let mut subtours = Vec::new();

        while remaining > 0 {
            let mut subtour = Vec::new();
            let mut current = problem.depot();
            let mut load = capacity;

            while remaining > 0 {
                let Some(nearest) = nearest_unvisited(problem, &visited, current) else {
                    break;
                };
                let demand = problem.nodes()[nearest].demand();
                if demand > load {
                    if subtour.is_empty() && demand > capacity {
                        subtour.push(nearest);
                        visited[nearest] = true;
                        remaining -= 1;
                    }
                    break;
                }

                load -= demand;
                subtour.push(nearest);
                visited[nearest] = true;
                remaining -= 1;
                current = nearest;
            }

            subtours.push(subtour);
        }

        subtours
    }

    /// NEH insertion: grows the subtour one customer at a time, trying every
    /// insertion position and keeping the first one with the strictly
    /// smallest simulated distance.
    fn neh_order(&self, vehicle: &mut Vehicle<'_>, subtour: &[usize]) -> Vec<usize> {
        if subtour.len() < 2 {
            return subtour.to_vec();
        }

        let mut partial = vec![subtour[0]];
        for &next in &subtour[1..] {
            let mut best: Option<(Vec<usize>, f64)> = None;
            for at in 0..=partial.len() {
                let mut candidate = partial.clone();
                candidate.insert(at, next);
                let distance = vehicle.simulate_drive(&candidate);
                match best {
                    Some((_, best_dist)) if distance >= best_dist => {}
                    _ => best = Some((candidate, distance)),
                }
            }
            // Safe: the position loop runs at least once.
            partial = best.map(|(tour, _)| tour).unwrap_or(partial);
        }
        partial
    }
}

fn nearest_unvisited(
    problem: &ProblemDefinition,
    visited: &[bool],
    from: usize,
) -> Option<usize> {
    let mut nearest: Option<(usize, f64)> = None;
    for &customer in problem.customers() {
        if visited[customer] || customer == from {
            continue;
        }
        let d = problem.distance(from, customer);
        match nearest {
            Some((_, best)) if d >= best => {}
            _ => nearest = Some((customer, d)),
        }
    }
    nearest.map(|(customer, _)| customer)
}

impl Optimizer for NehNearestNeighbor {
    fn name(&self) -> &str {
        "neh_nearest_neighbor"
    }

    fn hyperparameters(&self) -> Vec<String> {
        Vec::new()
    }

    fn optimize(&mut self, problem: &ProblemDefinition) -> SolutionSet {
        let mut vehicle = Vehicle::new(problem);
        let subtours = self.nearest_neighbor_subtours(problem);
        debug!(count = subtours.len(), "nearest-neighbor subtours built");

        let mut tour = Vec::with_capacity(problem.customers().len());
        for subtour in &subtours {
            tour.extend(self.neh_order(&mut vehicle, subtour));
        }

        let distance = vehicle.simulate_drive(&tour);
        let mut results = SolutionSet::new();
        results.insert(Solution::new(tour, distance));
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Node, VehicleParameters};
    use crate::simulator::IMPOSSIBLE_ROUTE_PENALTY;

    fn clustered_problem() -> ProblemDefinition {
        // Two clusters whose demands each fill the vehicle, forcing two
        // subtours.
        let nodes = vec![
            Node::depot(0.0, 0.0),
            Node::charger(1, 0.0, 0.0),
            Node::customer(2, 1.0, 0.0, 5),
            Node::customer(3, 2.0, 0.0, 5),
            Node::customer(4, 0.0, 50.0, 5),
            Node::customer(5, 0.0, 51.0, 5),
        ];
        ProblemDefinition::new(nodes, VehicleParameters::new(10, 1000.0, 1.0)).expect("valid")
    }

    #[test]
    fn test_subtours_respect_capacity() {
        let p = clustered_problem();
        let driver = NehNearestNeighbor::new();
        let subtours = driver.nearest_neighbor_subtours(&p);
        assert_eq!(subtours.len(), 2);
        for subtour in &subtours {
            let demand: i32 = subtour.iter().map(|&c| p.nodes()[c].demand()).sum();
            assert!(demand <= 10);
        }
    }

    #[test]
    fn test_subtours_cover_all_customers() {
        let p = clustered_problem();
        let driver = NehNearestNeighbor::new();
        let mut all: Vec<usize> = driver
            .nearest_neighbor_subtours(&p)
            .into_iter()
            .flatten()
            .collect();
        all.sort_unstable();
        assert_eq!(all, vec![2, 3, 4, 5]);
    }

    #[test]
    fn test_optimize_returns_feasible_tour() {
        let p = clustered_problem();
        let results = NehNearestNeighbor::new().optimize(&p);
        assert_eq!(results.len(), 1);
        let best = results.best().expect("nonempty");
        assert!(best.distance() < IMPOSSIBLE_ROUTE_PENALTY);

        let mut tour = best.tour().to_vec();
        tour.sort_unstable();
        assert_eq!(tour, vec![2, 3, 4, 5]);
    }

    #[test]
    fn test_deterministic() {
        let p = clustered_problem();
        let a = NehNearestNeighbor::new().optimize(&p);
        let b = NehNearestNeighbor::new().optimize(&p);
        assert_eq!(a.tours(), b.tours());
    }

    #[test]
    fn test_oversized_demand_becomes_own_subtour() {
        let nodes = vec![
            Node::depot(0.0, 0.0),
            Node::charger(1, 0.0, 0.0),
            Node::customer(2, 1.0, 0.0, 25),
            Node::customer(3, 2.0, 0.0, 5),
        ];
        let p =
            ProblemDefinition::new(nodes, VehicleParameters::new(10, 1000.0, 1.0)).expect("valid");
        let driver = NehNearestNeighbor::new();
        let subtours = driver.nearest_neighbor_subtours(&p);
        let mut all: Vec<usize> = subtours.into_iter().flatten().collect();
        all.sort_unstable();
        assert_eq!(all, vec![2, 3]);

        // The whole tour is still infeasible, which the simulator reports
        // via the sentinel.
        let results = NehNearestNeighbor::new().optimize(&p);
        assert!(results.best().expect("nonempty").distance() >= IMPOSSIBLE_ROUTE_PENALTY);
    }

    #[test]
    fn test_neh_order_keeps_members() {
        let p = clustered_problem();
        let mut vehicle = Vehicle::new(&p);
        let driver = NehNearestNeighbor::new();
        let mut ordered = driver.neh_order(&mut vehicle, &[3, 2]);
        ordered.sort_unstable();
        assert_eq!(ordered, vec![2, 3]);
    }
}
