//! Solution and solution-set types.

use rand::Rng;

/// A scored candidate tour: the desired customer visiting order and the true
/// simulated distance of the physically valid route it induces.
///
/// Lower distance is better. Infeasible tours carry the simulator's sentinel
/// penalty rather than an error, so every pair of solutions stays comparable.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    tour: Vec<usize>,
    distance: f64,
}

impl Solution {
    /// Creates a scored solution.
    pub fn new(tour: Vec<usize>, distance: f64) -> Self {
        Self { tour, distance }
    }

    /// The desired customer visiting order.
    pub fn tour(&self) -> &[usize] {
        &self.tour
    }

    /// True simulated distance of the tour.
    pub fn distance(&self) -> f64 {
        self.distance
    }
}

/// A collection of solutions ordered by distance.
///
/// Duplicates are allowed and insertion order is irrelevant; internally the
/// set stays sorted so `best` is O(1) and insertion is a binary search plus
/// shift.
///
/// # Examples
///
/// ```
/// use ev_routing::models::{Solution, SolutionSet};
///
/// let mut set = SolutionSet::new();
/// set.insert(Solution::new(vec![1, 2], 40.0));
/// set.insert(Solution::new(vec![2, 1], 30.0));
///
/// assert_eq!(set.len(), 2);
/// assert_eq!(set.best().unwrap().distance(), 30.0);
/// assert!((set.mean_distance() - 35.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SolutionSet {
    solutions: Vec<Solution>,
    distance_sum: f64,
}

impl SolutionSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a solution, keeping the set sorted by distance.
    pub fn insert(&mut self, solution: Solution) {
        self.distance_sum += solution.distance();
        let at = self
            .solutions
            .partition_point(|s| s.distance() <= solution.distance());
        self.solutions.insert(at, solution);
    }

    /// The solution with the smallest distance, if any.
    pub fn best(&self) -> Option<&Solution> {
        self.solutions.first()
    }

    /// A uniformly random member of the set, if any.
    pub fn random_sample<R: Rng>(&self, rng: &mut R) -> Option<&Solution> {
        if self.solutions.is_empty() {
            return None;
        }
        let index = rng.random_range(0..self.solutions.len());
        self.solutions.get(index)
    }

    /// Mean distance over all members. Zero for an empty set.
    pub fn mean_distance(&self) -> f64 {
        if self.solutions.is_empty() {
            return 0.0;
        }
        self.distance_sum / self.solutions.len() as f64
    }

    /// Number of solutions held.
    pub fn len(&self) -> usize {
        self.solutions.len()
    }

    /// Returns `true` if the set holds no solutions.
    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }

    /// All solutions, sorted ascending by distance.
    pub fn solutions(&self) -> &[Solution] {
        &self.solutions
    }

    /// The tours held in this set, best first.
    pub fn tours(&self) -> Vec<Vec<usize>> {
        self.solutions.iter().map(|s| s.tour().to_vec()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_set() {
        let set = SolutionSet::new();
        assert!(set.is_empty());
        assert!(set.best().is_none());
        assert_eq!(set.mean_distance(), 0.0);
    }

    #[test]
    fn test_insert_keeps_sorted() {
        let mut set = SolutionSet::new();
        set.insert(Solution::new(vec![1], 50.0));
        set.insert(Solution::new(vec![2], 10.0));
        set.insert(Solution::new(vec![3], 30.0));

        let distances: Vec<f64> = set.solutions().iter().map(|s| s.distance()).collect();
        assert_eq!(distances, vec![10.0, 30.0, 50.0]);
        assert_eq!(set.best().expect("nonempty").tour(), &[2]);
    }

    #[test]
    fn test_duplicates_allowed() {
        let mut set = SolutionSet::new();
        set.insert(Solution::new(vec![1], 20.0));
        set.insert(Solution::new(vec![1], 20.0));
        assert_eq!(set.len(), 2);
        assert!((set.mean_distance() - 20.0).abs() < 1e-10);
    }

    #[test]
    fn test_mean_distance() {
        let mut set = SolutionSet::new();
        set.insert(Solution::new(vec![1], 10.0));
        set.insert(Solution::new(vec![2], 20.0));
        set.insert(Solution::new(vec![3], 60.0));
        assert!((set.mean_distance() - 30.0).abs() < 1e-10);
    }

    #[test]
    fn test_random_sample() {
        let mut set = SolutionSet::new();
        assert!(set.random_sample(&mut rand::rng()).is_none());

        set.insert(Solution::new(vec![1], 10.0));
        set.insert(Solution::new(vec![2], 20.0));
        let sampled = set.random_sample(&mut rand::rng()).expect("nonempty");
        assert!(sampled.distance() == 10.0 || sampled.distance() == 20.0);
    }

    #[test]
    fn test_tours_best_first() {
        let mut set = SolutionSet::new();
        set.insert(Solution::new(vec![9, 8], 40.0));
        set.insert(Solution::new(vec![8, 9], 15.0));
        assert_eq!(set.tours(), vec![vec![8, 9], vec![9, 8]]);
    }
}
