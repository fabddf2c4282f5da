//! Problem instance definition.

use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use super::{Node, NodeType, VehicleParameters};

/// Errors raised when constructing a [`ProblemDefinition`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProblemError {
    /// No node of type `Depot` was supplied.
    #[error("problem has no depot node")]
    MissingDepot,
    /// More than one node of type `Depot` was supplied.
    #[error("problem has more than one depot node")]
    MultipleDepots,
    /// The depot must sit at index 0.
    #[error("depot node has index {0}, expected 0")]
    DepotNotFirst(usize),
    /// Node indices must be contiguous and match their position.
    #[error("node at position {position} has index {index}")]
    NonContiguousIndex {
        /// Position in the supplied node list.
        position: usize,
        /// The index the node carries.
        index: usize,
    },
}

/// An immutable EVRP instance: the full node set plus vehicle parameters.
///
/// Partitioned into depot / charger / customer views at construction and
/// read-only afterwards, so it can be shared freely across worker threads
/// evaluating candidate tours concurrently.
///
/// # Examples
///
/// ```
/// use ev_routing::models::{Node, ProblemDefinition, VehicleParameters};
///
/// let nodes = vec![
///     Node::depot(0.0, 0.0),
///     Node::charger(1, 0.0, 0.0),
///     Node::customer(2, 3.0, 4.0, 10),
/// ];
/// let params = VehicleParameters::new(100, 500.0, 1.0);
/// let problem = ProblemDefinition::new(nodes, params).unwrap();
///
/// assert_eq!(problem.depot(), 0);
/// assert_eq!(problem.customers(), &[2]);
/// assert_eq!(problem.chargers(), &[1]);
/// assert!((problem.distance(0, 2) - 5.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct ProblemDefinition {
    nodes: Vec<Node>,
    customers: Vec<usize>,
    chargers: Vec<usize>,
    depot: usize,
    params: VehicleParameters,
}

impl ProblemDefinition {
    /// Builds a problem instance from a node list and vehicle parameters.
    ///
    /// Node indices must be contiguous (node `i` at position `i`) and exactly
    /// one depot must be present, at index 0.
    pub fn new(nodes: Vec<Node>, params: VehicleParameters) -> Result<Self, ProblemError> {
        for (position, node) in nodes.iter().enumerate() {
            if node.index() != position {
                return Err(ProblemError::NonContiguousIndex {
                    position,
                    index: node.index(),
                });
            }
        }

        let mut depot = None;
        let mut customers = Vec::new();
        let mut chargers = Vec::new();
        for node in &nodes {
            match node.node_type() {
                NodeType::Depot => {
                    if depot.is_some() {
                        return Err(ProblemError::MultipleDepots);
                    }
                    depot = Some(node.index());
                }
                NodeType::Charger => chargers.push(node.index()),
                NodeType::Customer => customers.push(node.index()),
            }
        }

        let depot = depot.ok_or(ProblemError::MissingDepot)?;
        if depot != 0 {
            return Err(ProblemError::DepotNotFirst(depot));
        }

        Ok(Self {
            nodes,
            customers,
            chargers,
            depot,
            params,
        })
    }

    /// The depot node index (always 0).
    pub fn depot(&self) -> usize {
        self.depot
    }

    /// All nodes, ordered by index.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Customer node indices, in instance order.
    pub fn customers(&self) -> &[usize] {
        &self.customers
    }

    /// Charging station indices, in instance order.
    pub fn chargers(&self) -> &[usize] {
        &self.chargers
    }

    /// Looks up a node by index.
    pub fn node(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    /// The vehicle parameter set for this instance.
    pub fn vehicle_parameters(&self) -> VehicleParameters {
        self.params
    }

    /// Euclidean distance between two nodes.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn distance(&self, from: usize, to: usize) -> f64 {
        self.nodes[from].distance_to(&self.nodes[to])
    }

    /// Battery energy spent traveling between two nodes
    /// (distance scaled by the consumption rate).
    pub fn battery_cost(&self, from: usize, to: usize) -> f64 {
        self.distance(from, to) * self.params.consumption_rate()
    }

    /// The charging station nearest to the given node, excluding the node
    /// itself. Ties break toward the first charger in instance order.
    ///
    /// Returns `None` when the instance has no charger other than `index`.
    pub fn nearest_charger_to(&self, index: usize) -> Option<usize> {
        let mut closest: Option<(usize, f64)> = None;
        for &charger in &self.chargers {
            if charger == index {
                continue;
            }
            let d = self.distance(index, charger);
            match closest {
                Some((_, best)) if d >= best => {}
                _ => closest = Some((charger, d)),
            }
        }
        closest.map(|(charger, _)| charger)
    }

    /// A uniformly random permutation of the customer indices.
    ///
    /// This is the candidate-tour generator used by stochastic search
    /// drivers.
    pub fn random_tour<R: Rng>(&self, rng: &mut R) -> Vec<usize> {
        let mut tour = self.customers.clone();
        tour.shuffle(rng);
        tour
    }
}
