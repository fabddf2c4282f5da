//! Graph node types.

use serde::{Deserialize, Serialize};

/// The role a node plays in the EVRP graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeType {
    /// The single depot. Index 0 by convention.
    Depot,
    /// A charging station. Demand is always zero.
    Charger,
    /// A customer with positive demand.
    Customer,
}

/// A node in the EVRP graph: the depot, a charging station, or a customer.
///
/// Nodes are immutable once loaded. Equality is by `index` only, so two nodes
/// at the same coordinates (e.g. the depot and its co-located charger) remain
/// distinct.
///
/// # Examples
///
/// ```
/// use ev_routing::models::{Node, NodeType};
///
/// let depot = Node::depot(35.0, 35.0);
/// assert_eq!(depot.index(), 0);
/// assert_eq!(depot.demand(), 0);
///
/// let c = Node::customer(3, 41.0, 49.0, 10);
/// assert_eq!(c.demand(), 10);
/// assert!(!c.is_charger());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    index: usize,
    x: f64,
    y: f64,
    demand: i32,
    node_type: NodeType,
    is_charger: bool,
}

impl Node {
    /// Creates a node with an explicit type and charger flag.
    pub fn new(index: usize, x: f64, y: f64, demand: i32, node_type: NodeType) -> Self {
        Self {
            index,
            x,
            y,
            demand,
            node_type,
            is_charger: node_type == NodeType::Charger,
        }
    }

    /// Creates the depot at the given coordinates (index 0, demand 0).
    pub fn depot(x: f64, y: f64) -> Self {
        Self::new(0, x, y, 0, NodeType::Depot)
    }

    /// Creates a charging station (demand 0).
    pub fn charger(index: usize, x: f64, y: f64) -> Self {
        Self::new(index, x, y, 0, NodeType::Charger)
    }

    /// Creates a customer node.
    pub fn customer(index: usize, x: f64, y: f64, demand: i32) -> Self {
        Self::new(index, x, y, demand, NodeType::Customer)
    }

    /// Stable node index (0 = depot).
    pub fn index(&self) -> usize {
        self.index
    }

    /// X-coordinate.
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Y-coordinate.
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Demand at this node. Zero for the depot and chargers.
    pub fn demand(&self) -> i32 {
        self.demand
    }

    /// The node's role in the graph.
    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    /// Whether the vehicle can recharge here.
    pub fn is_charger(&self) -> bool {
        self.is_charger
    }

    /// Euclidean distance to another node.
    pub fn distance_to(&self, other: &Node) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Eq for Node {}
