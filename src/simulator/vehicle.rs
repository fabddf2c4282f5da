//! The route feasibility simulator.
//!
//! A desired tour only names customer nodes; whether the vehicle must stop
//! at the depot to restock or at a charger to refill is not known until the
//! drive is simulated hop by hop. [`Vehicle::drive`] performs that
//! simulation, inserting depot and charger visits where the load and battery
//! constraints demand them, and returns the concrete route together with its
//! true traveled distance.
//!
//! The simulator is the fitness function every search driver calls, so it is
//! deliberately allocation-light and never performs I/O. It is stateless
//! across calls: battery and load are reset on entry, making the result a
//! pure function of the problem definition and the desired tour.

use thiserror::Error;
use tracing::{debug, trace};

use crate::models::{NodeType, ProblemDefinition};

use super::relay::{can_reach_safely, relay_route, RelayResult};

/// Finite sentinel added to the distance of an infeasible route.
///
/// Kept finite so infeasible tours still order totally against feasible
/// ones; callers that need hard feasibility compare against this threshold.
pub const IMPOSSIBLE_ROUTE_PENALTY: f64 = 1_000_000_000.0;

/// Errors raised by [`Vehicle::evaluate`] when the supplied tour is not a
/// permutation of the problem's customer set.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TourError {
    /// The tour references an index outside the node set.
    #[error("tour references unknown node index {0}")]
    UnknownNode(usize),
    /// The tour references a depot or charger node.
    #[error("tour references node {0}, which is not a customer")]
    NotACustomer(usize),
    /// A customer appears more than once.
    #[error("customer {0} appears more than once in the tour")]
    DuplicateCustomer(usize),
    /// A customer is missing from the tour.
    #[error("customer {0} is missing from the tour")]
    MissingCustomer(usize),
}

/// The concrete result of simulating a desired tour.
#[derive(Debug, Clone)]
pub struct DriveOutcome {
    /// The physically driven route, including inserted depot and charger
    /// visits. Starts at the depot; ends there too when feasible.
    pub padded_route: Vec<usize>,
    /// Sum of Euclidean hop lengths actually traveled. Carries
    /// [`IMPOSSIBLE_ROUTE_PENALTY`] when infeasible.
    pub distance: f64,
    /// Whether a physically valid route exists.
    pub feasible: bool,
}

/// Simulates driving desired tours against one problem instance.
///
/// Each instance owns its own battery and load state, so concurrent
/// evaluation takes one `Vehicle` per worker over a shared
/// [`ProblemDefinition`]; the `&mut self` receivers enforce this at compile
/// time.
///
/// # Examples
///
/// ```
/// use ev_routing::models::{Node, ProblemDefinition, VehicleParameters};
/// use ev_routing::simulator::Vehicle;
///
/// let nodes = vec![
///     Node::depot(0.0, 0.0),
///     Node::charger(1, 0.0, 0.0),
///     Node::customer(2, 3.0, 4.0, 1),
/// ];
/// let params = VehicleParameters::new(10, 1000.0, 1.0);
/// let problem = ProblemDefinition::new(nodes, params).unwrap();
///
/// let mut vehicle = Vehicle::new(&problem);
/// let distance = vehicle.simulate_drive(&[2]);
/// assert!((distance - 10.0).abs() < 1e-9);
/// ```
#[derive(Debug)]
pub struct Vehicle<'a> {
    problem: &'a ProblemDefinition,
    battery: f64,
    load: i32,
}

impl<'a> Vehicle<'a> {
    /// Creates a simulator for the given problem instance.
    pub fn new(problem: &'a ProblemDefinition) -> Self {
        let params = problem.vehicle_parameters();
        Self {
            problem,
            battery: params.battery_capacity(),
            load: params.load_capacity(),
        }
    }

    /// Simulates the desired tour and returns its true distance.
    ///
    /// Infeasible tours return the accumulated distance plus
    /// [`IMPOSSIBLE_ROUTE_PENALTY`] rather than an error, so search drivers
    /// can rank them uniformly as "worst possible".
    pub fn simulate_drive(&mut self, desired: &[usize]) -> f64 {
        self.drive(desired).distance
    }

    /// Validates that `desired` is a permutation of the customer set, then
    /// simulates it.
    ///
    /// This is the search-driver boundary: malformed tours fail fast here
    /// instead of producing a silently wrong distance.
    pub fn evaluate(&mut self, desired: &[usize]) -> Result<f64, TourError> {
        self.validate_tour(desired)?;
        Ok(self.simulate_drive(desired))
    }

    /// Simulates the desired tour hop by hop.
    ///
    /// Battery and load are reset on entry, so two calls with the same tour
    /// return identical outcomes regardless of what ran before.
    pub fn drive(&mut self, desired: &[usize]) -> DriveOutcome {
        self.reset();

        let problem = self.problem;
        let params = problem.vehicle_parameters();
        let depot = problem.depot();

        let mut padded = vec![depot];
        let mut distance = 0.0;
        let mut current = depot;

        // A demand exceeding a full load can never be serviced; without this
        // check the loop below would shuttle to the depot forever.
        for &index in desired {
            let demand = match problem.node(index) {
                Some(node) => node.demand(),
                None => {
                    debug!(index, "desired tour references an unknown node");
                    return infeasible(padded, distance);
                }
            };
            if demand > params.load_capacity() {
                debug!(
                    customer = index,
                    demand,
                    capacity = params.load_capacity(),
                    "demand exceeds maximum load capacity"
                );
                return infeasible(padded, distance);
            }
        }

        let mut serviced = 0;
        while serviced < desired.len() {
            let target = desired[serviced];
            let demand = problem.nodes()[target].demand();

            if demand > self.load {
                // Restock first. The depot co-locates a charger, so arrival
                // also refills the battery.
                match relay_route(problem, current, depot, self.battery) {
                    RelayResult::Impossible => {
                        debug!(current, "stranded while routing to the depot");
                        return infeasible(padded, distance);
                    }
                    RelayResult::Direct(path) | RelayResult::ViaChargers(path) => {
                        self.traverse(&path, &mut padded, &mut distance);
                    }
                }
                current = depot;
                self.load = params.load_capacity();
                self.battery = params.battery_capacity();
            } else if !can_reach_safely(problem, current, target, self.battery) {
                // Detour to the charger nearest the current position and
                // retry the same target next iteration.
                let Some(charger) = problem.nearest_charger_to(current) else {
                    debug!(current, "no charger reachable from current position");
                    return infeasible(padded, distance);
                };
                if problem.battery_cost(current, charger) > self.battery {
                    debug!(current, charger, "stranded short of the nearest charger");
                    return infeasible(padded, distance);
                }
                self.hop(current, charger, &mut padded, &mut distance);
                current = charger;
            } else {
                self.hop(current, target, &mut padded, &mut distance);
                self.load -= demand;
                current = target;
                serviced += 1;
            }

            debug_assert!(self.battery >= -1e-9, "battery went negative");
            debug_assert!(self.load >= 0, "load went negative");

            if oscillating(&padded) {
                debug!(?padded, "oscillating between two nodes, declaring impossible");
                return infeasible(padded, distance);
            }
        }

        // Return leg, with the same safe/unsafe logic.
        match relay_route(problem, current, depot, self.battery) {
            RelayResult::Impossible => {
                debug!(current, "stranded on the return leg to the depot");
                infeasible(padded, distance)
            }
            RelayResult::Direct(path) | RelayResult::ViaChargers(path) => {
                self.traverse(&path, &mut padded, &mut distance);
                DriveOutcome {
                    padded_route: padded,
                    distance,
                    feasible: true,
                }
            }
        }
    }

    fn reset(&mut self) {
        let params = self.problem.vehicle_parameters();
        self.battery = params.battery_capacity();
        self.load = params.load_capacity();
    }

    /// Moves one hop, discharging the battery and recharging when the
    /// destination is a charging station.
    fn hop(&mut self, from: usize, to: usize, padded: &mut Vec<usize>, distance: &mut f64) {
        self.battery -= self.problem.battery_cost(from, to);
        *distance += self.problem.distance(from, to);
        padded.push(to);
        trace!(from, to, battery = self.battery, "hop");
        if self.problem.nodes()[to].is_charger() {
            self.battery = self.problem.vehicle_parameters().battery_capacity();
        }
    }

    fn traverse(&mut self, path: &[usize], padded: &mut Vec<usize>, distance: &mut f64) {
        for pair in path.windows(2) {
            self.hop(pair[0], pair[1], padded, distance);
        }
    }

    fn validate_tour(&self, tour: &[usize]) -> Result<(), TourError> {
        let mut seen = vec![false; self.problem.nodes().len()];
        for &index in tour {
            let node = self
                .problem
                .node(index)
                .ok_or(TourError::UnknownNode(index))?;
            if node.node_type() != NodeType::Customer {
                return Err(TourError::NotACustomer(index));
            }
            if seen[index] {
                return Err(TourError::DuplicateCustomer(index));
            }
            seen[index] = true;
        }
        for &customer in self.problem.customers() {
            if !seen[customer] {
                return Err(TourError::MissingCustomer(customer));
            }
        }
        Ok(())
    }
}

fn infeasible(padded: Vec<usize>, distance: f64) -> DriveOutcome {
    DriveOutcome {
        padded_route: padded,
        distance: distance + IMPOSSIBLE_ROUTE_PENALTY,
        feasible: false,
    }
}

/// True when the last four concrete hops form an A-B-A-B cycle, which means
/// the vehicle can never safely leave a pair of chargers.
fn oscillating(padded: &[usize]) -> bool {
    let n = padded.len();
    if n < 4 {
        return false;
    }
    padded[n - 1] == padded[n - 3]
        && padded[n - 2] == padded[n - 4]
        && padded[n - 1] != padded[n - 2]
}
