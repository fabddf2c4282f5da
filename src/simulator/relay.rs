//! Charger-relay pathfinding.
//!
//! When direct travel between two nodes is unsafe, the vehicle may hop
//! through charging stations, recharging to full at each stop. The search is
//! greedy: among the unvisited chargers within battery range it always picks
//! the one nearest the target, so it is not globally optimal, but it never
//! revisits a node and therefore terminates after at most
//! `chargers + 2` steps.
//!
//! Range is measured in battery cost (distance scaled by the consumption
//! rate), consistent with [`ProblemDefinition::battery_cost`] everywhere
//! else in the simulator.

use crate::models::ProblemDefinition;

/// Outcome of a relay search between two nodes.
///
/// Successful paths contain both endpoints, in travel order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayResult {
    /// The target is safely reachable with no intermediate stop.
    Direct(Vec<usize>),
    /// The target is reachable by recharging at one or more chargers.
    ViaChargers(Vec<usize>),
    /// No combination of in-range chargers reaches the target.
    Impossible,
}

impl RelayResult {
    /// The concrete hop sequence, or `None` for an impossible route.
    pub fn path(&self) -> Option<&[usize]> {
        match self {
            RelayResult::Direct(path) | RelayResult::ViaChargers(path) => Some(path),
            RelayResult::Impossible => None,
        }
    }
}

/// Two-hop safety lookahead: can the vehicle travel `from -> to` and still
/// escape from `to` to its nearest charger without running dry?
///
/// This is the core feasibility invariant of the simulator; checking only the
/// single hop would let the vehicle strand itself at a node with no way out.
pub(crate) fn can_reach_safely(
    problem: &ProblemDefinition,
    from: usize,
    to: usize,
    battery: f64,
) -> bool {
    let Some(charger) = problem.nearest_charger_to(to) else {
        return false;
    };
    battery > problem.battery_cost(from, to) + problem.battery_cost(to, charger)
}

/// Finds a safe hop sequence from `start` to `end`, relaying through
/// chargers when needed.
///
/// `battery` is the charge available when leaving `start`; arrival at each
/// intermediate charger refills it. An empty in-range set before reaching
/// `end` means the vehicle is stranded and yields
/// [`RelayResult::Impossible`].
pub fn relay_route(
    problem: &ProblemDefinition,
    start: usize,
    end: usize,
    battery: f64,
) -> RelayResult {
    let max_battery = problem.vehicle_parameters().battery_capacity();
    let mut battery = battery;
    let mut current = start;
    let mut path = vec![start];
    let mut visited = vec![start];

    loop {
        if can_reach_safely(problem, current, end, battery) {
            path.push(end);
            break;
        }

        // Unvisited chargers within range, keeping the one nearest the end.
        let mut next: Option<(usize, f64)> = None;
        for &charger in problem.chargers() {
            if visited.contains(&charger) {
                continue;
            }
            if problem.battery_cost(current, charger) > battery {
                continue;
            }
            let to_end = problem.distance(charger, end);
            match next {
                Some((_, best)) if to_end >= best => {}
                _ => next = Some((charger, to_end)),
            }
        }

        let Some((charger, _)) = next else {
            return RelayResult::Impossible;
        };

        battery = max_battery;
        visited.push(charger);
        path.push(charger);
        current = charger;
    }

    if path.len() == 2 {
        RelayResult::Direct(path)
    } else {
        RelayResult::ViaChargers(path)
    }
}
