//! Route simulation: the feasibility oracle every search driver scores
//! tours against.

mod relay;
mod vehicle;

pub use relay::{relay_route, RelayResult};
pub use vehicle::{DriveOutcome, TourError, Vehicle, IMPOSSIBLE_ROUTE_PENALTY};
