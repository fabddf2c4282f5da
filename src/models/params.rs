//! Vehicle parameter set.

use serde::{Deserialize, Serialize};

/// Problem-wide vehicle constants.
///
/// These describe the single vehicle type used for every simulation against a
/// problem instance; they are never mutated during a search.
///
/// # Examples
///
/// ```
/// use ev_routing::models::VehicleParameters;
///
/// let params = VehicleParameters::new(200, 100.0, 1.0);
/// assert_eq!(params.load_capacity(), 200);
/// assert!((params.battery_capacity() - 100.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleParameters {
    load_capacity: i32,
    battery_capacity: f64,
    consumption_rate: f64,
}

impl VehicleParameters {
    /// Creates a parameter set.
    pub fn new(load_capacity: i32, battery_capacity: f64, consumption_rate: f64) -> Self {
        Self {
            load_capacity,
            battery_capacity,
            consumption_rate,
        }
    }

    /// Units of demand the vehicle can carry before restocking at the depot.
    pub fn load_capacity(&self) -> i32 {
        self.load_capacity
    }

    /// Maximum battery energy.
    pub fn battery_capacity(&self) -> f64 {
        self.battery_capacity
    }

    /// Energy cost per unit of Euclidean distance.
    pub fn consumption_rate(&self) -> f64 {
        self.consumption_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_accessors() {
        let p = VehicleParameters::new(100, 75.5, 1.2);
        assert_eq!(p.load_capacity(), 100);
        assert_eq!(p.battery_capacity(), 75.5);
        assert_eq!(p.consumption_rate(), 1.2);
    }
}
