//! Instance loading and run-result logging.

mod loader;
mod logger;

pub use loader::{load_instance, parse_instance, LoadError};
pub use logger::{OptimizationResult, RunLogger};
