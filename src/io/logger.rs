//! Run result logging.
//!
//! Each completed search appends one flat record to a shared log, so runs
//! across problem instances and drivers can be compared in a spreadsheet.
//! The record layout is comma separated:
//!
//! ```text
//! distance,problem,algorithm,seconds,tour,hyperparameters
//! ```
//!
//! with the tour space separated and the hyperparameters `|` separated.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

use tracing::info;

/// One finished search run, ready to be logged.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationResult {
    /// True simulated distance of the best tour.
    pub distance: f64,
    /// Name of the problem instance, usually the dataset filename.
    pub problem: String,
    /// Name of the search driver that produced the tour.
    pub algorithm: String,
    /// Wall-clock search duration in seconds.
    pub execution_time: f64,
    /// The best desired tour found.
    pub tour: Vec<usize>,
    /// Driver settings as `key:value` strings.
    pub hyperparameters: Vec<String>,
}

/// Appends run records to a shared writer.
///
/// The writer sits behind a mutex so one logger can be shared by solver
/// threads working through a batch of instances; records never interleave.
#[derive(Debug)]
pub struct RunLogger<W: Write> {
    writer: Mutex<W>,
}

impl RunLogger<std::fs::File> {
    /// Opens a logger appending to the given file, creating it if needed.
    pub fn append_to<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::new(file))
    }
}

impl<W: Write> RunLogger<W> {
    /// Wraps an arbitrary writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Appends one record and flushes.
    pub fn record(&self, result: &OptimizationResult) -> io::Result<()> {
        let tour = result
            .tour
            .iter()
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        let hyperparameters = result.hyperparameters.join("|");

        // Held across write and flush so concurrent records never shear.
        let mut writer = self.writer.lock().unwrap_or_else(|e| e.into_inner());
        writeln!(
            writer,
            "{},{},{},{},{},{}",
            result.distance,
            result.problem,
            result.algorithm,
            result.execution_time,
            tour,
            hyperparameters
        )?;
        writer.flush()?;

        info!(
            problem = %result.problem,
            algorithm = %result.algorithm,
            distance = result.distance,
            "run recorded"
        );
        Ok(())
    }

    /// Consumes the logger, returning the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner().unwrap_or_else(|e| e.into_inner())
    }
}
