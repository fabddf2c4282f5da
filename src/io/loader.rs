//! Instance file loading.
//!
//! The dataset format mixes two kinds of lines:
//!
//! - node rows: `ID type x y demand`, where `type` is `d` (depot),
//!   `f` (charging station) or `c` (customer). Node indices are assigned in
//!   file order, so the depot row must come first.
//! - vehicle parameter lines: the first character names the parameter
//!   (`Q` battery capacity, `C` load capacity, `r` consumption rate) and the
//!   value sits between slashes, e.g. `Q Vehicle fuel tank capacity /77.75/`.
//!
//! Trailing per-node columns (ready time, due date, service time) are
//! accepted and ignored.

use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::models::{Node, NodeType, ProblemDefinition, ProblemError, VehicleParameters};

/// Errors raised while loading an instance file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read instance file")]
    Io(#[from] std::io::Error),
    /// A line is neither a node row nor a parameter line.
    #[error("malformed line {line}: {text:?}")]
    MalformedLine {
        /// 1-based line number.
        line: usize,
        /// The offending line.
        text: String,
    },
    /// A node row carries an unknown type character.
    #[error("unknown node type {0:?} on line {1}")]
    UnknownNodeType(char, usize),
    /// A required vehicle parameter never appeared.
    #[error("missing vehicle parameter {0:?}")]
    MissingParameter(char),
    /// The node set fails problem validation.
    #[error(transparent)]
    Problem(#[from] ProblemError),
}

/// Reads and parses an instance file from disk.
pub fn load_instance<P: AsRef<Path>>(path: P) -> Result<ProblemDefinition, LoadError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let problem = parse_instance(&text)?;
    info!(
        path = %path.display(),
        customers = problem.customers().len(),
        chargers = problem.chargers().len(),
        "instance loaded"
    );
    Ok(problem)
}

/// Parses instance text into a validated [`ProblemDefinition`].
///
/// # Examples
///
/// ```
/// use ev_routing::io::parse_instance;
///
/// let text = "\
/// D0 d 0.0 0.0 0
/// S0 f 0.0 0.0 0
/// C1 c 3.0 4.0 10
/// Q Vehicle fuel tank capacity /100.0/
/// C Vehicle load capacity /50/
/// r fuel consumption rate /1.0/
/// ";
/// let problem = parse_instance(text).unwrap();
/// assert_eq!(problem.customers(), &[2]);
/// assert_eq!(problem.vehicle_parameters().load_capacity(), 50);
/// ```
pub fn parse_instance(text: &str) -> Result<ProblemDefinition, LoadError> {
    let mut nodes = Vec::new();
    let mut battery_capacity = None;
    let mut load_capacity = None;
    let mut consumption_rate = None;

    for (number, line) in text.lines().enumerate() {
        let number = number + 1;
        if line.trim().is_empty() {
            continue;
        }

        if let Some(node) = parse_node_row(line, nodes.len()) {
            match node {
                Ok(node) => nodes.push(node),
                Err(kind) => return Err(LoadError::UnknownNodeType(kind, number)),
            }
            continue;
        }

        let Some((key, value)) = parse_parameter_line(line) else {
            return Err(LoadError::MalformedLine {
                line: number,
                text: line.to_string(),
            });
        };
        match key {
            'Q' => battery_capacity = Some(value),
            'C' => load_capacity = Some(value as i32),
            'r' => consumption_rate = Some(value),
            // Inverse refueling rate and average velocity are present in
            // the datasets but unused by the simulator.
            _ => {}
        }
    }

    let params = VehicleParameters::new(
        load_capacity.ok_or(LoadError::MissingParameter('C'))?,
        battery_capacity.ok_or(LoadError::MissingParameter('Q'))?,
        consumption_rate.ok_or(LoadError::MissingParameter('r'))?,
    );

    Ok(ProblemDefinition::new(nodes, params)?)
}

/// Attempts to read `ID type x y demand` from a line. `None` means the line
/// is not a node row; `Err` carries an unrecognized type character.
fn parse_node_row(line: &str, index: usize) -> Option<Result<Node, char>> {
    let mut fields = line.split_whitespace();
    let _id = fields.next()?;
    let type_field = fields.next()?;
    let x: f64 = fields.next()?.parse().ok()?;
    let y: f64 = fields.next()?.parse().ok()?;
    let demand: i32 = fields.next()?.parse().ok()?;

    let mut chars = type_field.chars();
    let type_char = chars.next()?;
    if chars.next().is_some() {
        return None;
    }

    let node_type = match type_char {
        'd' => NodeType::Depot,
        'f' => NodeType::Charger,
        'c' => NodeType::Customer,
        other => return Some(Err(other)),
    };
    Some(Ok(Node::new(index, x, y, demand, node_type)))
}

/// Reads a `K description /value/` parameter line.
fn parse_parameter_line(line: &str) -> Option<(char, f64)> {
    let key = line.chars().next()?;
    let mut segments: Vec<&str> = line.split('/').collect();
    if segments.len() < 3 {
        return None;
    }
    segments.pop();
    let value: f64 = segments.pop()?.trim().parse().ok()?;
    Some((key, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
D0 d 0.0 0.0 0
S0 f 0.0 0.0 0
S1 f 10.0 0.0 0
C1 c 3.0 4.0 10
C2 c 6.0 8.0 20
Q Vehicle fuel tank capacity /77.75/
C Vehicle load capacity /200/
r fuel consumption rate /1.0/
g inverse refueling rate /3.39/
v average Velocity /1.0/
";

    #[test]
    fn test_parse_sample_instance() {
        let problem = parse_instance(SAMPLE).expect("valid");
        assert_eq!(problem.nodes().len(), 5);
        assert_eq!(problem.depot(), 0);
        assert_eq!(problem.chargers(), &[1, 2]);
        assert_eq!(problem.customers(), &[3, 4]);

        let params = problem.vehicle_parameters();
        assert!((params.battery_capacity() - 77.75).abs() < 1e-10);
        assert_eq!(params.load_capacity(), 200);
        assert!((params.consumption_rate() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_node_demands_preserved() {
        let problem = parse_instance(SAMPLE).expect("valid");
        assert_eq!(problem.nodes()[3].demand(), 10);
        assert_eq!(problem.nodes()[4].demand(), 20);
    }

    #[test]
    fn test_extra_node_columns_ignored() {
        let text = "\
D0 d 0.0 0.0 0 0 1000 0
C1 c 1.0 0.0 5 0 1000 30
S0 f 0.0 0.0 0 0 1000 0
Q q /10.0/
C c /10/
r r /1.0/
";
        // The depot must still come first; charger and customer order is
        // free.
        let problem = parse_instance(text).expect("valid");
        assert_eq!(problem.customers(), &[1]);
        assert_eq!(problem.chargers(), &[2]);
    }

    #[test]
    fn test_missing_parameter() {
        let text = "\
D0 d 0.0 0.0 0
S0 f 0.0 0.0 0
C1 c 1.0 0.0 5
Q q /10.0/
C c /10/
";
        let err = parse_instance(text).expect_err("no consumption rate");
        assert!(matches!(err, LoadError::MissingParameter('r')));
    }

    #[test]
    fn test_unknown_node_type() {
        let text = "D0 z 0.0 0.0 0\n";
        let err = parse_instance(text).expect_err("bad type");
        assert!(matches!(err, LoadError::UnknownNodeType('z', 1)));
    }

    #[test]
    fn test_malformed_line() {
        let text = "what is this line\n";
        let err = parse_instance(text).expect_err("garbage");
        assert!(matches!(err, LoadError::MalformedLine { line: 1, .. }));
    }

    #[test]
    fn test_validation_errors_propagate() {
        // No depot row at all.
        let text = "\
S0 f 0.0 0.0 0
C1 c 1.0 0.0 5
Q q /10.0/
C c /10/
r r /1.0/
";
        let err = parse_instance(text).expect_err("no depot");
        assert!(matches!(err, LoadError::Problem(ProblemError::MissingDepot)));
    }

    #[test]
    fn test_blank_lines_skipped() {
        let text = "\
D0 d 0.0 0.0 0

S0 f 0.0 0.0 0
C1 c 1.0 0.0 5

Q q /10.0/
C c /10/
r r /1.0/
";
        assert!(parse_instance(text).is_ok());
    }
}
