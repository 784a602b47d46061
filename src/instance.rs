//! Problem data for the hub location problem and its text loader.

use crate::error::{HubError, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufRead};
use std::path::Path;
use std::str::FromStr;

/// Largest node count accepted from an instance file.
pub const MAX_INSTANCE_SIZE: usize = 100_000;

/// A hub location instance.
///
/// Fields are private: once built an instance is read-only and can be shared
/// between search workers behind an `Arc` without locking.
#[derive(Debug, Clone, Serialize)]
pub struct Instance {
    name: String,
    size: usize,
    scale_factor: f64,
    installation_cost: Vec<f64>,
    distance: Vec<Vec<f64>>,
    flow: Vec<Vec<f64>>,
}

impl Instance {
    /// Create an instance, checking that every structure matches `size`.
    pub fn new(
        size: usize,
        scale_factor: f64,
        installation_cost: Vec<f64>,
        distance: Vec<Vec<f64>>,
        flow: Vec<Vec<f64>>,
    ) -> Result<Self> {
        if size == 0 {
            return Err(HubError::InvalidInstance(
                "instance must contain at least one node".to_string(),
            ));
        }
        check_value("scale factor", scale_factor)?;

        check_len("installation costs", size, installation_cost.len())?;
        check_matrix("distance matrix", size, &distance)?;
        check_matrix("flow matrix", size, &flow)?;

        for &cost in &installation_cost {
            check_value("installation cost", cost)?;
        }
        for (what, matrix) in [("distance", &distance), ("flow", &flow)] {
            for &value in matrix.iter().flatten() {
                check_value(what, value)?;
            }
        }

        Ok(Instance {
            name: String::from("instance"),
            size,
            scale_factor,
            installation_cost,
            distance,
            flow,
        })
    }

    /// Attach a label used in reports.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of candidate nodes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Discount applied to hub-to-hub distances.
    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    pub fn installation_cost(&self, node: usize) -> f64 {
        self.installation_cost[node]
    }

    pub fn installation_costs(&self) -> &[f64] {
        &self.installation_cost
    }

    pub fn distance(&self, from: usize, to: usize) -> f64 {
        self.distance[from][to]
    }

    pub fn flow(&self, from: usize, to: usize) -> f64 {
        self.flow[from][to]
    }

    /// Total flow leaving `node`.
    pub fn outgoing_flow(&self, node: usize) -> f64 {
        self.flow[node].iter().sum()
    }

    /// Total flow arriving at `node`.
    pub fn incoming_flow(&self, node: usize) -> f64 {
        self.flow.iter().map(|row| row[node]).sum()
    }

    /// Load an instance from a file. The file stem becomes the instance name.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let instance = Self::from_reader(io::BufReader::new(file))?;

        Ok(match path.file_stem().and_then(|s| s.to_str()) {
            Some(stem) => instance.with_name(stem),
            None => instance,
        })
    }

    /// Parse an instance from any buffered reader.
    ///
    /// Layout: size, scale factor, one installation cost per line, then the
    /// distance and flow matrices one row per line. Blank lines are ignored.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut lines = NumberLines::new(reader);

        let size_value = lines.next_values()?[0];
        if !size_value.is_finite() || size_value < 1.0 || size_value.fract() != 0.0 {
            return Err(HubError::InvalidInstance(format!(
                "size must be a positive integer, got {}",
                size_value
            )));
        }
        if size_value > MAX_INSTANCE_SIZE as f64 {
            return Err(HubError::InvalidInstance(format!(
                "size {} exceeds the limit of {} nodes",
                size_value, MAX_INSTANCE_SIZE
            )));
        }
        let size = size_value as usize;

        let scale_factor = lines.next_values()?[0];

        let mut installation_cost = Vec::new();
        for _ in 0..size {
            installation_cost.push(lines.next_values()?[0]);
        }

        let distance = lines.next_matrix("distance matrix", size)?;
        let flow = lines.next_matrix("flow matrix", size)?;

        Instance::new(size, scale_factor, installation_cost, distance, flow)
    }
}

impl FromStr for Instance {
    type Err = HubError;

    fn from_str(s: &str) -> Result<Self> {
        Instance::from_reader(s.as_bytes())
    }
}

fn check_len(what: &'static str, expected: usize, found: usize) -> Result<()> {
    if expected != found {
        return Err(HubError::DimensionMismatch {
            what,
            expected,
            found,
        });
    }
    Ok(())
}

/// Instance data must be finite and non-negative.
fn check_value(what: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(HubError::InvalidInstance(format!(
            "{} must be finite and non-negative, got {}",
            what, value
        )));
    }
    Ok(())
}

fn check_matrix(what: &'static str, size: usize, matrix: &[Vec<f64>]) -> Result<()> {
    check_len(what, size, matrix.len())?;
    for row in matrix {
        check_len(what, size, row.len())?;
    }
    Ok(())
}

/// Iterator over the non-blank lines of an instance file, parsed as numbers.
struct NumberLines<R> {
    lines: io::Lines<R>,
    line_number: usize,
}

impl<R: BufRead> NumberLines<R> {
    fn new(reader: R) -> Self {
        NumberLines {
            lines: reader.lines(),
            line_number: 0,
        }
    }

    /// Return the values of the next line holding at least one number.
    fn next_values(&mut self) -> Result<Vec<f64>> {
        loop {
            let line = match self.lines.next() {
                Some(line) => line?,
                None => return Err(HubError::UnexpectedEof),
            };
            self.line_number += 1;

            let values = line
                .split_whitespace()
                .map(|token| {
                    token.parse::<f64>().map_err(|_| HubError::Parse {
                        line: self.line_number,
                        token: token.to_string(),
                    })
                })
                .collect::<Result<Vec<f64>>>()?;

            if !values.is_empty() {
                return Ok(values);
            }
        }
    }

    fn next_matrix(&mut self, what: &'static str, size: usize) -> Result<Vec<Vec<f64>>> {
        let mut matrix = Vec::new();
        for _ in 0..size {
            let row = self.next_values()?;
            check_len(what, size, row.len())?;
            matrix.push(row);
        }
        Ok(matrix)
    }
}
