//! Solomon-format instance file parsing.
//!
//! Layout: 9 header lines (instance name, a blank line, `VEHICLE`, the
//! `NUMBER CAPACITY` column header, the truck count and capacity, a blank
//! line, `CUSTOMER`, a column header, a blank line), then one
//! whitespace-separated data row per node from line 10 onward: `id x y
//! demand est lst service_time`. Row 0 is the depot. The parser never
//! panics; every malformed line is reported with its 1-based line number.

use std::fs;
use std::path::Path;

use crate::error::{Result, SolverError};
use crate::model::Node;

/// A parsed instance: its name, nodes (index 0 is the depot), and vehicle
/// capacity.
#[derive(Debug, Clone)]
pub struct Instance {
    pub name: String,
    pub nodes: Vec<Node>,
    pub capacity: i32,
}

const HEADER_LINES: usize = 9;
const CAPACITY_LINE: usize = 5;

pub fn load_instance(path: &Path) -> Result<Instance> {
    let text = fs::read_to_string(path).map_err(|source| SolverError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_solomon(&path.display().to_string(), &text)
}

pub fn parse_solomon(path: &str, text: &str) -> Result<Instance> {
    let lines: Vec<&str> = text.lines().collect();
    if lines.len() < HEADER_LINES + 1 {
        return Err(parse_err(path, lines.len(), "instance shorter than the 9-line header plus one data row"));
    }

    let name = lines[0].trim();
    if name.is_empty() {
        return Err(parse_err(path, 1, "missing instance name"));
    }

    let mut capacity_fields = lines[CAPACITY_LINE - 1].split_whitespace();
    capacity_fields
        .next()
        .ok_or_else(|| parse_err(path, CAPACITY_LINE, "missing vehicle count"))?;
    let capacity: i32 = capacity_fields
        .next()
        .ok_or_else(|| parse_err(path, CAPACITY_LINE, "missing capacity"))?
        .parse()
        .map_err(|_| parse_err(path, CAPACITY_LINE, "capacity is not an integer"))?;

    let mut nodes = Vec::new();
    for (offset, line) in lines[HEADER_LINES..].iter().enumerate() {
        let line_no = HEADER_LINES + offset + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        nodes.push(parse_node_line(path, line_no, trimmed)?);
    }

    if nodes.is_empty() {
        return Err(parse_err(path, lines.len(), "no customer/depot rows found"));
    }

    Ok(Instance {
        name: name.to_string(),
        nodes,
        capacity,
    })
}

fn parse_node_line(path: &str, line_no: usize, line: &str) -> Result<Node> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() != 7 {
        return Err(parse_err(path, line_no, &format!("expected 7 fields, got {}", parts.len())));
    }
    let id: usize = parts[0].parse().map_err(|_| parse_err(path, line_no, "id is not an integer"))?;
    let x: f64 = parts[1].parse().map_err(|_| parse_err(path, line_no, "x is not a number"))?;
    let y: f64 = parts[2].parse().map_err(|_| parse_err(path, line_no, "y is not a number"))?;
    let demand: i32 = parts[3].parse().map_err(|_| parse_err(path, line_no, "demand is not an integer"))?;
    let est: f64 = parts[4].parse().map_err(|_| parse_err(path, line_no, "est is not a number"))?;
    let lst: f64 = parts[5].parse().map_err(|_| parse_err(path, line_no, "lst is not a number"))?;
    let service: f64 = parts[6].parse().map_err(|_| parse_err(path, line_no, "service time is not a number"))?;
    Ok(Node::new(id, x, y, demand, est, lst, service))
}

fn parse_err(path: &str, line: usize, message: &str) -> SolverError {
    SolverError::Parse {
        path: path.to_string(),
        line,
        message: message.to_string(),
    }
}
