//! Human/CSV result summaries and the per-instance route detail dump.

use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::Path;

use crate::error::{Result, SolverError};
use crate::model::{Problem, Solution};

/// One row of the best-solution summary for a single instance.
#[derive(Debug, Clone)]
pub struct SummaryRow {
    pub name: String,
    pub trucks: usize,
    pub workers: usize,
    pub distance: f64,
    pub cost: f64,
    pub elapsed_secs: f64,
    pub saturation_secs: Option<f64>,
}

impl SummaryRow {
    pub fn from_solution(problem: &Problem, solution: &Solution, elapsed_secs: f64, saturation_secs: Option<f64>) -> Self {
        Self {
            name: problem.name.clone(),
            trucks: solution.trucks(),
            workers: solution.workers(),
            distance: solution.distance(),
            cost: solution.cost(),
            elapsed_secs,
            saturation_secs,
        }
    }
}

pub fn render_human(row: &SummaryRow) -> String {
    let saturation = row
        .saturation_secs
        .map(|s| format!("{s:.2}s"))
        .unwrap_or_else(|| "n/a".to_string());
    format!(
        "{name}: trucks={trucks} workers={workers} distance={distance:.2} cost={cost:.2} elapsed={elapsed:.2}s saturation={saturation}",
        name = row.name,
        trucks = row.trucks,
        workers = row.workers,
        distance = row.distance,
        cost = row.cost,
        elapsed = row.elapsed_secs,
    )
}

/// Appends one CSV row (name, trucks, workers, distance, cost, elapsed,
/// saturation-time) to `writer`.
pub fn write_csv_row<W: std::io::Write>(writer: &mut csv::Writer<W>, row: &SummaryRow) -> Result<()> {
    writer
        .write_record([
            row.name.clone(),
            row.trucks.to_string(),
            row.workers.to_string(),
            format!("{:.4}", row.distance),
            format!("{:.4}", row.cost),
            format!("{:.4}", row.elapsed_secs),
            row.saturation_secs.map(|s| format!("{s:.4}")).unwrap_or_default(),
        ])
        .map_err(|e| SolverError::Internal(e.to_string()))?;
    writer.flush().map_err(|source| SolverError::Io {
        path: "<csv output>".to_string(),
        source,
    })
}

/// Appends a per-route dump (worker count, load, node sequence with
/// `aest`/`alst` at each stop) for `solution` to the details file at
/// `path`, creating it if necessary.
pub fn append_detail_dump(path: &Path, problem: &Problem, solution: &Solution) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| SolverError::Io {
            path: path.display().to_string(),
            source,
        })?;

    let io_err = |source: std::io::Error| SolverError::Io {
        path: path.display().to_string(),
        source,
    };

    writeln!(file, "instance={}", problem.name).map_err(io_err)?;
    for route in solution.routes() {
        write!(file, "route {} workers={} load={} sequence=", route.id(), route.workers(), route.load()).map_err(io_err)?;
        for idx in route.iter_interior() {
            let rec = route.record(idx);
            write!(file, "{}(aest={:.2},alst={:.2}) ", rec.id, rec.aest, rec.alst).map_err(io_err)?;
        }
        writeln!(file).map_err(io_err)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> SummaryRow {
        SummaryRow {
            name: "R101_25".to_string(),
            trucks: 4,
            workers: 9,
            distance: 123.456,
            cost: 4_009_123.456,
            elapsed_secs: 1.2345,
            saturation_secs: Some(0.5),
        }
    }

    #[test]
    fn test_render_human_contains_key_fields() {
        let text = render_human(&sample_row());
        assert!(text.contains("R101_25"));
        assert!(text.contains("trucks=4"));
        assert!(text.contains("workers=9"));
    }

    #[test]
    fn test_render_human_no_saturation() {
        let mut row = sample_row();
        row.saturation_secs = None;
        let text = render_human(&row);
        assert!(text.contains("saturation=n/a"));
    }

    #[test]
    fn test_write_csv_row_round_trips_fields() {
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(Vec::new());
        write_csv_row(&mut writer, &sample_row()).expect("writes");
        let bytes = writer.into_inner().expect("no pending data");
        let text = String::from_utf8(bytes).expect("utf8");
        assert!(text.starts_with("R101_25,4,9,"));
    }
}
