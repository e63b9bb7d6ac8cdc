//! File I/O for curves, datasets, queries, and results (spec §6).

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::curve::Curve;
use crate::error::{Error, Result};
use crate::geometry::Point;

/// One curve per file: whitespace-separated `x y` pairs, one point per
/// line; trailing fields on a line are ignored; consecutive duplicate
/// points are dropped by `Curve::new`.
pub fn read_curve_file(path: &Path) -> Result<Curve> {
    let file = File::open(path).map_err(|e| Error::Io { path: path.to_path_buf(), source: e })?;
    let reader = BufReader::new(file);

    let mut points = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| Error::Io { path: path.to_path_buf(), source: e })?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let mut fields = trimmed.split_whitespace();
        let parse_err = || Error::Parse { path: path.to_path_buf(), line: line_no + 1, text: line.clone() };
        let x: f64 = fields.next().and_then(|s| s.parse().ok()).ok_or_else(parse_err)?;
        let y: f64 = fields.next().and_then(|s| s.parse().ok()).ok_or_else(parse_err)?;
        points.push(Point::new(x, y));
    }

    if points.is_empty() {
        return Err(Error::EmptyCurve { path: path.to_path_buf() });
    }

    let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    Ok(Curve::new(points, name))
}

/// A list of relative filenames, one per line, resolved against `dir`.
pub fn read_dataset_index(dir: &Path, index_file: &Path) -> Result<Vec<Curve>> {
    let file = File::open(index_file).map_err(|e| Error::Io { path: index_file.to_path_buf(), source: e })?;
    let reader = BufReader::new(file);

    let mut curves = Vec::new();
    for line in reader.lines() {
        let line = line.map_err(|e| Error::Io { path: index_file.to_path_buf(), source: e })?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        curves.push(read_curve_file(&dir.join(trimmed))?);
    }
    log::info!("loaded {} curves from {}", curves.len(), index_file.display());
    Ok(curves)
}

/// One line of a query file: either a range query (`<curve> <delta>`) or a
/// decider benchmark (`<curve1> <curve2> <delta>`).
#[derive(Debug, Clone)]
pub enum Query {
    Range { curve: PathBuf, delta: f64 },
    Decider { curve1: PathBuf, curve2: PathBuf, delta: f64 },
}

pub fn read_query_file(path: &Path) -> Result<Vec<Query>> {
    let file = File::open(path).map_err(|e| Error::Io { path: path.to_path_buf(), source: e })?;
    let reader = BufReader::new(file);

    let mut queries = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| Error::Io { path: path.to_path_buf(), source: e })?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        let malformed = || Error::MalformedQuery { path: path.to_path_buf(), line: line_no + 1 };
        let query = match fields.len() {
            2 => Query::Range {
                curve: PathBuf::from(fields[0]),
                delta: fields[1].parse().map_err(|_| malformed())?,
            },
            3 => Query::Decider {
                curve1: PathBuf::from(fields[0]),
                curve2: PathBuf::from(fields[1]),
                delta: fields[2].parse().map_err(|_| malformed())?,
            },
            _ => return Err(malformed()),
        };
        queries.push(query);
    }
    Ok(queries)
}

/// One line per query: whitespace-separated names of every matching curve.
pub fn write_results_file(path: &Path, results: &[Vec<String>]) -> Result<()> {
    let mut file = File::create(path).map_err(|e| Error::Io { path: path.to_path_buf(), source: e })?;
    for row in results {
        writeln!(file, "{}", row.join(" ")).map_err(|e| Error::Io { path: path.to_path_buf(), source: e })?;
    }
    Ok(())
}
