//! Seed URL lists: plain one-per-line files or comma separated tables.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("failed to read seed file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed seed table: {0}")]
    Csv(#[from] csv::Error),

    #[error("no seed urls found")]
    Empty,
}

/// Prefix `http://` when `raw` carries no scheme.
pub fn normalize_seed(raw: &str) -> String {
    let raw = raw.trim();
    let lower = raw.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        raw.to_string()
    } else {
        format!("http://{}", raw)
    }
}

/// Extract seed URLs from `input`.
///
/// A first line containing a comma marks a table with a header row; the
/// column whose name mentions `url` or `domain` is used, or the first column
/// if none does. Otherwise every line is a seed, and a lone `url` or
/// `domain` header is skipped. Blank cells and repeats are dropped, order is
/// kept.
pub fn parse_seeds(input: &str) -> Result<Vec<String>, SeedError> {
    let mut lines = input.lines().map(str::trim).filter(|line| !line.is_empty()).peekable();

    let first = lines.peek().copied();
    let cells: Vec<String> = match first {
        Some(header) if header.contains(',') => read_table(input)?,
        Some(first) if is_url_header(first) && !first.contains('.') => {
            lines.skip(1).map(str::to_string).collect()
        }
        _ => lines.map(str::to_string).collect(),
    };

    let mut seen = HashSet::new();
    let seeds: Vec<String> = cells
        .iter()
        .filter(|cell| !cell.is_empty())
        .map(|cell| normalize_seed(cell))
        .filter(|seed| seen.insert(seed.clone()))
        .collect();

    if seeds.is_empty() {
        return Err(SeedError::Empty);
    }
    Ok(seeds)
}

pub async fn load_seeds(path: impl AsRef<Path>) -> Result<Vec<String>, SeedError> {
    let path = path.as_ref();
    let input = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SeedError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    parse_seeds(&input)
}

fn read_table(input: &str) -> Result<Vec<String>, SeedError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input.trim_start().as_bytes());

    let column = reader
        .headers()?
        .iter()
        .position(is_url_header)
        .unwrap_or(0);
    debug!("Reading seed table column {}", column);

    let mut cells = Vec::new();
    for record in reader.records() {
        if let Some(cell) = record?.get(column) {
            cells.push(cell.to_string());
        }
    }
    Ok(cells)
}

fn is_url_header(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    name.contains("url") || name.contains("domain")
}
