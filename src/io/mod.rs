use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter};
use std::path::{Path, PathBuf};

use crate::record::Record;

/// Resolve a glob pattern to the files it matches, sorted by path
pub fn resolve_inputs(pattern: &str) -> Result<Vec<PathBuf>> {
    let mut paths = glob::glob(pattern)
        .with_context(|| format!("Invalid input pattern: {}", pattern))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    paths.sort();

    if paths.is_empty() {
        anyhow::bail!("No input files match: {}", pattern);
    }
    Ok(paths)
}

/// Read records from JSON-lines files. Blank lines are skipped; a line that
/// is not a valid record is an error naming its file and line number.
pub fn read_records(paths: &[PathBuf]) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    for path in paths {
        let file =
            File::open(path).with_context(|| format!("Failed to open input: {:?}", path))?;
        for (line_idx, line) in BufReader::new(file).lines().enumerate() {
            let line = line.with_context(|| format!("Failed to read {:?}", path))?;
            if line.trim().is_empty() {
                continue;
            }
            let record: Record = serde_json::from_str(&line).with_context(|| {
                format!("Invalid record at {}:{}", path.display(), line_idx + 1)
            })?;
            records.push(record);
        }
    }
    Ok(records)
}

pub fn write_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<()> {
    // Create directory if it doesn't exist
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
    serde_json::to_writer_pretty(BufWriter::new(file), value)?;
    Ok(())
}
