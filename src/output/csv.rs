// CSV persistence of ranked matches.
//
// One file per run, named "<YYYYMMDD_HHMMSS>_<source folder>.csv" inside the
// output folder. Files are created exclusively: if a name is already taken a
// numeric suffix is added, so earlier results are never overwritten.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use tracing::info;

use crate::models::Match;

/// Column order of the result file.
pub const COLUMNS: [&str; 5] = ["similarity", "doc1", "sentence1", "doc2", "sentence2"];

/// Name of the result file for a run started at `timestamp` over `source_folder`.
pub fn output_file_name(timestamp: NaiveDateTime, source_folder: &Path) -> String {
    format!(
        "{}_{}.csv",
        timestamp.format("%Y%m%d_%H%M%S"),
        folder_label(source_folder)
    )
}

/// Basename of the source folder, resolving "." and ".." through the filesystem.
pub fn folder_label(folder: &Path) -> String {
    folder
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .or_else(|| {
            folder
                .canonicalize()
                .ok()
                .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        })
        .unwrap_or_else(|| "documents".to_string())
}

/// Write a header row and one row per match.
///
/// The header is written even when there are no matches.
pub fn write_matches<W: Write>(writer: W, matches: &[Match]) -> Result<()> {
    let mut csv_writer = ::csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer.write_record(COLUMNS)?;
    for m in matches {
        csv_writer.serialize(m)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Save ranked matches into `output_dir`, creating it if needed.
///
/// Returns the path of the written file.
pub fn save_matches(
    matches: &[Match],
    output_dir: &Path,
    source_folder: &Path,
    timestamp: NaiveDateTime,
) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir).with_context(|| {
        format!("Failed to create output directory: {}", output_dir.display())
    })?;

    let (file, path) = create_unique(output_dir, &output_file_name(timestamp, source_folder))?;
    write_matches(BufWriter::new(file), matches)
        .with_context(|| format!("Failed to write results to {}", path.display()))?;

    info!(path = %path.display(), rows = matches.len(), "Results saved");
    Ok(path)
}

/// Create `name` in `dir`, or `<stem>_1.csv`, `<stem>_2.csv`, ... if taken.
fn create_unique(dir: &Path, name: &str) -> Result<(File, PathBuf)> {
    let stem = name.strip_suffix(".csv").unwrap_or(name);

    for attempt in 0..1000 {
        let candidate = if attempt == 0 {
            dir.join(name)
        } else {
            dir.join(format!("{stem}_{attempt}.csv"))
        };

        match OpenOptions::new().write(true).create_new(true).open(&candidate) {
            Ok(file) => return Ok((file, candidate)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to create {}", candidate.display()))
            }
        }
    }

    anyhow::bail!("Could not find a free file name for {} in {}", name, dir.display())
}
