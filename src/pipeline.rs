// Duplicate-check pipeline: corpus → pairwise comparison → ranking → CSV.
//
// The embedding model is loaded by the caller before this runs, so a bad
// model name or unreadable vector file fails the run before any document is
// read. Everything here is synchronous and single-threaded.

use std::path::{Path, PathBuf};

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::compare::{find_matches, CandidatePairs};
use crate::corpus::extract::TextExtractor;
use crate::corpus::loader::{load_corpus, LoadOptions};
use crate::embedding::traits::SentenceDistance;
use crate::models::Match;
use crate::output::csv::save_matches;
use crate::output::rank_matches;

/// Inputs of one duplicate check.
#[derive(Debug, Clone)]
pub struct CheckOptions {
    pub folder: PathBuf,
    /// Where to write the CSV; `None` keeps results in memory only
    pub output_dir: Option<PathBuf>,
    pub threshold: f64,
    pub load: LoadOptions,
    /// Print status lines and a progress bar while comparing
    pub show_progress: bool,
}

/// What a duplicate check found.
#[derive(Debug, Clone)]
pub struct CheckReport {
    pub documents: usize,
    pub sentences: usize,
    pub comparisons: usize,
    /// Ranked, most similar first
    pub matches: Vec<Match>,
    pub output_file: Option<PathBuf>,
}

/// Run the duplicate check over `options.folder`.
///
/// A missing or unreadable folder is not an error: it produces an empty
/// report. Failing to write the CSV is.
pub fn run(
    options: &CheckOptions,
    extractor: &dyn TextExtractor,
    metric: &dyn SentenceDistance,
) -> Result<CheckReport> {
    let corpus = load_corpus(&options.folder, &options.load, extractor);
    let comparisons = CandidatePairs::new(&corpus).len();

    let progress = if options.show_progress {
        println!(
            "Comparing {} sentences across {} documents ({} pairs)...",
            corpus.sentence_count(),
            corpus.len(),
            comparisons
        );
        comparison_progress()
    } else {
        ProgressBar::hidden()
    };

    let matches = find_matches(&corpus, metric, options.threshold, &progress);
    let matches = rank_matches(matches);

    let output_file = match &options.output_dir {
        Some(dir) => Some(save(&matches, dir, &options.folder)?),
        None => None,
    };

    info!(
        documents = corpus.len(),
        matches = matches.len(),
        "Duplicate check complete"
    );

    Ok(CheckReport {
        documents: corpus.len(),
        sentences: corpus.sentence_count(),
        comparisons,
        matches,
        output_file,
    })
}

fn save(matches: &[Match], dir: &Path, folder: &Path) -> Result<PathBuf> {
    let timestamp = chrono::Local::now().naive_local();
    save_matches(matches, dir, folder, timestamp)
}

fn comparison_progress() -> ProgressBar {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  Comparing [{bar:30}] {pos}/{len} ({eta})")
            .expect("valid template"),
    );
    pb
}
