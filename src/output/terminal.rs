// Colored terminal output for matches, models, and file listings.
//
// This module handles all terminal-specific formatting. main.rs delegates
// here after each command finishes.

use std::path::{Path, PathBuf};

use colored::Colorize;

use crate::embedding::download::ModelStore;
use crate::embedding::registry::MODELS;
use crate::models::Match;

/// Display the top `limit` ranked matches.
pub fn display_matches(matches: &[Match], limit: usize) {
    if matches.is_empty() {
        println!("\nNo near-duplicate sentences found.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Near-duplicate sentences ({} matches) ===", matches.len()).bold()
    );
    println!();

    for (i, m) in matches.iter().take(limit).enumerate() {
        println!(
            "  {:>4}. {}  {} / {}",
            i + 1,
            colorize_distance(m.similarity),
            m.doc1.bold(),
            m.doc2.bold(),
        );
        println!("        \"{}\"", super::truncate_chars(&m.sentence1, 110).dimmed());
        println!("        \"{}\"", super::truncate_chars(&m.sentence2, 110).dimmed());
    }

    if matches.len() > limit {
        println!(
            "\n  {}",
            format!("... and {} more (see the CSV output)", matches.len() - limit).dimmed()
        );
    }
}

/// Display every registered model and whether it is already downloaded.
pub fn display_models(store: &ModelStore) {
    println!("{}", "=== Available embedding models ===".bold());
    println!("  Cache: {}\n", store.root().display());

    for info in MODELS {
        let status = if store.is_cached(info) {
            "cached".green()
        } else {
            format!("{} MB", info.download_bytes / (1024 * 1024)).dimmed()
        };
        println!(
            "  {:<34} {:>4}d  {:>9} words  {}",
            info.name, info.dimension, info.vocabulary, status
        );
        println!("    {}", info.description.dimmed());
    }
}

/// Display the documents that would be compared, numbered from 1.
pub fn display_files(folder: &Path, files: &[PathBuf]) {
    if files.is_empty() {
        println!("No matching documents in {}", folder.display());
        return;
    }

    for (i, file) in files.iter().enumerate() {
        println!("File {}: {}", i + 1, file.display());
    }
}

/// Colorize a distance: near-verbatim copies stand out the most.
fn colorize_distance(distance: f64) -> colored::ColoredString {
    let text = format!("{distance:.3}");
    match distance {
        d if d < 0.05 => text.red().bold(),
        d if d < 0.1 => text.bright_red(),
        _ => text.yellow(),
    }
}
