// Corpus loading: folder → documents → kept sentences.
//
// Discovery is non-recursive. Files are sorted by name so that repeated runs
// over the same folder pair documents identically. A folder that can't be
// read degrades to an empty corpus; a single unreadable file is skipped.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;
use tracing::{debug, info, warn};

use super::extract::{normalize_extension, TextExtractor, DEFAULT_EXTENSION};
use super::sentences::{filter_short, split_sentences, DEFAULT_MIN_LENGTH};
use crate::models::{Corpus, Document};

/// How documents are discovered and which sentences are kept.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// File extension to compare, e.g. ".docx"
    pub extension: String,
    /// Minimum sentence length in characters
    pub min_length: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
            min_length: DEFAULT_MIN_LENGTH,
        }
    }
}

/// List the files in `folder` with the given extension, sorted by file name.
///
/// Word's lock files ("~$report.docx") are not documents and are left out.
pub fn list_files(folder: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let extension = normalize_extension(extension);
    let entries = std::fs::read_dir(folder)
        .with_context(|| format!("Error reading directory {}", folder.display()))?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.file_name()
                .map(|name| name.to_string_lossy().to_lowercase())
                .is_some_and(|name| name.ends_with(&extension) && !name.starts_with("~$"))
        })
        .collect();

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Load every matching document in `folder`.
///
/// Never fails: a directory error is reported and yields an empty corpus, and
/// files the extractor can't read are skipped with a warning.
pub fn load_corpus(folder: &Path, options: &LoadOptions, extractor: &dyn TextExtractor) -> Corpus {
    let files = match list_files(folder, &options.extension) {
        Ok(files) => files,
        Err(e) => {
            warn!(error = %e, "Directory listing failed");
            println!("  {} {:#}", "Warning:".yellow(), e);
            return Corpus::default();
        }
    };

    let mut documents = Vec::with_capacity(files.len());
    for path in &files {
        match load_document(path, extractor, options.min_length) {
            Ok(doc) => {
                debug!(document = %doc.name, sentences = doc.sentences.len(), "Loaded document");
                documents.push(doc);
            }
            Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable document"),
        }
    }

    let corpus = Corpus::new(documents);
    info!(
        documents = corpus.len(),
        sentences = corpus.sentence_count(),
        "Corpus loaded"
    );
    corpus
}

/// Extract, split and filter a single document.
pub fn load_document(
    path: &Path,
    extractor: &dyn TextExtractor,
    min_length: usize,
) -> Result<Document> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let sentences: Vec<String> = extractor
        .paragraphs(path)?
        .iter()
        .flat_map(|paragraph| split_sentences(paragraph))
        .collect();

    Ok(Document::new(name, filter_short(sentences, min_length)))
}
