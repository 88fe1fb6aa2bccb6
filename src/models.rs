// Data models for the duplicate-detection pipeline.
//
// Documents and the corpus are built once by the loader and never mutated.
// Matches are produced by the comparator and collected into the report.

use serde::Serialize;

/// One input file reduced to its kept sentences.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// File basename, used as the document identifier in results
    pub name: String,
    pub sentences: Vec<String>,
}

impl Document {
    pub fn new(name: impl Into<String>, sentences: Vec<String>) -> Self {
        Self {
            name: name.into(),
            sentences,
        }
    }
}

/// Documents in discovery order. The order decides which document of a pair
/// becomes `doc1` in a match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Corpus {
    pub documents: Vec<Document>,
}

impl Corpus {
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Total number of sentences across all documents.
    pub fn sentence_count(&self) -> usize {
        self.documents.iter().map(|d| d.sentences.len()).sum()
    }
}

/// A cross-document sentence pair whose distance fell below the threshold.
///
/// Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Match {
    /// Word mover's distance; lower means more similar
    pub similarity: f64,
    pub doc1: String,
    pub sentence1: String,
    pub doc2: String,
    pub sentence2: String,
}
