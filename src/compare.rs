// Pairwise comparison: the exhaustive cross-document sentence search.
//
// Enumeration and measurement are kept apart: CandidatePairs walks every
// (sentence in document i, sentence in document j) pair with i < j, and
// find_matches measures each candidate and keeps those under the threshold.
// Only i < j is visited, so a document is never compared with itself and no
// pair shows up twice in reverse.

use indicatif::ProgressBar;
use tracing::info;

use crate::embedding::traits::SentenceDistance;
use crate::embedding::vectors::tokenize;
use crate::models::{Corpus, Match};

/// Indices of one cross-document sentence pair. Always `doc1 < doc2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Candidate {
    pub doc1: usize,
    pub sentence1: usize,
    pub doc2: usize,
    pub sentence2: usize,
}

/// Iterator over every cross-document sentence pair of a corpus.
///
/// Order: document pairs (0,1), (0,2), …, (1,2), …; within a pair, sentences
/// of the first document in the outer position.
#[derive(Debug, Clone)]
pub struct CandidatePairs {
    sizes: Vec<usize>,
    doc1: usize,
    doc2: usize,
    sentence1: usize,
    sentence2: usize,
    remaining: usize,
}

impl CandidatePairs {
    pub fn new(corpus: &Corpus) -> Self {
        let sizes: Vec<usize> = corpus.documents.iter().map(|d| d.sentences.len()).collect();
        Self::from_sizes(sizes)
    }

    /// Build from per-document sentence counts.
    pub fn from_sizes(sizes: Vec<usize>) -> Self {
        let mut remaining = 0;
        let mut seen = 0;
        for &size in &sizes {
            remaining += seen * size;
            seen += size;
        }

        Self {
            sizes,
            doc1: 0,
            doc2: 1,
            sentence1: 0,
            sentence2: 0,
            remaining,
        }
    }
}

impl Iterator for CandidatePairs {
    type Item = Candidate;

    fn next(&mut self) -> Option<Candidate> {
        let n = self.sizes.len();
        loop {
            if self.doc1 + 1 >= n {
                return None;
            }
            if self.doc2 >= n {
                self.doc1 += 1;
                self.doc2 = self.doc1 + 1;
                self.sentence1 = 0;
                self.sentence2 = 0;
                continue;
            }
            if self.sentence1 >= self.sizes[self.doc1] {
                self.doc2 += 1;
                self.sentence1 = 0;
                self.sentence2 = 0;
                continue;
            }
            if self.sentence2 >= self.sizes[self.doc2] {
                self.sentence1 += 1;
                self.sentence2 = 0;
                continue;
            }

            let candidate = Candidate {
                doc1: self.doc1,
                sentence1: self.sentence1,
                doc2: self.doc2,
                sentence2: self.sentence2,
            };
            self.sentence2 += 1;
            self.remaining -= 1;
            return Some(candidate);
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for CandidatePairs {}

/// Measure every candidate pair and keep those with distance below `threshold`.
///
/// Sentences are tokenized once up front. Results come back in enumeration
/// order; ranking is a separate step. `progress` advances once per pair.
pub fn find_matches(
    corpus: &Corpus,
    metric: &dyn SentenceDistance,
    threshold: f64,
    progress: &ProgressBar,
) -> Vec<Match> {
    let tokens: Vec<Vec<Vec<String>>> = corpus
        .documents
        .iter()
        .map(|doc| doc.sentences.iter().map(|s| tokenize(s)).collect())
        .collect();

    let candidates = CandidatePairs::new(corpus);
    let total = candidates.len();
    progress.set_length(total as u64);

    let mut matches = Vec::new();
    for c in candidates {
        let tokens1 = &tokens[c.doc1][c.sentence1];
        let tokens2 = &tokens[c.doc2][c.sentence2];

        if let Some(distance) = metric.distance_below(tokens1, tokens2, threshold) {
            let (doc1, doc2) = (&corpus.documents[c.doc1], &corpus.documents[c.doc2]);
            matches.push(Match {
                similarity: distance,
                doc1: doc1.name.clone(),
                sentence1: doc1.sentences[c.sentence1].clone(),
                doc2: doc2.name.clone(),
                sentence2: doc2.sentences[c.sentence2].clone(),
            });
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    info!(
        comparisons = total,
        matches = matches.len(),
        threshold,
        "Pairwise comparison finished"
    );
    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_pairs_for_fewer_than_two_documents() {
        assert_eq!(CandidatePairs::from_sizes(vec![]).count(), 0);
        assert_eq!(CandidatePairs::from_sizes(vec![5]).count(), 0);
    }

    #[test]
    fn test_length_matches_cross_products() {
        // 2*3 + 2*4 + 3*4
        let pairs = CandidatePairs::from_sizes(vec![2, 3, 4]);
        assert_eq!(pairs.len(), 26);
        assert_eq!(pairs.count(), 26);
    }

    #[test]
    fn test_empty_documents_are_skipped() {
        let pairs: Vec<_> = CandidatePairs::from_sizes(vec![0, 1, 0, 1]).collect();
        assert_eq!(
            pairs,
            vec![Candidate {
                doc1: 1,
                sentence1: 0,
                doc2: 3,
                sentence2: 0
            }]
        );
    }

    #[test]
    fn test_enumeration_order() {
        let pairs: Vec<_> = CandidatePairs::from_sizes(vec![2, 1, 1])
            .map(|c| (c.doc1, c.sentence1, c.doc2, c.sentence2))
            .collect();
        assert_eq!(
            pairs,
            vec![
                (0, 0, 1, 0),
                (0, 1, 1, 0),
                (0, 0, 2, 0),
                (0, 1, 2, 0),
                (1, 0, 2, 0),
            ]
        );
    }

    #[test]
    fn test_size_hint_counts_down() {
        let mut pairs = CandidatePairs::from_sizes(vec![1, 2]);
        assert_eq!(pairs.len(), 2);
        pairs.next();
        assert_eq!(pairs.len(), 1);
        pairs.next();
        assert_eq!(pairs.len(), 0);
        assert!(pairs.next().is_none());
    }
}
