// Sentence distance trait, the seam between the comparator and the model.
//
// The comparator only needs "how far apart are these two token lists". The
// default implementation is word mover's distance over pretrained vectors;
// tests plug in simpler metrics without loading a model.

use super::vectors::WordVectors;
use super::wmd;

/// Trait for measuring how different two tokenized sentences are.
///
/// Lower is more similar. An undefined distance (e.g. nothing to compare)
/// is reported as `f64::INFINITY`, which never counts as a match.
pub trait SentenceDistance {
    fn distance(&self, tokens1: &[String], tokens2: &[String]) -> f64;

    /// The distance if it is strictly below `cutoff`, otherwise `None`.
    ///
    /// Default implementation computes the full distance. Metrics with a
    /// cheap lower bound can override this to skip hopeless pairs.
    fn distance_below(&self, tokens1: &[String], tokens2: &[String], cutoff: f64) -> Option<f64> {
        let d = self.distance(tokens1, tokens2);
        (d < cutoff).then_some(d)
    }
}

impl SentenceDistance for WordVectors {
    fn distance(&self, tokens1: &[String], tokens2: &[String]) -> f64 {
        wmd::word_movers_distance(self, tokens1, tokens2)
    }

    fn distance_below(&self, tokens1: &[String], tokens2: &[String], cutoff: f64) -> Option<f64> {
        wmd::word_movers_distance_below(self, tokens1, tokens2, cutoff)
    }
}
