// Known pretrained word-vector models.
//
// These are the text-format models published in the gensim-data release
// repository. Each release ships a single gzip-compressed word2vec text file
// named after the model. Binary-format releases (word2vec-google-news-300)
// are not listed because the loader only reads the text format.

use thiserror::Error;

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "glove-wiki-gigaword-100";

/// Errors raised while resolving or reading a word-vector model.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Invalid model name: {name}. Choose one from {}", .valid.join(", "))]
    InvalidModel { name: String, valid: Vec<String> },

    #[error("Malformed vector file at line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("Vector file contains no word vectors")]
    Empty,
}

/// Registry entry for one downloadable model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelInfo {
    pub name: &'static str,
    pub dimension: usize,
    /// Number of words in the vocabulary
    pub vocabulary: usize,
    /// Approximate size of the compressed download
    pub download_bytes: u64,
    pub description: &'static str,
}

pub const MODELS: &[ModelInfo] = &[
    ModelInfo {
        name: "glove-wiki-gigaword-50",
        dimension: 50,
        vocabulary: 400_000,
        download_bytes: 69_182_535,
        description: "GloVe trained on Wikipedia 2014 + Gigaword 5 (6B tokens, uncased)",
    },
    ModelInfo {
        name: "glove-wiki-gigaword-100",
        dimension: 100,
        vocabulary: 400_000,
        download_bytes: 128_469_548,
        description: "GloVe trained on Wikipedia 2014 + Gigaword 5 (6B tokens, uncased)",
    },
    ModelInfo {
        name: "glove-wiki-gigaword-200",
        dimension: 200,
        vocabulary: 400_000,
        download_bytes: 252_876_740,
        description: "GloVe trained on Wikipedia 2014 + Gigaword 5 (6B tokens, uncased)",
    },
    ModelInfo {
        name: "glove-wiki-gigaword-300",
        dimension: 300,
        vocabulary: 400_000,
        download_bytes: 376_349_470,
        description: "GloVe trained on Wikipedia 2014 + Gigaword 5 (6B tokens, uncased)",
    },
    ModelInfo {
        name: "glove-twitter-25",
        dimension: 25,
        vocabulary: 1_193_514,
        download_bytes: 109_885_004,
        description: "GloVe trained on 2B tweets (27B tokens, uncased)",
    },
    ModelInfo {
        name: "glove-twitter-50",
        dimension: 50,
        vocabulary: 1_193_514,
        download_bytes: 209_216_938,
        description: "GloVe trained on 2B tweets (27B tokens, uncased)",
    },
    ModelInfo {
        name: "glove-twitter-100",
        dimension: 100,
        vocabulary: 1_193_514,
        download_bytes: 405_932_991,
        description: "GloVe trained on 2B tweets (27B tokens, uncased)",
    },
    ModelInfo {
        name: "glove-twitter-200",
        dimension: 200,
        vocabulary: 1_193_514,
        download_bytes: 795_373_100,
        description: "GloVe trained on 2B tweets (27B tokens, uncased)",
    },
    ModelInfo {
        name: "fasttext-wiki-news-subwords-300",
        dimension: 300,
        vocabulary: 999_999,
        download_bytes: 1_005_007_116,
        description: "fastText trained on Wikipedia 2017, UMBC and statmt.org news (16B tokens)",
    },
    ModelInfo {
        name: "conceptnet-numberbatch-17-06-300",
        dimension: 300,
        vocabulary: 1_917_247,
        download_bytes: 1_225_497_562,
        description: "ConceptNet Numberbatch 17.06, multilingual (terms prefixed /c/<lang>/)",
    },
];

/// Look up a model by name.
pub fn lookup(name: &str) -> Result<&'static ModelInfo, ModelError> {
    MODELS
        .iter()
        .find(|m| m.name == name)
        .ok_or_else(|| ModelError::InvalidModel {
            name: name.to_string(),
            valid: model_names(),
        })
}

/// Names of every registered model, in registry order.
pub fn model_names() -> Vec<String> {
    MODELS.iter().map(|m| m.name.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_model_is_registered() {
        let info = lookup(DEFAULT_MODEL).unwrap();
        assert_eq!(info.dimension, 100);
    }

    #[test]
    fn test_unknown_model_lists_alternatives() {
        let err = lookup("word2vec-nonexistent").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("word2vec-nonexistent"));
        assert!(message.contains("glove-wiki-gigaword-100"));
        assert!(message.contains("glove-twitter-25"));
    }

    #[test]
    fn test_model_names_are_unique() {
        let mut names = model_names();
        let total = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), total);
    }
}
